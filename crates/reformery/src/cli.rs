//! Clap derive structures for the `reformery` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

use reformery_core::{ScheduleStatus, UserRole};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// reformery -- run a Pilates/fitness studio from the terminal
#[derive(Debug, Parser)]
#[command(
    name = "reformery",
    version,
    about = "Manage a Reformery studio from the command line",
    long_about = "Dashboards, members, packages, classes and timetables for a \
        Reformery studio booking API.\n\n\
        Every write is followed by a fresh dashboard load, so what you see \
        afterwards is what the server holds.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Studio profile to use
    #[arg(long, short = 'p', env = "REFORMERY_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API root (overrides profile; `/api/v1` is appended when missing)
    #[arg(long, env = "REFORMERY_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Session token (overrides the stored one)
    #[arg(long, env = "REFORMERY_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "REFORMERY_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "REFORMERY_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "REFORMERY_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

impl OutputFormat {
    /// Formats meant for machines rather than people.
    pub fn is_structured(self) -> bool {
        matches!(self, Self::Json | Self::JsonCompact | Self::Yaml)
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Shared value enums ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RoleArg {
    Admin,
    Instructor,
    Client,
}

impl From<RoleArg> for UserRole {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Admin => UserRole::Admin,
            RoleArg::Instructor => UserRole::Instructor,
            RoleArg::Client => UserRole::Client,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScheduleStatusArg {
    Scheduled,
    Cancelled,
    Completed,
}

impl From<ScheduleStatusArg> for ScheduleStatus {
    fn from(status: ScheduleStatusArg) -> Self {
        match status {
            ScheduleStatusArg::Scheduled => ScheduleStatus::Scheduled,
            ScheduleStatusArg::Cancelled => ScheduleStatus::Cancelled,
            ScheduleStatusArg::Completed => ScheduleStatus::Completed,
        }
    }
}

/// Which role's dashboard to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DashboardView {
    Admin,
    Client,
    Instructor,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load a dashboard: every resource plus the headline summary
    #[command(alias = "dash")]
    Dashboard(DashboardArgs),

    /// Manage studio members, instructors and admins
    #[command(alias = "u")]
    Users(UsersArgs),

    /// Manage class packages
    #[command(alias = "pkg")]
    Packages(PackagesArgs),

    /// Manage class types
    Classes(ClassesArgs),

    /// Manage the timetable
    #[command(alias = "sched")]
    Schedules(SchedulesArgs),

    /// Manage packages assigned to members
    #[command(alias = "up")]
    Memberships(MembershipsArgs),

    /// View bookings and record attendance
    #[command(alias = "res")]
    Reservations(ReservationsArgs),

    /// Sign in and store the session token
    Login(LoginArgs),

    /// Forget the stored session token
    Logout,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Dashboard ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DashboardArgs {
    /// Dashboard to load
    #[arg(long, value_enum, default_value = "admin")]
    pub view: DashboardView,
}

// ── Users ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// List users, filtered on the server
    #[command(alias = "ls")]
    List(UserListArgs),

    /// Register a new user
    Create {
        /// Email address (login name)
        #[arg(long)]
        email: String,

        /// Initial password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,

        /// Full name
        #[arg(long)]
        name: Option<String>,

        /// Phone number
        #[arg(long)]
        phone: Option<String>,

        /// Role
        #[arg(long, value_enum, default_value = "client")]
        role: RoleArg,
    },

    /// Update a user; omitted fields keep their current value
    Update {
        /// User ID
        id: u64,

        #[arg(long)]
        email: Option<String>,

        /// New password
        #[arg(long)]
        password: Option<String>,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long, value_enum)]
        role: Option<RoleArg>,
    },

    /// Flip a user between active and inactive
    Toggle {
        /// User ID
        id: u64,
    },
}

#[derive(Debug, Default, Args)]
pub struct UserListArgs {
    /// Only users with this role
    #[arg(long, value_enum)]
    pub role: Option<RoleArg>,

    /// Email contains
    #[arg(long)]
    pub email: Option<String>,

    /// Name contains
    #[arg(long)]
    pub name: Option<String>,

    /// Only active (true) or inactive (false) users
    #[arg(long, action = clap::ArgAction::Set)]
    pub active: Option<bool>,

    /// Registered on this date (YYYY-MM-DD)
    #[arg(long)]
    pub created_at: Option<NaiveDate>,
}

// ── Packages ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PackagesArgs {
    #[command(subcommand)]
    pub command: PackagesCommand,
}

#[derive(Debug, Subcommand)]
pub enum PackagesCommand {
    /// List all packages
    #[command(alias = "ls")]
    List,

    /// Create a package
    Create {
        #[arg(long)]
        name: String,

        #[arg(long)]
        description: Option<String>,

        /// Number of class credits
        #[arg(long)]
        classes: u32,

        /// Days the package stays valid after purchase
        #[arg(long)]
        validity_days: u32,

        #[arg(long)]
        price: f64,

        /// Create the package inactive
        #[arg(long)]
        inactive: bool,
    },

    /// Update a package; omitted fields keep their current value
    Update {
        /// Package ID
        id: u64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        classes: Option<u32>,

        #[arg(long)]
        validity_days: Option<u32>,

        #[arg(long)]
        price: Option<f64>,
    },

    /// Flip a package between active and inactive
    Toggle {
        /// Package ID
        id: u64,
    },
}

// ── Classes ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ClassesArgs {
    #[command(subcommand)]
    pub command: ClassesCommand,
}

#[derive(Debug, Subcommand)]
pub enum ClassesCommand {
    /// List all class types
    #[command(alias = "ls")]
    List,

    /// Create a class type
    Create {
        #[arg(long)]
        name: String,

        #[arg(long)]
        description: Option<String>,

        /// Duration in minutes
        #[arg(long, default_value = "50")]
        duration: u32,

        /// Spots per session
        #[arg(long, default_value = "10")]
        capacity: u32,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        intensity: Option<String>,
    },

    /// Update a class type; omitted fields keep their current value
    Update {
        /// Class ID
        id: u64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        duration: Option<u32>,

        #[arg(long)]
        capacity: Option<u32>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        intensity: Option<String>,
    },

    /// Flip a class type between active and inactive
    Toggle {
        /// Class ID
        id: u64,
    },
}

// ── Schedules ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SchedulesArgs {
    #[command(subcommand)]
    pub command: SchedulesCommand,
}

#[derive(Debug, Subcommand)]
pub enum SchedulesCommand {
    /// List every session on the admin timetable, or the bookable
    /// public timetable with --public
    #[command(alias = "ls")]
    List {
        /// List the public timetable instead of the admin one
        #[arg(long)]
        public: bool,

        /// First day (YYYY-MM-DD); public timetable only
        #[arg(long, requires = "public")]
        from: Option<NaiveDate>,

        /// Last day (YYYY-MM-DD); public timetable only
        #[arg(long, requires = "public")]
        to: Option<NaiveDate>,
    },

    /// Put a class on the timetable
    Create {
        /// Class ID
        #[arg(long)]
        class: u64,

        /// Instructor user ID
        #[arg(long)]
        instructor: u64,

        /// Day (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,

        /// Start time (HH:MM)
        #[arg(long)]
        start: String,

        /// End time (HH:MM)
        #[arg(long)]
        end: String,

        #[arg(long, default_value = "10")]
        capacity: u32,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Update a session; omitted fields keep their current value
    Update {
        /// Schedule ID
        id: u64,

        #[arg(long)]
        class: Option<u64>,

        #[arg(long)]
        instructor: Option<u64>,

        #[arg(long)]
        date: Option<NaiveDate>,

        #[arg(long)]
        start: Option<String>,

        #[arg(long)]
        end: Option<String>,

        #[arg(long)]
        capacity: Option<u32>,

        #[arg(long, value_enum)]
        status: Option<ScheduleStatusArg>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Cancel a session
    Cancel {
        /// Schedule ID
        id: u64,
    },
}

// ── Memberships ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct MembershipsArgs {
    #[command(subcommand)]
    pub command: MembershipsCommand,
}

#[derive(Debug, Subcommand)]
pub enum MembershipsCommand {
    /// List assigned packages
    #[command(alias = "ls")]
    List {
        /// Only packages held by this user ID
        #[arg(long)]
        user: Option<u64>,
    },

    /// Assign a package to a user
    Assign {
        /// User ID
        #[arg(long)]
        user: u64,

        /// Package ID
        #[arg(long)]
        package: u64,

        /// Amount actually charged
        #[arg(long)]
        price_paid: Option<f64>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Remove an assigned package
    Remove {
        /// Membership ID
        id: u64,
    },

    /// Gift extra class credits
    AddClasses {
        /// Membership ID
        id: u64,

        /// Credits to add
        #[arg(long, value_parser = clap::value_parser!(i32).range(1..))]
        count: i32,

        /// Reason recorded with the adjustment
        #[arg(long, default_value = "Extra classes")]
        reason: String,
    },
}

// ── Reservations ─────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ReservationsArgs {
    #[command(subcommand)]
    pub command: ReservationsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ReservationsCommand {
    /// List bookings
    #[command(alias = "ls")]
    List {
        /// Only bookings for this schedule ID
        #[arg(long)]
        schedule: Option<u64>,
    },

    /// Record attendance for a booking
    Attend {
        /// Reservation ID
        id: u64,

        /// Record a no-show instead
        #[arg(long)]
        absent: bool,
    },
}

// ── Session ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account email (prompted when omitted)
    #[arg(long)]
    pub email: Option<String>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive configuration wizard
    Init,

    /// Show the current configuration (tokens redacted)
    Show,

    /// Print the config file location
    Path,

    /// Set a profile value
    Set {
        /// Key (api_url, token_env, insecure, ca_cert, timeout, notification_ttl_secs)
        key: String,
        /// Value
        value: String,
    },

    /// List profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name
        name: String,
    },

    /// Store a session token in the system keyring
    SetToken {
        /// Profile name (defaults to the active profile)
        #[arg(long)]
        profile: Option<String>,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
