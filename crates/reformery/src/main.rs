mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use reformery_core::DashboardController;
use reformery_core::aggregate::admin_resources;

use crate::cli::{Cli, Command, DashboardView};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands never talk to the API
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "reformery", &mut std::io::stdout());
            Ok(())
        }

        // Session commands need a client but no dashboard
        Command::Login(args) => commands::session::login(args, &cli.global).await,
        Command::Logout => commands::session::logout(&cli.global),

        // Everything else runs against a dashboard controller
        cmd => {
            let client_config = config::resolve_client_config(&cli.global)?;
            let (resources, summary) = match &cmd {
                Command::Dashboard(args) => (
                    commands::dashboard::resources(args.view),
                    matches!(args.view, DashboardView::Admin),
                ),
                _ => (admin_resources(), true),
            };
            let controller = DashboardController::with_resources(
                client_config.build_client()?,
                resources,
                client_config.notification_ttl,
            )
            .with_summary(summary);

            tracing::debug!(command = ?cmd, "dispatching command");
            let result = commands::dispatch(cmd, &controller, &cli.global).await;
            controller.unmount();
            result
        }
    }
}
