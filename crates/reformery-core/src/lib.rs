// reformery-core: Data-orchestration layer between reformery-api and consumers (CLI).

pub mod aggregate;
pub mod config;
pub mod dashboard;
pub mod editor;
pub mod error;
pub mod fetcher;
pub mod filter;
pub mod forms;
pub mod mutation;
pub mod notification;
pub mod resource;

// ── Primary re-exports ──────────────────────────────────────────────
pub use aggregate::{AggregateLoader, AggregateState, ResourceLoader};
pub use config::{ClientConfig, TlsVerification};
pub use dashboard::DashboardController;
pub use editor::{EditorState, EditorStore};
pub use error::{CoreError, ErrorInfo};
pub use fetcher::ResourceFetcher;
pub use filter::{FilterController, FilterCriteria, ScheduleFilter, UserFilter};
pub use forms::{ClassForm, PackageForm, ScheduleForm, UserForm};
pub use mutation::{Mutation, MutationError, MutationGateway, MutationPhase, MutationResult};
pub use notification::{Notification, NotificationKind, NotificationQueue};
pub use resource::{Query, ResourceData, ResourceName, ResourceOutcome};

// Domain records come straight from the API crate's typed schemas.
pub use reformery_api::models::{
    DashboardSummary, Package, Reservation, Schedule, ScheduleStatus, Statistics, StudioClass,
    User, UserPackage, UserRole,
};
pub use reformery_api::requests::AssignPackageRequest;
pub use reformery_api::{SessionContext, SessionEvent};
