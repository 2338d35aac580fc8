// ── MutationGateway ──
//
// Every write flows through one `Mutation` enum and exactly one network
// call. The gateway never refetches on its own; the caller decides what
// to reload after a success.

use std::sync::Arc;

use reformery_api::ApiClient;
use reformery_api::models::{Package, Reservation, Schedule, StudioClass, User, UserPackage};
use reformery_api::requests::{
    AdjustClassesRequest, AssignPackageRequest, CreateClassRequest, CreatePackageRequest,
    CreateScheduleRequest, CreateUserRequest, UpdateClassRequest, UpdatePackageRequest,
    UpdateScheduleRequest, UpdateUserPackageRequest, UpdateUserRequest,
};
use serde::Serialize;
use strum::{Display, IntoStaticStr};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::CoreError;

/// All write operations against the studio API.
///
/// Toggling a record's `active` flag is an update carrying only the
/// negated flag; see [`Mutation::toggle_user`] and friends.
#[derive(Debug, Clone, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Mutation {
    // ── Users ────────────────────────────────────────────────────────
    CreateUser(CreateUserRequest),
    UpdateUser {
        id: u64,
        update: UpdateUserRequest,
    },

    // ── Catalogue ────────────────────────────────────────────────────
    CreatePackage(CreatePackageRequest),
    UpdatePackage {
        id: u64,
        update: UpdatePackageRequest,
    },
    CreateClass(CreateClassRequest),
    UpdateClass {
        id: u64,
        update: UpdateClassRequest,
    },

    // ── Schedules ────────────────────────────────────────────────────
    CreateSchedule(CreateScheduleRequest),
    UpdateSchedule {
        id: u64,
        update: UpdateScheduleRequest,
    },
    CancelSchedule {
        id: u64,
    },

    // ── Enrollment ───────────────────────────────────────────────────
    AssignPackage(AssignPackageRequest),
    UpdateUserPackage {
        id: u64,
        update: UpdateUserPackageRequest,
    },
    RemoveUserPackage {
        id: u64,
    },
    AdjustClasses {
        id: u64,
        delta: i32,
        reason: String,
    },
    MarkAttendance {
        id: u64,
        attended: bool,
    },
    CancelReservation {
        id: u64,
    },
}

impl Mutation {
    pub fn toggle_user(user: &User) -> Self {
        Self::UpdateUser {
            id: user.id,
            update: UpdateUserRequest {
                active: Some(!user.active),
                ..UpdateUserRequest::default()
            },
        }
    }

    pub fn toggle_package(package: &Package) -> Self {
        Self::UpdatePackage {
            id: package.id,
            update: UpdatePackageRequest {
                active: Some(!package.active),
                ..UpdatePackageRequest::default()
            },
        }
    }

    pub fn toggle_class(class: &StudioClass) -> Self {
        Self::UpdateClass {
            id: class.id,
            update: UpdateClassRequest {
                active: Some(!class.active),
                ..UpdateClassRequest::default()
            },
        }
    }

    /// Snake-case operation name, used in logs and errors.
    pub fn operation(&self) -> &'static str {
        self.into()
    }

    /// Text shown when the server gives no usable error message.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::CreateUser(_) => "Failed to create user",
            Self::UpdateUser { .. } => "Failed to update user",
            Self::CreatePackage(_) => "Failed to create package",
            Self::UpdatePackage { .. } => "Failed to update package",
            Self::CreateClass(_) => "Failed to create class",
            Self::UpdateClass { .. } => "Failed to update class",
            Self::CreateSchedule(_) => "Failed to create schedule",
            Self::UpdateSchedule { .. } => "Failed to update schedule",
            Self::CancelSchedule { .. } => "Failed to cancel schedule",
            Self::AssignPackage(_) => "Failed to assign package",
            Self::UpdateUserPackage { .. } => "Failed to update user package",
            Self::RemoveUserPackage { .. } => "Failed to remove user package",
            Self::AdjustClasses { .. } => "Failed to adjust class credits",
            Self::MarkAttendance { .. } => "Failed to record attendance",
            Self::CancelReservation { .. } => "Failed to cancel reservation",
        }
    }
}

/// Record echoed back by a successful mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MutationResult {
    User(User),
    Package(Package),
    Class(StudioClass),
    Schedule(Schedule),
    UserPackage(UserPackage),
    Reservation(Reservation),
    /// The server acknowledged without echoing a record.
    Ok,
}

/// A failed mutation, with text fit to show the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct MutationError {
    pub operation: &'static str,
    /// Server text verbatim, or the operation's fallback message.
    pub message: String,
    pub status: Option<u16>,
    /// The session was invalidated by this call.
    pub unauthorized: bool,
}

impl MutationError {
    fn from_core(mutation: &Mutation, err: &CoreError) -> Self {
        Self {
            operation: mutation.operation(),
            message: err
                .server_message()
                .map_or_else(|| mutation.fallback_message().to_owned(), str::to_owned),
            status: err.status(),
            unauthorized: err.is_unauthorized(),
        }
    }
}

/// Lifecycle of the most recent mutation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum MutationPhase {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed,
}

/// Issues mutations against the studio API.
pub struct MutationGateway {
    client: Arc<ApiClient>,
    phase: watch::Sender<MutationPhase>,
}

impl MutationGateway {
    pub fn new(client: Arc<ApiClient>) -> Self {
        let (phase, _) = watch::channel(MutationPhase::Idle);
        Self { client, phase }
    }

    pub fn phase(&self) -> MutationPhase {
        *self.phase.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<MutationPhase> {
        self.phase.subscribe()
    }

    /// Return to `Idle` once the outcome has been handled.
    pub fn settle(&self) {
        self.phase.send_replace(MutationPhase::Idle);
    }

    /// Fail an operation before it reaches the network (form validation).
    pub fn reject(&self, operation: &'static str, err: &CoreError) -> MutationError {
        let error = MutationError {
            operation,
            message: err
                .server_message()
                .map_or_else(|| err.to_string(), str::to_owned),
            status: None,
            unauthorized: false,
        };
        warn!(operation, error = %error, "mutation rejected locally");
        self.phase.send_replace(MutationPhase::Failed);
        error
    }

    /// Perform exactly one mutation. No retries.
    pub async fn execute(&self, mutation: Mutation) -> Result<MutationResult, MutationError> {
        let operation = mutation.operation();
        self.phase.send_replace(MutationPhase::Pending);
        debug!(operation, "executing mutation");

        match self.route(&mutation).await {
            Ok(result) => {
                info!(operation, "mutation succeeded");
                self.phase.send_replace(MutationPhase::Succeeded);
                Ok(result)
            }
            Err(e) => {
                let error = MutationError::from_core(&mutation, &e);
                warn!(operation, status = ?error.status, error = %e, "mutation failed");
                self.phase.send_replace(MutationPhase::Failed);
                Err(error)
            }
        }
    }

    async fn route(&self, mutation: &Mutation) -> Result<MutationResult, CoreError> {
        let client = &self.client;

        let result = match mutation {
            // ── Users ────────────────────────────────────────────
            Mutation::CreateUser(req) => echo(client.create_user(req).await?, MutationResult::User),
            Mutation::UpdateUser { id, update } => {
                echo(client.update_user(*id, update).await?, MutationResult::User)
            }

            // ── Catalogue ────────────────────────────────────────
            Mutation::CreatePackage(req) => {
                echo(client.create_package(req).await?, MutationResult::Package)
            }
            Mutation::UpdatePackage { id, update } => echo(
                client.update_package(*id, update).await?,
                MutationResult::Package,
            ),
            Mutation::CreateClass(req) => {
                echo(client.create_class(req).await?, MutationResult::Class)
            }
            Mutation::UpdateClass { id, update } => {
                echo(client.update_class(*id, update).await?, MutationResult::Class)
            }

            // ── Schedules ────────────────────────────────────────
            Mutation::CreateSchedule(req) => {
                echo(client.create_schedule(req).await?, MutationResult::Schedule)
            }
            Mutation::UpdateSchedule { id, update } => echo(
                client.update_schedule(*id, update).await?,
                MutationResult::Schedule,
            ),
            Mutation::CancelSchedule { id } => {
                echo(client.cancel_schedule(*id).await?, MutationResult::Schedule)
            }

            // ── Enrollment ───────────────────────────────────────
            Mutation::AssignPackage(req) => {
                echo(client.assign_package(req).await?, MutationResult::UserPackage)
            }
            Mutation::UpdateUserPackage { id, update } => echo(
                client.update_user_package(*id, update).await?,
                MutationResult::UserPackage,
            ),
            Mutation::RemoveUserPackage { id } => echo(
                client.remove_user_package(*id).await?,
                MutationResult::UserPackage,
            ),
            Mutation::AdjustClasses { id, delta, reason } => {
                let req = AdjustClassesRequest {
                    delta: *delta,
                    reason: reason.clone(),
                };
                echo(
                    client.adjust_classes(*id, &req).await?,
                    MutationResult::UserPackage,
                )
            }
            Mutation::MarkAttendance { id, attended } => echo(
                client.mark_attendance(*id, *attended).await?,
                MutationResult::Reservation,
            ),
            Mutation::CancelReservation { id } => echo(
                client.cancel_reservation(*id).await?,
                MutationResult::Reservation,
            ),
        };

        Ok(result)
    }
}

fn echo<T>(record: Option<T>, wrap: fn(T) -> MutationResult) -> MutationResult {
    record.map_or(MutationResult::Ok, wrap)
}

impl std::fmt::Debug for MutationGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MutationGateway")
            .field("phase", &self.phase())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(active: bool) -> User {
        User {
            id: 3,
            email: "ana@studio.test".into(),
            full_name: None,
            role: reformery_api::models::UserRole::Client,
            active,
            phone: None,
            created_at: None,
        }
    }

    #[test]
    fn toggle_negates_active_only() {
        match Mutation::toggle_user(&user(true)) {
            Mutation::UpdateUser { id, update } => {
                assert_eq!(id, 3);
                assert_eq!(
                    update,
                    UpdateUserRequest {
                        active: Some(false),
                        ..UpdateUserRequest::default()
                    }
                );
            }
            other => panic!("unexpected mutation {other:?}"),
        }
    }

    #[test]
    fn operation_names_are_snake_case() {
        assert_eq!(Mutation::CancelSchedule { id: 1 }.operation(), "cancel_schedule");
        assert_eq!(Mutation::toggle_user(&user(false)).operation(), "update_user");
    }

    #[test]
    fn error_prefers_server_text() {
        let mutation = Mutation::RemoveUserPackage { id: 9 };
        let err = MutationError::from_core(
            &mutation,
            &CoreError::Rejected {
                message: Some("El paquete tiene reservas activas".into()),
                status: Some(409),
            },
        );
        assert_eq!(err.message, "El paquete tiene reservas activas");
        assert_eq!(err.status, Some(409));

        let err = MutationError::from_core(&mutation, &CoreError::Timeout { timeout_secs: 15 });
        assert_eq!(err.message, "Failed to remove user package");
        assert!(!err.unauthorized);
    }
}
