// ── DashboardController ──
//
// Composes the loaders, editors, gateway and notification slot behind
// one screen. Mutations that succeed are followed by a full refetch and
// a summary reload; failures only raise an error banner and leave any
// open editor untouched.

use std::sync::Arc;
use std::time::Duration;

use reformery_api::models::{DashboardSummary, Package, Schedule, StudioClass, User};
use reformery_api::requests::AssignPackageRequest;
use reformery_api::{ApiClient, SessionContext, SessionEvent};
use tokio::sync::{broadcast, watch};
use tracing::{debug, warn};

use crate::aggregate::{AggregateLoader, AggregateState, admin_resources};
use crate::config::ClientConfig;
use crate::editor::EditorStore;
use crate::error::CoreError;
use crate::fetcher::ResourceFetcher;
use crate::filter::{FilterController, UserFilter};
use crate::forms::{ClassForm, PackageForm, ScheduleForm, UserForm};
use crate::mutation::{Mutation, MutationError, MutationGateway, MutationResult};
use crate::notification::NotificationQueue;
use crate::resource::{Query, ResourceName};

/// State and actions behind one dashboard screen.
///
/// Each instance owns its own aggregate, editors and notification slot;
/// nothing is shared between dashboards except the API session.
pub struct DashboardController {
    client: Arc<ApiClient>,
    aggregate: AggregateLoader,
    summary: watch::Sender<Option<DashboardSummary>>,
    /// Whether the admin summary track is read on mount and refresh.
    summary_enabled: bool,
    notifications: NotificationQueue,
    mutations: MutationGateway,
    user_filter: FilterController<UserFilter>,
    user_editor: EditorStore<User>,
    package_editor: EditorStore<Package>,
    class_editor: EditorStore<StudioClass>,
    schedule_editor: EditorStore<Schedule>,
}

impl DashboardController {
    /// Admin dashboard over `client`, including the summary track.
    pub fn new(client: Arc<ApiClient>, notification_ttl: Duration) -> Self {
        Self::with_resources(client, admin_resources(), notification_ttl).with_summary(true)
    }

    /// Dashboard loading an arbitrary resource set. The summary track is
    /// off until enabled with [`with_summary`](Self::with_summary).
    pub fn with_resources(
        client: Arc<ApiClient>,
        resources: Vec<(ResourceName, Query)>,
        notification_ttl: Duration,
    ) -> Self {
        let fetcher = ResourceFetcher::new(Arc::clone(&client));
        let (summary, _) = watch::channel(None);
        Self {
            aggregate: AggregateLoader::from_fetcher(&fetcher, resources),
            summary,
            summary_enabled: false,
            notifications: NotificationQueue::new(notification_ttl),
            mutations: MutationGateway::new(Arc::clone(&client)),
            user_filter: FilterController::new(fetcher),
            user_editor: EditorStore::new(),
            package_editor: EditorStore::new(),
            class_editor: EditorStore::new(),
            schedule_editor: EditorStore::new(),
            client,
        }
    }

    /// Turn the summary track on or off. It reads admin statistics, so
    /// only admin sessions should enable it.
    pub fn with_summary(mut self, enabled: bool) -> Self {
        self.summary_enabled = enabled;
        self
    }

    pub fn summary_enabled(&self) -> bool {
        self.summary_enabled
    }

    /// Admin dashboard built from runtime configuration.
    pub fn from_config(config: &ClientConfig) -> Result<Self, CoreError> {
        Ok(Self::new(config.build_client()?, config.notification_ttl))
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        self.client.session()
    }

    /// Session lifecycle events, including `Unauthorized` after any 401.
    pub fn session_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.client.session().subscribe()
    }

    pub fn aggregate(&self) -> &AggregateLoader {
        &self.aggregate
    }

    pub fn state(&self) -> AggregateState {
        self.aggregate.state()
    }

    pub fn summary(&self) -> Option<DashboardSummary> {
        self.summary.borrow().clone()
    }

    pub fn subscribe_summary(&self) -> watch::Receiver<Option<DashboardSummary>> {
        self.summary.subscribe()
    }

    pub fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }

    pub fn mutations(&self) -> &MutationGateway {
        &self.mutations
    }

    pub fn user_filter(&self) -> &FilterController<UserFilter> {
        &self.user_filter
    }

    pub fn user_editor(&self) -> &EditorStore<User> {
        &self.user_editor
    }

    pub fn package_editor(&self) -> &EditorStore<Package> {
        &self.package_editor
    }

    pub fn class_editor(&self) -> &EditorStore<StudioClass> {
        &self.class_editor
    }

    pub fn schedule_editor(&self) -> &EditorStore<Schedule> {
        &self.schedule_editor
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Load every resource plus the summary (when enabled), concurrently.
    pub async fn mount(&self) -> AggregateState {
        let (state, _) = tokio::join!(self.aggregate.load(), self.reload_summary());
        state
    }

    /// Manual retry after a systemic failure: same as a fresh mount.
    pub async fn retry(&self) -> AggregateState {
        self.mount().await
    }

    /// Tear down transient UI state.
    pub fn unmount(&self) {
        self.notifications.dismiss();
        self.mutations.settle();
        self.user_editor.close();
        self.package_editor.close();
        self.class_editor.close();
        self.schedule_editor.close();
        debug!("dashboard unmounted");
    }

    /// Reload the summary track. A failure keeps the last known value;
    /// with the track disabled nothing is requested.
    pub async fn reload_summary(&self) -> Option<DashboardSummary> {
        if !self.summary_enabled {
            return None;
        }
        match self.client.dashboard_summary().await {
            Ok(summary) => {
                self.summary.send_replace(Some(summary.clone()));
                Some(summary)
            }
            Err(e) => {
                warn!(error = %e, "summary reload failed, keeping previous value");
                self.summary()
            }
        }
    }

    async fn refresh(&self) {
        tokio::join!(self.aggregate.refetch(), self.reload_summary());
    }

    // ── Editor submissions ───────────────────────────────────────────

    /// Create or update a user depending on the user editor's mode.
    pub async fn submit_user(&self, form: &UserForm) -> Result<MutationResult, MutationError> {
        let (operation, mutation, success) = match self.user_editor.payload() {
            Some(user) => (
                "update_user",
                form.to_update()
                    .map(|update| Mutation::UpdateUser { id: user.id, update }),
                "User updated",
            ),
            None => (
                "create_user",
                form.to_create().map(Mutation::CreateUser),
                "User created",
            ),
        };
        self.submit(&self.user_editor, operation, mutation, success)
            .await
    }

    pub async fn submit_package(
        &self,
        form: &PackageForm,
    ) -> Result<MutationResult, MutationError> {
        let (operation, mutation, success) = match self.package_editor.payload() {
            Some(package) => (
                "update_package",
                form.to_update().map(|update| Mutation::UpdatePackage {
                    id: package.id,
                    update,
                }),
                "Package updated",
            ),
            None => (
                "create_package",
                form.to_create().map(Mutation::CreatePackage),
                "Package created",
            ),
        };
        self.submit(&self.package_editor, operation, mutation, success)
            .await
    }

    pub async fn submit_class(&self, form: &ClassForm) -> Result<MutationResult, MutationError> {
        let (operation, mutation, success) = match self.class_editor.payload() {
            Some(class) => (
                "update_class",
                form.to_update().map(|update| Mutation::UpdateClass {
                    id: class.id,
                    update,
                }),
                "Class updated",
            ),
            None => (
                "create_class",
                form.to_create().map(Mutation::CreateClass),
                "Class created",
            ),
        };
        self.submit(&self.class_editor, operation, mutation, success)
            .await
    }

    pub async fn submit_schedule(
        &self,
        form: &ScheduleForm,
    ) -> Result<MutationResult, MutationError> {
        let (operation, mutation, success) = match self.schedule_editor.payload() {
            Some(schedule) => (
                "update_schedule",
                form.to_update().map(|update| Mutation::UpdateSchedule {
                    id: schedule.id,
                    update,
                }),
                "Schedule updated",
            ),
            None => (
                "create_schedule",
                form.to_create().map(Mutation::CreateSchedule),
                "Schedule created",
            ),
        };
        self.submit(&self.schedule_editor, operation, mutation, success)
            .await
    }

    async fn submit<R: Clone + Send + Sync>(
        &self,
        editor: &EditorStore<R>,
        operation: &'static str,
        mutation: Result<Mutation, CoreError>,
        success: &str,
    ) -> Result<MutationResult, MutationError> {
        let mutation = match mutation {
            Ok(mutation) => mutation,
            Err(e) => {
                let error = self.mutations.reject(operation, &e);
                self.notifications.error(error.message.clone());
                self.mutations.settle();
                return Err(error);
            }
        };

        let result = self.execute(mutation, success).await?;
        editor.close();
        self.refresh().await;
        Ok(result)
    }

    // ── Row actions ──────────────────────────────────────────────────

    pub async fn toggle_user_status(&self, user: &User) -> Result<MutationResult, MutationError> {
        let success = if user.active {
            "User deactivated"
        } else {
            "User activated"
        };
        self.act(Mutation::toggle_user(user), success).await
    }

    pub async fn toggle_package_status(
        &self,
        package: &Package,
    ) -> Result<MutationResult, MutationError> {
        let success = if package.active {
            "Package deactivated"
        } else {
            "Package activated"
        };
        self.act(Mutation::toggle_package(package), success).await
    }

    pub async fn toggle_class_status(
        &self,
        class: &StudioClass,
    ) -> Result<MutationResult, MutationError> {
        let success = if class.active {
            "Class deactivated"
        } else {
            "Class activated"
        };
        self.act(Mutation::toggle_class(class), success).await
    }

    pub async fn cancel_schedule(&self, id: u64) -> Result<MutationResult, MutationError> {
        self.act(Mutation::CancelSchedule { id }, "Schedule cancelled")
            .await
    }

    pub async fn assign_package(
        &self,
        request: AssignPackageRequest,
    ) -> Result<MutationResult, MutationError> {
        self.act(Mutation::AssignPackage(request), "Package assigned")
            .await
    }

    pub async fn remove_user_package(&self, id: u64) -> Result<MutationResult, MutationError> {
        self.act(Mutation::RemoveUserPackage { id }, "Package removed from user")
            .await
    }

    /// Gift `count` extra classes on a user package.
    pub async fn add_extra_classes(
        &self,
        user_package_id: u64,
        count: i32,
        reason: &str,
    ) -> Result<MutationResult, MutationError> {
        let mutation = Mutation::AdjustClasses {
            id: user_package_id,
            delta: count,
            reason: reason.to_owned(),
        };
        self.act(mutation, "Extra classes added").await
    }

    pub async fn mark_attendance(
        &self,
        reservation_id: u64,
        attended: bool,
    ) -> Result<MutationResult, MutationError> {
        let mutation = Mutation::MarkAttendance {
            id: reservation_id,
            attended,
        };
        self.act(mutation, "Attendance recorded").await
    }

    async fn act(
        &self,
        mutation: Mutation,
        success: &str,
    ) -> Result<MutationResult, MutationError> {
        let result = self.execute(mutation, success).await?;
        self.refresh().await;
        Ok(result)
    }

    /// Run one mutation and report its outcome on the banner.
    async fn execute(
        &self,
        mutation: Mutation,
        success: &str,
    ) -> Result<MutationResult, MutationError> {
        let outcome = self.mutations.execute(mutation).await;
        match &outcome {
            Ok(_) => self.notifications.success(success),
            Err(e) => self.notifications.error(e.message.clone()),
        }
        self.mutations.settle();
        outcome
    }

    // ── Filters ──────────────────────────────────────────────────────

    /// Apply server-side user filters and replace only the users slice.
    pub async fn apply_user_filter(&self, criteria: UserFilter) -> Result<usize, CoreError> {
        match self.user_filter.set_criteria(criteria).await {
            Ok(data) => {
                let count = data.len();
                self.aggregate.replace(ResourceName::Users, data);
                Ok(count)
            }
            Err(e) => {
                self.notifications
                    .error(e.server_message().unwrap_or("Failed to filter users"));
                Err(e)
            }
        }
    }

    /// Clear user filters and reload the unfiltered users slice.
    pub async fn reset_user_filter(&self) -> Result<usize, CoreError> {
        self.apply_user_filter(UserFilter::default()).await
    }
}

impl std::fmt::Debug for DashboardController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardController")
            .field("aggregate", &self.aggregate)
            .field("mutations", &self.mutations)
            .finish_non_exhaustive()
    }
}
