// ── ResourceFetcher ──
//
// One named remote read per call. Payloads are validated against the
// typed schemas at this boundary; absent `data` has already become an
// empty collection in the API client.

use std::sync::Arc;
use std::time::Instant;

use reformery_api::ApiClient;
use tracing::debug;

use crate::aggregate::ResourceLoader;
use crate::error::{CoreError, ErrorInfo};
use crate::resource::{Query, ResourceData, ResourceName, ResourceOutcome};

/// Performs single resource reads against the studio API.
#[derive(Clone)]
pub struct ResourceFetcher {
    client: Arc<ApiClient>,
}

impl ResourceFetcher {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    /// Read one resource.
    ///
    /// `Instructors` always carries `role=instructor`; other parameters in
    /// `query` are forwarded where the endpoint accepts them.
    pub async fn fetch(&self, name: ResourceName, query: &Query) -> Result<ResourceData, CoreError> {
        let started = Instant::now();
        let client = &self.client;

        let data = match name {
            ResourceName::Statistics => ResourceData::Statistics(client.statistics().await?),
            ResourceName::Users => ResourceData::Users(client.list_users(&query.to_pairs()).await?),
            ResourceName::Instructors => {
                let scoped = query.clone().with("role", "instructor");
                ResourceData::Users(client.list_users(&scoped.to_pairs()).await?)
            }
            ResourceName::Packages => ResourceData::Packages(client.list_packages().await?),
            ResourceName::Classes => ResourceData::Classes(client.list_classes().await?),
            ResourceName::Schedules => ResourceData::Schedules(client.list_schedules().await?),
            ResourceName::UserPackages => {
                let packages = match query.get("user_id").map(str::parse::<u64>) {
                    Some(Ok(user_id)) => client.list_user_packages_for(user_id).await?,
                    Some(Err(_)) => {
                        return Err(CoreError::ValidationFailed {
                            message: "user_id must be a numeric id".into(),
                        });
                    }
                    None => client.list_user_packages().await?,
                };
                ResourceData::UserPackages(packages)
            }
            ResourceName::Reservations => {
                let reservations = match query.get("schedule_id").map(str::parse::<u64>) {
                    Some(Ok(schedule_id)) => {
                        client.list_reservations_for_schedule(schedule_id).await?
                    }
                    Some(Err(_)) => {
                        return Err(CoreError::ValidationFailed {
                            message: "schedule_id must be a numeric id".into(),
                        });
                    }
                    None => client.list_reservations().await?,
                };
                ResourceData::Reservations(reservations)
            }
            ResourceName::PublicSchedules => {
                ResourceData::Schedules(client.list_public_schedules(&query.to_pairs()).await?)
            }
            ResourceName::MySchedules => ResourceData::Schedules(client.list_my_schedules().await?),
            ResourceName::MyReservations => {
                ResourceData::Reservations(client.list_my_reservations().await?)
            }
            ResourceName::MyPackages => ResourceData::UserPackages(client.list_my_packages().await?),
            ResourceName::Students => ResourceData::Users(client.list_students().await?),
        };

        debug!(
            resource = %name,
            records = data.len(),
            elapsed_ms = elapsed_ms(started),
            "resource fetched"
        );
        Ok(data)
    }

    /// Like [`fetch`](Self::fetch), with the failure folded into a
    /// cloneable [`ErrorInfo`].
    pub async fn fetch_outcome(
        &self,
        name: ResourceName,
        query: &Query,
    ) -> ResourceOutcome<ResourceData> {
        self.fetch(name, query).await.map_err(ErrorInfo::from)
    }

    /// A reusable loader for `name`, for use in an `AggregateLoader`.
    pub fn loader(&self, name: ResourceName, query: Query) -> ResourceLoader {
        let fetcher = self.clone();
        Box::new(move || {
            let fetcher = fetcher.clone();
            let query = query.clone();
            Box::pin(async move { fetcher.fetch(name, &query).await })
        })
    }
}

/// Milliseconds since `started`, saturating.
pub(crate) fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

impl std::fmt::Debug for ResourceFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceFetcher")
            .field("base_url", &self.client.base_url().as_str())
            .finish()
    }
}
