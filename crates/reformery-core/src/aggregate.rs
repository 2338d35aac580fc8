// ── AggregateLoader ──
//
// Fans out N independent resource loads, waits for every one of them to
// settle, and publishes one combined state. A single failure degrades
// that resource to its empty default; only a total failure sets `error`.
//
// Each invocation takes a generation number. A settlement whose
// generation is no longer the latest is discarded, so a slow refetch
// cannot overwrite the result of a newer one.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use chrono::{DateTime, Utc};
use futures_util::future::{BoxFuture, join_all};
use indexmap::IndexMap;
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::{CoreError, ErrorInfo};
use crate::fetcher::{ResourceFetcher, elapsed_ms};
use crate::resource::{Query, ResourceData, ResourceName};

/// One resource-loading call. Invoked once per aggregate load.
pub type ResourceLoader =
    Box<dyn Fn() -> BoxFuture<'static, Result<ResourceData, CoreError>> + Send + Sync>;

/// Combined state of every resource a screen needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregateState {
    /// Resource payloads in declaration order.
    pub resources: IndexMap<ResourceName, ResourceData>,
    /// True from invocation until the last load of the newest
    /// invocation has settled.
    pub loading: bool,
    /// Set only when every resource failed.
    pub error: Option<ErrorInfo>,
    /// Resources that failed in the last settled load.
    pub failures: IndexMap<ResourceName, ErrorInfo>,
    /// Generation of the load that produced this state.
    pub generation: u64,
    pub loaded_at: Option<DateTime<Utc>>,
}

impl AggregateState {
    pub fn get(&self, name: ResourceName) -> Option<&ResourceData> {
        self.resources.get(&name)
    }

    /// True when some, but not all, resources failed.
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty() && self.error.is_none()
    }
}

/// Loads a fixed, ordered set of resources concurrently.
pub struct AggregateLoader {
    loaders: Vec<(ResourceName, ResourceLoader)>,
    state: watch::Sender<AggregateState>,
    generation: AtomicU64,
}

impl AggregateLoader {
    pub fn new(loaders: Vec<(ResourceName, ResourceLoader)>) -> Self {
        let (state, _) = watch::channel(AggregateState::default());
        Self {
            loaders,
            state,
            generation: AtomicU64::new(0),
        }
    }

    /// Build loaders for `resources` backed by `fetcher`.
    pub fn from_fetcher(fetcher: &ResourceFetcher, resources: Vec<(ResourceName, Query)>) -> Self {
        Self::new(
            resources
                .into_iter()
                .map(|(name, query)| (name, fetcher.loader(name, query)))
                .collect(),
        )
    }

    /// Resource names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = ResourceName> + '_ {
        self.loaders.iter().map(|(name, _)| *name)
    }

    /// Current state snapshot.
    pub fn state(&self) -> AggregateState {
        self.state.borrow().clone()
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<AggregateState> {
        self.state.subscribe()
    }

    /// Load every resource.
    ///
    /// `loading` is raised, any previous `error` and `failures` are cleared,
    /// and every loader is issued before this returns the future; the future resolves only after all of them settle.
    /// Concurrent calls are not deduplicated.
    pub fn load(&self) -> impl Future<Output = AggregateState> + Send + '_ {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
            s.failures.clear();
        });
        debug!(generation, resources = self.loaders.len(), "aggregate load started");

        let started = Instant::now();
        let pending = join_all(self.loaders.iter().map(|(name, load)| {
            let name = *name;
            let fut = load();
            async move { (name, fut.await) }
        }));

        async move {
            let settled = pending.await;
            self.settle(generation, settled, started)
        }
    }

    /// Re-run the whole fan-out.
    pub fn refetch(&self) -> impl Future<Output = AggregateState> + Send + '_ {
        self.load()
    }

    /// Overwrite one resource slice without reloading the others.
    pub fn replace(&self, name: ResourceName, data: ResourceData) {
        self.state.send_modify(|s| {
            s.resources.insert(name, data);
            s.failures.shift_remove(&name);
        });
        debug!(resource = %name, "resource slice replaced");
    }

    fn settle(
        &self,
        generation: u64,
        settled: Vec<(ResourceName, Result<ResourceData, CoreError>)>,
        started: Instant,
    ) -> AggregateState {
        let latest = self.generation.load(Ordering::SeqCst);
        if generation != latest {
            warn!(generation, latest, "discarding stale aggregate settlement");
            return self.state();
        }

        let total = settled.len();
        let mut resources = IndexMap::with_capacity(total);
        let mut failures = IndexMap::new();

        for (name, outcome) in settled {
            match outcome {
                Ok(data) => {
                    resources.insert(name, data);
                }
                Err(e) => {
                    warn!(resource = %name, error = %e, "resource load failed, using empty default");
                    failures.insert(name, ErrorInfo::from(&e));
                    resources.insert(name, name.empty_default());
                }
            }
        }

        let error = (total > 0 && failures.len() == total).then(|| systemic_error(&failures));

        let next = AggregateState {
            resources,
            loading: false,
            error,
            failures,
            generation,
            loaded_at: Some(Utc::now()),
        };

        info!(
            generation,
            resources = total,
            failed = next.failures.len(),
            elapsed_ms = elapsed_ms(started),
            "aggregate load complete"
        );

        self.state.send_replace(next.clone());
        next
    }
}

/// Summary for a load in which nothing succeeded. Keeps the first
/// failure's status so an expired session is recognizable.
fn systemic_error(failures: &IndexMap<ResourceName, ErrorInfo>) -> ErrorInfo {
    let first = failures.values().next();
    ErrorInfo {
        message: match first {
            Some(info) => format!(
                "all {} resources failed to load: {}",
                failures.len(),
                info.message
            ),
            None => "all resources failed to load".into(),
        },
        status: first.and_then(|info| info.status),
        unauthorized: failures.values().any(|info| info.unauthorized),
    }
}

// ── Presets ─────────────────────────────────────────────────────────

/// Resources behind the admin dashboard.
pub fn admin_resources() -> Vec<(ResourceName, Query)> {
    vec![
        (ResourceName::Statistics, Query::new()),
        (ResourceName::Users, Query::new()),
        (ResourceName::Instructors, Query::new()),
        (ResourceName::Packages, Query::new()),
        (ResourceName::Classes, Query::new()),
        (ResourceName::Schedules, Query::new()),
    ]
}

/// Resources behind the client dashboard: the week ahead, own bookings
/// and own packages.
pub fn client_resources(today: chrono::NaiveDate) -> Vec<(ResourceName, Query)> {
    let week = crate::filter::ScheduleFilter::next_days(today, 7);
    vec![
        (
            ResourceName::PublicSchedules,
            crate::filter::FilterCriteria::to_query(&week),
        ),
        (ResourceName::MyReservations, Query::new()),
        (ResourceName::MyPackages, Query::new()),
    ]
}

/// Resources behind the instructor dashboard.
pub fn instructor_resources() -> Vec<(ResourceName, Query)> {
    vec![
        (ResourceName::MySchedules, Query::new()),
        (ResourceName::Students, Query::new()),
    ]
}

impl std::fmt::Debug for AggregateLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AggregateLoader")
            .field("resources", &self.names().collect::<Vec<_>>())
            .field("generation", &self.generation.load(Ordering::SeqCst))
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn ok_loader(data: ResourceData) -> ResourceLoader {
        Box::new(move || {
            let data = data.clone();
            Box::pin(async move { Ok(data) })
        })
    }

    #[tokio::test]
    async fn empty_loader_set_is_not_an_error() {
        let loader = AggregateLoader::new(Vec::new());
        let state = loader.load().await;
        assert!(!state.loading);
        assert!(state.error.is_none());
        assert!(state.resources.is_empty());
        assert_eq!(state.generation, 1);
    }

    #[tokio::test]
    async fn load_raises_loading_before_first_poll() {
        let loader = AggregateLoader::new(vec![(
            ResourceName::Packages,
            ok_loader(ResourceData::Packages(Vec::new())),
        )]);
        let fut = loader.load();
        assert!(loader.state().loading);
        let state = fut.await;
        assert!(!state.loading);
        assert!(!loader.state().loading);
    }

    #[tokio::test]
    async fn replace_clears_previous_failure() {
        let failing: ResourceLoader =
            Box::new(|| Box::pin(async { Err(CoreError::Internal("boom".into())) }));
        let loader = AggregateLoader::new(vec![
            (ResourceName::Users, failing),
            (
                ResourceName::Classes,
                ok_loader(ResourceData::Classes(Vec::new())),
            ),
        ]);
        let state = loader.load().await;
        assert!(state.is_partial());

        loader.replace(ResourceName::Users, ResourceData::Users(Vec::new()));
        let state = loader.state();
        assert!(state.failures.is_empty());
        assert_eq!(
            state.resources.keys().copied().collect::<Vec<_>>(),
            vec![ResourceName::Users, ResourceName::Classes]
        );
    }

    #[test]
    fn client_preset_scopes_public_schedules_to_a_week() {
        let today = chrono::NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let preset = client_resources(today);
        let (name, query) = &preset[0];
        assert_eq!(*name, ResourceName::PublicSchedules);
        assert_eq!(query.get("start_date"), Some("2026-10-18"));
        assert_eq!(query.get("end_date"), Some("2026-10-25"));
    }
}
