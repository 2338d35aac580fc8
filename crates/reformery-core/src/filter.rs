// ── FilterController ──
//
// Holds user-entered criteria for one resource and re-fetches only that
// resource when they change. Filtering happens on the server; the
// response replaces the locally held list as-is.

use chrono::{Duration, NaiveDate};
use reformery_api::models::UserRole;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::debug;

use crate::error::CoreError;
use crate::fetcher::ResourceFetcher;
use crate::resource::{Query, ResourceData, ResourceName};

/// Criteria that can be serialized into a scoped resource query.
pub trait FilterCriteria: Clone + Default + Send + Sync + 'static {
    /// The resource these criteria narrow.
    fn resource(&self) -> ResourceName;

    /// Request parameters; unset fields are omitted.
    fn to_query(&self) -> Query;
}

/// Server-side filters for the user list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserFilter {
    pub role: Option<UserRole>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub active: Option<bool>,
    pub created_at: Option<NaiveDate>,
}

impl FilterCriteria for UserFilter {
    fn resource(&self) -> ResourceName {
        ResourceName::Users
    }

    fn to_query(&self) -> Query {
        let mut query = Query::new();
        if let Some(role) = self.role {
            query.push("role", role.to_string());
        }
        if let Some(email) = &self.email {
            query.push("email", email.as_str());
        }
        if let Some(name) = &self.name {
            query.push("name", name.as_str());
        }
        if let Some(active) = self.active {
            query.push("active", if active { "1" } else { "0" });
        }
        if let Some(created_at) = self.created_at {
            query.push("created_at", created_at.to_string());
        }
        query
    }
}

/// Date window for the public timetable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ScheduleFilter {
    /// `[start, start + days]`.
    pub fn next_days(start: NaiveDate, days: i64) -> Self {
        Self {
            start_date: Some(start),
            end_date: start.checked_add_signed(Duration::days(days)),
        }
    }
}

impl FilterCriteria for ScheduleFilter {
    fn resource(&self) -> ResourceName {
        ResourceName::PublicSchedules
    }

    fn to_query(&self) -> Query {
        let mut query = Query::new();
        if let Some(start) = self.start_date {
            query.push("start_date", start.to_string());
        }
        if let Some(end) = self.end_date {
            query.push("end_date", end.to_string());
        }
        query
    }
}

/// Owns the criteria for one filterable resource.
pub struct FilterController<C> {
    fetcher: ResourceFetcher,
    criteria: watch::Sender<C>,
}

impl<C: FilterCriteria> FilterController<C> {
    pub fn new(fetcher: ResourceFetcher) -> Self {
        let (criteria, _) = watch::channel(C::default());
        Self { fetcher, criteria }
    }

    pub fn criteria(&self) -> C {
        self.criteria.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<C> {
        self.criteria.subscribe()
    }

    /// Replace the criteria wholesale and fetch the filtered resource once.
    pub async fn set_criteria(&self, criteria: C) -> Result<ResourceData, CoreError> {
        let resource = criteria.resource();
        let query = criteria.to_query();
        self.criteria.send_replace(criteria);
        debug!(resource = %resource, ?query, "applying filter");
        self.fetcher.fetch(resource, &query).await
    }

    /// Restore default criteria and fetch the unfiltered resource.
    pub async fn reset(&self) -> Result<ResourceData, CoreError> {
        self.set_criteria(C::default()).await
    }
}

impl<C: std::fmt::Debug> std::fmt::Debug for FilterController<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterController")
            .field("criteria", &*self.criteria.borrow())
            .finish_non_exhaustive()
    }
}
