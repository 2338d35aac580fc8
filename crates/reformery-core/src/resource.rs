// ── Named resources ──
//
// A resource is one independently loadable collection of server-held
// records. `ResourceName` identifies it, `ResourceData` carries its typed
// payload, and `Query` holds the optional request parameters.

use reformery_api::models::{
    Package, Reservation, Schedule, Statistics, StudioClass, User, UserPackage,
};
use serde::Serialize;
use strum::{Display, EnumIter, EnumString};

use crate::error::ErrorInfo;

/// Outcome of one resource read, as recorded in published state.
pub type ResourceOutcome<T> = Result<T, ErrorInfo>;

/// Every resource a dashboard can load.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, EnumIter,
    Serialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ResourceName {
    Statistics,
    Users,
    /// Users narrowed to `role=instructor`.
    Instructors,
    Packages,
    Classes,
    Schedules,
    UserPackages,
    Reservations,
    /// Bookable schedules shown to clients.
    PublicSchedules,
    /// Schedules taught by the signed-in instructor.
    MySchedules,
    MyReservations,
    MyPackages,
    /// Students of the signed-in instructor.
    Students,
}

impl ResourceName {
    /// The value a resource degrades to when its load fails.
    pub fn empty_default(self) -> ResourceData {
        match self {
            Self::Statistics => ResourceData::Statistics(Statistics::default()),
            Self::Users | Self::Instructors | Self::Students => ResourceData::Users(Vec::new()),
            Self::Packages => ResourceData::Packages(Vec::new()),
            Self::Classes => ResourceData::Classes(Vec::new()),
            Self::Schedules | Self::PublicSchedules | Self::MySchedules => {
                ResourceData::Schedules(Vec::new())
            }
            Self::UserPackages | Self::MyPackages => ResourceData::UserPackages(Vec::new()),
            Self::Reservations | Self::MyReservations => ResourceData::Reservations(Vec::new()),
        }
    }
}

/// Typed payload of one resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResourceData {
    Statistics(Statistics),
    Users(Vec<User>),
    Packages(Vec<Package>),
    Classes(Vec<StudioClass>),
    Schedules(Vec<Schedule>),
    UserPackages(Vec<UserPackage>),
    Reservations(Vec<Reservation>),
}

impl ResourceData {
    /// Number of records (statistics count as one).
    pub fn len(&self) -> usize {
        match self {
            Self::Statistics(_) => 1,
            Self::Users(v) => v.len(),
            Self::Packages(v) => v.len(),
            Self::Classes(v) => v.len(),
            Self::Schedules(v) => v.len(),
            Self::UserPackages(v) => v.len(),
            Self::Reservations(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_statistics(&self) -> Option<&Statistics> {
        match self {
            Self::Statistics(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_users(&self) -> Option<&[User]> {
        match self {
            Self::Users(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_packages(&self) -> Option<&[Package]> {
        match self {
            Self::Packages(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_classes(&self) -> Option<&[StudioClass]> {
        match self {
            Self::Classes(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_schedules(&self) -> Option<&[Schedule]> {
        match self {
            Self::Schedules(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_user_packages(&self) -> Option<&[UserPackage]> {
        match self {
            Self::UserPackages(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_reservations(&self) -> Option<&[Reservation]> {
        match self {
            Self::Reservations(v) => Some(v),
            _ => None,
        }
    }
}

// ── Query parameters ────────────────────────────────────────────────

/// Ordered request parameters. Empty values mean "no constraint" and are
/// dropped when the request is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style `push`.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(key, value);
        self
    }

    /// Set `key`, replacing any earlier value. Blank values are ignored.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        self.pairs.retain(|(k, _)| *k != key);
        if !value.trim().is_empty() {
            self.pairs.push((key, value.trim().to_owned()));
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Borrowed form expected by the API client.
    pub(crate) fn to_pairs(&self) -> Vec<(&str, String)> {
        self.pairs
            .iter()
            .map(|(k, v)| (k.as_str(), v.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn every_resource_has_an_empty_default() {
        for name in ResourceName::iter() {
            let empty = name.empty_default();
            match name {
                ResourceName::Statistics => assert_eq!(empty.len(), 1),
                _ => assert!(empty.is_empty(), "{name} default should be empty"),
            }
        }
    }

    #[test]
    fn names_are_kebab_case() {
        assert_eq!(ResourceName::UserPackages.to_string(), "user-packages");
        assert_eq!(
            "public-schedules".parse::<ResourceName>().ok(),
            Some(ResourceName::PublicSchedules)
        );
    }

    #[test]
    fn query_drops_blank_values_and_replaces_keys() {
        let mut query = Query::new().with("role", "client").with("email", "  ");
        query.push("role", "instructor");
        assert_eq!(query.get("role"), Some("instructor"));
        assert_eq!(query.get("email"), None);
        assert_eq!(query.iter().count(), 1);

        query.push("role", "");
        assert!(query.is_empty());
    }
}
