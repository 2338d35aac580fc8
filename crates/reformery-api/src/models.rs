// Studio API response types
//
// Typed schemas for everything the dashboards read. Optional server fields
// carry `#[serde(default)]` so one validation step at the client boundary
// replaces ad-hoc null handling downstream.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

// ── Envelope ────────────────────────────────────────────────────────

/// The `{ success, data, message }` wrapper around every response.
///
/// `success` defaults to `true` when the server omits it; `data` is `None`
/// when absent or `null`.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default = "default_true")]
    pub success: bool,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

fn default_true() -> bool {
    true
}

/// Body of a failed request. Servers put the human-readable text in one of
/// `message`, `error`, or `detail` (the latter only when it is a string).
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// Pull the first non-empty message out of a raw error body.
    pub fn extract(body: &str) -> Option<String> {
        let parsed: Self = serde_json::from_str(body).ok()?;
        let detail = match parsed.detail {
            Some(serde_json::Value::String(s)) => Some(s),
            _ => None,
        };
        [parsed.message, parsed.error, detail]
            .into_iter()
            .flatten()
            .find(|m| !m.trim().is_empty())
    }
}

// ── Users ───────────────────────────────────────────────────────────

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum UserRole {
    Admin,
    Instructor,
    #[default]
    #[serde(alias = "cliente")]
    #[strum(to_string = "client", serialize = "cliente")]
    Client,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub email: String,
    #[serde(default, alias = "name")]
    pub full_name: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default = "default_true", alias = "is_active")]
    pub active: bool,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl User {
    /// Display name, falling back to the email address.
    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.email)
    }
}

// ── Catalogue ───────────────────────────────────────────────────────

/// A purchasable bundle of class credits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub total_classes: Option<u32>,
    #[serde(default)]
    pub validity_days: Option<u32>,
    #[serde(default)]
    pub price: f64,
    #[serde(default = "default_true", alias = "is_active")]
    pub active: bool,
}

/// A class type offered by the studio (reformer, mat, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudioClass {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Minutes.
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub max_capacity: Option<u32>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub intensity_level: Option<String>,
    #[serde(default = "default_true", alias = "is_active")]
    pub active: bool,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ScheduleStatus {
    #[default]
    Scheduled,
    Cancelled,
    Completed,
}

/// One dated occurrence of a class with an instructor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: u64,
    #[serde(default)]
    pub class_id: Option<u64>,
    #[serde(default)]
    pub instructor_id: Option<u64>,
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default)]
    pub instructor_name: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub max_capacity: Option<u32>,
    #[serde(default)]
    pub current_reservations: Option<u32>,
    #[serde(default)]
    pub status: ScheduleStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

// ── Enrollment ──────────────────────────────────────────────────────

/// A package assigned to (or bought by) a user, with its credit balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPackage {
    pub id: u64,
    #[serde(default)]
    pub user_id: Option<u64>,
    #[serde(default)]
    pub package_id: Option<u64>,
    #[serde(default)]
    pub package_name: Option<String>,
    #[serde(default)]
    pub remaining_classes: Option<i32>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub expiry_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: u64,
    #[serde(default)]
    pub user_id: Option<u64>,
    #[serde(default)]
    pub schedule_id: Option<u64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub attended: Option<bool>,
    #[serde(default)]
    pub created_at: Option<String>,
}

// ── Statistics ──────────────────────────────────────────────────────

/// `GET /admin/statistics`. Every group defaults to zeros, which is also
/// what a failed statistics load degrades to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    #[serde(default)]
    pub users: UserStats,
    #[serde(default)]
    pub packages: PackageStats,
    #[serde(default)]
    pub classes: ClassStats,
    #[serde(default)]
    pub schedules: ScheduleStats,
    #[serde(default)]
    pub reservations: ReservationStats,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserStats {
    pub total: u64,
    pub clients: u64,
    pub instructors: u64,
    pub active: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageStats {
    pub total: u64,
    pub active: u64,
    pub assigned: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassStats {
    pub total: u64,
    pub active: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleStats {
    pub total: u64,
    pub scheduled: u64,
    pub cancelled: u64,
    pub completed: u64,
    pub active_this_month: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReservationStats {
    pub total: u64,
    pub confirmed: u64,
    pub cancelled: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevenueStats {
    pub total: f64,
}

/// Raw `GET /admin/stats` payload (nested groups, all optional).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SummaryPayload {
    pub users: UserStats,
    pub packages: PackageStats,
    pub classes: ClassStats,
    pub schedules: ScheduleStats,
    pub reservations: ReservationStats,
    pub revenue: RevenueStats,
}

/// Flattened headline numbers shown above the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_users: u64,
    pub active_packages: u64,
    pub scheduled_classes: u64,
    pub active_schedules: u64,
    pub total_reservations: u64,
    pub total_revenue: f64,
}

impl From<SummaryPayload> for DashboardSummary {
    fn from(p: SummaryPayload) -> Self {
        Self {
            total_users: p.users.total,
            active_packages: p.packages.active,
            scheduled_classes: p.classes.total,
            active_schedules: p.schedules.active_this_month,
            total_reservations: p.reservations.total,
            total_revenue: p.revenue.total,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn error_body_prefers_message_then_error_then_detail() {
        assert_eq!(
            ErrorBody::extract(r#"{"message":"Paquete duplicado","error":"x"}"#).as_deref(),
            Some("Paquete duplicado")
        );
        assert_eq!(
            ErrorBody::extract(r#"{"message":"","error":"Bad input"}"#).as_deref(),
            Some("Bad input")
        );
        assert_eq!(
            ErrorBody::extract(r#"{"detail":"Email already registered"}"#).as_deref(),
            Some("Email already registered")
        );
        assert_eq!(ErrorBody::extract(r#"{"detail":[{"loc":["body"]}]}"#), None);
        assert_eq!(ErrorBody::extract("<html>502</html>"), None);
    }

    #[test]
    fn user_accepts_is_active_and_cliente_role() {
        let user: User = serde_json::from_value(json!({
            "id": 3,
            "email": "ana@example.com",
            "role": "cliente",
            "is_active": false
        }))
        .unwrap();
        assert_eq!(user.role, UserRole::Client);
        assert!(!user.active);
        assert_eq!(user.display_name(), "ana@example.com");
    }

    #[test]
    fn role_parses_case_insensitively() {
        assert_eq!("Instructor".parse::<UserRole>().unwrap(), UserRole::Instructor);
        assert_eq!(UserRole::Client.to_string(), "client");
    }

    #[test]
    fn envelope_with_null_data() {
        let env: ApiEnvelope<Vec<Package>> =
            serde_json::from_str(r#"{"success":true,"data":null}"#).unwrap();
        assert!(env.success);
        assert!(env.data.is_none());
    }

    #[test]
    fn summary_flattens_nested_groups() {
        let payload: SummaryPayload = serde_json::from_value(json!({
            "users": { "total": 40 },
            "packages": { "active": 6 },
            "schedules": { "active_this_month": 12 },
            "revenue": { "total": 1520.5 }
        }))
        .unwrap();
        let summary = DashboardSummary::from(payload);
        assert_eq!(summary.total_users, 40);
        assert_eq!(summary.active_packages, 6);
        assert_eq!(summary.active_schedules, 12);
        assert_eq!(summary.scheduled_classes, 0);
        assert!((summary.total_revenue - 1520.5).abs() < f64::EPSILON);
    }
}
