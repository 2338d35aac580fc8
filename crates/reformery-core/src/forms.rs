// ── Editor forms ──
//
// What a user submits from an editor. The same form feeds both modes:
// the editor's payload decides whether it becomes a create or an update
// request.

use chrono::{NaiveDate, NaiveTime};
use reformery_api::models::{ScheduleStatus, UserRole};
use reformery_api::requests::{
    CreateClassRequest, CreatePackageRequest, CreateScheduleRequest, CreateUserRequest,
    UpdateClassRequest, UpdatePackageRequest, UpdateScheduleRequest, UpdateUserRequest,
};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

fn invalid(message: &str) -> CoreError {
    CoreError::ValidationFailed {
        message: message.into(),
    }
}

/// Trim and drop blank strings.
fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

// ── Users ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserForm {
    pub email: String,
    /// Required when creating; left blank on edit to keep the current one.
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub active: Option<bool>,
}

impl UserForm {
    pub fn to_create(&self) -> Result<CreateUserRequest, CoreError> {
        let email = self.email.trim();
        if email.is_empty() {
            return Err(invalid("email is required"));
        }
        let password =
            non_blank(self.password.as_deref()).ok_or_else(|| invalid("password is required"))?;
        Ok(CreateUserRequest {
            email: email.to_owned(),
            password,
            full_name: non_blank(self.full_name.as_deref()),
            phone: non_blank(self.phone.as_deref()),
            role: self.role,
        })
    }

    pub fn to_update(&self) -> Result<UpdateUserRequest, CoreError> {
        let email = self.email.trim();
        if email.is_empty() {
            return Err(invalid("email is required"));
        }
        Ok(UpdateUserRequest {
            email: Some(email.to_owned()),
            full_name: non_blank(self.full_name.as_deref()),
            phone: non_blank(self.phone.as_deref()),
            role: Some(self.role),
            active: self.active,
            password: non_blank(self.password.as_deref()),
        })
    }
}

// ── Packages ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageForm {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub total_classes: u32,
    pub validity_days: u32,
    pub price: f64,
    #[serde(default = "default_true")]
    pub active: bool,
}

impl PackageForm {
    fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(invalid("package name is required"));
        }
        if self.total_classes == 0 {
            return Err(invalid("a package must include at least one class"));
        }
        if self.validity_days == 0 {
            return Err(invalid("validity must be at least one day"));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(invalid("price must be zero or positive"));
        }
        Ok(())
    }

    pub fn to_create(&self) -> Result<CreatePackageRequest, CoreError> {
        self.validate()?;
        Ok(CreatePackageRequest {
            name: self.name.trim().to_owned(),
            description: non_blank(self.description.as_deref()),
            total_classes: self.total_classes,
            validity_days: self.validity_days,
            price: self.price,
            active: self.active,
        })
    }

    pub fn to_update(&self) -> Result<UpdatePackageRequest, CoreError> {
        self.validate()?;
        Ok(UpdatePackageRequest {
            name: Some(self.name.trim().to_owned()),
            description: non_blank(self.description.as_deref()),
            total_classes: Some(self.total_classes),
            validity_days: Some(self.validity_days),
            price: Some(self.price),
            active: Some(self.active),
        })
    }
}

// ── Classes ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassForm {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_duration")]
    pub duration: u32,
    #[serde(default = "default_capacity")]
    pub max_capacity: u32,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub intensity_level: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
}

impl ClassForm {
    fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(invalid("class name is required"));
        }
        if self.duration == 0 || self.max_capacity == 0 {
            return Err(invalid("duration and capacity must be positive"));
        }
        Ok(())
    }

    pub fn to_create(&self) -> Result<CreateClassRequest, CoreError> {
        self.validate()?;
        Ok(CreateClassRequest {
            name: self.name.trim().to_owned(),
            description: non_blank(self.description.as_deref()),
            duration: self.duration,
            max_capacity: self.max_capacity,
            category: non_blank(self.category.as_deref()),
            intensity_level: non_blank(self.intensity_level.as_deref()),
            active: self.active,
        })
    }

    pub fn to_update(&self) -> Result<UpdateClassRequest, CoreError> {
        self.validate()?;
        Ok(UpdateClassRequest {
            name: Some(self.name.trim().to_owned()),
            description: non_blank(self.description.as_deref()),
            duration: Some(self.duration),
            max_capacity: Some(self.max_capacity),
            category: non_blank(self.category.as_deref()),
            intensity_level: non_blank(self.intensity_level.as_deref()),
            active: Some(self.active),
        })
    }
}

// ── Schedules ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleForm {
    pub class_id: u64,
    pub instructor_id: u64,
    pub date: NaiveDate,
    /// `HH:MM`
    pub start_time: String,
    /// `HH:MM`
    pub end_time: String,
    #[serde(default = "default_capacity")]
    pub max_capacity: u32,
    #[serde(default)]
    pub notes: Option<String>,
    /// Only honoured on edit.
    #[serde(default)]
    pub status: Option<ScheduleStatus>,
}

impl ScheduleForm {
    fn validate(&self) -> Result<(), CoreError> {
        let start = parse_time(&self.start_time)?;
        let end = parse_time(&self.end_time)?;
        if end <= start {
            return Err(invalid("end time must be after start time"));
        }
        if self.max_capacity == 0 {
            return Err(invalid("capacity must be positive"));
        }
        Ok(())
    }

    pub fn to_create(&self) -> Result<CreateScheduleRequest, CoreError> {
        self.validate()?;
        Ok(CreateScheduleRequest {
            class_id: self.class_id,
            instructor_id: self.instructor_id,
            date: self.date,
            start_time: self.start_time.trim().to_owned(),
            end_time: self.end_time.trim().to_owned(),
            max_capacity: self.max_capacity,
            notes: non_blank(self.notes.as_deref()),
        })
    }

    pub fn to_update(&self) -> Result<UpdateScheduleRequest, CoreError> {
        self.validate()?;
        Ok(UpdateScheduleRequest {
            class_id: Some(self.class_id),
            instructor_id: Some(self.instructor_id),
            date: Some(self.date),
            start_time: Some(self.start_time.trim().to_owned()),
            end_time: Some(self.end_time.trim().to_owned()),
            max_capacity: Some(self.max_capacity),
            status: self.status,
            notes: non_blank(self.notes.as_deref()),
        })
    }
}

fn parse_time(value: &str) -> Result<NaiveTime, CoreError> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| CoreError::ValidationFailed {
            message: format!("invalid time '{value}', expected HH:MM"),
        })
}

fn default_true() -> bool {
    true
}

fn default_duration() -> u32 {
    50
}

fn default_capacity() -> u32 {
    10
}
