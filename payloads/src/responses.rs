use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    EntityId,
    resources::application::{
        ApplicationProgress, ApplicationStatus, CompanyStatus,
    },
};

/// The wrapper every backend response comes in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T = Value> {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
    pub errors: Option<Vec<String>>,
}

impl<T> ApiEnvelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: String::new(),
            data: Some(data),
            errors: None,
        }
    }
}

impl ApiEnvelope<Value> {
    /// Take `data.<key>` out of the envelope.
    pub fn take(&mut self, key: &str) -> Option<Value> {
        match self.data.as_mut()? {
            Value::Object(fields) => fields.remove(key),
            _ => None,
        }
    }

    /// Decode `data` as `T`, treating a missing payload as `null`.
    pub fn decode_data<T: DeserializeOwned>(
        self,
    ) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.data.unwrap_or(Value::Null))
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    #[display("admin")]
    Admin,
    #[display("super_admin")]
    SuperAdmin,
    #[display("reviewer")]
    Reviewer,
    #[display("applicant")]
    Applicant,
}

impl UserRole {
    /// Admin accounts change their password through the admin routes.
    pub fn is_admin(self) -> bool {
        matches!(self, UserRole::Admin | UserRole::SuperAdmin)
    }
}

/// The signed-in account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: EntityId,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(default = "active")]
    pub is_active: bool,
    pub last_login: Option<Timestamp>,
}

fn active() -> bool {
    true
}

impl User {
    /// Decode a raw user record, accepting `_id` in place of `id`.
    pub fn from_raw(mut raw: Value) -> Result<Self, serde_json::Error> {
        crate::resources::normalize_id(&mut raw);
        serde_json::from_value(raw)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEnvelope {
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnouncementStats {
    pub total: u64,
    pub published: u64,
    pub draft: u64,
    pub archived: u64,
    pub active: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCount {
    #[serde(rename = "_id")]
    pub kind: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EventStats {
    pub total: u64,
    pub upcoming: u64,
    pub type_distribution: Vec<TypeCount>,
}

impl EventStats {
    /// Count for one event type, zero when the type is absent.
    pub fn count_of(&self, kind: impl std::fmt::Display) -> u64 {
        let kind = kind.to_string();
        self.type_distribution
            .iter()
            .find(|t| t.kind == kind)
            .map_or(0, |t| t.count)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactStats {
    pub total: u64,
    pub new: u64,
    pub in_progress: u64,
    pub responded: u64,
    pub closed: u64,
}

/// Counters shown above the application lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApplicationStats {
    pub total: u64,
    pub active: u64,
    pub graduated: u64,
    pub exited: u64,
    pub submitted: u64,
    pub under_review: u64,
    pub approved: u64,
    pub incubated: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_funding: Decimal,
    pub total_employees: u64,
}

impl ApplicationStats {
    /// Compute the counters from a loaded list.
    pub fn summarize<A: AsRef<ApplicationProgress>>(applications: &[A]) -> Self {
        let mut stats = Self::default();
        for progress in applications.iter().map(AsRef::as_ref) {
            stats.total += 1;
            match progress.status {
                CompanyStatus::Active => stats.active += 1,
                CompanyStatus::Graduated => stats.graduated += 1,
                CompanyStatus::Exited => stats.exited += 1,
                CompanyStatus::Inactive => {}
            }
            match progress.application_status {
                ApplicationStatus::Submitted => stats.submitted += 1,
                ApplicationStatus::UnderReview => stats.under_review += 1,
                ApplicationStatus::Approved => stats.approved += 1,
                ApplicationStatus::Incubated => stats.incubated += 1,
                _ => {}
            }
            stats.total_funding +=
                progress.funding_received.unwrap_or_default();
            stats.total_employees += u64::from(progress.employees.unwrap_or(0));
        }
        stats
    }
}

/// Stats payloads come either as `data.stats` or directly as `data`.
pub(crate) fn unwrap_stats(data: Option<Value>) -> Value {
    match data {
        Some(Value::Object(mut fields)) => match fields.remove("stats") {
            Some(stats @ Value::Object(_)) => stats,
            _ => Value::Object(fields),
        },
        Some(other) => other,
        None => Value::Null,
    }
}
