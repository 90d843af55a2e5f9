use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{Editable, HasStats, Resource};
use crate::{
    AuditRef, EntityId, Priority,
    requests::{FieldErrors, Validate},
    responses::ContactStats,
};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum ContactStatus {
    #[default]
    New,
    InProgress,
    Responded,
    Closed,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ContactSource {
    #[default]
    Website,
    Email,
    Phone,
    Referral,
    Other,
}

/// A message left through the public contact form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    pub id: EntityId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub organization: Option<String>,
    pub subject: String,
    pub message: String,
    #[serde(default)]
    pub subscribe_newsletter: bool,
    pub status: ContactStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub source: ContactSource,
    pub submitted_at: Timestamp,
    pub responded_at: Option<Timestamp>,
    pub response: Option<String>,
    pub responded_by: Option<AuditRef>,
}

impl ContactSubmission {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactFilters {
    pub status: Option<ContactStatus>,
    pub priority: Option<Priority>,
    pub source: Option<ContactSource>,
    /// `YYYY-MM-DD`, inclusive.
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    pub subject: String,
    pub message: String,
    pub subscribe_newsletter: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<ContactSource>,
}

impl Validate for ContactDraft {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        errors.require("firstName", &self.first_name);
        errors.require("lastName", &self.last_name);
        errors.require("email", &self.email);
        errors.require("subject", &self.subject);
        errors.require("message", &self.message);
        errors.into_result()
    }
}

/// Triage update made by an admin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ContactStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
}

impl Validate for ContactPatch {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        if let Some(response) = &self.response {
            errors.require("response", response);
        }
        errors.into_result()
    }
}

impl Resource for ContactSubmission {
    const PATH: &'static str = "contact";
    const COLLECTION_KEY: &'static str = "contacts";
    const ITEM_KEY: &'static str = "contact";
    const LABEL: &'static str = "contact submission";

    type Filters = ContactFilters;
    type Draft = ContactDraft;

    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl Editable for ContactSubmission {
    type Patch = ContactPatch;
}

impl HasStats for ContactSubmission {
    type Stats = ContactStats;

    fn stats_path() -> String {
        "contact/stats".to_string()
    }
}
