use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{Editable, HasStats, Resource};
use crate::{
    AuditRef, EntityId, Priority,
    requests::{FieldErrors, Validate},
    responses::AnnouncementStats,
};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum AnnouncementStatus {
    #[default]
    #[display("draft")]
    Draft,
    #[display("published")]
    Published,
    #[display("archived")]
    Archived,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: EntityId,
    pub title: String,
    pub description: String,
    pub link: String,
    pub status: AnnouncementStatus,
    #[serde(default)]
    pub priority: Priority,
    pub is_active: bool,
    pub published_at: Option<Timestamp>,
    pub expires_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub created_by: Option<AuditRef>,
    pub updated_by: Option<AuditRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementFilters {
    pub status: Option<AnnouncementStatus>,
    pub priority: Option<Priority>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementDraft {
    pub title: String,
    pub description: String,
    pub link: String,
    pub status: AnnouncementStatus,
    pub priority: Priority,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<Timestamp>,
}

impl Default for AnnouncementDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            link: String::new(),
            status: AnnouncementStatus::Draft,
            priority: Priority::Medium,
            is_active: true,
            published_at: None,
            expires_at: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AnnouncementStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<Timestamp>,
}

fn check_title(errors: &mut FieldErrors, title: &str) {
    errors.text("title", "Title", title, 5, 200);
}

fn check_description(errors: &mut FieldErrors, description: &str) {
    errors.text("description", "Description", description, 10, 1000);
}

impl Validate for AnnouncementDraft {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        check_title(&mut errors, &self.title);
        check_description(&mut errors, &self.description);
        errors.url("link", "Link", &self.link);
        errors.into_result()
    }
}

impl Validate for AnnouncementPatch {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        if let Some(title) = &self.title {
            check_title(&mut errors, title);
        }
        if let Some(description) = &self.description {
            check_description(&mut errors, description);
        }
        if let Some(link) = &self.link {
            errors.url("link", "Link", link);
        }
        errors.into_result()
    }
}

impl Resource for Announcement {
    const PATH: &'static str = "announcement";
    const COLLECTION_KEY: &'static str = "announcements";
    const ITEM_KEY: &'static str = "announcement";
    const LABEL: &'static str = "announcement";

    type Filters = AnnouncementFilters;
    type Draft = AnnouncementDraft;

    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl Editable for Announcement {
    type Patch = AnnouncementPatch;
}

impl HasStats for Announcement {
    type Stats = AnnouncementStats;
}
