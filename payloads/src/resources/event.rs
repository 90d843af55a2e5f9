use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{Editable, HasStats, Resource};
use crate::{
    EntityId,
    requests::{FieldErrors, Validate},
    responses::EventStats,
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
#[serde(rename_all = "kebab-case")]
pub enum EventType {
    #[default]
    #[display("workshop")]
    Workshop,
    #[display("seminar")]
    Seminar,
    #[display("webinar")]
    Webinar,
    #[display("outreach")]
    Outreach,
    #[display("collaboration")]
    Collaboration,
    #[display("hackathon")]
    Hackathon,
    #[display("capacity-building")]
    CapacityBuilding,
    #[display("calendar-event")]
    CalendarEvent,
    #[display("past-event")]
    PastEvent,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    #[default]
    Upcoming,
    Ongoing,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventMode {
    #[serde(rename = "In-person")]
    InPerson,
    Online,
    Hybrid,
}

/// Free-text details that only apply to some event types.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participants: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partners: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objective: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prizes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teams: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sessions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certification: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eligibility: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modules: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EntityId,
    pub title: String,
    pub description: String,
    /// Calendar date as entered, e.g. `2025-03-14`.
    pub date: String,
    #[serde(rename = "type")]
    pub kind: EventType,
    pub venue: Option<String>,
    pub speaker: Option<String>,
    pub mode: Option<EventMode>,
    #[serde(flatten)]
    pub details: EventDetails,
    pub status: EventStatus,
    pub is_active: Option<bool>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFilters {
    #[serde(rename = "type")]
    pub kind: Option<EventType>,
    pub status: Option<EventStatus>,
    pub is_active: Option<bool>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: EventType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<EventMode>,
    #[serde(flatten)]
    pub details: EventDetails,
    pub status: EventStatus,
}

impl Validate for EventDraft {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        errors.require("title", &self.title);
        errors.require("description", &self.description);
        errors.require("date", &self.date);
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<EventType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<EventMode>,
    #[serde(flatten)]
    pub details: EventDetails,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EventStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl Validate for EventPatch {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        for (field, value) in [
            ("title", &self.title),
            ("description", &self.description),
            ("date", &self.date),
        ] {
            if let Some(value) = value {
                errors.require(field, value);
            }
        }
        errors.into_result()
    }
}

impl Resource for Event {
    const PATH: &'static str = "event";
    const COLLECTION_KEY: &'static str = "events";
    const ITEM_KEY: &'static str = "event";
    const LABEL: &'static str = "event";

    type Filters = EventFilters;
    type Draft = EventDraft;

    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl Editable for Event {
    type Patch = EventPatch;
}

impl HasStats for Event {
    type Stats = EventStats;
}
