use serde::{Deserialize, Serialize};

use super::{Editable, Resource, null_as_default};
use crate::{
    EntityId,
    requests::{FieldErrors, Validate},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub id: EntityId,
    pub title: String,
    pub duration: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bullets: Vec<String>,
    pub is_active: Option<bool>,
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramFilters {
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramDraft {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    pub bullets: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

fn check_bullets(errors: &mut FieldErrors, bullets: &[String]) {
    if bullets.iter().all(|bullet| bullet.trim().is_empty()) {
        errors.add("bullets", "Please add at least one bullet point");
    }
}

impl Validate for ProgramDraft {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        errors.require("title", &self.title);
        check_bullets(&mut errors, &self.bullets);
        errors.optional_url("link", self.link.as_deref());
        errors.into_result()
    }
}

/// Partial update; only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bullets: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl Validate for ProgramPatch {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        if let Some(title) = &self.title {
            errors.require("title", title);
        }
        if let Some(bullets) = &self.bullets {
            check_bullets(&mut errors, bullets);
        }
        errors.optional_url("link", self.link.as_deref());
        errors.into_result()
    }
}

impl Resource for Program {
    const PATH: &'static str = "program";
    const COLLECTION_KEY: &'static str = "programs";
    const ITEM_KEY: &'static str = "program";
    const LABEL: &'static str = "program";

    type Filters = ProgramFilters;
    type Draft = ProgramDraft;

    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl Editable for Program {
    type Patch = ProgramPatch;
}
