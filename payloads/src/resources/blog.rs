use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{Editable, Resource, null_as_default};
use crate::{
    EntityId,
    requests::{FieldErrors, Validate},
};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum BlogStatus {
    #[default]
    Draft,
    Published,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    pub id: EntityId,
    pub title: String,
    pub content: String,
    pub cover_image: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    pub status: BlogStatus,
    pub is_active: Option<bool>,
    pub published_at: Option<Timestamp>,
    pub created_at: Option<Timestamp>,
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogFilters {
    pub status: Option<BlogStatus>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogDraft {
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    pub tags: Vec<String>,
    pub status: BlogStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl Validate for BlogDraft {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        errors.require("title", &self.title);
        errors.require("content", &self.content);
        errors.optional_url("link", self.link.as_deref());
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<BlogStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl Validate for BlogPatch {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        if let Some(title) = &self.title {
            errors.require("title", title);
        }
        if let Some(content) = &self.content {
            errors.require("content", content);
        }
        errors.optional_url("link", self.link.as_deref());
        errors.into_result()
    }
}

impl Resource for Blog {
    const PATH: &'static str = "blog";
    const COLLECTION_KEY: &'static str = "blogs";
    const ITEM_KEY: &'static str = "blog";
    const LABEL: &'static str = "blog";

    type Filters = BlogFilters;
    type Draft = BlogDraft;

    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl Editable for Blog {
    type Patch = BlogPatch;
}
