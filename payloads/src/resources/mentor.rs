use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{Editable, Resource, Toggle, null_as_default};
use crate::{
    AuditRef, EntityId,
    requests::{FieldErrors, Validate},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mentor {
    pub id: EntityId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub designation: String,
    pub company: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub expertise: Vec<String>,
    pub bio: String,
    pub profile_image: Option<String>,
    pub linkedin_profile: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub created_by: Option<AuditRef>,
    pub updated_by: Option<AuditRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MentorFilters {
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MentorDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub designation: String,
    pub company: String,
    pub expertise: Vec<String>,
    pub bio: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin_profile: Option<String>,
}

impl MentorDraft {
    /// Add an expertise area, ignoring blanks and duplicates.
    pub fn add_expertise(&mut self, area: &str) {
        let area = area.trim();
        if !area.is_empty() && !self.expertise.iter().any(|e| e == area) {
            self.expertise.push(area.to_string());
        }
    }

    pub fn remove_expertise(&mut self, area: &str) {
        self.expertise.retain(|e| e != area);
    }
}

impl From<&Mentor> for MentorDraft {
    fn from(mentor: &Mentor) -> Self {
        Self {
            name: mentor.name.clone(),
            email: mentor.email.clone(),
            phone: mentor.phone.clone(),
            designation: mentor.designation.clone(),
            company: mentor.company.clone(),
            expertise: mentor.expertise.clone(),
            bio: mentor.bio.clone(),
            profile_image: mentor.profile_image.clone(),
            linkedin_profile: mentor.linkedin_profile.clone(),
        }
    }
}

const EXPERTISE_REQUIRED: &str = "Please add at least one expertise area";

impl Validate for MentorDraft {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        errors.require("name", &self.name);
        errors.require("email", &self.email);
        errors.require("phone", &self.phone);
        errors.require("designation", &self.designation);
        errors.require("company", &self.company);
        errors.require("bio", &self.bio);
        if self.expertise.is_empty() {
            errors.add("expertise", EXPERTISE_REQUIRED);
        }
        errors.optional_url("linkedinProfile", self.linkedin_profile.as_deref());
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MentorPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expertise: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin_profile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl From<MentorDraft> for MentorPatch {
    fn from(draft: MentorDraft) -> Self {
        Self {
            name: Some(draft.name),
            email: Some(draft.email),
            phone: Some(draft.phone),
            designation: Some(draft.designation),
            company: Some(draft.company),
            expertise: Some(draft.expertise),
            bio: Some(draft.bio),
            profile_image: draft.profile_image,
            linkedin_profile: draft.linkedin_profile,
            is_active: None,
        }
    }
}

impl Validate for MentorPatch {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        for (field, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("designation", &self.designation),
            ("company", &self.company),
            ("bio", &self.bio),
        ] {
            if let Some(value) = value {
                errors.require(field, value);
            }
        }
        if self.expertise.as_ref().is_some_and(Vec::is_empty) {
            errors.add("expertise", EXPERTISE_REQUIRED);
        }
        errors.optional_url("linkedinProfile", self.linkedin_profile.as_deref());
        errors.into_result()
    }
}

impl Resource for Mentor {
    const PATH: &'static str = "mentor";
    const COLLECTION_KEY: &'static str = "mentors";
    const ITEM_KEY: &'static str = "mentor";
    const LABEL: &'static str = "mentor";

    type Filters = MentorFilters;
    type Draft = MentorDraft;

    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl Editable for Mentor {
    type Patch = MentorPatch;
}

impl Toggle for Mentor {
    fn is_active(&self) -> bool {
        self.is_active
    }

    fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }
}
