//! Incubation and pre-incubation applications.
//!
//! Both kinds share a progress block (review status, stage, funding) that the
//! backend stores inline on the record; it is flattened into each type here.

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Editable, HasStats, Resource};
use crate::{
    EntityId,
    requests::{FieldErrors, Validate},
    responses::ApplicationStats,
};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum ApplicationType {
    #[default]
    Incubation,
    PreIncubation,
}

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
pub enum ApplicationStatus {
    #[default]
    #[display("submitted")]
    Submitted,
    #[display("under-review")]
    UnderReview,
    #[display("approved")]
    Approved,
    #[display("rejected")]
    Rejected,
    #[display("incubated")]
    Incubated,
    #[display("graduated")]
    Graduated,
    #[display("exited")]
    Exited,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    #[default]
    PreIncubation,
    Incubation,
    Graduated,
    Exited,
}

/// Whether the company is currently in the program.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum CompanyStatus {
    #[default]
    Active,
    Inactive,
    Graduated,
    Exited,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApplicationProgress {
    pub application_type: ApplicationType,
    pub application_status: ApplicationStatus,
    pub submitted_at: Option<Timestamp>,
    pub reviewed_at: Option<Timestamp>,
    pub approved_at: Option<Timestamp>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub current_stage: Stage,
    pub status: CompanyStatus,
    #[serde(with = "super::float_or_null")]
    pub funding_received: Option<Decimal>,
    pub employees: Option<u32>,
    pub achievements: Vec<String>,
    pub milestones: Vec<String>,
    pub created_at: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    #[default]
    Startup,
    Individual,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
pub enum InnovationCategory {
    #[default]
    Process,
    Product,
    #[serde(rename = "New Application")]
    NewApplication,
    Other,
}

/// What an applicant submits through the incubation form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IncubationForm {
    pub applicant_name: String,
    pub applicant_email: String,
    pub date_of_birth: String,
    pub qualification: String,
    pub contact_details: String,
    pub entity_type: EntityType,
    pub company_registration_details: String,

    pub innovation_title: String,
    pub prototype_time: String,
    pub category: InnovationCategory,
    pub innovation_description: String,
    pub applications: String,
    pub novelty: String,
    pub business_model: String,
    pub rnd_status: String,
    pub trl_status: String,

    pub team_members: String,
    pub patents: String,
    pub awards: String,

    pub requested_period: String,
    pub space_requested: String,
    pub equipment_required: String,
    pub other_incubator: String,

    pub clinical_samples: String,
    pub biosafety_clearance: String,
    pub employees_onsite: u32,

    pub fund_raised: String,
    pub annual_turnover: String,
    pub incubation_help: String,
    pub documents: String,

    pub is_student: bool,
    pub ideation_mentorship: bool,
    pub lab_access: bool,
    pub prototype_support: bool,
    pub business_planning: bool,
    pub ecosystem_exposure: bool,

    pub prior_funding: bool,
    pub funding_details: String,
    pub collaboration_required: bool,
    pub collaboration_dept: String,
    pub future_vision: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncubationApplication {
    pub id: EntityId,
    #[serde(flatten)]
    pub form: IncubationForm,
    #[serde(flatten)]
    pub progress: ApplicationProgress,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamMember {
    pub name: String,
    pub address: String,
    pub contact: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Shareholder {
    pub name: String,
    pub shares: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub percentage: Decimal,
    pub designation: String,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum TechnologyCategory {
    #[default]
    ToBeDeveloped,
    SelfDeveloped,
    Acquired,
    Licensed,
    OffTheShelf,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PreIncubationForm {
    pub applicant_name: String,
    /// Stored path of the uploaded CV.
    pub applicant_background: String,
    pub company_name: String,
    pub founding_team: Vec<TeamMember>,
    pub shareholding_structure: Vec<Shareholder>,
    pub partnership_details: String,
    #[serde(rename = "hasFiledITReturn")]
    pub has_filed_it_return: bool,
    pub registration_no: String,
    pub registration_date: String,
    pub registering_authority: String,
    pub pan: String,
    pub tan: String,

    pub problem_addressed: String,
    pub proposed_solution: String,

    pub product_service_details: String,
    pub target_customer: String,
    pub business_plan: String,
    pub market_size: String,
    pub go_to_market_strategy: String,
    pub revenue_model: String,
    pub competitors: String,
    pub funding_investment: String,
    pub swot_analysis: String,
    pub other_details: String,

    pub technology_category: TechnologyCategory,
    pub technology_details: String,
    pub can_be_patented: bool,
    pub conducted_patent_search: bool,
    pub applied_for_patent: bool,
    pub patent_details: String,
    #[serde(rename = "otherIPRProtection")]
    pub other_ipr_protection: String,

    pub infrastructure_facilities: String,
    pub mentors: String,
    pub manpower: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreIncubationApplication {
    pub id: EntityId,
    #[serde(flatten)]
    pub form: PreIncubationForm,
    #[serde(flatten)]
    pub progress: ApplicationProgress,
}

impl AsRef<ApplicationProgress> for IncubationApplication {
    fn as_ref(&self) -> &ApplicationProgress {
        &self.progress
    }
}

impl AsRef<ApplicationProgress> for PreIncubationApplication {
    fn as_ref(&self) -> &ApplicationProgress {
        &self.progress
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationFilters {
    pub application_status: Option<ApplicationStatus>,
    pub current_stage: Option<Stage>,
    pub status: Option<CompanyStatus>,
}

/// Review fields an admin changes on an existing application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_status: Option<ApplicationStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_stage: Option<Stage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CompanyStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(
        with = "super::float_or_null",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub funding_received: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employees: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub achievements: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestones: Option<Vec<String>>,
}

impl Validate for ApplicationPatch {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        if self.funding_received.is_some_and(|f| f.is_sign_negative()) {
            errors.add("fundingReceived", "Funding cannot be negative");
        }
        errors.into_result()
    }
}

impl Validate for IncubationForm {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        errors.require("applicantName", &self.applicant_name);
        errors.require("applicantEmail", &self.applicant_email);
        errors.require("innovationTitle", &self.innovation_title);
        errors.into_result()
    }
}

impl Validate for PreIncubationForm {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        errors.require("applicantName", &self.applicant_name);
        errors.require("companyName", &self.company_name);
        errors.into_result()
    }
}

impl Resource for IncubationApplication {
    const PATH: &'static str = "incubation";
    const COLLECTION_KEY: &'static str = "applications";
    const ITEM_KEY: &'static str = "application";
    const LABEL: &'static str = "incubation application";

    type Filters = ApplicationFilters;
    // review progress and timestamps are assigned by the backend
    type Draft = IncubationForm;

    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl Editable for IncubationApplication {
    type Patch = ApplicationPatch;
}

impl HasStats for IncubationApplication {
    type Stats = ApplicationStats;
}

impl Resource for PreIncubationApplication {
    const PATH: &'static str = "pre-incubation";
    const COLLECTION_KEY: &'static str = "applications";
    const ITEM_KEY: &'static str = "application";
    const LABEL: &'static str = "pre-incubation application";

    type Filters = ApplicationFilters;
    type Draft = PreIncubationForm;

    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl Editable for PreIncubationApplication {
    type Patch = ApplicationPatch;
}

impl HasStats for PreIncubationApplication {
    type Stats = ApplicationStats;
}
