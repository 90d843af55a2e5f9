use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{Resource, Toggle};
use crate::{AuditRef, EntityId, requests::AddAdmin};

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
pub enum AdminRole {
    #[default]
    #[display("admin")]
    Admin,
    #[display("super_admin")]
    SuperAdmin,
}

/// An account allowed into the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    pub id: EntityId,
    pub name: String,
    pub email: String,
    pub role: AdminRole,
    pub is_active: bool,
    pub created_at: Option<Timestamp>,
    pub last_login: Option<Timestamp>,
    pub created_by: Option<AuditRef>,
    pub updated_by: Option<AuditRef>,
}

/// The admin list only supports paging and search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdminFilters {}

impl Resource for AdminUser {
    const PATH: &'static str = "admin";
    const COLLECTION_KEY: &'static str = "admins";
    const ITEM_KEY: &'static str = "admin";
    const LABEL: &'static str = "admin";

    type Filters = AdminFilters;
    type Draft = AddAdmin;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn list_path() -> String {
        "admin/admins".to_string()
    }

    fn item_path(id: &EntityId) -> String {
        format!("admin/admin/{id}")
    }

    fn create_path() -> String {
        "admin/add-admin".to_string()
    }
}

impl Toggle for AdminUser {
    fn status_path(id: &EntityId) -> String {
        format!("admin/admin/{id}/status")
    }

    fn is_active(&self) -> bool {
        self.is_active
    }

    fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }
}
