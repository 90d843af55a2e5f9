pub mod api_client;
pub mod query;
pub mod requests;
pub mod resources;
pub mod responses;
pub mod session;

pub use api_client::{APIClient, ClientError};
pub use query::{ListQuery, Page, Pagination, SortOrder};
pub use requests::{FieldErrors, Validate};
pub use resources::{
    Editable, HasStats, Resource, Toggle, admin::AdminUser,
    announcement::Announcement, application::IncubationApplication,
    application::PreIncubationApplication, blog::Blog,
    contact::ContactSubmission, event::Event, mentor::Mentor,
    program::Program,
};
pub use session::{FileTokenStore, MemoryTokenStore, Session, TokenStore};

use serde::{Deserialize, Serialize};

/// Identifier of a backend record.
///
/// The backend hands out opaque string ids (usually under `_id`); they are
/// normalised into `id` before decoding, see [`resources::normalize_id`].
#[derive(
    Debug,
    Clone,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Denormalised reference to the admin who created or last touched a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRef {
    pub name: String,
    pub email: String,
}

/// Priority shared by announcements and contact submissions.
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
pub enum Priority {
    #[display("low")]
    Low,
    #[default]
    #[display("medium")]
    Medium,
    #[display("high")]
    High,
    #[display("urgent")]
    Urgent,
}
