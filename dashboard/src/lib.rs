//! Client state for the incubator admin dashboard.
//!
//! [`Dashboard`] holds one [`ResourceStore`] per backend collection, all
//! sharing a single [`APIClient`] (and so a single session) and a single
//! [`Notifier`].

pub mod auth;
pub mod config;
pub mod fetch;
pub mod logs;
pub mod notify;
pub mod resource;

pub use auth::{Auth, AuthError, AuthState};
pub use config::{Config, ConfigError};
pub use fetch::{FetchCell, FetchSnapshot, FetchState};
pub use notify::{Notice, NoticeBoard, NoticeKind, Notifier};
pub use resource::{ListState, Phase, ResourceStore};

use payloads::{
    APIClient, AdminUser, Announcement, Blog, ContactSubmission, Event,
    IncubationApplication, Mentor, PreIncubationApplication, Program, Resource,
};

#[derive(Debug, Clone)]
pub struct Dashboard {
    pub client: APIClient,
    pub notifier: Notifier,
    pub auth: Auth,
    pub announcements: ResourceStore<Announcement>,
    pub blogs: ResourceStore<Blog>,
    pub contacts: ResourceStore<ContactSubmission>,
    pub events: ResourceStore<Event>,
    pub mentors: ResourceStore<Mentor>,
    pub incubation: ResourceStore<IncubationApplication>,
    pub pre_incubation: ResourceStore<PreIncubationApplication>,
    pub programs: ResourceStore<Program>,
    pub admins: ResourceStore<AdminUser>,
}

impl Dashboard {
    pub fn new(client: APIClient, page_size: u32) -> Self {
        let notifier = Notifier::default();
        Self {
            auth: Auth::new(client.clone()),
            announcements: store(&client, &notifier, page_size),
            blogs: store(&client, &notifier, page_size),
            contacts: store(&client, &notifier, page_size),
            events: store(&client, &notifier, page_size),
            mentors: store(&client, &notifier, page_size),
            incubation: store(&client, &notifier, page_size),
            pre_incubation: store(&client, &notifier, page_size),
            programs: store(&client, &notifier, page_size),
            admins: store(&client, &notifier, page_size),
            notifier,
            client,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self::new(config.client()?, config.page_size))
    }
}

fn store<R: Resource>(
    client: &APIClient,
    notifier: &Notifier,
    page_size: u32,
) -> ResourceStore<R> {
    ResourceStore::new(client.clone(), notifier.clone(), page_size)
}
