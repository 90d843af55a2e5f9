//! Headless dashboard overview
//!
//! Signs in (or resumes a persisted session) and logs the size of every
//! collection, the way the dashboard home page summarises them.
//!
//! Environment variables, also read from a .env file:
//! - API_BASE_URL: backend base, e.g. http://127.0.0.1:5000/apiic_api
//! - TOKEN_PATH: file to persist the session token in (optional)
//! - DASHBOARD_EMAIL, DASHBOARD_PASSWORD: sign in with these when set
//! - PAGE_SIZE, REQUEST_TIMEOUT_SECS, LOG_FILTER (optional)
//!
//! Usage against the development backend:
//! cargo run -p dev-server
//! API_BASE_URL=http://127.0.0.1:5000/apiic_api \
//! DASHBOARD_EMAIL=admin@apiic.test DASHBOARD_PASSWORD=admin-password \
//! cargo run -p dashboard

use anyhow::{Result, bail};
use dashboard::{AuthState, Config, Dashboard, ResourceStore, logs};
use payloads::Resource;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    logs::init_logging(&config.log_filter)?;
    info!("Using backend at {}", config.api_base_url);

    let dashboard = Dashboard::from_config(&config)?;
    let credentials = (
        std::env::var("DASHBOARD_EMAIL"),
        std::env::var("DASHBOARD_PASSWORD"),
    );
    let user = match credentials {
        (Ok(email), Ok(password)) => {
            dashboard.auth.login(&email, &password).await?
        }
        _ => match dashboard.auth.check().await {
            AuthState::LoggedIn(user) => user,
            _ => bail!(
                "Not signed in: set DASHBOARD_EMAIL and DASHBOARD_PASSWORD"
            ),
        },
    };
    info!("Signed in as {} ({})", user.email, user.role);

    report("announcements", &dashboard.announcements).await;
    report("blog posts", &dashboard.blogs).await;
    report("events", &dashboard.events).await;
    report("mentors", &dashboard.mentors).await;
    report("programs", &dashboard.programs).await;
    report("contact submissions", &dashboard.contacts).await;
    report("incubation applications", &dashboard.incubation).await;
    report("pre-incubation applications", &dashboard.pre_incubation).await;
    if user.role.is_admin() {
        report("admins", &dashboard.admins).await;
    }
    Ok(())
}

async fn report<R: Resource>(name: &str, store: &ResourceStore<R>) {
    store.refetch().await;
    let state = store.state();
    match state.error {
        Some(error) => warn!("{name}: {error}"),
        None => info!("{name}: {}", state.pagination.total_items),
    }
}
