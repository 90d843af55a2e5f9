mod admins;
mod announcements;
mod applications;
mod auth;
mod content;
mod errors;
mod mentors;
mod pagination;
mod stats;

use dashboard::{Dashboard, Notice};
use test_helpers::{TestApp, spawn_app};
use tokio::sync::broadcast;

/// A dashboard on the app's default client, ten items per page.
pub fn dashboard(app: &TestApp) -> Dashboard {
    Dashboard::new(app.client.clone(), 10)
}

/// Every notice emitted so far.
pub fn drain(notices: &mut broadcast::Receiver<Notice>) -> Vec<Notice> {
    let mut drained = Vec::new();
    while let Ok(notice) = notices.try_recv() {
        drained.push(notice);
    }
    drained
}

#[tokio::test]
async fn health_check() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let health = app.client.health_check().await?;
    assert!(health.success);

    Ok(())
}
