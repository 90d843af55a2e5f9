use dashboard::{NoticeKind, Phase};
use payloads::{Announcement, ClientError, EntityId, ListQuery};
use reqwest::StatusCode;
use test_helpers::{assert_status_code, fixtures, spawn_app};

use crate::{dashboard, drain};

#[tokio::test]
async fn refused_list_surfaces_server_message() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    let d = dashboard(&app);

    app.refuse_next("GET announcement", "X");
    d.announcements.fetch_list(ListQuery::first_page(10)).await;

    let state = d.announcements.state();
    assert_eq!(state.error.as_deref(), Some("X"));
    assert_eq!(state.phase, Phase::Failed);
    assert!(!state.loading());
    assert!(!state.fetched);

    Ok(())
}

#[tokio::test]
async fn server_error_message_is_kept() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    let d = dashboard(&app);

    app.fail_next(
        "GET event",
        StatusCode::INTERNAL_SERVER_ERROR,
        "Database unavailable",
    );
    d.events.refetch().await;

    let state = d.events.state();
    assert_eq!(state.error.as_deref(), Some("Database unavailable"));
    assert!(!state.loading());

    Ok(())
}

#[tokio::test]
async fn failed_refetch_keeps_loaded_items() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    app.seed_announcements(3)?;
    let d = dashboard(&app);

    d.announcements.refetch().await;
    assert_eq!(d.announcements.state().items.len(), 3);

    app.refuse_next("GET announcement", "Try again later");
    d.announcements.refetch().await;

    let state = d.announcements.state();
    assert_eq!(state.items.len(), 3);
    assert!(state.fetched);
    assert_eq!(state.error.as_deref(), Some("Try again later"));

    // the next successful load clears the error
    d.announcements.refetch().await;
    assert_eq!(d.announcements.state().error, None);

    Ok(())
}

#[tokio::test]
async fn failed_create_does_not_refetch() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    let d = dashboard(&app);
    let mut notices = d.notifier.subscribe();
    app.clear_requests();

    app.fail_next(
        "POST announcement",
        StatusCode::BAD_REQUEST,
        "An announcement with this title already exists",
    );
    let draft = fixtures::announcement_draft("Cohort applications open");
    assert!(!d.announcements.create(&draft).await);

    assert_eq!(app.requests().len(), 1);
    let state = d.announcements.state();
    assert_eq!(
        state.error.as_deref(),
        Some("An announcement with this title already exists")
    );
    let notices = drain(&mut notices);
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, NoticeKind::Error);

    Ok(())
}

#[tokio::test]
async fn missing_token_is_unauthorized() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let d = dashboard(&app);

    d.announcements.refetch().await;
    assert_eq!(
        d.announcements.state().error.as_deref(),
        Some("Not authorized, no token")
    );

    let result = app.client.list::<Announcement>(&ListQuery::default()).await;
    assert!(result.as_ref().is_err_and(ClientError::is_unauthorized));
    assert_status_code(result, StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn unknown_record_is_not_found() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    let d = dashboard(&app);
    let id = EntityId::from("0000");

    let result = app.client.get::<Announcement>(&id).await;
    assert_status_code(result, StatusCode::NOT_FOUND);

    assert_eq!(d.announcements.get(&id).await, None);
    assert_eq!(
        d.announcements.state().error.as_deref(),
        Some("Announcement not found")
    );

    Ok(())
}

#[tokio::test]
async fn unreachable_backend_gives_network_error() -> anyhow::Result<()> {
    let app = spawn_app().await;
    // nothing listens on port 9 of the loopback interface
    let mut client = app.new_client();
    client.address = "http://127.0.0.1:9/apiic_api".into();

    let result = client.health_check().await;
    assert!(matches!(result, Err(ClientError::Network(_))));

    Ok(())
}
