use dashboard::NoticeKind;
use payloads::{
    EntityId, ListQuery,
    resources::mentor::{MentorFilters, MentorPatch},
};
use test_helpers::{fixtures, spawn_app};

use crate::{dashboard, drain};

#[tokio::test]
async fn status_toggle_patches_without_refetch() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    let asha = EntityId::from(app.seed_mentor("Asha Rao", true)?);
    let vikram = EntityId::from(app.seed_mentor("Vikram Iyer", true)?);
    let d = dashboard(&app);
    d.mentors.refetch().await;
    let mut notices = d.notifier.subscribe();

    app.clear_requests();
    assert!(d.mentors.update_status(&asha, false).await);

    let targets: Vec<String> =
        app.requests().iter().map(|r| r.target()).collect();
    assert_eq!(targets, vec![format!("PUT mentor/{asha}/status")]);

    let state = d.mentors.state();
    assert!(!state.find(&asha).expect("asha listed").is_active);
    assert!(state.find(&vikram).expect("vikram listed").is_active);

    let stored = app.backend.records("mentor");
    let stored = stored
        .iter()
        .find(|m| m["_id"] == asha.0.as_str())
        .expect("asha stored");
    assert_eq!(stored["isActive"], false);

    let notices = drain(&mut notices);
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, NoticeKind::Success);
    assert_eq!(notices[0].message, "Mentor deactivated successfully");

    Ok(())
}

#[tokio::test]
async fn status_toggle_failure_leaves_item() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    let asha = EntityId::from(app.seed_mentor("Asha Rao", true)?);
    let d = dashboard(&app);
    d.mentors.refetch().await;

    app.refuse_next("/status", "Mentor is locked");
    assert!(!d.mentors.update_status(&asha, false).await);

    let state = d.mentors.state();
    assert!(state.find(&asha).expect("asha listed").is_active);
    assert_eq!(state.error.as_deref(), Some("Mentor is locked"));

    Ok(())
}

#[tokio::test]
async fn active_filter_and_update() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    app.seed_mentor("Asha Rao", true)?;
    app.seed_mentor("Meera Nair", false)?;
    let d = dashboard(&app);

    d.mentors
        .fetch_list(ListQuery::first_page(10).filters(MentorFilters {
            is_active: Some(false),
        }))
        .await;
    let state = d.mentors.state();
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].name, "Meera Nair");

    let id = state.items[0].id.clone();
    let patch = MentorPatch {
        company: Some("Fabrikam".into()),
        ..MentorPatch::default()
    };
    assert!(d.mentors.update(&id, &patch).await);

    // the refetch kept the inactive filter
    let state = d.mentors.state();
    assert_eq!(state.query.filters.is_active, Some(false));
    assert_eq!(state.items[0].company, "Fabrikam");

    Ok(())
}

#[tokio::test]
async fn public_list_needs_no_token() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    let d = dashboard(&app);
    for (name, email) in [
        ("Asha Rao", "asha@example.com"),
        ("Vikram Iyer", "vikram@example.com"),
    ] {
        assert!(d.mentors.create(&fixtures::mentor_draft(name, email)).await);
    }
    app.seed_mentor("Meera Nair", false)?;

    let anonymous = app.new_client();
    let mentors = anonymous.public_mentors(None, None).await?;
    let mut names: Vec<&str> =
        mentors.iter().map(|m| m.name.as_str()).collect();
    names.sort();
    assert_eq!(names, vec!["Asha Rao", "Vikram Iyer"]);

    let mentors = anonymous.public_mentors(Some(5), Some("vikram")).await?;
    assert_eq!(mentors.len(), 1);
    assert_eq!(mentors[0].email, "vikram@example.com");

    let request = app.requests().pop().expect("public list request");
    assert!(!request.authorized);
    assert_eq!(request.param("search"), Some("vikram"));
    assert_eq!(request.param("limit"), Some("5"));

    Ok(())
}
