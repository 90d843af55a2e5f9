use dashboard::{NoticeKind, Phase};
use payloads::{
    Announcement, EntityId, ListQuery, Resource,
    resources::announcement::{AnnouncementFilters, AnnouncementPatch},
};
use test_helpers::{fixtures, spawn_app};

use crate::{dashboard, drain};

#[tokio::test]
async fn create_refetches_list() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    let d = dashboard(&app);
    let mut notices = d.notifier.subscribe();

    d.announcements.fetch_list(ListQuery::first_page(10)).await;
    let state = d.announcements.state();
    assert!(state.fetched);
    assert!(state.items.is_empty());

    app.clear_requests();
    let draft = fixtures::announcement_draft("Cohort applications open");
    assert!(d.announcements.create(&draft).await);

    let targets: Vec<String> =
        app.requests().iter().map(|r| r.target()).collect();
    assert_eq!(
        targets,
        vec![
            "POST announcement".to_string(),
            "GET announcement?limit=10&page=1".to_string(),
        ]
    );

    let state = d.announcements.state();
    assert_eq!(state.phase, Phase::Ready);
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].title, "Cohort applications open");
    assert_eq!(state.pagination.total_items, 1);

    let notices = drain(&mut notices);
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, NoticeKind::Success);
    assert_eq!(notices[0].message, "Announcement created successfully");

    Ok(())
}

#[tokio::test]
async fn created_record_matches_list_and_get() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    let d = dashboard(&app);

    let draft = fixtures::announcement_draft("Demo day registrations");
    assert!(d.announcements.create(&draft).await);

    let listed = d.announcements.state().items[0].clone();
    assert_eq!(listed.description, draft.description);
    assert_eq!(listed.link, draft.link);
    assert_eq!(listed.status, draft.status);
    assert!(listed.created_by.is_some());

    let fetched = d.announcements.get(&listed.id).await;
    assert_eq!(fetched, Some(listed));

    Ok(())
}

#[tokio::test]
async fn short_title_is_rejected_locally() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    let d = dashboard(&app);
    let mut notices = d.notifier.subscribe();
    app.clear_requests();

    let draft = fixtures::announcement_draft("Cool");
    assert!(!d.announcements.create(&draft).await);

    let state = d.announcements.state();
    assert_eq!(
        state.field_errors.get("title"),
        Some("Title must be at least 5 characters")
    );
    assert_eq!(state.field_errors.len(), 1);
    assert!(app.requests().is_empty());
    assert!(drain(&mut notices).is_empty());

    // editing the field clears its message
    d.announcements.clear_field_error("title");
    assert!(d.announcements.state().field_errors.is_empty());

    Ok(())
}

#[tokio::test]
async fn update_refetches_with_last_query() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    app.seed_announcements(12)?;
    let d = dashboard(&app);

    d.announcements.go_to_page(2).await;
    let target = d.announcements.state().items[0].clone();

    app.clear_requests();
    let patch = AnnouncementPatch {
        title: Some("Lab hours extended".into()),
        ..AnnouncementPatch::default()
    };
    assert!(d.announcements.update(&target.id, &patch).await);

    let requests = app.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].target(), format!("PUT announcement/{}", target.id));
    assert_eq!(requests[1].target(), "GET announcement?limit=10&page=2");

    let state = d.announcements.state();
    let updated = state.find(&target.id).expect("still on page 2");
    assert_eq!(updated.title, "Lab hours extended");
    assert_eq!(updated.description, target.description);
    assert!(updated.updated_by.is_some());

    Ok(())
}

#[tokio::test]
async fn second_delete_fails_and_keeps_items() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    let ids = app.seed_announcements(3)?;
    let d = dashboard(&app);
    d.announcements.refetch().await;
    let mut notices = d.notifier.subscribe();

    let id = EntityId::from(ids[0].as_str());
    assert!(d.announcements.delete(&id).await);
    assert_eq!(d.announcements.state().items.len(), 2);

    assert!(!d.announcements.delete(&id).await);
    let state = d.announcements.state();
    assert_eq!(state.items.len(), 2);
    assert_eq!(state.error.as_deref(), Some("Announcement not found"));

    let notices = drain(&mut notices);
    let kinds: Vec<NoticeKind> = notices.iter().map(|n| n.kind).collect();
    assert_eq!(kinds, vec![NoticeKind::Success, NoticeKind::Error]);
    assert_eq!(notices[1].message, "Announcement not found");

    Ok(())
}

#[tokio::test]
async fn empty_parameters_are_not_sent() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    let d = dashboard(&app);
    app.clear_requests();

    let query = ListQuery::<AnnouncementFilters>::first_page(10)
        .search("")
        .filters(AnnouncementFilters::default());
    d.announcements.fetch_list(query).await;

    let requests = app.requests_to("GET", Announcement::PATH);
    assert_eq!(requests.len(), 1);
    let keys: Vec<&str> =
        requests[0].query.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["limit", "page"]);

    Ok(())
}

#[tokio::test]
async fn search_and_filters_reset_to_first_page() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    app.seed_announcements(25)?;
    let d = dashboard(&app);

    d.announcements.go_to_page(3).await;
    d.announcements.search("Announcement 1").await;

    let state = d.announcements.state();
    assert_eq!(state.query.page, Some(1));
    assert_eq!(state.query.search.as_deref(), Some("Announcement 1"));
    assert_eq!(state.pagination.total_items, 10);
    assert!(state.items.iter().all(|a| a.title.starts_with("Announcement 1")));

    d.announcements
        .filter(AnnouncementFilters {
            is_active: Some(true),
            ..AnnouncementFilters::default()
        })
        .await;
    let request = app.requests().pop().expect("a list request");
    assert_eq!(request.param("search"), Some("Announcement 1"));
    assert_eq!(request.param("isActive"), Some("true"));
    assert_eq!(request.param("page"), Some("1"));

    Ok(())
}
