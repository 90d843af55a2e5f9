use dashboard::NoticeKind;
use payloads::{
    Blog, ListQuery, Program,
    resources::{
        blog::{BlogFilters, BlogPatch, BlogStatus},
        program::ProgramPatch,
    },
};
use test_helpers::{fixtures, spawn_app};

use crate::{dashboard, drain};

#[tokio::test]
async fn blog_round_trip() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    let d = dashboard(&app);
    let mut notices = d.notifier.subscribe();

    let mut draft = fixtures::blog_draft("Demo day lessons");
    draft.cover_image = Some("/uploads/demo-day.jpg".into());
    draft.link = Some("https://apiic.example.org/blog/demo-day".into());
    assert!(d.blogs.create(&draft).await);
    assert!(d.blogs.create(&fixtures::blog_draft("Lab open hours")).await);

    let state = d.blogs.state();
    assert_eq!(state.error, None);
    assert_eq!(state.items.len(), 2);
    let post: Blog = state
        .items
        .iter()
        .find(|b| b.title == "Demo day lessons")
        .cloned()
        .expect("post listed");
    assert_eq!(post.content, draft.content);
    assert_eq!(post.cover_image, draft.cover_image);
    assert_eq!(post.tags, vec!["demo-day".to_string()]);
    assert_eq!(post.status, BlogStatus::Published);
    assert_eq!(post.link, draft.link);
    assert_eq!(d.blogs.get(&post.id).await, Some(post.clone()));

    let patch = BlogPatch {
        status: Some(BlogStatus::Draft),
        tags: Some(vec!["demo-day".into(), "cohort-3".into()]),
        ..BlogPatch::default()
    };
    assert!(d.blogs.update(&post.id, &patch).await);
    let updated = d.blogs.state().find(&post.id).cloned().expect("listed");
    assert_eq!(updated.status, BlogStatus::Draft);
    assert_eq!(updated.tags.len(), 2);
    assert_eq!(updated.title, post.title);

    d.blogs
        .filter(BlogFilters {
            status: Some(BlogStatus::Draft),
            ..BlogFilters::default()
        })
        .await;
    let state = d.blogs.state();
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].id, post.id);

    assert!(d.blogs.delete(&post.id).await);
    assert!(d.blogs.state().items.is_empty());
    d.blogs.fetch_list(ListQuery::first_page(10)).await;
    assert_eq!(d.blogs.state().items.len(), 1);
    assert_eq!(d.blogs.get(&post.id).await, None);
    assert_eq!(d.blogs.state().error.as_deref(), Some("Blog not found"));

    let kinds: Vec<NoticeKind> =
        drain(&mut notices).into_iter().map(|n| n.kind).collect();
    assert_eq!(kinds, vec![NoticeKind::Success; 4]);

    Ok(())
}

#[tokio::test]
async fn program_round_trip() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    let d = dashboard(&app);

    let draft = fixtures::program_draft("Pre-incubation track");
    assert!(d.programs.create(&draft).await);

    let state = d.programs.state();
    assert_eq!(state.items.len(), 1);
    let program: Program = state.items[0].clone();
    assert_eq!(program.title, draft.title);
    assert_eq!(program.duration, draft.duration);
    assert_eq!(program.bullets, draft.bullets);
    assert_eq!(program.is_active, Some(true));
    assert_eq!(d.programs.get(&program.id).await, Some(program.clone()));

    // every bullet blank is rejected before any request
    app.clear_requests();
    let blank = ProgramPatch {
        bullets: Some(vec!["  ".into()]),
        ..ProgramPatch::default()
    };
    assert!(!d.programs.update(&program.id, &blank).await);
    assert_eq!(
        d.programs.state().field_errors.get("bullets"),
        Some("Please add at least one bullet point")
    );
    assert!(app.requests().is_empty());

    let patch = ProgramPatch {
        duration: Some("9 months".into()),
        bullets: Some(vec!["Seed grant up to 5 lakh".into()]),
        ..ProgramPatch::default()
    };
    assert!(d.programs.update(&program.id, &patch).await);
    let state = d.programs.state();
    assert!(state.field_errors.is_empty());
    let updated = state.find(&program.id).cloned().expect("listed");
    assert_eq!(updated.duration.as_deref(), Some("9 months"));
    assert_eq!(updated.bullets, vec!["Seed grant up to 5 lakh".to_string()]);

    assert!(d.programs.delete(&program.id).await);
    assert!(d.programs.state().items.is_empty());
    assert!(!d.programs.delete(&program.id).await);
    assert_eq!(
        d.programs.state().error.as_deref(),
        Some("Program not found")
    );

    Ok(())
}
