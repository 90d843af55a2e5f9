use dashboard::FetchState;
use payloads::{
    ContactSubmission, EntityId, Event, IncubationApplication,
    resources::{
        application::{ApplicationPatch, ApplicationStatus},
        contact::{ContactPatch, ContactStatus},
        event::{EventStatus, EventType},
    },
};
use test_helpers::{fixtures, spawn_app};

use crate::dashboard;

#[tokio::test]
async fn announcement_overview() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    app.seed_announcements(9)?;
    let d = dashboard(&app);

    let stats = d.announcements.stats();
    assert_eq!(stats.state().data, FetchState::NotFetched);
    assert!(!stats.state().is_initial_loading());

    stats.refetch().await;
    let snapshot = stats.state();
    assert!(!snapshot.is_loading);
    let stats = snapshot.data.as_ref().expect("stats fetched");
    assert_eq!(stats.total, 9);
    assert_eq!(stats.draft, 3);
    assert_eq!(stats.published, 6);
    assert_eq!(stats.active, 9);

    Ok(())
}

#[tokio::test]
async fn event_overview_and_public_upcoming() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    let d = dashboard(&app);

    for (title, kind, date) in [
        ("Hardware hackathon", EventType::Hackathon, "2030-05-18T09:00:00Z"),
        ("Pitch practice", EventType::Workshop, "2030-03-10T10:00:00Z"),
        ("Term sheets 101", EventType::Workshop, "2030-04-02T10:00:00Z"),
    ] {
        let draft = fixtures::event_draft(title, kind, date);
        assert!(d.events.create(&draft).await);
    }
    let mut finished = fixtures::event_draft(
        "Last year's demo day",
        EventType::PastEvent,
        "2024-11-20T10:00:00Z",
    );
    finished.status = EventStatus::Completed;
    assert!(d.events.create(&finished).await);

    let cell = d.events.stats();
    cell.refetch().await;
    let stats = cell.state().data.as_ref().cloned().expect("stats fetched");
    assert_eq!(stats.total, 4);
    assert_eq!(stats.upcoming, 3);
    assert_eq!(stats.count_of(EventType::Workshop), 2);
    assert_eq!(stats.count_of(EventType::Hackathon), 1);
    assert_eq!(stats.count_of(EventType::Seminar), 0);

    let anonymous = app.new_client();
    let upcoming: Vec<Event> = anonymous.upcoming_events(Some(2)).await?;
    let titles: Vec<&str> = upcoming.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Pitch practice", "Term sheets 101"]);

    Ok(())
}

#[tokio::test]
async fn contact_response_updates_stats() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    let d = dashboard(&app);

    for (first_name, subject) in
        [("Priya", "Incubation eligibility"), ("Rahul", "Lab access")]
    {
        let draft = fixtures::contact_draft(first_name, subject);
        assert!(d.contacts.create(&draft).await);
    }
    let state = d.contacts.state();
    assert_eq!(state.items.len(), 2);
    assert!(state.items.iter().all(|c| c.status == ContactStatus::New));

    let id: EntityId = state.items[0].id.clone();
    let patch = ContactPatch {
        response: Some("Thanks, our team will call you this week.".into()),
        ..ContactPatch::default()
    };
    assert!(d.contacts.update(&id, &patch).await);

    let answered: ContactSubmission = d
        .contacts
        .state()
        .find(&id)
        .cloned()
        .expect("still listed");
    assert_eq!(answered.status, ContactStatus::Responded);
    assert!(answered.responded_at.is_some());
    assert!(answered.responded_by.is_some());

    let cell = d.contacts.stats();
    cell.refetch().await;
    let stats = cell.state().data.as_ref().cloned().expect("stats fetched");
    assert_eq!(stats.total, 2);
    assert_eq!(stats.new, 1);
    assert_eq!(stats.responded, 1);

    Ok(())
}

#[tokio::test]
async fn application_overview_and_detail() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    let d = dashboard(&app);

    for (applicant, innovation) in [
        ("Kiran Das", "Soil moisture mesh"),
        ("Neha Singh", "Loom analytics"),
    ] {
        let draft = fixtures::incubation_application(applicant, innovation);
        assert!(d.incubation.create(&draft).await);
    }
    let state = d.incubation.state();
    assert_eq!(state.items.len(), 2);
    for application in &state.items {
        assert_eq!(
            application.progress.application_status,
            ApplicationStatus::Submitted
        );
        assert!(application.progress.submitted_at.is_some());
        assert_eq!(application.progress.funding_received, None);
    }

    for application in &state.items {
        let patch = ApplicationPatch {
            employees: Some(3),
            ..ApplicationPatch::default()
        };
        assert!(d.incubation.update(&application.id, &patch).await);
    }

    let cell = d.incubation.stats();
    cell.refetch().await;
    let stats = cell.state().data.as_ref().cloned().expect("stats fetched");
    assert_eq!(stats.total, 2);
    assert_eq!(stats.submitted, 2);
    assert_eq!(stats.total_employees, 6);

    let first: IncubationApplication = d.incubation.state().items[0].clone();
    let detail = d.incubation.detail(first.id.clone());
    detail.refetch().await;
    assert_eq!(detail.state().data, FetchState::Fetched(first));

    Ok(())
}

#[tokio::test]
async fn failed_stats_fetch_keeps_previous_value() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    app.seed_announcements(3)?;
    let d = dashboard(&app);

    let cell = d.announcements.stats();
    cell.refetch().await;
    app.refuse_next("stats/overview", "Stats are being rebuilt");
    cell.refetch().await;

    let snapshot = cell.state();
    assert_eq!(snapshot.data.as_ref().map(|s| s.total), Some(3));
    assert_eq!(snapshot.error.as_deref(), Some("Stats are being rebuilt"));

    Ok(())
}
