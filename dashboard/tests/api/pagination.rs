use payloads::{Announcement, IncubationApplication, ListQuery, Resource};
use std::time::Duration;
use test_helpers::{fixtures, spawn_app};

use crate::dashboard;

#[tokio::test]
async fn last_page_of_twenty_five() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    app.seed_announcements(25)?;
    let d = dashboard(&app);

    d.announcements.go_to_page(3).await;

    let state = d.announcements.state();
    let pagination = state.pagination;
    assert_eq!(pagination.page, 3);
    assert_eq!(pagination.page_size, 10);
    assert_eq!(pagination.total_items, 25);
    assert_eq!(pagination.total_pages, 3);
    assert_eq!(pagination.item_range(), Some(21..=25));
    assert!(!pagination.has_next_page());
    assert!(pagination.has_prev_page());

    // newest first, so the last page holds the five oldest
    let titles: Vec<&str> =
        state.items.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Announcement 05",
            "Announcement 04",
            "Announcement 03",
            "Announcement 02",
            "Announcement 01",
        ]
    );

    Ok(())
}

#[tokio::test]
async fn legacy_pagination_shape_is_normalised() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    for i in 1..=12 {
        let application = fixtures::incubation_application(
            &format!("Applicant {i}"),
            &format!("Innovation {i}"),
        );
        app.client.create::<IncubationApplication>(&application).await?;
    }
    let d = dashboard(&app);

    d.incubation.fetch_list(ListQuery::first_page(5).page(3)).await;

    let state = d.incubation.state();
    assert_eq!(state.error, None);
    assert_eq!(state.items.len(), 2);
    assert_eq!(state.pagination.page, 3);
    assert_eq!(state.pagination.page_size, 5);
    assert_eq!(state.pagination.total_items, 12);
    assert_eq!(state.pagination.total_pages, 3);
    assert_eq!(state.pagination.item_range(), Some(11..=12));

    Ok(())
}

#[tokio::test]
async fn slower_earlier_response_is_discarded() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    app.seed_announcements(25)?;
    let d = dashboard(&app);

    app.delay_next("page=1", Duration::from_millis(500));
    let slow = {
        let store = d.announcements.clone();
        tokio::spawn(async move {
            store.fetch_list(ListQuery::first_page(10)).await;
        })
    };
    // let the first request reach the backend before issuing the second
    tokio::time::sleep(Duration::from_millis(100)).await;
    d.announcements.go_to_page(2).await;
    slow.await?;

    let state = d.announcements.state();
    assert_eq!(state.query.page, Some(2));
    assert_eq!(state.pagination.page, 2);
    assert_eq!(state.items[0].title, "Announcement 15");
    assert!(!state.loading());

    // both requests were answered
    let pages: Vec<Option<String>> = app
        .requests_to("GET", Announcement::PATH)
        .iter()
        .map(|r| r.param("page").map(str::to_string))
        .collect();
    assert_eq!(pages, vec![Some("1".to_string()), Some("2".to_string())]);

    Ok(())
}
