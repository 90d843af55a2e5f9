use payloads::{
    EntityId, ListQuery, PreIncubationApplication,
    resources::application::{
        ApplicationFilters, ApplicationPatch, ApplicationStatus,
        ApplicationType, Stage, TechnologyCategory,
    },
};
use rust_decimal::Decimal;
use serde_json::json;
use test_helpers::{fixtures, spawn_app};

use crate::dashboard;

#[tokio::test]
async fn pre_incubation_round_trip() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    let d = dashboard(&app);

    let draft =
        fixtures::pre_incubation_application("Neha Singh", "Loom Analytics");
    assert!(d.pre_incubation.create(&draft).await);

    let state = d.pre_incubation.state();
    assert_eq!(state.error, None);
    assert_eq!(state.items.len(), 1);
    let application: PreIncubationApplication = state.items[0].clone();
    assert_eq!(application.form, draft);
    assert_eq!(
        application.form.technology_category,
        TechnologyCategory::SelfDeveloped
    );
    assert_eq!(
        application.progress.application_type,
        ApplicationType::PreIncubation
    );
    assert_eq!(
        application.progress.application_status,
        ApplicationStatus::Submitted
    );
    assert!(application.progress.submitted_at.is_some());
    assert_eq!(
        d.pre_incubation.get(&application.id).await,
        Some(application.clone())
    );

    let patch = ApplicationPatch {
        application_status: Some(ApplicationStatus::Approved),
        current_stage: Some(Stage::Incubation),
        funding_received: Some(Decimal::new(2_500_000, 1)),
        ..ApplicationPatch::default()
    };
    assert!(d.pre_incubation.update(&application.id, &patch).await);
    let updated = d
        .pre_incubation
        .state()
        .find(&application.id)
        .cloned()
        .expect("still listed");
    assert_eq!(
        updated.progress.application_status,
        ApplicationStatus::Approved
    );
    assert_eq!(updated.progress.current_stage, Stage::Incubation);
    assert_eq!(
        updated.progress.funding_received,
        Some(Decimal::new(250_000, 0))
    );
    assert_eq!(updated.form, draft);

    d.pre_incubation
        .filter(ApplicationFilters {
            application_status: Some(ApplicationStatus::Submitted),
            ..ApplicationFilters::default()
        })
        .await;
    assert!(d.pre_incubation.state().items.is_empty());

    d.pre_incubation.fetch_list(ListQuery::first_page(10)).await;
    assert!(d.pre_incubation.delete(&application.id).await);
    assert!(d.pre_incubation.state().items.is_empty());

    Ok(())
}

#[tokio::test]
async fn stored_null_funding_still_lists() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    let id = app.insert(
        "pre-incubation",
        json!({
            "applicantName": "Rahul Menon",
            "companyName": "Kelp Works",
            "applicationType": "pre-incubation",
            "applicationStatus": "under-review",
            "fundingReceived": null,
            "employees": null,
            "submittedAt": null
        }),
    )?;
    let d = dashboard(&app);

    d.pre_incubation.refetch().await;

    let state = d.pre_incubation.state();
    assert_eq!(state.error, None);
    assert_eq!(state.items.len(), 1);
    let application = &state.items[0];
    assert_eq!(application.id, EntityId::from(id));
    assert_eq!(application.form.company_name, "Kelp Works");
    assert_eq!(application.progress.funding_received, None);
    assert_eq!(application.progress.employees, None);

    Ok(())
}
