use payloads::{AdminUser, resources::admin::AdminRole};
use test_helpers::{backend::ADMIN_EMAIL, fixtures, spawn_app};

use crate::dashboard;

#[tokio::test]
async fn add_and_deactivate_admin() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    let d = dashboard(&app);

    let body = fixtures::add_admin("Grant Reviewer", "reviewer@apiic.test");
    assert!(d.admins.create(&body).await);

    let state = d.admins.state();
    assert_eq!(state.items.len(), 2);
    let reviewer: AdminUser = state
        .items
        .iter()
        .find(|a| a.email == "reviewer@apiic.test")
        .cloned()
        .expect("new admin listed");
    assert_eq!(reviewer.role, AdminRole::Admin);
    assert!(reviewer.is_active);
    assert_eq!(
        reviewer.created_by.as_ref().map(|c| c.email.as_str()),
        Some(ADMIN_EMAIL)
    );

    // the new account can sign in
    let other = app.new_client();
    other
        .login(&payloads::requests::LoginCredentials {
            email: body.email.clone(),
            password: body.password.clone(),
        })
        .await?;

    app.clear_requests();
    assert!(d.admins.update_status(&reviewer.id, false).await);
    assert_eq!(
        app.requests()[0].target(),
        format!("PUT admin/admin/{}/status", reviewer.id)
    );
    let state = d.admins.state();
    assert!(!state.find(&reviewer.id).expect("still listed").is_active);

    let result = other
        .login(&payloads::requests::LoginCredentials {
            email: body.email.clone(),
            password: body.password.clone(),
        })
        .await;
    let error = result.expect_err("deactivated admin cannot sign in");
    assert_eq!(error.to_string(), "Account is deactivated");

    Ok(())
}

#[tokio::test]
async fn short_admin_password_is_rejected_locally() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    let d = dashboard(&app);
    app.clear_requests();

    let mut body = fixtures::add_admin("Grant Reviewer", "reviewer@apiic.test");
    body.password = "short".into();
    assert!(!d.admins.create(&body).await);

    assert_eq!(
        d.admins.state().field_errors.get("password"),
        Some("Password must be at least 8 characters")
    );
    assert!(app.requests().is_empty());

    Ok(())
}
