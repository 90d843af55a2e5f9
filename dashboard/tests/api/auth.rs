use dashboard::{AuthError, AuthState, Dashboard};
use payloads::{
    ClientError, MemoryTokenStore, Session, TokenStore,
    requests::{ChangePassword, UpdateProfile},
    responses::UserRole,
};
use std::sync::Arc;
use test_helpers::{
    backend::{ADMIN_EMAIL, ADMIN_NAME, ADMIN_PASSWORD},
    spawn_app,
};

use crate::dashboard;

#[tokio::test]
async fn login_sets_session() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let d = dashboard(&app);
    assert_eq!(d.auth.state(), AuthState::Unknown);

    let user = d.auth.login(ADMIN_EMAIL, ADMIN_PASSWORD).await?;
    assert_eq!(user.name, ADMIN_NAME);
    assert_eq!(user.role, UserRole::SuperAdmin);
    assert!(d.auth.is_authenticated());
    assert_eq!(d.auth.state().user(), Some(&user));

    // the token is sent from now on
    d.announcements.refetch().await;
    let request = app.requests().pop().expect("list request");
    assert!(request.authorized);
    assert_eq!(d.announcements.state().error, None);

    Ok(())
}

#[tokio::test]
async fn login_refused() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let d = dashboard(&app);

    let result = d.auth.login(ADMIN_EMAIL, "not-the-password").await;
    match result {
        Err(AuthError::Client(e @ ClientError::Api { .. })) => {
            assert!(e.is_unauthorized());
            assert_eq!(e.to_string(), "Invalid credentials");
        }
        other => panic!("Expected an API error, got {other:?}"),
    }
    assert!(!d.auth.is_authenticated());
    assert_eq!(d.auth.state(), AuthState::Unknown);

    Ok(())
}

#[tokio::test]
async fn check_without_token_is_logged_out() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let d = dashboard(&app);
    app.clear_requests();

    assert_eq!(d.auth.check().await, AuthState::LoggedOut);
    assert!(app.requests().is_empty());

    Ok(())
}

#[tokio::test]
async fn check_restores_persisted_session() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let store = Arc::new(MemoryTokenStore::default());
    let first = Dashboard::new(
        app.client_with_session(Session::new(store.clone())),
        10,
    );
    first.auth.login(ADMIN_EMAIL, ADMIN_PASSWORD).await?;

    // a second process picking up the same store
    let second =
        Dashboard::new(app.client_with_session(Session::new(store)), 10);
    assert!(second.auth.is_authenticated());
    let state = second.auth.check().await;
    assert_eq!(state.user().map(|u| u.email.as_str()), Some(ADMIN_EMAIL));

    Ok(())
}

#[tokio::test]
async fn rejected_token_is_cleared() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let store = Arc::new(MemoryTokenStore::default());
    let d = Dashboard::new(
        app.client_with_session(Session::new(store.clone())),
        10,
    );
    d.auth.login(ADMIN_EMAIL, ADMIN_PASSWORD).await?;
    assert!(store.load()?.is_some());

    app.backend.revoke_tokens();

    assert_eq!(d.auth.check().await, AuthState::LoggedOut);
    assert!(!d.auth.is_authenticated());
    assert_eq!(store.load()?, None);

    Ok(())
}

#[tokio::test]
async fn logout_clears_session() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let d = dashboard(&app);
    d.auth.login(ADMIN_EMAIL, ADMIN_PASSWORD).await?;

    let mut states = d.auth.subscribe();
    d.auth.logout();

    assert!(states.has_changed()?);
    assert_eq!(*states.borrow_and_update(), AuthState::LoggedOut);
    assert!(!d.auth.is_authenticated());

    d.announcements.refetch().await;
    assert_eq!(
        d.announcements.state().error.as_deref(),
        Some("Not authorized, no token")
    );

    Ok(())
}

#[tokio::test]
async fn register_signs_in_as_applicant() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let d = dashboard(&app);

    let user = d
        .auth
        .register("Kiran Das", "kiran@example.com", "kiran-password", None)
        .await?;
    assert_eq!(user.role, UserRole::Applicant);
    assert!(d.auth.is_authenticated());

    let me = app.client.current_user().await?;
    assert_eq!(me.email, "kiran@example.com");

    Ok(())
}

#[tokio::test]
async fn change_password() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let d = dashboard(&app);
    d.auth.login(ADMIN_EMAIL, ADMIN_PASSWORD).await?;

    // mismatched confirmation never reaches the backend
    app.clear_requests();
    let mismatched = ChangePassword {
        current_password: ADMIN_PASSWORD.into(),
        new_password: "fresh-password".into(),
        confirm_password: "fresh-passwort".into(),
    };
    match d.auth.change_password(&mismatched).await {
        Err(AuthError::Invalid(errors)) => {
            assert_eq!(
                errors.get("confirmPassword"),
                Some("New passwords do not match")
            );
        }
        other => panic!("Expected a validation error, got {other:?}"),
    }
    assert!(app.requests().is_empty());

    let wrong_current = ChangePassword {
        current_password: "guess-password".into(),
        new_password: "fresh-password".into(),
        confirm_password: "fresh-password".into(),
    };
    let error = d
        .auth
        .change_password(&wrong_current)
        .await
        .expect_err("current password is wrong");
    assert_eq!(error.to_string(), "Current password is incorrect");

    let valid = ChangePassword {
        current_password: ADMIN_PASSWORD.into(),
        ..wrong_current
    };
    app.clear_requests();
    d.auth.change_password(&valid).await?;
    assert_eq!(app.requests()[0].target(), "PUT admin/change-password");

    d.auth.logout();
    assert!(d.auth.login(ADMIN_EMAIL, ADMIN_PASSWORD).await.is_err());
    d.auth.login(ADMIN_EMAIL, "fresh-password").await?;

    Ok(())
}

#[tokio::test]
async fn applicant_password_uses_auth_route() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let d = dashboard(&app);
    d.auth
        .register("Kiran Das", "kiran@example.com", "kiran-password", None)
        .await?;

    app.clear_requests();
    let details = ChangePassword {
        current_password: "kiran-password".into(),
        new_password: "kiran-password-2".into(),
        confirm_password: "kiran-password-2".into(),
    };
    d.auth.change_password(&details).await?;
    assert_eq!(app.requests()[0].target(), "PUT auth/password");

    d.auth.logout();
    d.auth.login("kiran@example.com", "kiran-password-2").await?;

    Ok(())
}

#[tokio::test]
async fn update_profile_refreshes_user() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let d = dashboard(&app);
    d.auth.login(ADMIN_EMAIL, ADMIN_PASSWORD).await?;

    let details = UpdateProfile {
        name: Some("Programme Office".into()),
        ..UpdateProfile::default()
    };
    let user = d.auth.update_profile(&details).await?;
    assert_eq!(user.name, "Programme Office");
    assert_eq!(user.email, ADMIN_EMAIL);
    assert_eq!(
        d.auth.state().user().map(|u| u.name.as_str()),
        Some("Programme Office")
    );

    Ok(())
}
