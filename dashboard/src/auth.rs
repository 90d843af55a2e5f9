//! Sign-in state of the dashboard, layered over the client's session.

use payloads::{
    APIClient, ClientError, FieldErrors, Validate,
    requests::{ChangePassword, LoginCredentials, Register, UpdateProfile},
    responses::User,
};
use std::sync::Arc;
use tokio::sync::watch;

pub const DEFAULT_REGISTER_ROLE: &str = "applicant";

#[derive(Debug, Clone, PartialEq, Default)]
pub enum AuthState {
    /// Not checked yet.
    #[default]
    Unknown,
    LoggedOut,
    LoggedIn(User),
}

impl AuthState {
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::LoggedIn(user) => Some(user),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("{0}")]
    Invalid(FieldErrors),
    #[error(transparent)]
    Client(#[from] ClientError),
}

#[derive(Debug, Clone)]
pub struct Auth {
    client: APIClient,
    state: Arc<watch::Sender<AuthState>>,
}

impl Auth {
    pub fn new(client: APIClient) -> Self {
        Self {
            client,
            state: Arc::new(watch::Sender::new(AuthState::Unknown)),
        }
    }

    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub fn is_authenticated(&self) -> bool {
        self.client.session.is_authenticated()
    }

    /// Resolve the persisted token, if any, to a signed-in user.
    ///
    /// A token the backend no longer accepts is cleared.
    #[tracing::instrument(skip(self))]
    pub async fn check(&self) -> AuthState {
        if !self.client.session.is_authenticated() {
            self.state.send_replace(AuthState::LoggedOut);
            return AuthState::LoggedOut;
        }
        let state = match self.client.current_user().await {
            Ok(user) => AuthState::LoggedIn(user),
            Err(e) => {
                tracing::info!("persisted session rejected: {e}");
                self.client.session.clear_token();
                AuthState::LoggedOut
            }
        };
        self.state.send_replace(state.clone());
        state
    }

    #[tracing::instrument(skip(self, password))]
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let details = LoginCredentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        let auth = self.client.login(&details).await?;
        self.state.send_replace(AuthState::LoggedIn(auth.user.clone()));
        Ok(auth.user)
    }

    /// Create an account and sign in as it. The role defaults to
    /// `applicant`.
    #[tracing::instrument(skip(self, password))]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Option<&str>,
    ) -> Result<User, AuthError> {
        let details = Register {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role: Some(role.unwrap_or(DEFAULT_REGISTER_ROLE).to_string()),
        };
        let auth = self.client.register(&details).await?;
        self.client.session.set_token(auth.token);
        self.state.send_replace(AuthState::LoggedIn(auth.user.clone()));
        Ok(auth.user)
    }

    pub fn logout(&self) {
        self.client.session.clear_token();
        self.state.send_replace(AuthState::LoggedOut);
        tracing::info!("logged out");
    }

    #[tracing::instrument(skip_all)]
    pub async fn change_password(
        &self,
        details: &ChangePassword,
    ) -> Result<(), AuthError> {
        details.validate().map_err(AuthError::Invalid)?;
        let admin = self
            .state()
            .user()
            .is_none_or(|user| user.role.is_admin());
        if admin {
            self.client.change_password(details).await?;
        } else {
            self.client.update_password(details).await?;
        }
        Ok(())
    }

    #[tracing::instrument(skip_all)]
    pub async fn update_profile(
        &self,
        details: &UpdateProfile,
    ) -> Result<User, AuthError> {
        let user = self.client.update_profile(details).await?;
        self.state.send_replace(AuthState::LoggedIn(user.clone()));
        Ok(user)
    }
}
