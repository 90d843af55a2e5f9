use reqwest::{Method, StatusCode, header::AUTHORIZATION};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use crate::{
    EntityId, Event, ListQuery, Mentor, Page, Pagination,
    requests::{self, SetActive},
    resources::{
        Editable, HasStats, Resource, Toggle, decode_item,
        mentor::MentorFilters, unwrap_item,
    },
    responses::{self, ApiEnvelope, User, unwrap_stats},
    session::Session,
};

/// Message used when the server gives no reason for a failure.
pub const FALLBACK_MESSAGE: &str = "API request failed";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// An API client for interfacing with the backend.
#[derive(Debug, Clone)]
pub struct APIClient {
    pub address: String,
    pub inner_client: reqwest::Client,
    pub session: Session,
}

impl APIClient {
    pub fn new(
        address: impl Into<String>,
        session: Session,
    ) -> Result<Self, ClientError> {
        Self::with_timeout(address, session, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        address: impl Into<String>,
        session: Session,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let inner_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            address: address.into().trim_end_matches('/').to_string(),
            inner_client,
            session,
        })
    }
}

/// Helper methods for http actions
impl APIClient {
    fn format_url(&self, path: &str) -> String {
        format!("{}/{}", &self.address, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let request = self.inner_client.request(method, self.format_url(path));
        match self.session.bearer() {
            Some(bearer) => request.header(AUTHORIZATION, bearer),
            None => request,
        }
    }

    /// Send one request and return the response envelope as-is.
    ///
    /// A 2xx response is returned even when `success` is false; only
    /// transport failures, unparseable bodies and non-2xx statuses are
    /// errors.
    pub async fn request_envelope(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<Value>,
    ) -> Result<ApiEnvelope, ClientError> {
        let mut request = self.request(method.clone(), path);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request.send().await.inspect_err(|e| {
            tracing::warn!(%method, path, "request failed: {e}");
        })?;
        let status = response.status();
        tracing::debug!(%method, path, status = status.as_u16(), "api response");

        let text = response.text().await?;
        if !status.is_success() {
            let error = api_error(Some(status), &text);
            tracing::warn!(%method, path, %status, "{error}");
            return Err(error);
        }
        Ok(serde_json::from_str(&text)?)
    }

    /// Like [`Self::request_envelope`], but a `success: false` envelope is
    /// an error.
    async fn call(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<Value>,
    ) -> Result<ApiEnvelope, ClientError> {
        let envelope = self.request_envelope(method, path, query, body).await?;
        if envelope.success {
            Ok(envelope)
        } else {
            Err(ClientError::Api {
                status: None,
                message: non_empty(envelope.message),
                errors: envelope.errors.unwrap_or_default(),
            })
        }
    }

    async fn empty_get(&self, path: &str) -> Result<ApiEnvelope, ClientError> {
        self.call(Method::GET, path, &[], None).await
    }

    async fn post(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<ApiEnvelope, ClientError> {
        let body = serde_json::to_value(body)?;
        self.call(Method::POST, path, &[], Some(body)).await
    }

    async fn put(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<ApiEnvelope, ClientError> {
        let body = serde_json::to_value(body)?;
        self.call(Method::PUT, path, &[], Some(body)).await
    }
}

/// Generic collection endpoints
impl APIClient {
    /// Fetch one page of a collection.
    pub async fn list<R: Resource>(
        &self,
        query: &ListQuery<R::Filters>,
    ) -> Result<Page<R>, ClientError> {
        let pairs = query.to_pairs()?;
        let mut envelope =
            self.call(Method::GET, &R::list_path(), &pairs, None).await?;

        let raw_items = envelope
            .take(R::COLLECTION_KEY)
            .ok_or(ClientError::MissingField(R::COLLECTION_KEY))?;
        let items = decode_list::<R>(raw_items)?;
        let pagination = Pagination::from_server(
            envelope.take("pagination").as_ref(),
            query.page,
            query.limit,
            items.len(),
        );
        Ok(Page { items, pagination })
    }

    pub async fn get<R: Resource>(&self, id: &EntityId) -> Result<R, ClientError> {
        let envelope = self.empty_get(&R::item_path(id)).await?;
        let data = envelope.data.ok_or(ClientError::MissingField("data"))?;
        Ok(unwrap_item(data)?)
    }

    /// Create a record, returning it when the server echoes it back.
    pub async fn create<R: Resource>(
        &self,
        draft: &R::Draft,
    ) -> Result<Option<R>, ClientError> {
        let envelope = self.post(&R::create_path(), draft).await?;
        echoed(envelope)
    }

    pub async fn update<R: Editable>(
        &self,
        id: &EntityId,
        patch: &R::Patch,
    ) -> Result<Option<R>, ClientError> {
        let envelope = self.put(&R::item_path(id), patch).await?;
        echoed(envelope)
    }

    pub async fn delete<R: Editable>(
        &self,
        id: &EntityId,
    ) -> Result<(), ClientError> {
        self.call(Method::DELETE, &R::item_path(id), &[], None)
            .await
            .map(|_| ())
    }

    /// Set `isActive` through the status-only endpoint.
    ///
    /// Returns the value the server reports, if it reports one.
    pub async fn set_status<R: Toggle>(
        &self,
        id: &EntityId,
        is_active: bool,
    ) -> Result<Option<bool>, ClientError> {
        let envelope = self
            .put(&R::status_path(id), &SetActive { is_active })
            .await?;
        let Some(data) = envelope.data else {
            return Ok(None);
        };
        let record = data.get(R::ITEM_KEY).unwrap_or(&data);
        Ok(record.get("isActive").and_then(Value::as_bool))
    }

    pub async fn stats<R: HasStats>(&self) -> Result<R::Stats, ClientError> {
        let envelope = self.empty_get(&R::stats_path()).await?;
        Ok(serde_json::from_value(unwrap_stats(envelope.data))?)
    }
}

/// Auth and account endpoints
impl APIClient {
    pub async fn health_check(
        &self,
    ) -> Result<responses::HealthStatus, ClientError> {
        let envelope = self.empty_get("health").await?;
        Ok(responses::HealthStatus {
            success: envelope.success,
            message: envelope.message,
        })
    }

    /// Log in and keep the returned token in the session.
    pub async fn login(
        &self,
        details: &requests::LoginCredentials,
    ) -> Result<responses::AuthResponse, ClientError> {
        let envelope = self.post("auth/login", details).await?;
        let auth = auth_response(envelope)?;
        self.session.set_token(auth.token.clone());
        Ok(auth)
    }

    pub async fn register(
        &self,
        details: &requests::Register,
    ) -> Result<responses::AuthResponse, ClientError> {
        let envelope = self.post("auth/register", details).await?;
        auth_response(envelope)
    }

    pub async fn current_user(&self) -> Result<User, ClientError> {
        let envelope = self.empty_get("auth/me").await?;
        user_of(envelope)
    }

    pub async fn update_profile(
        &self,
        details: &requests::UpdateProfile,
    ) -> Result<User, ClientError> {
        let envelope = self.put("auth/profile", details).await?;
        user_of(envelope)
    }

    /// Change the password of a signed-in reviewer or applicant.
    pub async fn update_password(
        &self,
        details: &requests::ChangePassword,
    ) -> Result<(), ClientError> {
        self.put("auth/password", details).await.map(|_| ())
    }

    /// Change the password of the signed-in admin.
    pub async fn change_password(
        &self,
        details: &requests::ChangePassword,
    ) -> Result<(), ClientError> {
        self.put("admin/change-password", details).await.map(|_| ())
    }
}

/// Public listing endpoints
impl APIClient {
    pub async fn upcoming_events(
        &self,
        limit: Option<u32>,
    ) -> Result<Vec<Event>, ClientError> {
        let query: Vec<_> = limit
            .map(|limit| ("limit".to_string(), limit.to_string()))
            .into_iter()
            .collect();
        let mut envelope = self
            .call(Method::GET, "event/public/upcoming", &query, None)
            .await?;
        let events = envelope
            .take(Event::COLLECTION_KEY)
            .ok_or(ClientError::MissingField(Event::COLLECTION_KEY))?;
        decode_list(events)
    }

    pub async fn public_mentors(
        &self,
        limit: Option<u32>,
        search: Option<&str>,
    ) -> Result<Vec<Mentor>, ClientError> {
        let query = ListQuery::<MentorFilters> {
            limit,
            search: search.map(str::to_string),
            ..ListQuery::default()
        };
        let mut envelope = self
            .call(Method::GET, "mentor/public/list", &query.to_pairs()?, None)
            .await?;
        let mentors = envelope
            .take(Mentor::COLLECTION_KEY)
            .ok_or(ClientError::MissingField(Mentor::COLLECTION_KEY))?;
        decode_list(mentors)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server refused the request, with its message.
    #[error("{message}")]
    Api {
        /// `None` when the refusal came as `success: false` on a 2xx.
        status: Option<StatusCode>,
        message: String,
        errors: Vec<String>,
    },
    #[error("Network error. Please check your connection.")]
    Network(#[from] reqwest::Error),
    #[error("Unexpected response from server: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Response is missing `{0}`")]
    MissingField(&'static str),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => *status,
            Self::Network(e) => e.status(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }
}

fn non_empty(message: String) -> String {
    if message.trim().is_empty() {
        FALLBACK_MESSAGE.to_string()
    } else {
        message
    }
}

/// Build the error for a non-2xx response from whatever body it carried.
fn api_error(status: Option<StatusCode>, body: &str) -> ClientError {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let message = parsed
        .as_ref()
        .and_then(|v| v.get("message"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let errors = parsed
        .as_ref()
        .and_then(|v| v.get("errors"))
        .and_then(|v| serde_json::from_value(v.clone()).ok())
        .unwrap_or_default();
    ClientError::Api {
        status,
        message: non_empty(message),
        errors,
    }
}

fn decode_list<R: Resource>(raw: Value) -> Result<Vec<R>, ClientError> {
    let raw: Vec<Value> = serde_json::from_value(raw)?;
    let items = raw
        .into_iter()
        .map(decode_item::<R>)
        .collect::<Result<Vec<R>, _>>()?;
    Ok(items)
}

fn echoed<R: Resource>(envelope: ApiEnvelope) -> Result<Option<R>, ClientError> {
    match envelope.data {
        None | Some(Value::Null) => Ok(None),
        Some(data) => Ok(Some(unwrap_item(data)?)),
    }
}

fn auth_response(
    mut envelope: ApiEnvelope,
) -> Result<responses::AuthResponse, ClientError> {
    let token = envelope
        .take("token")
        .and_then(|t| t.as_str().map(str::to_string))
        .ok_or(ClientError::MissingField("token"))?;
    let user = envelope.take("user").ok_or(ClientError::MissingField("user"))?;
    Ok(responses::AuthResponse {
        user: User::from_raw(user)?,
        token,
    })
}

fn user_of(mut envelope: ApiEnvelope) -> Result<User, ClientError> {
    let user = envelope.take("user").ok_or(ClientError::MissingField("user"))?;
    Ok(User::from_raw(user)?)
}
