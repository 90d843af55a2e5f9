pub mod backend;
pub mod fixtures;
pub mod mock;
pub mod telemetry;

use backend::{
    ADMIN_EMAIL, ADMIN_PASSWORD, API_PREFIX, Failure, FakeBackend,
    RecordedRequest,
};
use jiff::{Span, Timestamp};
use payloads::{APIClient, Session, requests::LoginCredentials};
use reqwest::StatusCode;
use serde_json::{Value, json};
use std::{net::TcpListener, time::Duration};
use tracing_log::LogTracer;
use tracing_subscriber::util::SubscriberInitExt;

pub struct TestApp {
    pub port: u16,
    /// Base URL of the API, including its path prefix.
    pub address: String,
    pub client: APIClient,
    pub backend: FakeBackend,
}

/// Session helpers
impl TestApp {
    /// A client for the same backend with its own, empty session.
    pub fn new_client(&self) -> APIClient {
        self.client_with_session(Session::in_memory())
    }

    pub fn client_with_session(&self, session: Session) -> APIClient {
        APIClient::new(&self.address, session)
            .expect("Failed to build API client")
    }

    /// Log the default client in as the seeded super admin.
    pub async fn login_admin(&self) -> anyhow::Result<()> {
        self.client.login(&admin_login_credentials()).await?;
        Ok(())
    }
}

/// Request log and fault injection
impl TestApp {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.backend.requests()
    }

    /// Requests whose path is exactly `path`, in arrival order.
    pub fn requests_to(
        &self,
        method: &str,
        path: &str,
    ) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    pub fn clear_requests(&self) {
        self.backend.clear_requests();
    }

    /// Answer the next matching request with `status` and `message`.
    pub fn fail_next(&self, matcher: &str, status: StatusCode, message: &str) {
        let status = actix_web::http::StatusCode::from_u16(status.as_u16())
            .expect("reqwest and actix agree on status codes");
        self.backend
            .fail_next(matcher, Failure::Status(status, message.to_string()));
    }

    /// Answer the next matching request `200 OK` with `success: false`.
    pub fn refuse_next(&self, matcher: &str, message: &str) {
        self.backend
            .fail_next(matcher, Failure::Refused(message.to_string()));
    }

    pub fn delay_next(&self, matcher: &str, delay: Duration) {
        self.backend.delay_next(matcher, delay);
    }
}

/// Functions to populate test data
///
/// Using anyhow::Result lets us get a backtrace from when the error was fist
/// converted to anyhow::Result. Run with RUST_BACKTRACE=1 to view.
impl TestApp {
    /// Insert `count` announcements titled `Announcement 01`, `02`, ...,
    /// each created one minute after the previous one.
    pub fn seed_announcements(
        &self,
        count: usize,
    ) -> anyhow::Result<Vec<String>> {
        let start = Timestamp::now().checked_sub(Span::new().hours(24))?;
        let mut ids = Vec::with_capacity(count);
        for i in 1..=count {
            let created_at = start.checked_add(Span::new().minutes(i as i64))?;
            let record = json!({
                "title": format!("Announcement {i:02}"),
                "description": "Seeded announcement for list tests.",
                "link": "https://apiic.example.org/news",
                "status": if i % 3 == 0 { "draft" } else { "published" },
                "priority": "medium",
                "isActive": true,
                "createdAt": created_at.to_string(),
                "updatedAt": created_at.to_string(),
            });
            ids.push(self.insert("announcement", record)?);
        }
        Ok(ids)
    }

    pub fn seed_mentor(
        &self,
        name: &str,
        is_active: bool,
    ) -> anyhow::Result<String> {
        let email = name.to_lowercase().replace(' ', ".");
        let record = json!({
            "name": name,
            "email": format!("{email}@example.com"),
            "phone": "+91-9000000000",
            "designation": "Advisor",
            "company": "Contoso",
            "expertise": ["Product"],
            "bio": "Seeded mentor.",
            "isActive": is_active,
        });
        self.insert("mentor", record)
    }

    /// Insert a raw record into a collection, returning its id.
    pub fn insert(&self, path: &str, record: Value) -> anyhow::Result<String> {
        self.backend
            .insert(path, record)
            .ok_or_else(|| anyhow::anyhow!("cannot insert into {path}"))
    }
}

pub fn admin_login_credentials() -> LoginCredentials {
    LoginCredentials {
        email: ADMIN_EMAIL.to_string(),
        password: ADMIN_PASSWORD.to_string(),
    }
}

pub async fn spawn_app_on_port(port: u16) -> TestApp {
    let subscriber = telemetry::get_subscriber("error".into());
    let _ = LogTracer::init();
    let _ = subscriber.try_init();

    // OS assigns the port if binding to 0
    let listener = TcpListener::bind(("127.0.0.1", port))
        .expect("Failed to bind test backend");
    let port = listener.local_addr().expect("Listener has no address").port();

    let backend = FakeBackend::new();
    let server = backend::build(listener, backend.clone())
        .expect("Failed to build test backend");
    tokio::spawn(server);

    let address = format!("http://127.0.0.1:{port}{API_PREFIX}");
    let client = APIClient::new(&address, Session::in_memory())
        .expect("Failed to build API client");

    TestApp {
        port,
        address,
        client,
        backend,
    }
}

/// Spawn a fresh backend on an OS-assigned port.
pub async fn spawn_app() -> TestApp {
    spawn_app_on_port(0).await
}

/// Assert that the result of an API action results in a specific status code.
pub fn assert_status_code<T>(
    result: Result<T, payloads::ClientError>,
    expected: StatusCode,
) {
    match result {
        Err(e @ payloads::ClientError::Api { .. }) => {
            assert_eq!(e.status(), Some(expected))
        }
        _ => panic!("Expected ClientError::Api"),
    };
}
