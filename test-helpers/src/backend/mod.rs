//! In-memory stand-in for the incubator REST backend.
//!
//! Records are kept as raw JSON, exactly as the real backend would return
//! them (Mongo-style `_id`, camelCase fields). Besides serving the routes in
//! [`routes`], the backend records every request it receives and can be told
//! to fail or stall the next matching request.

pub mod routes;

use actix_web::{App, HttpRequest, HttpServer, dev::Server, http::StatusCode, web};
use jiff::Timestamp;
use payloads::{
    AdminUser, Announcement, Blog, ContactSubmission, Event,
    IncubationApplication, Mentor, PreIncubationApplication, Program, Resource,
};
use serde_json::{Map, Value, json};
use std::{
    cmp::Ordering,
    collections::HashMap,
    net::TcpListener,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};
use uuid::Uuid;

pub const API_PREFIX: &str = "/apiic_api";

pub const ADMIN_NAME: &str = "Site Admin";
pub const ADMIN_EMAIL: &str = "admin@apiic.test";
pub const ADMIN_PASSWORD: &str = "admin-password";

/// How one collection is addressed and wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collection {
    pub path: &'static str,
    pub collection_key: &'static str,
    pub item_key: &'static str,
    pub label: &'static str,
    /// Applications still answer with `{current, pages, total, limit}`.
    pub legacy_pagination: bool,
    /// Record field the list date range applies to, with the names of the
    /// lower and upper bound parameters.
    pub date_range: Option<(&'static str, &'static str, &'static str)>,
}

impl Collection {
    fn of<R: Resource>() -> Self {
        Self {
            path: R::PATH,
            collection_key: R::COLLECTION_KEY,
            item_key: R::ITEM_KEY,
            label: R::LABEL,
            legacy_pagination: false,
            date_range: None,
        }
    }

    pub fn all() -> [Self; 9] {
        [
            Self::of::<Announcement>(),
            Self::of::<Blog>(),
            Self {
                date_range: Some(("submittedAt", "dateFrom", "dateTo")),
                ..Self::of::<ContactSubmission>()
            },
            Self {
                date_range: Some(("date", "startDate", "endDate")),
                ..Self::of::<Event>()
            },
            Self::of::<Mentor>(),
            Self {
                legacy_pagination: true,
                ..Self::of::<IncubationApplication>()
            },
            Self {
                legacy_pagination: true,
                ..Self::of::<PreIncubationApplication>()
            },
            Self::of::<Program>(),
            Self::of::<AdminUser>(),
        ]
    }

    pub fn find(path: &str) -> Option<Self> {
        Self::all().into_iter().find(|c| c.path == path)
    }

    pub fn not_found(&self) -> BackendError {
        BackendError::NotFound(format!("{} not found", capitalized(self.label)))
    }
}

/// A canned failure for the next matching request.
#[derive(Debug, Clone, PartialEq)]
pub enum Failure {
    /// Answer with this status and `{success: false, message}`.
    Status(StatusCode, String),
    /// Answer `200 OK` with `{success: false, message}`.
    Refused(String),
}

/// One request as the backend saw it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: String,
    /// Path relative to the API prefix, e.g. `announcement/66a1`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub authorized: bool,
}

impl RecordedRequest {
    /// `"<METHOD> <path>?<query>"`, what failure and delay matchers are
    /// tested against. The `?` is left out when there is no query.
    pub fn target(&self) -> String {
        let target = format!("{} {}", self.method, self.path);
        if self.query.is_empty() {
            return target;
        }
        let query: Vec<_> =
            self.query.iter().map(|(k, v)| format!("{k}={v}")).collect();
        format!("{target}?{}", query.join("&"))
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone)]
struct Account {
    user: Value,
    password: String,
}

#[derive(Debug, Default)]
pub struct BackendState {
    collections: HashMap<&'static str, Vec<Value>>,
    accounts: Vec<Account>,
    /// token -> account email
    tokens: HashMap<String, String>,
    requests: Vec<RecordedRequest>,
    failures: Vec<(String, Failure)>,
    delays: Vec<(String, Duration)>,
}

impl BackendState {
    fn records(&mut self, collection: &Collection) -> &mut Vec<Value> {
        self.collections.entry(collection.path).or_default()
    }

    fn account_mut(&mut self, email: &str) -> Option<&mut Account> {
        self.accounts
            .iter_mut()
            .find(|a| a.user["email"].as_str() == Some(email))
    }

    fn take_matching<T>(
        rules: &mut Vec<(String, T)>,
        target: &str,
    ) -> Option<T> {
        let index = rules.iter().position(|(m, _)| target.contains(m))?;
        Some(rules.remove(index).1)
    }
}

#[derive(Debug, Clone)]
pub struct FakeBackend {
    state: Arc<Mutex<BackendState>>,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Test controls
impl FakeBackend {
    /// A backend with one super admin account and nothing else.
    pub fn new() -> Self {
        let backend = Self {
            state: Arc::new(Mutex::new(BackendState::default())),
        };
        backend.with(|s| {
            let user = new_user(ADMIN_NAME, ADMIN_EMAIL, "super_admin");
            let admins = admin_collection();
            s.records(&admins).push(user.clone());
            s.accounts.push(Account {
                user,
                password: ADMIN_PASSWORD.to_string(),
            });
        });
        backend
    }

    fn with<T>(&self, f: impl FnOnce(&mut BackendState) -> T) -> T {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.with(|s| s.requests.clone())
    }

    pub fn clear_requests(&self) {
        self.with(|s| s.requests.clear());
    }

    /// Fail the next request whose target contains `matcher`.
    pub fn fail_next(&self, matcher: impl Into<String>, failure: Failure) {
        self.with(|s| s.failures.push((matcher.into(), failure)));
    }

    /// Hold the next request whose target contains `matcher` for `delay`
    /// before answering it.
    pub fn delay_next(&self, matcher: impl Into<String>, delay: Duration) {
        self.with(|s| s.delays.push((matcher.into(), delay)));
    }

    /// Store a raw record as-is apart from filling in `_id` and timestamps
    /// when missing. Returns its id.
    pub fn insert(&self, path: &str, mut record: Value) -> Option<String> {
        let collection = Collection::find(path)?;
        let fields = record.as_object_mut()?;
        let now = Value::String(Timestamp::now().to_string());
        fields
            .entry("_id")
            .or_insert_with(|| Value::String(new_id()));
        fields.entry("createdAt").or_insert_with(|| now.clone());
        fields.entry("updatedAt").or_insert(now);
        let id = fields.get("_id")?.as_str()?.to_string();
        self.with(|s| s.records(&collection).push(record));
        Some(id)
    }

    pub fn records(&self, path: &str) -> Vec<Value> {
        match Collection::find(path) {
            Some(collection) => self.with(|s| s.records(&collection).clone()),
            None => Vec::new(),
        }
    }

    /// Forget every issued token.
    pub fn revoke_tokens(&self) {
        self.with(|s| s.tokens.clear());
    }
}

/// Request plumbing shared by the handlers
impl FakeBackend {
    /// Log the request, apply any pending delay, then any pending failure.
    async fn admit(&self, req: &HttpRequest) -> Result<(), BackendError> {
        let authorized = self.user_for(req).is_ok();
        let recorded = RecordedRequest {
            method: req.method().to_string(),
            path: req
                .path()
                .trim_start_matches(API_PREFIX)
                .trim_start_matches('/')
                .to_string(),
            query: web::Query::<Vec<(String, String)>>::from_query(
                req.query_string(),
            )
            .map(web::Query::into_inner)
            .unwrap_or_default(),
            authorized,
        };
        let target = recorded.target();
        let (delay, failure) = self.with(|s| {
            s.requests.push(recorded);
            (
                BackendState::take_matching(&mut s.delays, &target),
                BackendState::take_matching(&mut s.failures, &target),
            )
        });

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        match failure {
            Some(failure) => Err(BackendError::Injected(failure)),
            None => Ok(()),
        }
    }

    /// The account behind the request's bearer token.
    fn user_for(&self, req: &HttpRequest) -> Result<Value, BackendError> {
        let token = req
            .headers()
            .get(actix_web::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(|| {
                BackendError::Unauthorized("Not authorized, no token".into())
            })?;
        self.with(|s| {
            let email = s.tokens.get(token).cloned();
            email
                .and_then(|email| s.account_mut(&email).map(|a| a.user.clone()))
                .ok_or_else(|| {
                    BackendError::Unauthorized(
                        "Not authorized, token failed".into(),
                    )
                })
        })
    }

    async fn authorized(&self, req: &HttpRequest) -> Result<Value, BackendError> {
        self.admit(req).await?;
        self.user_for(req)
    }
}

/// Collection operations
impl FakeBackend {
    fn list(
        &self,
        collection: &Collection,
        params: &[(String, String)],
    ) -> Value {
        let records = self.with(|s| s.records(collection).clone());
        let (items, pagination) = list_page(collection, records, params);
        json!({
            collection.collection_key: items,
            "pagination": pagination,
        })
    }

    fn get(&self, collection: &Collection, id: &str) -> Result<Value, BackendError> {
        self.with(|s| {
            s.records(collection)
                .iter()
                .find(|r| r["_id"].as_str() == Some(id))
                .cloned()
        })
        .ok_or_else(|| collection.not_found())
    }

    fn create(
        &self,
        collection: &Collection,
        body: Value,
        actor: &Value,
    ) -> Result<Value, BackendError> {
        let record = new_record(collection, body, actor)?;
        self.with(|s| s.records(collection).push(record.clone()));
        Ok(record)
    }

    fn update(
        &self,
        collection: &Collection,
        id: &str,
        patch: Value,
        actor: &Value,
    ) -> Result<Value, BackendError> {
        let Value::Object(patch) = patch else {
            return Err(BackendError::BadRequest("Invalid request body".into()));
        };
        self.with(|s| {
            let record = s
                .records(collection)
                .iter_mut()
                .find(|r| r["_id"].as_str() == Some(id))
                .ok_or_else(|| collection.not_found())?;
            apply_patch(collection, record, patch, actor);
            Ok(record.clone())
        })
    }

    fn delete(&self, collection: &Collection, id: &str) -> Result<(), BackendError> {
        self.with(|s| {
            let records = s.records(collection);
            let before = records.len();
            records.retain(|r| r["_id"].as_str() != Some(id));
            if records.len() == before {
                Err(collection.not_found())
            } else {
                Ok(())
            }
        })
    }

    fn set_active(
        &self,
        collection: &Collection,
        id: &str,
        is_active: bool,
        actor: &Value,
    ) -> Result<Value, BackendError> {
        let patch = Map::from_iter([("isActive".to_string(), json!(is_active))]);
        let record = self.update(collection, id, Value::Object(patch), actor)?;
        // admin accounts follow their admin record
        if collection.path == AdminUser::PATH
            && let Some(email) = record["email"].as_str()
        {
            self.with(|s| {
                if let Some(account) = s.account_mut(email) {
                    account.user["isActive"] = json!(is_active);
                }
            });
        }
        Ok(record)
    }
}

/// Accounts and tokens
impl FakeBackend {
    fn login(&self, email: &str, password: &str) -> Result<(Value, String), BackendError> {
        self.with(|s| {
            let account = s
                .account_mut(email)
                .filter(|a| a.password == password)
                .ok_or_else(|| {
                    BackendError::Unauthorized("Invalid credentials".into())
                })?;
            if account.user["isActive"] == json!(false) {
                return Err(BackendError::Unauthorized(
                    "Account is deactivated".into(),
                ));
            }
            account.user["lastLogin"] = json!(Timestamp::now().to_string());
            let user = account.user.clone();
            let token = new_id();
            s.tokens.insert(token.clone(), email.to_string());
            Ok((user, token))
        })
    }

    fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: &str,
    ) -> Result<Value, BackendError> {
        self.with(|s| {
            if s.account_mut(email).is_some() {
                return Err(BackendError::BadRequest("User already exists".into()));
            }
            let user = new_user(name, email, role);
            s.accounts.push(Account {
                user: user.clone(),
                password: password.to_string(),
            });
            Ok(user)
        })
    }

    fn add_admin(
        &self,
        body: Value,
        actor: &Value,
    ) -> Result<Value, BackendError> {
        let field = |key: &str| body[key].as_str().unwrap_or_default().to_string();
        let (name, email, password) =
            (field("name"), field("email"), field("password"));
        if name.is_empty() || email.is_empty() {
            return Err(BackendError::BadRequest(
                "Name and email are required".into(),
            ));
        }
        if password.chars().count() < 8 {
            return Err(BackendError::BadRequest(
                "Password must be at least 8 characters".into(),
            ));
        }
        let role = body["role"].as_str().unwrap_or("admin");
        let mut user = self.register(&name, &email, &password, role)?;
        user["createdBy"] = audit_ref(actor);
        self.with(|s| s.records(&admin_collection()).push(user.clone()));
        Ok(user)
    }

    fn update_profile(
        &self,
        email: &str,
        patch: &Value,
    ) -> Result<Value, BackendError> {
        self.with(|s| {
            let account = s.account_mut(email).ok_or_else(|| {
                BackendError::NotFound("User not found".into())
            })?;
            for key in ["name", "email"] {
                if let Some(value) = patch[key].as_str() {
                    account.user[key] = json!(value);
                }
            }
            let user = account.user.clone();
            if let Some(new_email) = user["email"].as_str()
                && new_email != email
            {
                for owner in s.tokens.values_mut() {
                    if owner == email {
                        *owner = new_email.to_string();
                    }
                }
            }
            Ok(user)
        })
    }

    fn change_password(
        &self,
        email: &str,
        current: &str,
        new: &str,
    ) -> Result<(), BackendError> {
        self.with(|s| {
            let account = s.account_mut(email).ok_or_else(|| {
                BackendError::NotFound("User not found".into())
            })?;
            if account.password != current {
                return Err(BackendError::BadRequest(
                    "Current password is incorrect".into(),
                ));
            }
            account.password = new.to_string();
            Ok(())
        })
    }
}

/// Bind the backend to `listener` under [`API_PREFIX`].
pub fn build(listener: TcpListener, backend: FakeBackend) -> std::io::Result<Server> {
    let backend = web::Data::new(backend);
    let server = HttpServer::new(move || {
        App::new()
            .service(routes::api_services())
            .app_data(backend.clone())
    })
    .workers(1)
    .listen(listener)?
    .run();
    Ok(server)
}

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{}", failure_message(.0))]
    Injected(Failure),
}

impl actix_web::ResponseError for BackendError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Injected(Failure::Status(status, _)) => *status,
            Self::Injected(Failure::Refused(_)) => StatusCode::OK,
        }
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        actix_web::HttpResponse::build(self.status_code())
            .json(json!({"success": false, "message": self.to_string()}))
    }
}

fn failure_message(failure: &Failure) -> &str {
    match failure {
        Failure::Status(_, message) | Failure::Refused(message) => message,
    }
}

fn admin_collection() -> Collection {
    Collection::of::<AdminUser>()
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

fn new_user(name: &str, email: &str, role: &str) -> Value {
    json!({
        "_id": new_id(),
        "name": name,
        "email": email,
        "role": role,
        "isActive": true,
        "createdAt": Timestamp::now().to_string(),
    })
}

fn audit_ref(user: &Value) -> Value {
    json!({"name": user["name"], "email": user["email"]})
}

fn capitalized(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Build a stored record from a create body.
fn new_record(
    collection: &Collection,
    body: Value,
    actor: &Value,
) -> Result<Value, BackendError> {
    let Value::Object(mut fields) = body else {
        return Err(BackendError::BadRequest("Invalid request body".into()));
    };
    fields.remove("id");
    fields.remove("_id");

    let now = json!(Timestamp::now().to_string());
    let mut defaults = Vec::new();
    match collection.path {
        "announcement" | "mentor" => {
            defaults.push(("isActive", json!(true)));
            defaults.push(("createdBy", audit_ref(actor)));
        }
        "blog" => defaults.push(("tags", json!([]))),
        "event" => defaults.push(("status", json!("upcoming"))),
        "contact" => defaults.extend([
            ("status", json!("new")),
            ("priority", json!("medium")),
            ("source", json!("website")),
            ("subscribeNewsletter", json!(false)),
            ("submittedAt", now.clone()),
        ]),
        "incubation" | "pre-incubation" => defaults.extend([
            ("applicationType", json!(collection.path)),
            ("applicationStatus", json!("submitted")),
            ("submittedAt", now.clone()),
        ]),
        _ => {}
    }
    for (key, value) in defaults {
        fields.entry(key).or_insert(value);
    }
    // the server always assigns these
    fields.insert("_id".into(), json!(new_id()));
    fields.insert("createdAt".into(), now.clone());
    fields.insert("updatedAt".into(), now);
    Ok(Value::Object(fields))
}

fn apply_patch(
    collection: &Collection,
    record: &mut Value,
    patch: Map<String, Value>,
    actor: &Value,
) {
    let Value::Object(fields) = record else {
        return;
    };
    let responding = collection.path == "contact" && patch.contains_key("response");
    for (key, value) in patch {
        if key != "_id" && key != "id" {
            fields.insert(key, value);
        }
    }
    let now = json!(Timestamp::now().to_string());
    if responding {
        fields.insert("respondedAt".into(), now.clone());
        fields.insert("respondedBy".into(), audit_ref(actor));
        if fields.get("status") == Some(&json!("new")) {
            fields.insert("status".into(), json!("responded"));
        }
    }
    if collection.path != "contact" {
        fields.insert("updatedAt".into(), now);
        fields.insert("updatedBy".into(), audit_ref(actor));
    }
}

const RESERVED_PARAMS: [&str; 5] = ["page", "limit", "search", "sortBy", "sortOrder"];

/// Search, filter, sort and paginate `records` per the list query.
fn list_page(
    collection: &Collection,
    records: Vec<Value>,
    params: &[(String, String)],
) -> (Vec<Value>, Value) {
    let param = |key: &str| {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    };

    let mut items: Vec<Value> = records
        .into_iter()
        .filter(|r| param("search").is_none_or(|term| matches_search(r, term)))
        .filter(|r| {
            params.iter().all(|(key, value)| {
                let is_range = collection.date_range.is_some_and(|(_, from, to)| {
                    key == from || key == to
                });
                RESERVED_PARAMS.contains(&key.as_str())
                    || is_range
                    || field_equals(&r[key.as_str()], value)
            })
        })
        .filter(|r| match collection.date_range {
            Some((field, from, to)) => {
                in_range(&r[field], param(from), param(to))
            }
            None => true,
        })
        .collect();

    let sort_by = param("sortBy").unwrap_or("createdAt");
    let ascending = param("sortOrder") == Some("asc");
    items.sort_by(|a, b| {
        let ordering = compare_fields(&a[sort_by], &b[sort_by]);
        if ascending { ordering } else { ordering.reverse() }
    });

    let total = items.len() as u64;
    let limit = param("limit")
        .and_then(|l| l.parse::<u64>().ok())
        .filter(|l| *l > 0)
        .unwrap_or(10);
    let page = param("page")
        .and_then(|p| p.parse::<u64>().ok())
        .filter(|p| *p > 0)
        .unwrap_or(1);
    let pages = total.div_ceil(limit);
    let items: Vec<Value> = items
        .into_iter()
        .skip(((page - 1) * limit) as usize)
        .take(limit as usize)
        .collect();

    let pagination = if collection.legacy_pagination {
        json!({"current": page, "pages": pages, "total": total, "limit": limit})
    } else {
        json!({
            "currentPage": page,
            "totalPages": pages,
            "totalItems": total,
            "itemsPerPage": limit,
            "hasNextPage": page < pages,
            "hasPrevPage": page > 1,
        })
    };
    (items, pagination)
}

fn matches_search(record: &Value, term: &str) -> bool {
    let term = term.to_lowercase();
    record.as_object().is_some_and(|fields| {
        fields.values().any(|v| {
            v.as_str().is_some_and(|s| s.to_lowercase().contains(&term))
        })
    })
}

fn field_equals(field: &Value, param: &str) -> bool {
    match field {
        Value::String(s) => s == param,
        Value::Bool(b) => b.to_string() == param,
        Value::Number(n) => n.to_string() == param,
        _ => false,
    }
}

/// Inclusive date range, compared on the date prefix of the field.
fn in_range(field: &Value, from: Option<&str>, to: Option<&str>) -> bool {
    let Some(value) = field.as_str() else {
        return from.is_none() && to.is_none();
    };
    let prefix = |bound: &str| value.get(..bound.len()).unwrap_or(value);
    from.is_none_or(|from| prefix(from) >= from)
        && to.is_none_or(|to| prefix(to) <= to)
}

fn compare_fields(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::String(a), Value::String(b)) => {
            match (a.parse::<Timestamp>(), b.parse::<Timestamp>()) {
                (Ok(a), Ok(b)) => a.cmp(&b),
                _ => a.cmp(b),
            }
        }
        (Value::Number(a), Value::Number(b)) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}
