use actix_web::{
    HttpRequest, HttpResponse, delete, dev::HttpServiceFactory, get, post, put,
    web,
};
use payloads::{
    AdminUser, IncubationApplication, Mentor, PreIncubationApplication,
    Resource, responses::ApplicationStats,
};
use serde::Deserialize;
use serde_json::{Value, json};

use super::{API_PREFIX, BackendError, Collection, FakeBackend};

pub fn api_services() -> impl HttpServiceFactory {
    // specific routes first, the generic collection routes would shadow them
    web::scope(API_PREFIX)
        .service(health)
        .service(login)
        .service(register)
        .service(me)
        .service(update_profile)
        .service(update_password)
        .service(list_admins)
        .service(add_admin)
        .service(set_admin_status)
        .service(change_admin_password)
        .service(upcoming_events)
        .service(public_mentors)
        .service(contact_stats)
        .service(stats_overview)
        .service(set_status)
        .service(list)
        .service(create)
        .service(get_one)
        .service(update)
        .service(delete_one)
}

type Backend = web::Data<FakeBackend>;
type Query = web::Query<Vec<(String, String)>>;

fn ok(message: &str, data: Value) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "success": true,
        "message": message,
        "data": data,
    }))
}

fn collection(path: &str) -> Result<Collection, BackendError> {
    Collection::find(path)
        .ok_or_else(|| BackendError::NotFound(format!("Route /{path} not found")))
}

#[get("/health")]
pub async fn health(
    req: HttpRequest,
    backend: Backend,
) -> Result<HttpResponse, BackendError> {
    backend.admit(&req).await?;
    Ok(HttpResponse::Ok()
        .json(json!({"success": true, "message": "API is running"})))
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    email: String,
    password: String,
}

#[tracing::instrument(skip(req, backend, body), fields(email = %body.email))]
#[post("/auth/login")]
pub async fn login(
    req: HttpRequest,
    body: web::Json<LoginBody>,
    backend: Backend,
) -> Result<HttpResponse, BackendError> {
    backend.admit(&req).await?;
    let (user, token) = backend.login(&body.email, &body.password)?;
    Ok(ok("Login successful", json!({"user": user, "token": token})))
}

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    name: String,
    email: String,
    password: String,
    role: Option<String>,
}

#[tracing::instrument(skip(req, backend, body), fields(email = %body.email))]
#[post("/auth/register")]
pub async fn register(
    req: HttpRequest,
    body: web::Json<RegisterBody>,
    backend: Backend,
) -> Result<HttpResponse, BackendError> {
    backend.admit(&req).await?;
    let role = body.role.as_deref().unwrap_or("applicant");
    backend.register(&body.name, &body.email, &body.password, role)?;
    let (user, token) = backend.login(&body.email, &body.password)?;
    Ok(ok(
        "User registered successfully",
        json!({"user": user, "token": token}),
    ))
}

#[get("/auth/me")]
pub async fn me(
    req: HttpRequest,
    backend: Backend,
) -> Result<HttpResponse, BackendError> {
    let user = backend.authorized(&req).await?;
    Ok(ok("", json!({"user": user})))
}

#[put("/auth/profile")]
pub async fn update_profile(
    req: HttpRequest,
    body: web::Json<Value>,
    backend: Backend,
) -> Result<HttpResponse, BackendError> {
    let user = backend.authorized(&req).await?;
    let email = user["email"].as_str().unwrap_or_default();
    let user = backend.update_profile(email, &body)?;
    Ok(ok("Profile updated successfully", json!({"user": user})))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordBody {
    current_password: String,
    new_password: String,
}

async fn password_change(
    req: &HttpRequest,
    body: &PasswordBody,
    backend: &Backend,
) -> Result<HttpResponse, BackendError> {
    let user = backend.authorized(req).await?;
    let email = user["email"].as_str().unwrap_or_default();
    backend.change_password(email, &body.current_password, &body.new_password)?;
    Ok(ok("Password changed successfully", Value::Null))
}

#[put("/auth/password")]
pub async fn update_password(
    req: HttpRequest,
    body: web::Json<PasswordBody>,
    backend: Backend,
) -> Result<HttpResponse, BackendError> {
    password_change(&req, &body, &backend).await
}

#[put("/admin/change-password")]
pub async fn change_admin_password(
    req: HttpRequest,
    body: web::Json<PasswordBody>,
    backend: Backend,
) -> Result<HttpResponse, BackendError> {
    password_change(&req, &body, &backend).await
}

#[get("/admin/admins")]
pub async fn list_admins(
    req: HttpRequest,
    query: Query,
    backend: Backend,
) -> Result<HttpResponse, BackendError> {
    backend.authorized(&req).await?;
    let admins = collection(AdminUser::PATH)?;
    Ok(ok("", backend.list(&admins, &query)))
}

#[tracing::instrument(skip_all)]
#[post("/admin/add-admin")]
pub async fn add_admin(
    req: HttpRequest,
    body: web::Json<Value>,
    backend: Backend,
) -> Result<HttpResponse, BackendError> {
    let actor = backend.authorized(&req).await?;
    let admin = backend.add_admin(body.into_inner(), &actor)?;
    Ok(ok("Admin added successfully", json!({"admin": admin})))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusBody {
    is_active: bool,
}

#[put("/admin/admin/{id}/status")]
pub async fn set_admin_status(
    req: HttpRequest,
    id: web::Path<String>,
    body: web::Json<StatusBody>,
    backend: Backend,
) -> Result<HttpResponse, BackendError> {
    let actor = backend.authorized(&req).await?;
    let admins = collection(AdminUser::PATH)?;
    let admin = backend.set_active(&admins, &id, body.is_active, &actor)?;
    Ok(ok("Admin status updated", json!({"admin": admin})))
}

#[derive(Debug, Deserialize)]
pub struct PublicListQuery {
    limit: Option<usize>,
    search: Option<String>,
}

#[get("/event/public/upcoming")]
pub async fn upcoming_events(
    req: HttpRequest,
    query: web::Query<PublicListQuery>,
    backend: Backend,
) -> Result<HttpResponse, BackendError> {
    backend.admit(&req).await?;
    let mut events: Vec<Value> = backend
        .records("event")
        .into_iter()
        .filter(|e| e["status"] == "upcoming" && e["isActive"] != false)
        .collect();
    events.sort_by(|a, b| super::compare_fields(&a["date"], &b["date"]));
    events.truncate(query.limit.unwrap_or(10));
    Ok(ok("", json!({"events": events})))
}

#[get("/mentor/public/list")]
pub async fn public_mentors(
    req: HttpRequest,
    query: web::Query<PublicListQuery>,
    backend: Backend,
) -> Result<HttpResponse, BackendError> {
    backend.admit(&req).await?;
    let mentors: Vec<Value> = backend
        .records(Mentor::PATH)
        .into_iter()
        .filter(|m| m["isActive"] == true)
        .filter(|m| {
            query
                .search
                .as_deref()
                .is_none_or(|term| super::matches_search(m, term))
        })
        .take(query.limit.unwrap_or(10))
        .collect();
    Ok(ok("", json!({"mentors": mentors})))
}

#[get("/contact/stats")]
pub async fn contact_stats(
    req: HttpRequest,
    backend: Backend,
) -> Result<HttpResponse, BackendError> {
    backend.authorized(&req).await?;
    let contacts = backend.records("contact");
    let count = |status: &str| {
        contacts.iter().filter(|c| c["status"] == status).count()
    };
    Ok(ok(
        "",
        json!({
            "total": contacts.len(),
            "new": count("new"),
            "inProgress": count("in-progress"),
            "responded": count("responded"),
            "closed": count("closed"),
        }),
    ))
}

#[get("/{resource}/stats/overview")]
pub async fn stats_overview(
    req: HttpRequest,
    resource: web::Path<String>,
    backend: Backend,
) -> Result<HttpResponse, BackendError> {
    backend.authorized(&req).await?;
    let records = backend.records(&resource);
    let count = |key: &str, value: &Value| {
        records.iter().filter(|r| &r[key] == value).count()
    };
    let data = match resource.as_str() {
        "announcement" => json!({
            "total": records.len(),
            "published": count("status", &json!("published")),
            "draft": count("status", &json!("draft")),
            "archived": count("status", &json!("archived")),
            "active": count("isActive", &json!(true)),
        }),
        "event" => {
            let mut kinds: Vec<(String, usize)> = Vec::new();
            for kind in records.iter().filter_map(|r| r["type"].as_str()) {
                match kinds.iter_mut().find(|(k, _)| k == kind) {
                    Some((_, n)) => *n += 1,
                    None => kinds.push((kind.to_string(), 1)),
                }
            }
            let distribution: Vec<Value> = kinds
                .into_iter()
                .map(|(kind, count)| json!({"_id": kind, "count": count}))
                .collect();
            json!({"stats": {
                "total": records.len(),
                "upcoming": count("status", &json!("upcoming")),
                "typeDistribution": distribution,
            }})
        }
        "incubation" => json!({"stats": application_stats::<IncubationApplication>(records)?}),
        "pre-incubation" => {
            json!({"stats": application_stats::<PreIncubationApplication>(records)?})
        }
        other => {
            return Err(BackendError::NotFound(format!(
                "Route /{other}/stats/overview not found"
            )));
        }
    };
    Ok(ok("", data))
}

fn application_stats<A>(records: Vec<Value>) -> Result<ApplicationStats, BackendError>
where
    A: Resource + AsRef<payloads::resources::application::ApplicationProgress>,
{
    let applications = records
        .into_iter()
        .map(payloads::resources::decode_item::<A>)
        .collect::<Result<Vec<A>, _>>()
        .map_err(|e| BackendError::BadRequest(format!("Stored application is invalid: {e}")))?;
    Ok(ApplicationStats::summarize(&applications))
}

#[put("/{resource}/{id}/status")]
pub async fn set_status(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    body: web::Json<StatusBody>,
    backend: Backend,
) -> Result<HttpResponse, BackendError> {
    let actor = backend.authorized(&req).await?;
    let (resource, id) = path.into_inner();
    if resource != Mentor::PATH {
        return Err(BackendError::NotFound(format!(
            "Route /{resource}/{id}/status not found"
        )));
    }
    let mentors = collection(&resource)?;
    let mentor = backend.set_active(&mentors, &id, body.is_active, &actor)?;
    Ok(ok("Mentor status updated", json!({"mentor": mentor})))
}

#[tracing::instrument(skip(req, backend, query))]
#[get("/{resource}")]
pub async fn list(
    req: HttpRequest,
    resource: web::Path<String>,
    query: Query,
    backend: Backend,
) -> Result<HttpResponse, BackendError> {
    backend.authorized(&req).await?;
    let collection = collection(&resource)?;
    Ok(ok("", backend.list(&collection, &query)))
}

#[tracing::instrument(skip(req, backend, body))]
#[post("/{resource}")]
pub async fn create(
    req: HttpRequest,
    resource: web::Path<String>,
    body: web::Json<Value>,
    backend: Backend,
) -> Result<HttpResponse, BackendError> {
    let actor = backend.authorized(&req).await?;
    let collection = collection(&resource)?;
    let record = backend.create(&collection, body.into_inner(), &actor)?;
    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": format!("{} created successfully", super::capitalized(collection.label)),
        "data": {collection.item_key: record},
    })))
}

#[get("/{resource}/{id}")]
pub async fn get_one(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    backend: Backend,
) -> Result<HttpResponse, BackendError> {
    backend.authorized(&req).await?;
    let (resource, id) = path.into_inner();
    let collection = collection(&resource)?;
    let record = backend.get(&collection, &id)?;
    Ok(ok("", json!({collection.item_key: record})))
}

#[tracing::instrument(skip(req, backend, body))]
#[put("/{resource}/{id}")]
pub async fn update(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    body: web::Json<Value>,
    backend: Backend,
) -> Result<HttpResponse, BackendError> {
    let actor = backend.authorized(&req).await?;
    let (resource, id) = path.into_inner();
    let collection = collection(&resource)?;
    let record = backend.update(&collection, &id, body.into_inner(), &actor)?;
    Ok(ok(
        &format!("{} updated successfully", super::capitalized(collection.label)),
        json!({collection.item_key: record}),
    ))
}

#[tracing::instrument(skip(req, backend))]
#[delete("/{resource}/{id}")]
pub async fn delete_one(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    backend: Backend,
) -> Result<HttpResponse, BackendError> {
    backend.authorized(&req).await?;
    let (resource, id) = path.into_inner();
    let collection = collection(&resource)?;
    backend.delete(&collection, &id)?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": format!("{} deleted successfully", super::capitalized(collection.label)),
    })))
}
