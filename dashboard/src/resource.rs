//! The generic list store every dashboard page is built on.
//!
//! A [`ResourceStore`] binds one backend collection to local state: the
//! current page of items, its pagination, a load phase, the last list error
//! and any field-scoped validation messages. Writes go through the store so
//! the list can be refreshed afterwards with the query it was last loaded
//! with.
//!
//! List loads report failures only through [`ListState::error`]. Mutations
//! report through their `bool` return, [`ListState::error`], and exactly one
//! [`Notice`](crate::notify::Notice) each.

use payloads::{
    APIClient, ClientError, Editable, EntityId, FieldErrors, HasStats,
    ListQuery, Pagination, Resource, Toggle, Validate,
};
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};
use tokio::sync::watch;

use crate::{fetch::FetchCell, notify::Notifier};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListState<R: Resource> {
    pub items: Vec<R>,
    pub pagination: Pagination,
    pub phase: Phase,
    /// Last list or mutation failure, for inline display.
    pub error: Option<String>,
    pub field_errors: FieldErrors,
    /// Whether any list load has succeeded yet.
    pub fetched: bool,
    /// The query of the most recently issued list load.
    pub query: ListQuery<R::Filters>,
}

impl<R: Resource> ListState<R> {
    fn new(page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            pagination: Pagination::default(),
            phase: Phase::Idle,
            error: None,
            field_errors: FieldErrors::default(),
            fetched: false,
            query: ListQuery::first_page(page_size),
        }
    }

    pub fn loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn find(&self, id: &EntityId) -> Option<&R> {
        self.items.iter().find(|item| item.id() == id)
    }
}

/// Handle to the state of one collection. Clones share state.
#[derive(Debug)]
pub struct ResourceStore<R: Resource> {
    client: APIClient,
    notifier: Notifier,
    state: Arc<watch::Sender<ListState<R>>>,
    generation: Arc<AtomicU64>,
}

impl<R: Resource> Clone for ResourceStore<R> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            notifier: self.notifier.clone(),
            state: self.state.clone(),
            generation: self.generation.clone(),
        }
    }
}

impl<R: Resource> ResourceStore<R> {
    pub fn new(client: APIClient, notifier: Notifier, page_size: u32) -> Self {
        Self {
            client,
            notifier,
            state: Arc::new(watch::Sender::new(ListState::new(page_size))),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn state(&self) -> ListState<R> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ListState<R>> {
        self.state.subscribe()
    }

    /// The query the list was last loaded with.
    pub fn query(&self) -> ListQuery<R::Filters> {
        self.state.borrow().query.clone()
    }

    /// Load one page of the collection.
    ///
    /// Only the response of the most recently issued load is applied; a
    /// response overtaken by a newer load is dropped.
    pub async fn fetch_list(&self, query: ListQuery<R::Filters>) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|s| {
            s.query = query.clone();
            s.phase = Phase::Loading;
            s.error = None;
        });

        let result = self.client.list::<R>(&query).await;
        if let Err(e) = &result {
            tracing::warn!(resource = R::PATH, "list load failed: {e}");
        }

        let applied = self.state.send_if_modified(|s| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            match result {
                Ok(page) => {
                    s.items = page.items;
                    s.pagination = page.pagination;
                    s.phase = Phase::Ready;
                    s.fetched = true;
                }
                Err(e) => {
                    s.error = Some(list_error::<R>(&e));
                    s.phase = Phase::Failed;
                }
            }
            true
        });
        if !applied {
            tracing::debug!(
                resource = R::PATH,
                generation,
                "discarding stale list response"
            );
        }
    }

    /// Reload with the last-used query.
    pub async fn refetch(&self) {
        self.fetch_list(self.query()).await;
    }

    pub async fn go_to_page(&self, page: u32) {
        self.fetch_list(self.query().page(page)).await;
    }

    /// Search from the first page, keeping filters and page size.
    pub async fn search(&self, term: impl Into<String>) {
        self.fetch_list(self.query().search(term).page(1)).await;
    }

    pub async fn filter(&self, filters: R::Filters) {
        self.fetch_list(self.query().filters(filters).page(1)).await;
    }

    /// Fetch a single record. The list is left alone.
    #[tracing::instrument(skip_all, fields(resource = R::PATH, %id))]
    pub async fn get(&self, id: &EntityId) -> Option<R> {
        match self.client.get::<R>(id).await {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!("{e}");
                let message =
                    describe(&e, || format!("Failed to fetch {}", R::LABEL));
                self.state.send_modify(|s| s.error = Some(message));
                None
            }
        }
    }

    #[tracing::instrument(skip_all, fields(resource = R::PATH))]
    pub async fn create(&self, draft: &R::Draft) -> bool {
        if !self.validate(draft) {
            return false;
        }
        self.clear_error();
        match self.client.create::<R>(draft).await {
            Ok(_) => {
                self.refetch().await;
                self.notifier.success(format!(
                    "{} created successfully",
                    capitalized(R::LABEL)
                ));
                true
            }
            Err(e) => {
                self.mutation_failed("create", &e);
                false
            }
        }
    }

    /// Drop the validation message of one field, e.g. when it is edited.
    pub fn clear_field_error(&self, field: &str) {
        self.state.send_if_modified(|s| {
            let had = s.field_errors.get(field).is_some();
            s.field_errors.clear_field(field);
            had
        });
    }

    pub fn clear_error(&self) {
        self.state.send_if_modified(|s| s.error.take().is_some());
    }

    fn validate(&self, body: &impl Validate) -> bool {
        match body.validate() {
            Ok(()) => {
                self.state.send_if_modified(|s| {
                    let had = !s.field_errors.is_empty();
                    s.field_errors = FieldErrors::default();
                    had
                });
                true
            }
            Err(errors) => {
                tracing::debug!(resource = R::PATH, "rejected: {errors}");
                self.state.send_modify(|s| s.field_errors = errors);
                false
            }
        }
    }

    fn mutation_failed(&self, action: &str, e: &ClientError) {
        tracing::warn!(resource = R::PATH, action, "{e}");
        let message = describe(e, || failure_message(action, R::LABEL));
        self.state.send_modify(|s| s.error = Some(message.clone()));
        self.notifier.error(message);
    }
}

impl<R: Editable> ResourceStore<R> {
    #[tracing::instrument(skip_all, fields(resource = R::PATH, %id))]
    pub async fn update(&self, id: &EntityId, patch: &R::Patch) -> bool {
        if !self.validate(patch) {
            return false;
        }
        self.clear_error();
        match self.client.update::<R>(id, patch).await {
            Ok(_) => {
                self.refetch().await;
                self.notifier.success(format!(
                    "{} updated successfully",
                    capitalized(R::LABEL)
                ));
                true
            }
            Err(e) => {
                self.mutation_failed("update", &e);
                false
            }
        }
    }

    #[tracing::instrument(skip_all, fields(resource = R::PATH, %id))]
    pub async fn delete(&self, id: &EntityId) -> bool {
        self.clear_error();
        match self.client.delete::<R>(id).await {
            Ok(()) => {
                self.refetch().await;
                self.notifier.success(format!(
                    "{} deleted successfully",
                    capitalized(R::LABEL)
                ));
                true
            }
            Err(e) => {
                self.mutation_failed("delete", &e);
                false
            }
        }
    }
}

impl<R: Toggle> ResourceStore<R> {
    /// Flip `isActive` through the status endpoint and patch the matching
    /// local item, without reloading the list.
    #[tracing::instrument(skip_all, fields(resource = R::PATH, %id, is_active = is_active))]
    pub async fn update_status(&self, id: &EntityId, is_active: bool) -> bool {
        self.clear_error();
        match self.client.set_status::<R>(id, is_active).await {
            Ok(echoed) => {
                let active = echoed.unwrap_or(is_active);
                self.state.send_if_modified(|s| {
                    match s.items.iter_mut().find(|item| item.id() == id) {
                        Some(item) => {
                            item.set_active(active);
                            true
                        }
                        None => false,
                    }
                });
                let verb = if active { "activated" } else { "deactivated" };
                self.notifier.success(format!(
                    "{} {verb} successfully",
                    capitalized(R::LABEL)
                ));
                true
            }
            Err(e) => {
                self.mutation_failed("update status", &e);
                false
            }
        }
    }
}

impl<R: HasStats> ResourceStore<R> {
    /// A cell for the collection's overview counters. Not fetched until
    /// [`FetchCell::refetch`] is called.
    pub fn stats(&self) -> FetchCell<R::Stats> {
        let client = self.client.clone();
        FetchCell::new(move || {
            let client = client.clone();
            async move {
                client.stats::<R>().await.map_err(|e| {
                    describe(&e, || format!("Failed to fetch {} stats", R::LABEL))
                })
            }
        })
    }
}

impl<R: Resource> ResourceStore<R> {
    /// A cell for one record, for detail views.
    pub fn detail(&self, id: EntityId) -> FetchCell<R> {
        let client = self.client.clone();
        FetchCell::new(move || {
            let client = client.clone();
            let id = id.clone();
            async move {
                client.get::<R>(&id).await.map_err(|e| {
                    describe(&e, || format!("Failed to fetch {}", R::LABEL))
                })
            }
        })
    }
}

/// The message a failed list load leaves in the store.
fn list_error<R: Resource>(e: &ClientError) -> String {
    describe(e, || format!("Failed to fetch {}s", R::LABEL))
}

/// `("update status", "mentor")` reads "Failed to update mentor status".
fn failure_message(action: &str, label: &str) -> String {
    match action.split_once(' ') {
        Some((verb, rest)) => format!("Failed to {verb} {label} {rest}"),
        None => format!("Failed to {action} {label}"),
    }
}

/// Server and network failures speak for themselves; anything else gets the
/// caller's generic message.
fn describe(e: &ClientError, fallback: impl FnOnce() -> String) -> String {
    match e {
        ClientError::Api { .. } | ClientError::Network(_) => e.to_string(),
        ClientError::Decode(_) | ClientError::MissingField(_) => fallback(),
    }
}

fn capitalized(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
