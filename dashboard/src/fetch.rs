//! Single-value fetching for stats cards and detail views.

use std::{
    future::Future,
    pin::Pin,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};
use tokio::sync::watch;

/// Distinguishes "not fetched yet" from "fetched, possibly empty".
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    NotFetched,
    Fetched(T),
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self::NotFetched
    }
}

impl<T> FetchState<T> {
    pub fn is_fetched(&self) -> bool {
        matches!(self, Self::Fetched(_))
    }

    pub fn as_ref(&self) -> Option<&T> {
        match self {
            Self::NotFetched => None,
            Self::Fetched(data) => Some(data),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchSnapshot<T> {
    pub data: FetchState<T>,
    pub is_loading: bool,
    /// Error from the latest fetch. Data from an earlier fetch is kept.
    pub error: Option<String>,
}

impl<T> Default for FetchSnapshot<T> {
    fn default() -> Self {
        Self {
            data: FetchState::NotFetched,
            is_loading: false,
            error: None,
        }
    }
}

impl<T> FetchSnapshot<T> {
    /// True if this is the initial load (data not yet fetched, currently
    /// loading, and no error).
    pub fn is_initial_loading(&self) -> bool {
        self.is_loading && !self.data.is_fetched() && self.error.is_none()
    }
}

type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;
type FetchFn<T> = Arc<dyn Fn() -> BoxFuture<Result<T, String>> + Send + Sync>;

/// A value loaded by a fetch function, refetchable on demand.
///
/// Clones share state. Only the response of the most recently started
/// fetch is applied.
pub struct FetchCell<T> {
    state: Arc<watch::Sender<FetchSnapshot<T>>>,
    generation: Arc<AtomicU64>,
    fetch_fn: FetchFn<T>,
}

impl<T> Clone for FetchCell<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            generation: self.generation.clone(),
            fetch_fn: self.fetch_fn.clone(),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for FetchCell<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchCell")
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl<T: Clone + Send + Sync + 'static> FetchCell<T> {
    pub fn new<F, Fut>(fetch_fn: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, String>> + Send + 'static,
    {
        Self {
            state: Arc::new(watch::Sender::new(FetchSnapshot::default())),
            generation: Arc::new(AtomicU64::new(0)),
            fetch_fn: Arc::new(move || -> BoxFuture<Result<T, String>> {
                Box::pin(fetch_fn())
            }),
        }
    }

    pub async fn refetch(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|s| {
            s.is_loading = true;
            s.error = None;
        });

        let result = (self.fetch_fn)().await;

        let applied = self.state.send_if_modified(|s| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            match result {
                Ok(data) => s.data = FetchState::Fetched(data),
                Err(e) => s.error = Some(e),
            }
            s.is_loading = false;
            true
        });
        if !applied {
            tracing::debug!(generation, "discarding stale fetch result");
        }
    }

    pub fn state(&self) -> FetchSnapshot<T> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchSnapshot<T>> {
        self.state.subscribe()
    }
}
