//! The notice channel mutations report through.
//!
//! Every create, update, delete and status toggle emits exactly one
//! [`Notice`]. Whatever renders them (a toast stack, a terminal line)
//! subscribes to the [`Notifier`] and keeps a [`NoticeBoard`].

use std::{collections::HashMap, time::Duration};
use tokio::sync::broadcast;
use uuid::Uuid;

const CHANNEL_CAPACITY: usize = 64;
const DEFAULT_DURATION: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Error,
    Success,
    Info,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub id: Uuid,
    pub message: String,
    pub kind: NoticeKind,
    /// `None` for no auto-dismiss.
    pub duration: Option<Duration>,
}

impl Notice {
    pub fn new(message: impl Into<String>, kind: NoticeKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            message: message.into(),
            kind,
            duration: Some(DEFAULT_DURATION),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, NoticeKind::Error)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, NoticeKind::Success)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, NoticeKind::Info)
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn no_auto_dismiss(mut self) -> Self {
        self.duration = None;
        self
    }
}

/// Cheaply cloneable sender side of the notice channel.
#[derive(Debug, Clone)]
pub struct Notifier {
    sender: broadcast::Sender<Notice>,
}

impl Default for Notifier {
    fn default() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }
}

impl Notifier {
    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.sender.subscribe()
    }

    pub fn notify(&self, notice: Notice) {
        match notice.kind {
            NoticeKind::Error => tracing::warn!("{}", notice.message),
            _ => tracing::info!("{}", notice.message),
        }
        // nobody listening is fine
        let _ = self.sender.send(notice);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.notify(Notice::error(message));
    }

    pub fn success(&self, message: impl Into<String>) {
        self.notify(Notice::success(message));
    }
}

/// The notices currently on screen.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NoticeBoard {
    pub notices: HashMap<Uuid, Notice>,
}

impl NoticeBoard {
    pub fn add(&mut self, notice: Notice) {
        self.notices.insert(notice.id, notice);
    }

    pub fn remove(&mut self, id: Uuid) -> Option<Notice> {
        self.notices.remove(&id)
    }

    pub fn clear(&mut self) {
        self.notices.clear();
    }
}
