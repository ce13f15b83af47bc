//! Merging of status snapshots into the task board.
//!
//! `reconcile` is a pure function of the previous board and the newest
//! snapshot. It never looks at interaction state and never reads a clock,
//! which keeps it testable without the polling machinery.

use std::collections::BTreeMap;
use std::sync::Arc;

/// Per-task map keyed by the task URL. URLs are opaque and never normalized.
pub type UrlMap<T> = BTreeMap<String, T>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum TaskStatus {
    #[default]
    Pending,
    Running,
    Completed,
    Failed,
}

impl TaskStatus {
    /// Maps the backend's status string. Anything unrecognized reads as pending.
    pub fn from_wire(raw: &str) -> Self {
        match raw {
            "running" => TaskStatus::Running,
            "completed" => TaskStatus::Completed,
            "failed" => TaskStatus::Failed,
            _ => TaskStatus::Pending,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Running => "running",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }
}

/// One full status payload, already decoded from the wire.
///
/// `None` for the optional maps means the backend omitted the field, which is
/// different from sending an empty map.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusSnapshot {
    pub status: UrlMap<TaskStatus>,
    pub logs: UrlMap<Vec<String>>,
    pub session_ids: Option<UrlMap<String>>,
    pub live_view_urls: Option<UrlMap<String>>,
}

/// Reconciled, render-ready aggregation of the latest snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskBoard {
    status: UrlMap<TaskStatus>,
    logs: UrlMap<Vec<String>>,
    session_ids: UrlMap<String>,
    live_view_urls: Arc<UrlMap<String>>,
}

/// Borrowed view of a single task on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskRecord<'a> {
    pub url: &'a str,
    pub status: TaskStatus,
    pub logs: &'a [String],
    pub session_id: Option<&'a str>,
    pub live_view_url: Option<&'a str>,
}

impl TaskBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.status.len()
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_empty()
    }

    /// Task universe of the current cycle, in URL order.
    pub fn urls(&self) -> impl Iterator<Item = &str> + '_ {
        self.status.keys().map(String::as_str)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.status.contains_key(url)
    }

    pub fn task(&self, url: &str) -> Option<TaskRecord<'_>> {
        let (url, status) = self.status.get_key_value(url)?;
        Some(self.record(url, *status))
    }

    pub fn tasks(&self) -> impl Iterator<Item = TaskRecord<'_>> + '_ {
        self.status
            .iter()
            .map(|(url, status)| self.record(url, *status))
    }

    /// Shared live-view map; the allocation only changes when its content does.
    pub fn live_view_urls(&self) -> &Arc<UrlMap<String>> {
        &self.live_view_urls
    }

    pub fn session_ids(&self) -> &UrlMap<String> {
        &self.session_ids
    }

    /// Live-view address of a task that is part of the current universe.
    pub fn live_view_url(&self, url: &str) -> Option<&str> {
        if !self.contains(url) {
            return None;
        }
        self.live_view_urls
            .get(url)
            .map(String::as_str)
            .filter(|address| !address.is_empty())
    }

    pub fn has_live_view(&self, url: &str) -> bool {
        self.live_view_url(url).is_some()
    }

    fn record<'a>(&'a self, url: &'a str, status: TaskStatus) -> TaskRecord<'a> {
        TaskRecord {
            url,
            status,
            logs: self.logs.get(url).map(Vec::as_slice).unwrap_or(&[]),
            session_id: self.session_ids.get(url).map(String::as_str),
            live_view_url: self.live_view_url(url),
        }
    }
}

/// Merges `snapshot` into `previous`.
///
/// Status and logs are authoritative and replaced outright. An omitted
/// `session_ids` or `live_view_urls` field keeps what was known before. The
/// live-view map is additionally gated by structural equality so unchanged
/// content keeps its allocation.
pub fn reconcile(previous: &TaskBoard, snapshot: StatusSnapshot) -> TaskBoard {
    let StatusSnapshot {
        status,
        logs,
        session_ids,
        live_view_urls,
    } = snapshot;

    let session_ids = session_ids.unwrap_or_else(|| previous.session_ids.clone());
    let live_view_urls = match live_view_urls {
        Some(next) => replace_if_changed(&previous.live_view_urls, next),
        None => Arc::clone(&previous.live_view_urls),
    };

    TaskBoard {
        status,
        logs,
        session_ids,
        live_view_urls,
    }
}

/// Copy-on-write replace: keeps `current` when `next` is structurally equal.
pub fn replace_if_changed<T: PartialEq>(current: &Arc<T>, next: T) -> Arc<T> {
    if **current == next {
        Arc::clone(current)
    } else {
        Arc::new(next)
    }
}
