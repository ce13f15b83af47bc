use std::fmt;

use kyro_core::{JobId, StatusSnapshot};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Outcome of one `/apply` upload.
    Submitted {
        result: Result<SubmitAccepted, ApiError>,
    },
    /// One poll fetch for `job_id` completed.
    SnapshotReceived {
        job_id: JobId,
        snapshot: StatusSnapshot,
    },
    /// One poll fetch for `job_id` failed; the schedule keeps running.
    PollFailed { job_id: JobId, error: ApiError },
    /// Outcome of the start-up `/health` probe.
    HealthChecked { result: Result<(), ApiError> },
}

/// Backend acknowledgement of a submitted batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitAccepted {
    pub job_id: JobId,
    pub message: Option<String>,
    pub urls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    Decode,
    InvalidRequest,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "malformed response"),
            FailureKind::InvalidRequest => write!(f, "invalid request"),
        }
    }
}
