//! JSON bodies of the backend contract.

use std::collections::BTreeMap;

use kyro_core::{JobId, StatusSnapshot, TaskStatus, UrlMap};
use serde::Deserialize;

use crate::SubmitAccepted;

#[derive(Debug, Deserialize)]
pub(crate) struct ApplyResponse {
    job_id: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    urls: Vec<String>,
}

impl ApplyResponse {
    pub(crate) fn into_accepted(self) -> SubmitAccepted {
        SubmitAccepted {
            job_id: JobId::new(self.job_id),
            message: self.message,
            urls: self.urls,
        }
    }
}

/// `GET /status/{job_id}` body. Per-task values may be `null` while the
/// backend is still provisioning; those entries are dropped.
#[derive(Debug, Deserialize)]
pub(crate) struct StatusResponse {
    status: BTreeMap<String, String>,
    #[serde(default)]
    logs: BTreeMap<String, Option<Vec<String>>>,
    #[serde(default)]
    session_ids: Option<BTreeMap<String, Option<String>>>,
    #[serde(default)]
    live_view_urls: Option<BTreeMap<String, Option<String>>>,
}

impl StatusResponse {
    pub(crate) fn into_snapshot(self) -> StatusSnapshot {
        StatusSnapshot {
            status: self
                .status
                .into_iter()
                .map(|(url, raw)| (url, TaskStatus::from_wire(&raw)))
                .collect(),
            logs: drop_nulls(self.logs),
            session_ids: self.session_ids.map(drop_nulls),
            live_view_urls: self.live_view_urls.map(drop_nulls),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct HealthResponse {
    pub(crate) status: String,
}

/// FastAPI-style error body; `detail` may also be a list, which is ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    detail: serde_json::Value,
}

impl ErrorBody {
    pub(crate) fn detail(&self) -> Option<&str> {
        self.detail.as_str()
    }
}

fn drop_nulls<T>(map: BTreeMap<String, Option<T>>) -> UrlMap<T> {
    map.into_iter()
        .filter_map(|(url, value)| value.map(|value| (url, value)))
        .collect()
}
