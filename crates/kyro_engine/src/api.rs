use std::time::Duration;

use engine_logging::{engine_debug, engine_info};
use kyro_core::{JobId, ResumeFile, StatusSnapshot};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use url::Url;

use crate::wire::{ApplyResponse, ErrorBody, HealthResponse, StatusResponse};
use crate::{ApiError, FailureKind, SubmitAccepted};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            poll_interval: Duration::from_secs(2),
        }
    }
}

/// The fixed backend contract: submission, status snapshots and liveness.
#[async_trait::async_trait]
pub trait StatusApi: Send + Sync {
    async fn submit(&self, resume: &ResumeFile, urls: &str) -> Result<SubmitAccepted, ApiError>;

    async fn fetch_status(&self, job_id: &JobId) -> Result<StatusSnapshot, ApiError>;

    async fn health(&self) -> Result<(), ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestApi {
    client: reqwest::Client,
    base: Url,
}

impl ReqwestApi {
    pub fn new(settings: &ApiSettings) -> Result<Self, ApiError> {
        let base = Url::parse(&settings.base_url)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::new(
                FailureKind::InvalidUrl,
                format!("{} cannot be used as an API base", settings.base_url),
            ));
        }
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Appends path segments to the base URL; segments are percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::new(FailureKind::InvalidUrl, "base url has no path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait::async_trait]
impl StatusApi for ReqwestApi {
    async fn submit(&self, resume: &ResumeFile, urls: &str) -> Result<SubmitAccepted, ApiError> {
        let endpoint = self.endpoint(&["apply"])?;
        let mut part = Part::bytes(resume.bytes.clone()).file_name(resume.file_name.clone());
        if let Some(content_type) = resume.content_type.as_deref() {
            part = part
                .mime_str(content_type)
                .map_err(|err| ApiError::new(FailureKind::InvalidRequest, err.to_string()))?;
        }
        let form = Form::new()
            .part("resume", part)
            .text("urls", urls.to_owned());

        engine_info!(
            "Submitting resume {} ({} bytes) to {}",
            resume.file_name,
            resume.bytes.len(),
            endpoint
        );
        let response = self
            .client
            .post(endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let body: ApplyResponse = read_json(response).await?;
        Ok(body.into_accepted())
    }

    async fn fetch_status(&self, job_id: &JobId) -> Result<StatusSnapshot, ApiError> {
        let endpoint = self.endpoint(&["status", job_id.as_str()])?;
        let response = self
            .client
            .get(endpoint)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let body: StatusResponse = read_json(response).await?;
        let snapshot = body.into_snapshot();
        engine_debug!(
            "Status for job {}: {} tasks",
            job_id,
            snapshot.status.len()
        );
        Ok(snapshot)
    }

    async fn health(&self) -> Result<(), ApiError> {
        let endpoint = self.endpoint(&["health"])?;
        let response = self
            .client
            .get(endpoint)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let body: HealthResponse = read_json(response).await?;
        if body.status == "ok" {
            Ok(())
        } else {
            Err(ApiError::new(
                FailureKind::Decode,
                format!("unexpected health status {}", body.status),
            ))
        }
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.bytes().await.map_err(map_reqwest_error)?;
    if !status.is_success() {
        let message = serde_json::from_slice::<ErrorBody>(&body)
            .ok()
            .and_then(|err| err.detail().map(ToOwned::to_owned))
            .unwrap_or_else(|| status.to_string());
        return Err(ApiError::new(
            FailureKind::HttpStatus(status.as_u16()),
            message,
        ));
    }
    serde_json::from_slice(&body).map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(base: &str) -> ReqwestApi {
        ReqwestApi::new(&ApiSettings {
            base_url: base.to_string(),
            ..ApiSettings::default()
        })
        .unwrap()
    }

    #[test]
    fn endpoints_respect_base_path() {
        let root = api("http://localhost:8000");
        assert_eq!(
            root.endpoint(&["status", "job-1"]).unwrap().as_str(),
            "http://localhost:8000/status/job-1"
        );

        let nested = api("http://example.com/kyro/");
        assert_eq!(
            nested.endpoint(&["apply"]).unwrap().as_str(),
            "http://example.com/kyro/apply"
        );
    }

    #[test]
    fn job_ids_are_escaped_as_one_segment() {
        let root = api("http://localhost:8000");
        assert_eq!(
            root.endpoint(&["status", "a/b c"]).unwrap().as_str(),
            "http://localhost:8000/status/a%2Fb%20c"
        );
    }

    #[test]
    fn rejects_unusable_base() {
        let err = ReqwestApi::new(&ApiSettings {
            base_url: "mailto:ops@example.com".to_string(),
            ..ApiSettings::default()
        })
        .unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidUrl);
    }
}
