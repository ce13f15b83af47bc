use std::time::Duration;

use kyro_core::{JobId, ResumeFile, TaskStatus};
use kyro_engine::{ApiSettings, FailureKind, ReqwestApi, StatusApi};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_for(server: &MockServer) -> ReqwestApi {
    ReqwestApi::new(&ApiSettings {
        base_url: server.uri(),
        ..ApiSettings::default()
    })
    .expect("api client")
}

fn resume() -> ResumeFile {
    ResumeFile::new("cv.pdf", b"%PDF-1.7 resume".to_vec()).with_content_type("application/pdf")
}

#[tokio::test]
async fn submit_uploads_multipart_and_returns_job_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/apply"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "job_id": "job-42",
            "message": "Started processing 2 applications",
            "urls": ["https://a.com", "https://b.com"],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server);
    let accepted = api
        .submit(&resume(), "https://a.com\nhttps://b.com")
        .await
        .expect("submit ok");

    assert_eq!(accepted.job_id, JobId::from("job-42"));
    assert_eq!(
        accepted.message.as_deref(),
        Some("Started processing 2 applications")
    );
    assert_eq!(accepted.urls, vec!["https://a.com", "https://b.com"]);

    let requests = server.received_requests().await.expect("recorded requests");
    assert_eq!(requests.len(), 1);
    let content_type = requests[0]
        .headers
        .get("content-type")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("multipart/form-data"));
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains(r#"name="resume"; filename="cv.pdf""#));
    assert!(body.contains("%PDF-1.7 resume"));
    assert!(body.contains(r#"name="urls""#));
    assert!(body.contains("https://a.com\nhttps://b.com"));
}

#[tokio::test]
async fn submit_failure_carries_backend_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/apply"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"detail": "No valid URLs provided"})),
        )
        .mount(&server)
        .await;

    let err = api_for(&server)
        .submit(&resume(), ",,,")
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(400));
    assert_eq!(err.message, "No valid URLs provided");
}

#[tokio::test]
async fn fetch_status_decodes_full_snapshot() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/job-42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "job_id": "job-42",
            "status": {"a.com": "running", "b.com": "failed"},
            "logs": {"a.com": ["start", "login"], "b.com": []},
            "session_ids": {"a.com": "sess-1"},
            "live_view_urls": {"a.com": "https://live/a"},
        })))
        .mount(&server)
        .await;

    let snapshot = api_for(&server)
        .fetch_status(&JobId::from("job-42"))
        .await
        .expect("status ok");

    assert_eq!(snapshot.status["a.com"], TaskStatus::Running);
    assert_eq!(snapshot.status["b.com"], TaskStatus::Failed);
    assert_eq!(snapshot.logs["a.com"], vec!["start", "login"]);
    assert_eq!(
        snapshot.session_ids.unwrap()["a.com"],
        "sess-1".to_string()
    );
    assert_eq!(
        snapshot.live_view_urls.unwrap()["a.com"],
        "https://live/a".to_string()
    );
}

#[tokio::test]
async fn fetch_status_for_unknown_job_is_http_404() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Job not found"})))
        .mount(&server)
        .await;

    let err = api_for(&server)
        .fetch_status(&JobId::from("missing"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(404));
    assert_eq!(err.message, "Job not found");
}

#[tokio::test]
async fn fetch_status_rejects_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/job-1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy error</html>"))
        .mount(&server)
        .await;

    let err = api_for(&server)
        .fetch_status(&JobId::from("job-1"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);
}

#[tokio::test]
async fn fetch_status_times_out_on_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/job-1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(json!({"status": {}, "logs": {}})),
        )
        .mount(&server)
        .await;

    let api = ReqwestApi::new(&ApiSettings {
        base_url: server.uri(),
        request_timeout: Duration::from_millis(50),
        ..ApiSettings::default()
    })
    .expect("api client");

    let err = api.fetch_status(&JobId::from("job-1")).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn health_reports_ok() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .mount(&server)
        .await;

    assert_eq!(api_for(&server).health().await, Ok(()));
}

#[tokio::test]
async fn health_fails_when_backend_is_down() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = api_for(&server).health().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(503));
}
