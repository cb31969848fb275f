use std::time::Duration;

use reqwest::Client;
use reqwest::multipart;
use serde_json::Value;

use super::error::ApiError;
use super::types::{EnqueueResponse, StatusReport, Submission};
use crate::poller::JobHandle;

// Endpoint paths for this deployment. The shape (enqueue / status / result
// plus the synchronous side doors) is shared across deployments; the exact
// prefixes are fixed per build.
const HEALTH_PATH: &str = "/health";
const ENQUEUE_PATH: &str = "/api/protect/queue/add";
const STATUS_PATH: &str = "/api/protect/queue/status";
const RESULT_PATH: &str = "/api/protect/queue/result";
const PROTECT_SYNC_PATH: &str = "/api/protect/fawkes";
const ANALYZE_PATH: &str = "/api/voice/analyze";
const VERIFY_PATH: &str = "/api/voice/verify";

/// HTTP client for one protection API deployment.
///
/// Cheap to clone; every clone shares the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the deployment at `base_url`.
    pub fn new(base_url: String) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Probe the liveness endpoint. The body is ignored; only the status
    /// code matters.
    pub async fn health(&self) -> Result<(), ApiError> {
        let response = self
            .client
            .get(format!("{}{HEALTH_PATH}", self.base_url))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ApiError::Api {
                status: status.as_u16(),
                message: "health probe failed".to_string(),
            })
        }
    }

    /// Submit a payload to the asynchronous queue.
    ///
    /// An empty payload is a precondition violation and is reported without
    /// touching the network. Any rejection or network failure means polling
    /// must not be started.
    pub async fn enqueue(&self, submission: &Submission) -> Result<JobHandle, ApiError> {
        if submission.payload.is_empty() {
            return Err(ApiError::EmptyPayload);
        }

        let response = self
            .client
            .post(format!("{}{ENQUEUE_PATH}", self.base_url))
            .multipart(Self::form_for(submission))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ApiError::Submission {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.json::<EnqueueResponse>().await?;
        Ok(JobHandle::new(body.id))
    }

    /// Read the current status of a queued job. One call per poll tick.
    pub async fn job_status(&self, job_id: &str) -> Result<StatusReport, ApiError> {
        let response = self
            .client
            .get(format!("{}{STATUS_PATH}/{job_id}", self.base_url))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let report = response.json::<StatusReport>().await?;
        Ok(report)
    }

    /// Fetch the full result document of a completed job.
    pub async fn fetch_result(&self, job_id: &str) -> Result<Value, ApiError> {
        self.get_json(&format!("{RESULT_PATH}/{job_id}")).await
    }

    /// Direct-download URL for a completed job's artifact.
    pub fn result_url(&self, job_id: &str) -> String {
        format!("{}{RESULT_PATH}/{job_id}", self.base_url)
    }

    /// Synchronous protection path: processes the payload inline, no queue,
    /// no polling.
    pub async fn protect_sync(&self, submission: &Submission) -> Result<Value, ApiError> {
        self.post_submission(PROTECT_SYNC_PATH, submission).await
    }

    /// Synchronous audio analysis.
    pub async fn analyze(&self, submission: &Submission) -> Result<Value, ApiError> {
        self.post_submission(ANALYZE_PATH, submission).await
    }

    /// Synchronous watermark verification lookup.
    pub async fn verify(&self, watermark_id: &str) -> Result<Value, ApiError> {
        self.get_json(&format!("{VERIFY_PATH}/{watermark_id}")).await
    }

    async fn post_submission(&self, path: &str, submission: &Submission) -> Result<Value, ApiError> {
        if submission.payload.is_empty() {
            return Err(ApiError::EmptyPayload);
        }

        let response = self
            .client
            .post(format!("{}{path}", self.base_url))
            .multipart(Self::form_for(submission))
            .send()
            .await?;
        Self::json_body(response).await
    }

    async fn get_json(&self, path: &str) -> Result<Value, ApiError> {
        let response = self
            .client
            .get(format!("{}{path}", self.base_url))
            .send()
            .await?;
        Self::json_body(response).await
    }

    async fn json_body(response: reqwest::Response) -> Result<Value, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json::<Value>().await?)
    }

    fn form_for(submission: &Submission) -> multipart::Form {
        let part = multipart::Part::bytes(submission.payload.clone())
            .file_name(submission.file_name.clone());
        let mut form = multipart::Form::new().part(submission.part_name.clone(), part);
        for (key, value) in &submission.fields {
            form = form.text(key.clone(), value.clone());
        }
        form
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn submission() -> Submission {
        Submission::new("photo.png", vec![0xFF, 0xD8, 0xFF])
            .part_name("image")
            .field("type", "mist")
    }

    #[tokio::test]
    async fn enqueue_returns_job_handle() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/protect/queue/add"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "job-7"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let handle = client.enqueue(&submission()).await.unwrap();
        assert_eq!(handle.id, "job-7");
    }

    #[tokio::test]
    async fn enqueue_rejection_is_submission_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/protect/queue/add"))
            .respond_with(ResponseTemplate::new(500).set_body_string("queue full"))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let err = client.enqueue(&submission()).await.unwrap_err();
        match err {
            ApiError::Submission { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "queue full");
            }
            other => panic!("expected Submission error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_payload_never_reaches_the_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/protect/queue/add"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "x"})))
            .expect(0)
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let empty = Submission::new("empty.png", Vec::new());
        let err = client.enqueue(&empty).await.unwrap_err();
        assert!(matches!(err, ApiError::EmptyPayload));
    }

    #[tokio::test]
    async fn health_accepts_2xx_and_ignores_the_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_string("whatever"))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        assert!(client.health().await.is_ok());
    }

    #[tokio::test]
    async fn health_fails_on_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let err = client.health().await.unwrap_err();
        assert!(matches!(err, ApiError::Api { status: 503, .. }));
    }

    #[tokio::test]
    async fn job_status_parses_report() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/protect/queue/status/job-7"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"status": "processing", "progress": 50.0})),
            )
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let report = client.job_status("job-7").await.unwrap();
        assert_eq!(report.status, crate::poller::JobStatus::Processing);
        assert_eq!(report.progress, Some(50.0));
    }

    #[tokio::test]
    async fn fetch_result_returns_json_document() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/protect/queue/result/job-7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"path": "/tmp/out.png"})))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let result = client.fetch_result("job-7").await.unwrap();
        assert_eq!(result["path"], "/tmp/out.png");
    }

    #[tokio::test]
    async fn analyze_is_synchronous_and_returns_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/voice/analyze"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"is_synthetic": false})))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let sub = Submission::new("clip.wav", vec![1, 2, 3]).part_name("audio");
        let result = client.analyze(&sub).await.unwrap();
        assert_eq!(result["is_synthetic"], false);
    }

    #[tokio::test]
    async fn verify_hits_the_lookup_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/voice/verify/wm-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"valid": true})))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let result = client.verify("wm-123").await.unwrap();
        assert_eq!(result["valid"], true);
    }

    #[test]
    fn result_url_is_keyed_by_job_id() {
        let client = ApiClient::new("http://api.example".to_string());
        assert_eq!(
            client.result_url("job-9"),
            "http://api.example/api/protect/queue/result/job-9"
        );
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let client = ApiClient::new("http://api.example/".to_string());
        assert_eq!(
            client.result_url("j"),
            "http://api.example/api/protect/queue/result/j"
        );
    }
}
