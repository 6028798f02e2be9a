use super::AnalysisTransport;
use crate::error::AnalyzeError;
use crate::model::{AnalysisRequest, AnalysisResult, ClientConfig};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use tracing::{debug, trace};

/// HTTP client for `POST /api/analyze`.
#[derive(Clone)]
pub struct HttpAnalyzer {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpAnalyzer {
    pub fn new(cfg: &ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(cfg.user_agent.clone())
            .timeout(cfg.timeout)
            .build()
            .context("build HTTP client")?;
        Ok(Self {
            http,
            endpoint: cfg.endpoint(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl AnalysisTransport for HttpAnalyzer {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, AnalyzeError> {
        debug!(endpoint = %self.endpoint, query = %request.query, "dispatching analysis request");

        let resp = self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .json(request)
            .send()
            .await
            .map_err(AnalyzeError::transport)?;

        let status = resp.status();
        if !status.is_success() {
            // Body is not surfaced; keep it in the logs for diagnosis.
            let body = resp.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), body = %body, "analysis service rejected request");
            return Err(AnalyzeError::Service {
                status: status.as_u16(),
            });
        }

        let body = resp.text().await.map_err(AnalyzeError::transport)?;
        trace!(len = body.len(), "analysis response received");
        serde_json::from_str::<AnalysisResult>(&body).map_err(AnalyzeError::malformed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample_body, spawn_stub, StubReply};
    use axum::http::StatusCode;
    use serde_json::json;
    use std::time::Duration;

    fn analyzer(base_url: &str) -> HttpAnalyzer {
        analyzer_with_timeout(base_url, Duration::from_secs(5))
    }

    fn analyzer_with_timeout(base_url: &str, timeout: Duration) -> HttpAnalyzer {
        HttpAnalyzer::new(&ClientConfig {
            base_url: base_url.to_string(),
            timeout,
            user_agent: "profile-analyzer-cli/test".into(),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn posts_json_and_parses_result() {
        let stub = spawn_stub(vec![StubReply::json(
            StatusCode::OK,
            sample_body(&["Speaks 3 languages", "Former Olympic athlete"]),
        )])
        .await;
        let client = analyzer(&stub.base_url);
        let req = AnalysisRequest::new("John Smith Software Engineer Google", "").unwrap();

        let result = client.analyze(&req).await.unwrap();

        assert_eq!(
            result.insights.interesting_facts,
            vec!["Speaks 3 languages", "Former Olympic athlete"]
        );
        assert_eq!(stub.hits(), 1);
        let seen = stub.requests();
        assert_eq!(seen[0].content_type.as_deref(), Some("application/json"));
        assert_eq!(
            seen[0].body,
            json!({"query": "John Smith Software Engineer Google", "user_information": ""})
        );
    }

    #[tokio::test]
    async fn non_success_status_is_service_error_regardless_of_body() {
        let stub = spawn_stub(vec![StubReply::json(
            StatusCode::INTERNAL_SERVER_ERROR,
            sample_body(&["looks valid"]),
        )])
        .await;
        let client = analyzer(&stub.base_url);
        let req = AnalysisRequest::new("Jane", "").unwrap();

        let err = client.analyze(&req).await.unwrap_err();

        assert_eq!(err, AnalyzeError::Service { status: 500 });
        assert_eq!(err.to_string(), "Failed to analyze profile");
    }

    #[tokio::test]
    async fn not_found_is_service_error() {
        let stub = spawn_stub(vec![StubReply::json(
            StatusCode::NOT_FOUND,
            json!({"detail": "Profile not found"}),
        )])
        .await;
        let err = analyzer(&stub.base_url)
            .analyze(&AnalysisRequest::new("Nobody", "").unwrap())
            .await
            .unwrap_err();
        assert_eq!(err, AnalyzeError::Service { status: 404 });
    }

    #[tokio::test]
    async fn invalid_json_is_malformed() {
        let stub = spawn_stub(vec![StubReply::raw(StatusCode::OK, "<html>oops</html>")]).await;
        let err = analyzer(&stub.base_url)
            .analyze(&AnalysisRequest::new("Jane", "").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, AnalyzeError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn missing_insight_field_is_malformed() {
        let stub = spawn_stub(vec![StubReply::json(
            StatusCode::OK,
            json!({
                "profile_url": "https://example.com/in/jane",
                "insights": {"personal_background": "b", "interesting_facts": []}
            }),
        )])
        .await;
        let err = analyzer(&stub.base_url)
            .analyze(&AnalysisRequest::new("Jane", "").unwrap())
            .await
            .unwrap_err();
        match err {
            AnalyzeError::MalformedResponse(msg) => assert!(msg.contains("professional_summary")),
            other => panic!("expected malformed response, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_service_is_transport_error() {
        // Bind then drop to get a port nobody listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = analyzer(&format!("http://{addr}"))
            .analyze(&AnalysisRequest::new("Jane", "").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, AnalyzeError::Transport(ref m) if !m.is_empty()));
    }

    #[tokio::test]
    async fn client_timeout_is_transport_error_and_fails_the_session() {
        let stub = spawn_stub(vec![StubReply::json(StatusCode::OK, sample_body(&["late"]))
            .delayed(Duration::from_millis(800))])
        .await;
        let client = analyzer_with_timeout(&stub.base_url, Duration::from_millis(100));

        let err = client
            .analyze(&AnalysisRequest::new("Jane", "").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, AnalyzeError::Transport(ref m) if !m.is_empty()));

        let mut input = crate::input::InputController::new();
        input.set_query("Jane");
        let mut session = crate::session::AnalysisSession::new();
        let state = session.submit(&client, &input).await.cloned();
        assert!(matches!(
            state,
            Some(crate::session::SessionState::Failed(ref m)) if !m.is_empty()
        ));
        assert!(input.can_submit(session.state()));
    }
}
