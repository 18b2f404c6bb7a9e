//! Route definitions for the HTTP API

use super::handlers;
use super::state::AppState;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{Method, header},
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Creates the router with all routes configured.
///
/// Bodies larger than `body_limit` bytes are rejected with 413.
pub fn router(state: Arc<AppState>, body_limit: usize) -> Router {
    // The browser UI is served from another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    let api = Router::new()
        .route("/consensus", post(handlers::run_consensus))
        .route("/providers", get(handlers::list_providers));

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", api)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CatchPanicLayer::custom(handlers::handle_panic))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::state::ProviderInfo;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use consensus_application::{
        ConsensusConfig, ExecutionParams, GatewayError, LlmGateway, LlmSession,
        RunConsensusUseCase, VerdictValidator,
    };
    use consensus_domain::{ConsensusBanding, ProviderId, Verdict, VerdictError};
    use serde_json::{Value, json};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tower::ServiceExt;

    // ==================== Test Mocks ====================

    #[derive(Clone)]
    enum Reply {
        Text(&'static str),
        Fail(&'static str),
        Hang,
    }

    struct MockGateway {
        replies: HashMap<ProviderId, Reply>,
        judge_reply: String,
        sessions: Arc<AtomicUsize>,
        keys_seen: Arc<std::sync::Mutex<Vec<(ProviderId, Option<String>)>>>,
    }

    impl MockGateway {
        fn new(replies: &[(ProviderId, Reply)]) -> Self {
            Self {
                replies: replies.iter().cloned().collect(),
                judge_reply: verdict_json(),
                sessions: Arc::new(AtomicUsize::new(0)),
                keys_seen: Arc::default(),
            }
        }

        fn all_answer() -> Self {
            Self::new(&[
                (ProviderId::OpenAi, Reply::Text("Coffee is fine in moderation.")),
                (ProviderId::Anthropic, Reply::Text("Moderate coffee is healthy.")),
                (ProviderId::Gemini, Reply::Text("Up to four cups a day is safe.")),
            ])
        }
    }

    #[async_trait]
    impl LlmGateway for MockGateway {
        async fn create_session(
            &self,
            provider: ProviderId,
            credential: Option<&str>,
            _system_prompt: &str,
        ) -> Result<Box<dyn LlmSession>, GatewayError> {
            self.sessions.fetch_add(1, Ordering::SeqCst);
            self.keys_seen
                .lock()
                .unwrap()
                .push((provider, credential.map(str::to_string)));
            Ok(Box::new(MockSession {
                provider,
                reply: self
                    .replies
                    .get(&provider)
                    .cloned()
                    .unwrap_or(Reply::Fail("not scripted")),
                judge_reply: self.judge_reply.clone(),
            }))
        }
    }

    struct MockSession {
        provider: ProviderId,
        reply: Reply,
        judge_reply: String,
    }

    #[async_trait]
    impl LlmSession for MockSession {
        fn provider(&self) -> ProviderId {
            self.provider
        }

        async fn send(&self, _content: &str) -> Result<String, GatewayError> {
            match &self.reply {
                Reply::Text(text) => Ok(text.to_string()),
                Reply::Fail(message) => Err(GatewayError::Authentication(message.to_string())),
                Reply::Hang => {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    Ok("too late".to_string())
                }
            }
        }

        async fn send_structured(
            &self,
            _content: &str,
            _schema: &Value,
        ) -> Result<String, GatewayError> {
            Ok(self.judge_reply.clone())
        }
    }

    struct DomainOnlyValidator;

    impl VerdictValidator for DomainOnlyValidator {
        fn validate(
            &self,
            judge_output: &str,
            responders: &[ProviderId],
            banding: &ConsensusBanding,
        ) -> Result<Verdict, VerdictError> {
            let value: Value = serde_json::from_str(judge_output)
                .map_err(|e| VerdictError::InvalidJson(e.to_string()))?;
            Verdict::from_judge_value(value, responders, banding)
        }
    }

    fn verdict_json() -> String {
        json!({
            "consensus_score": 82,
            "consensus_level": "High",
            "summary": "Moderate coffee intake is fine for most adults.",
            "claims": [{
                "text": "Moderate intake is safe",
                "supporters": ["openai", "gemini"],
                "dissenters": []
            }]
        })
        .to_string()
    }

    fn app_with(gateway: MockGateway, config: ConsensusConfig, body_limit: usize) -> Router {
        let gateway: Arc<dyn LlmGateway> = Arc::new(gateway);
        let use_case = Arc::new(RunConsensusUseCase::new(
            gateway,
            Arc::new(DomainOnlyValidator),
            config,
        ));
        let providers = vec![
            ProviderInfo {
                provider: ProviderId::OpenAi,
                model: "gpt-4o".to_string(),
                has_default_key: true,
            },
            ProviderInfo {
                provider: ProviderId::Anthropic,
                model: "claude-sonnet-4-5".to_string(),
                has_default_key: false,
            },
            ProviderInfo {
                provider: ProviderId::Gemini,
                model: "gemini-2.5-flash".to_string(),
                has_default_key: false,
            },
        ];
        let state = AppState::new(use_case, providers).with_version("9.9.9");
        router(Arc::new(state), body_limit)
    }

    fn app(gateway: MockGateway) -> Router {
        app_with(gateway, ConsensusConfig::default(), 64 * 1024)
    }

    fn post_json(body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/consensus")
            .header("content-type", "application/json")
            .body(body.into())
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = app(MockGateway::all_answer())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"status": "ok", "version": "9.9.9"})
        );
    }

    #[tokio::test]
    async fn test_providers_endpoint_reports_key_presence_only() {
        let response = app(MockGateway::all_answer())
            .oneshot(
                Request::builder()
                    .uri("/api/providers")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["providers"][0]["provider"], "openai");
        assert_eq!(body["providers"][0]["has_default_key"], true);
        assert_eq!(body["providers"][2]["model"], "gemini-2.5-flash");
        assert_eq!(body["judge_priority"], json!(["gemini", "openai", "anthropic"]));
        assert_eq!(body["strategy"], "parallel");
        assert_eq!(body["min_successes"], 1);
    }

    #[tokio::test]
    async fn test_consensus_returns_final_payload() {
        let response = app(MockGateway::all_answer())
            .oneshot(post_json(r#"{"prompt": "Is coffee healthy?"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["consensus_score"], 82);
        assert_eq!(body["consensus_level"], "High");
        assert_eq!(body["judge"], "gemini");
        assert_eq!(body["claims"][0]["supporters"], json!(["openai", "gemini"]));
        assert_eq!(
            body["raw_answers"]["anthropic"],
            "Moderate coffee is healthy."
        );
    }

    #[tokio::test]
    async fn test_failed_provider_shows_sentinel() {
        let gateway = MockGateway::new(&[
            (ProviderId::OpenAi, Reply::Text("Coffee is fine in moderation.")),
            (ProviderId::Anthropic, Reply::Fail("invalid API key")),
            (ProviderId::Gemini, Reply::Text("Up to four cups a day is safe.")),
        ]);
        let response = app(gateway)
            .oneshot(post_json(r#"{"prompt": "Is coffee healthy?"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["raw_answers"]["anthropic"], "unavailable");
        assert_eq!(body["raw_answers"].as_object().unwrap().len(), 3);
        assert!(!body.to_string().contains("invalid API key"));
    }

    #[tokio::test]
    async fn test_request_keys_reach_the_gateway() {
        let gateway = MockGateway::all_answer();
        let keys_seen = Arc::clone(&gateway.keys_seen);
        let response = app(gateway)
            .oneshot(post_json(
                r#"{"prompt": "Is coffee healthy?", "keys": {"openai": "sk-user", "mistral": "ignored"}}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let seen = keys_seen.lock().unwrap().clone();
        assert!(seen.contains(&(ProviderId::OpenAi, Some("sk-user".to_string()))));
        assert!(seen.contains(&(ProviderId::Anthropic, None)));
    }

    #[tokio::test]
    async fn test_empty_prompt_is_rejected_without_provider_calls() {
        let gateway = MockGateway::all_answer();
        let sessions = Arc::clone(&gateway.sessions);
        let app = app(gateway);

        for body in [r#"{"prompt": "   "}"#, r#"{}"#, r#"{"prompt": null}"#] {
            let response = app.clone().oneshot(post_json(body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
            assert!(body_json(response).await["error"].is_string());
        }
        assert_eq!(sessions.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_malformed_json_is_a_bad_request() {
        let response = app(MockGateway::all_answer())
            .oneshot(post_json(r#"{"prompt": "#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().starts_with("Invalid JSON body"));
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let app = app_with(MockGateway::all_answer(), ConsensusConfig::default(), 32);
        let prompt = "x".repeat(128);
        let response = app
            .oneshot(post_json(json!({ "prompt": prompt }).to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_all_providers_failing_is_a_bad_gateway() {
        let gateway = MockGateway::new(&[
            (ProviderId::OpenAi, Reply::Fail("invalid API key")),
            (ProviderId::Anthropic, Reply::Fail("invalid API key")),
            (ProviderId::Gemini, Reply::Fail("invalid API key")),
        ]);
        let sessions = Arc::clone(&gateway.sessions);
        let response = app(gateway)
            .oneshot(post_json(r#"{"prompt": "Is coffee healthy?"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        let failures = body["failures"].as_array().unwrap();
        assert_eq!(failures.len(), 3);
        assert!(failures[0].as_str().unwrap().starts_with("openai: "));
        // no judge session after the fan-out
        assert_eq!(sessions.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_invalid_verdict_is_a_server_error() {
        let mut gateway = MockGateway::all_answer();
        gateway.judge_reply = json!({
            "consensus_score": 20,
            "consensus_level": "High",
            "summary": "Mismatched band",
            "claims": []
        })
        .to_string();
        let response = app(gateway)
            .oneshot(post_json(r#"{"prompt": "Is coffee healthy?"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Consensus synthesis failed");
        assert!(body["details"].as_str().unwrap().contains("gemini"));
    }

    #[tokio::test]
    async fn test_pipeline_timeout_is_a_gateway_timeout() {
        let gateway = MockGateway::new(&[
            (ProviderId::OpenAi, Reply::Hang),
            (ProviderId::Anthropic, Reply::Text("Moderate coffee is healthy.")),
            (ProviderId::Gemini, Reply::Text("Up to four cups a day is safe.")),
        ]);
        let config = ConsensusConfig::default().with_execution(
            ExecutionParams::default().with_request_timeout(Duration::from_millis(50)),
        );
        let response = app_with(gateway, config, 64 * 1024)
            .oneshot(post_json(r#"{"prompt": "Is coffee healthy?"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Consensus run timed out");
        assert!(body["details"].is_string());
    }

    #[tokio::test]
    async fn test_cors_preflight_is_allowed() {
        let response = app(MockGateway::all_answer())
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/api/consensus")
                    .header("origin", "http://localhost:5173")
                    .header("access-control-request-method", "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "*"
        );
    }
}
