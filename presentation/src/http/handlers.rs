//! Request handlers

use super::error::{ApiError, ApiResult};
use super::state::{AppState, ProviderInfo};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use consensus_application::RunConsensusInput;
use consensus_domain::{Credentials, FinalPayload, ProviderId, Question};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::any::Any;
use std::sync::Arc;
use tracing::{info, warn};

/// Body of `POST /api/consensus`
#[derive(Debug, Deserialize)]
pub struct ConsensusRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    /// Per-request provider keys; unknown provider names are ignored
    #[serde(default)]
    pub keys: Option<Credentials>,
}

#[derive(Debug, Serialize)]
pub struct ProvidersResponse {
    pub providers: Vec<ProviderInfo>,
    pub judge_priority: Vec<ProviderId>,
    pub strategy: &'static str,
    pub min_successes: usize,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": state.version,
    }))
}

pub async fn list_providers(State(state): State<Arc<AppState>>) -> Json<ProvidersResponse> {
    let policy = state.use_case.config().policy();
    Json(ProvidersResponse {
        providers: state.providers.clone(),
        judge_priority: policy.judge_priority().order().to_vec(),
        strategy: policy.strategy().as_str(),
        min_successes: policy.min_successes(),
    })
}

pub async fn run_consensus(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ConsensusRequest>, JsonRejection>,
) -> ApiResult<Json<FinalPayload>> {
    let Json(request) = body.inspect_err(|e| warn!("Rejected request body: {}", e))?;

    let question = request
        .prompt
        .and_then(Question::try_new)
        .ok_or_else(|| ApiError::InvalidRequest("prompt must be a non-empty string".into()))?;
    let credentials = request.keys.unwrap_or_default();
    info!(
        "Consensus request ({} chars, caller keys: {:?})",
        question.content().len(),
        credentials
    );

    let input = RunConsensusInput::new(question).with_credentials(credentials);
    match state.use_case.execute(input).await {
        Ok(payload) => {
            info!(
                "Consensus complete: score={} judge={}",
                payload.verdict.consensus_score, payload.judge
            );
            Ok(Json(payload))
        }
        Err(e) => {
            warn!("Consensus request failed: {}", e);
            Err(e.into())
        }
    }
}

/// Turn a handler panic into a structured 500
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("handler panicked");
    warn!("Handler panicked: {}", details);
    ApiError::Internal(details.to_string()).into_response()
}
