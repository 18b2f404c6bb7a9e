use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use consensus_application::RunConsensusError;
use serde_json::json;
use thiserror::Error;

/// Error responses of the HTTP API. Every variant renders as a JSON object.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("{message}")]
    ProvidersFailed {
        message: String,
        failures: Vec<String>,
    },

    #[error("Consensus run timed out")]
    Timeout(String),

    #[error("Consensus synthesis failed")]
    Synthesis(String),

    #[error("Internal error")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::ProvidersFailed { .. } => StatusCode::BAD_GATEWAY,
            ApiError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Synthesis(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        let body = match self {
            ApiError::InvalidRequest(_) | ApiError::PayloadTooLarge(_) => {
                json!({ "error": message })
            }
            ApiError::ProvidersFailed { failures, .. } => {
                json!({ "error": message, "failures": failures })
            }
            ApiError::Timeout(details) | ApiError::Synthesis(details) | ApiError::Internal(details) => {
                json!({ "error": message, "details": details })
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<RunConsensusError> for ApiError {
    fn from(err: RunConsensusError) -> Self {
        match err {
            RunConsensusError::AllProvidersFailed { .. }
            | RunConsensusError::InsufficientResponses { .. } => ApiError::ProvidersFailed {
                message: err.to_string(),
                failures: err.failures().to_vec(),
            },
            RunConsensusError::Timeout(_) => ApiError::Timeout(err.to_string()),
            RunConsensusError::SynthesisFailed(inner) => ApiError::Synthesis(inner.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge("Request body is too large".to_string())
        } else {
            ApiError::InvalidRequest(format!("Invalid JSON body: {}", rejection.body_text()))
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
