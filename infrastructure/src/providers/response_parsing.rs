//! Helpers shared by the provider adapters for reading HTTP responses

use consensus_application::GatewayError;
use reqwest::StatusCode;
use serde::Deserialize;

const MAX_ERROR_MESSAGE_LEN: usize = 256;

pub(crate) fn truncate_message(body: &str) -> String {
    let compact = body.trim().replace('\n', " ");
    compact.chars().take(MAX_ERROR_MESSAGE_LEN).collect()
}

/// Find the JSON object in a model's text output.
///
/// Accepts a bare object, an object inside a markdown fence, or an object
/// with chatter around it.
pub fn extract_json_payload(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(fenced) = extract_markdown_fenced_block(trimmed) {
        let fenced = fenced.trim();
        if !fenced.is_empty() {
            return Some(fenced);
        }
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    (start <= end).then_some(&trimmed[start..=end])
}

fn extract_markdown_fenced_block(text: &str) -> Option<&str> {
    let stripped = text.strip_prefix("```")?;
    let first_newline = stripped.find('\n')?;
    let (_, rest) = stripped.split_at(first_newline + 1);
    let end = rest.rfind("```")?;
    Some(&rest[..end])
}

/// `{"error": {...}}` body shared by OpenAI, Anthropic and Gemini
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorEnvelope {
    #[serde(default)]
    pub error: Option<ErrorDetail>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorDetail {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, rename = "type")]
    pub error_type: Option<String>,
    /// OpenAI puts a string here, Gemini a number
    #[serde(default)]
    pub code: Option<serde_json::Value>,
    #[serde(default)]
    pub status: Option<String>,
}

impl ErrorEnvelope {
    pub fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }

    pub fn detail(&self) -> ErrorDetailRef<'_> {
        ErrorDetailRef(self.error.as_ref())
    }
}

pub(crate) struct ErrorDetailRef<'a>(Option<&'a ErrorDetail>);

impl<'a> ErrorDetailRef<'a> {
    pub fn error_type(&self) -> Option<&'a str> {
        self.0.and_then(|d| d.error_type.as_deref())
    }

    pub fn code(&self) -> Option<&'a str> {
        self.0.and_then(|d| d.code.as_ref()).and_then(|c| c.as_str())
    }

    pub fn status(&self) -> Option<&'a str> {
        self.0.and_then(|d| d.status.as_deref())
    }

    /// Provider's own message, or the truncated body when there is none
    pub fn message_or(&self, body: &str) -> String {
        self.0
            .and_then(|d| d.message.as_deref())
            .filter(|m| !m.trim().is_empty())
            .map(truncate_message)
            .unwrap_or_else(|| truncate_message(body))
    }
}

/// Coarse classification every adapter maps its error body into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorClass {
    Auth,
    RateLimited,
    Timeout,
    Other,
}

impl ErrorClass {
    /// Classification from the status code alone
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ErrorClass::Auth,
            StatusCode::TOO_MANY_REQUESTS => ErrorClass::RateLimited,
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => ErrorClass::Timeout,
            _ => ErrorClass::Other,
        }
    }

    pub fn into_error(self, label: &str, status: StatusCode, message: String) -> GatewayError {
        match self {
            ErrorClass::Auth => {
                GatewayError::Authentication(format!("{label} HTTP {status}: {message}"))
            }
            ErrorClass::RateLimited => {
                GatewayError::RateLimited(format!("{label} HTTP {status}: {message}"))
            }
            ErrorClass::Timeout => GatewayError::Timeout,
            ErrorClass::Other => {
                GatewayError::RequestFailed(format!("{label} API returned HTTP {status}: {message}"))
            }
        }
    }
}

pub(crate) fn map_transport_error(label: &str, error: reqwest::Error) -> GatewayError {
    if error.is_timeout() {
        return GatewayError::Timeout;
    }
    GatewayError::RequestFailed(format!("{label} transport error: {error}"))
}
