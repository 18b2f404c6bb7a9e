//! Question value object

use serde::{Deserialize, Serialize};

/// A question to be answered by every configured provider (Value Object)
///
/// A question is never empty after trimming. Construction goes through
/// [`Question::try_new`], so an invalid question cannot reach the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Question {
    content: String,
}

impl Question {
    /// Try to create a new question, returning None if it is blank
    pub fn try_new(content: impl Into<String>) -> Option<Self> {
        let content = content.into();
        if content.trim().is_empty() {
            None
        } else {
            Some(Self { content })
        }
    }

    /// Get the question content
    pub fn content(&self) -> &str {
        &self.content
    }
}

impl std::fmt::Display for Question {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

impl TryFrom<String> for Question {
    type Error = crate::core::error::DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Question::try_new(s).ok_or_else(|| {
            crate::core::error::DomainError::InvalidQuestion("prompt must not be empty".into())
        })
    }
}

impl From<Question> for String {
    fn from(q: Question) -> Self {
        q.content
    }
}
