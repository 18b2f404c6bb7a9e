//! Prompt domain
//!
//! Templates for the answer and synthesis stages of the consensus flow.

mod template;

pub use template::{PromptTemplate, UNAVAILABLE_MARKER};
