//! Verdict domain
//!
//! The judge's structured cross-reference of provider answers:
//!
//! - [`Verdict`], [`Claim`], [`Conflict`], [`ConsensusLevel`] - the output shape
//! - [`ConsensusBanding`] - score → level policy
//! - [`verdict_json_schema`] - schema handed to the judge and used for validation
//! - [`VerdictError`] - domain rule violations
//!
//! ```text
//! judge text ──▶ JSON payload ──▶ schema check ──▶ typed decode ──▶ domain rules ──▶ Verdict
//! ```

pub mod banding;
pub mod entities;
pub mod schema;
pub mod validation;

pub use banding::ConsensusBanding;
pub use entities::{Claim, Conflict, ConsensusLevel, Verdict};
pub use schema::verdict_json_schema;
pub use validation::VerdictError;
