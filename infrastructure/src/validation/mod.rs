//! Judge output validation

mod schema_validator;

pub use schema_validator::JsonSchemaVerdictValidator;
