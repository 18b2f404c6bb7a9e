//! Orchestration domain
//!
//! Types describing one consensus run: the phases it moves through and the
//! per-provider outcomes gathered during fan-out.

pub mod entities;
pub mod value_objects;
