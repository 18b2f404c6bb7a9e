//! Output formatting for consensus results

pub mod console;
