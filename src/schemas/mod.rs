use std::collections::HashMap;
use thiserror::Error;

pub mod task;

/// Request validation failure with per-field messages. Maps to a 422 at the
/// HTTP boundary.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
    pub field_errors: HashMap<String, String>,
}

impl ValidationError {
    pub fn new(field_errors: HashMap<String, String>) -> Self {
        Self {
            message: "Task validation failed".to_string(),
            field_errors,
        }
    }
}
