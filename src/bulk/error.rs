use serde::Serialize;
use thiserror::Error;

use crate::database::StoreError;

/// A failed delete guard for one target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub id: String,
    pub error: String,
}

impl Violation {
    pub fn new(id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            error: error.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum BulkError {
    /// Malformed request body
    #[error("{0}")]
    Validation(String),

    /// Wrong role for the endpoint, or a target outside the seller's shops
    #[error("{0}")]
    Forbidden(String),

    /// One or more delete guards failed; nothing was written
    #[error("{}", join_violations(.0))]
    Constraint(Vec<Violation>),

    /// Action not in the caller's dispatch table
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("{label} not found: {}", .ids.join(", "))]
    NotFound { label: &'static str, ids: Vec<String> },

    #[error(transparent)]
    Storage(#[from] StoreError),
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.error.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
