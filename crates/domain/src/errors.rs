//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Semester
///
/// Every fallible operation in the workspace surfaces one of these
/// variants; call sites match on the kind rather than parsing messages.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum SemesterError {
    /// A referenced entity id or key does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A uniqueness, capacity, or duplicate-period invariant was violated.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// No calendar session is available; login is required.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// A call to the external calendar service failed.
    #[error("Calendar error: {0}")]
    Calendar(String),

    /// A store-level failure not otherwise classified.
    #[error("Database error: {0}")]
    Database(String),

    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input rejected before reaching a collaborator.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An internal invariant failed.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Semester operations
pub type Result<T> = std::result::Result<T, SemesterError>;
