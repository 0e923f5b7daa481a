//! Error types for the logic crate

use thiserror::Error;

/// Result type alias for logic operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while managing tier rules
#[derive(Debug, Error)]
pub enum Error {
    /// Rule not found by ID
    #[error("Rule not found: {0}")]
    RuleNotFound(String),

    /// Duplicate rule ID
    #[error("Duplicate rule ID: {0}")]
    DuplicateRule(String),

    /// Tier name not recognised
    #[error("Unknown effect tier: {0}")]
    UnknownTier(String),

    /// Effect name not recognised
    #[error("Unknown effect kind: {0}")]
    UnknownEffect(String),
}
