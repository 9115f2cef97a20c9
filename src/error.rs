//! Error types for the swarm engine.
//!
//! Errors fall into three tiers with different blast radii:
//!
//! - **Fatal at startup**: [`CsiError::Config`] (missing credentials,
//!   unreadable config file). The process reports and exits.
//! - **Rejected per request**: [`CsiError::Validation`] and
//!   [`CsiError::SessionNotStarted`]. The running session, if any,
//!   is left untouched.
//! - **Isolated per agent**: [`CsiError::Provider`]. One collaborator
//!   failing never aborts the others.

use thiserror::Error;

/// Swarm engine errors.
#[derive(Error, Debug)]
pub enum CsiError {
    /// Configuration error (missing credentials, bad config file).
    #[error("Config error: {0}")]
    Config(String),

    /// Session parameters were rejected before any state changed.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Operation requires an active session.
    #[error("Session not started")]
    SessionNotStarted,

    /// A provider call made on behalf of one persona failed.
    #[error("Provider error for '{persona}': {message}")]
    Provider {
        /// Persona key whose provider call failed.
        persona: String,
        /// What went wrong (HTTP status, timeout, malformed reply).
        message: String,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for swarm engine operations
pub type Result<T> = std::result::Result<T, CsiError>;

impl CsiError {
    /// Wrap a provider-call failure with the persona it belongs to.
    pub fn provider(persona: impl Into<String>, message: impl std::fmt::Display) -> Self {
        CsiError::Provider {
            persona: persona.into(),
            message: message.to_string(),
        }
    }
}

impl From<toml::de::Error> for CsiError {
    fn from(err: toml::de::Error) -> Self {
        CsiError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_names_the_persona() {
        let err = CsiError::provider("mediator", "HTTP 429");
        assert_eq!(
            err.to_string(),
            "Provider error for 'mediator': HTTP 429"
        );
    }

    #[test]
    fn test_toml_error_maps_to_config() {
        let parse: std::result::Result<toml::Value, _> = toml::from_str("not = [valid");
        let err: CsiError = parse.unwrap_err().into();
        assert!(matches!(err, CsiError::Config(_)));
    }
}
