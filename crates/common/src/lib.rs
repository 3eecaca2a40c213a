//! Common types and utilities for the API doc aggregator
//!
//! This crate contains the error type, the verb permission codec, the caller
//! access profile, and configuration loading shared by the compose, assembler,
//! and CLI components.

mod settings;
mod verb;

pub use settings::{Contact, License, Settings};
pub use verb::{classify, has_bit, to_mask, UnrecognizedVerb, VerbClass, VerbMask};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while composing API documentation
#[derive(Error, Debug)]
pub enum ApiDocError {
    #[error("You do not have access to API Docs for the requested service {0}.")]
    Forbidden(String),

    #[error("No API documentation is available for service {0}.")]
    ServiceUnavailable(String),

    #[error("Service {0} not found.")]
    NotFound(String),

    #[error("Failed to fetch API documentation for service {service}: {reason}")]
    Fetch { service: String, reason: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type for API doc operations
pub type Result<T> = std::result::Result<T, ApiDocError>;

/// Role identifier as assigned by the authorization subsystem
pub type RoleId = u64;

/// Identifies the caller for permission and cache-key purposes
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccessProfile {
    /// Administrators bypass per-operation filtering entirely
    #[serde(default)]
    pub is_administrator: bool,

    /// Role the caller's grants come from
    #[serde(default)]
    pub role_id: Option<RoleId>,
}

impl AccessProfile {
    pub fn administrator() -> Self {
        Self {
            is_administrator: true,
            role_id: None,
        }
    }

    pub fn role(role_id: RoleId) -> Self {
        Self {
            is_administrator: false,
            role_id: Some(role_id),
        }
    }

    /// Caller with no session: no administrator flag and no role
    pub fn anonymous() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_constructors() {
        assert!(AccessProfile::administrator().is_administrator);
        assert_eq!(AccessProfile::role(7).role_id, Some(7));
        assert!(!AccessProfile::role(7).is_administrator);
        assert_eq!(AccessProfile::anonymous().role_id, None);
    }

    #[test]
    fn test_forbidden_message_names_service() {
        let err = ApiDocError::Forbidden("db".to_string());
        assert!(err.to_string().contains("requested service db"));
    }
}
