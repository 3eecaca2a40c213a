//! Aggregator settings loaded from YAML
//!
//! Every field has a default, so a missing or empty settings file yields the
//! built-in document metadata.

use crate::{ApiDocError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level document metadata and naming conventions
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// OpenAPI version written to the `openapi` field
    pub openapi: String,
    /// API version reported in `info.version`
    pub api_version: String,
    /// Base URL of the API, used as `servers[0].url`
    pub base_path: String,
    /// Title of the whole-system document
    pub title: String,
    /// Description of the whole-system document
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,
    /// Header carrying the API key
    pub api_key_header: String,
    /// Header carrying the session token
    pub session_token_header: String,
    /// Property name wrapping resource arrays in listings
    pub resource_wrapper: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Contact {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct License {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            openapi: "3.0.0".to_string(),
            api_version: "2.0".to_string(),
            base_path: "/api/v2".to_string(),
            title: "Live API Documentation".to_string(),
            description: String::new(),
            contact: None,
            license: None,
            api_key_header: "X-Api-Key".to_string(),
            session_token_header: "X-Session-Token".to_string(),
            resource_wrapper: "resource".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ApiDocError::Config(format!("Failed to read settings file {:?}: {}", path, e))
        })?;

        Self::from_yaml(&content).map_err(|e| {
            ApiDocError::Config(format!(
                "Failed to parse settings YAML from {:?}: {}",
                path, e
            ))
        })
    }

    /// Parse settings from a YAML string; an empty document yields defaults
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Server URL for a single-service document
    pub fn service_url(&self, service_name: &str) -> String {
        format!("{}/{}", self.base_path.trim_end_matches('/'), service_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_yaml_yields_defaults() {
        let settings = Settings::from_yaml("").unwrap();
        assert_eq!(settings.openapi, "3.0.0");
        assert_eq!(settings.base_path, "/api/v2");
        assert_eq!(settings.resource_wrapper, "resource");
    }

    #[test]
    fn test_partial_yaml_keeps_other_defaults() {
        let yaml = r#"
title: "Acme API"
base_path: "/api/v3"
contact:
  name: "Acme Support"
  email: "support@acme.test"
"#;
        let settings = Settings::from_yaml(yaml).unwrap();
        assert_eq!(settings.title, "Acme API");
        assert_eq!(settings.base_path, "/api/v3");
        assert_eq!(settings.api_version, "2.0");
        assert_eq!(
            settings.contact.as_ref().and_then(|c| c.email.as_deref()),
            Some("support@acme.test")
        );
    }

    #[test]
    fn test_service_url() {
        let mut settings = Settings::default();
        assert_eq!(settings.service_url("db"), "/api/v2/db");
        settings.base_path = "/api/v2/".to_string();
        assert_eq!(settings.service_url("db"), "/api/v2/db");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api_version: \"2.1\"").unwrap();

        let settings = Settings::load(file.path()).unwrap();
        assert_eq!(settings.api_version, "2.1");
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let result = Settings::load(Path::new("/nonexistent/settings.yaml"));
        assert!(matches!(result, Err(ApiDocError::Config(_))));
    }
}
