//! Fragment file loader

use super::types::Fragment;
use apidoc_aggregator_common::{ApiDocError, Result};
use std::fs;
use std::path::Path;

/// Fragment source encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentFormat {
    Json,
    Yaml,
}

impl FragmentFormat {
    /// Detect format from file extension; `None` for anything else
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Some(FragmentFormat::Json),
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Some(FragmentFormat::Yaml)
            }
            _ => None,
        }
    }
}

/// Reads service fragments from JSON or YAML
pub struct FragmentParser {
    /// Loaded fragment
    fragment: Fragment,

    /// Service the fragment belongs to
    service_name: String,
}

impl FragmentParser {
    /// Load a fragment from file path, choosing the format by extension
    ///
    /// # Example
    /// ```rust,ignore
    /// let parser = FragmentParser::from_file("fragments/db.json", "db")?;
    /// let fragment = parser.into_fragment();
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P, service_name: &str) -> Result<Self> {
        let path = path.as_ref();
        let format = FragmentFormat::from_path(path).ok_or_else(|| {
            ApiDocError::Parse(format!(
                "Unsupported fragment file extension: {}",
                path.display()
            ))
        })?;

        let content = fs::read_to_string(path).map_err(|e| {
            ApiDocError::Parse(format!(
                "Failed to read fragment file {}: {}",
                path.display(),
                e
            ))
        })?;

        match format {
            FragmentFormat::Json => Self::from_json(&content, service_name),
            FragmentFormat::Yaml => Self::from_yaml(&content, service_name),
        }
    }

    /// Parse a fragment from JSON string
    pub fn from_json(json: &str, service_name: &str) -> Result<Self> {
        let fragment: Fragment = serde_json::from_str(json).map_err(|e| {
            ApiDocError::Parse(format!(
                "Failed to parse fragment JSON for {}: {}",
                service_name, e
            ))
        })?;

        Ok(Self::new(fragment, service_name))
    }

    /// Parse a fragment from YAML string
    ///
    /// Scalar mapping keys such as unquoted status codes (`200:`) are read as
    /// strings, the way they would appear in the JSON form of the document.
    pub fn from_yaml(yaml: &str, service_name: &str) -> Result<Self> {
        let parse_error = |e: &dyn std::fmt::Display| {
            ApiDocError::Parse(format!(
                "Failed to parse fragment YAML for {}: {}",
                service_name, e
            ))
        };

        let document: serde_yaml::Value =
            serde_yaml::from_str(yaml).map_err(|e| parse_error(&e))?;
        if document.is_null() {
            return Ok(Self::new(Fragment::default(), service_name));
        }

        let document =
            serde_json::to_value(stringify_keys(document)).map_err(|e| parse_error(&e))?;
        let fragment: Fragment = serde_json::from_value(document).map_err(|e| parse_error(&e))?;

        Ok(Self::new(fragment, service_name))
    }

    fn new(fragment: Fragment, service_name: &str) -> Self {
        tracing::debug!(
            service = service_name,
            paths = fragment.paths.len(),
            "Loaded API doc fragment"
        );
        Self {
            fragment,
            service_name: service_name.to_string(),
        }
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Get reference to the underlying fragment
    pub fn fragment(&self) -> &Fragment {
        &self.fragment
    }

    pub fn into_fragment(self) -> Fragment {
        self.fragment
    }
}

/// Rewrite number, bool and null mapping keys as strings, recursively
fn stringify_keys(value: serde_yaml::Value) -> serde_yaml::Value {
    use serde_yaml::Value;

    match value {
        Value::Mapping(mapping) => Value::Mapping(
            mapping
                .into_iter()
                .map(|(key, value)| (key_to_string(key), stringify_keys(value)))
                .collect(),
        ),
        Value::Sequence(items) => Value::Sequence(items.into_iter().map(stringify_keys).collect()),
        Value::Tagged(mut tagged) => {
            tagged.value = stringify_keys(tagged.value);
            Value::Tagged(tagged)
        }
        other => other,
    }
}

fn key_to_string(key: serde_yaml::Value) -> serde_yaml::Value {
    use serde_yaml::Value;

    match key {
        Value::Number(number) => Value::String(number.to_string()),
        Value::Bool(flag) => Value::String(flag.to_string()),
        Value::Null => Value::String("null".to_string()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_fragment() {
        let json = r#"{
            "paths": {
                "/_table": {
                    "get": { "operationId": "getDbTables" }
                }
            }
        }"#;

        let parser = FragmentParser::from_json(json, "db").unwrap();
        assert_eq!(parser.service_name(), "db");
        assert_eq!(parser.fragment().paths.len(), 1);
    }

    #[test]
    fn test_parse_yaml_fragment() {
        let yaml = r#"
paths:
  /files:
    get:
      summary: List files
components:
  schemas:
    File:
      type: object
"#;

        let fragment = FragmentParser::from_yaml(yaml, "files")
            .unwrap()
            .into_fragment();
        assert!(fragment.paths.contains_key("/files"));
        assert!(fragment.components.contains_key("schemas"));
    }

    #[test]
    fn test_yaml_unquoted_status_codes() {
        let yaml = r#"
paths:
  /files:
    get:
      summary: List
      responses:
        200:
          description: OK
        404:
          description: Missing
"#;

        let fragment = FragmentParser::from_yaml(yaml, "files")
            .unwrap()
            .into_fragment();
        let op = fragment.paths["/files"]["get"].as_operation().unwrap();
        let codes: Vec<&str> = op
            .responses
            .as_ref()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(codes, vec!["200", "404"]);
    }

    #[test]
    fn test_empty_yaml_is_empty_fragment() {
        let fragment = FragmentParser::from_yaml("", "files")
            .unwrap()
            .into_fragment();
        assert!(fragment.is_empty());
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let result = FragmentParser::from_json("{ not json", "db");
        assert!(matches!(result, Err(ApiDocError::Parse(_))));
    }

    #[test]
    fn test_from_file_by_extension() {
        let dir = tempfile::TempDir::new().unwrap();
        let yaml_path = dir.path().join("files.yml");
        std::fs::write(&yaml_path, "paths:\n  /files:\n    get: {}\n").unwrap();
        let text_path = dir.path().join("files.txt");
        std::fs::write(&text_path, "paths: {}").unwrap();

        let parser = FragmentParser::from_file(&yaml_path, "files").unwrap();
        assert!(parser.fragment().paths.contains_key("/files"));

        let result = FragmentParser::from_file(&text_path, "files");
        assert!(matches!(result, Err(ApiDocError::Parse(_))));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            FragmentFormat::from_path(Path::new("db.JSON")),
            Some(FragmentFormat::Json)
        );
        assert_eq!(
            FragmentFormat::from_path(Path::new("db.yml")),
            Some(FragmentFormat::Yaml)
        );
        assert_eq!(FragmentFormat::from_path(Path::new("db.txt")), None);
    }
}
