//! OpenAPI 3.0 document model
//!
//! Fragments are modeled loosely: only the fields the aggregator rewrites are
//! typed, everything else rides along in flattened maps so a fragment
//! round-trips without a rigid schema.

use apidoc_aggregator_common::{Contact, License};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Verb (or metadata) key -> entry, for one path
pub type PathItem = IndexMap<String, PathEntry>;

/// Name -> definition, for one component kind
pub type ComponentMap = IndexMap<String, Value>;

/// Component kinds folded from fragments into the composed document
pub const MERGED_COMPONENT_KINDS: [&str; 8] = [
    "schemas",
    "responses",
    "parameters",
    "examples",
    "requestBodies",
    "headers",
    "links",
    "callbacks",
];

/// Document contributed by one service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    /// API paths (endpoints)
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub paths: IndexMap<String, PathItem>,

    /// Reusable components keyed by kind; non-object kinds are ignored on merge
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub components: IndexMap<String, Value>,

    /// Swagger 2.0 style schema definitions
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub definitions: Map<String, Value>,

    /// Swagger 2.0 style shared parameters
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub parameters: Map<String, Value>,

    /// Everything else (info, servers, vendor extensions)
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// One entry of a path item
///
/// Keys that name a verb normally hold an [`Operation`]; anything that does not
/// deserialize as one (path-level `parameters` arrays, `summary` strings,
/// malformed input) is carried unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathEntry {
    Operation(Operation),
    Other(Value),
}

/// Documentation for one verb on one path
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// Tags (for grouping)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Operation ID (unique identifier)
    #[serde(
        rename = "operationId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub operation_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<Value>>,

    /// Status code (or "default") -> response or `$ref`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responses: Option<IndexMap<String, Value>>,

    /// requestBody, security, deprecated, x-* extensions, ...
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

/// API information
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Info {
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,
}

/// Server information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Tag descriptor; one per contributing service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Aggregated, permission-filtered document returned to a caller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComposedDocument {
    pub openapi: String,

    #[serde(default)]
    pub servers: Vec<Server>,

    pub info: Info,

    #[serde(default)]
    pub components: IndexMap<String, ComponentMap>,

    #[serde(default)]
    pub security: Vec<IndexMap<String, Vec<String>>>,

    #[serde(default)]
    pub tags: Vec<Tag>,

    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,
}

impl Fragment {
    /// A fragment with no paths and no components of any form documents nothing
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
            && self.components.is_empty()
            && self.definitions.is_empty()
            && self.parameters.is_empty()
    }

    /// Component maps to merge, in merge order
    ///
    /// Recognized kinds from `components` first, then the Swagger 2.0
    /// `definitions` (as schemas) and `parameters`.
    pub fn component_sets(&self) -> Vec<(&'static str, &Map<String, Value>)> {
        let mut sets: Vec<(&'static str, &Map<String, Value>)> = MERGED_COMPONENT_KINDS
            .iter()
            .filter_map(|kind| {
                self.components
                    .get(*kind)
                    .and_then(Value::as_object)
                    .map(|entries| (*kind, entries))
            })
            .collect();

        if !self.definitions.is_empty() {
            sets.push(("schemas", &self.definitions));
        }
        if !self.parameters.is_empty() {
            sets.push(("parameters", &self.parameters));
        }
        sets
    }

    /// String field of the fragment's own `info` object
    pub fn info_field(&self, field: &str) -> Option<&str> {
        self.extra
            .get("info")
            .and_then(|info| info.get(field))
            .and_then(Value::as_str)
    }

    /// Top-level string extension such as `x-service-type`
    pub fn extension(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(Value::as_str)
    }
}

impl PathEntry {
    pub fn as_operation(&self) -> Option<&Operation> {
        match self {
            PathEntry::Operation(op) => Some(op),
            PathEntry::Other(_) => None,
        }
    }
}

impl Operation {
    /// Tags currently attached, empty if none were declared
    pub fn tag_names(&self) -> &[String] {
        self.tags.as_deref().unwrap_or_default()
    }
}

impl ComposedDocument {
    /// Entries of one component kind, if any were merged
    pub fn component(&self, kind: &str, name: &str) -> Option<&Value> {
        self.components.get(kind).and_then(|entries| entries.get(name))
    }

    /// Operation at (path, verb), if present and well-formed
    pub fn operation(&self, path: &str, verb: &str) -> Option<&Operation> {
        self.paths
            .get(path)
            .and_then(|item| item.get(verb))
            .and_then(PathEntry::as_operation)
    }
}
