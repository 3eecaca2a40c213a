//! Fixed document scaffolding
//!
//! Security schemes, the shared Success/Error/ResourceList components that
//! every composed document starts from, and the aggregator's own fragment.

use crate::collaborators::ServiceHandle;
use apidoc_aggregator_common::{Result, Settings};
use apidoc_aggregator_compose::{ComponentMap, ComposedDocument, Fragment, Info, Server};
use indexmap::IndexMap;
use serde_json::{json, Value};

const SECURITY_SCHEMES: [&str; 6] = [
    "BasicAuth",
    "BearerAuth",
    "ApiKeyQuery",
    "ApiKeyHeader",
    "SessionTokenQuery",
    "SessionTokenHeader",
];

/// Empty document carrying the fixed metadata and default components
pub fn base_document(settings: &Settings, info: Info, server_url: String) -> ComposedDocument {
    let mut components = IndexMap::new();
    components.insert("securitySchemes".to_string(), security_schemes(settings));
    components.insert("responses".to_string(), default_responses());
    components.insert("schemas".to_string(), default_schemas(settings));

    ComposedDocument {
        openapi: settings.openapi.clone(),
        servers: vec![Server {
            url: server_url,
            description: None,
        }],
        info,
        components,
        security: SECURITY_SCHEMES
            .iter()
            .map(|scheme| IndexMap::from([(scheme.to_string(), Vec::new())]))
            .collect(),
        tags: Vec::new(),
        paths: IndexMap::new(),
    }
}

/// `info` block of the whole-system document
pub fn system_info(settings: &Settings) -> Info {
    Info {
        title: settings.title.clone(),
        description: Some(settings.description.clone()).filter(|d| !d.is_empty()),
        version: settings.api_version.clone(),
        contact: settings.contact.clone(),
        license: settings.license.clone(),
    }
}

/// `info` block of a single-service document
pub fn service_info(settings: &Settings, label: String, description: String) -> Info {
    Info {
        title: label,
        description: Some(description).filter(|d| !d.is_empty()),
        version: settings.api_version.clone(),
        contact: None,
        license: None,
    }
}

fn security_schemes(settings: &Settings) -> ComponentMap {
    IndexMap::from([
        (
            "BasicAuth".to_string(),
            json!({ "type": "http", "scheme": "basic" }),
        ),
        (
            "BearerAuth".to_string(),
            json!({ "type": "http", "scheme": "bearer" }),
        ),
        (
            "ApiKeyQuery".to_string(),
            json!({ "type": "apiKey", "in": "query", "name": "api_key" }),
        ),
        (
            "ApiKeyHeader".to_string(),
            json!({ "type": "apiKey", "in": "header", "name": settings.api_key_header }),
        ),
        (
            "SessionTokenQuery".to_string(),
            json!({ "type": "apiKey", "in": "query", "name": "session_token" }),
        ),
        (
            "SessionTokenHeader".to_string(),
            json!({ "type": "apiKey", "in": "header", "name": settings.session_token_header }),
        ),
    ])
}

fn schema_response(description: &str, schema: &str) -> Value {
    let schema_ref = json!({ "$ref": format!("#/components/schemas/{}", schema) });
    json!({
        "description": description,
        "content": {
            "application/json": { "schema": schema_ref },
            "application/xml": { "schema": schema_ref }
        }
    })
}

fn default_responses() -> ComponentMap {
    IndexMap::from([
        (
            "Success".to_string(),
            schema_response("Success Response", "Success"),
        ),
        ("Error".to_string(), schema_response("Error Response", "Error")),
        (
            "ResourceList".to_string(),
            schema_response("Resource List Response", "ResourceList"),
        ),
    ])
}

fn default_schemas(settings: &Settings) -> ComponentMap {
    let mut resource_list_properties = serde_json::Map::new();
    resource_list_properties.insert(
        settings.resource_wrapper.clone(),
        json!({
            "type": "array",
            "description": "Array of accessible resources available to this service.",
            "items": { "type": "string" }
        }),
    );

    IndexMap::from([
        (
            "ResourceList".to_string(),
            json!({ "type": "object", "properties": resource_list_properties }),
        ),
        (
            "Success".to_string(),
            json!({
                "type": "object",
                "properties": {
                    "success": {
                        "type": "boolean",
                        "description": "True when API call was successful, false or error otherwise."
                    }
                }
            }),
        ),
        (
            "Error".to_string(),
            json!({
                "type": "object",
                "properties": {
                    "code": {
                        "type": "integer",
                        "format": "int32",
                        "description": "Error code."
                    },
                    "message": {
                        "type": "string",
                        "description": "String description of the error."
                    }
                }
            }),
        ),
    ])
}

/// Fragment documenting the aggregator service itself
///
/// Lets a registry expose the aggregator like any other service: one `GET`
/// on the service root returning the composed document.
pub fn own_fragment(service_name: &str) -> Fragment {
    let name = service_name.to_lowercase();
    let capitalized = camelize(&name);

    let value = json!({
        "paths": {
            format!("/{}", name): {
                "get": {
                    "tags": [name],
                    "summary": "Retrieve the API document.",
                    "description": "Returns the API document containing all accessible services.",
                    "operationId": format!("get{}", capitalized),
                    "parameters": [
                        {
                            "name": "file",
                            "description": "Download the results of the request as a file.",
                            "schema": { "type": "string" },
                            "in": "query",
                            "required": false
                        }
                    ],
                    "responses": {
                        "200": {
                            "description": "API Document",
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/ApiDocResponse" }
                                }
                            }
                        },
                        "default": { "$ref": "#/components/responses/Error" }
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "ApiDocResponse": {
                    "type": "object",
                    "properties": {
                        "openapi": {
                            "type": "string",
                            "description": "Version of the OpenAPI specification."
                        },
                        "info": {
                            "type": "object",
                            "description": "Title, description and version of the API."
                        },
                        "paths": {
                            "type": "array",
                            "description": "Array of API paths.",
                            "items": { "$ref": "#/components/schemas/ApiDocPath" }
                        },
                        "components": {
                            "type": "array",
                            "description": "Array of API components.",
                            "items": { "$ref": "#/components/schemas/ApiDocComponent" }
                        }
                    }
                },
                "ApiDocPath": {
                    "type": "object",
                    "properties": {
                        "__name__": { "type": "string", "description": "Path." }
                    }
                },
                "ApiDocComponent": {
                    "type": "object",
                    "properties": {
                        "__name__": { "type": "string", "description": "Component." }
                    }
                }
            }
        }
    });

    // The literal above always matches the Fragment shape
    serde_json::from_value(value).unwrap_or_default()
}

/// The aggregator itself, registered as a service under a chosen name
#[derive(Debug, Clone)]
pub struct AggregatorService {
    name: String,
}

impl AggregatorService {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_lowercase(),
        }
    }
}

impl ServiceHandle for AggregatorService {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn label(&self) -> String {
        "Live API Docs".to_string()
    }

    fn description(&self) -> String {
        "API documenting and testing service.".to_string()
    }

    fn service_type(&self) -> String {
        "swagger".to_string()
    }

    fn api_doc(&self, _refresh: bool) -> Result<Option<Fragment>> {
        Ok(Some(own_fragment(&self.name)))
    }
}

/// `api_docs` -> `ApiDocs`
fn camelize(name: &str) -> String {
    name.split(|c: char| c == '_' || c == '-' || c == ' ')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}
