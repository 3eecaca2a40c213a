//! Authorizer backed by a YAML role policy
//!
//! ```yaml
//! roles:
//!   3:
//!     services:
//!       db:
//!         "": [get]
//!         "_table/*": [get, post]
//!       files:
//!         "*": [get]
//! ```
//!
//! Resource patterns: an exact resource path, `*` for every resource, or
//! `prefix/*` for `prefix` and everything below it. The effective mask for a
//! resource is the union of every matching grant.

use crate::collaborators::Authorizer;
use apidoc_aggregator_common::{AccessProfile, ApiDocError, Result, RoleId, VerbMask};
use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
struct PolicyFile {
    #[serde(default)]
    roles: HashMap<RoleId, RoleFile>,
}

#[derive(Debug, Default, Deserialize)]
struct RoleFile {
    #[serde(default)]
    services: IndexMap<String, IndexMap<String, Vec<String>>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ResourcePattern {
    Any,
    Exact(String),
    Prefix(String),
}

impl ResourcePattern {
    fn parse(pattern: &str) -> Self {
        let pattern = pattern.trim_matches('/');
        if pattern == "*" {
            return ResourcePattern::Any;
        }
        match pattern.strip_suffix("/*") {
            Some(prefix) => ResourcePattern::Prefix(prefix.trim_end_matches('/').to_string()),
            None => ResourcePattern::Exact(pattern.to_string()),
        }
    }

    fn matches(&self, resource: &str) -> bool {
        let resource = resource.trim_matches('/');
        match self {
            ResourcePattern::Any => true,
            ResourcePattern::Exact(path) => path == resource,
            ResourcePattern::Prefix(prefix) => {
                resource == prefix
                    || resource
                        .strip_prefix(prefix.as_str())
                        .is_some_and(|rest| rest.starts_with('/'))
            }
        }
    }
}

#[derive(Debug, Clone)]
struct Grant {
    pattern: ResourcePattern,
    verbs: VerbMask,
}

/// Role-based permissions loaded from a YAML policy
#[derive(Debug, Default)]
pub struct PolicyAuthorizer {
    /// role -> service (lowercase) -> grants
    roles: HashMap<RoleId, HashMap<String, Vec<Grant>>>,
}

impl PolicyAuthorizer {
    /// Load a policy from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ApiDocError::Config(format!("Failed to read policy file {:?}: {}", path, e))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse a policy from a YAML string
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let file: PolicyFile = serde_yaml::from_str(content)
            .map_err(|e| ApiDocError::Config(format!("Failed to parse policy YAML: {}", e)))?;

        let mut roles = HashMap::new();
        for (role_id, role) in file.roles {
            let mut services = HashMap::new();
            for (service, resources) in role.services {
                let grants = resources
                    .iter()
                    .map(|(resource, verbs)| {
                        let verbs = VerbMask::from_tokens(verbs).map_err(|e| {
                            ApiDocError::Config(format!(
                                "Role {} service {} resource '{}': {}",
                                role_id, service, resource, e
                            ))
                        })?;
                        Ok(Grant {
                            pattern: ResourcePattern::parse(resource),
                            verbs,
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                services.insert(service.to_lowercase(), grants);
            }
            roles.insert(role_id, services);
        }

        Ok(Self { roles })
    }

    fn grants(&self, profile: &AccessProfile, service_name: &str) -> Option<&[Grant]> {
        let role_id = profile.role_id?;
        self.roles
            .get(&role_id)?
            .get(&service_name.to_lowercase())
            .map(Vec::as_slice)
    }
}

impl Authorizer for PolicyAuthorizer {
    fn is_administrator(&self, profile: &AccessProfile) -> bool {
        profile.is_administrator
    }

    fn allows_service_access(&self, profile: &AccessProfile, service_name: &str) -> bool {
        if profile.is_administrator {
            return true;
        }
        self.grants(profile, service_name)
            .is_some_and(|grants| grants.iter().any(|grant| !grant.verbs.is_empty()))
    }

    fn service_permissions(
        &self,
        profile: &AccessProfile,
        service_name: &str,
        resource_path: &str,
    ) -> VerbMask {
        if profile.is_administrator {
            return VerbMask::ALL;
        }
        self.grants(profile, service_name)
            .unwrap_or_default()
            .iter()
            .filter(|grant| grant.pattern.matches(resource_path))
            .fold(VerbMask::NONE, |mask, grant| mask | grant.verbs)
    }
}
