//! Listing views that bypass document assembly

use crate::collaborators::{Authorizer, ServiceRegistry};
use apidoc_aggregator_common::AccessProfile;
use serde::Serialize;
use serde_json::{Map, Value};

/// One visible service in an `as_resources` listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceEntry {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub service_type: String,
}

/// Names of services the caller holds any grant on, in registry order
pub(crate) fn visible_services<R, A>(
    registry: &R,
    authorizer: &A,
    profile: &AccessProfile,
) -> Vec<String>
where
    R: ServiceRegistry + ?Sized,
    A: Authorizer + ?Sized,
{
    let is_administrator = authorizer.is_administrator(profile);
    registry
        .list_visible_service_names(profile)
        .into_iter()
        .filter(|name| is_administrator || authorizer.allows_service_access(profile, name))
        .collect()
}

/// `{ <wrapper>: [{name, label, type}, ...] }`
pub(crate) fn service_resources<R, A>(
    registry: &R,
    authorizer: &A,
    profile: &AccessProfile,
    wrapper: &str,
) -> Value
where
    R: ServiceRegistry + ?Sized,
    A: Authorizer + ?Sized,
{
    let entries: Vec<Value> = visible_services(registry, authorizer, profile)
        .into_iter()
        .filter_map(|name| {
            let handle = registry.resolve(&name)?;
            serde_json::to_value(ServiceEntry {
                label: handle.label(),
                service_type: handle.service_type(),
                name,
            })
            .ok()
        })
        .collect();

    wrap(wrapper, Value::Array(entries))
}

/// `{ <wrapper>: ["", "*", <service>...] }`, empty without any grant
pub(crate) fn access_list<R, A>(
    registry: &R,
    authorizer: &A,
    profile: &AccessProfile,
    wrapper: &str,
) -> Value
where
    R: ServiceRegistry + ?Sized,
    A: Authorizer + ?Sized,
{
    let services = visible_services(registry, authorizer, profile);
    let paths: Vec<Value> = if services.is_empty() && !authorizer.is_administrator(profile) {
        Vec::new()
    } else {
        ["", "*"]
            .into_iter()
            .map(String::from)
            .chain(services)
            .map(Value::String)
            .collect()
    };

    wrap(wrapper, Value::Array(paths))
}

fn wrap(wrapper: &str, resources: Value) -> Value {
    let mut object = Map::new();
    object.insert(wrapper.to_string(), resources);
    Value::Object(object)
}
