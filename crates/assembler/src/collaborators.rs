//! Interfaces the assembler consumes from the service registry and the
//! authorization subsystem

use apidoc_aggregator_common::{AccessProfile, Result, VerbMask};
use apidoc_aggregator_compose::Fragment;
use std::sync::Arc;

/// One registered backend service, owned by the registry
#[cfg_attr(test, mockall::automock)]
pub trait ServiceHandle: Send + Sync {
    fn name(&self) -> String;

    /// Human-readable label, used as the single-service document title
    fn label(&self) -> String;

    fn description(&self) -> String;

    fn service_type(&self) -> String;

    /// The service's documentation fragment, `None` if it publishes none
    ///
    /// `refresh` bypasses any fragment caching inside the registry.
    fn api_doc(&self, refresh: bool) -> Result<Option<Fragment>>;
}

/// Enumerates and resolves registered services
#[cfg_attr(test, mockall::automock)]
pub trait ServiceRegistry: Send + Sync {
    /// Service names in enumeration order; this order drives merge order
    fn list_visible_service_names(&self, profile: &AccessProfile) -> Vec<String>;

    fn resolve(&self, name: &str) -> Option<Arc<dyn ServiceHandle>>;
}

/// Permission capability of the authorization subsystem
///
/// Lookups are total: a resource with no grant yields [`VerbMask::NONE`].
#[cfg_attr(test, mockall::automock)]
pub trait Authorizer: Send + Sync {
    fn is_administrator(&self, profile: &AccessProfile) -> bool;

    /// True if the caller holds any grant on the service
    fn allows_service_access(&self, profile: &AccessProfile, service_name: &str) -> bool;

    fn service_permissions(
        &self,
        profile: &AccessProfile,
        service_name: &str,
        resource_path: &str,
    ) -> VerbMask;
}

impl<T: ServiceRegistry + ?Sized> ServiceRegistry for Arc<T> {
    fn list_visible_service_names(&self, profile: &AccessProfile) -> Vec<String> {
        (**self).list_visible_service_names(profile)
    }

    fn resolve(&self, name: &str) -> Option<Arc<dyn ServiceHandle>> {
        (**self).resolve(name)
    }
}

impl<T: Authorizer + ?Sized> Authorizer for Arc<T> {
    fn is_administrator(&self, profile: &AccessProfile) -> bool {
        (**self).is_administrator(profile)
    }

    fn allows_service_access(&self, profile: &AccessProfile, service_name: &str) -> bool {
        (**self).allows_service_access(profile, service_name)
    }

    fn service_permissions(
        &self,
        profile: &AccessProfile,
        service_name: &str,
        resource_path: &str,
    ) -> VerbMask {
        (**self).service_permissions(profile, service_name, resource_path)
    }
}
