//! Cache invalidation events and cache lifecycle event names

use apidoc_aggregator_common::RoleId;

/// Logged (as the `event` field) immediately after cache entries are dropped
pub const CACHE_CLEARED: &str = "apidoc.cache_cleared";

/// Logged (as the `event` field) immediately after a whole-system document is stored
pub const CACHE_REBUILT: &str = "apidoc.cache_rebuilt";

/// Mutations reported by the authorization subsystem and the service registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEvent {
    RoleModified(RoleId),
    RoleDeleted(RoleId),
    ServiceCreated(String),
    ServiceModified(String),
    ServiceDeleted(String),
}

/// What an event requires of the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invalidation {
    Role(RoleId),
    All,
}

impl CacheEvent {
    /// Role changes affect that role only; any service change may affect every role
    pub fn invalidation(&self) -> Invalidation {
        match self {
            CacheEvent::RoleModified(id) | CacheEvent::RoleDeleted(id) => Invalidation::Role(*id),
            CacheEvent::ServiceCreated(_)
            | CacheEvent::ServiceModified(_)
            | CacheEvent::ServiceDeleted(_) => Invalidation::All,
        }
    }
}
