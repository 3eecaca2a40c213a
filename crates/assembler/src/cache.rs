//! Whole-system document cache keyed by the caller's access profile
//!
//! Entries live until an invalidation event; there is no expiry. Documents are
//! handed out as `Arc`s, so a reader holding one keeps a complete (possibly
//! stale) document even while the entry is being evicted.
//!
//! Every invalidation bumps a generation counter (one per role plus one
//! global). A build records the [`Generation`] it started from and is only
//! stored by [`ResponseCache::put_if_current`] if no invalidation covering
//! its key happened in the meantime.

use crate::events::{CacheEvent, Invalidation, CACHE_CLEARED, CACHE_REBUILT};
use apidoc_aggregator_common::{AccessProfile, RoleId};
use apidoc_aggregator_compose::ComposedDocument;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Access-profile identity a cached document was built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Unfiltered document shared by every administrator
    Administrator,
    Role(RoleId),
}

impl CacheKey {
    /// Key for a caller, `None` when the caller has no cacheable identity
    pub fn for_caller(profile: &AccessProfile, is_administrator: bool) -> Option<Self> {
        if is_administrator {
            return Some(CacheKey::Administrator);
        }
        profile.role_id.map(CacheKey::Role)
    }
}

/// One cached whole-system document
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub key: CacheKey,
    pub document: Arc<ComposedDocument>,
    pub built_at: DateTime<Utc>,
}

/// Invalidation counters observed when a build started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation {
    global: u64,
    role: u64,
}

/// Process-wide store of assembled whole-system documents
#[derive(Debug, Default)]
pub struct ResponseCache {
    entries: DashMap<CacheKey, CacheEntry>,
    global_generation: AtomicU64,
    role_generations: DashMap<RoleId, u64>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current invalidation generation for a key; read before building
    pub fn generation(&self, key: &CacheKey) -> Generation {
        let role = match key {
            CacheKey::Administrator => 0,
            CacheKey::Role(role_id) => self
                .role_generations
                .get(role_id)
                .map(|generation| *generation)
                .unwrap_or(0),
        };
        Generation {
            global: self.global_generation.load(Ordering::SeqCst),
            role,
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<Arc<ComposedDocument>> {
        self.entries
            .get(key)
            .map(|entry| Arc::clone(&entry.document))
    }

    /// Full entry, including when it was built
    pub fn entry(&self, key: &CacheKey) -> Option<CacheEntry> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// Store a freshly built document, replacing any previous one for the key
    pub fn put(&self, key: CacheKey, document: ComposedDocument) -> Arc<ComposedDocument> {
        let document = Arc::new(document);
        self.entries.insert(
            key,
            CacheEntry {
                key,
                document: Arc::clone(&document),
                built_at: Utc::now(),
            },
        );
        tracing::info!(event = CACHE_REBUILT, key = ?key, "API doc cache entry stored");
        document
    }

    /// Store a document built from `built_from`, unless the key was
    /// invalidated since; the document is returned either way
    pub fn put_if_current(
        &self,
        key: CacheKey,
        document: ComposedDocument,
        built_from: Generation,
    ) -> Arc<ComposedDocument> {
        if self.generation(&key) != built_from {
            tracing::debug!(key = ?key, "API doc invalidated during build, not caching");
            return Arc::new(document);
        }

        let stored = self.put(key, document);

        // An invalidation may have landed between the check and the insert
        if self.generation(&key) != built_from {
            self.entries
                .remove_if(&key, |_, entry| Arc::ptr_eq(&entry.document, &stored));
            tracing::debug!(key = ?key, "API doc invalidated during store, dropped");
        }
        stored
    }

    /// Drop the entry for one role; returns whether one existed
    pub fn invalidate(&self, role_id: RoleId) -> bool {
        *self.role_generations.entry(role_id).or_insert(0) += 1;
        let removed = self.entries.remove(&CacheKey::Role(role_id)).is_some();
        if removed {
            tracing::info!(event = CACHE_CLEARED, role_id, "API doc cache cleared for role");
        }
        removed
    }

    /// Drop every entry; returns how many were dropped
    pub fn invalidate_all(&self) -> usize {
        self.global_generation.fetch_add(1, Ordering::SeqCst);
        let count = self.entries.len();
        self.entries.clear();
        tracing::info!(event = CACHE_CLEARED, entries = count, "API doc cache flushed");
        count
    }

    pub fn handle_event(&self, event: &CacheEvent) {
        tracing::debug!(?event, "API doc cache invalidation event");
        match event.invalidation() {
            Invalidation::Role(role_id) => {
                self.invalidate(role_id);
            }
            Invalidation::All => {
                self.invalidate_all();
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
