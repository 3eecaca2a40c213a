//! Per-operation permission filtering
//!
//! Decides, for every entry of a path item, whether the caller may see it, and
//! rewrites the entries that survive: tags point at the owning service and
//! every exposed operation documents a fallback error response.

use crate::openapi::{Operation, PathEntry, PathItem};
use apidoc_aggregator_common::{classify, VerbClass, VerbMask};
use serde_json::json;

/// Shared error response every exposed operation falls back to
pub const DEFAULT_ERROR_RESPONSE_REF: &str = "#/components/responses/Error";

/// Which kind of document is being assembled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentScope {
    /// Every visible service in one document
    WholeSystem,
    /// One named service
    SingleService,
}

/// Filters the entries of one resource's path item for one caller
#[derive(Debug, Clone)]
pub struct OperationFilter<'a> {
    service_name: &'a str,
    caller_mask: VerbMask,
    is_administrator: bool,
    scope: DocumentScope,
}

impl<'a> OperationFilter<'a> {
    pub fn new(
        service_name: &'a str,
        caller_mask: VerbMask,
        is_administrator: bool,
        scope: DocumentScope,
    ) -> Self {
        Self {
            service_name,
            caller_mask,
            is_administrator,
            scope,
        }
    }

    /// Filter one (verb token, entry) pair
    ///
    /// Returns `None` when the caller may not see the entry. Keys that are not
    /// verbs are always kept and never rewritten.
    pub fn apply(&self, verb_token: &str, entry: PathEntry) -> Option<PathEntry> {
        match classify(verb_token) {
            VerbClass::PassThrough => Some(entry),
            VerbClass::Recognized(verb) => {
                if !self.allows(verb) {
                    return None;
                }
                Some(match entry {
                    PathEntry::Operation(op) => PathEntry::Operation(self.rewrite(op)),
                    other => other,
                })
            }
        }
    }

    /// Filter every entry of a path item, preserving entry order
    pub fn filter_path_item(&self, item: PathItem) -> PathItem {
        item.into_iter()
            .filter_map(|(key, entry)| self.apply(&key, entry).map(|entry| (key, entry)))
            .collect()
    }

    fn allows(&self, verb: VerbMask) -> bool {
        self.is_administrator || verb.intersects(self.caller_mask)
    }

    fn rewrite(&self, mut op: Operation) -> Operation {
        if let Some(responses) = op.responses.as_mut() {
            if !responses.contains_key("default") {
                responses.insert(
                    "default".to_string(),
                    json!({ "$ref": DEFAULT_ERROR_RESPONSE_REF }),
                );
            }
        }

        op.tags = Some(match self.scope {
            DocumentScope::WholeSystem => vec![self.service_name.to_string()],
            DocumentScope::SingleService => {
                let mut tags = op.tags.take().unwrap_or_default();
                if !tags.iter().any(|t| t == self.service_name) {
                    tags.push(self.service_name.to_string());
                }
                tags
            }
        });

        op
    }
}
