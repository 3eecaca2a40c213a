//! Folds filtered fragments into a composed document
//!
//! Merging is first-writer-wins at every level: a (path, verb) pair or a
//! (component kind, name) pair already present in the accumulator is never
//! replaced by a later service. Which service "owns" a shared name therefore
//! depends on merge order, and the dropped contributions are reported back so
//! callers can log them.

use crate::openapi::{ComposedDocument, PathItem};
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Counts of what one merge contributed and what it lost to earlier writers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    pub entries_added: usize,
    pub entries_shadowed: usize,
    pub components_added: usize,
    pub components_shadowed: usize,
}

impl MergeOutcome {
    pub fn contributed(&self) -> bool {
        self.entries_added > 0 || self.components_added > 0
    }
}

/// Merges service contributions into an accumulating document
pub struct FragmentMerger;

impl FragmentMerger {
    /// Merge one service's filtered paths and component maps into `base`
    pub fn merge_fragment<'k, 'a, I>(
        base: &mut ComposedDocument,
        service_name: &str,
        filtered_paths: IndexMap<String, PathItem>,
        components: I,
    ) -> MergeOutcome
    where
        I: IntoIterator<Item = (&'k str, &'a Map<String, Value>)>,
    {
        let mut outcome = MergeOutcome::default();

        Self::merge_paths(base, filtered_paths, &mut outcome);
        for (kind, entries) in components {
            Self::merge_components(base, kind, entries, &mut outcome);
        }

        if outcome.entries_shadowed > 0 || outcome.components_shadowed > 0 {
            tracing::debug!(
                service = service_name,
                entries_shadowed = outcome.entries_shadowed,
                components_shadowed = outcome.components_shadowed,
                "Earlier services already define some of this service's entries"
            );
        }

        outcome
    }

    fn merge_paths(
        base: &mut ComposedDocument,
        filtered_paths: IndexMap<String, PathItem>,
        outcome: &mut MergeOutcome,
    ) {
        for (path, item) in filtered_paths {
            if item.is_empty() {
                continue;
            }
            let target = base.paths.entry(path).or_default();
            for (key, entry) in item {
                if target.contains_key(&key) {
                    outcome.entries_shadowed += 1;
                } else {
                    target.insert(key, entry);
                    outcome.entries_added += 1;
                }
            }
        }
    }

    fn merge_components(
        base: &mut ComposedDocument,
        kind: &str,
        entries: &Map<String, Value>,
        outcome: &mut MergeOutcome,
    ) {
        if entries.is_empty() {
            return;
        }
        let target = base.components.entry(kind.to_string()).or_default();
        for (name, definition) in entries {
            if target.contains_key(name) {
                outcome.components_shadowed += 1;
            } else {
                target.insert(name.clone(), definition.clone());
                outcome.components_added += 1;
            }
        }
    }
}
