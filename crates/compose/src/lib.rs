//! Fragment composition for the API doc aggregator
//!
//! This crate turns one service's OpenAPI fragment into its contribution to a
//! composed document:
//!
//! - [`PathNormalizer`] derives permission-lookup resource paths and decides
//!   whether a fragment's keys need the `/{service}` prefix
//! - [`OperationFilter`] drops the verbs a caller may not use and rewrites the
//!   survivors (tags, fallback error response)
//! - [`FragmentMerger`] folds the result into the accumulating document,
//!   first-writer-wins on every (path, verb) and (kind, name) pair

pub mod openapi;

mod merger;
mod operation_filter;
mod path_normalizer;

pub use merger::{FragmentMerger, MergeOutcome};
pub use openapi::{
    ComponentMap, ComposedDocument, Fragment, FragmentParser, Info, Operation, PathEntry,
    PathItem, Server, Tag,
};
pub use operation_filter::{DocumentScope, OperationFilter, DEFAULT_ERROR_RESPONSE_REF};
pub use path_normalizer::PathNormalizer;
