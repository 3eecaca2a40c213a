//! OpenAPI 3.0 document model and fragment loading
//!
//! Services contribute fragments: partial OpenAPI documents with their own
//! `paths` and `components`. Swagger 2.0 style `definitions` and top-level
//! `parameters` are accepted alongside.
//!
//! ## Usage
//! ```rust,ignore
//! use apidoc_aggregator_compose::openapi::FragmentParser;
//!
//! let fragment = FragmentParser::from_file("fragments/db.json", "db")?.into_fragment();
//! for (path, item) in &fragment.paths {
//!     println!("{} ({} entries)", path, item.len());
//! }
//! ```

mod parser;
mod types;

pub use parser::{FragmentFormat, FragmentParser};
pub use types::*;
