#![deny(unsafe_code)]

//! Automatic mapping of spreadsheet headers to schema paths.
//!
//! [`AutoMapper`] walks the schema breadth-first from a root table in two
//! passes. The first applies per-table shortcuts and table synonyms; the
//! second applies per-field synonyms and direct name matches. Candidate paths
//! go through a recorder that resolves to-many index conflicts and rejects
//! to-many elements nested directly inside each other.

mod context;
mod definitions;
mod engine;
mod error;
mod matcher;
mod normalize;
mod options;
mod recorder;
mod traversal;

pub use definitions::{
    CompiledDefinitions, CompiledMatchers, CompiledShortcut, CompiledSynonym,
    CompiledTableSynonym, MatchStrategy,
};
pub use engine::AutoMapper;
pub use error::MapError;
pub use normalize::{NormalizedHeader, normalize_header};
pub use options::{AutoMapOptions, DEFAULT_MAX_DEPTH, DEFAULT_SCOPE, ExistingMappings};
