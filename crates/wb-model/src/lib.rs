#![deny(unsafe_code)]

pub mod definitions;
pub mod error;
pub mod friendly;
pub mod mapping;
pub mod path;
pub mod schema;

pub use definitions::{DefinitionSet, HeaderMatchers, Shortcut, Synonym, TableSynonym};
pub use error::{ModelError, Result};
pub use friendly::{friendly_path, friendly_preview};
pub use mapping::{AutoMapResult, HeaderMapping, MappingSummary};
pub use path::{LEVEL_SEPARATOR, MappingPath, PathToken, REFERENCE_SYMBOL, TREE_SYMBOL};
pub use schema::{Field, Rank, Relationship, RelationshipKind, SchemaGraph, Table};
