#![deny(unsafe_code)]

//! Loading schema, definitions, settings and spreadsheet headers from disk.

pub mod error;
pub mod loaders;
pub mod settings;

pub use error::{ConfigError, Result};
pub use loaders::{
    load_definition_set, load_definitions, load_existing_paths, load_schema, read_csv_headers,
};
pub use settings::{AutoMapperSettings, Settings, load_settings};
