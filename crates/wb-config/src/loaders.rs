//! File loaders. Everything is validated on load so that the engine never
//! sees a dangling relationship or an uncompilable regex.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use csv::ReaderBuilder;
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use wb_map::CompiledDefinitions;
use wb_model::{DefinitionSet, MappingPath, SchemaGraph};

use crate::error::{ConfigError, Result};

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::io(path, source))?;
    serde_json::from_str(&text).map_err(|source| ConfigError::json(path, source))
}

/// Loads a schema document (`{"tables": [...]}`).
pub fn load_schema(path: &Path) -> Result<SchemaGraph> {
    let schema: SchemaGraph = read_json(path)?;
    info!(path = %path.display(), tables = schema.len(), "loaded schema");
    Ok(schema)
}

/// Loads raw definitions without compiling them.
pub fn load_definition_set(path: &Path) -> Result<DefinitionSet> {
    read_json(path)
}

/// Loads and compiles definitions. A bad regex or shortcut path fails here.
pub fn load_definitions(path: &Path) -> Result<CompiledDefinitions> {
    let set = load_definition_set(path)?;
    let compiled =
        CompiledDefinitions::compile(&set).map_err(|source| ConfigError::Definitions {
            path: path.to_path_buf(),
            source,
        })?;
    info!(
        path = %path.display(),
        shortcut_tables = set.shortcuts.len(),
        synonym_tables = set.synonyms.len(),
        table_synonym_tables = set.table_synonyms.len(),
        "loaded definitions"
    );
    Ok(compiled)
}

/// Loads paths that are already mapped elsewhere: a JSON array of paths,
/// each an array of tokens.
pub fn load_existing_paths(path: &Path) -> Result<BTreeSet<MappingPath>> {
    let paths: Vec<MappingPath> = read_json(path)?;
    debug!(path = %path.display(), count = paths.len(), "loaded existing mappings");
    Ok(paths.into_iter().collect())
}

/// Reads the header row of a CSV file.
pub fn read_csv_headers(path: &Path) -> Result<Vec<String>> {
    let csv_error = |source| ConfigError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(csv_error)?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(|header| header.trim_matches('\u{feff}').trim().to_string())
        .collect();
    if headers.iter().all(String::is_empty) {
        return Err(ConfigError::MissingHeaderRow {
            path: path.to_path_buf(),
        });
    }
    debug!(path = %path.display(), count = headers.len(), "read CSV headers");
    Ok(headers)
}
