//! Error types for mapping operations.

use thiserror::Error;
use wb_model::ModelError;

/// Errors from compiling definitions or starting a mapping run.
///
/// A header that matches nothing is not an error; it is reported in
/// [`wb_model::AutoMapResult::unmapped_headers`].
#[derive(Debug, Error)]
pub enum MapError {
    /// A definition regex failed to compile.
    #[error("invalid regex {pattern:?} in {section} for table {table}: {source}")]
    InvalidRegex {
        section: &'static str,
        table: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },
    /// A shortcut's mapping path contains an unparseable token.
    #[error("invalid shortcut mapping path for table {table}: {source}")]
    InvalidShortcutPath {
        table: String,
        #[source]
        source: ModelError,
    },
    /// Two synonym entries name the same table field once case is ignored.
    #[error("duplicate synonym for {table}.{field} (keys differ only in case)")]
    DuplicateSynonym { table: String, field: String },
    /// The requested root table is not part of the schema.
    #[error("unknown root table {table}{}", did_you_mean(.suggestion.as_deref()))]
    UnknownRootTable {
        table: String,
        suggestion: Option<String>,
    },
    #[error(transparent)]
    Model(#[from] ModelError),
}

fn did_you_mean(suggestion: Option<&str>) -> String {
    suggestion
        .map(|name| format!(" (did you mean {name}?)"))
        .unwrap_or_default()
}
