use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("invalid path token: {0:?}")]
    InvalidPathToken(String),
    #[error("unknown table: {0}")]
    UnknownTable(String),
    #[error("duplicate table: {0}")]
    DuplicateTable(String),
    #[error("relationship {table}.{relationship} targets unknown table {target}")]
    UnknownRelationshipTarget {
        table: String,
        relationship: String,
        target: String,
    },
    #[error("{element:?} is neither a field nor a relationship of table {table}")]
    UnknownPathElement { table: String, element: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
