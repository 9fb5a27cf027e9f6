//! Raw match-definition documents, as loaded from configuration.
//!
//! These are plain data. The auto-mapper compiles them (regexes, lowercased
//! keys) into an immutable form before matching.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Ways a header may match: regex search, exact equality, or substring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderMatchers {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub regex: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub string: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contains: Vec<String>,
}

/// Maps matching headers straight to a path below the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortcut {
    pub scope: String,
    pub headers: HeaderMatchers,
    pub mapping_path: Vec<String>,
}

/// Alternate header spellings for one field (or tree rank) of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Synonym {
    pub scope: String,
    pub headers: HeaderMatchers,
}

/// An alternate table name, valid only after `preceding_mapping_path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSynonym {
    pub scope: String,
    #[serde(default)]
    pub preceding_mapping_path: Vec<String>,
    pub synonym: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionSet {
    /// Table name -> shortcuts.
    #[serde(default)]
    pub shortcuts: BTreeMap<String, Vec<Shortcut>>,
    /// Table name -> field (or lowercase rank) name -> synonym.
    #[serde(default)]
    pub synonyms: BTreeMap<String, BTreeMap<String, Synonym>>,
    /// Table name -> table synonyms.
    #[serde(default)]
    pub table_synonyms: BTreeMap<String, Vec<TableSynonym>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_sections_default_to_empty() {
        let set: DefinitionSet = serde_json::from_str(r#"{"synonyms": {}}"#).unwrap();
        assert!(set.shortcuts.is_empty());
        assert!(set.table_synonyms.is_empty());
    }

    #[test]
    fn matchers_accept_partial_documents() {
        let matchers: HeaderMatchers =
            serde_json::from_str(r#"{"contains": ["cat num"]}"#).unwrap();
        assert!(matchers.regex.is_empty());
        assert_eq!(matchers.contains, vec!["cat num".to_string()]);
    }
}
