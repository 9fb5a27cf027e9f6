//! Compiled match definitions.
//!
//! [`CompiledDefinitions::compile`] turns a raw [`DefinitionSet`] into an
//! immutable structure: keys lowercased, regexes compiled, shortcut paths
//! parsed. Malformed entries fail here, never during matching.

use std::collections::BTreeMap;

use regex::Regex;
use wb_model::{DefinitionSet, HeaderMatchers, MappingPath, PathToken};

use crate::error::MapError;
use crate::normalize::{NormalizedHeader, normalize_header};

/// The comparison that accepted a header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategy {
    Regex,
    Exact,
    Contains,
}

#[derive(Debug, Clone, Default)]
pub struct CompiledMatchers {
    regex: Vec<Regex>,
    exact: Vec<String>,
    contains: Vec<String>,
}

impl CompiledMatchers {
    fn compile(
        section: &'static str,
        table: &str,
        raw: &HeaderMatchers,
    ) -> Result<Self, MapError> {
        let regex = raw
            .regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| MapError::InvalidRegex {
                    section,
                    table: table.to_string(),
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            regex,
            exact: lowercase_values(&raw.string),
            contains: lowercase_values(&raw.contains),
        })
    }

    /// Tries regex search, then exact equality, then containment, against
    /// every form of `header`. The first strategy with any hit wins.
    pub fn find(&self, header: &NormalizedHeader) -> Option<MatchStrategy> {
        let forms = header.forms();
        if self
            .regex
            .iter()
            .any(|re| forms.iter().any(|form| re.is_match(form)))
        {
            return Some(MatchStrategy::Regex);
        }
        if self
            .exact
            .iter()
            .any(|value| forms.iter().any(|form| *form == value.as_str()))
        {
            return Some(MatchStrategy::Exact);
        }
        if self
            .contains
            .iter()
            .any(|value| forms.iter().any(|form| form.contains(value.as_str())))
        {
            return Some(MatchStrategy::Contains);
        }
        None
    }
}

fn lowercase_values(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|value| value.to_lowercase())
        .filter(|value| !value.is_empty())
        .collect()
}

#[derive(Debug, Clone)]
pub struct CompiledShortcut {
    pub scope: String,
    pub matchers: CompiledMatchers,
    pub mapping_path: Vec<PathToken>,
}

#[derive(Debug, Clone)]
pub struct CompiledSynonym {
    pub scope: String,
    pub matchers: CompiledMatchers,
}

#[derive(Debug, Clone)]
pub struct CompiledTableSynonym {
    pub scope: String,
    preceding_path: Vec<String>,
    pub synonym: NormalizedHeader,
}

/// Immutable, query-ready definitions. Safe to share between invocations.
#[derive(Debug, Clone, Default)]
pub struct CompiledDefinitions {
    shortcuts: BTreeMap<String, Vec<CompiledShortcut>>,
    synonyms: BTreeMap<String, BTreeMap<String, CompiledSynonym>>,
    table_synonyms: BTreeMap<String, Vec<CompiledTableSynonym>>,
}

impl CompiledDefinitions {
    pub fn compile(set: &DefinitionSet) -> Result<Self, MapError> {
        let mut compiled = Self::default();

        for (table, shortcuts) in &set.shortcuts {
            let entries = compiled.shortcuts.entry(table.to_lowercase()).or_default();
            for shortcut in shortcuts {
                let mapping_path = shortcut
                    .mapping_path
                    .iter()
                    .map(|raw| raw.parse::<PathToken>())
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|source| MapError::InvalidShortcutPath {
                        table: table.clone(),
                        source,
                    })?;
                entries.push(CompiledShortcut {
                    scope: shortcut.scope.clone(),
                    matchers: CompiledMatchers::compile("shortcuts", table, &shortcut.headers)?,
                    mapping_path,
                });
            }
        }

        for (table, fields) in &set.synonyms {
            let entries = compiled.synonyms.entry(table.to_lowercase()).or_default();
            for (field, synonym) in fields {
                let matchers = CompiledMatchers::compile("synonyms", table, &synonym.headers)?;
                let previous = entries.insert(
                    field.to_lowercase(),
                    CompiledSynonym {
                        scope: synonym.scope.clone(),
                        matchers,
                    },
                );
                if previous.is_some() {
                    return Err(MapError::DuplicateSynonym {
                        table: table.clone(),
                        field: field.clone(),
                    });
                }
            }
        }

        for (table, synonyms) in &set.table_synonyms {
            let entries = compiled
                .table_synonyms
                .entry(table.to_lowercase())
                .or_default();
            entries.extend(synonyms.iter().map(|synonym| CompiledTableSynonym {
                scope: synonym.scope.clone(),
                preceding_path: synonym
                    .preceding_mapping_path
                    .iter()
                    .map(|part| part.to_lowercase())
                    .collect(),
                synonym: normalize_header(&synonym.synonym),
            }));
        }

        Ok(compiled)
    }

    /// Shortcuts of `table` eligible for `scope`, in definition order.
    pub fn shortcuts<'s>(
        &'s self,
        table: &str,
        scope: &'s str,
    ) -> impl Iterator<Item = &'s CompiledShortcut> {
        self.shortcuts
            .get(&table.to_lowercase())
            .into_iter()
            .flatten()
            .filter(move |shortcut| shortcut.scope == scope)
    }

    /// Synonym entry for a field (or lowercase rank name) of `table`.
    pub fn synonym(&self, table: &str, field: &str, scope: &str) -> Option<&CompiledSynonym> {
        self.synonyms
            .get(&table.to_lowercase())?
            .get(&field.to_lowercase())
            .filter(|synonym| synonym.scope == scope)
    }

    /// Table synonyms of `table` that apply at `path`.
    ///
    /// A synonym applies when the path, reference markers removed, ends with
    /// its preceding path, or when `root` followed by that path equals it.
    pub fn table_synonyms(
        &self,
        table: &str,
        root: &str,
        path: &MappingPath,
        scope: &str,
    ) -> Vec<&NormalizedHeader> {
        let Some(candidates) = self.table_synonyms.get(&table.to_lowercase()) else {
            return Vec::new();
        };
        let filtered: Vec<String> = path
            .without_references()
            .map(|token| token.to_string().to_lowercase())
            .collect();
        let mut with_root = Vec::with_capacity(filtered.len() + 1);
        with_root.push(root.to_lowercase());
        with_root.extend(filtered.iter().cloned());

        candidates
            .iter()
            .filter(|candidate| candidate.scope == scope)
            .filter(|candidate| {
                filtered.ends_with(&candidate.preceding_path) || with_root == candidate.preceding_path
            })
            .map(|candidate| &candidate.synonym)
            .collect()
    }
}
