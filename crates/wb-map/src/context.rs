//! Mutable state of a single auto-mapper invocation.
//!
//! A [`MappingContext`] is created by [`crate::AutoMapper::map`], threaded
//! through both traversal passes, and consumed into the result. Nothing in it
//! outlives the call.

use std::collections::{BTreeMap, BTreeSet};

use wb_model::{AutoMapResult, HeaderMapping, MappingPath, RelationshipKind, SchemaGraph, Table};

use crate::definitions::CompiledDefinitions;
use crate::normalize::{NormalizedHeader, normalize_header};
use crate::options::{AutoMapOptions, ExistingMappings};

/// A table waiting to be searched.
#[derive(Debug, Clone)]
pub(crate) struct QueueEntry<'a> {
    pub(crate) table: &'a Table,
    pub(crate) path: MappingPath,
    pub(crate) parent_table: Option<&'a Table>,
    /// Kind of the relationship that led here.
    pub(crate) parent_kind: Option<RelationshipKind>,
}

#[derive(Debug)]
pub(crate) struct HeaderSlot {
    pub(crate) header: NormalizedHeader,
    /// Cleared once the header is consumed in single-mapping mode.
    pub(crate) active: bool,
    pub(crate) paths: Vec<MappingPath>,
}

pub(crate) struct MappingContext<'a> {
    pub(crate) schema: &'a SchemaGraph,
    pub(crate) definitions: &'a CompiledDefinitions,
    pub(crate) options: &'a AutoMapOptions,
    pub(crate) root: &'a Table,
    pub(crate) existing: Option<&'a dyn ExistingMappings>,
    pub(crate) headers: Vec<HeaderSlot>,
    /// Depth -> entries of the round currently being built.
    pub(crate) queue: BTreeMap<usize, Vec<QueueEntry<'a>>>,
    /// Lowercase names of tables searched in the current pass.
    pub(crate) searched_tables: BTreeSet<String>,
}

impl<'a> MappingContext<'a> {
    pub(crate) fn new<S: AsRef<str>>(
        schema: &'a SchemaGraph,
        definitions: &'a CompiledDefinitions,
        options: &'a AutoMapOptions,
        root: &'a Table,
        existing: Option<&'a dyn ExistingMappings>,
        raw_headers: &[S],
    ) -> Self {
        let mut seen = BTreeSet::new();
        let headers = raw_headers
            .iter()
            .map(AsRef::as_ref)
            .filter(|raw| seen.insert(*raw))
            .map(|raw| HeaderSlot {
                header: normalize_header(raw),
                active: true,
                paths: Vec::new(),
            })
            .collect();
        Self {
            schema,
            definitions,
            options,
            root,
            existing: existing.filter(|_| options.check_for_existing_mappings),
            headers,
            queue: BTreeMap::new(),
            searched_tables: BTreeSet::new(),
        }
    }

    pub(crate) fn is_active(&self, header: usize) -> bool {
        self.headers[header].active
    }

    /// Indexes of headers still open for matching.
    pub(crate) fn active_headers(&self) -> Vec<usize> {
        (0..self.headers.len())
            .filter(|&index| self.is_active(index))
            .collect()
    }

    pub(crate) fn into_result(self) -> AutoMapResult {
        let multiple = self.options.allow_multiple_mappings;
        let mut result = AutoMapResult::default();
        for slot in self.headers {
            if slot.paths.is_empty() {
                result.unmapped_headers.push(slot.header.raw);
                continue;
            }
            let mut paths = slot.paths;
            if !multiple {
                paths.truncate(1);
            }
            result.mappings.push(HeaderMapping {
                header: slot.header.raw,
                paths,
            });
        }
        result
    }
}
