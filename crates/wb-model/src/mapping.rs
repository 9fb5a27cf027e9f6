use serde::{Deserialize, Serialize};

use crate::path::{MappingPath, PathToken};
use crate::schema::Table;

/// The paths proposed for one header, best first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderMapping {
    pub header: String,
    pub paths: Vec<MappingPath>,
}

impl HeaderMapping {
    /// The preferred (shallowest, earliest found) path.
    pub fn path(&self) -> Option<&MappingPath> {
        self.paths.first()
    }
}

/// Output of one auto-mapper invocation.
///
/// `mappings` follows input header order; headers with no match are listed
/// in `unmapped_headers` instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoMapResult {
    pub mappings: Vec<HeaderMapping>,
    pub unmapped_headers: Vec<String>,
}

impl AutoMapResult {
    pub fn get(&self, header: &str) -> Option<&HeaderMapping> {
        self.mappings.iter().find(|m| m.header == header)
    }

    pub fn path_for(&self, header: &str) -> Option<&MappingPath> {
        self.get(header).and_then(HeaderMapping::path)
    }

    pub fn paths_for(&self, header: &str) -> &[MappingPath] {
        self.get(header).map(|m| m.paths.as_slice()).unwrap_or_default()
    }

    pub fn is_mapped(&self, header: &str) -> bool {
        self.get(header).is_some()
    }

    /// Header/path pairs, one per path.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &MappingPath)> {
        self.mappings
            .iter()
            .flat_map(|m| m.paths.iter().map(move |p| (m.header.as_str(), p)))
    }

    /// Counts headers and required root-level fields (or ranks) covered.
    pub fn summary(&self, root: &Table) -> MappingSummary {
        let first_tokens: Vec<&PathToken> = self
            .pairs()
            .filter_map(|(_, path)| path.tokens().first())
            .collect();
        let covers = |token: &PathToken| first_tokens.iter().any(|t| *t == token);

        let required_fields = root
            .visible_fields()
            .filter(|f| f.is_required)
            .map(|f| PathToken::name(f.name.clone()));
        let required_ranks = root
            .ranks()
            .iter()
            .filter(|r| r.is_required)
            .map(|r| PathToken::rank(r.name.clone()));
        let required: Vec<PathToken> = if root.is_tree() {
            required_ranks.collect()
        } else {
            required_fields.collect()
        };

        MappingSummary {
            total_headers: self.mappings.len() + self.unmapped_headers.len(),
            mapped: self.mappings.len(),
            unmapped: self.unmapped_headers.len(),
            required_total: required.len(),
            required_mapped: required.iter().filter(|t| covers(t)).count(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingSummary {
    pub total_headers: usize,
    pub mapped: usize,
    pub unmapped: usize,
    /// Required fields of the root table (ranks, for a tree root).
    pub required_total: usize,
    pub required_mapped: usize,
}
