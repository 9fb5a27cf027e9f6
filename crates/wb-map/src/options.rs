use serde::{Deserialize, Serialize};
use wb_model::MappingPath;

/// Scope tag selecting definitions meant for automatic mapping.
pub const DEFAULT_SCOPE: &str = "automapper";
/// Longest path (in tokens) the traversal will produce.
pub const DEFAULT_MAX_DEPTH: usize = 8;

/// Per-invocation settings for [`crate::AutoMapper::map`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoMapOptions {
    /// Which definition entries are eligible.
    pub scope: String,
    /// Existing path prefix; the root table is reached through it.
    pub path: MappingPath,
    /// How many trailing prefix tokens reference bumps may still touch.
    pub path_offset: usize,
    /// Keep every match per header instead of only the first.
    pub allow_multiple_mappings: bool,
    /// Consult the caller's [`ExistingMappings`] when resolving conflicts.
    pub check_for_existing_mappings: bool,
    pub max_depth: usize,
}

impl Default for AutoMapOptions {
    fn default() -> Self {
        Self {
            scope: DEFAULT_SCOPE.to_string(),
            path: MappingPath::new(),
            path_offset: 0,
            allow_multiple_mappings: false,
            check_for_existing_mappings: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl AutoMapOptions {
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    #[must_use]
    pub fn with_path(mut self, path: MappingPath) -> Self {
        self.path = path;
        self
    }

    #[must_use]
    pub fn with_path_offset(mut self, path_offset: usize) -> Self {
        self.path_offset = path_offset;
        self
    }

    #[must_use]
    pub fn with_multiple_mappings(mut self, allow: bool) -> Self {
        self.allow_multiple_mappings = allow;
        self
    }

    #[must_use]
    pub fn with_existing_mappings_check(mut self, enable: bool) -> Self {
        self.check_for_existing_mappings = enable;
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// First path position a reference bump may modify.
    pub(crate) fn reference_floor(&self) -> usize {
        self.path.len().saturating_sub(self.path_offset)
    }
}

/// Paths already mapped outside the current invocation (e.g. by the user).
pub trait ExistingMappings {
    fn is_mapped(&self, path: &MappingPath) -> bool;
}

impl<F> ExistingMappings for F
where
    F: Fn(&MappingPath) -> bool,
{
    fn is_mapped(&self, path: &MappingPath) -> bool {
        self(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = AutoMapOptions::default();
        assert_eq!(options.scope, "automapper");
        assert_eq!(options.max_depth, 8);
        assert!(!options.allow_multiple_mappings);
        assert_eq!(options.reference_floor(), 0);
    }

    #[test]
    fn reference_floor_follows_offset() {
        let prefix: MappingPath = "collectionobjects > #1 > determinations".parse().unwrap();
        let options = AutoMapOptions::default().with_path(prefix);
        assert_eq!(options.reference_floor(), 3);
        assert_eq!(options.clone().with_path_offset(2).reference_floor(), 1);
        assert_eq!(options.with_path_offset(10).reference_floor(), 0);
    }

    #[test]
    fn closures_are_existing_mappings() {
        let taken: MappingPath = "remarks".parse().unwrap();
        let existing = |path: &MappingPath| *path == taken;
        assert!(existing.is_mapped(&"remarks".parse().unwrap()));
        assert!(!existing.is_mapped(&"text1".parse().unwrap()));
    }
}
