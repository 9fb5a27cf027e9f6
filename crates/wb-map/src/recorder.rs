//! Validation and commit of proposed header paths.

use tracing::debug;
use wb_model::{MappingPath, PathToken};

use crate::context::MappingContext;

/// Highest reference index conflict resolution will try.
const REFERENCE_CEILING: u32 = 1024;

impl MappingContext<'_> {
    /// Proposes `prefix + suffix` for the header at `header`.
    ///
    /// `reference` overrides the rightmost `#N` marker when the header itself
    /// carried an index (`Accession Agent Remarks 2`). Returns true only when
    /// the header was consumed, which never happens in multi-mapping mode.
    pub(crate) fn record(
        &mut self,
        prefix: &MappingPath,
        suffix: &[PathToken],
        header: usize,
        reference: Option<u32>,
    ) -> bool {
        let mut path = prefix.joined(suffix);
        if path.len() > self.options.max_depth {
            return false;
        }
        if let Some(index) = reference {
            path.set_last_reference(index);
        }

        let floor = self.options.reference_floor();
        while self.is_taken(&path) {
            if !path.bump_reference(floor, REFERENCE_CEILING) {
                debug!(
                    header = %self.headers[header].header.raw,
                    path = %path,
                    "path taken, no reference left to bump"
                );
                return false;
            }
        }

        if path.has_nested_to_many() {
            return false;
        }

        let multiple = self.options.allow_multiple_mappings;
        let slot = &mut self.headers[header];
        if slot.paths.contains(&path) {
            return false;
        }
        debug!(header = %slot.header.raw, path = %path, "mapped header");
        slot.paths.push(path);
        if multiple {
            return false;
        }
        slot.active = false;
        true
    }

    fn is_taken(&self, path: &MappingPath) -> bool {
        let owned = !self.options.allow_multiple_mappings
            && self
                .headers
                .iter()
                .any(|slot| slot.paths.contains(path));
        owned || self.existing.is_some_and(|existing| existing.is_mapped(path))
    }
}
