//! Auto-mapper entry point.

use rapidfuzz::distance::jaro_winkler::similarity as jaro_similarity;
use tracing::{debug, info, info_span};
use wb_model::{AutoMapResult, SchemaGraph};

use crate::context::MappingContext;
use crate::definitions::CompiledDefinitions;
use crate::error::MapError;
use crate::options::{AutoMapOptions, ExistingMappings};
use crate::traversal::Pass;

/// Minimum similarity for suggesting a table name after a typo.
const SUGGESTION_MIN_SIMILARITY: f64 = 0.8;

/// Proposes schema paths for spreadsheet headers.
///
/// The mapper only borrows the schema and the compiled definitions. Every
/// call to [`AutoMapper::map`] builds its own working state, so one mapper can
/// serve any number of callers.
///
/// ```
/// use wb_map::{AutoMapOptions, AutoMapper, CompiledDefinitions};
/// use wb_model::{Field, SchemaGraph, Table};
///
/// let schema = SchemaGraph::new(vec![
///     Table::new("accession", "Accession")
///         .with_field(Field::new("accessionnumber", "Accession Number")),
/// ])?;
/// let definitions = CompiledDefinitions::default();
/// let mapper = AutoMapper::new(&schema, &definitions);
///
/// let result = mapper.map(&["Accession Number"], "accession", &AutoMapOptions::default())?;
/// assert_eq!(
///     result.path_for("Accession Number").map(ToString::to_string),
///     Some("accessionnumber".to_string())
/// );
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AutoMapper<'a> {
    schema: &'a SchemaGraph,
    definitions: &'a CompiledDefinitions,
}

impl<'a> AutoMapper<'a> {
    pub fn new(schema: &'a SchemaGraph, definitions: &'a CompiledDefinitions) -> Self {
        Self {
            schema,
            definitions,
        }
    }

    /// Maps `headers` starting at `root_table`.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::UnknownRootTable`] if the schema has no such table.
    pub fn map<S: AsRef<str>>(
        &self,
        headers: &[S],
        root_table: &str,
        options: &AutoMapOptions,
    ) -> Result<AutoMapResult, MapError> {
        self.run(headers, root_table, options, None)
    }

    /// Like [`AutoMapper::map`], but paths reported by `existing` count as
    /// taken when `options.check_for_existing_mappings` is set.
    pub fn map_with_existing<S: AsRef<str>>(
        &self,
        headers: &[S],
        root_table: &str,
        options: &AutoMapOptions,
        existing: &dyn ExistingMappings,
    ) -> Result<AutoMapResult, MapError> {
        self.run(headers, root_table, options, Some(existing))
    }

    fn run<S: AsRef<str>>(
        &self,
        headers: &[S],
        root_table: &str,
        options: &AutoMapOptions,
        existing: Option<&dyn ExistingMappings>,
    ) -> Result<AutoMapResult, MapError> {
        let root = self
            .schema
            .table(root_table)
            .ok_or_else(|| MapError::UnknownRootTable {
                table: root_table.to_string(),
                suggestion: self.closest_table_name(root_table),
            })?;
        if headers.is_empty() {
            return Ok(AutoMapResult::default());
        }

        let span = info_span!("automap", table = %root.name, headers = headers.len());
        let result = span.in_scope(|| {
            let mut context =
                MappingContext::new(self.schema, self.definitions, options, root, existing, headers);
            context.run_pass(Pass::ShortcutsAndTableSynonyms);
            context.run_pass(Pass::SynonymsAndMatches);
            context.into_result()
        });
        info!(
            table = %root.name,
            mapped = result.mappings.len(),
            unmapped = result.unmapped_headers.len(),
            "auto-mapping complete"
        );
        Ok(result)
    }

    fn closest_table_name(&self, name: &str) -> Option<String> {
        let wanted = name.to_lowercase();
        let best = self
            .schema
            .table_names()
            .map(|candidate| {
                let score = jaro_similarity(wanted.chars(), candidate.to_lowercase().chars());
                (candidate, score)
            })
            .filter(|(_, score)| *score >= SUGGESTION_MIN_SIMILARITY)
            .max_by(|a, b| a.1.total_cmp(&b.1));
        debug!(table = name, suggestion = ?best, "unknown root table");
        best.map(|(candidate, _)| candidate.to_string())
    }
}
