use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Serialize;
use tracing::{info, info_span};

use wb_config::{
    Settings, load_definitions, load_existing_paths, load_schema, load_settings, read_csv_headers,
};
use wb_map::{AutoMapOptions, AutoMapper};
use wb_model::{
    AutoMapResult, HeaderMapping, MappingPath, MappingSummary, SchemaGraph, friendly_path,
    friendly_preview,
};

/// Inputs of the `map` command, independent of how they were parsed.
#[derive(Debug, Clone, Default)]
pub struct MapRequest {
    pub schema: PathBuf,
    pub definitions: PathBuf,
    pub table: String,
    pub settings: Option<PathBuf>,
    pub scope: Option<String>,
    pub max_depth: Option<usize>,
    pub multiple: bool,
    pub existing: Option<PathBuf>,
    /// Prefix path in `a > #1 > b` form.
    pub path: Option<String>,
    pub path_offset: usize,
    pub csv: Option<PathBuf>,
    pub headers: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MappedRow {
    pub header: String,
    pub path: MappingPath,
    /// Display names from the root table down.
    pub friendly: Vec<String>,
    pub preview: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MapReport {
    pub table: String,
    pub rows: Vec<MappedRow>,
    pub unmapped_headers: Vec<String>,
    pub summary: MappingSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub name: String,
    pub friendly_name: String,
    pub fields: usize,
    pub relationships: usize,
    pub ranks: Option<usize>,
}

pub fn run_map(request: &MapRequest) -> Result<MapReport> {
    let span = info_span!("map", table = %request.table);
    let _guard = span.enter();

    let schema = load_schema(&request.schema).context("load schema")?;
    let definitions = load_definitions(&request.definitions).context("load definitions")?;
    let options = build_options(request)?;
    let headers = match &request.csv {
        Some(path) => read_csv_headers(path).context("read CSV headers")?,
        None => request.headers.clone(),
    };
    if headers.is_empty() {
        bail!("no headers to map: pass a CSV file or at least one --header");
    }

    let mapper = AutoMapper::new(&schema, &definitions);
    let result = match &request.existing {
        Some(path) => {
            let existing = load_existing_paths(path).context("load existing mappings")?;
            let is_mapped = |candidate: &MappingPath| existing.contains(candidate);
            mapper.map_with_existing(&headers, &request.table, &options, &is_mapped)
        }
        None => mapper.map(&headers, &request.table, &options),
    }
    .context("map headers")?;

    let report = build_report(&schema, &request.table, &options.path, result)?;
    info!(
        mapped = report.summary.mapped,
        unmapped = report.summary.unmapped,
        "map command finished"
    );
    Ok(report)
}

fn build_options(request: &MapRequest) -> Result<AutoMapOptions> {
    let settings = match &request.settings {
        Some(path) => load_settings(path).context("load settings")?,
        None => Settings::default(),
    };
    let mut options = settings.automapper.to_options();
    if let Some(scope) = &request.scope {
        options = options.with_scope(scope.clone());
    }
    if let Some(max_depth) = request.max_depth {
        if max_depth == 0 {
            bail!("--max-depth must be at least 1");
        }
        options = options.with_max_depth(max_depth);
    }
    if request.multiple {
        options = options.with_multiple_mappings(true);
    }
    if request.existing.is_some() {
        options = options.with_existing_mappings_check(true);
    }
    if let Some(raw) = &request.path {
        let prefix: MappingPath = raw
            .parse()
            .with_context(|| format!("parse --path {raw:?}"))?;
        options = options.with_path(prefix);
    }
    Ok(options.with_path_offset(request.path_offset))
}

/// Attaches friendly names. Paths are rendered from the root table, so any
/// caller-supplied prefix is left out of the friendly form and the summary.
fn build_report(
    schema: &SchemaGraph,
    table: &str,
    prefix: &MappingPath,
    result: AutoMapResult,
) -> Result<MapReport> {
    let root = schema.require_table(table)?;
    let relative = AutoMapResult {
        mappings: result
            .mappings
            .iter()
            .map(|mapping| HeaderMapping {
                header: mapping.header.clone(),
                paths: mapping
                    .paths
                    .iter()
                    .map(|path| path.tokens().iter().skip(prefix.len()).cloned().collect())
                    .collect(),
            })
            .collect(),
        unmapped_headers: result.unmapped_headers.clone(),
    };

    let mut rows = Vec::new();
    for ((header, path), (_, relative_path)) in result.pairs().zip(relative.pairs()) {
        let friendly = friendly_path(schema, &root.name, relative_path)
            .with_context(|| format!("render path {path}"))?;
        let preview = friendly_preview(&friendly, relative_path, root.is_tree());
        rows.push(MappedRow {
            header: header.to_string(),
            path: path.clone(),
            friendly,
            preview,
        });
    }

    Ok(MapReport {
        table: root.name.clone(),
        rows,
        unmapped_headers: result.unmapped_headers,
        summary: relative.summary(root),
    })
}

pub fn run_tables(schema_path: &Path) -> Result<Vec<TableRow>> {
    let schema = load_schema(schema_path).context("load schema")?;
    let mut rows: Vec<TableRow> = schema
        .tables()
        .iter()
        .map(|table| TableRow {
            name: table.name.clone(),
            friendly_name: table.friendly_name.clone(),
            fields: table.visible_fields().count(),
            relationships: table.visible_relationships().count(),
            ranks: table.ranks.as_ref().map(Vec::len),
        })
        .collect();
    rows.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(rows)
}
