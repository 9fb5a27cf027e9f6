//! CLI argument definitions for `wb-automap`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use wb_cli::commands::MapRequest;

#[derive(Parser)]
#[command(
    name = "wb-automap",
    version,
    about = "Propose schema paths for spreadsheet column headers",
    long_about = "Match spreadsheet column headers to paths through a database schema.\n\n\
                  Headers are compared against field names, per-table shortcuts,\n\
                  per-field synonyms and table synonyms, searching the schema\n\
                  breadth-first from a root table."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format.
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Map headers of a CSV file (or given with --header) to schema paths.
    Map(MapArgs),

    /// List the tables of a schema.
    Tables(TablesArgs),
}

#[derive(Args)]
pub struct MapArgs {
    /// Schema document (JSON).
    #[arg(long, value_name = "FILE")]
    pub schema: PathBuf,

    /// Match definitions: shortcuts, synonyms and table synonyms (JSON).
    #[arg(long, value_name = "FILE")]
    pub definitions: PathBuf,

    /// Root table the headers belong to.
    #[arg(long, value_name = "NAME")]
    pub table: String,

    /// Engine settings (TOML, `[automapper]` section).
    #[arg(long, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Definition scope (overrides settings).
    #[arg(long)]
    pub scope: Option<String>,

    /// Longest path in tokens (overrides settings).
    #[arg(long = "max-depth", value_name = "N")]
    pub max_depth: Option<usize>,

    /// Report every path found for a header, not just the first.
    #[arg(long)]
    pub multiple: bool,

    /// Paths mapped elsewhere (JSON array of token arrays); they are avoided.
    #[arg(long, value_name = "FILE")]
    pub existing: Option<PathBuf>,

    /// Prefix path leading to the root table, e.g. "accessionagents > #1 > agent".
    #[arg(long, value_name = "TOKENS")]
    pub path: Option<String>,

    /// How many trailing prefix tokens reference bumps may change.
    #[arg(long = "path-offset", value_name = "N", default_value_t = 0)]
    pub path_offset: usize,

    /// Output format.
    #[arg(long, value_enum, default_value = "table")]
    pub output: OutputArg,

    /// Header given directly (repeatable).
    #[arg(long = "header", value_name = "HEADER", conflicts_with = "csv")]
    pub headers: Vec<String>,

    /// CSV file whose first row holds the headers.
    #[arg(value_name = "CSV_FILE", required_unless_present = "headers")]
    pub csv: Option<PathBuf>,
}

impl MapArgs {
    pub fn to_request(&self) -> MapRequest {
        MapRequest {
            schema: self.schema.clone(),
            definitions: self.definitions.clone(),
            table: self.table.clone(),
            settings: self.settings.clone(),
            scope: self.scope.clone(),
            max_depth: self.max_depth,
            multiple: self.multiple,
            existing: self.existing.clone(),
            path: self.path.clone(),
            path_offset: self.path_offset,
            csv: self.csv.clone(),
            headers: self.headers.clone(),
        }
    }
}

#[derive(Args)]
pub struct TablesArgs {
    /// Schema document (JSON).
    #[arg(long, value_name = "FILE")]
    pub schema: PathBuf,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputArg {
    Table,
    Json,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
