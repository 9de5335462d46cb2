//! CLI argument definitions for the annotation exporter.

use std::path::PathBuf;

use cellflat_cli::config::ConfigOverrides;
use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "cellflat",
    version,
    about = "Flatten nested interval annotations into one delimited table",
    long_about = "Flatten hierarchical time-interval annotations into one delimited table.\n\n\
                  Nested columns are joined by temporal containment, outermost to innermost;\n\
                  every sequential cell inside an innermost nested cell becomes one row."
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

    /// Log output format (pretty for human, json for machine parsing).
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
    /// Flatten every annotation file under the input folder into one table.
    Export(ExportArgs),

    /// Print the header line an export would write.
    Header(ExportArgs),

    /// List the columns, codes and cell counts of one annotation file.
    Inspect(InspectArgs),
}

#[derive(Parser)]
pub struct ExportArgs {
    /// Export configuration (TOML).
    #[arg(long = "config", short = 'c', value_name = "FILE")]
    pub config: PathBuf,

    /// Input folder (overrides `input_folder`).
    #[arg(long = "input", value_name = "DIR")]
    pub input: Option<PathBuf>,

    /// Output file (overrides `output_file`).
    #[arg(long = "output", short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Placeholder for missing sequential values (overrides `blank_value`).
    #[arg(long = "blank", value_name = "TEXT")]
    pub blank: Option<String>,

    /// Field separator (overrides `delimiter`).
    #[arg(long = "delimiter", short = 'd', value_name = "CHAR")]
    pub delimiter: Option<String>,

    /// Emit a blank-padded row for nested cells without sequential children.
    #[arg(long = "ensure-rows", conflicts_with = "no_ensure_rows")]
    pub ensure_rows: bool,

    /// Skip nested cells without sequential children (overrides the config file).
    #[arg(long = "no-ensure-rows")]
    pub no_ensure_rows: bool,
}

impl ExportArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            input_folder: self.input.clone(),
            output_file: self.output.clone(),
            blank_value: self.blank.clone(),
            delimiter: self.delimiter.clone(),
            ensure_rows_per_nested_cell: self.ensure_rows_override(),
        }
    }

    fn ensure_rows_override(&self) -> Option<bool> {
        match (self.ensure_rows, self.no_ensure_rows) {
            (true, _) => Some(true),
            (false, true) => Some(false),
            (false, false) => None,
        }
    }
}

#[derive(Parser)]
pub struct InspectArgs {
    /// Annotation database file (.opf archive or bare database text).
    #[arg(value_name = "DB_FILE")]
    pub file: PathBuf,
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
