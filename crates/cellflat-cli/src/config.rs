//! Export configuration loaded from TOML.
//!
//! ```toml
//! input_folder = "sessions"
//! output_file = "out/looks.csv"
//! sequential_columns = ["Look"]
//! nested_columns = ["Trial"]
//!
//! [code_map]
//! Trial = ["ordinal", "onset"]
//! Look = ["onset", "offset"]
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

use cellflat_ingest::DEFAULT_EXTENSION;
use cellflat_model::{FlattenOptions, Schema, SchemaError};
use cellflat_output::DEFAULT_DELIMITER;
use directories::BaseDirs;
use serde::Deserialize;
use thiserror::Error;

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid schema")]
    Schema(#[from] SchemaError),

    #[error("delimiter {0:?} must be a single ASCII character")]
    InvalidDelimiter(String),

    #[error("cannot expand {path}: home directory is unknown")]
    HomeUnavailable { path: PathBuf },
}

/// Everything one export run needs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "ConfigFile")]
pub struct ExportConfig {
    pub input_folder: PathBuf,
    pub output_file: PathBuf,
    /// Extension of annotation files to pick up under `input_folder`.
    pub extension: String,
    pub blank_value: String,
    pub delimiter: String,
    pub ensure_rows_per_nested_cell: bool,
    pub schema: Schema,
}

/// On-disk layout: schema tables sit at the top level beside the options.
/// Unknown keys are rejected so a misspelled role list fails loudly.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    input_folder: PathBuf,
    output_file: PathBuf,
    #[serde(default = "default_extension")]
    extension: String,
    #[serde(default)]
    blank_value: String,
    #[serde(default = "default_delimiter")]
    delimiter: String,
    #[serde(default)]
    ensure_rows_per_nested_cell: bool,
    #[serde(default)]
    code_map: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    static_columns: Vec<String>,
    #[serde(default)]
    nested_columns: Vec<String>,
    #[serde(default)]
    sequential_columns: Vec<String>,
}

impl From<ConfigFile> for ExportConfig {
    fn from(file: ConfigFile) -> Self {
        Self {
            input_folder: file.input_folder,
            output_file: file.output_file,
            extension: file.extension,
            blank_value: file.blank_value,
            delimiter: file.delimiter,
            ensure_rows_per_nested_cell: file.ensure_rows_per_nested_cell,
            schema: Schema {
                code_map: file.code_map,
                static_columns: file.static_columns,
                nested_columns: file.nested_columns,
                sequential_columns: file.sequential_columns,
            },
        }
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub input_folder: Option<PathBuf>,
    pub output_file: Option<PathBuf>,
    pub blank_value: Option<String>,
    pub delimiter: Option<String>,
    pub ensure_rows_per_nested_cell: Option<bool>,
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

fn default_delimiter() -> String {
    DEFAULT_DELIMITER.to_string()
}

impl ExportConfig {
    /// Read a config file; relative paths resolve against its directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        config.input_folder = resolve_path(base, &config.input_folder)?;
        config.output_file = resolve_path(base, &config.output_file)?;
        tracing::debug!(
            config = %path.display(),
            input = %config.input_folder.display(),
            output = %config.output_file.display(),
            "loaded export config"
        );
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Apply command-line overrides. Override paths are taken relative to
    /// the working directory.
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) -> Result<(), ConfigError> {
        if let Some(input) = overrides.input_folder {
            self.input_folder = expand_home(&input)?;
        }
        if let Some(output) = overrides.output_file {
            self.output_file = expand_home(&output)?;
        }
        if let Some(blank) = overrides.blank_value {
            self.blank_value = blank;
        }
        if let Some(delimiter) = overrides.delimiter {
            self.delimiter = delimiter;
        }
        if let Some(ensure_rows) = overrides.ensure_rows_per_nested_cell {
            self.ensure_rows_per_nested_cell = ensure_rows;
        }
        Ok(())
    }

    pub fn flatten_options(&self) -> FlattenOptions {
        FlattenOptions::new()
            .with_blank_value(self.blank_value.clone())
            .with_ensure_rows(self.ensure_rows_per_nested_cell)
    }

    /// Delimiter byte, once validated.
    pub fn delimiter_byte(&self) -> Result<u8, ConfigError> {
        cellflat_output::parse_delimiter(&self.delimiter)
            .map_err(|_| ConfigError::InvalidDelimiter(self.delimiter.clone()))
    }

    /// Check everything that can be checked before touching input files.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.schema.validate()?;
        self.delimiter_byte()?;
        Ok(())
    }
}

fn resolve_path(base: &Path, path: &Path) -> Result<PathBuf, ConfigError> {
    let expanded = expand_home(path)?;
    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        Ok(base.join(expanded))
    }
}

fn expand_home(path: &Path) -> Result<PathBuf, ConfigError> {
    let mut components = path.components();
    match components.next() {
        Some(Component::Normal(first)) if first == "~" => {
            let dirs = BaseDirs::new().ok_or_else(|| ConfigError::HomeUnavailable {
                path: path.to_path_buf(),
            })?;
            Ok(dirs.home_dir().join(components.as_path()))
        }
        _ => Ok(path.to_path_buf()),
    }
}
