//! Codec configuration options

use crate::syntax::{DEFAULT_ELEMENT_SEPARATOR, DEFAULT_SEGMENT_TERMINATOR, Separators};
use crate::{Error, Result};
use edi_schema::{Schema, SchemaLoader};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Configuration for building an [`X12Codec`](crate::X12Codec)
///
/// Exactly one of `spec` and `spec_file` must be set.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodecConfig {
    /// Inline document schema
    pub spec: Option<Schema>,
    /// Path to a JSON or YAML document schema
    pub spec_file: Option<PathBuf>,
    /// Segment terminator (default: '~')
    pub terminator: char,
    /// Element separator (default: '*')
    pub separator: char,
    /// Append a line break after every emitted segment
    pub new_lines: bool,
    /// Drop trailing empty elements when encoding
    pub truncate_null: bool,
    /// Emit a `debug!` event per segment
    pub debug: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            spec: None,
            spec_file: None,
            terminator: DEFAULT_SEGMENT_TERMINATOR,
            separator: DEFAULT_ELEMENT_SEPARATOR,
            new_lines: false,
            truncate_null: false,
            debug: false,
        }
    }
}

impl CodecConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an inline schema
    pub fn with_spec(mut self, spec: Schema) -> Self {
        self.spec = Some(spec);
        self
    }

    /// Load the schema from a file
    pub fn with_spec_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.spec_file = Some(path.into());
        self
    }

    /// Set the segment terminator
    pub fn terminator(mut self, terminator: char) -> Self {
        self.terminator = terminator;
        self
    }

    /// Set the element separator
    pub fn separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    pub fn new_lines(mut self, new_lines: bool) -> Self {
        self.new_lines = new_lines;
        self
    }

    pub fn truncate_null(mut self, truncate_null: bool) -> Self {
        self.truncate_null = truncate_null;
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Delimiters described by this configuration
    pub fn separators(&self) -> Separators {
        Separators::new(self.terminator, self.separator)
    }

    /// Load a configuration file (`.yaml`/`.yml` as YAML, anything else as JSON)
    ///
    /// A relative `spec_file` is resolved against the configuration file's
    /// directory.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| matches!(ext, "yaml" | "yml"));

        let mut config: Self = if is_yaml {
            serde_yaml::from_str(&content).map_err(|e| {
                Error::Configuration(format!("invalid config {}: {e}", path.display()))
            })?
        } else {
            serde_json::from_str(&content).map_err(|e| {
                Error::Configuration(format!("invalid config {}: {e}", path.display()))
            })?
        };

        if let (Some(spec_file), Some(dir)) = (&config.spec_file, path.parent()) {
            if spec_file.is_relative() {
                config.spec_file = Some(dir.join(spec_file));
            }
        }

        info!(path = %path.display(), "Loaded codec config");
        Ok(config)
    }

    /// Check delimiter and schema-source rules without loading anything
    pub fn validate(&self) -> Result<()> {
        if self.terminator == self.separator {
            return Err(Error::Configuration(format!(
                "segment terminator and element separator are both '{}'",
                self.terminator
            )));
        }
        match (&self.spec, &self.spec_file) {
            (Some(_), Some(_)) => Err(Error::Configuration(
                "both spec and spec_file given; supply exactly one".to_string(),
            )),
            (None, None) => Err(Error::Configuration(
                "no schema given; supply spec or spec_file".to_string(),
            )),
            _ => Ok(()),
        }
    }

    /// The document schema, read from `spec_file` when needed
    pub fn resolve_schema(&self) -> Result<Schema> {
        self.validate()?;
        match (&self.spec, &self.spec_file) {
            (Some(spec), _) => Ok(spec.clone()),
            (None, Some(path)) => Ok(SchemaLoader::new().load_from_file(path)?),
            (None, None) => Err(Error::Configuration("no schema given".to_string())),
        }
    }
}
