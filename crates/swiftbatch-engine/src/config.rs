//! Run options: the serialized configuration surface of a pipeline.
//!
//! Parsing and semantic validation are separate steps: `from_yaml_str`
//! only deserializes; [`validate`] collects every problem into one
//! error.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Options controlling a single run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct RunOptions {
    /// Pipeline name, used in the report and in logs.
    pub name: String,
    /// Number of leading records to skip; absent disables skipping.
    pub skip: Option<u64>,
    /// Cap on records read from the source; absent disables the limit.
    pub limit: Option<u64>,
    /// Abort the run on the first processing failure.
    pub strict_mode: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            name: "pipeline".to_string(),
            skip: None,
            limit: None,
            strict_mode: false,
        }
    }
}

/// Parse run options from a YAML document. Does not validate; call
/// [`validate`] on the result.
pub fn from_yaml_str(yaml: &str) -> Result<RunOptions> {
    serde_yaml::from_str(yaml).context("failed to parse run options YAML")
}

/// Parse run options from a YAML file.
pub fn from_yaml_file(path: &Path) -> Result<RunOptions> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read run options file {}", path.display()))?;
    from_yaml_str(&contents)
}

/// Validate parsed run options. Returns `Ok(())` if valid, or an error
/// listing every problem found.
pub fn validate(options: &RunOptions) -> Result<()> {
    let mut errors = Vec::new();

    if options.name.trim().is_empty() {
        errors.push("pipeline name must not be empty".to_string());
    }
    if options.skip == Some(0) {
        errors.push("skip must be >= 1 when set".to_string());
    }
    if options.limit == Some(0) {
        errors.push("limit must be >= 1 when set".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        bail!("run options validation failed:\n  - {}", errors.join("\n  - "));
    }
}
