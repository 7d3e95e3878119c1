//! The `check` command: parse and validate a run options file without
//! running anything.

use std::path::Path;

use anyhow::Result;

use swiftbatch_engine::config;

pub fn execute(options_path: &Path) -> Result<()> {
    let options = config::from_yaml_file(options_path)?;
    config::validate(&options)?;
    println!(
        "run options OK: pipeline '{}' (skip: {}, limit: {}, strict: {})",
        options.name,
        options
            .skip
            .map(|n| n.to_string())
            .unwrap_or_else(|| "off".to_string()),
        options
            .limit
            .map(|n| n.to_string())
            .unwrap_or_else(|| "off".to_string()),
        options.strict_mode,
    );
    Ok(())
}
