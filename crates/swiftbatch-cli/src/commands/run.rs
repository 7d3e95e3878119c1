//! The `run` command: drive a line pipeline over a text file or stdin
//! and print the resulting report.

use std::collections::BTreeSet;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use swiftbatch_engine::config::{self, RunOptions};
use swiftbatch_engine::source::IterableSource;
use swiftbatch_engine::stage::RecordCollector;
use swiftbatch_engine::PipelineBuilder;
use swiftbatch_types::{
    FilterError, MappingError, Record, RunStatus, ValidationError, ValidationFailure,
};

pub struct RunCommand {
    pub input: PathBuf,
    pub options: Option<PathBuf>,
    pub name: Option<String>,
    pub skip: Option<u64>,
    pub limit: Option<u64>,
    pub strict: bool,
    pub drop_blank: bool,
    pub max_len: Option<usize>,
    pub uppercase: bool,
    pub json: bool,
}

pub fn execute(cmd: RunCommand) -> Result<()> {
    let mut options = match &cmd.options {
        Some(path) => config::from_yaml_file(path)?,
        None => RunOptions::default(),
    };
    if let Some(name) = cmd.name {
        options.name = name;
    }
    if let Some(skip) = cmd.skip {
        options.skip = Some(skip);
    }
    if let Some(limit) = cmd.limit {
        options.limit = Some(limit);
    }
    if cmd.strict {
        options.strict_mode = true;
    }

    let source_name = if cmd.input == Path::new("-") {
        "stdin".to_string()
    } else {
        cmd.input.display().to_string()
    };
    let lines = read_lines(&cmd.input)?;
    tracing::info!(input = %source_name, lines = lines.len(), "loaded input");

    let mut builder = PipelineBuilder::<String, String>::new()
        .with_options(&options)?
        .source(IterableSource::new(lines).named(source_name));

    if cmd.drop_blank {
        builder = builder.filter(|r: &Record<String>| -> Result<bool, FilterError> {
            Ok(r.payload().is_some_and(|line| line.trim().is_empty()))
        });
    }
    if cmd.uppercase {
        builder = builder.mapper(|r: &Record<String>| -> Result<Record<String>, MappingError> {
            Ok(r.with_payload(
                r.payload().map(|line| line.to_uppercase()).unwrap_or_default(),
            ))
        });
    }
    if let Some(max_len) = cmd.max_len {
        builder = builder.validator(
            move |r: &Record<String>| -> Result<BTreeSet<ValidationError>, ValidationFailure> {
                let mut errors = BTreeSet::new();
                if r.payload().is_some_and(|line| line.len() > max_len) {
                    errors.insert(ValidationError::new(format!(
                        "line exceeds {max_len} bytes"
                    )));
                }
                Ok(errors)
            },
        );
    }

    let mut pipeline = builder.processor(RecordCollector::new()).build();
    let report = pipeline.run();

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{report}");
    }

    if report.status() == RunStatus::Aborted {
        bail!("pipeline run aborted");
    }
    Ok(())
}

fn read_lines(input: &Path) -> Result<Vec<String>> {
    let contents = if input == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        buf
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("failed to read input file {}", input.display()))?
    };
    Ok(contents.lines().map(str::to_string).collect())
}
