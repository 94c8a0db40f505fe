use std::fs;

use anyhow::{Context, Result};
use permset_builder::config::{load_config, BuildConfig};
use permset_builder::generate::{generate, GenerateOptions, OutputArtifact};
use permset_builder::naming::NameMapping;
use permset_builder::report::{render_artifacts, render_failures, render_run_summary};
use permset_builder::source::{load_profiles, DirectorySource, LoadFailure};
use permset_builder::stats::{summarize_run, RunSummary};
use serde::Serialize;
use tracing::info;

use crate::cli::{GenerateArgs, OutputFormat};
use crate::path_guard::prepare_output_dir;

#[derive(Serialize)]
struct GenerateReport<'a> {
    mode: String,
    dry_run: bool,
    artifacts: &'a [OutputArtifact],
    failures: &'a [LoadFailure],
    summary: RunSummary,
}

pub fn run_generate(args: GenerateArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => BuildConfig::default(),
    };
    let mapping = args
        .name_mapping
        .as_deref()
        .map(NameMapping::load)
        .transpose()?;

    let batch = load_profiles(&DirectorySource::new(&args.input))
        .with_context(|| format!("failed to load profiles from {}", args.input.display()))?;

    let artifacts = generate(
        &batch.profiles,
        args.mode,
        mapping.as_ref(),
        &config,
        GenerateOptions {
            allow_collisions: args.allow_overwrite,
        },
    )?;

    if !args.dry_run {
        prepare_output_dir(&args.output)?;
        for artifact in &artifacts {
            let path = args.output.join(&artifact.filename);
            fs::write(&path, &artifact.content)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "wrote permission set");
        }
    }

    let summary = summarize_run(&batch.profiles, &artifacts);
    match args.format {
        OutputFormat::Text => {
            if !batch.failures.is_empty() {
                println!("{}", render_failures(&batch.failures));
            }
            if !artifacts.is_empty() {
                println!("{}", render_artifacts(&artifacts, args.dry_run));
            }
            println!("{}", render_run_summary(&summary));
        }
        OutputFormat::Json => {
            let report = GenerateReport {
                mode: args.mode.to_string(),
                dry_run: args.dry_run,
                artifacts: &artifacts,
                failures: &batch.failures,
                summary,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
