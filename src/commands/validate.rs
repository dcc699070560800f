use crate::batch::{assemble_inputs, validate_event, BatchOutcome, CancellationToken};
use crate::catalog::FieldCatalog;
use crate::config::{self, apply_preset, ParallelConfig, ScoutcheckConfig, ThresholdPreset};
use crate::data::{ScoutedTeamEntry, TbaMatch};
use crate::io::{self, create_writer, OutputFormat, ValidationReport};
use crate::progress::{CliProgressSink, ProgressConfig};
use crate::validation::{MatchInput, MatchValidator};
use anyhow::{Context, Result};
use chrono::Utc;
use std::path::PathBuf;

pub struct ValidateConfig {
    pub matches: PathBuf,
    pub scouting: PathBuf,
    pub catalog: PathBuf,
    pub event: Option<String>,
    pub config: Option<PathBuf>,
    pub preset: Option<ThresholdPreset>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub jobs: Option<usize>,
    pub no_parallel: bool,
    pub quiet: bool,
}

pub fn validate_event_files(config: ValidateConfig) -> Result<()> {
    let settings = resolve_settings(&config)?;
    let catalog = FieldCatalog::from_path(&config.catalog)
        .with_context(|| format!("Loading field catalog {}", config.catalog.display()))?;
    let matches: Vec<TbaMatch> = io::read_json(&config.matches)?;
    let scouting: Vec<ScoutedTeamEntry> = io::read_json(&config.scouting)?;
    let validator = MatchValidator::new(catalog, settings.validation);
    log::info!(
        "Loaded {} catalog fields, {} official records, {} scouting entries",
        validator.catalog().len(),
        matches.len(),
        scouting.len()
    );

    let event_key = config.event.clone().unwrap_or_default();
    let inputs = assemble_inputs(&event_key, matches, scouting);
    let event_key = resolve_event_key(&event_key, &inputs);

    let sink = CliProgressSink::new(&ProgressConfig::from_env(config.quiet));
    let outcome = validate_event(
        &validator,
        &inputs,
        &settings.parallel,
        &sink,
        &CancellationToken::new(),
    )?;

    let failed = outcome.summary.failed_matches;
    write_report(&config, &event_key, outcome)?;

    if failed > 0 {
        anyhow::bail!("Validation failed: {} match(es) need re-scouting", failed);
    }
    Ok(())
}

/// File config, then preset, then command-line parallelism flags.
fn resolve_settings(config: &ValidateConfig) -> Result<ScoutcheckConfig> {
    let mut settings = config::load_config(config.config.as_deref())?;

    if let Some(preset) = config.preset {
        settings.validation = apply_preset(&settings.validation, preset);
    }
    settings.parallel = parallel_settings(&settings.parallel, config.jobs, config.no_parallel);
    Ok(settings)
}

fn parallel_settings(base: &ParallelConfig, jobs: Option<usize>, no_parallel: bool) -> ParallelConfig {
    if no_parallel {
        return ParallelConfig::sequential();
    }
    ParallelConfig {
        enabled: base.enabled,
        max_concurrency: jobs.or(base.max_concurrency),
    }
}

fn resolve_event_key(requested: &str, inputs: &[MatchInput]) -> String {
    if !requested.is_empty() {
        return requested.to_string();
    }
    inputs
        .iter()
        .map(|input| input.event_key.as_str())
        .find(|key| !key.is_empty())
        .unwrap_or("unknown")
        .to_string()
}

fn write_report(config: &ValidateConfig, event_key: &str, outcome: BatchOutcome) -> Result<()> {
    let report = ValidationReport::from_outcome(event_key, outcome, Utc::now());
    let destination: Box<dyn std::io::Write> = match &config.output {
        Some(path) => Box::new(
            std::fs::File::create(path)
                .with_context(|| format!("Creating output file {}", path.display()))?,
        ),
        None => Box::new(std::io::stdout()),
    };
    create_writer(config.format, destination).write_report(&report)
}
