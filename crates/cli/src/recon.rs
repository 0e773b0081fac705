//! `oxt run` / `oxt validate` — load both sources, reconcile, report.

use std::path::{Path, PathBuf};

use serde::Serialize;

use oxetech_io::{load_legacy_records, load_live_records, LegacyCache, LoadReport};
use oxetech_recon::aggregate::{by_course, by_institution, compute_summary};
use oxetech_recon::model::{ReconMeta, ReconResult};
use oxetech_recon::{reconcile, ReconConfig};

use crate::exit_codes::{EXIT_RECON_INVALID_CONFIG, EXIT_RECON_RUNTIME};
use crate::CliError;

// The legacy export is immutable for the life of the process; one slot is
// enough, `--refresh` clears it.
static LEGACY_CACHE: LegacyCache = LegacyCache::new();

fn recon_err(code: u8, message: impl Into<String>) -> CliError {
    CliError { code, message: message.into(), hint: None }
}

fn load_config(config_path: &Path) -> Result<ReconConfig, CliError> {
    let content = std::fs::read_to_string(config_path).map_err(|e| CliError {
        code: EXIT_RECON_RUNTIME,
        message: format!("cannot read config '{}': {e}", config_path.display()),
        hint: Some("run 'oxt run --help' for the expected layout".to_string()),
    })?;

    ReconConfig::from_toml(&content).map_err(|e| CliError {
        code: EXIT_RECON_INVALID_CONFIG,
        message: format!("invalid config '{}': {e}", config_path.display()),
        hint: Some("see the sample .recon.toml in the repository README".to_string()),
    })
}

/// Source paths in the config are relative to the config file itself.
fn resolve(config_path: &Path, source: &str) -> PathBuf {
    let base = config_path.parent().unwrap_or_else(|| Path::new("."));
    base.join(source)
}

#[derive(Serialize)]
struct RunOutput<'a> {
    #[serde(flatten)]
    result: &'a ReconResult,
    legacy_load: &'a LoadReport,
}

pub fn cmd_run(
    config_path: PathBuf,
    json: bool,
    output: Option<PathBuf>,
    refresh: bool,
) -> Result<(), CliError> {
    let config = load_config(&config_path)?;

    if refresh {
        LEGACY_CACHE.invalidate();
    }

    let legacy_path = resolve(&config_path, &config.legacy.file);
    let use_corrections = config.corrections;
    let legacy = LEGACY_CACHE
        .get_or_load(|| load_legacy_records(&legacy_path, use_corrections))
        .map_err(|e| recon_err(EXIT_RECON_RUNTIME, format!("legacy source: {e}")))?;

    let live_path = resolve(&config_path, &config.live.database);
    let live = load_live_records(&live_path)
        .map_err(|e| recon_err(EXIT_RECON_RUNTIME, format!("live source: {e}")))?;

    let classes = reconcile(&legacy.records, &live, config.tolerance_days);

    let result = ReconResult {
        meta: ReconMeta {
            config_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            tolerance_days: config.tolerance_days,
            corrections: config.corrections,
        },
        summary: compute_summary(&classes),
        by_institution: by_institution(&classes),
        by_course: by_course(&classes),
        classes,
    };

    let run_output = RunOutput { result: &result, legacy_load: &legacy.report };

    if json {
        let rendered = serde_json::to_string_pretty(&run_output)
            .map_err(|e| recon_err(EXIT_RECON_RUNTIME, format!("cannot encode output: {e}")))?;
        println!("{rendered}");
    } else {
        print_summary(&result);
    }

    // --output wins over the config's [output] section.
    let file_target = output.or_else(|| {
        config.output.json.as_ref().map(|p| resolve(&config_path, p))
    });
    if let Some(path) = file_target {
        let rendered = serde_json::to_string_pretty(&run_output)
            .map_err(|e| recon_err(EXIT_RECON_RUNTIME, format!("cannot encode output: {e}")))?;
        std::fs::write(&path, rendered).map_err(|e| {
            recon_err(
                EXIT_RECON_RUNTIME,
                format!("cannot write output '{}': {e}", path.display()),
            )
        })?;
        if !json {
            println!("wrote {}", path.display());
        }
    }

    if legacy.report.skipped() > 0 {
        eprintln!(
            "note: {} legacy rows skipped ({} missing institution, {} missing course, {} missing start date)",
            legacy.report.skipped(),
            legacy.report.skipped_missing_institution,
            legacy.report.skipped_missing_course,
            legacy.report.skipped_missing_start_date,
        );
    }

    Ok(())
}

fn print_summary(result: &ReconResult) {
    let s = &result.summary;
    println!("recon '{}' (tolerance {} days)", result.meta.config_name, result.meta.tolerance_days);
    println!("  classes:          {}", s.total);
    println!("  found in both:    {}", s.found_in_both);
    println!("  legacy only:      {}", s.legacy_only);
    println!("  live only:        {}", s.live_only);
    println!("  legacy prevailed: {}", s.legacy_prevalence);
    println!("  enrolled:         {}", s.enrolled_total);
    println!("  completed:        {}", s.completed_total);
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = load_config(&config_path)?;
    println!("ok: '{}' is a valid recon config", config.name);
    Ok(())
}
