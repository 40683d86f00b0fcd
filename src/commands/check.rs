//! Validate a scenario config without running anything.

use anyhow::Result;
use std::path::Path;

use crate::config::ScenarioConfig;

/// Execute the `check` command.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded or fails validation.
pub fn execute(config_path: Option<&Path>) -> Result<()> {
    let config = match config_path {
        Some(path) => ScenarioConfig::load_from(path)?,
        None => ScenarioConfig::load()?,
    };

    let validation = config.validate()?;
    for warning in &validation.warnings {
        eprintln!("warning: {warning}");
    }

    let run = &config.run;
    println!(
        "config ok: runs={} stagger_ms={} pause_ms={} consumer_delay_ms={}",
        run.runs, run.stagger_ms, run.pause_ms, run.consumer_delay_ms
    );
    Ok(())
}
