//! Run driver scenarios and tally the outcomes.
//!
//! Scheduling decides how the producer and consumer threads interleave, so
//! a single run proves little. `--runs` repeats a scenario and reports how
//! many runs held every ordering check.

use anyhow::Result;
use std::path::Path;
use tracing::{info, warn};

use super::scenarios::{self, Scenario, ScenarioReport};
use crate::config::ScenarioConfig;
use crate::ui;

/// Aggregated outcome of repeated scenario runs.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub scenario: Option<Scenario>,
    pub runs: u32,
    pub passed: u32,
    /// Run index and violations of each failed run.
    pub failures: Vec<(u32, Vec<String>)>,
}

impl RunSummary {
    fn new(scenario: Scenario) -> Self {
        Self {
            scenario: Some(scenario),
            ..Default::default()
        }
    }

    fn record(&mut self, index: u32, report: ScenarioReport) {
        self.runs += 1;
        if report.passed() {
            self.passed += 1;
        } else {
            self.failures.push((index, report.violations));
        }
    }

    #[must_use]
    pub fn failed(&self) -> u32 {
        self.runs - self.passed
    }
}

/// Execute the `run` command.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded or is invalid, a worker
/// thread fails, or any run broke an ordering check.
pub fn execute(
    scenario: Option<Scenario>,
    runs: Option<u32>,
    config_path: Option<&Path>,
    json: bool,
) -> Result<()> {
    super::init_logging(json);

    let mut config = match config_path {
        Some(path) => ScenarioConfig::load_from(path)?,
        None => ScenarioConfig::load()?,
    };
    if let Some(runs) = runs {
        config.run.runs = runs;
    }

    let validation = config.validate()?;
    for warning in &validation.warnings {
        warn!("{warning}");
    }

    let selected = scenario.map_or_else(|| Scenario::ALL.to_vec(), |s| vec![s]);
    let mut total_failed = 0;

    for scenario in selected {
        let summary = run_scenario(scenario, &config)?;
        ui::print_summary(&summary);
        total_failed += summary.failed();
    }

    if total_failed > 0 {
        anyhow::bail!("{total_failed} run(s) broke an ordering check");
    }
    Ok(())
}

/// Run one scenario `config.run.runs` times.
///
/// # Errors
///
/// Returns an error if a worker thread panics or a queue operation fails.
pub fn run_scenario(scenario: Scenario, config: &ScenarioConfig) -> Result<RunSummary> {
    info!(scenario = %scenario, runs = config.run.runs, "running scenario");

    let mut summary = RunSummary::new(scenario);
    for index in 0..config.run.runs {
        let report = scenarios::run_once(scenario, &config.run)?;
        if !report.passed() {
            warn!(
                scenario = %scenario,
                run = index,
                violations = ?report.violations,
                "run failed"
            );
        }
        summary.record(index, report);
    }
    Ok(summary)
}
