//! Configuration for the scenario runner.
//!
//! Scenario timing and repetition are read from an optional TOML file:
//!
//! ```toml
//! [run]
//! runs = 1000
//! stagger_ms = 10
//! pause_ms = 100
//! consumer_delay_ms = 300
//! ```
//!
//! Every field has a default, so an empty file (or no file) is valid.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::constants;

/// Result of configuration validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Non-fatal warnings that should be logged but don't prevent operation.
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Returns true if there are any warnings.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// alarmq.toml configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub run: RunConfig,
}

/// Timing and repetition of scenario runs.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// How many times each scenario is executed.
    #[serde(default = "default_runs")]
    pub runs: u32,
    /// Sleep between steps of the staggered scenario.
    #[serde(default = "default_stagger_ms")]
    pub stagger_ms: u64,
    /// Producer pause in the burst scenario.
    #[serde(default = "default_pause_ms")]
    pub pause_ms: u64,
    /// Consumer delay before each receive in the alarm-race scenario.
    #[serde(default = "default_consumer_delay_ms")]
    pub consumer_delay_ms: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            runs: default_runs(),
            stagger_ms: default_stagger_ms(),
            pause_ms: default_pause_ms(),
            consumer_delay_ms: default_consumer_delay_ms(),
        }
    }
}

impl RunConfig {
    pub fn stagger(&self) -> Duration {
        Duration::from_millis(self.stagger_ms)
    }

    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.pause_ms)
    }

    pub fn consumer_delay(&self) -> Duration {
        Duration::from_millis(self.consumer_delay_ms)
    }
}

fn default_runs() -> u32 {
    constants::DEFAULT_RUNS
}

fn default_stagger_ms() -> u64 {
    constants::DEFAULT_STAGGER_MS
}

fn default_pause_ms() -> u64 {
    constants::DEFAULT_PAUSE_MS
}

fn default_consumer_delay_ms() -> u64 {
    constants::DEFAULT_CONSUMER_DELAY_MS
}

impl ScenarioConfig {
    /// Load `alarmq.toml` from the current directory, or defaults if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let path = Path::new(constants::DEFAULT_CONFIG_FILE);
        if path.exists() {
            Self::load_from(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from the specified path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read (IO error)
    /// - The file contains invalid TOML syntax
    /// - Fields have invalid types or are unknown
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: ScenarioConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// Returns a `ValidationResult` containing any non-fatal warnings.
    ///
    /// # Errors
    ///
    /// Returns an error if `run.runs` is zero.
    pub fn validate(&self) -> Result<ValidationResult> {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if self.run.runs == 0 {
            errors.push("run.runs must be at least 1".to_string());
        } else if self.run.runs > constants::MAX_RECOMMENDED_RUNS {
            warnings.push(format!(
                "run.runs = {} is above {}; a full run may take a long time",
                self.run.runs,
                constants::MAX_RECOMMENDED_RUNS
            ));
        }

        for (name, value) in [
            ("stagger_ms", self.run.stagger_ms),
            ("pause_ms", self.run.pause_ms),
            ("consumer_delay_ms", self.run.consumer_delay_ms),
        ] {
            if value > constants::MAX_RECOMMENDED_SLEEP_MS {
                warnings.push(format!(
                    "run.{name} = {value} exceeds {}ms",
                    constants::MAX_RECOMMENDED_SLEEP_MS
                ));
            }
        }

        if self.run.consumer_delay_ms == 0 {
            warnings.push(
                "run.consumer_delay_ms = 0: alarm-race ordering checks become timing dependent"
                    .to_string(),
            );
        }

        if !errors.is_empty() {
            anyhow::bail!("Configuration validation failed:\n  - {}", errors.join("\n  - "));
        }

        Ok(ValidationResult { warnings })
    }
}
