//! Default values shared by the config loader and the scenario runner.

/// Default scenario config file looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = "alarmq.toml";

/// Number of times a scenario is executed per `run` invocation.
pub const DEFAULT_RUNS: u32 = 1;

/// Sleep between steps of the staggered scenario (milliseconds).
pub const DEFAULT_STAGGER_MS: u64 = 10;

/// Producer pause in the middle of the burst scenario (milliseconds).
pub const DEFAULT_PAUSE_MS: u64 = 100;

/// Consumer delay before each receive in the alarm-race scenario (milliseconds).
pub const DEFAULT_CONSUMER_DELAY_MS: u64 = 300;

/// Sleeps above this trigger a validation warning (milliseconds).
pub const MAX_RECOMMENDED_SLEEP_MS: u64 = 5_000;

/// Runs above this trigger a validation warning.
pub const MAX_RECOMMENDED_RUNS: u32 = 10_000;
