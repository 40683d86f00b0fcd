//! Concurrent driver scenarios.
//!
//! Each scenario spawns producer and consumer threads around one shared
//! [`AlarmQueue`], records what the consumer received, and checks the
//! ordering guarantees that must hold for that interleaving. Timing only
//! staggers the threads; a failed check means the queue misbehaved or the
//! scheduler starved a thread past the configured sleeps.

use anyhow::{Context, Result};
use clap::ValueEnum;
use std::fmt;
use std::thread::{self, JoinHandle};
use tracing::{debug, info};

use crate::config::RunConfig;
use crate::queue::{AlarmQueue, Message, MsgKind};

/// Payload carried through the queue: which producer sent it and a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Payload {
    pub producer: &'static str,
    pub value: i32,
}

/// Available driver scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scenario {
    /// Alarm producer, normal producer and consumer staggered by sleeps.
    Staggered,
    /// One producer sends seven normals and an alarm around a pause.
    Burst,
    /// Two alarm senders and a normal sender race a slow consumer.
    AlarmRace,
}

impl Scenario {
    /// Every scenario, in a stable order.
    pub const ALL: [Scenario; 3] = [Scenario::Staggered, Scenario::Burst, Scenario::AlarmRace];

    pub fn name(self) -> &'static str {
        match self {
            Self::Staggered => "staggered",
            Self::Burst => "burst",
            Self::AlarmRace => "alarm-race",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of one scenario execution.
#[derive(Debug, Default)]
pub struct ScenarioReport {
    /// Messages in the order the consumer received them.
    pub received: Vec<(MsgKind, Payload)>,
    /// Highest alarm count the consumer observed after a receive.
    pub max_alarms_seen: usize,
    /// Queue size after all threads joined.
    pub final_size: usize,
    /// Queue alarm count after all threads joined.
    pub final_alarms: usize,
    /// Broken ordering or accounting checks.
    pub violations: Vec<String>,
}

impl ScenarioReport {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }

    fn check(&mut self, ok: bool, violation: impl FnOnce() -> String) {
        if !ok {
            self.violations.push(violation());
        }
    }

    /// Values received from `producer` with `kind`, in arrival order.
    fn values_from(&self, producer: &str, kind: MsgKind) -> Vec<i32> {
        self.received
            .iter()
            .filter(|(k, p)| *k == kind && p.producer == producer)
            .map(|(_, p)| p.value)
            .collect()
    }

    /// Shared end-of-run checks: everything received, nothing left behind.
    fn check_drained(&mut self, expected: usize) {
        let received = self.received.len();
        let (final_size, final_alarms, max_alarms) =
            (self.final_size, self.final_alarms, self.max_alarms_seen);
        self.check(received == expected, || {
            format!("received {received} messages, expected {expected}")
        });
        self.check(final_size == 0, || format!("final size {final_size}, expected 0"));
        self.check(final_alarms == 0, || {
            format!("final alarm count {final_alarms}, expected 0")
        });
        self.check(max_alarms <= 1, || {
            format!("observed {max_alarms} queued alarms at once")
        });
    }
}

/// Execute one run of `scenario` with the given timing.
///
/// # Errors
///
/// Returns an error if a worker thread panicked or a queue operation failed.
pub fn run_once(scenario: Scenario, config: &RunConfig) -> Result<ScenarioReport> {
    let queue = AlarmQueue::new();
    let mut report = match scenario {
        Scenario::Staggered => staggered(&queue, config)?,
        Scenario::Burst => burst(&queue, config)?,
        Scenario::AlarmRace => alarm_race(&queue, config)?,
    };

    report.final_size = queue.size()?;
    report.final_alarms = queue.alarm_count()?;
    queue.destroy();

    match scenario {
        Scenario::Staggered => check_staggered(&mut report),
        Scenario::Burst => check_burst(&mut report),
        Scenario::AlarmRace => check_alarm_race(&mut report),
    }

    info!(
        scenario = %scenario,
        received = report.received.len(),
        passed = report.passed(),
        "scenario finished"
    );
    Ok(report)
}

// ============================================================================
// Thread Helpers
// ============================================================================

fn put(queue: &AlarmQueue<Payload>, producer: &'static str, value: i32, kind: MsgKind) -> Result<()> {
    debug!(producer, value, %kind, "sending");
    queue
        .send(Payload { producer, value }, kind)
        .with_context(|| format!("{producer} failed to send {kind}({value})"))?;
    debug!(producer, value, %kind, "sent");
    Ok(())
}

/// Consumer body: receive `count` messages, sleeping `delay` before each.
fn consume(
    queue: &AlarmQueue<Payload>,
    count: usize,
    delay: std::time::Duration,
) -> Result<(Vec<(MsgKind, Payload)>, usize)> {
    let mut received = Vec::with_capacity(count);
    let mut max_alarms = 0;
    for _ in 0..count {
        thread::sleep(delay);
        let Message { kind, payload } = queue.receive().context("consumer failed to receive")?;
        debug!(%kind, producer = payload.producer, value = payload.value, "received");
        max_alarms = max_alarms.max(queue.alarm_count()?);
        received.push((kind, payload));
    }
    Ok((received, max_alarms))
}

fn spawn_worker<R, F>(name: &str, f: F) -> Result<JoinHandle<Result<R>>>
where
    R: Send + 'static,
    F: FnOnce() -> Result<R> + Send + 'static,
{
    thread::Builder::new()
        .name(name.to_string())
        .spawn(f)
        .with_context(|| format!("Failed to spawn {name} thread"))
}

fn join_worker<R>(name: &str, handle: JoinHandle<Result<R>>) -> Result<R> {
    handle
        .join()
        .map_err(|_| anyhow::anyhow!("{name} thread panicked"))?
}

// ============================================================================
// Scenarios
// ============================================================================

fn staggered(queue: &AlarmQueue<Payload>, config: &RunConfig) -> Result<ScenarioReport> {
    let step = config.stagger();

    let alarm_producer = {
        let queue = queue.clone();
        spawn_worker("alarm-producer", move || {
            thread::sleep(step);
            put(&queue, "alarm-producer", 0, MsgKind::Alarm)?;
            thread::sleep(step);
            put(&queue, "alarm-producer", 1, MsgKind::Alarm)?;
            thread::sleep(step);
            put(&queue, "alarm-producer", 99, MsgKind::Normal)?;
            thread::sleep(step);
            Ok(())
        })?
    };

    let normal_producer = {
        let queue = queue.clone();
        spawn_worker("normal-producer", move || {
            for value in 0..3 {
                thread::sleep(step);
                put(&queue, "normal-producer", value, MsgKind::Normal)?;
            }
            thread::sleep(step);
            Ok(())
        })?
    };

    let consumer = {
        let queue = queue.clone();
        spawn_worker("consumer", move || consume(&queue, 6, step))?
    };

    join_worker("alarm-producer", alarm_producer)?;
    join_worker("normal-producer", normal_producer)?;
    let (received, max_alarms_seen) = join_worker("consumer", consumer)?;

    Ok(ScenarioReport {
        received,
        max_alarms_seen,
        ..Default::default()
    })
}

fn burst(queue: &AlarmQueue<Payload>, config: &RunConfig) -> Result<ScenarioReport> {
    let pause = config.pause();

    let producer = {
        let queue = queue.clone();
        spawn_worker("producer", move || {
            for value in 1..=3 {
                put(&queue, "producer", value, MsgKind::Normal)?;
            }
            thread::sleep(pause);
            for value in 4..=7 {
                put(&queue, "producer", value, MsgKind::Normal)?;
            }
            put(&queue, "producer", 8, MsgKind::Alarm)?;
            Ok(())
        })?
    };

    let consumer = {
        let queue = queue.clone();
        spawn_worker("consumer", move || consume(&queue, 8, std::time::Duration::ZERO))?
    };

    join_worker("producer", producer)?;
    let (received, max_alarms_seen) = join_worker("consumer", consumer)?;

    Ok(ScenarioReport {
        received,
        max_alarms_seen,
        ..Default::default()
    })
}

fn alarm_race(queue: &AlarmQueue<Payload>, config: &RunConfig) -> Result<ScenarioReport> {
    let senders = [
        ("alarm-sender-1", 1, MsgKind::Alarm),
        ("alarm-sender-2", 2, MsgKind::Alarm),
        ("normal-sender", 1, MsgKind::Normal),
    ]
    .into_iter()
    .map(|(name, value, kind)| {
        let queue = queue.clone();
        spawn_worker(name, move || put(&queue, name, value, kind)).map(|h| (name, h))
    })
    .collect::<Result<Vec<_>>>()?;

    let consumer = {
        let queue = queue.clone();
        let delay = config.consumer_delay();
        spawn_worker("consumer", move || consume(&queue, 3, delay))?
    };

    for (name, handle) in senders {
        join_worker(name, handle)?;
    }
    let (received, max_alarms_seen) = join_worker("consumer", consumer)?;

    Ok(ScenarioReport {
        received,
        max_alarms_seen,
        ..Default::default()
    })
}

// ============================================================================
// Checks
// ============================================================================

fn check_staggered(report: &mut ScenarioReport) {
    report.check_drained(6);

    let alarms = report.values_from("alarm-producer", MsgKind::Alarm);
    report.check(alarms == [0, 1], || format!("alarms arrived as {alarms:?}, expected [0, 1]"));

    let normals = report.values_from("normal-producer", MsgKind::Normal);
    report.check(normals == [0, 1, 2], || {
        format!("normals arrived as {normals:?}, expected [0, 1, 2]")
    });

    let extra = report.values_from("alarm-producer", MsgKind::Normal);
    report.check(extra == [99], || format!("trailing normal arrived as {extra:?}"));
}

fn check_burst(report: &mut ScenarioReport) {
    report.check_drained(8);

    let normals = report.values_from("producer", MsgKind::Normal);
    report.check(normals == [1, 2, 3, 4, 5, 6, 7], || {
        format!("normals arrived as {normals:?}, expected 1..=7 in order")
    });

    let alarms = report.values_from("producer", MsgKind::Alarm);
    report.check(alarms == [8], || format!("alarms arrived as {alarms:?}, expected [8]"));
}

fn check_alarm_race(report: &mut ScenarioReport) {
    report.check_drained(3);

    let mut alarms = [
        report.values_from("alarm-sender-1", MsgKind::Alarm),
        report.values_from("alarm-sender-2", MsgKind::Alarm),
    ]
    .concat();
    alarms.sort_unstable();
    report.check(alarms == [1, 2], || format!("alarms arrived as {alarms:?}, expected both"));

    // Every send lands well before the first delayed receive, so an alarm
    // is queued ahead of the normal at that point.
    let first = report.received.first().map(|(kind, _)| *kind);
    report.check(first == Some(MsgKind::Alarm), || {
        format!("first delivery was {first:?}, expected an alarm")
    });
}
