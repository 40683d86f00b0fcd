//! UI utilities for consistent terminal output formatting.

use crate::commands::run::RunSummary;

/// Width of summary box separators.
const BOX_WIDTH: usize = 60;

/// Failed runs listed in full before the rest are elided.
const MAX_LISTED_FAILURES: usize = 5;

/// Format a run summary as a boxed block of text.
///
/// ```text
/// ============================================================
/// Scenario: burst
/// ============================================================
/// Runs:      1000
/// Passed:    1000
/// Failed:    0
/// ```
pub fn format_summary(summary: &RunSummary) -> String {
    let rule = "=".repeat(BOX_WIDTH);
    let name = summary
        .scenario
        .map_or_else(|| "unknown".to_string(), |s| s.to_string());

    let mut out = format!(
        "{rule}\nScenario: {name}\n{rule}\nRuns:      {}\nPassed:    {}\nFailed:    {}\n",
        summary.runs,
        summary.passed,
        summary.failed()
    );

    for (index, violations) in summary.failures.iter().take(MAX_LISTED_FAILURES) {
        out.push_str(&format!("\n  run #{index}:\n"));
        for violation in violations {
            out.push_str(&format!("    - {violation}\n"));
        }
    }
    if summary.failures.len() > MAX_LISTED_FAILURES {
        out.push_str(&format!(
            "\n  ... and {} more failed run(s)\n",
            summary.failures.len() - MAX_LISTED_FAILURES
        ));
    }
    out
}

/// Print a run summary to stdout.
pub fn print_summary(summary: &RunSummary) {
    println!("{}", format_summary(summary));
}
