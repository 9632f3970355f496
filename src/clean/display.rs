//! Summary output for a clean run.

use super::types::CleanSummary;
use crate::report::Reporter;

const RULE_WIDTH: usize = 80;

/// Print counts for files and folders, then any failures.
pub fn print_summary(summary: &CleanSummary, reporter: &mut Reporter) {
    let verb = if summary.dry_run {
        "would be deleted"
    } else {
        "deleted"
    };
    let rule = "-".repeat(RULE_WIDTH);

    reporter.line(&rule);
    reporter.line("P4Clean summary:");
    reporter.line(&rule);
    reporter.line(&format!("{} untracked files {}.", summary.files.count(), verb));
    reporter.line(&format!("{} empty folders {}.", summary.folders.count(), verb));

    if summary.failure_count() > 0 {
        reporter.line(&format!(
            "{} items could not be deleted:",
            summary.failure_count()
        ));
        for failure in summary.failures() {
            reporter.line(&format!("  - {}", failure));
        }
    }
}
