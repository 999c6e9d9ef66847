//! Run every pack in order and produce the final summary.

use judgekit_core::{RunSummary, percent};

use super::RunError;
use super::interrupt::Interrupts;
use super::pack::TestPack;
use crate::report::{ICON_POINTER, Reporter};

/// Run `packs` in order, skipping empty ones.
///
/// ## Parameters
/// - `packs`: packs in discovery order. Empty packs are not announced and count in no total.
/// - `interrupts`: each interrupt ends the pack running at that moment; the run carries on with the next one.
///
/// ## Errors
/// - The first [`RunError`] from any pack aborts the whole run.
#[tracing::instrument(skip_all, fields(packs = packs.len()))]
pub async fn run_packs(
    packs: &[TestPack],
    reporter: &mut dyn Reporter,
    interrupts: &mut Interrupts,
) -> Result<RunSummary, RunError> {
    let runnable: Vec<&TestPack> = packs.iter().filter(|p| !p.is_empty()).collect();
    let count = runnable.len();
    let mut summary = RunSummary::new();

    for (i, pack) in runnable.into_iter().enumerate() {
        reporter.info(&format!("[{}/{}] Running test pack {}...", i + 1, count, pack.name()));
        let report = pack.run(reporter, interrupts).await?;
        tracing::debug!(pack = %report.name, ran = report.ran, passed = report.passed, "pack finished");
        summary.push(report);
    }

    Ok(summary)
}

/// Emit the summary header and the single final event of a run.
pub fn render_summary(summary: &RunSummary, reporter: &mut dyn Reporter) {
    reporter.info("=== Summary ===");
    if summary.all_passed() {
        reporter.success("All tests passed!");
        return;
    }

    let mut text = format!(
        "Passed {} out of {} packs ({}%).\nThat's {} out of {} tests ({}%).",
        summary.packs_passed(),
        summary.pack_count(),
        percent(summary.packs_passed(), summary.pack_count()),
        summary.tests_passed(),
        summary.test_count(),
        percent(summary.tests_passed(), summary.test_count()),
    );
    for (i, pack) in summary.packs.iter().enumerate() {
        text.push_str(&format!("\n  {} {ICON_POINTER} {pack}", i + 1));
    }
    reporter.failure(&text);
}
