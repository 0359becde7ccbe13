use crate::config::SweepOptions;
use crate::error::Result;
use crate::pipeline::{Aggregator, RunContext, SplitSet};
use crate::report::Report;
use std::path::Path;
use tracing::info;

/// Split `input`, scan every unit in parallel and merge the results.
///
/// Unit files live only as long as this call: they are removed on success,
/// on error and if a worker panics.
pub fn sweep_file(input: &Path, options: &SweepOptions) -> Result<Report> {
    options.validate()?;

    let ctx = RunContext::new(input, options.workers);
    let split = SplitSet::split(input, options.workers, options.temp_dir.as_deref(), &ctx)?;

    let report = Aggregator::new(&ctx)
        .with_charset(options.charset)
        .with_timeout(options.worker_timeout)
        .collect(split.units())?;

    ctx.span().in_scope(|| {
        info!(
            lines = report.lines_scanned,
            skipped = report.lines_skipped,
            records = report.records.len(),
            "sweep of {} finished",
            input.display()
        )
    });
    Ok(report)
}
