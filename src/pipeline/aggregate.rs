use crate::codec::Charset;
use crate::error::{Result, XorsweepError};
use crate::pipeline::context::{CancelFlag, RunContext};
use crate::pipeline::split::WorkUnit;
use crate::pipeline::worker::{scan_unit, UnitTask};
use crate::report::{FailureReason, Report, ResultBatch, WorkerFailure};
use crossbeam::channel::{unbounded, RecvTimeoutError};
use std::any::Any;
use std::collections::HashSet;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// How long cancelled workers get to stop and release their unit files
const CANCEL_GRACE: Duration = Duration::from_millis(250);

/// What a worker sends on the result channel when it is done
#[derive(Debug)]
pub struct WorkerOutcome {
    pub unit: usize,
    pub result: std::result::Result<ResultBatch, FailureReason>,
}

/// Fans units out to one thread each and fans their batches back in
pub struct Aggregator<'a> {
    ctx: &'a RunContext,
    charset: Charset,
    timeout: Option<Duration>,
}

impl<'a> Aggregator<'a> {
    pub fn new(ctx: &'a RunContext) -> Self {
        Self {
            ctx,
            charset: Charset::default(),
            timeout: None,
        }
    }

    pub fn with_charset(mut self, charset: Charset) -> Self {
        self.charset = charset;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Scan every unit on its own thread and merge the batches
    pub fn collect(&self, units: &[WorkUnit]) -> Result<Report> {
        let charset = self.charset;
        self.collect_with(units, move |task, cancel| {
            scan_unit(task, charset, cancel)
        })
    }

    /// [`collect`](Self::collect) with a caller-supplied per-unit job
    pub fn collect_with<F>(&self, units: &[WorkUnit], job: F) -> Result<Report>
    where
        F: Fn(&UnitTask, &CancelFlag) -> Result<ResultBatch> + Send + Sync + 'static,
    {
        self.run_tasks(units.iter().map(WorkUnit::task).collect(), job)
    }

    /// Run `job` once per task, each on a dedicated thread.
    ///
    /// Waits for one outcome per launched worker, or until the deadline.
    /// Workers that panic, error out or miss the deadline become failures in
    /// the report; only when every worker fails is the run an error.
    pub fn run_tasks<F>(&self, tasks: Vec<UnitTask>, job: F) -> Result<Report>
    where
        F: Fn(&UnitTask, &CancelFlag) -> Result<ResultBatch> + Send + Sync + 'static,
    {
        let _entered = self.ctx.span().enter();
        let mut report = Report::new(tasks.len());
        let (tx, rx) = unbounded::<WorkerOutcome>();
        let job = Arc::new(job);
        let cancel = CancelFlag::default();
        let mut handles: Vec<(usize, JoinHandle<()>)> = Vec::with_capacity(tasks.len());

        for task in tasks {
            let unit = task.unit;
            let tx = tx.clone();
            let job = Arc::clone(&job);
            let cancel = cancel.clone();
            let span = self.ctx.worker_span(unit);

            let spawned = thread::Builder::new()
                .name(format!("xorsweep-worker-{}", unit))
                .spawn(move || {
                    let _entered = span.enter();
                    let result = job(&task, &cancel).map_err(|e| FailureReason::Error(e.to_string()));
                    // Receiver is gone only if the aggregator gave up on us
                    let _ = tx.send(WorkerOutcome { unit, result });
                });

            match spawned {
                Ok(handle) => handles.push((unit, handle)),
                Err(e) => {
                    warn!(unit, error = %e, "could not start worker");
                    report.push_failure(WorkerFailure::new(unit, FailureReason::Spawn(e.to_string())));
                }
            }
        }
        drop(tx);

        let deadline = self.timeout.map(|t| Instant::now() + t);
        let mut delivered = HashSet::with_capacity(handles.len());
        let mut timed_out = false;

        while delivered.len() < handles.len() {
            let received = match deadline {
                Some(deadline) => rx.recv_deadline(deadline),
                None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
            };

            match received {
                Ok(WorkerOutcome { unit, result }) => {
                    delivered.insert(unit);
                    match result {
                        Ok(batch) => {
                            debug!(unit, records = batch.records.len(), "batch received");
                            report.push_batch(batch);
                        }
                        Err(reason) => {
                            warn!(unit, %reason, "worker failed");
                            report.push_failure(WorkerFailure::new(unit, reason));
                        }
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    timed_out = true;
                    cancel.cancel();
                    wait_for_finish(&handles, &delivered, CANCEL_GRACE);
                    break;
                }
                // Every sender dropped: the missing workers unwound
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        for (unit, handle) in handles {
            if delivered.contains(&unit) {
                let _ = handle.join();
                continue;
            }
            if timed_out && !handle.is_finished() {
                warn!(unit, "worker missed the deadline, detaching");
                report.push_failure(WorkerFailure::new(unit, FailureReason::TimedOut));
                continue;
            }

            let reason = match handle.join() {
                Err(payload) => FailureReason::Panicked(panic_message(payload.as_ref())),
                Ok(()) => FailureReason::TimedOut,
            };
            warn!(unit, %reason, "worker delivered no batch");
            report.push_failure(WorkerFailure::new(unit, reason));
        }

        info!(
            batches = report.arrival_order.len(),
            records = report.records.len(),
            failed = report.failures.len(),
            "collection finished"
        );

        if report.units > 0 && report.failures.len() == report.units {
            return Err(XorsweepError::AllWorkersFailed(report.failures));
        }
        Ok(report)
    }
}

/// Poll until every undelivered worker has exited or `grace` runs out.
///
/// Workers check the cancel flag between lines, so this normally returns
/// quickly and their unit files are closed before the split set removes them.
fn wait_for_finish(
    handles: &[(usize, JoinHandle<()>)],
    delivered: &HashSet<usize>,
    grace: Duration,
) {
    let until = Instant::now() + grace;
    while Instant::now() < until {
        let running = handles
            .iter()
            .any(|(unit, handle)| !delivered.contains(unit) && !handle.is_finished());
        if !running {
            return;
        }
        thread::sleep(Duration::from_millis(5));
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
