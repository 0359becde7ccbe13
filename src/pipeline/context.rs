use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::Span;

/// Per-run logging context handed to every pipeline stage.
///
/// The library never installs a subscriber; it only opens spans under the
/// run's root span so all events of one run share its fields.
#[derive(Debug, Clone)]
pub struct RunContext {
    span: Span,
}

impl RunContext {
    pub fn new(input: &Path, workers: usize) -> Self {
        Self {
            span: tracing::info_span!("sweep", input = %input.display(), workers),
        }
    }

    /// Context whose spans go nowhere, for callers outside a sweep
    pub fn detached() -> Self {
        Self { span: Span::none() }
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    pub fn worker_span(&self, unit: usize) -> Span {
        tracing::info_span!(parent: &self.span, "worker", unit)
    }
}

/// Shared stop signal; workers poll it between lines
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
