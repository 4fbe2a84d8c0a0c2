use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::processing::Analysis;

/// Execution events emitted by the engine.
#[derive(Debug, Clone)]
pub enum ExecutionEvent {
    RunStarted,
    AnalysisStarted { analysis: Analysis },
    AnalysisFinished {
        analysis: Analysis,
        elapsed: Duration,
        /// `false` when the analysis returned an error (including empty results).
        ok: bool,
    },
    ChunkStarted { start_row: usize, row_count: usize },
    ChunkFinished { output_rows: usize },
    RunFinished {
        elapsed: Duration,
        metrics: ExecutionMetricsSnapshot,
    },
}

/// Observer hook for execution events.
pub trait ExecutionObserver: Send + Sync {
    fn on_event(&self, event: &ExecutionEvent);
}

/// Logs execution events at debug level (analysis timings at info).
#[derive(Debug, Default)]
pub struct LogExecutionObserver;

impl ExecutionObserver for LogExecutionObserver {
    fn on_event(&self, event: &ExecutionEvent) {
        match event {
            ExecutionEvent::AnalysisFinished {
                analysis,
                elapsed,
                ok,
            } => log::info!("analysis={analysis} ok={ok} elapsed={elapsed:?}"),
            ExecutionEvent::RunFinished { elapsed, metrics } => {
                log::info!("run finished in {elapsed:?}: {metrics}")
            }
            other => log::debug!("{other:?}"),
        }
    }
}

/// Counters for the current execution run.
///
/// The engine updates these during execution; callers can snapshot them at any time.
#[derive(Debug, Default)]
pub struct ExecutionMetrics {
    run_id: AtomicU64,
    elapsed_ns: AtomicU64,
    analyses_started: AtomicU64,
    analyses_succeeded: AtomicU64,
    analyses_failed: AtomicU64,
    rows_scanned: AtomicU64,
}

impl ExecutionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_run(&self) {
        let _ = self.run_id.fetch_add(1, Ordering::SeqCst);
        self.elapsed_ns.store(0, Ordering::SeqCst);
        self.analyses_started.store(0, Ordering::SeqCst);
        self.analyses_succeeded.store(0, Ordering::SeqCst);
        self.analyses_failed.store(0, Ordering::SeqCst);
        self.rows_scanned.store(0, Ordering::SeqCst);
    }

    pub fn end_run(&self, elapsed: Duration) {
        self.elapsed_ns.store(saturating_nanos(elapsed), Ordering::SeqCst);
    }

    pub fn on_analysis_start(&self) {
        let _ = self.analyses_started.fetch_add(1, Ordering::SeqCst);
    }

    pub fn on_analysis_end(&self, ok: bool) {
        let counter = if ok {
            &self.analyses_succeeded
        } else {
            &self.analyses_failed
        };
        let _ = counter.fetch_add(1, Ordering::SeqCst);
    }

    pub fn on_rows_scanned(&self, n: usize) {
        let _ = self.rows_scanned.fetch_add(n as u64, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> ExecutionMetricsSnapshot {
        let elapsed_ns = self.elapsed_ns.load(Ordering::SeqCst);
        ExecutionMetricsSnapshot {
            run_id: self.run_id.load(Ordering::SeqCst),
            elapsed: (elapsed_ns > 0).then(|| Duration::from_nanos(elapsed_ns)),
            analyses_started: self.analyses_started.load(Ordering::SeqCst),
            analyses_succeeded: self.analyses_succeeded.load(Ordering::SeqCst),
            analyses_failed: self.analyses_failed.load(Ordering::SeqCst),
            rows_scanned: self.rows_scanned.load(Ordering::SeqCst),
        }
    }
}

fn saturating_nanos(d: Duration) -> u64 {
    d.as_nanos().min(u64::MAX as u128) as u64
}

/// Immutable snapshot of [`ExecutionMetrics`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionMetricsSnapshot {
    pub run_id: u64,
    pub elapsed: Option<Duration>,
    pub analyses_started: u64,
    pub analyses_succeeded: u64,
    pub analyses_failed: u64,
    pub rows_scanned: u64,
}

impl fmt::Display for ExecutionMetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "run_id={}, analyses={}/{} (failed={}), rows_scanned={}, elapsed={:?}",
            self.run_id,
            self.analyses_succeeded,
            self.analyses_started,
            self.analyses_failed,
            self.rows_scanned,
            self.elapsed
        )
    }
}
