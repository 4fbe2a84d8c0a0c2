//! Execution engine: runs the four analyses over one filtered table and times them.
//!
//! This module sits "above" [`crate::processing`] and provides:
//!
//! - concurrent execution of the independent analyses on a rayon pool (shared read-only
//!   `&TripTable`, joined before returning)
//! - per-analysis timing, real-time metrics and observer hooks
//! - selector filtering, chunked across the pool and concatenated in row order

mod observer;
mod report;

use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use rayon::ThreadPool;
use rayon::ThreadPoolBuilder;

use crate::error::BikeshareResult;
use crate::processing::{
    matches, station_stats, time_stats, trip_duration_stats, user_stats, Analysis, DayFilter,
    MonthFilter,
};
use crate::types::TripTable;

pub use observer::{
    ExecutionEvent, ExecutionMetrics, ExecutionMetricsSnapshot, ExecutionObserver, LogExecutionObserver,
};
pub use report::{AnalysisOutcome, StatsReport};

/// Configuration for the [`ExecutionEngine`].
#[derive(Debug, Clone)]
pub struct ExecutionOptions {
    /// Number of worker threads used by the engine.
    ///
    /// If `None`, uses the platform's available parallelism.
    pub num_threads: Option<usize>,
    /// Run the four analyses concurrently. When `false` they run one after another in
    /// [`Analysis::ALL`] order.
    pub parallel: bool,
    /// Number of rows per chunk for [`ExecutionEngine::filter_parallel`].
    pub chunk_size: usize,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self {
            num_threads: None,
            parallel: true,
            chunk_size: 4_096,
        }
    }
}

/// Runs statistics pipelines over a [`TripTable`].
pub struct ExecutionEngine {
    pool: ThreadPool,
    opts: ExecutionOptions,
    observer: Option<Arc<dyn ExecutionObserver>>,
    metrics: Arc<ExecutionMetrics>,
}

impl ExecutionEngine {
    /// Create a new engine with the given options.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size == 0` or `num_threads == Some(0)`.
    pub fn new(opts: ExecutionOptions) -> BikeshareResult<Self> {
        assert!(opts.chunk_size > 0, "chunk_size must be > 0");
        if let Some(n) = opts.num_threads {
            assert!(n > 0, "num_threads must be > 0 when set");
        }

        let n_threads = opts
            .num_threads
            .unwrap_or_else(|| std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1));

        let pool = ThreadPoolBuilder::new().num_threads(n_threads).build()?;

        Ok(Self {
            pool,
            opts,
            observer: None,
            metrics: Arc::new(ExecutionMetrics::new()),
        })
    }

    /// Attach an observer for execution events (metrics/logging).
    pub fn with_observer(mut self, observer: Arc<dyn ExecutionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Get a handle to real-time execution metrics.
    pub fn metrics(&self) -> Arc<ExecutionMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Compute all four analyses over `table`.
    ///
    /// Individual analysis failures (e.g. an empty table) are captured in the report rather
    /// than aborting the run.
    pub fn run_all(&self, table: &TripTable) -> StatsReport {
        let start = Instant::now();
        self.metrics.begin_run();
        self.emit(ExecutionEvent::RunStarted);

        let report = if self.opts.parallel {
            self.pool.install(|| {
                let ((time_of_travel, stations), (trip_duration, users)) = rayon::join(
                    || {
                        rayon::join(
                            || self.timed(Analysis::TimeOfTravel, table, time_stats),
                            || self.timed(Analysis::Stations, table, station_stats),
                        )
                    },
                    || {
                        rayon::join(
                            || self.timed(Analysis::TripDuration, table, trip_duration_stats),
                            || self.timed(Analysis::Users, table, user_stats),
                        )
                    },
                );
                StatsReport {
                    rows: table.row_count(),
                    time_of_travel,
                    stations,
                    trip_duration,
                    users,
                }
            })
        } else {
            StatsReport {
                rows: table.row_count(),
                time_of_travel: self.timed(Analysis::TimeOfTravel, table, time_stats),
                stations: self.timed(Analysis::Stations, table, station_stats),
                trip_duration: self.timed(Analysis::TripDuration, table, trip_duration_stats),
                users: self.timed(Analysis::Users, table, user_stats),
            }
        };

        self.metrics.end_run(start.elapsed());
        self.emit(ExecutionEvent::RunFinished {
            elapsed: start.elapsed(),
            metrics: self.metrics.snapshot(),
        });
        report
    }

    fn timed<T>(
        &self,
        analysis: Analysis,
        table: &TripTable,
        f: fn(&TripTable) -> BikeshareResult<T>,
    ) -> AnalysisOutcome<T> {
        self.metrics.on_analysis_start();
        self.emit(ExecutionEvent::AnalysisStarted { analysis });

        let start = Instant::now();
        let result = f(table);
        let elapsed = start.elapsed();

        self.metrics.on_rows_scanned(table.row_count());
        self.metrics.on_analysis_end(result.is_ok());
        self.emit(ExecutionEvent::AnalysisFinished {
            analysis,
            elapsed,
            ok: result.is_ok(),
        });

        AnalysisOutcome {
            analysis,
            result,
            elapsed,
        }
    }

    /// Apply the month/day selectors to a loaded table.
    ///
    /// Uses [`Self::filter_parallel`] when the engine is parallel, the sequential
    /// [`crate::processing::filter()`] otherwise; both return the same rows in the same order.
    pub fn filter(&self, table: &TripTable, month: MonthFilter, day: DayFilter) -> TripTable {
        let filtered = if self.opts.parallel {
            self.filter_parallel(table, month, day)
        } else {
            crate::processing::filter(table, month, day)
        };
        log::debug!(
            "filtered month={} day={} rows={}/{}",
            month,
            day,
            filtered.row_count(),
            table.row_count()
        );
        filtered
    }

    /// Filter `table` in parallel chunks.
    ///
    /// Chunks are concatenated in order, so the result equals
    /// [`crate::processing::filter()`] on the same inputs.
    pub fn filter_parallel(&self, table: &TripTable, month: MonthFilter, day: DayFilter) -> TripTable {
        self.pool.install(|| {
            let per_chunk: Vec<Vec<_>> = chunk_ranges(table.row_count(), self.opts.chunk_size)
                .into_par_iter()
                .map(|range| {
                    self.emit(ExecutionEvent::ChunkStarted {
                        start_row: range.start,
                        row_count: range.len(),
                    });
                    self.metrics.on_rows_scanned(range.len());

                    let out: Vec<_> = table.rows[range]
                        .iter()
                        .filter(|row| matches(row, month, day))
                        .cloned()
                        .collect();

                    self.emit(ExecutionEvent::ChunkFinished {
                        output_rows: out.len(),
                    });
                    out
                })
                .collect();

            TripTable::new(table.schema, per_chunk.into_iter().flatten().collect())
        })
    }

    fn emit(&self, event: ExecutionEvent) {
        if let Some(obs) = &self.observer {
            obs.on_event(&event);
        }
    }
}

fn chunk_ranges(row_count: usize, chunk_size: usize) -> Vec<std::ops::Range<usize>> {
    (0..row_count)
        .step_by(chunk_size)
        .map(|start| start..(start + chunk_size).min(row_count))
        .collect()
}
