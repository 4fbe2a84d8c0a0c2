use thiserror::Error;

/// Convenience result type used across loading, filtering and statistics.
pub type BikeshareResult<T> = Result<T, BikeshareError>;

/// Error type returned by the loader, the selectors and the statistics engine.
///
/// Every error propagates to the immediate caller; nothing here is retried or recovered
/// internally.
#[derive(Debug, Error)]
pub enum BikeshareError {
    /// Underlying I/O error (e.g. city file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV decoding error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The execution engine could not start its worker pool.
    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// City selector outside the supported set.
    #[error("unknown city '{name}' (expected chicago, new york city or washington)")]
    UnknownCity { name: String },

    /// Month selector outside january..june.
    #[error("invalid month '{name}' (expected january..june or all)")]
    InvalidMonth { name: String },

    /// Day selector that is not a weekday name.
    #[error("invalid day '{name}' (expected monday..sunday or all)")]
    InvalidDay { name: String },

    /// The input is missing a required column.
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A non-timestamp cell could not be parsed.
    #[error("failed to parse value at row {row} column '{column}': {message} (raw='{raw}')")]
    ParseError {
        row: usize,
        column: String,
        raw: String,
        message: String,
    },

    /// A `Start Time` cell could not be parsed; fails the whole load.
    #[error("malformed start time at row {row}: {message} (raw='{raw}')")]
    MalformedTimestamp {
        row: usize,
        raw: String,
        message: String,
    },

    /// A `Start Time` falls outside the January..June range covered by the datasets.
    #[error("start time at row {row} is in month {month}, datasets only cover january..june")]
    MonthOutOfRange { row: usize, month: u32 },

    /// A statistic was requested over zero values.
    #[error("no data for this filter: cannot compute {statistic} over zero rows")]
    EmptyResult { statistic: &'static str },
}

impl BikeshareError {
    /// Returns `true` for the "no rows matched" outcome, which front-ends render as a
    /// message rather than a failure.
    pub fn is_empty_result(&self) -> bool {
        matches!(self, BikeshareError::EmptyResult { .. })
    }
}
