//! In-memory trip processing: the filter engine and the statistics engine.
//!
//! - [`filter()`]: month/day selection over a [`crate::types::TripTable`]
//! - [`reduce`]: aggregation primitives (mode, value counts, sum/mean/min/max)
//! - [`stats`]: the four analyses producing summary records
//!
//! ## Example: filter → statistics
//!
//! ```rust
//! use chrono::NaiveDate;
//! use bikeshare_explorer::processing::{filter, trip_duration_stats, DayFilter, MonthFilter};
//! use bikeshare_explorer::types::{Month, TripRecord, TripSchema, TripTable};
//!
//! let start = |m, d| {
//!     NaiveDate::from_ymd_opt(2017, m, d).unwrap().and_hms_opt(8, 0, 0).unwrap()
//! };
//! let table = TripTable::new(
//!     TripSchema::default(),
//!     vec![
//!         TripRecord::new(start(1, 2)).unwrap().with_duration(300.0),
//!         TripRecord::new(start(2, 6)).unwrap().with_duration(700.0),
//!         TripRecord::new(start(2, 7)).unwrap().with_duration(100.0),
//!     ],
//! );
//!
//! let february = filter(&table, MonthFilter::Only(Month::February), DayFilter::All);
//! let stats = trip_duration_stats(&february).unwrap();
//! assert_eq!(stats.total_travel_time, 800.0);
//! assert_eq!(stats.mean_travel_time, 400.0);
//! ```

pub mod filter;
pub mod reduce;
pub mod stats;

pub use filter::{filter, matches, DayFilter, MonthFilter};
pub use reduce::{mode, reduce, value_counts, ReduceOp};
pub use stats::{
    station_stats, time_stats, trip_duration_stats, user_stats, Analysis, Availability, BirthYearStats,
    DurationStats, StationStats, TimeStats, UserStats,
};
