//! `bikeshare-explorer` loads US bikeshare trip logs (Chicago, New York City, Washington) into an
//! in-memory [`types::TripTable`], filters them by month and weekday, and computes descriptive
//! statistics over the result.
//!
//! The pipeline runs one way: [`ingestion`] → [`processing::filter()`] → [`processing::stats`].
//!
//! ## What a trip table holds
//!
//! Each [`types::TripRecord`] carries the source columns (`Start Time`, `End Time`,
//! `Trip Duration`, `Start Station`, `End Station`, `User Type`, and where the city records them
//! `Gender` and `Birth Year`) plus `month` and `day_of_week` derived from the start time at load
//! time. Datasets cover January through June only.
//!
//! Optional columns are recorded once per table in [`types::TripSchema`]; the user analysis
//! reports them as [`processing::Availability::Unavailable`] when absent.
//!
//! ## Quick example: load, filter, analyse
//!
//! ```no_run
//! use bikeshare_explorer::ingestion::{load, LoadOptions};
//! use bikeshare_explorer::processing::{station_stats, DayFilter, MonthFilter};
//! use bikeshare_explorer::types::{City, DayOfWeek, Month};
//!
//! # fn main() -> Result<(), bikeshare_explorer::BikeshareError> {
//! let opts = LoadOptions::with_data_dir("data");
//! let table = load(
//!     City::Chicago,
//!     MonthFilter::Only(Month::March),
//!     DayFilter::Only(DayOfWeek::Friday),
//!     &opts,
//! )?;
//! let stations = station_stats(&table)?;
//! println!("most popular start station: {}", stations.most_common_start_station);
//! # Ok(())
//! # }
//! ```
//!
//! Selectors can also be parsed from user input; parsing is case-insensitive and fails fast
//! with `UnknownCity` / `InvalidMonth` / `InvalidDay`:
//!
//! ```rust
//! use bikeshare_explorer::processing::{DayFilter, MonthFilter};
//! use bikeshare_explorer::types::{City, DayOfWeek};
//!
//! let city: City = "new york city".parse().unwrap();
//! let day: DayFilter = "MONDAY".parse().unwrap();
//! assert_eq!(city.file_name(), "new_york_city.csv");
//! assert_eq!(day, DayFilter::Only(DayOfWeek::Monday));
//! assert!("july".parse::<MonthFilter>().is_err());
//! ```
//!
//! ## Empty results
//!
//! Filtering down to zero rows is not an error. Every analysis then returns
//! [`BikeshareError::EmptyResult`], which front-ends render as "no data for this filter".
//!
//! ## Modules
//!
//! - [`ingestion`]: record loader (CSV reading, city resolution, load observers)
//! - [`types`]: selectors and the trip data model
//! - [`processing`]: filter engine, aggregation primitives and the four analyses
//! - [`execution`]: runs and times the analyses, optionally in parallel
//! - [`error`]: the error type shared by everything above

pub mod error;
pub mod execution;
pub mod ingestion;
pub mod processing;
pub mod types;

pub use error::{BikeshareError, BikeshareResult};
