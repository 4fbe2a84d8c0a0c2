//! Record loader.
//!
//! Most callers should use [`load`] (from [`loader`]) which:
//!
//! - resolves a [`crate::types::City`] to its CSV file under [`LoadOptions::data_dir`]
//! - reads the whole file into a [`crate::types::TripTable`], deriving month and weekday
//! - applies the month/day selectors through [`crate::processing::filter()`]
//! - optionally reports success/failure/alerts to a [`LoadObserver`]
//!
//! The raw CSV reader is available under [`csv`].

pub mod csv;
pub mod loader;
pub mod observability;

pub use loader::{load, load_by_name, load_city, LoadOptions, LoadRequest};
pub use observability::{
    CompositeObserver, FileObserver, LoadContext, LoadObserver, LoadSeverity, LoadStats, LogObserver,
};
