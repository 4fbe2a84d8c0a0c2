//! Record loader: city resolution, CSV load and filter composition.
//!
//! Most callers use [`load`], which resolves a [`City`] to its dataset inside
//! [`LoadOptions::data_dir`], reads every trip, and hands the table to
//! [`crate::processing::filter()`]. [`load_by_name`] does the same starting from raw,
//! unvalidated selector strings.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::BikeshareResult;
use crate::processing::{filter, DayFilter, MonthFilter};
use crate::types::{City, TripTable};

use super::csv;
use super::observability::{LoadContext, LoadObserver, LoadSeverity, LoadStats};

/// Options controlling where datasets are read from and who hears about it.
#[derive(Clone)]
pub struct LoadOptions {
    /// Directory containing `chicago.csv`, `new_york_city.csv` and `washington.csv`.
    pub data_dir: PathBuf,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn LoadObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: LoadSeverity,
}

impl fmt::Debug for LoadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadOptions")
            .field("data_dir", &self.data_dir)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            observer: None,
            alert_at_or_above: LoadSeverity::Critical,
        }
    }
}

impl LoadOptions {
    /// Options reading from `data_dir` with no observer.
    pub fn with_data_dir(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    /// Path of the dataset backing `city`.
    pub fn dataset_path(&self, city: City) -> PathBuf {
        self.data_dir.join(city.file_name())
    }
}

/// Read the whole, unfiltered dataset for `city`.
///
/// When an observer is configured this reports `on_success` with row stats, or `on_failure`
/// (plus `on_alert` at or above `options.alert_at_or_above`) with the computed severity.
pub fn load_city(city: City, options: &LoadOptions) -> BikeshareResult<TripTable> {
    let ctx = LoadContext {
        city,
        path: options.dataset_path(city),
    };

    let result = csv::ingest_csv_from_path(&ctx.path);

    if let Some(obs) = options.observer.as_ref() {
        match &result {
            Ok(table) => obs.on_success(
                &ctx,
                LoadStats {
                    rows: table.row_count(),
                    has_gender: table.schema.has_gender,
                    has_birth_year: table.schema.has_birth_year,
                },
            ),
            Err(e) => {
                let sev = LoadSeverity::for_error(e);
                obs.on_failure(&ctx, sev, e);
                if sev >= options.alert_at_or_above {
                    obs.on_alert(&ctx, sev, e);
                }
            }
        }
    }

    result
}

/// Load `city` and keep only trips matching both selectors.
pub fn load(
    city: City,
    month: MonthFilter,
    day: DayFilter,
    options: &LoadOptions,
) -> BikeshareResult<TripTable> {
    let table = load_city(city, options)?;
    let filtered = filter(&table, month, day);
    log::debug!(
        "filtered city={} month={} day={} rows={}/{}",
        city,
        month,
        day,
        filtered.row_count(),
        table.row_count()
    );
    Ok(filtered)
}

/// [`load`] from raw selector strings, validating each one first.
///
/// Fails with `UnknownCity`, `InvalidMonth` or `InvalidDay` before touching the filesystem.
pub fn load_by_name(
    city: &str,
    month: &str,
    day: &str,
    options: &LoadOptions,
) -> BikeshareResult<TripTable> {
    let city: City = city.parse()?;
    let month: MonthFilter = month.parse()?;
    let day: DayFilter = day.parse()?;
    load(city, month, day, options)
}

/// An owned, validated load request; the unit of work for one analysis cycle.
#[derive(Debug, Clone)]
pub struct LoadRequest {
    pub city: City,
    pub month: MonthFilter,
    pub day: DayFilter,
    pub options: LoadOptions,
}

impl LoadRequest {
    /// Execute the request by calling [`load`].
    pub fn run(&self) -> BikeshareResult<TripTable> {
        load(self.city, self.month, self.day, &self.options)
    }
}
