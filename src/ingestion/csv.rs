//! CSV ingestion of bikeshare trip logs.

use std::path::Path;

use chrono::{Datelike, NaiveDateTime};

use crate::error::{BikeshareError, BikeshareResult};
use crate::types::{TripRecord, TripSchema, TripTable};

pub const START_TIME: &str = "Start Time";
pub const END_TIME: &str = "End Time";
pub const TRIP_DURATION: &str = "Trip Duration";
pub const START_STATION: &str = "Start Station";
pub const END_STATION: &str = "End Station";
pub const USER_TYPE: &str = "User Type";
pub const GENDER: &str = "Gender";
pub const BIRTH_YEAR: &str = "Birth Year";

const REQUIRED_COLUMNS: [&str; 6] = [
    START_TIME,
    END_TIME,
    TRIP_DURATION,
    START_STATION,
    END_STATION,
    USER_TYPE,
];

const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Ingest a trip CSV file into an in-memory [`TripTable`].
///
/// Rules:
///
/// - CSV must have headers.
/// - Headers must contain every required trip column (order can differ, extra columns are
///   ignored). `Gender` and `Birth Year` are optional and recorded in [`TripSchema`].
/// - Every `Start Time` must parse; the first bad one fails the whole load.
pub fn ingest_csv_from_path(path: impl AsRef<Path>) -> BikeshareResult<TripTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    ingest_csv_from_reader(&mut rdr)
}

/// Ingest trip CSV data from an existing CSV reader.
pub fn ingest_csv_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
) -> BikeshareResult<TripTable> {
    let headers = rdr.headers()?.clone();
    let position = |name: &str| headers.iter().position(|h| h.trim() == name);

    let mut required = [0usize; REQUIRED_COLUMNS.len()];
    for (slot, name) in required.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = position(name).ok_or_else(|| BikeshareError::SchemaMismatch {
            message: format!(
                "missing required column '{name}'. headers={:?}",
                headers.iter().collect::<Vec<_>>()
            ),
        })?;
    }
    let [start_idx, end_idx, duration_idx, start_station_idx, end_station_idx, user_type_idx] =
        required;
    let gender_idx = position(GENDER);
    let birth_year_idx = position(BIRTH_YEAR);

    let schema = TripSchema {
        has_gender: gender_idx.is_some(),
        has_birth_year: birth_year_idx.is_some(),
    };

    let mut rows = Vec::new();
    for (row_idx0, result) in rdr.records().enumerate() {
        // Report 1-based row number for users; +1 again because header is row 1.
        let user_row = row_idx0 + 2;
        let record = result?;
        let cell = |idx: usize| record.get(idx).unwrap_or("");

        let start_time = parse_start_time(user_row, cell(start_idx))?;
        let mut trip = TripRecord::new(start_time).ok_or(BikeshareError::MonthOutOfRange {
            row: user_row,
            month: start_time.month(),
        })?;

        trip.end_time = parse_text(cell(end_idx));
        trip.trip_duration = parse_duration(user_row, cell(duration_idx))?;
        trip.start_station = parse_text(cell(start_station_idx));
        trip.end_station = parse_text(cell(end_station_idx));
        trip.user_type = parse_text(cell(user_type_idx));
        trip.gender = gender_idx.and_then(|idx| parse_text(cell(idx)));
        trip.birth_year = match birth_year_idx {
            Some(idx) => parse_birth_year(user_row, cell(idx))?,
            None => None,
        };
        rows.push(trip);
    }

    Ok(TripTable::new(schema, rows))
}

/// Parse a raw start-time cell.
pub fn parse_start_time(row: usize, raw: &str) -> BikeshareResult<NaiveDateTime> {
    let trimmed = raw.trim();
    let mut last_err = None;
    for fmt in TIMESTAMP_FORMATS {
        match NaiveDateTime::parse_from_str(trimmed, fmt) {
            Ok(ts) => return Ok(ts),
            Err(e) => last_err = Some(e),
        }
    }
    Err(BikeshareError::MalformedTimestamp {
        row,
        raw: raw.to_owned(),
        message: last_err
            .map(|e| e.to_string())
            .unwrap_or_else(|| "unrecognised timestamp".to_string()),
    })
}

fn parse_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

fn parse_duration(row: usize, raw: &str) -> BikeshareResult<Option<f64>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(Some(v)),
        Ok(_) => Err(parse_error(row, TRIP_DURATION, raw, "expected a non-negative number of seconds")),
        Err(e) => Err(parse_error(row, TRIP_DURATION, raw, &e.to_string())),
    }
}

/// Birth years are stored as floats (`1992.0`) in some datasets; they are truncated to integers.
fn parse_birth_year(row: usize, raw: &str) -> BikeshareResult<Option<i32>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if let Ok(v) = trimmed.parse::<i32>() {
        return Ok(Some(v));
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() && v.abs() < i32::MAX as f64 => Ok(Some(v.trunc() as i32)),
        Ok(_) => Err(parse_error(row, BIRTH_YEAR, raw, "birth year out of range")),
        Err(e) => Err(parse_error(row, BIRTH_YEAR, raw, &e.to_string())),
    }
}

fn parse_error(row: usize, column: &str, raw: &str, message: &str) -> BikeshareError {
    BikeshareError::ParseError {
        row,
        column: column.to_owned(),
        raw: raw.to_owned(),
        message: message.to_owned(),
    }
}
