//! Core data model: selectors, trip records and the in-memory [`TripTable`].
//!
//! A [`TripTable`] is built once per analysis cycle by the loader, narrowed by the filter
//! engine, and then read (never written) by the statistics engine.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::Serialize;

use crate::error::BikeshareError;

/// Supported cities, each backed by one CSV file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum City {
    Chicago,
    NewYorkCity,
    Washington,
}

impl City {
    /// Every supported city, in prompt order.
    pub const ALL: [City; 3] = [City::Chicago, City::NewYorkCity, City::Washington];

    /// File name of the city's dataset inside the data directory.
    pub fn file_name(self) -> &'static str {
        match self {
            City::Chicago => "chicago.csv",
            City::NewYorkCity => "new_york_city.csv",
            City::Washington => "washington.csv",
        }
    }

    /// Human-readable name.
    pub fn display_name(self) -> &'static str {
        match self {
            City::Chicago => "Chicago",
            City::NewYorkCity => "New York City",
            City::Washington => "Washington",
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for City {
    type Err = BikeshareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase().replace('_', " ");
        match norm.as_str() {
            "chicago" => Ok(City::Chicago),
            "new york city" | "new york" | "nyc" => Ok(City::NewYorkCity),
            "washington" => Ok(City::Washington),
            _ => Err(BikeshareError::UnknownCity { name: s.to_owned() }),
        }
    }
}

/// Calendar month covered by the datasets (January..June only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(into = "u32")]
pub enum Month {
    January = 1,
    February = 2,
    March = 3,
    April = 4,
    May = 5,
    June = 6,
}

impl Month {
    /// All supported months in calendar order.
    pub const ALL: [Month; 6] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
    ];

    const NAMES: [&'static str; 6] = ["january", "february", "march", "april", "may", "june"];

    /// Month number, 1..=6.
    pub fn number(self) -> u32 {
        self as u32
    }

    /// Returns the month for a calendar month number, or `None` outside 1..=6.
    pub fn from_number(n: u32) -> Option<Self> {
        Self::ALL.get((n as usize).checked_sub(1)?).copied()
    }

    /// Look up a month by name (case-insensitive).
    pub fn from_name(name: &str) -> Result<Self, BikeshareError> {
        let lower = name.trim().to_ascii_lowercase();
        Self::NAMES
            .iter()
            .position(|n| *n == lower)
            .map(|idx| Self::ALL[idx])
            .ok_or_else(|| BikeshareError::InvalidMonth { name: name.to_owned() })
    }

    /// Title-cased month name.
    pub fn name(self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
        }
    }
}

impl From<Month> for u32 {
    fn from(m: Month) -> Self {
        m.number()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Month {
    type Err = BikeshareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

/// Day of the week, ordered Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    /// All days, Monday first.
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    /// Title-cased weekday name, e.g. `"Monday"`.
    pub fn name(self) -> &'static str {
        match self {
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
            DayOfWeek::Sunday => "Sunday",
        }
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(w: Weekday) -> Self {
        match w {
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
            Weekday::Sun => DayOfWeek::Sunday,
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DayOfWeek {
    type Err = BikeshareError;

    /// Matches weekday names case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|d| d.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| BikeshareError::InvalidDay { name: s.to_owned() })
    }
}

/// One trip from a city dataset.
///
/// `month` and `day_of_week` are derived from `start_time` when the record is created and
/// cannot be set independently, so they always agree with it.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRecord {
    start_time: NaiveDateTime,
    month: Month,
    day_of_week: DayOfWeek,
    /// Raw end time; carried through but not analysed.
    pub end_time: Option<String>,
    /// Trip duration in seconds.
    pub trip_duration: Option<f64>,
    pub start_station: Option<String>,
    pub end_station: Option<String>,
    pub user_type: Option<String>,
    pub gender: Option<String>,
    pub birth_year: Option<i32>,
}

impl TripRecord {
    /// Create a record from its start time, deriving `month` and `day_of_week`.
    ///
    /// Returns `None` when the start time falls outside January..June.
    pub fn new(start_time: NaiveDateTime) -> Option<Self> {
        let month = Month::from_number(start_time.month())?;
        Some(Self {
            start_time,
            month,
            day_of_week: start_time.weekday().into(),
            end_time: None,
            trip_duration: None,
            start_station: None,
            end_station: None,
            user_type: None,
            gender: None,
            birth_year: None,
        })
    }

    pub fn start_time(&self) -> NaiveDateTime {
        self.start_time
    }

    pub fn month(&self) -> Month {
        self.month
    }

    pub fn day_of_week(&self) -> DayOfWeek {
        self.day_of_week
    }

    /// Hour of day (0..=23) of the start time, computed on demand.
    pub fn hour(&self) -> u32 {
        self.start_time.hour()
    }

    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.trip_duration = Some(seconds);
        self
    }

    pub fn with_stations(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start_station = Some(start.into());
        self.end_station = Some(end.into());
        self
    }

    pub fn with_user_type(mut self, user_type: impl Into<String>) -> Self {
        self.user_type = Some(user_type.into());
        self
    }

    pub fn with_gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = Some(gender.into());
        self
    }

    pub fn with_birth_year(mut self, year: i32) -> Self {
        self.birth_year = Some(year);
        self
    }
}

/// Which optional columns a [`TripTable`] carries.
///
/// Decided once from the source header; the statistics engine consults these flags instead of
/// probing records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TripSchema {
    pub has_gender: bool,
    pub has_birth_year: bool,
}

impl TripSchema {
    /// Schema with every optional column present.
    pub fn full() -> Self {
        Self {
            has_gender: true,
            has_birth_year: true,
        }
    }
}

/// In-memory, ordered collection of trips for one analysis cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct TripTable {
    /// Optional-column capabilities.
    pub schema: TripSchema,
    /// Trips in source order.
    pub rows: Vec<TripRecord>,
}

impl TripTable {
    /// Create a table from schema and rows.
    pub fn new(schema: TripSchema, rows: Vec<TripRecord>) -> Self {
        Self { schema, rows }
    }

    /// Number of rows in the table.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Create a new table containing only rows that match `predicate`, in their original order.
    ///
    /// The returned table keeps the original schema; `self` is left untouched.
    pub fn filter_rows<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&TripRecord) -> bool,
    {
        let rows = self
            .rows
            .iter()
            .filter(|row| predicate(row))
            .cloned()
            .collect();
        Self {
            schema: self.schema,
            rows,
        }
    }

    /// Reduce (fold) all rows into an accumulator value.
    pub fn reduce_rows<A, F>(&self, init: A, reducer: F) -> A
    where
        F: FnMut(A, &TripRecord) -> A,
    {
        self.rows.iter().fold(init, reducer)
    }
}
