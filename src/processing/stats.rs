//! The four trip analyses.
//!
//! Each analysis is a pure function from `&TripTable` to a small summary record. They share no
//! state, so they can run in any order or concurrently (see [`crate::execution`]).
//!
//! Empty policy: every analysis returns [`BikeshareError::EmptyResult`] on a zero-row table, and
//! likewise when a required column has no present values among the rows. Optional columns never
//! fail an analysis: an absent column is [`Availability::Unavailable`], a present column with no
//! values in the selection is [`Availability::NoData`].

use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::{BikeshareError, BikeshareResult};
use crate::types::{DayOfWeek, Month, TripTable};

use super::reduce::{mode, reduce, value_counts, ReduceOp};

/// Identifies one of the four analyses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Analysis {
    TimeOfTravel,
    Stations,
    TripDuration,
    Users,
}

impl Analysis {
    pub const ALL: [Analysis; 4] = [
        Analysis::TimeOfTravel,
        Analysis::Stations,
        Analysis::TripDuration,
        Analysis::Users,
    ];

    /// Short machine name, used as JSON key and in logs.
    pub fn name(self) -> &'static str {
        match self {
            Analysis::TimeOfTravel => "time_of_travel",
            Analysis::Stations => "stations",
            Analysis::TripDuration => "trip_duration",
            Analysis::Users => "users",
        }
    }

    /// Heading shown while the analysis runs.
    pub fn title(self) -> &'static str {
        match self {
            Analysis::TimeOfTravel => "The Most Frequent Times of Travel",
            Analysis::Stations => "The Most Popular Stations and Trip",
            Analysis::TripDuration => "Trip Duration",
            Analysis::Users => "User Stats",
        }
    }
}

impl fmt::Display for Analysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A result that depends on an optional column.
#[derive(Debug, Clone, PartialEq)]
pub enum Availability<T> {
    Available(T),
    /// The column is absent from this city's dataset.
    Unavailable,
    /// The column exists but every selected row leaves it blank.
    NoData,
}

impl<T> Availability<T> {
    pub fn as_option(&self) -> Option<&T> {
        match self {
            Availability::Available(v) => Some(v),
            Availability::Unavailable | Availability::NoData => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available(_))
    }
}

impl<T: Serialize> Serialize for Availability<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Availability::Available(v) => v.serialize(serializer),
            Availability::Unavailable => serializer.serialize_str("unavailable"),
            Availability::NoData => serializer.serialize_str("no_data"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeStats {
    pub most_common_month: Month,
    pub most_common_day: DayOfWeek,
    /// Hour of day, 0..=23.
    pub most_common_hour: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationStats {
    pub most_common_start_station: String,
    pub most_common_end_station: String,
    /// `(start, end)` pair with the most trips.
    pub most_common_trip: (String, String),
}

/// Both values in seconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationStats {
    pub total_travel_time: f64,
    pub mean_travel_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BirthYearStats {
    pub earliest: i32,
    pub most_recent: i32,
    pub most_common: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserStats {
    /// Descending by count, ties in encounter order.
    pub user_type_counts: Vec<(String, usize)>,
    pub gender_counts: Availability<Vec<(String, usize)>>,
    pub birth_year: Availability<BirthYearStats>,
}

fn ensure_rows(table: &TripTable, analysis: Analysis) -> BikeshareResult<()> {
    if table.is_empty() {
        return Err(BikeshareError::EmptyResult {
            statistic: analysis.name(),
        });
    }
    Ok(())
}

fn require<T>(value: Option<T>, statistic: &'static str) -> BikeshareResult<T> {
    value.ok_or(BikeshareError::EmptyResult { statistic })
}

/// Most common month, weekday and start hour.
pub fn time_stats(table: &TripTable) -> BikeshareResult<TimeStats> {
    ensure_rows(table, Analysis::TimeOfTravel)?;
    let rows = &table.rows;

    Ok(TimeStats {
        most_common_month: require(mode(rows.iter().map(|r| r.month())), "month")?,
        most_common_day: require(most_common_day(table), "day_of_week")?,
        most_common_hour: require(mode(rows.iter().map(|r| r.hour())), "hour")?,
    })
}

/// Ties between weekdays go to the alphabetically first name (Friday before Monday).
fn most_common_day(table: &TripTable) -> Option<DayOfWeek> {
    let named = table.rows.iter().map(|r| {
        let day = r.day_of_week();
        (day.name(), day)
    });
    mode(named).map(|(_, day)| day)
}

/// Most used start station, end station and start→end trip.
pub fn station_stats(table: &TripTable) -> BikeshareResult<StationStats> {
    ensure_rows(table, Analysis::Stations)?;
    let rows = &table.rows;

    let start = mode(rows.iter().filter_map(|r| r.start_station.as_deref()));
    let end = mode(rows.iter().filter_map(|r| r.end_station.as_deref()));
    let trip = mode(
        rows.iter()
            .filter_map(|r| Some((r.start_station.as_deref()?, r.end_station.as_deref()?))),
    );

    let (trip_start, trip_end) = require(trip, "trip")?;
    Ok(StationStats {
        most_common_start_station: require(start, "start_station")?.to_owned(),
        most_common_end_station: require(end, "end_station")?.to_owned(),
        most_common_trip: (trip_start.to_owned(), trip_end.to_owned()),
    })
}

/// Total and mean trip duration.
pub fn trip_duration_stats(table: &TripTable) -> BikeshareResult<DurationStats> {
    ensure_rows(table, Analysis::TripDuration)?;
    let durations = || table.rows.iter().filter_map(|r| r.trip_duration);

    Ok(DurationStats {
        total_travel_time: require(reduce(durations(), ReduceOp::Sum), "trip_duration")?,
        mean_travel_time: require(reduce(durations(), ReduceOp::Mean), "trip_duration")?,
    })
}

/// User type counts, plus gender counts and birth-year extremes where the city records them.
pub fn user_stats(table: &TripTable) -> BikeshareResult<UserStats> {
    ensure_rows(table, Analysis::Users)?;
    let rows = &table.rows;

    let user_type_counts = owned_counts(value_counts(
        rows.iter().filter_map(|r| r.user_type.as_deref()),
    ));

    let gender_counts = if table.schema.has_gender {
        let counts = owned_counts(value_counts(rows.iter().filter_map(|r| r.gender.as_deref())));
        if counts.is_empty() {
            Availability::NoData
        } else {
            Availability::Available(counts)
        }
    } else {
        Availability::Unavailable
    };

    let birth_year = if table.schema.has_birth_year {
        birth_year_stats(rows.iter().filter_map(|r| r.birth_year))
            .map_or(Availability::NoData, Availability::Available)
    } else {
        Availability::Unavailable
    };

    Ok(UserStats {
        user_type_counts,
        gender_counts,
        birth_year,
    })
}

fn birth_year_stats<I>(years: I) -> Option<BirthYearStats>
where
    I: Iterator<Item = i32> + Clone,
{
    Some(BirthYearStats {
        earliest: years.clone().min()?,
        most_recent: years.clone().max()?,
        most_common: mode(years)?,
    })
}

fn owned_counts(counts: Vec<(&str, usize)>) -> Vec<(String, usize)> {
    counts
        .into_iter()
        .map(|(value, n)| (value.to_owned(), n))
        .collect()
}
