//! Console rendering of a [`StatsReport`].

use std::fmt::Display;
use std::io::{self, Write};

use bikeshare_explorer::execution::{AnalysisOutcome, StatsReport};
use bikeshare_explorer::processing::{
    Availability, DayFilter, DurationStats, MonthFilter, StationStats, TimeStats, UserStats,
};
use bikeshare_explorer::types::City;
use bikeshare_explorer::BikeshareError;

pub const RULE: &str = "----------------------------------------";

pub fn write_header<W: Write>(
    out: &mut W,
    city: City,
    month: MonthFilter,
    day: DayFilter,
    rows: usize,
) -> io::Result<()> {
    writeln!(out, "{city} (month: {month}, day: {day}): {rows} trips")
}

pub fn write_report<W: Write>(out: &mut W, report: &StatsReport, timing: bool) -> io::Result<()> {
    write_section(out, &report.time_of_travel, timing, write_time)?;
    write_section(out, &report.stations, timing, write_stations)?;
    write_section(out, &report.trip_duration, timing, write_duration)?;
    write_section(out, &report.users, timing, write_users)
}

fn write_section<W: Write, T>(
    out: &mut W,
    outcome: &AnalysisOutcome<T>,
    timing: bool,
    body: fn(&mut W, &T) -> io::Result<()>,
) -> io::Result<()> {
    writeln!(out, "\nCalculating {}...\n", outcome.analysis.title())?;
    match &outcome.result {
        Ok(stats) => body(out, stats)?,
        Err(BikeshareError::EmptyResult { .. }) => writeln!(out, "No data for this filter.")?,
        Err(e) => writeln!(out, "Failed: {e}")?,
    }
    if timing {
        writeln!(out, "\nThis took {} seconds.", outcome.elapsed.as_secs_f64())?;
    }
    writeln!(out, "{RULE}")
}

fn write_time<W: Write>(out: &mut W, s: &TimeStats) -> io::Result<()> {
    writeln!(out, "The most common month: {}", s.most_common_month)?;
    writeln!(out, "The most common day of week: {}", s.most_common_day)?;
    writeln!(out, "The most common start hour: {}", s.most_common_hour)
}

fn write_stations<W: Write>(out: &mut W, s: &StationStats) -> io::Result<()> {
    writeln!(out, "The most commonly used start station: {}", s.most_common_start_station)?;
    writeln!(out, "The most commonly used end station: {}", s.most_common_end_station)?;
    let (start, end) = &s.most_common_trip;
    writeln!(out, "The most frequent trip: {start} -> {end}")
}

fn write_duration<W: Write>(out: &mut W, s: &DurationStats) -> io::Result<()> {
    writeln!(out, "Total travel time: {} seconds", s.total_travel_time)?;
    writeln!(out, "Mean travel time: {} seconds", s.mean_travel_time)
}

fn write_users<W: Write>(out: &mut W, s: &UserStats) -> io::Result<()> {
    writeln!(out, "Counts of user types:")?;
    write_counts(out, &s.user_type_counts)?;

    match &s.gender_counts {
        Availability::Available(counts) => {
            writeln!(out, "\nCounts of gender:")?;
            write_counts(out, counts)?;
        }
        Availability::Unavailable => writeln!(out, "\nGender data not available.")?,
        Availability::NoData => writeln!(out, "\nNo gender data for this filter.")?,
    }

    match &s.birth_year {
        Availability::Available(years) => {
            writeln!(out, "\nEarliest year of birth: {}", years.earliest)?;
            writeln!(out, "Most recent year of birth: {}", years.most_recent)?;
            writeln!(out, "Most common year of birth: {}", years.most_common)
        }
        Availability::Unavailable => writeln!(out, "\nBirth year data not available."),
        Availability::NoData => writeln!(out, "\nNo birth year data for this filter."),
    }
}

fn write_counts<W: Write, K: Display>(out: &mut W, counts: &[(K, usize)]) -> io::Result<()> {
    for (value, count) in counts {
        writeln!(out, "{value}: {count}")?;
    }
    Ok(())
}
