//! Month/day filtering for [`crate::types::TripTable`].

use std::fmt;
use std::str::FromStr;

use crate::error::BikeshareError;
use crate::types::{DayOfWeek, Month, TripRecord, TripTable};

const ALL: &str = "all";

/// Month selector: no filtering, or a single month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MonthFilter {
    #[default]
    All,
    Only(Month),
}

impl MonthFilter {
    /// Returns `true` if `month` passes the selector.
    pub fn matches(self, month: Month) -> bool {
        match self {
            MonthFilter::All => true,
            MonthFilter::Only(m) => m == month,
        }
    }
}

impl FromStr for MonthFilter {
    type Err = BikeshareError;

    /// `"all"` or a month name, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case(ALL) {
            Ok(MonthFilter::All)
        } else {
            Month::from_name(s).map(MonthFilter::Only)
        }
    }
}

impl fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthFilter::All => f.write_str(ALL),
            MonthFilter::Only(m) => write!(f, "{m}"),
        }
    }
}

/// Day-of-week selector: no filtering, or a single weekday.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DayFilter {
    #[default]
    All,
    Only(DayOfWeek),
}

impl DayFilter {
    pub fn matches(self, day: DayOfWeek) -> bool {
        match self {
            DayFilter::All => true,
            DayFilter::Only(d) => d == day,
        }
    }
}

impl FromStr for DayFilter {
    type Err = BikeshareError;

    /// `"all"` or a weekday name, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case(ALL) {
            Ok(DayFilter::All)
        } else {
            s.parse::<DayOfWeek>().map(DayFilter::Only)
        }
    }
}

impl fmt::Display for DayFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayFilter::All => f.write_str(ALL),
            DayFilter::Only(d) => write!(f, "{d}"),
        }
    }
}

/// Returns `true` if `record` passes both selectors.
pub fn matches(record: &TripRecord, month: MonthFilter, day: DayFilter) -> bool {
    month.matches(record.month()) && day.matches(record.day_of_week())
}

/// Returns a new [`TripTable`] holding the rows that pass both selectors, in original order.
///
/// An empty result is a valid outcome. `table` is not modified.
pub fn filter(table: &TripTable, month: MonthFilter, day: DayFilter) -> TripTable {
    if month == MonthFilter::All && day == DayFilter::All {
        return table.clone();
    }
    table.filter_rows(|row| matches(row, month, day))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TripSchema;
    use chrono::NaiveDate;

    fn trip(m: u32, d: u32) -> TripRecord {
        let ts = NaiveDate::from_ymd_opt(2017, m, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        TripRecord::new(ts).unwrap().with_duration((m * 100 + d) as f64)
    }

    fn sample_table() -> TripTable {
        // 2017-01-02 Mon, 2017-01-03 Tue, 2017-02-06 Mon, 2017-03-07 Tue
        TripTable::new(
            TripSchema::default(),
            vec![trip(1, 2), trip(1, 3), trip(2, 6), trip(3, 7)],
        )
    }

    fn durations(t: &TripTable) -> Vec<f64> {
        t.rows.iter().filter_map(|r| r.trip_duration).collect()
    }

    #[test]
    fn selectors_parse_all_and_names() {
        assert_eq!("ALL".parse::<MonthFilter>().unwrap(), MonthFilter::All);
        assert_eq!(
            "March".parse::<MonthFilter>().unwrap(),
            MonthFilter::Only(Month::March)
        );
        assert!(matches!(
            "july".parse::<MonthFilter>(),
            Err(BikeshareError::InvalidMonth { .. })
        ));
        assert_eq!("all".parse::<DayFilter>().unwrap(), DayFilter::All);
        assert_eq!(
            "monday".parse::<DayFilter>().unwrap(),
            DayFilter::Only(DayOfWeek::Monday)
        );
        assert!(matches!(
            "someday".parse::<DayFilter>(),
            Err(BikeshareError::InvalidDay { .. })
        ));
    }

    #[test]
    fn identity_filter_returns_every_row() {
        let t = sample_table();
        assert_eq!(filter(&t, MonthFilter::All, DayFilter::All), t);
    }

    #[test]
    fn month_filter_only() {
        let t = sample_table();
        let out = filter(&t, MonthFilter::Only(Month::January), DayFilter::All);
        assert_eq!(durations(&out), vec![102.0, 103.0]);
    }

    #[test]
    fn day_filter_only_preserves_order() {
        let t = sample_table();
        let out = filter(&t, MonthFilter::All, DayFilter::Only(DayOfWeek::Monday));
        assert_eq!(durations(&out), vec![102.0, 206.0]);
    }

    #[test]
    fn selectors_combine_conjunctively() {
        let t = sample_table();
        let out = filter(
            &t,
            MonthFilter::Only(Month::March),
            DayFilter::Only(DayOfWeek::Tuesday),
        );
        assert_eq!(durations(&out), vec![307.0]);

        let none = filter(
            &t,
            MonthFilter::Only(Month::March),
            DayFilter::Only(DayOfWeek::Monday),
        );
        assert!(none.is_empty());
        assert_eq!(none.schema, t.schema);
        assert_eq!(t.row_count(), 4);
    }
}
