use bikeshare_explorer::processing::{filter, station_stats, time_stats, DayFilter, MonthFilter};
use bikeshare_explorer::types::{DayOfWeek, Month, TripRecord, TripSchema, TripTable};
use chrono::NaiveDate;
use proptest::prelude::*;

fn trip_strategy() -> impl Strategy<Value = TripRecord> {
    (1u32..=6, 1u32..=28, 0u32..24, 0usize..4, 0usize..4, 1u32..5_000).prop_map(
        |(month, day, hour, start, end, secs)| {
            let ts = NaiveDate::from_ymd_opt(2017, month, day)
                .and_then(|d| d.and_hms_opt(hour, 0, 0))
                .expect("generated date is valid");
            TripRecord::new(ts)
                .expect("generated month is within january..june")
                .with_duration(f64::from(secs))
                .with_stations(format!("S{start}"), format!("S{end}"))
        },
    )
}

fn table_strategy() -> impl Strategy<Value = TripTable> {
    prop::collection::vec(trip_strategy(), 0..60)
        .prop_map(|rows| TripTable::new(TripSchema::default(), rows))
}

fn month_filter_strategy() -> impl Strategy<Value = MonthFilter> {
    prop_oneof![
        Just(MonthFilter::All),
        prop::sample::select(Month::ALL.to_vec()).prop_map(MonthFilter::Only),
    ]
}

fn day_filter_strategy() -> impl Strategy<Value = DayFilter> {
    prop_oneof![
        Just(DayFilter::All),
        prop::sample::select(DayOfWeek::ALL.to_vec()).prop_map(DayFilter::Only),
    ]
}

/// `true` if `sub` appears in `full` in the same relative order.
fn is_ordered_subsequence(sub: &[TripRecord], full: &[TripRecord]) -> bool {
    let mut it = full.iter();
    sub.iter().all(|s| it.any(|f| f == s))
}

proptest! {
    #[test]
    fn identity_filter_keeps_table(table in table_strategy()) {
        prop_assert_eq!(filter(&table, MonthFilter::All, DayFilter::All), table);
    }

    #[test]
    fn filter_is_ordered_subset(
        table in table_strategy(),
        month in month_filter_strategy(),
        day in day_filter_strategy(),
    ) {
        let out = filter(&table, month, day);
        prop_assert!(out.row_count() <= table.row_count());
        prop_assert!(is_ordered_subsequence(&out.rows, &table.rows));
        prop_assert_eq!(out.schema, table.schema);
        for r in &out.rows {
            prop_assert!(month.matches(r.month()));
            prop_assert!(day.matches(r.day_of_week()));
        }
        // Every dropped row fails at least one selector.
        let kept = table
            .rows
            .iter()
            .filter(|r| month.matches(r.month()) && day.matches(r.day_of_week()))
            .count();
        prop_assert_eq!(kept, out.row_count());
    }

    #[test]
    fn refiltering_with_all_is_a_no_op(
        table in table_strategy(),
        month in month_filter_strategy(),
        day in day_filter_strategy(),
    ) {
        let once = filter(&table, month, day);
        prop_assert_eq!(filter(&once, MonthFilter::All, DayFilter::All), once.clone());
        prop_assert_eq!(filter(&once, month, day), once);
    }

    #[test]
    fn analyses_are_repeatable(table in table_strategy()) {
        match (time_stats(&table), time_stats(&table)) {
            (Ok(a), Ok(b)) => prop_assert_eq!(a, b),
            (Err(a), Err(b)) => prop_assert!(a.is_empty_result() && b.is_empty_result()),
            _ => prop_assert!(false, "time_stats disagreed with itself"),
        }
        match (station_stats(&table), station_stats(&table)) {
            (Ok(a), Ok(b)) => prop_assert_eq!(a, b),
            (Err(a), Err(b)) => prop_assert!(a.is_empty_result() && b.is_empty_result()),
            _ => prop_assert!(false, "station_stats disagreed with itself"),
        }
    }
}
