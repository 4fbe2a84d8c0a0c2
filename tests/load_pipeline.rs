use std::sync::{Arc, Mutex};

use bikeshare_explorer::execution::{ExecutionEngine, ExecutionOptions};
use bikeshare_explorer::ingestion::{
    load, load_by_name, load_city, FileObserver, LoadContext, LoadObserver, LoadOptions,
    LoadRequest, LoadSeverity, LoadStats,
};
use bikeshare_explorer::processing::{
    station_stats, time_stats, trip_duration_stats, user_stats, Availability, BirthYearStats,
    DayFilter, MonthFilter,
};
use bikeshare_explorer::types::{City, DayOfWeek, Month};
use bikeshare_explorer::BikeshareError;

fn fixtures() -> LoadOptions {
    LoadOptions::with_data_dir("tests/fixtures")
}

fn durations(table: &bikeshare_explorer::types::TripTable) -> Vec<f64> {
    table.rows.iter().filter_map(|r| r.trip_duration).collect()
}

#[derive(Default)]
struct RecordingObserver {
    successes: Mutex<Vec<LoadStats>>,
    failures: Mutex<Vec<LoadSeverity>>,
    alerts: Mutex<Vec<LoadSeverity>>,
}

impl LoadObserver for RecordingObserver {
    fn on_success(&self, _ctx: &LoadContext, stats: LoadStats) {
        self.successes.lock().unwrap().push(stats);
    }

    fn on_failure(&self, _ctx: &LoadContext, severity: LoadSeverity, _error: &BikeshareError) {
        self.failures.lock().unwrap().push(severity);
    }

    fn on_alert(&self, _ctx: &LoadContext, severity: LoadSeverity, _error: &BikeshareError) {
        self.alerts.lock().unwrap().push(severity);
    }
}

#[test]
fn full_chicago_statistics() {
    let table = load(City::Chicago, MonthFilter::All, DayFilter::All, &fixtures()).unwrap();
    assert_eq!(table.row_count(), 6);

    let time = time_stats(&table).unwrap();
    // January, March and June tie at two trips each.
    assert_eq!(time.most_common_month, Month::January);
    assert_eq!(time.most_common_day, DayOfWeek::Monday);
    assert_eq!(time.most_common_hour, 8);

    let stations = station_stats(&table).unwrap();
    assert_eq!(stations.most_common_start_station, "Clark St");
    assert_eq!(stations.most_common_end_station, "Lake St");
    assert_eq!(
        stations.most_common_trip,
        ("Clark St".to_string(), "Lake St".to_string())
    );

    let duration = trip_duration_stats(&table).unwrap();
    assert_eq!(duration.total_travel_time, 3600.0);
    assert_eq!(duration.mean_travel_time, 600.0);

    let users = user_stats(&table).unwrap();
    assert_eq!(
        users.user_type_counts,
        vec![("Subscriber".to_string(), 4), ("Customer".to_string(), 2)]
    );
    assert_eq!(
        users.gender_counts,
        Availability::Available(vec![("Male".to_string(), 3), ("Female".to_string(), 2)])
    );
    assert_eq!(
        users.birth_year,
        Availability::Available(BirthYearStats {
            earliest: 1972,
            most_recent: 2001,
            most_common: 1985,
        })
    );
}

#[test]
fn monday_filter_matches_any_input_case() {
    for input in ["Monday", "monday", "MONDAY"] {
        let table = load_by_name("chicago", "all", input, &fixtures()).unwrap();
        assert!(table.rows.iter().all(|r| r.day_of_week() == DayOfWeek::Monday));
        assert_eq!(durations(&table), vec![600.0, 900.0, 450.0]);
    }
}

#[test]
fn month_and_day_filters_combine() {
    let table = load(
        City::Chicago,
        MonthFilter::Only(Month::March),
        DayFilter::Only(DayOfWeek::Friday),
        &fixtures(),
    )
    .unwrap();
    assert_eq!(durations(&table), vec![1200.0]);
}

#[test]
fn february_filter_yields_empty_table_and_empty_results() {
    let table = load_by_name("Chicago", "february", "all", &fixtures()).unwrap();
    assert!(table.is_empty());

    assert!(time_stats(&table).unwrap_err().is_empty_result());
    assert!(station_stats(&table).unwrap_err().is_empty_result());
    assert!(trip_duration_stats(&table).unwrap_err().is_empty_result());
    assert!(user_stats(&table).unwrap_err().is_empty_result());
}

#[test]
fn washington_user_stats_report_unavailable_columns() {
    let table = load_by_name("washington", "all", "all", &fixtures()).unwrap();
    let users = user_stats(&table).unwrap();
    assert_eq!(users.gender_counts, Availability::Unavailable);
    assert_eq!(users.birth_year, Availability::Unavailable);
    assert_eq!(
        users.user_type_counts,
        vec![("Subscriber".to_string(), 2), ("Customer".to_string(), 1)]
    );

    let duration = trip_duration_stats(&table).unwrap();
    assert!((duration.total_travel_time - 1528.866).abs() < 1e-9);
    assert!((duration.mean_travel_time - 1528.866 / 3.0).abs() < 1e-9);
}

#[test]
fn blank_cells_are_skipped_by_statistics() {
    let table = load_by_name("new york city", "january", "sunday", &fixtures()).unwrap();
    assert_eq!(table.row_count(), 3);

    let users = user_stats(&table).unwrap();
    assert_eq!(users.user_type_counts, vec![("Subscriber".to_string(), 2)]);
    assert_eq!(
        users.gender_counts,
        Availability::Available(vec![("Female".to_string(), 1), ("Male".to_string(), 1)])
    );
    assert_eq!(
        users.birth_year,
        Availability::Available(BirthYearStats {
            earliest: 1965,
            most_recent: 1987,
            most_common: 1965,
        })
    );
}

#[test]
fn invalid_selectors_fail_before_loading() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = LoadOptions {
        observer: Some(obs.clone()),
        ..fixtures()
    };

    assert!(matches!(
        load_by_name("boston", "all", "all", &opts),
        Err(BikeshareError::UnknownCity { .. })
    ));
    assert!(matches!(
        load_by_name("chicago", "july", "all", &opts),
        Err(BikeshareError::InvalidMonth { .. })
    ));
    assert!(matches!(
        load_by_name("chicago", "all", "someday", &opts),
        Err(BikeshareError::InvalidDay { .. })
    ));

    assert!(obs.successes.lock().unwrap().is_empty());
    assert!(obs.failures.lock().unwrap().is_empty());
}

#[test]
fn observer_receives_success_stats() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = LoadOptions {
        observer: Some(obs.clone()),
        ..fixtures()
    };

    load_city(City::Washington, &opts).unwrap();

    let successes = obs.successes.lock().unwrap().clone();
    assert_eq!(
        successes,
        vec![LoadStats {
            rows: 3,
            has_gender: false,
            has_birth_year: false,
        }]
    );
}

#[test]
fn missing_dataset_is_critical_and_alerts() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = LoadOptions {
        data_dir: "tests/fixtures/does_not_exist".into(),
        observer: Some(obs.clone()),
        alert_at_or_above: LoadSeverity::Critical,
    };

    let err = load_city(City::Chicago, &opts).unwrap_err();
    assert!(matches!(err, BikeshareError::Csv(_) | BikeshareError::Io(_)));

    assert_eq!(*obs.failures.lock().unwrap(), vec![LoadSeverity::Critical]);
    assert_eq!(*obs.alerts.lock().unwrap(), vec![LoadSeverity::Critical]);
}

#[test]
fn malformed_dataset_fails_without_alert() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = LoadOptions {
        data_dir: "tests/fixtures/broken".into(),
        observer: Some(obs.clone()),
        alert_at_or_above: LoadSeverity::Critical,
    };

    let err = load_city(City::Chicago, &opts).unwrap_err();
    assert!(matches!(err, BikeshareError::MalformedTimestamp { .. }));
    assert_eq!(*obs.failures.lock().unwrap(), vec![LoadSeverity::Error]);
    assert!(obs.alerts.lock().unwrap().is_empty());
}

#[test]
fn file_observer_appends_lines() {
    let log_path = std::env::temp_dir().join(format!(
        "bikeshare-explorer-load-{}.log",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&log_path);

    let opts = LoadOptions {
        observer: Some(Arc::new(FileObserver::new(&log_path))),
        ..fixtures()
    };
    load_city(City::Washington, &opts).unwrap();
    let _ = load_city(City::Chicago, &LoadOptions {
        data_dir: "tests/fixtures/broken".into(),
        ..opts.clone()
    });

    let text = std::fs::read_to_string(&log_path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("ok city=Washington"));
    assert!(lines[0].contains("rows=3"));
    assert!(lines[1].contains("fail severity=Error city=Chicago"));
    let _ = std::fs::remove_file(&log_path);
}

#[test]
fn load_request_matches_engine_filter_over_full_load() {
    let request = LoadRequest {
        city: City::Chicago,
        month: MonthFilter::Only(Month::June),
        day: DayFilter::All,
        options: fixtures(),
    };
    let via_request = request.run().unwrap();
    assert_eq!(durations(&via_request), vec![450.0, 150.0]);

    let engine = ExecutionEngine::new(ExecutionOptions {
        chunk_size: 2,
        ..Default::default()
    })
    .unwrap();
    let full = load_city(City::Chicago, &fixtures()).unwrap();
    assert_eq!(engine.filter(&full, request.month, request.day), via_request);
}

#[test]
fn engine_runs_every_analysis_on_loaded_table() {
    let table = load(City::Chicago, MonthFilter::All, DayFilter::All, &fixtures()).unwrap();
    let engine = ExecutionEngine::new(ExecutionOptions::default()).unwrap();

    let report = engine.run_all(&table);
    assert_eq!(report.rows, 6);
    assert_eq!(
        report.trip_duration.result.unwrap().total_travel_time,
        3600.0
    );
    assert_eq!(
        report.stations.result.unwrap().most_common_start_station,
        "Clark St"
    );
}
