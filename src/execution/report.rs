use std::time::Duration;

use serde::Serialize;
use serde_json::{json, Value as JsonValue};

use crate::error::BikeshareResult;
use crate::processing::{Analysis, DurationStats, StationStats, TimeStats, UserStats};

/// Result of one analysis plus how long it took.
#[derive(Debug)]
pub struct AnalysisOutcome<T> {
    pub analysis: Analysis,
    pub result: BikeshareResult<T>,
    pub elapsed: Duration,
}

impl<T: Serialize> AnalysisOutcome<T> {
    /// JSON form: the summary record, or `{"error": ..., "no_data": bool}`.
    pub fn to_json(&self) -> serde_json::Result<JsonValue> {
        match &self.result {
            Ok(v) => serde_json::to_value(v),
            Err(e) => Ok(json!({
                "error": e.to_string(),
                "no_data": e.is_empty_result(),
            })),
        }
    }
}

/// The four summaries for one filtered table.
#[derive(Debug)]
pub struct StatsReport {
    /// Rows the analyses ran over.
    pub rows: usize,
    pub time_of_travel: AnalysisOutcome<TimeStats>,
    pub stations: AnalysisOutcome<StationStats>,
    pub trip_duration: AnalysisOutcome<DurationStats>,
    pub users: AnalysisOutcome<UserStats>,
}

impl StatsReport {
    /// Elapsed time per analysis, in [`Analysis::ALL`] order.
    pub fn timings(&self) -> [(Analysis, Duration); 4] {
        [
            (self.time_of_travel.analysis, self.time_of_travel.elapsed),
            (self.stations.analysis, self.stations.elapsed),
            (self.trip_duration.analysis, self.trip_duration.elapsed),
            (self.users.analysis, self.users.elapsed),
        ]
    }

    pub fn to_json(&self) -> serde_json::Result<JsonValue> {
        let mut out = serde_json::Map::new();
        out.insert("rows".to_string(), json!(self.rows));
        out.insert(
            Analysis::TimeOfTravel.name().to_string(),
            self.time_of_travel.to_json()?,
        );
        out.insert(Analysis::Stations.name().to_string(), self.stations.to_json()?);
        out.insert(
            Analysis::TripDuration.name().to_string(),
            self.trip_duration.to_json()?,
        );
        out.insert(Analysis::Users.name().to_string(), self.users.to_json()?);
        Ok(JsonValue::Object(out))
    }
}
