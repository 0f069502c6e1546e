//! Cleaned readings and their time-of-day buckets.

use std::fmt;

use chrono::{NaiveDate, NaiveTime, Timelike as _};
use serde::{Deserialize, Serialize};

use crate::{
    daily::DailySummary,
    sheet::{SensorSheet, SheetError},
};

/// Part of the day a reading was taken in.
///
/// Buckets are `Morning` `[04:00, 11:00)`, `Midday` `[11:00, 17:00)` and
/// `Evening` for everything else, including the small hours.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    Morning,
    Midday,
    Evening,
}

impl TimeOfDay {
    pub const ALL: [Self; 3] = [Self::Morning, Self::Midday, Self::Evening];
    pub const LEN: usize = Self::ALL.len();

    /// ```
    /// use chrono::NaiveTime;
    /// use climastat_analysis::reading::TimeOfDay;
    ///
    /// let at = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
    /// assert_eq!(TimeOfDay::from_time(at(4, 0)), TimeOfDay::Morning);
    /// assert_eq!(TimeOfDay::from_time(at(10, 59)), TimeOfDay::Morning);
    /// assert_eq!(TimeOfDay::from_time(at(11, 0)), TimeOfDay::Midday);
    /// assert_eq!(TimeOfDay::from_time(at(17, 0)), TimeOfDay::Evening);
    /// assert_eq!(TimeOfDay::from_time(at(2, 30)), TimeOfDay::Evening);
    /// ```
    #[must_use]
    pub fn from_time(time: NaiveTime) -> Self {
        match time.hour() {
            4..=10 => Self::Morning,
            11..=16 => Self::Midday,
            _ => Self::Evening,
        }
    }

    /// Position in [`TimeOfDay::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Midday => "midday",
            Self::Evening => "evening",
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A single temperature/humidity reading in °C and %RH.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub time_of_day: TimeOfDay,
    pub temperature: f64,
    pub humidity: f64,
}

/// Everything derived from one location's sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationData {
    pub location: String,
    pub readings: Vec<Reading>,
    pub days: Vec<DailySummary>,
    /// Rows dropped because a value was missing.
    pub skipped_rows: usize,
    /// Dates dropped because a time-of-day bucket had no reading.
    pub incomplete_days: Vec<NaiveDate>,
}

impl LocationData {
    /// Cleans a sheet and derives its daily summaries.
    ///
    /// ```
    /// use climastat_analysis::{reading::LocationData, sheet::SensorSheet};
    ///
    /// let sheet: SensorSheet = serde_json::from_str(r#"{
    ///     "location": "Study",
    ///     "rows": [
    ///         { "date": "2024-03-01", "time": "07:00", "temperature": "19,5", "humidity": 50 },
    ///         { "date": "2024-03-01", "time": "13:00", "temperature": 22.5, "humidity": 44 },
    ///         { "date": "2024-03-01", "time": "20:00", "temperature": 21.0, "humidity": 47 },
    ///         { "date": "2024-03-02", "time": "07:00", "temperature": 19.0, "humidity": null }
    ///     ]
    /// }"#).unwrap();
    /// let data = LocationData::from_sheet(&sheet).unwrap();
    /// assert_eq!(data.readings.len(), 3);
    /// assert_eq!(data.skipped_rows, 1);
    /// assert_eq!(data.days.len(), 1);
    /// assert_eq!(data.days[0].temperature_range, 3.0);
    /// ```
    pub fn from_sheet(sheet: &SensorSheet) -> Result<Self, SheetError> {
        let mut readings = Vec::with_capacity(sheet.rows.len());
        let mut skipped_rows = 0;
        for (index, row) in sheet.rows.iter().enumerate() {
            let Some(clean) = row.clean(index, sheet.temperature_unit)? else {
                skipped_rows += 1;
                continue;
            };
            readings.push(Reading {
                date: clean.date,
                time: clean.time,
                time_of_day: TimeOfDay::from_time(clean.time),
                temperature: clean.temperature,
                humidity: clean.humidity,
            });
        }
        if skipped_rows > 0 {
            tracing::warn!(
                location = %sheet.location,
                skipped_rows,
                "skipped rows with missing values"
            );
        }

        let (days, incomplete_days) = DailySummary::from_readings(&readings);
        if !incomplete_days.is_empty() {
            tracing::warn!(
                location = %sheet.location,
                dropped = incomplete_days.len(),
                "dropped days without a reading in every time-of-day bucket"
            );
        }
        tracing::debug!(
            location = %sheet.location,
            readings = readings.len(),
            days = days.len(),
            "loaded location"
        );

        Ok(Self {
            location: sheet.location.clone(),
            readings,
            days,
            skipped_rows,
            incomplete_days,
        })
    }

    /// Temperature and humidity columns over all readings.
    #[must_use]
    pub fn reading_columns(&self) -> (Vec<f64>, Vec<f64>) {
        self.readings
            .iter()
            .map(|reading| (reading.temperature, reading.humidity))
            .unzip()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::{SheetRow, SheetValue, TemperatureUnit};

    fn sheet_row(date: (i32, u32, u32), hour: u32, temperature: &str, humidity: f64) -> SheetRow {
        SheetRow {
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
            temperature: Some(SheetValue::Text(temperature.to_owned())),
            humidity: Some(SheetValue::Number(humidity)),
        }
    }

    #[test]
    fn test_bucket_boundaries() {
        let bucket = |h, m, s| TimeOfDay::from_time(NaiveTime::from_hms_opt(h, m, s).unwrap());
        assert_eq!(bucket(3, 59, 59), TimeOfDay::Evening);
        assert_eq!(bucket(4, 0, 0), TimeOfDay::Morning);
        assert_eq!(bucket(10, 59, 59), TimeOfDay::Morning);
        assert_eq!(bucket(11, 0, 0), TimeOfDay::Midday);
        assert_eq!(bucket(16, 59, 59), TimeOfDay::Midday);
        assert_eq!(bucket(23, 0, 0), TimeOfDay::Evening);
    }

    #[test]
    fn test_index_matches_all() {
        for (i, tod) in TimeOfDay::ALL.into_iter().enumerate() {
            assert_eq!(tod.index(), i);
        }
    }

    #[test]
    fn test_from_sheet_converts_kelvin() {
        let sheet = SensorSheet {
            location: "Lab".to_owned(),
            temperature_unit: TemperatureUnit::Kelvin,
            rows: vec![
                sheet_row((2024, 1, 5), 8, "293,15", 40.0),
                sheet_row((2024, 1, 5), 12, "295,15", 38.0),
                sheet_row((2024, 1, 5), 19, "294,15", 42.0),
            ],
        };
        let data = LocationData::from_sheet(&sheet).unwrap();
        assert_eq!(data.location, "Lab");
        assert!((data.readings[0].temperature - 20.0).abs() < 1e-9);
        assert_eq!(data.days.len(), 1);
        assert!((data.days[0].temperature_mean - 21.0).abs() < 1e-9);
        assert!((data.days[0].humidity_range - 4.0).abs() < 1e-12);
        assert!(data.incomplete_days.is_empty());
    }

    #[test]
    fn test_from_sheet_propagates_parse_errors() {
        let sheet = SensorSheet {
            location: "Lab".to_owned(),
            temperature_unit: TemperatureUnit::Celsius,
            rows: vec![
                sheet_row((2024, 1, 5), 8, "20", 40.0),
                sheet_row((2024, 1, 5), 12, "2O,5", 38.0),
            ],
        };
        assert!(matches!(
            LocationData::from_sheet(&sheet),
            Err(SheetError::InvalidValue { row: 1, .. })
        ));
    }

    #[test]
    fn test_reading_columns() {
        let sheet = SensorSheet {
            location: "Lab".to_owned(),
            temperature_unit: TemperatureUnit::Celsius,
            rows: vec![
                sheet_row((2024, 1, 5), 8, "20", 40.0),
                sheet_row((2024, 1, 5), 12, "21", 38.0),
            ],
        };
        let data = LocationData::from_sheet(&sheet).unwrap();
        let (temperature, humidity) = data.reading_columns();
        assert_eq!(temperature, vec![20.0, 21.0]);
        assert_eq!(humidity, vec![40.0, 38.0]);
        assert_eq!(data.incomplete_days.len(), 1);
    }
}
