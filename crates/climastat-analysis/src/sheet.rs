//! Input sheets of sensor readings
//!
//! One sheet holds every reading taken at one location. Sheets are exported
//! from spreadsheets, so numeric cells frequently arrive as text with a
//! decimal comma, and temperature may be logged in a unit other than Celsius.
//!
//! # Serialization
//!
//! ```json
//! {
//!   "location": "Greenhouse",
//!   "temperature_unit": "celsius",
//!   "rows": [
//!     { "date": "2024-03-01", "time": "07:00", "temperature": "18,4", "humidity": 71.5 },
//!     { "date": "2024-03-01", "time": "14:00", "temperature": 24.1, "humidity": "55,0" },
//!     { "date": "2024-03-01", "time": "21:00", "temperature": null, "humidity": 64 }
//!   ]
//! }
//! ```
//!
//! `time` accepts `HH:MM` or `HH:MM:SS`. A `null` or absent cell marks a
//! missing value.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Absolute zero in degrees Celsius.
pub const ABSOLUTE_ZERO_CELSIUS: f64 = -273.15;

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum SheetError {
    #[display("row {row}: cannot parse {column} value '{text}' as a number")]
    InvalidValue {
        row: usize,
        column: &'static str,
        text: String,
    },
    #[display("row {row}: {column} value {value} is outside the physical range")]
    OutOfRange {
        row: usize,
        column: &'static str,
        value: f64,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl TemperatureUnit {
    /// Converts a temperature in this unit to degrees Celsius.
    ///
    /// ```
    /// use climastat_analysis::sheet::TemperatureUnit;
    ///
    /// assert_eq!(TemperatureUnit::Fahrenheit.to_celsius(212.0), 100.0);
    /// assert_eq!(TemperatureUnit::Kelvin.to_celsius(273.15), 0.0);
    /// ```
    #[must_use]
    pub fn to_celsius(self, value: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => value,
            TemperatureUnit::Fahrenheit => (value - 32.0) * 5.0 / 9.0,
            TemperatureUnit::Kelvin => value + ABSOLUTE_ZERO_CELSIUS,
        }
    }

    /// Converts degrees Celsius to this unit.
    #[must_use]
    pub fn from_celsius(self, celsius: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => celsius,
            TemperatureUnit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
            TemperatureUnit::Kelvin => celsius - ABSOLUTE_ZERO_CELSIUS,
        }
    }
}

/// A numeric spreadsheet cell, either a JSON number or text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SheetValue {
    Number(f64),
    Text(String),
}

impl SheetValue {
    /// Parses the cell, accepting a decimal comma in text cells.
    ///
    /// Returns `None` for text that is not a finite number.
    ///
    /// ```
    /// use climastat_analysis::sheet::SheetValue;
    ///
    /// assert_eq!(SheetValue::Text("21,4".to_owned()).parse(), Some(21.4));
    /// assert_eq!(SheetValue::Text(" 55.0 ".to_owned()).parse(), Some(55.0));
    /// assert_eq!(SheetValue::Number(18.0).parse(), Some(18.0));
    /// assert_eq!(SheetValue::Text("n/a".to_owned()).parse(), None);
    /// ```
    #[must_use]
    pub fn parse(&self) -> Option<f64> {
        let value = match self {
            SheetValue::Number(value) => *value,
            SheetValue::Text(text) => text.trim().replace(',', ".").parse().ok()?,
        };
        value.is_finite().then_some(value)
    }

    /// Whether the cell holds only whitespace, as blank spreadsheet cells do.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        matches!(self, SheetValue::Text(text) if text.trim().is_empty())
    }

    fn text(&self) -> String {
        match self {
            SheetValue::Number(value) => value.to_string(),
            SheetValue::Text(text) => text.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetRow {
    pub date: NaiveDate,
    pub time: NaiveTime,
    #[serde(default)]
    pub temperature: Option<SheetValue>,
    #[serde(default)]
    pub humidity: Option<SheetValue>,
}

/// A cleaned row: both values present, converted to °C and %RH.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CleanRow {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub temperature: f64,
    pub humidity: f64,
}

impl SheetRow {
    /// Cleans the row; `Ok(None)` when a value is missing or blank.
    ///
    /// `row` is the zero-based row index used in error messages.
    pub fn clean(&self, row: usize, unit: TemperatureUnit) -> Result<Option<CleanRow>, SheetError> {
        let (Some(temperature), Some(humidity)) = (
            present(self.temperature.as_ref()),
            present(self.humidity.as_ref()),
        ) else {
            return Ok(None);
        };
        let temperature = parse_cell(temperature, row, "temperature")?;
        let temperature = unit.to_celsius(temperature);
        if temperature < ABSOLUTE_ZERO_CELSIUS {
            return Err(SheetError::OutOfRange {
                row,
                column: "temperature",
                value: temperature,
            });
        }
        let humidity = parse_cell(humidity, row, "humidity")?;
        if !(0.0..=100.0).contains(&humidity) {
            return Err(SheetError::OutOfRange {
                row,
                column: "humidity",
                value: humidity,
            });
        }
        Ok(Some(CleanRow {
            date: self.date,
            time: self.time,
            temperature,
            humidity,
        }))
    }
}

fn present(cell: Option<&SheetValue>) -> Option<&SheetValue> {
    cell.filter(|value| !value.is_blank())
}

fn parse_cell(value: &SheetValue, row: usize, column: &'static str) -> Result<f64, SheetError> {
    value.parse().ok_or_else(|| SheetError::InvalidValue {
        row,
        column,
        text: value.text(),
    })
}

/// All readings recorded at one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorSheet {
    pub location: String,
    #[serde(default)]
    pub temperature_unit: TemperatureUnit,
    pub rows: Vec<SheetRow>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::LocationData;

    fn row(temperature: Option<SheetValue>, humidity: Option<SheetValue>) -> SheetRow {
        SheetRow {
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            time: NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
            temperature,
            humidity,
        }
    }

    #[test]
    fn test_deserialize_mixed_cells() {
        let json = r#"{
            "location": "Attic",
            "temperature_unit": "fahrenheit",
            "rows": [
                { "date": "2024-03-01", "time": "07:00", "temperature": "68,0", "humidity": 40 },
                { "date": "2024-03-01", "time": "14:30:15", "humidity": null }
            ]
        }"#;
        let sheet: SensorSheet = serde_json::from_str(json).unwrap();
        assert_eq!(sheet.temperature_unit, TemperatureUnit::Fahrenheit);
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[0].temperature, Some(SheetValue::Text("68,0".to_owned())));
        assert_eq!(sheet.rows[1].temperature, None);
        assert_eq!(sheet.rows[1].humidity, None);
        assert_eq!(
            sheet.rows[1].time,
            NaiveTime::from_hms_opt(14, 30, 15).unwrap()
        );
    }

    #[test]
    fn test_default_unit_is_celsius() {
        let json = r#"{ "location": "Cellar", "rows": [] }"#;
        let sheet: SensorSheet = serde_json::from_str(json).unwrap();
        assert_eq!(sheet.temperature_unit, TemperatureUnit::Celsius);
    }

    #[test]
    fn test_clean_converts_units() {
        let clean = row(
            Some(SheetValue::Text("68,0".to_owned())),
            Some(SheetValue::Number(40.0)),
        )
        .clean(0, TemperatureUnit::Fahrenheit)
        .unwrap()
        .unwrap();
        assert!((clean.temperature - 20.0).abs() < 1e-12);
        assert_eq!(clean.humidity, 40.0);
    }

    #[test]
    fn test_clean_skips_missing() {
        let cleaned = row(None, Some(SheetValue::Number(40.0)))
            .clean(0, TemperatureUnit::Celsius)
            .unwrap();
        assert!(cleaned.is_none());
    }

    #[test]
    fn test_clean_skips_blank_text_cells() {
        for blank in ["", "   "] {
            let cleaned = row(
                Some(SheetValue::Text("19,5".to_owned())),
                Some(SheetValue::Text(blank.to_owned())),
            )
            .clean(0, TemperatureUnit::Celsius)
            .unwrap();
            assert!(cleaned.is_none(), "blank = {blank:?}");
        }
    }

    #[test]
    fn test_blank_humidity_row_is_counted_as_skipped() {
        let json = r#"{
            "location": "Hall",
            "rows": [
                { "date": "2024-03-01", "time": "07:00", "temperature": "19,5", "humidity": "" },
                { "date": "2024-03-01", "time": "13:00", "temperature": 22.0, "humidity": 44 }
            ]
        }"#;
        let sheet: SensorSheet = serde_json::from_str(json).unwrap();
        let data = LocationData::from_sheet(&sheet).unwrap();
        assert_eq!(data.skipped_rows, 1);
        assert_eq!(data.readings.len(), 1);
    }

    #[test]
    fn test_clean_rejects_garbage_and_out_of_range() {
        let err = row(
            Some(SheetValue::Text("warm".to_owned())),
            Some(SheetValue::Number(40.0)),
        )
        .clean(3, TemperatureUnit::Celsius)
        .unwrap_err();
        assert_eq!(
            err,
            SheetError::InvalidValue {
                row: 3,
                column: "temperature",
                text: "warm".to_owned()
            }
        );

        let err = row(
            Some(SheetValue::Number(20.0)),
            Some(SheetValue::Text("104,5".to_owned())),
        )
        .clean(4, TemperatureUnit::Celsius)
        .unwrap_err();
        assert!(matches!(
            err,
            SheetError::OutOfRange {
                row: 4,
                column: "humidity",
                ..
            }
        ));
    }
}
