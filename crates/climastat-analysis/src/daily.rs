//! Per-day summaries of the three time-of-day readings.
//!
//! A day contributes one observation to each derived [`Variable`]: the mean
//! and the range (max − min) of its morning, midday and evening values.
//! Days missing any bucket are dropped; several readings in the same bucket
//! are averaged first.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    reading::{Reading, TimeOfDay},
    sample::{Quantity, Variable},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    /// Temperature per [`TimeOfDay`], indexed by [`TimeOfDay::index`].
    pub temperature: [f64; TimeOfDay::LEN],
    /// Humidity per [`TimeOfDay`], indexed by [`TimeOfDay::index`].
    pub humidity: [f64; TimeOfDay::LEN],
    pub temperature_mean: f64,
    pub temperature_range: f64,
    pub humidity_mean: f64,
    pub humidity_range: f64,
}

#[derive(Debug, Default, Clone, Copy)]
struct BucketSum {
    temperature: f64,
    humidity: f64,
    count: u32,
}

impl BucketSum {
    fn mean(self) -> Option<(f64, f64)> {
        (self.count > 0).then(|| {
            let n = f64::from(self.count);
            (self.temperature / n, self.humidity / n)
        })
    }
}

impl DailySummary {
    /// Groups readings by date, returning complete days in date order and the
    /// dates that were dropped for a missing bucket.
    ///
    /// ```
    /// use chrono::{NaiveDate, NaiveTime};
    /// use climastat_analysis::{
    ///     daily::DailySummary,
    ///     reading::{Reading, TimeOfDay},
    /// };
    ///
    /// let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    /// let reading = |hour, temperature, humidity| {
    ///     let time = NaiveTime::from_hms_opt(hour, 0, 0).unwrap();
    ///     Reading { date, time, time_of_day: TimeOfDay::from_time(time), temperature, humidity }
    /// };
    /// let readings = [reading(7, 18.0, 60.0), reading(13, 24.0, 45.0), reading(21, 21.0, 54.0)];
    ///
    /// let (days, dropped) = DailySummary::from_readings(&readings);
    /// assert!(dropped.is_empty());
    /// assert_eq!(days[0].temperature_mean, 21.0);
    /// assert_eq!(days[0].temperature_range, 6.0);
    /// assert_eq!(days[0].humidity_mean, 53.0);
    /// assert_eq!(days[0].humidity_range, 15.0);
    /// ```
    #[must_use]
    pub fn from_readings(readings: &[Reading]) -> (Vec<Self>, Vec<NaiveDate>) {
        let mut by_date: BTreeMap<NaiveDate, [BucketSum; TimeOfDay::LEN]> = BTreeMap::new();
        for reading in readings {
            let bucket = &mut by_date.entry(reading.date).or_default()[reading.time_of_day.index()];
            bucket.temperature += reading.temperature;
            bucket.humidity += reading.humidity;
            bucket.count += 1;
        }

        let mut days = vec![];
        let mut incomplete = vec![];
        for (date, buckets) in by_date {
            let Some(means) = buckets.map(BucketSum::mean).into_iter().collect::<Option<Vec<_>>>()
            else {
                tracing::debug!(%date, "day is missing a time-of-day bucket");
                incomplete.push(date);
                continue;
            };
            let mut temperature = [0.0; TimeOfDay::LEN];
            let mut humidity = [0.0; TimeOfDay::LEN];
            for (i, (t, h)) in means.into_iter().enumerate() {
                temperature[i] = t;
                humidity[i] = h;
            }
            days.push(Self::new(date, temperature, humidity));
        }
        (days, incomplete)
    }

    #[must_use]
    pub fn new(
        date: NaiveDate,
        temperature: [f64; TimeOfDay::LEN],
        humidity: [f64; TimeOfDay::LEN],
    ) -> Self {
        let (temperature_mean, temperature_range) = mean_and_range(&temperature);
        let (humidity_mean, humidity_range) = mean_and_range(&humidity);
        Self {
            date,
            temperature,
            humidity,
            temperature_mean,
            temperature_range,
            humidity_mean,
            humidity_range,
        }
    }

    /// Value of a derived variable for this day.
    #[must_use]
    pub fn value(&self, variable: Variable) -> f64 {
        match variable {
            Variable::TemperatureMean => self.temperature_mean,
            Variable::TemperatureRange => self.temperature_range,
            Variable::HumidityMean => self.humidity_mean,
            Variable::HumidityRange => self.humidity_range,
        }
    }

    /// Per-bucket values of a measured quantity.
    #[must_use]
    pub fn buckets(&self, quantity: Quantity) -> &[f64; TimeOfDay::LEN] {
        match quantity {
            Quantity::Temperature => &self.temperature,
            Quantity::Humidity => &self.humidity,
        }
    }
}

#[expect(clippy::cast_precision_loss)]
fn mean_and_range(values: &[f64]) -> (f64, f64) {
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    (mean, max - min)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;

    use super::*;

    fn reading(day: u32, hour: u32, temperature: f64, humidity: f64) -> Reading {
        let time = NaiveTime::from_hms_opt(hour, 0, 0).unwrap();
        Reading {
            date: NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
            time,
            time_of_day: TimeOfDay::from_time(time),
            temperature,
            humidity,
        }
    }

    #[test]
    fn test_incomplete_days_are_dropped() {
        let readings = [
            reading(2, 7, 18.0, 60.0),
            reading(2, 13, 24.0, 45.0),
            reading(1, 7, 17.0, 61.0),
            reading(1, 13, 23.0, 47.0),
            reading(1, 22, 20.0, 55.0),
        ];
        let (days, dropped) = DailySummary::from_readings(&readings);
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(dropped, vec![NaiveDate::from_ymd_opt(2024, 6, 2).unwrap()]);
    }

    #[test]
    fn test_duplicate_bucket_readings_are_averaged() {
        let readings = [
            reading(1, 6, 16.0, 62.0),
            reading(1, 9, 18.0, 58.0),
            reading(1, 13, 23.0, 47.0),
            reading(1, 19, 20.0, 55.0),
        ];
        let (days, _) = DailySummary::from_readings(&readings);
        assert_eq!(days[0].temperature, [17.0, 23.0, 20.0]);
        assert_eq!(days[0].humidity, [60.0, 47.0, 55.0]);
        assert_eq!(days[0].temperature_range, 6.0);
        assert_eq!(days[0].humidity_range, 13.0);
    }

    #[test]
    fn test_days_are_sorted_by_date() {
        let readings = (1..=3)
            .rev()
            .flat_map(|day| {
                [7, 13, 20].map(|hour| reading(day, hour, f64::from(day), 50.0))
            })
            .collect::<Vec<_>>();
        let (days, _) = DailySummary::from_readings(&readings);
        let dates = days.iter().map(|d| d.date.format("%d").to_string()).collect::<Vec<_>>();
        assert_eq!(dates, ["01", "02", "03"]);
        assert_eq!(days[2].value(Variable::TemperatureMean), 3.0);
        assert_eq!(days[2].value(Variable::HumidityRange), 0.0);
    }

    #[test]
    fn test_buckets_by_quantity() {
        let day = DailySummary::new(
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            [1.0, 2.0, 3.0],
            [4.0, 5.0, 6.0],
        );
        assert_eq!(day.buckets(Quantity::Temperature), &[1.0, 2.0, 3.0]);
        assert_eq!(day.buckets(Quantity::Humidity), &[4.0, 5.0, 6.0]);
        assert_eq!(day.value(Variable::HumidityMean), 5.0);
    }
}
