//! Synthetic sensor sheets
//!
//! Produces three readings a day with a midday temperature peak and a
//! matching humidity dip, plus Gaussian noise. Useful for trying out the
//! analysis commands without real sensor exports.

use std::path::PathBuf;

use anyhow::Context;
use chrono::{Days, NaiveDate, NaiveTime};
use clap::Args;
use climastat_analysis::{
    reading::TimeOfDay,
    sheet::{SensorSheet, SheetRow, SheetValue, TemperatureUnit},
};
use rand::{Rng, SeedableRng as _};
use rand_distr::{Distribution as _, Normal};
use rand_pcg::Pcg64;

use crate::util;

const BASE_TEMPERATURE: f64 = 20.0;
const BASE_HUMIDITY: f64 = 50.0;
const TEMPERATURE_NOISE: f64 = 0.6;
const HUMIDITY_NOISE: f64 = 2.0;
/// Humidity change per degree of temperature deviation.
const HUMIDITY_PER_DEGREE: f64 = -1.5;

/// Nominal hour and mean offsets for each time of day.
const SCHEDULE: [(TimeOfDay, u32, f64, f64); TimeOfDay::LEN] = [
    (TimeOfDay::Morning, 7, -1.5, 4.0),
    (TimeOfDay::Midday, 13, 2.0, -5.0),
    (TimeOfDay::Evening, 20, 0.5, 1.0),
];

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub enum UnitArg {
    #[default]
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl From<UnitArg> for TemperatureUnit {
    fn from(unit: UnitArg) -> Self {
        match unit {
            UnitArg::Celsius => TemperatureUnit::Celsius,
            UnitArg::Fahrenheit => TemperatureUnit::Fahrenheit,
            UnitArg::Kelvin => TemperatureUnit::Kelvin,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub(crate) struct GenerateReadingsArg {
    /// Location name written into the sheet
    #[arg(long)]
    pub location: String,
    /// Number of days to generate
    #[arg(long, default_value_t = 30)]
    pub days: u64,
    /// First day of the series (YYYY-MM-DD)
    #[arg(long, default_value = "2024-01-01")]
    pub start_date: NaiveDate,
    /// Random seed; a random one is used when omitted
    #[arg(long)]
    pub seed: Option<u64>,
    /// Added to every temperature, in °C
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub temperature_offset: f64,
    /// Added to every humidity, in %RH
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub humidity_offset: f64,
    /// Unit temperatures are written in (Celsius, Fahrenheit or Kelvin)
    #[arg(long, default_value = "Celsius")]
    pub unit: UnitArg,
    /// Write values as text with a decimal comma
    #[arg(long)]
    pub decimal_comma: bool,
    /// Probability that a row's humidity cell is left empty
    #[arg(long, default_value_t = 0.0)]
    pub missing_rate: f64,
    /// Output file path (stdout when omitted)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &GenerateReadingsArg) -> anyhow::Result<()> {
    anyhow::ensure!(
        (0.0..=1.0).contains(&arg.missing_rate),
        "--missing-rate must be between 0 and 1, got {}",
        arg.missing_rate
    );
    let seed = arg.seed.unwrap_or_else(rand::random);
    tracing::info!(location = %arg.location, days = arg.days, seed, "generating readings");

    let mut rng = Pcg64::seed_from_u64(seed);
    let sheet = generate_sheet(arg, &mut rng)?;
    util::emit_json(&sheet, arg.output.as_deref())?;
    Ok(())
}

fn generate_sheet<R>(arg: &GenerateReadingsArg, rng: &mut R) -> anyhow::Result<SensorSheet>
where
    R: Rng,
{
    let temperature_noise = Normal::new(0.0, TEMPERATURE_NOISE)?;
    let humidity_noise = Normal::new(0.0, HUMIDITY_NOISE)?;
    let unit = TemperatureUnit::from(arg.unit);

    let mut rows = vec![];
    for day in 0..arg.days {
        let date = arg
            .start_date
            .checked_add_days(Days::new(day))
            .with_context(|| format!("Date out of range: {} + {day} days", arg.start_date))?;
        // Slow drift shared by all readings of the day
        let day_shift = temperature_noise.sample(rng);
        for (time_of_day, hour, t_offset, h_offset) in SCHEDULE {
            let time = NaiveTime::from_hms_opt(hour, rng.random_range(0..60), 0)
                .with_context(|| format!("Invalid {time_of_day} time"))?;
            let deviation = t_offset + day_shift + temperature_noise.sample(rng);
            let temperature = BASE_TEMPERATURE + arg.temperature_offset + deviation;
            let humidity = (BASE_HUMIDITY
                + arg.humidity_offset
                + h_offset
                + HUMIDITY_PER_DEGREE * (deviation - t_offset)
                + humidity_noise.sample(rng))
            .clamp(0.0, 100.0);
            let humidity = (!rng.random_bool(arg.missing_rate))
                .then(|| cell(humidity, 1, arg.decimal_comma));
            rows.push(SheetRow {
                date,
                time,
                temperature: Some(cell(unit.from_celsius(temperature), 2, arg.decimal_comma)),
                humidity,
            });
        }
    }

    Ok(SensorSheet {
        location: arg.location.clone(),
        temperature_unit: unit,
        rows,
    })
}

fn cell(value: f64, decimals: usize, decimal_comma: bool) -> SheetValue {
    let text = format!("{value:.decimals$}");
    if decimal_comma {
        SheetValue::Text(text.replace('.', ","))
    } else {
        SheetValue::Number(text.parse().unwrap_or(value))
    }
}
