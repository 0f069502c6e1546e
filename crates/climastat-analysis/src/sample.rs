//! Labeled samples of derived daily variables.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::reading::LocationData;

/// A derived per-day variable compared between locations.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Variable {
    #[serde(rename = "T_Mean")]
    TemperatureMean,
    #[serde(rename = "T_Range")]
    TemperatureRange,
    #[serde(rename = "RH_Mean")]
    HumidityMean,
    #[serde(rename = "RH_Range")]
    HumidityRange,
}

impl Variable {
    pub const ALL: [Self; 4] = [
        Self::TemperatureMean,
        Self::TemperatureRange,
        Self::HumidityMean,
        Self::HumidityRange,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::TemperatureMean => "T_Mean",
            Self::TemperatureRange => "T_Range",
            Self::HumidityMean => "RH_Mean",
            Self::HumidityRange => "RH_Range",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::TemperatureMean => "daily mean temperature",
            Self::TemperatureRange => "daily temperature range",
            Self::HumidityMean => "daily mean relative humidity",
            Self::HumidityRange => "daily relative humidity range",
        }
    }

    #[must_use]
    pub const fn quantity(self) -> Quantity {
        match self {
            Self::TemperatureMean | Self::TemperatureRange => Quantity::Temperature,
            Self::HumidityMean | Self::HumidityRange => Quantity::Humidity,
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown variable '{name}' (expected T_Mean, T_Range, RH_Mean or RH_Range)")]
pub struct UnknownVariable {
    pub name: String,
}

impl FromStr for Variable {
    type Err = UnknownVariable;

    /// Parses a label case-insensitively.
    ///
    /// ```
    /// use climastat_analysis::sample::Variable;
    ///
    /// assert_eq!("RH_Range".parse(), Ok(Variable::HumidityRange));
    /// assert_eq!("t_mean".parse(), Ok(Variable::TemperatureMean));
    /// assert!("dew_point".parse::<Variable>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|variable| variable.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownVariable { name: s.to_owned() })
    }
}

/// A raw measured quantity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Quantity {
    Temperature,
    Humidity,
}

impl Quantity {
    pub const ALL: [Self; 2] = [Self::Temperature, Self::Humidity];

    #[must_use]
    pub const fn unit(self) -> &'static str {
        match self {
            Self::Temperature => "°C",
            Self::Humidity => "%RH",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// An ordered sequence of observations of one variable from one group.
///
/// Construction never fails; values are validated by the test that consumes
/// them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    label: String,
    values: Vec<f64>,
}

impl Sample {
    #[must_use]
    pub fn new(label: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            values,
        }
    }

    /// One value per complete day of `data`, labeled with the location.
    #[must_use]
    pub fn from_location(data: &LocationData, variable: Variable) -> Self {
        Self::new(
            data.location.clone(),
            data.days.iter().map(|day| day.value(variable)).collect(),
        )
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
