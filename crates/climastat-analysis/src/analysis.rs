//! Named analyses over two locations.
//!
//! Each analysis is run independently: a failure in one (too few days, a
//! constant variable, ...) is recorded as [`AnalysisOutcome::Failed`] and
//! does not prevent the others from completing.

use climastat_stats::{
    StatsError,
    anova::{RmAnovaResult, repeated_measures_anova},
    comprehensive::ComprehensiveStats,
    correlation::{CorrelationResult, pearson},
};
use serde::Serialize;

use crate::{
    reading::LocationData,
    sample::{Quantity, Sample, Variable},
    selector::{ComparisonError, ComparisonResult, TestSelector},
};

pub const DEFAULT_HISTOGRAM_BINS: usize = 10;

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum AnalysisError {
    #[display("{_0}")]
    Comparison(ComparisonError),
    #[display("{_0}")]
    Statistics(StatsError),
}

/// Result of one analysis step, kept even when the step failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalysisOutcome<T> {
    Completed(T),
    Failed { error: String },
}

impl<T> AnalysisOutcome<T> {
    fn from_result(result: Result<T, AnalysisError>, context: &str) -> Self {
        match result {
            Ok(value) => Self::Completed(value),
            Err(err) => {
                tracing::warn!(context, error = %err, "analysis step failed");
                Self::Failed {
                    error: err.to_string(),
                }
            }
        }
    }

    #[must_use]
    pub fn completed(&self) -> Option<&T> {
        match self {
            Self::Completed(value) => Some(value),
            Self::Failed { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableComparison {
    pub variable: Variable,
    pub n_first: usize,
    pub n_second: usize,
    pub outcome: AnalysisOutcome<ComparisonResult>,
}

/// Every requested variable compared between two locations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationComparison {
    pub first: String,
    pub second: String,
    pub alpha: f64,
    pub variables: Vec<VariableComparison>,
}

impl LocationComparison {
    #[must_use]
    pub fn run(
        selector: &TestSelector,
        first: &LocationData,
        second: &LocationData,
        variables: &[Variable],
    ) -> Self {
        let variables = variables
            .iter()
            .map(|&variable| {
                let a = Sample::from_location(first, variable);
                let b = Sample::from_location(second, variable);
                let result = selector
                    .compare_samples(&a, &b, variable.label())
                    .map_err(AnalysisError::Comparison);
                VariableComparison {
                    variable,
                    n_first: a.len(),
                    n_second: b.len(),
                    outcome: AnalysisOutcome::from_result(result, variable.label()),
                }
            })
            .collect();
        Self {
            first: first.location.clone(),
            second: second.location.clone(),
            alpha: selector.alpha(),
            variables,
        }
    }
}

/// Whether a quantity differs between morning, midday and evening.
///
/// Days are the subjects and the three time-of-day buckets the repeated
/// conditions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeOfDayEffect {
    pub location: String,
    pub quantity: Quantity,
    pub days: usize,
    pub outcome: AnalysisOutcome<RmAnovaResult>,
}

impl TimeOfDayEffect {
    #[must_use]
    pub fn run(data: &LocationData, quantity: Quantity) -> Self {
        let rows = data
            .days
            .iter()
            .map(|day| day.buckets(quantity).to_vec())
            .collect::<Vec<_>>();
        let result = repeated_measures_anova(&rows).map_err(AnalysisError::Statistics);
        let context = format!("{} {quantity} by time of day", data.location);
        Self {
            location: data.location.clone(),
            quantity,
            days: rows.len(),
            outcome: AnalysisOutcome::from_result(result, &context),
        }
    }
}

/// Pearson correlation between temperature and humidity over all readings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuantityCorrelation {
    pub location: String,
    pub outcome: AnalysisOutcome<CorrelationResult>,
}

impl QuantityCorrelation {
    #[must_use]
    pub fn run(data: &LocationData) -> Self {
        let (temperature, humidity) = data.reading_columns();
        let result = pearson(&temperature, &humidity).map_err(AnalysisError::Statistics);
        let context = format!("{} temperature/humidity correlation", data.location);
        Self {
            location: data.location.clone(),
            outcome: AnalysisOutcome::from_result(result, &context),
        }
    }
}

/// Descriptive statistics of one variable at one location.
#[derive(Debug, Clone, Serialize)]
pub struct DistributionSummary {
    pub location: String,
    pub variable: Variable,
    /// `None` when the location has no complete days.
    pub summary: Option<ComprehensiveStats>,
}

impl DistributionSummary {
    #[must_use]
    pub fn run(data: &LocationData, variable: Variable, histogram_bins: usize) -> Self {
        let sample = Sample::from_location(data, variable);
        Self {
            location: data.location.clone(),
            variable,
            summary: ComprehensiveStats::new(sample.values(), histogram_bins),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationOverview {
    pub location: String,
    pub readings: usize,
    pub days: usize,
    pub skipped_rows: usize,
    pub incomplete_days: usize,
}

impl From<&LocationData> for LocationOverview {
    fn from(data: &LocationData) -> Self {
        Self {
            location: data.location.clone(),
            readings: data.readings.len(),
            days: data.days.len(),
            skipped_rows: data.skipped_rows,
            incomplete_days: data.incomplete_days.len(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub selector: TestSelector,
    pub variables: Vec<Variable>,
    pub histogram_bins: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            selector: TestSelector::default(),
            variables: Variable::ALL.to_vec(),
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
        }
    }
}

/// All analyses for a pair of locations.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub locations: Vec<LocationOverview>,
    pub distributions: Vec<DistributionSummary>,
    pub comparison: LocationComparison,
    pub time_of_day: Vec<TimeOfDayEffect>,
    pub correlations: Vec<QuantityCorrelation>,
}

impl AnalysisReport {
    #[must_use]
    pub fn build(first: &LocationData, second: &LocationData, config: &ReportConfig) -> Self {
        let pair = [first, second];
        let distributions = pair
            .into_iter()
            .flat_map(|data| {
                config.variables.iter().map(move |&variable| {
                    DistributionSummary::run(data, variable, config.histogram_bins)
                })
            })
            .collect();
        let time_of_day = pair
            .into_iter()
            .flat_map(|data| {
                Quantity::ALL
                    .into_iter()
                    .map(move |quantity| TimeOfDayEffect::run(data, quantity))
            })
            .collect();
        Self {
            locations: pair.into_iter().map(LocationOverview::from).collect(),
            distributions,
            comparison: LocationComparison::run(&config.selector, first, second, &config.variables),
            time_of_day,
            correlations: pair.into_iter().map(QuantityCorrelation::run).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::daily::DailySummary;

    fn location(name: &str, days: &[([f64; 3], [f64; 3])]) -> LocationData {
        LocationData {
            location: name.to_owned(),
            readings: vec![],
            days: days
                .iter()
                .zip(1..)
                .map(|(&(t, h), d)| {
                    DailySummary::new(NaiveDate::from_ymd_opt(2024, 4, d).unwrap(), t, h)
                })
                .collect(),
            skipped_rows: 0,
            incomplete_days: vec![],
        }
    }

    fn warm_room() -> LocationData {
        location(
            "Warm",
            &[
                ([20.0, 24.0, 22.0], [50.0, 41.0, 46.0]),
                ([21.0, 25.5, 22.5], [52.0, 40.0, 47.0]),
                ([19.5, 23.0, 21.0], [49.0, 43.0, 45.0]),
                ([20.5, 24.5, 23.0], [51.0, 42.0, 48.0]),
                ([21.5, 26.0, 22.0], [53.0, 39.0, 46.5]),
                ([20.0, 23.5, 21.5], [50.5, 41.5, 44.0]),
            ],
        )
    }

    fn cool_room() -> LocationData {
        location(
            "Cool",
            &[
                ([15.0, 17.0, 16.0], [60.0, 55.0, 58.0]),
                ([14.5, 17.5, 15.5], [61.0, 54.0, 57.5]),
                ([15.5, 16.5, 16.5], [59.0, 56.5, 58.5]),
                ([16.0, 18.0, 15.0], [62.0, 53.0, 57.0]),
                ([14.0, 17.0, 16.0], [60.5, 55.5, 59.0]),
                ([15.0, 18.5, 16.0], [58.5, 54.5, 56.0]),
            ],
        )
    }

    #[test]
    fn test_location_comparison_covers_requested_variables() {
        let comparison = LocationComparison::run(
            &TestSelector::default(),
            &warm_room(),
            &cool_room(),
            &[Variable::TemperatureMean, Variable::HumidityMean],
        );
        assert_eq!(comparison.first, "Warm");
        assert_eq!(comparison.variables.len(), 2);
        let t_mean = comparison.variables[0].outcome.completed().unwrap();
        assert_eq!(t_mean.label, "T_Mean");
        // Holds for either branch: six fully separated days give exact p = 2/924
        assert!(t_mean.final_p_value() < 0.01);
        assert_eq!(comparison.variables[0].n_first, 6);
    }

    #[test]
    fn test_comparison_failure_is_recorded() {
        let short = location("Short", &[([20.0, 22.0, 21.0], [50.0, 45.0, 47.0])]);
        let comparison = LocationComparison::run(
            &TestSelector::default(),
            &warm_room(),
            &short,
            &[Variable::TemperatureMean],
        );
        let AnalysisOutcome::Failed { error } = &comparison.variables[0].outcome else {
            panic!("expected a failed comparison");
        };
        assert!(error.contains("sample B"), "{error}");
    }

    #[test]
    fn test_time_of_day_effect_detects_midday_peak() {
        let effect = TimeOfDayEffect::run(&warm_room(), Quantity::Temperature);
        assert_eq!(effect.days, 6);
        let anova = effect.outcome.completed().unwrap();
        assert_eq!(anova.conditions, 3);
        assert!(anova.p_value < 0.001);
        assert!(anova.condition_means[1] > anova.condition_means[0]);
    }

    #[test]
    fn test_correlation_without_readings_fails() {
        let correlation = QuantityCorrelation::run(&warm_room());
        assert!(correlation.outcome.completed().is_none());
    }

    #[test]
    fn test_distribution_summary() {
        let summary = DistributionSummary::run(&warm_room(), Variable::TemperatureRange, 4);
        let stats = summary.summary.unwrap();
        assert_eq!(stats.stats.count, 6);
        assert_eq!(stats.stats.min, 3.5);
        assert_eq!(stats.stats.max, 4.5);
        assert_eq!(stats.histogram.bins.len(), 4);

        let empty = location("Empty", &[]);
        assert!(DistributionSummary::run(&empty, Variable::TemperatureMean, 4)
            .summary
            .is_none());
    }

    #[test]
    fn test_report_contains_every_analysis() {
        let report = AnalysisReport::build(&warm_room(), &cool_room(), &ReportConfig::default());
        assert_eq!(report.locations.len(), 2);
        assert_eq!(report.distributions.len(), 2 * Variable::ALL.len());
        assert_eq!(report.comparison.variables.len(), Variable::ALL.len());
        assert_eq!(report.time_of_day.len(), 4);
        assert_eq!(report.correlations.len(), 2);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["comparison"]["variables"][0]["outcome"]["status"], "completed");
        assert_eq!(json["correlations"][0]["outcome"]["status"], "failed");
        assert!(
            report
                .comparison
                .variables
                .iter()
                .all(|v| v.outcome.completed().is_some())
        );
    }
}
