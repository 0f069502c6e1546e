use serde::Serialize;

/// Descriptive statistics summarizing a dataset.
///
/// Variance and standard deviation use the unbiased (`n - 1`) estimator, so
/// they match what the two-sample tests in this crate operate on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescriptiveStats {
    /// Number of values.
    pub count: usize,
    /// The minimum value in the dataset.
    pub min: f64,
    /// The maximum value in the dataset.
    pub max: f64,
    /// `max - min`.
    pub range: f64,
    /// The arithmetic mean of the dataset.
    pub mean: f64,
    /// The median; the midpoint of the two central values for an even count.
    pub median: f64,
    /// Sample variance. Zero for a single value.
    pub variance: f64,
    /// Sample standard deviation.
    pub std_dev: f64,
}

impl DescriptiveStats {
    /// Computes descriptive statistics from unsorted values.
    ///
    /// Returns `None` if the dataset is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// # use climastat_stats::descriptive::DescriptiveStats;
    /// let values = [5.0, 2.0, 4.0, 1.0, 3.0];
    /// let stats = DescriptiveStats::new(&values).unwrap();
    /// assert_eq!(stats.min, 1.0);
    /// assert_eq!(stats.max, 5.0);
    /// assert_eq!(stats.mean, 3.0);
    /// assert_eq!(stats.median, 3.0);
    /// assert_eq!(stats.variance, 2.5);
    /// ```
    #[must_use]
    pub fn new(values: &[f64]) -> Option<Self> {
        let mut values = values.to_vec();
        values.sort_by(f64::total_cmp);
        Self::from_sorted(&values)
    }

    /// Computes descriptive statistics from values sorted in ascending order.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64]) -> Option<Self> {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let min = *sorted_values.first()?;
        let max = *sorted_values.last()?;
        let count = sorted_values.len();
        let mid = count / 2;
        let median = if count.is_multiple_of(2) {
            f64::midpoint(sorted_values[mid - 1], sorted_values[mid])
        } else {
            sorted_values[mid]
        };
        let variance = sample_variance(sorted_values);

        Some(Self {
            count,
            min,
            max,
            range: max - min,
            mean: mean(sorted_values),
            median,
            variance,
            std_dev: variance.sqrt(),
        })
    }
}

/// Arithmetic mean; `NaN` for an empty slice.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Unbiased sample variance (`n - 1` denominator); zero for fewer than two values.
///
/// ```
/// use climastat_stats::descriptive::sample_variance;
///
/// assert_eq!(sample_variance(&[1.0, 2.0, 3.0, 4.0, 5.0]), 2.5);
/// assert_eq!(sample_variance(&[7.0]), 0.0);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn sample_variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = mean(values);
    sum_of_squares(values, mean) / (values.len() - 1) as f64
}

/// Sum of squared deviations from `center`.
#[must_use]
pub fn sum_of_squares(values: &[f64], center: f64) -> f64 {
    values.iter().map(|v| (v - center).powi(2)).sum()
}
