use serde::Serialize;

use crate::{StatsError, check_sample, descriptive, distribution};

/// Confidence level of the interval reported with every t test.
pub const CONFIDENCE_LEVEL: f64 = 0.95;

/// Outcome of an independent two-sample t test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TTestResult {
    pub statistic: f64,
    /// Degrees of freedom; fractional for the Welch correction.
    pub df: f64,
    /// Two-sided p-value.
    pub p_value: f64,
    pub mean_a: f64,
    pub mean_b: f64,
    /// `mean_a - mean_b`.
    pub mean_difference: f64,
    /// Interval for the mean difference at [`CONFIDENCE_LEVEL`].
    pub confidence_interval: (f64, f64),
    /// `true` for the pooled (Student) estimate, `false` for Welch.
    pub equal_variance: bool,
}

/// Two-sided test of `H0: mean(a) = mean(b)` for independent samples.
///
/// With `equal_variance` the pooled variance and `n_a + n_b - 2` degrees of
/// freedom are used; otherwise the Welch–Satterthwaite approximation.
///
/// ```
/// use climastat_stats::ttest::two_sample_t_test;
///
/// let a = [50.0, 52.0, 49.0, 51.0, 50.0];
/// let b = [60.0, 61.0, 59.0, 62.0, 60.0];
/// let result = two_sample_t_test(&a, &b, true).unwrap();
/// assert_eq!(result.df, 8.0);
/// assert!(result.statistic < -13.0);
/// assert!(result.p_value < 1e-5);
/// ```
#[expect(clippy::cast_precision_loss)]
pub fn two_sample_t_test(
    a: &[f64],
    b: &[f64],
    equal_variance: bool,
) -> Result<TTestResult, StatsError> {
    check_sample(a, 2)?;
    check_sample(b, 2)?;

    let n_a = a.len() as f64;
    let n_b = b.len() as f64;
    let mean_a = descriptive::mean(a);
    let mean_b = descriptive::mean(b);
    let var_a = descriptive::sample_variance(a);
    let var_b = descriptive::sample_variance(b);

    let (std_error, df) = if equal_variance {
        let df = n_a + n_b - 2.0;
        let pooled = ((n_a - 1.0) * var_a + (n_b - 1.0) * var_b) / df;
        ((pooled * (1.0 / n_a + 1.0 / n_b)).sqrt(), df)
    } else {
        let se_a = var_a / n_a;
        let se_b = var_b / n_b;
        let df = (se_a + se_b).powi(2) / (se_a.powi(2) / (n_a - 1.0) + se_b.powi(2) / (n_b - 1.0));
        ((se_a + se_b).sqrt(), df)
    };
    if std_error <= 0.0 || !std_error.is_finite() {
        return Err(StatsError::Degenerate {
            reason: "t test needs non-zero variance in at least one sample",
        });
    }

    let mean_difference = mean_a - mean_b;
    let statistic = mean_difference / std_error;
    let p_value = distribution::students_t_two_sided(statistic, df)?;
    let margin =
        distribution::students_t_quantile(0.5 + CONFIDENCE_LEVEL / 2.0, df)? * std_error;

    Ok(TTestResult {
        statistic,
        df,
        p_value,
        mean_a,
        mean_b,
        mean_difference,
        confidence_interval: (mean_difference - margin, mean_difference + margin),
        equal_variance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: [f64; 5] = [50.0, 52.0, 49.0, 51.0, 50.0];
    const B: [f64; 5] = [60.0, 61.0, 59.0, 62.0, 60.0];

    #[test]
    fn test_pooled_statistic() {
        let result = two_sample_t_test(&A, &B, true).unwrap();
        // se = sqrt(1.3 * (1/5 + 1/5))
        assert!((result.statistic + 13.867_504).abs() < 1e-5, "t = {}", result.statistic);
        assert!((result.mean_difference + 10.0).abs() < 1e-12);
        assert!(result.confidence_interval.0 < -10.0 && result.confidence_interval.1 > -10.0);
        assert!(result.equal_variance);
    }

    #[test]
    fn test_welch_matches_pooled_for_balanced_equal_variance() {
        let pooled = two_sample_t_test(&A, &B, true).unwrap();
        let welch = two_sample_t_test(&A, &B, false).unwrap();
        assert!((pooled.statistic - welch.statistic).abs() < 1e-9);
        assert!((welch.df - 8.0).abs() < 1e-9);
        assert!(!welch.equal_variance);
    }

    #[test]
    fn test_welch_df_shrinks_with_unequal_spread() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let b = [10.0, 30.0, 50.0, 20.0];
        let welch = two_sample_t_test(&a, &b, false).unwrap();
        assert!(welch.df < 8.0);
        assert!(welch.df >= 3.0);
    }

    #[test]
    fn test_symmetry() {
        let ab = two_sample_t_test(&A, &B, true).unwrap();
        let ba = two_sample_t_test(&B, &A, true).unwrap();
        assert!((ab.statistic + ba.statistic).abs() < 1e-12);
        assert!((ab.p_value - ba.p_value).abs() < 1e-15);
    }

    #[test]
    fn test_constant_samples_are_degenerate() {
        assert!(matches!(
            two_sample_t_test(&[2.0, 2.0], &[2.0, 2.0, 2.0], false),
            Err(StatsError::Degenerate { .. })
        ));
        assert!(matches!(
            two_sample_t_test(&[2.0, 2.0], &[3.0, 3.0], true),
            Err(StatsError::Degenerate { .. })
        ));
    }
}
