use serde::Serialize;

use crate::{StatsError, check_sample, descriptive, distribution};

/// Outcome of a two-sided F test for equal variances.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FTestResult {
    /// `var(a) / var(b)`.
    pub statistic: f64,
    /// `n_a - 1`.
    pub df_numerator: f64,
    /// `n_b - 1`.
    pub df_denominator: f64,
    pub p_value: f64,
}

/// Two-sided F test of `H0: var(a) = var(b)`.
///
/// Both samples need at least two observations and a non-zero variance.
///
/// ```
/// use climastat_stats::variance::f_test;
///
/// let result = f_test(&[1.0, 2.0, 3.0, 4.0, 5.0], &[2.0, 4.0, 6.0, 8.0, 10.0]).unwrap();
/// assert_eq!(result.statistic, 0.25);
/// assert!((result.p_value - 0.208).abs() < 1e-9);
/// ```
#[expect(clippy::cast_precision_loss)]
pub fn f_test(a: &[f64], b: &[f64]) -> Result<FTestResult, StatsError> {
    check_sample(a, 2)?;
    check_sample(b, 2)?;

    let var_a = descriptive::sample_variance(a);
    let var_b = descriptive::sample_variance(b);
    if var_a <= 0.0 || var_b <= 0.0 {
        return Err(StatsError::Degenerate {
            reason: "F test needs non-zero variance in both samples",
        });
    }

    let statistic = var_a / var_b;
    let df_numerator = (a.len() - 1) as f64;
    let df_denominator = (b.len() - 1) as f64;
    let lower = distribution::fisher_f_cdf(statistic, df_numerator, df_denominator)?;
    let upper = distribution::fisher_f_sf(statistic, df_numerator, df_denominator)?;

    Ok(FTestResult {
        statistic,
        df_numerator,
        df_denominator,
        p_value: (2.0 * lower.min(upper)).min(1.0),
    })
}
