use serde::Serialize;

use crate::{StatsError, check_sample, descriptive, distribution, ttest::CONFIDENCE_LEVEL};

/// Pearson product-moment correlation with its significance test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CorrelationResult {
    /// Correlation coefficient in `[-1, 1]`.
    pub r: f64,
    /// `r * sqrt(df / (1 - r²))`; infinite for a perfect fit.
    pub statistic: f64,
    /// `n - 2`.
    pub df: f64,
    /// Two-sided p-value of `H0: rho = 0`.
    pub p_value: f64,
    /// Fisher-z interval for rho; needs more than three pairs.
    pub confidence_interval: Option<(f64, f64)>,
    pub n: usize,
}

/// Pearson correlation of paired observations.
///
/// ```
/// use climastat_stats::correlation::pearson;
///
/// let result = pearson(&[1.0, 2.0, 3.0, 4.0, 5.0], &[2.0, 1.0, 4.0, 3.0, 5.0]).unwrap();
/// assert!((result.r - 0.8).abs() < 1e-12);
/// assert!((result.p_value - 0.1041).abs() < 1e-3);
/// ```
#[expect(clippy::cast_precision_loss)]
pub fn pearson(x: &[f64], y: &[f64]) -> Result<CorrelationResult, StatsError> {
    if x.len() != y.len() {
        return Err(StatsError::LengthMismatch {
            expected: x.len(),
            actual: y.len(),
        });
    }
    check_sample(x, 3)?;
    check_sample(y, 3)?;

    let n = x.len();
    let mean_x = descriptive::mean(x);
    let mean_y = descriptive::mean(y);
    let sxy = x
        .iter()
        .zip(y)
        .map(|(xi, yi)| (xi - mean_x) * (yi - mean_y))
        .sum::<f64>();
    let sxx = descriptive::sum_of_squares(x, mean_x);
    let syy = descriptive::sum_of_squares(y, mean_y);
    if sxx <= 0.0 || syy <= 0.0 {
        return Err(StatsError::Degenerate {
            reason: "correlation needs non-zero variance in both variables",
        });
    }

    let r = (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0);
    let df = (n - 2) as f64;
    let unexplained = 1.0 - r * r;
    let (statistic, p_value) = if unexplained <= 0.0 {
        (f64::INFINITY.copysign(r), 0.0)
    } else {
        let t = r * (df / unexplained).sqrt();
        (t, distribution::students_t_two_sided(t, df)?)
    };

    let confidence_interval = (n > 3).then(|| {
        let z = r.atanh();
        let margin =
            distribution::normal_quantile(0.5 + CONFIDENCE_LEVEL / 2.0) / ((n - 3) as f64).sqrt();
        ((z - margin).tanh(), (z + margin).tanh())
    });

    Ok(CorrelationResult {
        r,
        statistic,
        df,
        p_value,
        confidence_interval,
        n,
    })
}
