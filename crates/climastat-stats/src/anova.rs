//! One-way repeated-measures (within-subjects) analysis of variance.
//!
//! Input is a subjects × conditions matrix: each row holds one subject's
//! measurement under every condition. The total sum of squares is split into
//! condition, subject and residual parts; the condition effect is tested
//! against the residual (subject × condition interaction).

use serde::Serialize;

use crate::{StatsError, descriptive, distribution};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RmAnovaResult {
    pub subjects: usize,
    pub conditions: usize,
    pub ss_conditions: f64,
    pub ss_subjects: f64,
    pub ss_error: f64,
    pub df_conditions: f64,
    pub df_error: f64,
    pub f_statistic: f64,
    pub p_value: f64,
    /// `ss_conditions / (ss_conditions + ss_error)`.
    pub partial_eta_squared: f64,
    /// Mean of each condition column.
    pub condition_means: Vec<f64>,
}

/// Tests whether condition means differ when every subject is measured under
/// every condition.
///
/// ```
/// use climastat_stats::anova::repeated_measures_anova;
///
/// let rows = [
///     vec![5.0, 7.0, 9.0],
///     vec![4.0, 7.0, 8.0],
///     vec![6.0, 8.0, 10.0],
///     vec![5.0, 6.0, 9.0],
/// ];
/// let result = repeated_measures_anova(&rows).unwrap();
/// assert!((result.f_statistic - 72.0).abs() < 1e-9);
/// assert!(result.p_value < 0.001);
/// ```
#[expect(clippy::cast_precision_loss)]
pub fn repeated_measures_anova(rows: &[Vec<f64>]) -> Result<RmAnovaResult, StatsError> {
    let subjects = rows.len();
    if subjects < 2 {
        return Err(StatsError::InsufficientData {
            required: 2,
            actual: subjects,
        });
    }
    let conditions = rows[0].len();
    if conditions < 2 {
        return Err(StatsError::InsufficientData {
            required: 2,
            actual: conditions,
        });
    }
    if let Some(row) = rows.iter().find(|row| row.len() != conditions) {
        return Err(StatsError::LengthMismatch {
            expected: conditions,
            actual: row.len(),
        });
    }
    if let Some((index, &value)) = rows.iter().flatten().enumerate().find(|(_, v)| !v.is_finite())
    {
        return Err(StatsError::InvalidSample { index, value });
    }

    let n = subjects as f64;
    let k = conditions as f64;
    let all = rows.iter().flatten().copied().collect::<Vec<_>>();
    let grand_mean = descriptive::mean(&all);

    let condition_means = (0..conditions)
        .map(|j| rows.iter().map(|row| row[j]).sum::<f64>() / n)
        .collect::<Vec<_>>();
    let subject_means = rows
        .iter()
        .map(|row| descriptive::mean(row))
        .collect::<Vec<_>>();

    let ss_total = descriptive::sum_of_squares(&all, grand_mean);
    let ss_conditions = n * descriptive::sum_of_squares(&condition_means, grand_mean);
    let ss_subjects = k * descriptive::sum_of_squares(&subject_means, grand_mean);
    let ss_error = (ss_total - ss_conditions - ss_subjects).max(0.0);
    if ss_error <= 1e-12 * ss_total.max(f64::MIN_POSITIVE) {
        return Err(StatsError::Degenerate {
            reason: "no residual variation between subjects and conditions",
        });
    }

    let df_conditions = k - 1.0;
    let df_error = (n - 1.0) * (k - 1.0);
    let f_statistic = (ss_conditions / df_conditions) / (ss_error / df_error);
    let p_value = distribution::fisher_f_sf(f_statistic, df_conditions, df_error)?;

    Ok(RmAnovaResult {
        subjects,
        conditions,
        ss_conditions,
        ss_subjects,
        ss_error,
        df_conditions,
        df_error,
        f_statistic,
        p_value,
        partial_eta_squared: ss_conditions / (ss_conditions + ss_error),
        condition_means,
    })
}
