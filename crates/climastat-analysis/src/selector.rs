//! Choosing and running a two-sample comparison.
//!
//! Given two independent samples, the selector
//!
//! 1. tests each sample for normality with Shapiro–Wilk;
//! 2. if both look normal (`p > alpha`), runs an F test for equal variances
//!    and then a pooled (Student) or Welch t test depending on its outcome;
//! 3. otherwise runs the Wilcoxon rank-sum test, with no variance test.
//!
//! The branch taken depends only on the two normality p-values, and the
//! pooled/Welch choice only on the F-test p-value. Both samples are validated
//! before any test runs, so a failing comparison never yields a partial result.
//!
//! # Example
//!
//! ```
//! use climastat_analysis::selector::{Branch, compare};
//!
//! let indoor = [50.0, 52.0, 49.0, 51.0, 50.0];
//! let outdoor = [60.0, 61.0, 59.0, 62.0, 60.0];
//!
//! let result = compare(&indoor, &outdoor, "T_Mean").unwrap();
//! assert_eq!(result.branch(), Branch::Parametric);
//! assert!(result.final_p_value() < 0.001);
//! println!("{result}");
//! ```

use std::fmt;

use climastat_stats::{
    StatsError, check_sample,
    normality::{self, ShapiroWilkResult},
    rank::{RankSumMethod, RankSumResult, rank_sum_test},
    ttest::{CONFIDENCE_LEVEL, TTestResult, two_sample_t_test},
    variance::{FTestResult, f_test},
};
use serde::Serialize;

use crate::sample::Sample;

/// Significance level used when none is configured.
pub const DEFAULT_ALPHA: f64 = 0.05;

/// Which of the two input samples an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum SampleSide {
    #[display("sample A")]
    A,
    #[display("sample B")]
    B,
}

/// Test during which a degenerate input was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[display("normality test")]
    Normality,
    #[display("variance test")]
    Variance,
    #[display("t test")]
    TTest,
    #[display("rank-sum test")]
    RankSum,
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ComparisonError {
    #[display("{side}: value {value} at index {index} is not a finite number")]
    InvalidSample {
        side: SampleSide,
        index: usize,
        value: f64,
    },
    #[display("{side}: at least {required} observations are required, got {actual}")]
    InsufficientData {
        side: SampleSide,
        required: usize,
        actual: usize,
    },
    #[display("{side}: at most {limit} observations are supported, got {actual}")]
    TooManyObservations {
        side: SampleSide,
        limit: usize,
        actual: usize,
    },
    #[display("degenerate input in {stage}: {reason}")]
    DegenerateInput { stage: Stage, reason: &'static str },
}

impl ComparisonError {
    fn from_stats(err: StatsError, side: SampleSide, stage: Stage) -> Self {
        match err {
            StatsError::InvalidSample { index, value } => Self::InvalidSample { side, index, value },
            StatsError::InsufficientData { required, actual } => Self::InsufficientData {
                side,
                required,
                actual,
            },
            StatsError::TooManyObservations { limit, actual } => Self::TooManyObservations {
                side,
                limit,
                actual,
            },
            StatsError::LengthMismatch { .. } => Self::DegenerateInput {
                stage,
                reason: "inputs have mismatched lengths",
            },
            StatsError::Degenerate { reason } => Self::DegenerateInput { stage, reason },
        }
    }
}

/// Which family of tests produced the final p-value.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display, derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum Branch {
    #[display("parametric")]
    Parametric,
    #[display("non-parametric")]
    NonParametric,
}

/// Tests run after the normality check; exactly one family is present.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "branch", rename_all = "snake_case")]
pub enum ComparisonOutcome {
    Parametric {
        variance: FTestResult,
        t_test: TTestResult,
    },
    NonParametric {
        rank_sum: RankSumResult,
    },
}

/// Complete record of one comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResult {
    pub label: String,
    pub alpha: f64,
    pub normality_a: ShapiroWilkResult,
    pub normality_b: ShapiroWilkResult,
    pub outcome: ComparisonOutcome,
}

impl ComparisonResult {
    #[must_use]
    pub fn branch(&self) -> Branch {
        match self.outcome {
            ComparisonOutcome::Parametric { .. } => Branch::Parametric,
            ComparisonOutcome::NonParametric { .. } => Branch::NonParametric,
        }
    }

    /// p-value of the t test or the rank-sum test.
    #[must_use]
    pub fn final_p_value(&self) -> f64 {
        match &self.outcome {
            ComparisonOutcome::Parametric { t_test, .. } => t_test.p_value,
            ComparisonOutcome::NonParametric { rank_sum } => rank_sum.p_value,
        }
    }

    /// F-test p-value; `None` on the non-parametric branch.
    #[must_use]
    pub fn variance_p_value(&self) -> Option<f64> {
        match &self.outcome {
            ComparisonOutcome::Parametric { variance, .. } => Some(variance.p_value),
            ComparisonOutcome::NonParametric { .. } => None,
        }
    }

    #[must_use]
    pub fn is_significant(&self) -> bool {
        self.final_p_value() <= self.alpha
    }
}

impl fmt::Display for ComparisonResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let alpha = self.alpha;
        writeln!(f, "{}", self.label)?;
        for (side, sw) in [("A", &self.normality_a), ("B", &self.normality_b)] {
            writeln!(
                f,
                "  Shapiro-Wilk {side}: W = {:.4}, p = {} (n = {}){}",
                sw.w,
                format_p(sw.p_value),
                sw.n,
                if sw.p_value > alpha { "" } else { ", not normal" },
            )?;
        }
        match &self.outcome {
            ComparisonOutcome::Parametric { variance, t_test } => {
                writeln!(f, "  Branch: parametric (both samples normal at alpha = {alpha})")?;
                writeln!(
                    f,
                    "  F test: F = {:.4}, df = ({}, {}), p = {} -> {}",
                    variance.statistic,
                    variance.df_numerator,
                    variance.df_denominator,
                    format_p(variance.p_value),
                    if t_test.equal_variance {
                        "equal variances"
                    } else {
                        "unequal variances"
                    },
                )?;
                writeln!(
                    f,
                    "  {} t test: t = {:.4}, df = {:.2}, p = {}",
                    if t_test.equal_variance { "Student" } else { "Welch" },
                    t_test.statistic,
                    t_test.df,
                    format_p(t_test.p_value),
                )?;
                writeln!(
                    f,
                    "  mean A = {:.4}, mean B = {:.4}, difference = {:.4}, {:.0}% CI [{:.4}, {:.4}]",
                    t_test.mean_a,
                    t_test.mean_b,
                    t_test.mean_difference,
                    CONFIDENCE_LEVEL * 100.0,
                    t_test.confidence_interval.0,
                    t_test.confidence_interval.1,
                )?;
            }
            ComparisonOutcome::NonParametric { rank_sum } => {
                writeln!(f, "  Branch: non-parametric (normality rejected at alpha = {alpha})")?;
                writeln!(
                    f,
                    "  Wilcoxon rank-sum ({}): W = {}, p = {}",
                    match rank_sum.method {
                        RankSumMethod::Exact => "exact",
                        RankSumMethod::NormalApproximation => "normal approximation",
                    },
                    rank_sum.statistic,
                    format_p(rank_sum.p_value),
                )?;
            }
        }
        write!(
            f,
            "  Conclusion: {} (p = {})",
            if self.is_significant() {
                "groups differ"
            } else {
                "no significant difference"
            },
            format_p(self.final_p_value()),
        )
    }
}

/// Formats a p-value with four decimals, switching to scientific notation
/// for very small values.
#[must_use]
pub fn format_p(p: f64) -> String {
    if p < 1e-4 {
        format!("{p:.2e}")
    } else {
        format!("{p:.4}")
    }
}

/// Runs comparisons at a fixed significance level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TestSelector {
    alpha: f64,
}

impl Default for TestSelector {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
        }
    }
}

impl TestSelector {
    /// Returns `None` unless `0 < alpha < 1`.
    #[must_use]
    pub fn with_alpha(alpha: f64) -> Option<Self> {
        (alpha > 0.0 && alpha < 1.0).then_some(Self { alpha })
    }

    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Compares two labeled samples.
    pub fn compare_samples(
        &self,
        a: &Sample,
        b: &Sample,
        label: &str,
    ) -> Result<ComparisonResult, ComparisonError> {
        self.compare(a.values(), b.values(), label)
    }

    /// Compares two samples, choosing the tests from their normality.
    pub fn compare(
        &self,
        a: &[f64],
        b: &[f64],
        label: &str,
    ) -> Result<ComparisonResult, ComparisonError> {
        use ComparisonError as E;
        use SampleSide::{A, B};

        for (side, values) in [(A, a), (B, b)] {
            check_sample(values, 0).map_err(|e| E::from_stats(e, side, Stage::Normality))?;
        }
        for (side, values) in [(A, a), (B, b)] {
            check_sample(values, normality::MIN_OBSERVATIONS)
                .map_err(|e| E::from_stats(e, side, Stage::Normality))?;
        }

        let normality_a =
            normality::shapiro_wilk(a).map_err(|e| E::from_stats(e, A, Stage::Normality))?;
        let normality_b =
            normality::shapiro_wilk(b).map_err(|e| E::from_stats(e, B, Stage::Normality))?;
        tracing::debug!(
            label,
            p_a = normality_a.p_value,
            p_b = normality_b.p_value,
            "normality checked"
        );

        let outcome = if normality_a.p_value > self.alpha && normality_b.p_value > self.alpha {
            let variance = f_test(a, b).map_err(|e| E::from_stats(e, A, Stage::Variance))?;
            let equal_variance = variance.p_value > self.alpha;
            let t_test = two_sample_t_test(a, b, equal_variance)
                .map_err(|e| E::from_stats(e, A, Stage::TTest))?;
            ComparisonOutcome::Parametric { variance, t_test }
        } else {
            let rank_sum = rank_sum_test(a, b).map_err(|e| E::from_stats(e, A, Stage::RankSum))?;
            ComparisonOutcome::NonParametric { rank_sum }
        };

        let result = ComparisonResult {
            label: label.to_owned(),
            alpha: self.alpha,
            normality_a,
            normality_b,
            outcome,
        };
        tracing::debug!(
            label,
            branch = %result.branch(),
            p = result.final_p_value(),
            "comparison finished"
        );
        Ok(result)
    }
}

/// [`TestSelector::compare`] at the default significance level.
pub fn compare(a: &[f64], b: &[f64], label: &str) -> Result<ComparisonResult, ComparisonError> {
    TestSelector::default().compare(a, b, label)
}
