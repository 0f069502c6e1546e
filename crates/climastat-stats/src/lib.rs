//! Statistical procedures for the climastat workspace.
//!
//! This crate is pure computation: every function takes plain `f64` slices
//! and either returns a result record or a [`StatsError`] explaining why the
//! input cannot be analysed. Nothing here performs I/O or logging.
//!
//! - **Descriptive statistics**: [`descriptive`], [`percentiles`],
//!   [`histogram`] and the combined [`comprehensive`] summary
//! - **Normality**: Shapiro–Wilk in [`normality`]
//! - **Two-sample tests**: F test for equal variances ([`variance`]),
//!   Student/Welch t test ([`ttest`]), Wilcoxon rank-sum ([`rank`])
//! - **Association**: Pearson correlation in [`correlation`]
//! - **Within-subjects designs**: repeated-measures ANOVA in [`anova`]
//!
//! # Examples
//!
//! ## Comparing two samples
//!
//! ```
//! use climastat_stats::{normality::shapiro_wilk, ttest::two_sample_t_test};
//!
//! let morning = [21.2, 21.8, 20.9, 21.5, 21.1, 21.6];
//! let evening = [23.0, 23.4, 22.7, 23.9, 23.1, 23.3];
//!
//! assert!(shapiro_wilk(&morning).unwrap().p_value > 0.05);
//! let t = two_sample_t_test(&morning, &evening, false).unwrap();
//! assert!(t.p_value < 0.001);
//! ```
//!
//! ## Summarizing a distribution
//!
//! ```
//! use climastat_stats::comprehensive::ComprehensiveStats;
//!
//! let humidity = [48.0, 51.5, 47.2, 55.0, 49.9, 50.3];
//! let summary = ComprehensiveStats::new(&humidity, 4).unwrap();
//! println!("{}", summary.histogram.render(30));
//! assert_eq!(summary.stats.count, 6);
//! ```

pub use self::error::{StatsError, check_sample};

pub mod anova;
pub mod comprehensive;
pub mod correlation;
pub mod descriptive;
pub mod distribution;
mod error;
pub mod histogram;
pub mod normality;
pub mod percentiles;
pub mod rank;
pub mod ttest;
pub mod variance;
