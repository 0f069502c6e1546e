//! Indoor climate analysis for pairs of measurement locations
//!
//! This crate turns raw sensor sheets into daily summaries and runs the
//! statistical comparisons on top of them. The statistics themselves live in
//! `climastat-stats`; this crate provides the domain model, preprocessing and
//! the rules for choosing which test to run.
//!
//! # Overview
//!
//! ## Preprocessing Workflow
//!
//! 1. **Load a Sheet** ([`sheet::SensorSheet`]): Rows of date, time, temperature
//!    and humidity; values may use a decimal comma and temperature may be in °F or K
//! 2. **Clean Readings** ([`reading::LocationData::from_sheet`]): Convert units,
//!    skip rows with missing values and bin each reading into a [`reading::TimeOfDay`]
//! 3. **Summarize Days** ([`daily::DailySummary`]): Mean and range of the three
//!    time-of-day readings per day
//! 4. **Extract Samples** ([`sample::Sample`]): One value per day for a
//!    [`sample::Variable`] such as `T_Mean` or `RH_Range`
//!
//! ## Comparison Workflow
//!
//! [`selector::TestSelector`] compares two samples: Shapiro–Wilk on both, then
//! either F test plus Student/Welch t test (both normal) or Wilcoxon rank-sum
//! (otherwise). The result records every test that ran and renders as a text
//! report.
//!
//! ## Named Analyses
//!
//! [`analysis`] bundles the comparisons with a repeated-measures ANOVA across
//! time of day, a temperature/humidity correlation and distribution summaries
//! into an [`analysis::AnalysisReport`].
//!
//! # Examples
//!
//! ```
//! use climastat_analysis::{
//!     analysis::{AnalysisReport, ReportConfig},
//!     reading::LocationData,
//!     sheet::SensorSheet,
//! };
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//!
//! let sheets: Vec<SensorSheet> = vec![]; // Load with serde_json
//! # let sheets = vec![
//! #     SensorSheet { location: "A".into(), temperature_unit: Default::default(), rows: vec![] },
//! #     SensorSheet { location: "B".into(), temperature_unit: Default::default(), rows: vec![] },
//! # ];
//! let first = LocationData::from_sheet(&sheets[0])?;
//! let second = LocationData::from_sheet(&sheets[1])?;
//!
//! let report = AnalysisReport::build(&first, &second, &ReportConfig::default());
//! println!("{}", serde_json::to_string_pretty(&report)?);
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod daily;
pub mod reading;
pub mod sample;
pub mod selector;
pub mod sheet;
