use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use climastat_analysis::{reading::LocationData, selector::TestSelector};

use self::{
    anova::AnovaArg, compare::CompareArg, correlate::CorrelateArg,
    generate_readings::GenerateReadingsArg, report::ReportArg, summarize::SummarizeArg,
};
use crate::util;

mod anova;
mod compare;
mod correlate;
mod generate_readings;
mod report;
mod summarize;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Log debug messages (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    verbose: bool,
    /// What to run
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Describe the distribution of each daily variable at both locations
    Summarize(#[clap(flatten)] SummarizeArg),
    /// Compare daily variables between two locations
    Compare(#[clap(flatten)] CompareArg),
    /// Test for a time-of-day effect at each location
    Anova(#[clap(flatten)] AnovaArg),
    /// Correlate temperature and humidity at each location
    Correlate(#[clap(flatten)] CorrelateArg),
    /// Run every analysis and print a combined report
    Report(#[clap(flatten)] ReportArg),
    /// Generate a synthetic sensor sheet
    GenerateReadings(#[clap(flatten)] GenerateReadingsArg),
}

/// The two sensor sheets every analysis command reads.
#[derive(Debug, Clone, Args)]
pub(crate) struct LocationPairArg {
    /// Sensor sheet JSON of the first location
    pub first: PathBuf,
    /// Sensor sheet JSON of the second location
    pub second: PathBuf,
}

impl LocationPairArg {
    fn load(&self) -> anyhow::Result<(LocationData, LocationData)> {
        Ok((
            util::load_location(&self.first)?,
            util::load_location(&self.second)?,
        ))
    }
}

#[derive(Debug, Clone, Args)]
pub(crate) struct AlphaArg {
    /// Significance level for the normality, variance and location tests
    #[arg(long, default_value_t = climastat_analysis::selector::DEFAULT_ALPHA)]
    pub alpha: f64,
}

impl AlphaArg {
    fn selector(&self) -> anyhow::Result<TestSelector> {
        TestSelector::with_alpha(self.alpha)
            .ok_or_else(|| anyhow::anyhow!("alpha must be between 0 and 1, got {}", self.alpha))
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    util::init_tracing(args.verbose);
    match args.mode {
        Mode::Summarize(arg) => summarize::run(&arg)?,
        Mode::Compare(arg) => compare::run(&arg)?,
        Mode::Anova(arg) => anova::run(&arg)?,
        Mode::Correlate(arg) => correlate::run(&arg)?,
        Mode::Report(arg) => report::run(&arg)?,
        Mode::GenerateReadings(arg) => generate_readings::run(&arg)?,
    }
    Ok(())
}
