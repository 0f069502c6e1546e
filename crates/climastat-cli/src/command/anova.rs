use std::path::PathBuf;

use clap::Args;
use climastat_analysis::{
    analysis::{AnalysisOutcome, TimeOfDayEffect},
    reading::TimeOfDay,
    sample::Quantity,
    selector::format_p,
};

use super::LocationPairArg;
use crate::util;

#[derive(Debug, Clone, Args)]
pub(crate) struct AnovaArg {
    #[clap(flatten)]
    pub locations: LocationPairArg,

    /// Write the ANOVA results as JSON to this path
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &AnovaArg) -> anyhow::Result<()> {
    let (first, second) = arg.locations.load()?;

    let effects = [&first, &second]
        .into_iter()
        .flat_map(|data| {
            Quantity::ALL
                .into_iter()
                .map(move |quantity| TimeOfDayEffect::run(data, quantity))
        })
        .collect::<Vec<_>>();
    print_effects(&effects);

    if let Some(path) = &arg.output {
        util::write_json_file(&effects, path)?;
    }
    Ok(())
}

pub(crate) fn print_effects(effects: &[TimeOfDayEffect]) {
    println!("Time-of-day effect (repeated-measures ANOVA, days as subjects)");
    println!(
        "  {:<16} {:<12} {:>5} {:>9} {:>8} {:>10} {:>6} {:>9} {:>9} {:>9}",
        "Location",
        "Quantity",
        "Days",
        "F",
        "df",
        "p-value",
        "eta²",
        TimeOfDay::Morning.as_str(),
        TimeOfDay::Midday.as_str(),
        TimeOfDay::Evening.as_str(),
    );
    println!("  {}", "-".repeat(103));
    for effect in effects {
        match &effect.outcome {
            AnalysisOutcome::Completed(anova) => {
                let means = anova
                    .condition_means
                    .iter()
                    .map(|mean| format!("{mean:>9.2}"))
                    .collect::<Vec<_>>()
                    .join(" ");
                println!(
                    "  {:<16} {:<12} {:>5} {:>9.3} {:>8} {:>10} {:>6.3} {}",
                    effect.location,
                    format!("{} ({})", effect.quantity, effect.quantity.unit()),
                    effect.days,
                    anova.f_statistic,
                    format!("{}/{}", anova.df_conditions, anova.df_error),
                    format_p(anova.p_value),
                    anova.partial_eta_squared,
                    means,
                );
            }
            AnalysisOutcome::Failed { error } => {
                println!(
                    "  {:<16} {:<12} {:>5} failed: {error}",
                    effect.location, effect.quantity, effect.days
                );
            }
        }
    }
}
