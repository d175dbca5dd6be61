//! `explore` subcommand

use std::path::Path;

use anyhow::Result;
use console::style;

use super::workflow::load_with_spinner;
use crate::pipeline::columns::{AGE, EMBARKED, FARE, PARCH, PCLASS, SEX, SIBSP};
use crate::pipeline::{
    analyze_missing_values, fare_bounds, numeric_summary, overall_survival, survival_by,
    survival_by_pair, LoadOptions,
};
use crate::pipeline::records::exclude_fare_outliers;
use crate::report::exploration::{
    display_fare_bounds, display_missing, display_numeric_summaries, display_survival,
};
use crate::utils::{print_count, print_info, print_step_header};

pub fn run_explore(path: &Path, options: &LoadOptions) -> Result<()> {
    print_step_header(1, "Dataset");
    let df = load_with_spinner(path, options)?;

    let overall = overall_survival(&df)?;
    if overall.count > 0 {
        println!(
            "      Survival rate: {} of {} passengers ({})",
            style(overall.survivors).green().bold(),
            overall.count,
            style(format!("{:.1}%", overall.rate() * 100.0)).yellow()
        );
    } else {
        print_info("No outcome column: survival breakdowns are skipped");
    }

    let outliers = df.height() - exclude_fare_outliers(&df, options.fare_threshold)?.height();
    print_count(
        "row(s) excluded by the fare filter",
        outliers,
        Some(&format!("(>= {:.0})", options.fare_threshold)),
    );

    print_step_header(2, "Missing Values");
    display_missing(&analyze_missing_values(&df)?);

    print_step_header(3, "Numeric Columns");
    let summaries = [AGE, FARE, SIBSP, PARCH]
        .iter()
        .map(|c| numeric_summary(&df, c))
        .collect::<Result<Vec<_>>>()?;
    display_numeric_summaries(&summaries);
    display_fare_bounds(&fare_bounds(&df, options.fare_threshold)?);

    if overall.count > 0 {
        print_step_header(4, "Survival");
        for column in [SEX, PCLASS, EMBARKED] {
            display_survival(
                &format!("SURVIVAL BY {}", column.to_uppercase()),
                &[column],
                &survival_by(&df, column)?,
            );
        }
        display_survival(
            "SURVIVAL BY CLASS AND SEX",
            &[PCLASS, SEX],
            &survival_by_pair(&df, PCLASS, SEX)?,
        );
    }

    Ok(())
}
