//! Survivor: Titanic survival CLI
//!
//! Explore the passenger manifest, run the preprocessing pipeline, evaluate
//! classifiers and score passengers, real or made up.

use std::time::Instant;

use anyhow::Result;
use clap::Parser;

use survivor::cli::{
    run_evaluate, run_explore, run_passenger, run_predict, run_preprocess, Cli, Commands,
};
use survivor::pipeline::Session;
use survivor::utils::{print_banner, print_completion, print_config, print_step_time};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "survivor=warn".into()),
        )
        .init();

    let cli = Cli::parse();

    print_banner(env!("CARGO_PKG_VERSION"));

    // One session per invocation; every pass below shares its fitted state
    let seed = cli.resolve_seed();
    let session = Session::new(cli.preprocess_config(seed));
    let options = cli.load_options();
    print_config(cli.data_path(), seed, cli.fare_threshold, cli.test_size);

    let start = Instant::now();
    match &cli.command {
        Commands::Explore { input } => run_explore(&input.data, &options)?,
        Commands::Preprocess {
            input,
            output,
            no_split,
        } => run_preprocess(&session, &input.data, &options, output, *no_split)?,
        Commands::Evaluate {
            input,
            folds,
            export,
        } => run_evaluate(&session, &input.data, &options, *folds, export.as_deref())?,
        Commands::Predict {
            input,
            model,
            output,
            top,
        } => run_predict(
            &session,
            &input.data,
            &options,
            model.as_deref(),
            output.as_deref(),
            *top,
        )?,
        Commands::Passenger {
            input,
            model,
            passenger,
            state,
            interactive,
        } => run_passenger(
            &session,
            &input.data,
            &options,
            model.as_deref(),
            passenger,
            state.as_deref(),
            *interactive,
        )?,
    }

    print_step_time(start.elapsed());
    print_completion(&format!("Done (session seed {})", seed));
    Ok(())
}
