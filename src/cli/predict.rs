//! `predict` and `passenger` subcommands

use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use super::args::PassengerArgs;
use super::prompts::prompt_passenger;
use super::workflow::{choose_model, load_with_spinner, train, training_set};
use crate::pipeline::{fare_bounds, CustomPassenger, LoadOptions, Session, SplitMode};
use crate::report::{load_fitted_state, PredictionRanking};
use crate::utils::{print_info, print_step_header, print_success, print_warning};

pub fn run_predict(
    session: &Session,
    path: &Path,
    options: &LoadOptions,
    model_name: Option<&str>,
    output: Option<&Path>,
    top: usize,
) -> Result<()> {
    print_step_header(1, "Load Manifest");
    let raw = load_with_spinner(path, options)?;

    print_step_header(2, "Train");
    let training = training_set(session, &raw)?;
    let spec = choose_model(model_name, &training, session.seed())?;
    let model = train(&spec, &training)?;

    print_step_header(3, "Predict");
    // Same session: the whole-manifest pass reuses the fitted statistics
    let whole = session
        .preprocess(&raw, SplitMode::Whole)
        .context("Preprocessing failed")?;
    let probabilities = model
        .predict_proba(whole.train.to_array()?.view())
        .with_context(|| format!("{} failed to predict", spec.name))?;

    let ranking = PredictionRanking::new(
        spec.name.clone(),
        whole.train.ids(),
        &probabilities.to_vec(),
        whole.train_target.as_deref(),
    )?;
    ranking.display(top);

    if let Some(output) = output {
        ranking.write_csv(output)?;
        println!();
        print_success(&format!("Saved {}", output.display()));
    }

    Ok(())
}

pub fn run_passenger(
    session: &Session,
    path: &Path,
    options: &LoadOptions,
    model_name: Option<&str>,
    args: &PassengerArgs,
    state: Option<&Path>,
    interactive: bool,
) -> Result<()> {
    let restored;
    let session = match state {
        Some(state_path) => {
            let export = load_fitted_state(state_path)?;
            print_info(&format!(
                "Using fitted state from {} ({} training rows, exported {})",
                state_path.display(),
                export.metadata.training_rows,
                export.metadata.timestamp
            ));
            restored = Session::with_fitted(export.pipeline);
            &restored
        }
        None => session,
    };

    print_step_header(1, "Load Manifest");
    let raw = load_with_spinner(path, options)?;
    let fares = fare_bounds(&raw, options.fare_threshold)?;

    print_step_header(2, "Passenger");
    let passenger = if interactive {
        prompt_passenger(args, &fares)?
    } else {
        let default_fare = fares.get(&args.pclass).map(|b| b.median).unwrap_or(0.0);
        args.to_passenger(default_fare)
    };
    passenger.validate()?;
    describe(&passenger);

    if passenger.fare >= options.fare_threshold {
        anyhow::bail!(
            "Fare {:.2} is at or above the outlier threshold {:.0}",
            passenger.fare,
            options.fare_threshold
        );
    }
    if let Some(bounds) = fares.get(&passenger.pclass) {
        if passenger.fare < bounds.min || passenger.fare > bounds.max {
            print_warning(&format!(
                "Fare is outside the {:.2}-{:.2} range paid in class {}",
                bounds.min, bounds.max, passenger.pclass
            ));
        }
    }

    print_step_header(3, "Train");
    let training = training_set(session, &raw)?;
    let spec = choose_model(model_name, &training, session.seed())?;
    let model = train(&spec, &training)?;

    print_step_header(4, "Predict");
    let features = session
        .transform(&passenger.to_frame()?)
        .context("Failed to encode the passenger")?;
    let probability = model
        .predict_proba(features.to_array()?.view())?
        .first()
        .copied()
        .context("Model returned no prediction")?;

    let verdict = if probability >= 0.5 {
        style("survives").green().bold()
    } else {
        style("does not survive").red().bold()
    };
    println!();
    println!(
        "    Survival chance: {}  ({} predicts this passenger {})",
        style(format!("{:.2} %", probability * 100.0)).yellow().bold(),
        spec.name,
        verdict
    );

    Ok(())
}

fn describe(p: &CustomPassenger) {
    print_info(&format!(
        "Class {} {}, age {}, fare {:.2}, embarked at {}",
        p.pclass, p.sex, p.age, p.fare, p.embarked
    ));
    print_info(&format!(
        "Siblings/spouse aboard: {}, parents/children aboard: {}",
        p.sibsp(),
        p.parch()
    ));
}
