//! Tests for CLI argument parsing and the binary

use assert_cmd::Command;
use clap::Parser;
use predicates::prelude::*;
use std::path::PathBuf;
use survivor::cli::{Cli, Commands};
use survivor::pipeline::{Port, Sex};

#[path = "common/mod.rs"]
mod common;

#[test]
fn test_cli_default_values() {
    let cli = Cli::parse_from(["survivor", "explore"]);

    assert_eq!(cli.seed, None);
    assert_eq!(cli.fare_threshold, 500.0, "Default fare threshold should be 500");
    assert_eq!(cli.test_size, 0.2, "Default test size should be 0.2");
    assert_eq!(
        cli.infer_schema_length, 10000,
        "Default schema inference should be 10000"
    );
    assert_eq!(cli.data_path(), PathBuf::from("data/titanic.csv"));
}

#[test]
fn test_cli_global_args_after_subcommand() {
    let cli = Cli::parse_from([
        "survivor",
        "preprocess",
        "-d",
        "manifest.csv",
        "--seed",
        "7",
        "--test-size",
        "0.3",
        "--fare-threshold",
        "300",
    ]);

    assert_eq!(cli.resolve_seed(), 7);
    let config = cli.preprocess_config(7);
    assert_eq!(config.test_size, 0.3);
    assert_eq!(config.fare_threshold, 300.0);
    assert!(!cli.load_options().drop_outliers);

    match cli.command {
        Commands::Preprocess {
            input,
            output,
            no_split,
        } => {
            assert_eq!(input.data, PathBuf::from("manifest.csv"));
            assert_eq!(output, PathBuf::from("preprocessed"));
            assert!(!no_split);
        }
        other => panic!("Expected preprocess, got {:?}", other),
    }
}

#[test]
fn test_cli_evaluate_defaults() {
    let cli = Cli::parse_from(["survivor", "evaluate", "--export", "scores.json"]);
    match cli.command {
        Commands::Evaluate { folds, export, .. } => {
            assert_eq!(folds, 5);
            assert_eq!(export, Some(PathBuf::from("scores.json")));
        }
        other => panic!("Expected evaluate, got {:?}", other),
    }
}

#[test]
fn test_cli_passenger_args() {
    let cli = Cli::parse_from([
        "survivor",
        "passenger",
        "--class",
        "1",
        "--sex",
        "female",
        "--age",
        "29",
        "--spouse",
        "--children",
        "2",
        "--embarked",
        "C",
    ]);
    let Commands::Passenger {
        passenger,
        interactive,
        model,
        ..
    } = cli.command
    else {
        panic!("Expected passenger subcommand");
    };

    assert!(!interactive);
    assert!(model.is_none());
    let custom = passenger.to_passenger(84.15);
    assert_eq!(custom.pclass, 1);
    assert_eq!(custom.sex, Sex::Female);
    assert_eq!(custom.embarked, Port::Cherbourg);
    assert!(custom.spouse);
    assert_eq!(custom.children, 2);
    // No --fare: the class median is used
    assert_eq!(custom.fare, 84.15);
}

#[test]
fn test_cli_rejects_invalid_values() {
    let cases: [&[&str]; 6] = [
        &["survivor", "explore", "--test-size", "1.5"],
        &["survivor", "explore", "--test-size", "0"],
        &["survivor", "explore", "--fare-threshold", "0"],
        &["survivor", "evaluate", "--folds", "1"],
        &["survivor", "passenger", "--class", "4"],
        &["survivor", "passenger", "--fare", "-3"],
    ];
    for args in cases {
        assert!(Cli::try_parse_from(args).is_err(), "Accepted {:?}", args);
    }
}

#[test]
fn test_cli_requires_subcommand() {
    assert!(Cli::try_parse_from(["survivor"]).is_err());
}

#[test]
fn test_binary_preprocess_writes_outputs() {
    let mut df = common::create_titanic_dataframe();
    let (temp_dir, csv_path) = common::create_temp_csv(&mut df);
    let out_dir = temp_dir.path().join("out");

    Command::cargo_bin("survivor")
        .unwrap()
        .args(["preprocess", "-d"])
        .arg(&csv_path)
        .arg("-o")
        .arg(&out_dir)
        .args(["--seed", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("session seed 1"));

    for file in ["train.csv", "test.csv", "fitted_state.json"] {
        assert!(out_dir.join(file).exists(), "{} was not written", file);
    }
}

#[test]
fn test_binary_missing_file_fails() {
    Command::cargo_bin("survivor")
        .unwrap()
        .args(["explore", "-d", "/nonexistent/titanic.csv"])
        .assert()
        .failure();
}

#[test]
fn test_binary_passenger_uses_exported_state() {
    let mut df = common::create_titanic_dataframe();
    let (temp_dir, csv_path) = common::create_temp_csv(&mut df);
    let out_dir = temp_dir.path().join("out");

    Command::cargo_bin("survivor")
        .unwrap()
        .args(["preprocess", "-d"])
        .arg(&csv_path)
        .arg("-o")
        .arg(&out_dir)
        .args(["--seed", "1"])
        .assert()
        .success();

    Command::cargo_bin("survivor")
        .unwrap()
        .args(["passenger", "-d"])
        .arg(&csv_path)
        .arg("--state")
        .arg(out_dir.join("fitted_state.json"))
        .args(["-m", "Logistic Regression", "--seed", "1", "--class", "1"])
        .args(["--sex", "female"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Using fitted state from"));
}

#[test]
fn test_binary_passenger_rejects_missing_state() {
    let mut df = common::create_small_dataframe();
    let (temp_dir, csv_path) = common::create_temp_csv(&mut df);

    Command::cargo_bin("survivor")
        .unwrap()
        .args(["passenger", "-d"])
        .arg(&csv_path)
        .arg("--state")
        .arg(temp_dir.path().join("absent.json"))
        .assert()
        .failure();
}
