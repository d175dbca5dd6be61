//! Command-line argument definitions using clap

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use crate::model::DEFAULT_FOLDS;
use crate::pipeline::{CustomPassenger, LoadOptions, Port, PreprocessConfig, Sex};

/// Survivor - explore, preprocess and model the Titanic passenger manifest
#[derive(Parser, Debug)]
#[command(name = "survivor")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Seed for the train/test split and cross-validation folds.
    /// A random seed is drawn (and printed) when omitted.
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Rows with a fare at or above this value are treated as outliers
    #[arg(long, global = true, default_value = "500", value_parser = validate_fare_threshold)]
    pub fare_threshold: f64,

    /// Fraction of rows held out for testing (0 < size < 1)
    #[arg(long, global = true, default_value = "0.2", value_parser = validate_test_size)]
    pub test_size: f64,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan.
    #[arg(long, global = true, default_value = "10000")]
    pub infer_schema_length: usize,
}

/// Input shared by every subcommand
#[derive(Args, Debug, Clone)]
pub struct DataArgs {
    /// Passenger manifest (CSV or Parquet)
    #[arg(short, long, default_value = "data/titanic.csv")]
    pub data: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Shape, missing values and survival breakdowns of the manifest
    Explore {
        #[command(flatten)]
        input: DataArgs,
    },

    /// Run the preprocessing pipeline and write the feature matrices
    Preprocess {
        #[command(flatten)]
        input: DataArgs,

        /// Output directory for train.csv, test.csv and fitted_state.json
        #[arg(short, long, default_value = "preprocessed")]
        output: PathBuf,

        /// Preprocess the whole manifest as a single partition
        #[arg(long, default_value = "false")]
        no_split: bool,
    },

    /// Cross-validate every model and report the best one on the hold-out set
    Evaluate {
        #[command(flatten)]
        input: DataArgs,

        /// Number of cross-validation folds
        #[arg(long, default_value_t = DEFAULT_FOLDS, value_parser = validate_folds)]
        folds: usize,

        /// Write the ranking and hold-out scores as JSON
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Score every passenger in the manifest with a trained model
    Predict {
        #[command(flatten)]
        input: DataArgs,

        /// Model name (defaults to the best cross-validated model)
        #[arg(short, long)]
        model: Option<String>,

        /// Write the full ranking to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of rows to show
        #[arg(long, default_value = "20")]
        top: usize,
    },

    /// Estimate the survival chance of a made-up passenger
    Passenger {
        #[command(flatten)]
        input: DataArgs,

        /// Model name (defaults to the best cross-validated model)
        #[arg(short, long)]
        model: Option<String>,

        #[command(flatten)]
        passenger: PassengerArgs,

        /// Encode the passenger with a fitted_state.json written by `preprocess`
        /// instead of fitting on the manifest
        #[arg(long)]
        state: Option<PathBuf>,

        /// Fill in the passenger with interactive prompts
        #[arg(short, long, default_value = "false")]
        interactive: bool,
    },
}

/// Fields of a made-up passenger
#[derive(Args, Debug, Clone)]
pub struct PassengerArgs {
    /// Passenger class (1, 2 or 3)
    #[arg(long = "class", default_value = "3", value_parser = clap::value_parser!(u8).range(1..=3))]
    pub pclass: u8,

    #[arg(long, value_enum, default_value = "male")]
    pub sex: Sex,

    #[arg(long, default_value = "30", value_parser = clap::value_parser!(u32).range(0..=100))]
    pub age: u32,

    /// Travelling with a spouse
    #[arg(long, default_value = "false")]
    pub spouse: bool,

    #[arg(long, default_value = "0", value_parser = clap::value_parser!(u32).range(0..=10))]
    pub siblings: u32,

    #[arg(long, default_value = "0", value_parser = clap::value_parser!(u32).range(0..=2))]
    pub parents: u32,

    #[arg(long, default_value = "0", value_parser = clap::value_parser!(u32).range(0..=10))]
    pub children: u32,

    /// Ticket fare (defaults to the median fare of the class)
    #[arg(long, value_parser = validate_fare)]
    pub fare: Option<f64>,

    /// Port of embarkation (C, Q or S)
    #[arg(long, value_enum, default_value = "S")]
    pub embarked: Port,
}

impl PassengerArgs {
    pub fn to_passenger(&self, default_fare: f64) -> CustomPassenger {
        CustomPassenger {
            pclass: self.pclass,
            sex: self.sex,
            age: self.age,
            spouse: self.spouse,
            siblings: self.siblings,
            parents: self.parents,
            children: self.children,
            fare: self.fare.unwrap_or(default_fare),
            embarked: self.embarked,
        }
    }
}

impl Cli {
    /// The explicit seed, or a freshly drawn one
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }

    pub fn preprocess_config(&self, seed: u64) -> PreprocessConfig {
        PreprocessConfig {
            fare_threshold: self.fare_threshold,
            test_size: self.test_size,
            seed,
        }
    }

    /// Outliers are left in at load time; the pipeline excludes them itself
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            infer_schema_length: self.infer_schema_length,
            drop_outliers: false,
            fare_threshold: self.fare_threshold,
        }
    }

    pub fn data_path(&self) -> &Path {
        match &self.command {
            Commands::Explore { input }
            | Commands::Preprocess { input, .. }
            | Commands::Evaluate { input, .. }
            | Commands::Predict { input, .. }
            | Commands::Passenger { input, .. } => &input.data,
        }
    }
}

fn parse_f64(s: &str) -> Result<f64, String> {
    s.parse()
        .map_err(|_| format!("'{}' is not a valid number", s))
}

/// Validator for fare_threshold parameter
fn validate_fare_threshold(s: &str) -> Result<f64, String> {
    let value = parse_f64(s)?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("fare_threshold must be positive, got {}", value))
    }
}

/// Validator for test_size parameter
fn validate_test_size(s: &str) -> Result<f64, String> {
    let value = parse_f64(s)?;
    if value > 0.0 && value < 1.0 {
        Ok(value)
    } else {
        Err(format!(
            "test_size must be strictly between 0.0 and 1.0, got {}",
            value
        ))
    }
}

fn validate_folds(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid fold count", s))?;
    if value >= 2 {
        Ok(value)
    } else {
        Err(format!("folds must be at least 2, got {}", value))
    }
}

fn validate_fare(s: &str) -> Result<f64, String> {
    let value = parse_f64(s)?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(format!("fare must be zero or more, got {}", value))
    }
}
