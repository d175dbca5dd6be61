//! Shared test utilities and fixture generators

use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use tempfile::TempDir;

pub const MANIFEST_ROWS: usize = 891;
pub const MISSING_AGES: usize = 177;
pub const MISSING_PORTS: usize = 2;
pub const FARE_OUTLIERS: usize = 3;

/// Rows whose fare is 512.3292 (above the default outlier threshold)
const OUTLIER_ROWS: [usize; FARE_OUTLIERS] = [258, 679, 737];
/// Rows with no port of embarkation
const UNKNOWN_PORT_ROWS: [usize; MISSING_PORTS] = [61, 829];

/// Create a synthetic manifest shaped like the Titanic training set.
///
/// The data is seeded, so every call returns the same frame:
/// - 891 passengers, `PassengerId` 1..=891
/// - 177 missing ages (every fifth row, first 177 of them)
/// - 2 missing ports, 3 fares of 512.3292
/// - survival depends on sex and class, so models can beat the baseline
pub fn create_titanic_dataframe() -> DataFrame {
    let mut rng = StdRng::seed_from_u64(1912);

    let mut ids = Vec::with_capacity(MANIFEST_ROWS);
    let mut survived = Vec::with_capacity(MANIFEST_ROWS);
    let mut pclass = Vec::with_capacity(MANIFEST_ROWS);
    let mut names = Vec::with_capacity(MANIFEST_ROWS);
    let mut sex = Vec::with_capacity(MANIFEST_ROWS);
    let mut age = Vec::with_capacity(MANIFEST_ROWS);
    let mut sibsp = Vec::with_capacity(MANIFEST_ROWS);
    let mut parch = Vec::with_capacity(MANIFEST_ROWS);
    let mut ticket = Vec::with_capacity(MANIFEST_ROWS);
    let mut fare = Vec::with_capacity(MANIFEST_ROWS);
    let mut cabin = Vec::with_capacity(MANIFEST_ROWS);
    let mut embarked = Vec::with_capacity(MANIFEST_ROWS);

    let mut ages_dropped = 0;
    for i in 0..MANIFEST_ROWS {
        let outlier = OUTLIER_ROWS.contains(&i);
        let class: i64 = if outlier {
            1
        } else {
            match rng.gen::<f64>() {
                r if r < 0.24 => 1,
                r if r < 0.45 => 2,
                _ => 3,
            }
        };
        let female = rng.gen::<f64>() < 0.35;

        let mut chance: f64 = if female { 0.74 } else { 0.19 };
        chance += match class {
            1 => 0.15,
            2 => 0.0,
            _ => -0.12,
        };
        let lived = rng.gen::<f64>() < chance.clamp(0.02, 0.98);

        let passenger_age = 1.0 + (rng.gen::<f64>() * 79.0 * 10.0).round() / 10.0;
        let missing_age = i % 5 == 0 && ages_dropped < MISSING_AGES;
        if missing_age {
            ages_dropped += 1;
        }

        let passenger_fare = if outlier {
            512.3292
        } else {
            match class {
                1 => 30.0 + rng.gen::<f64>() * 230.0,
                2 => 10.0 + rng.gen::<f64>() * 30.0,
                _ => 5.0 + rng.gen::<f64>() * 20.0,
            }
        };

        let port = if UNKNOWN_PORT_ROWS.contains(&i) {
            None
        } else {
            Some(match rng.gen::<f64>() {
                r if r < 0.72 => "S",
                r if r < 0.91 => "C",
                _ => "Q",
            })
        };

        ids.push(i as i64 + 1);
        survived.push(i64::from(lived));
        pclass.push(class);
        names.push(format!("Passenger {}", i + 1));
        sex.push(if female { "female" } else { "male" });
        age.push(if missing_age { None } else { Some(passenger_age) });
        sibsp.push(if rng.gen::<f64>() < 0.7 { 0i64 } else { rng.gen_range(1..=3) });
        parch.push(if rng.gen::<f64>() < 0.75 { 0i64 } else { rng.gen_range(1..=2) });
        ticket.push(format!("T{}", 1000 + i));
        fare.push((passenger_fare * 10000.0_f64).round() / 10000.0);
        cabin.push(if class == 1 { Some(format!("C{}", i)) } else { None });
        embarked.push(port);
    }

    df! {
        "PassengerId" => ids,
        "Survived" => survived,
        "Pclass" => pclass,
        "Name" => names,
        "Sex" => sex,
        "Age" => age,
        "SibSp" => sibsp,
        "Parch" => parch,
        "Ticket" => ticket,
        "Fare" => fare,
        "Cabin" => cabin,
        "Embarked" => embarked,
    }
    .unwrap()
}

/// Create a small manifest with a missing age and a missing port
pub fn create_small_dataframe() -> DataFrame {
    df! {
        "PassengerId" => [1i64, 2, 3, 4, 5, 6, 7, 8, 9, 10],
        "Survived" => [0i64, 1, 1, 0, 0, 1, 0, 1, 0, 1],
        "Pclass" => [3i64, 1, 3, 1, 3, 2, 3, 2, 3, 1],
        "Name" => ["a", "b", "c", "d", "e", "f", "g", "h", "i", "j"],
        "Sex" => ["male", "female", "female", "male", "male", "female", "male", "female", "male", "female"],
        "Age" => [Some(22.0f64), Some(38.0), Some(26.0), None, Some(35.0), Some(27.0), Some(2.0), Some(14.0), Some(20.0), Some(58.0)],
        "SibSp" => [1i64, 1, 0, 1, 0, 0, 3, 1, 0, 0],
        "Parch" => [0i64, 0, 0, 0, 0, 2, 1, 0, 0, 0],
        "Ticket" => ["t1", "t2", "t3", "t4", "t5", "t6", "t7", "t8", "t9", "t10"],
        "Fare" => [7.25f64, 71.28, 7.92, 53.1, 8.05, 11.13, 21.07, 30.07, 8.05, 26.55],
        "Cabin" => [None, Some("C85"), None, Some("C123"), None, None, None, None, None, Some("C103")],
        "Embarked" => [Some("S"), Some("C"), Some("S"), Some("S"), None, Some("S"), Some("Q"), Some("C"), Some("S"), Some("S")],
    }
    .unwrap()
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("titanic.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("titanic.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}

/// Assert that a DataFrame contains specific columns
pub fn assert_has_columns(df: &DataFrame, expected_cols: &[&str]) {
    let actual_cols: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    for col in expected_cols {
        assert!(
            actual_cols.contains(&col.to_string()),
            "Missing expected column: '{}'. Actual columns: {:?}",
            col,
            actual_cols
        );
    }
}

/// Assert that a DataFrame does NOT contain specific columns
pub fn assert_missing_columns(df: &DataFrame, unexpected_cols: &[&str]) {
    let actual_cols: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    for col in unexpected_cols {
        assert!(
            !actual_cols.contains(&col.to_string()),
            "Unexpected column still present: '{}'",
            col
        );
    }
}

/// Assert two float slices are equal within `tol`
pub fn assert_close(actual: &[f64], expected: &[f64], tol: f64) {
    assert_eq!(actual.len(), expected.len(), "Length mismatch");
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!((a - e).abs() <= tol, "Value {} differs: {} vs {}", i, a, e);
    }
}
