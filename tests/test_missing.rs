//! Unit tests for missing value analysis

use survivor::pipeline::{analyze_missing_values, columns_with_missing};
use polars::prelude::*;

#[path = "common/mod.rs"]
mod common;

#[test]
fn test_analyze_missing_values_basic() {
    let df = df! {
        "col_complete" => [1.0f64, 2.0, 3.0, 4.0, 5.0],
        "col_partial_missing" => [Some(1.0f64), Some(2.0), None, None, Some(5.0)],
        "col_all_missing" => [None::<f64>, None, None, None, None],
    }
    .unwrap();

    let stats = analyze_missing_values(&df).unwrap();

    let ratio_map: std::collections::HashMap<_, _> =
        stats.iter().map(|s| (s.column.as_str(), s.ratio)).collect();

    assert!((ratio_map["col_complete"] - 0.0).abs() < 0.001);
    assert!(
        (ratio_map["col_partial_missing"] - 0.4).abs() < 0.001,
        "col_partial_missing should have 40% missing, got {}",
        ratio_map["col_partial_missing"]
    );
    assert!((ratio_map["col_all_missing"] - 1.0).abs() < 0.001);
}

#[test]
fn test_manifest_missing_counts() {
    let df = common::create_titanic_dataframe();
    let stats = analyze_missing_values(&df).unwrap();

    let count = |name: &str| stats.iter().find(|s| s.column == name).unwrap().missing;
    assert_eq!(count("Age"), common::MISSING_AGES);
    assert_eq!(count("Embarked"), common::MISSING_PORTS);
    assert_eq!(count("Fare"), 0);
    assert_eq!(count("Survived"), 0);
}

#[test]
fn test_analyze_missing_values_sorted_descending() {
    let df = common::create_titanic_dataframe();
    let stats = analyze_missing_values(&df).unwrap();

    for pair in stats.windows(2) {
        assert!(
            pair[0].ratio >= pair[1].ratio,
            "Ratios should be sorted descending: {} >= {}",
            pair[0].ratio,
            pair[1].ratio
        );
    }
    // Cabin is only filled in for first class
    assert_eq!(stats[0].column, "Cabin");
}

#[test]
fn test_columns_with_missing() {
    let df = common::create_small_dataframe();
    let stats = analyze_missing_values(&df).unwrap();
    let mut names: Vec<&str> = columns_with_missing(&stats)
        .iter()
        .map(|s| s.column.as_str())
        .collect();
    names.sort();
    assert_eq!(names, vec!["Age", "Cabin", "Embarked"]);
}

#[test]
fn test_empty_dataframe() {
    let df = DataFrame::empty();
    let stats = analyze_missing_values(&df).unwrap();
    assert!(stats.is_empty(), "Empty DataFrame should return empty stats");
}

#[test]
fn test_with_integer_and_string_columns() {
    let df = df! {
        "int_col" => [Some(1i32), None, Some(3), None, Some(5)],
        "str_col" => [Some("a"), Some("b"), None, Some("d"), Some("e")],
    }
    .unwrap();

    let stats = analyze_missing_values(&df).unwrap();
    assert_eq!(stats[0].column, "int_col");
    assert_eq!(stats[0].missing, 2);
    assert_eq!(stats[1].missing, 1);
}
