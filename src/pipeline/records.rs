//! Typed passenger rows extracted from a raw manifest frame
//!
//! This is where the first four pipeline steps happen: outlier exclusion,
//! identifier pruning, feature engineering inputs and target extraction.

use polars::prelude::*;
use tracing::{debug, warn};

use super::columns::*;
use super::error::{PipelineError, Result};

/// One passenger after outlier exclusion, with identifier columns discarded.
///
/// `age` and `embarked` may still be missing; they are filled by
/// [`super::impute::Imputation`] using training statistics only.
#[derive(Debug, Clone, PartialEq)]
pub struct Passenger {
    pub id: i64,
    pub pclass: f64,
    pub sex: String,
    pub age: Option<f64>,
    pub sibsp: f64,
    pub parch: f64,
    pub fare: f64,
    pub embarked: Option<String>,
}

impl Passenger {
    /// Family size: the passenger plus siblings/spouses plus parents/children
    pub fn family(&self) -> f64 {
        self.sibsp + self.parch + 1.0
    }

    /// 1.0 when the passenger travels without family, else 0.0
    pub fn is_alone(&self) -> f64 {
        if self.family() == 1.0 {
            1.0
        } else {
            0.0
        }
    }
}

/// Passengers plus the outcome column, if the input carried one.
///
/// `outcome[i]` is `None` when row `i` has an unknown outcome.
#[derive(Debug, Clone)]
pub struct Records {
    pub passengers: Vec<Passenger>,
    pub outcome: Option<Vec<Option<u8>>>,
}

impl Records {
    /// Extract typed rows from a raw manifest.
    ///
    /// Rows whose fare is missing or not below `fare_threshold` are dropped
    /// before anything else is read. Identifier columns are ignored whether or
    /// not they are present.
    pub fn extract(raw: &DataFrame, fare_threshold: f64) -> Result<Self> {
        let df = exclude_fare_outliers(raw, fare_threshold)?;
        let df = df.drop_many(IDENTIFIER_COLUMNS);

        let height = df.height();
        let ids = passenger_ids(&df)?;
        let pclass = required_f64(&df, PCLASS)?;
        let sex = required_str(&df, SEX)?;
        let age = f64_values(&df, AGE)?;
        let sibsp = required_f64(&df, SIBSP)?;
        let parch = required_f64(&df, PARCH)?;
        let fare = required_f64(&df, FARE)?;
        let embarked = str_values(&df, EMBARKED)?;

        let passengers: Vec<Passenger> = (0..height)
            .map(|i| Passenger {
                id: ids[i],
                pclass: pclass[i],
                sex: sex[i].clone(),
                age: age[i],
                sibsp: sibsp[i],
                parch: parch[i],
                fare: fare[i],
                embarked: embarked[i].clone(),
            })
            .collect();

        let outcome = if df.get_column_names().iter().any(|c| c.as_str() == SURVIVED) {
            Some(outcome_values(&df)?)
        } else {
            None
        };

        debug!(
            input_rows = raw.height(),
            kept_rows = passengers.len(),
            has_outcome = outcome.is_some(),
            "Extracted passenger records"
        );

        Ok(Self {
            passengers,
            outcome,
        })
    }

    pub fn len(&self) -> usize {
        self.passengers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passengers.is_empty()
    }

    /// The outcome as a complete 0/1 vector, or `None` if the column is absent
    /// or any row's outcome is unknown.
    pub fn complete_outcome(&self) -> Option<Vec<u8>> {
        let outcome = self.outcome.as_ref()?;
        let complete: Option<Vec<u8>> = outcome.iter().copied().collect();
        if complete.is_none() {
            warn!(
                unknown = outcome.iter().filter(|v| v.is_none()).count(),
                "Outcome column has unknown values; target omitted"
            );
        }
        complete
    }
}

/// Keep only rows whose fare is present and below `threshold`.
pub fn exclude_fare_outliers(df: &DataFrame, threshold: f64) -> Result<DataFrame> {
    let fare = df
        .column(FARE)
        .map_err(|_| PipelineError::MissingColumn {
            column: FARE.to_string(),
        })?
        .cast(&DataType::Float64)?;

    // Null fares compare to null and are filtered out with the outliers
    let mask = fare.f64()?.lt(threshold);
    Ok(df.filter(&mask)?)
}

fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column> {
    df.column(name).map_err(|_| PipelineError::MissingColumn {
        column: name.to_string(),
    })
}

/// Read a column as nullable floats. NaN and infinite values read as missing.
pub(crate) fn f64_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let cast = column(df, name)?.cast(&DataType::Float64)?;
    Ok(cast
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| x.is_finite()))
        .collect())
}

/// Read a column as nullable strings
pub(crate) fn str_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let cast = column(df, name)?.cast(&DataType::String)?;
    Ok(cast
        .str()?
        .into_iter()
        .map(|v| v.map(|s| s.to_string()))
        .collect())
}

fn required_f64(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    f64_values(df, name)?
        .into_iter()
        .enumerate()
        .map(|(row, v)| {
            v.ok_or_else(|| PipelineError::NullValue {
                column: name.to_string(),
                row,
            })
        })
        .collect()
}

fn required_str(df: &DataFrame, name: &str) -> Result<Vec<String>> {
    str_values(df, name)?
        .into_iter()
        .enumerate()
        .map(|(row, v)| {
            v.ok_or_else(|| PipelineError::NullValue {
                column: name.to_string(),
                row,
            })
        })
        .collect()
}

/// Passenger ids from `PassengerId`, or 1-based positions when the column is absent
fn passenger_ids(df: &DataFrame) -> Result<Vec<i64>> {
    if df.column(PASSENGER_ID).is_err() {
        return Ok((1..=df.height() as i64).collect());
    }
    let cast = df.column(PASSENGER_ID)?.cast(&DataType::Int64)?;
    cast.i64()?
        .into_iter()
        .enumerate()
        .map(|(row, v)| {
            v.ok_or_else(|| PipelineError::NullValue {
                column: PASSENGER_ID.to_string(),
                row,
            })
        })
        .collect()
}

fn outcome_values(df: &DataFrame) -> Result<Vec<Option<u8>>> {
    f64_values(df, SURVIVED)?
        .into_iter()
        .enumerate()
        .map(|(row, v)| match v {
            None => Ok(None),
            Some(x) if x == 0.0 => Ok(Some(0)),
            Some(x) if x == 1.0 => Ok(Some(1)),
            Some(value) => Err(PipelineError::InvalidOutcome { row, value }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataFrame {
        df! {
            PASSENGER_ID => [1i64, 2, 3, 4],
            SURVIVED => [0i64, 1, 1, 0],
            PCLASS => [3i64, 1, 1, 3],
            NAME => ["A", "B", "C", "D"],
            SEX => ["male", "female", "female", "male"],
            AGE => [Some(22.0f64), None, Some(35.0), Some(40.0)],
            SIBSP => [1i64, 1, 0, 0],
            PARCH => [0i64, 0, 0, 2],
            TICKET => ["t1", "t2", "t3", "t4"],
            FARE => [7.25f64, 512.33, 53.1, 8.05],
            CABIN => [None::<&str>, Some("C85"), None, None],
            EMBARKED => [Some("S"), Some("C"), None, Some("Q")],
        }
        .unwrap()
    }

    #[test]
    fn test_extract_drops_outliers_and_keeps_ids() {
        let records = Records::extract(&sample(), 500.0).unwrap();
        let ids: Vec<i64> = records.passengers.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 3, 4]);
        assert_eq!(records.outcome, Some(vec![Some(0), Some(1), Some(0)]));
    }

    #[test]
    fn test_fare_exactly_at_threshold_is_dropped() {
        let records = Records::extract(&sample(), 53.1).unwrap();
        assert!(records.passengers.iter().all(|p| p.fare < 53.1));
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_engineered_family_features() {
        let records = Records::extract(&sample(), 500.0).unwrap();
        let first = &records.passengers[0];
        assert_eq!(first.family(), 2.0);
        assert_eq!(first.is_alone(), 0.0);
        let alone = &records.passengers[1];
        assert_eq!(alone.family(), 1.0);
        assert_eq!(alone.is_alone(), 1.0);
    }

    #[test]
    fn test_extract_without_outcome_or_identifiers() {
        let df = df! {
            PCLASS => [2i64],
            SEX => ["male"],
            AGE => [30.0f64],
            SIBSP => [0i64],
            PARCH => [0i64],
            FARE => [13.0f64],
            EMBARKED => ["S"],
        }
        .unwrap();

        let records = Records::extract(&df, 500.0).unwrap();
        assert!(records.outcome.is_none());
        assert_eq!(records.passengers[0].id, 1);
    }

    #[test]
    fn test_missing_required_column() {
        let df = df! {
            FARE => [10.0f64],
            SEX => ["male"],
        }
        .unwrap();

        let err = Records::extract(&df, 500.0).unwrap_err();
        assert!(matches!(err, PipelineError::MissingColumn { .. }));
    }

    #[test]
    fn test_nan_age_reads_as_missing() {
        let mut df = sample();
        df.with_column(Column::new(
            AGE.into(),
            [Some(f64::NAN), None, Some(35.0), Some(f64::INFINITY)],
        ))
        .unwrap();

        let records = Records::extract(&df, 500.0).unwrap();
        let ages: Vec<Option<f64>> = records.passengers.iter().map(|p| p.age).collect();
        assert_eq!(ages, vec![None, Some(35.0), None]);
    }

    #[test]
    fn test_null_passenger_id_is_an_error() {
        let mut df = sample();
        df.with_column(Column::new(
            PASSENGER_ID.into(),
            [Some(1i64), Some(2), None, Some(4)],
        ))
        .unwrap();

        let err = Records::extract(&df, 500.0).unwrap_err();
        match err {
            PipelineError::NullValue { column, row } => {
                assert_eq!(column, PASSENGER_ID);
                // Row 1 is the fare outlier, so the null id sits at position 1
                assert_eq!(row, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_complete_outcome_with_unknown_rows() {
        let mut df = sample();
        df.with_column(Column::new(
            SURVIVED.into(),
            [Some(0i64), Some(1), None, Some(0)],
        ))
        .unwrap();

        let records = Records::extract(&df, 500.0).unwrap();
        assert!(records.complete_outcome().is_none());
    }
}
