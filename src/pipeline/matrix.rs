//! Numeric feature matrix backed by a polars DataFrame

use ndarray::Array2;
use polars::prelude::*;
use tracing::warn;

use super::columns::{PASSENGER_ID, SURVIVED};
use super::error::{PipelineError, Result};

/// A model-ready feature matrix: every column `Float64`, no nulls, and one
/// passenger id per row so targets can be matched back to passengers.
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    frame: DataFrame,
    ids: Vec<i64>,
}

impl FeatureMatrix {
    /// Build a matrix from named columns. Every column must have one value per id.
    pub fn from_columns(ids: Vec<i64>, columns: Vec<(String, Vec<f64>)>) -> Result<Self> {
        let height = ids.len();
        let mut cols: Vec<Column> = Vec::with_capacity(columns.len());

        for (name, values) in columns {
            if values.len() != height {
                return Err(PipelineError::Polars(PolarsError::ShapeMismatch(
                    format!(
                        "column '{}' has {} values, expected {}",
                        name,
                        values.len(),
                        height
                    )
                    .into(),
                )));
            }
            cols.push(Column::new(name.into(), values));
        }

        Ok(Self {
            frame: DataFrame::new(cols)?,
            ids,
        })
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn ids(&self) -> &[i64] {
        &self.ids
    }

    pub fn height(&self) -> usize {
        self.ids.len()
    }

    pub fn width(&self) -> usize {
        self.frame.width()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Values of a column, or `None` if the column does not exist
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let column = self.frame.column(name).ok()?;
        let ca = column.f64().ok()?;
        Some(ca.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
    }

    /// True if any cell is null or NaN
    pub fn has_missing(&self) -> bool {
        self.frame.get_columns().iter().any(|c| {
            c.null_count() > 0
                || c.f64()
                    .map(|ca| ca.into_iter().any(|v| v.map_or(true, f64::is_nan)))
                    .unwrap_or(true)
        })
    }

    /// All columns as owned vectors, in column order
    fn columns(&self) -> Result<Vec<(String, Vec<f64>)>> {
        self.frame
            .get_columns()
            .iter()
            .map(|c| {
                let values = c
                    .f64()?
                    .into_iter()
                    .enumerate()
                    .map(|(row, v)| {
                        v.ok_or_else(|| PipelineError::NullValue {
                            column: c.name().to_string(),
                            row,
                        })
                    })
                    .collect::<Result<Vec<f64>>>()?;
                Ok((c.name().to_string(), values))
            })
            .collect()
    }

    /// Dense `rows x columns` copy of the data, as consumed by the classifiers
    pub fn to_array(&self) -> Result<Array2<f64>> {
        let columns = self.columns()?;
        Ok(Array2::from_shape_fn((self.height(), columns.len()), |(i, j)| {
            columns[j].1[i]
        }))
    }

    /// Reorder to exactly `schema`: columns absent here are zero-filled and
    /// columns not in `schema` are dropped.
    pub fn reindex(&self, schema: &[String]) -> Result<Self> {
        let dropped: Vec<String> = self
            .column_names()
            .into_iter()
            .filter(|name| !schema.contains(name))
            .collect();
        if !dropped.is_empty() {
            warn!(columns = ?dropped, "Dropping columns unknown to the training schema");
        }

        let height = self.height();
        let mut cols: Vec<Column> = Vec::with_capacity(schema.len());
        for name in schema {
            match self.frame.column(name) {
                Ok(column) => cols.push(column.clone()),
                Err(_) => cols.push(Column::new(name.as_str().into(), vec![0.0f64; height])),
            }
        }

        Ok(Self {
            frame: DataFrame::new(cols)?,
            ids: self.ids.clone(),
        })
    }

    /// Frame with a leading `PassengerId` column and, if given, a trailing
    /// `Survived` column; used for writing matrices to disk.
    pub fn to_frame_with_target(&self, target: Option<&[u8]>) -> Result<DataFrame> {
        let mut cols: Vec<Column> = Vec::with_capacity(self.width() + 2);
        cols.push(Column::new(PASSENGER_ID.into(), self.ids.clone()));
        cols.extend(self.frame.get_columns().iter().cloned());
        if let Some(target) = target {
            let values: Vec<i32> = target.iter().map(|&v| v as i32).collect();
            cols.push(Column::new(SURVIVED.into(), values));
        }
        Ok(DataFrame::new(cols)?)
    }
}
