//! Custom single-passenger records and per-class fare bounds

use std::collections::BTreeMap;
use std::fmt;

use clap::ValueEnum;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use super::columns::*;
use super::error::{PipelineError, Result};
use super::impute::median;
use super::records::{exclude_fare_outliers, f64_values};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum Sex {
    Female,
    Male,
}

impl Sex {
    /// Value as written in the manifest
    pub fn code(&self) -> &'static str {
        match self {
            Sex::Female => "female",
            Sex::Male => "male",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sex::Female => write!(f, "Female"),
            Sex::Male => write!(f, "Male"),
        }
    }
}

/// Port of embarkation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum Port {
    #[value(name = "C")]
    Cherbourg,
    #[value(name = "Q")]
    Queenstown,
    #[value(name = "S")]
    Southampton,
}

impl Port {
    pub const ALL: [Port; 3] = [Port::Cherbourg, Port::Queenstown, Port::Southampton];

    /// One-letter code as written in the manifest
    pub fn code(&self) -> &'static str {
        match self {
            Port::Cherbourg => "C",
            Port::Queenstown => "Q",
            Port::Southampton => "S",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.code() == code)
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Port::Cherbourg => "Cherbourg",
            Port::Queenstown => "Queenstown",
            Port::Southampton => "Southampton",
        };
        write!(f, "{}", name)
    }
}

pub const MAX_AGE: u32 = 100;
pub const MAX_SIBLINGS: u32 = 10;
pub const MAX_PARENTS: u32 = 2;
pub const MAX_CHILDREN: u32 = 10;

/// A "what-if" passenger entered by the user.
///
/// Spouse and siblings fold into `SibSp`; parents and children into `Parch`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomPassenger {
    pub pclass: u8,
    pub sex: Sex,
    pub age: u32,
    pub spouse: bool,
    pub siblings: u32,
    pub parents: u32,
    pub children: u32,
    pub fare: f64,
    pub embarked: Port,
}

impl CustomPassenger {
    pub fn sibsp(&self) -> u32 {
        u32::from(self.spouse) + self.siblings
    }

    pub fn parch(&self) -> u32 {
        self.parents + self.children
    }

    /// Check the form ranges the interactive inputs enforce
    pub fn validate(&self) -> Result<()> {
        let out_of_range = |field: &str, value: String| -> Result<()> {
            Err(PipelineError::OutOfRange {
                field: field.to_string(),
                value,
            })
        };

        if !(1..=3).contains(&self.pclass) {
            return out_of_range("class", self.pclass.to_string());
        }
        if self.age > MAX_AGE {
            return out_of_range("age", self.age.to_string());
        }
        if self.siblings > MAX_SIBLINGS {
            return out_of_range("siblings", self.siblings.to_string());
        }
        if self.parents > MAX_PARENTS {
            return out_of_range("parents", self.parents.to_string());
        }
        if self.children > MAX_CHILDREN {
            return out_of_range("children", self.children.to_string());
        }
        if !self.fare.is_finite() || self.fare < 0.0 {
            return out_of_range("fare", self.fare.to_string());
        }
        Ok(())
    }

    /// One-row raw frame: no identifier columns and no outcome
    pub fn to_frame(&self) -> Result<DataFrame> {
        self.validate()?;
        Ok(df! {
            PCLASS => [i64::from(self.pclass)],
            SEX => [self.sex.code()],
            AGE => [f64::from(self.age)],
            SIBSP => [i64::from(self.sibsp())],
            PARCH => [i64::from(self.parch())],
            FARE => [self.fare],
            EMBARKED => [self.embarked.code()],
        }?)
    }
}

/// Fare range of one passenger class
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FareBounds {
    pub min: f64,
    pub median: f64,
    pub max: f64,
}

/// Min, median and max fare per passenger class, after outlier exclusion.
pub fn fare_bounds(df: &DataFrame, fare_threshold: f64) -> Result<BTreeMap<u8, FareBounds>> {
    let df = exclude_fare_outliers(df, fare_threshold)?;
    let classes = f64_values(&df, PCLASS)?;
    let fares = f64_values(&df, FARE)?;

    let mut by_class: BTreeMap<u8, Vec<f64>> = BTreeMap::new();
    for (class, fare) in classes.into_iter().zip(fares) {
        if let (Some(class), Some(fare)) = (class, fare) {
            by_class.entry(class as u8).or_default().push(fare);
        }
    }

    Ok(by_class
        .into_iter()
        .filter_map(|(class, fares)| {
            let median = median(fares.iter().copied())?;
            let min = fares.iter().copied().fold(f64::INFINITY, f64::min);
            let max = fares.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            Some((class, FareBounds { min, median, max }))
        })
        .collect())
}
