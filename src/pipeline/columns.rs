//! Column names of the passenger manifest and of the derived feature matrix

pub const PASSENGER_ID: &str = "PassengerId";
pub const SURVIVED: &str = "Survived";
pub const PCLASS: &str = "Pclass";
pub const NAME: &str = "Name";
pub const SEX: &str = "Sex";
pub const AGE: &str = "Age";
pub const SIBSP: &str = "SibSp";
pub const PARCH: &str = "Parch";
pub const TICKET: &str = "Ticket";
pub const FARE: &str = "Fare";
pub const CABIN: &str = "Cabin";
pub const EMBARKED: &str = "Embarked";

pub const FAMILY: &str = "Family";
pub const IS_ALONE: &str = "IsAlone";

/// Free-text and identifier columns with no predictive signal
pub const IDENTIFIER_COLUMNS: [&str; 3] = [NAME, TICKET, CABIN];

/// Columns every manifest (including a custom single passenger) must carry
pub const REQUIRED_COLUMNS: [&str; 7] = [PCLASS, SEX, AGE, SIBSP, PARCH, FARE, EMBARKED];

/// Numeric columns fed to the standard scaler, in fit order
pub const SCALED_COLUMNS: [&str; 6] = [AGE, FARE, SIBSP, PARCH, PCLASS, FAMILY];

/// Indicator columns removed after one-hot encoding (one reference level per field)
pub const REFERENCE_INDICATORS: [&str; 2] = ["Sex_female", "Embarked_C"];

/// Fares at or above this value are treated as outliers
pub const DEFAULT_FARE_THRESHOLD: f64 = 500.0;
