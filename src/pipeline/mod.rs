//! Pipeline module - loading, exploring and preprocessing the manifest

pub mod columns;
pub mod encode;
pub mod error;
pub mod explore;
pub mod impute;
pub mod loader;
pub mod matrix;
pub mod missing;
pub mod passenger;
pub mod preprocess;
pub mod records;
pub mod scaler;
pub mod session;
pub mod split;

pub use error::PipelineError;
pub use explore::*;
pub use impute::Imputation;
pub use loader::*;
pub use matrix::FeatureMatrix;
pub use missing::*;
pub use passenger::{fare_bounds, CustomPassenger, FareBounds, Port, Sex};
pub use preprocess::{
    FittedPreprocessor, FittedState, PreprocessConfig, Prepared, Preprocessor, SplitMode,
};
pub use records::{Passenger, Records};
pub use scaler::{ColumnScale, StandardScaler};
pub use session::Session;
pub use split::{stratified_kfold, stratified_split, SplitIndices};
