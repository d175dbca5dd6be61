//! Report module - terminal tables and file exports

pub mod exploration;
pub mod export;
pub mod predictions;
pub mod summary;

pub use export::*;
pub use predictions::*;
pub use summary::*;
