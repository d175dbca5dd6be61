//! CLI module - argument parsing, prompts and subcommand handlers

pub mod args;
pub mod evaluate;
pub mod explore;
pub mod predict;
pub mod preprocess;
pub mod prompts;
pub mod workflow;

pub use args::{Cli, Commands, DataArgs, PassengerArgs};
pub use evaluate::run_evaluate;
pub use explore::run_explore;
pub use predict::{run_passenger, run_predict};
pub use preprocess::run_preprocess;
pub use prompts::*;
