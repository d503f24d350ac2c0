//! cairn-seed — pushes a canned demo graph to the graph service.
//!
//! The library half holds the seeder (payload construction, send/query
//! operations) and the run orchestration; `main.rs` is the CLI shell.

pub mod error;
pub mod run;
pub mod seeder;

pub use error::{Result, SeedError};
pub use run::{run_seed, RunOutcome};
pub use seeder::{SeedProfile, SendReport, Seeder, StepOutcome};
