//! Sequence execution orchestration.

pub mod executor;

pub use executor::{Executor, RunProgress, RunSummary, Sleeper, ThreadSleeper};
