//! The step model.
//!
//! - [`Step`] - One unit of a sequence: `CreateVar`, `WriteFile` or `Runner`
//!
//! Each variant validates itself against a shared [`StepNames`] namespace
//! and applies itself to a value table when executed.
//!
//! [`StepNames`]: crate::config::validator::StepNames

pub mod step;

pub use step::Step;
