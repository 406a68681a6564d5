//! Persistent run state.

pub mod checkpoint;

pub use checkpoint::ResumeCheckpoint;
