//! Session module - aggregates counter snapshots into a workout summary
//!
//! Re-exports only. All logic in submodules.

mod recorder;
mod summary;

pub use recorder::SessionRecorder;
pub use summary::WorkoutSummary;
