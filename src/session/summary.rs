//! Finished workout summary, ready for persistence or display

use serde::{Deserialize, Serialize};

/// Totals and averages for one workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSummary {
    pub total_reps: u32,
    pub good_form_reps: u32,
    /// Share of reps with good form, 0-100
    pub good_form_percentage: f32,
    /// Mean smoothed elbow angle over frames with a subject
    pub avg_elbow_angle: f32,
    /// Mean hip angle over frames with a subject
    pub avg_hip_angle: f32,
    pub duration_ms: u64,
    /// Seconds per rep
    pub avg_tempo_secs: f32,
    pub goal_reps: Option<u32>,
    pub goal_reached: bool,
}

impl WorkoutSummary {
    /// Short note stored alongside the session
    pub fn notes(&self) -> String {
        format!("Good form reps: {}/{}", self.good_form_reps, self.total_reps)
    }
}
