//! Running workout aggregation
//!
//! Folds every `RepState` of a session into counts and angle sums, so a
//! summary can be produced without keeping the whole frame history.

use std::time::Duration;

use super::summary::WorkoutSummary;
use crate::physics::RepState;

/// Accumulates snapshots for one workout
#[derive(Debug, Clone)]
pub struct SessionRecorder {
    started_at: Duration,
    goal_reps: Option<u32>,
    total_reps: u32,
    good_form_reps: u32,
    /// Angle sums over frames where a subject was detected
    elbow_sum: i64,
    hip_sum: i64,
    tracked_frames: u64,
}

impl SessionRecorder {
    /// Begin recording at clock reading `now`
    pub fn start(now: Duration, goal_reps: Option<u32>) -> Self {
        Self {
            started_at: now,
            goal_reps,
            total_reps: 0,
            good_form_reps: 0,
            elbow_sum: 0,
            hip_sum: 0,
            tracked_frames: 0,
        }
    }

    /// Record one counter snapshot
    pub fn record(&mut self, state: &RepState) {
        // Counts never go backwards within a session
        self.total_reps = self.total_reps.max(state.rep_count);
        self.good_form_reps = self.good_form_reps.max(state.good_form_rep_count);

        if state.subject_detected {
            self.elbow_sum += state.smoothed_elbow_angle as i64;
            self.hip_sum += state.raw_hip_angle as i64;
            self.tracked_frames += 1;
        }
    }

    pub fn tracked_frames(&self) -> u64 {
        self.tracked_frames
    }

    /// Close the session at clock reading `now`
    pub fn finish(&self, now: Duration) -> WorkoutSummary {
        let duration = now.saturating_sub(self.started_at);
        let reps = self.total_reps;

        let (avg_elbow_angle, avg_hip_angle) = if self.tracked_frames > 0 {
            let n = self.tracked_frames as f64;
            ((self.elbow_sum as f64 / n) as f32, (self.hip_sum as f64 / n) as f32)
        } else {
            (0.0, 0.0)
        };

        let (good_form_percentage, avg_tempo_secs) = if reps > 0 {
            (
                self.good_form_reps as f32 / reps as f32 * 100.0,
                duration.as_secs_f32() / reps as f32,
            )
        } else {
            (0.0, 0.0)
        };

        WorkoutSummary {
            total_reps: reps,
            good_form_reps: self.good_form_reps,
            good_form_percentage,
            avg_elbow_angle,
            avg_hip_angle,
            duration_ms: duration.as_millis() as u64,
            avg_tempo_secs,
            goal_reps: self.goal_reps,
            goal_reached: self.goal_reps.map_or(false, |goal| reps >= goal),
        }
    }
}
