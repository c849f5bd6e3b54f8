//! Push-up rep counter
//!
//! Stage machine over the smoothed elbow angle:
//! - any stage -> Up when the elbow extends past the extension threshold
//! - Up -> Down when it flexes past the flexion threshold, at least one
//!   debounce interval after the previous rep; this is the only transition
//!   that counts
//!
//! Hip alignment only scores the rep unless `enforce_hip_form` is set.

use std::time::Duration;

use serde::Serialize;

use super::clock::Clock;
use super::config::CounterConfig;
use super::form::{classify_quality, form_feedback, FormFeedback, HipCheck, RepQuality};
use super::smoothing::AngleHistory;
use super::stage::Stage;

/// Joint angles measured on one frame (degrees)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JointAngleSample {
    pub elbow_deg: i32,
    pub hip_deg: i32,
}

impl JointAngleSample {
    pub fn new(elbow_deg: i32, hip_deg: i32) -> Self {
        Self { elbow_deg, hip_deg }
    }
}

/// What the pose estimator saw on one frame
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Observation {
    Angles(JointAngleSample),
    NoSubject,
}

/// Counter output after one observation
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepState {
    pub rep_count: u32,
    pub good_form_rep_count: u32,
    pub stage: Stage,
    pub smoothed_elbow_angle: i32,
    pub raw_hip_angle: i32,
    pub form_feedback: FormFeedback,
    pub rep_quality: RepQuality,
    /// False for the neutral snapshot reported while tracking is lost
    pub subject_detected: bool,
    /// True only on the update that counted a rep
    pub rep_completed: bool,
}

/// Rep counter with form scoring and double-count suppression
pub struct RepCounter<C> {
    config: CounterConfig,
    clock: C,
    stage: Stage,
    rep_count: u32,
    good_form_rep_count: u32,
    /// Clock reading of the last counted rep
    last_rep_at: Option<Duration>,
    elbow_history: AngleHistory,
}

impl<C: Clock> RepCounter<C> {
    pub fn new(config: CounterConfig, clock: C) -> Self {
        let elbow_history = AngleHistory::new(config.smoothing_window, config.outlier_band_deg);
        Self {
            config,
            clock,
            stage: Stage::Unset,
            rep_count: 0,
            good_form_rep_count: 0,
            last_rep_at: None,
            elbow_history,
        }
    }

    /// Feed one observation
    pub fn observe(&mut self, observation: Observation) -> RepState {
        match observation {
            Observation::Angles(sample) => self.update(sample.elbow_deg, sample.hip_deg),
            Observation::NoSubject => self.no_subject(),
        }
    }

    /// Feed the angles of one frame where a subject was found
    pub fn update(&mut self, raw_elbow_deg: i32, hip_deg: i32) -> RepState {
        let elbow = self.elbow_history.update(raw_elbow_deg);

        let hip = HipCheck::new(hip_deg, &self.config);
        let quality = classify_quality(elbow, hip, &self.config);
        let feedback = form_feedback(elbow, hip_deg, hip, self.stage, quality, &self.config);

        if elbow > self.config.extension_threshold_deg {
            self.stage = Stage::Up;
        }

        let mut rep_completed = false;
        if elbow < self.config.flexion_threshold_deg
            && self.stage == Stage::Up
            && self.debounce_elapsed()
        {
            if self.config.enforce_hip_form && !hip.acceptable {
                log::debug!(
                    "rep blocked by hip form: elbow {}°, hip off by {}°",
                    elbow,
                    hip.deviation
                );
            } else {
                self.stage = Stage::Down;
                self.rep_count += 1;
                self.last_rep_at = Some(self.clock.now());
                if quality.is_good_form() {
                    self.good_form_rep_count += 1;
                }
                rep_completed = true;
                log::debug!(
                    "rep {} counted ({}), elbow {}°, hip {}°",
                    self.rep_count,
                    quality.as_str(),
                    elbow,
                    hip_deg
                );
            }
        }

        RepState {
            rep_count: self.rep_count,
            good_form_rep_count: self.good_form_rep_count,
            stage: self.stage,
            smoothed_elbow_angle: elbow,
            raw_hip_angle: hip_deg,
            form_feedback: feedback,
            rep_quality: quality,
            subject_detected: true,
            rep_completed,
        }
    }

    /// Tracking lost for this frame
    ///
    /// Drops the elbow history so stale samples cannot smooth the next
    /// detection, and reports a neutral snapshot. Counts and the stage
    /// machine are left untouched.
    pub fn no_subject(&mut self) -> RepState {
        self.elbow_history.clear();

        RepState {
            rep_count: self.rep_count,
            good_form_rep_count: self.good_form_rep_count,
            stage: Stage::Unset,
            smoothed_elbow_angle: 0,
            raw_hip_angle: 0,
            form_feedback: FormFeedback::Silent,
            rep_quality: RepQuality::Acceptable,
            subject_detected: false,
            rep_completed: false,
        }
    }

    /// Start a new session
    pub fn reset(&mut self) {
        self.stage = Stage::Unset;
        self.rep_count = 0;
        self.good_form_rep_count = 0;
        self.last_rep_at = None;
        self.elbow_history.clear();
    }

    /// Strictly more than one debounce interval since the last rep
    fn debounce_elapsed(&self) -> bool {
        match self.last_rep_at {
            None => true,
            Some(last) => self.clock.now().saturating_sub(last) > self.config.rep_debounce(),
        }
    }

    pub fn rep_count(&self) -> u32 {
        self.rep_count
    }

    pub fn good_form_rep_count(&self) -> u32 {
        self.good_form_rep_count
    }

    /// Stage of the stage machine (not the display stage)
    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::clock::ManualClock;
    use proptest::prelude::*;

    fn counter_with(config: CounterConfig) -> (RepCounter<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        (RepCounter::new(config, clock.clone()), clock)
    }

    /// Smoothing disabled so every sample drives the stage machine directly
    fn raw_counter() -> (RepCounter<ManualClock>, ManualClock) {
        counter_with(CounterConfig {
            smoothing_window: 1,
            ..CounterConfig::default()
        })
    }

    #[test]
    fn test_full_rep_then_immediate_repeat() {
        let (mut counter, clock) = raw_counter();

        let state = counter.update(170, 180);
        assert_eq!(state.stage, Stage::Up);
        assert_eq!(state.rep_count, 0);

        clock.advance_ms(600);
        let state = counter.update(80, 180);
        assert_eq!(state.rep_count, 1);
        assert_eq!(state.good_form_rep_count, 1);
        assert_eq!(state.rep_quality, RepQuality::Excellent);
        assert_eq!(state.stage, Stage::Down);
        assert!(state.rep_completed);

        // Same instant: inside the debounce window
        assert_eq!(counter.update(170, 180).stage, Stage::Up);
        let state = counter.update(80, 180);
        assert_eq!(state.smoothed_elbow_angle, 80);
        assert_eq!(state.rep_count, 1);
        assert_eq!(state.stage, Stage::Up);
        assert!(!state.rep_completed);
    }

    #[test]
    fn test_debounce_suppresses_double_count() {
        let (mut counter, clock) = raw_counter();

        counter.update(170, 180);
        clock.set(Duration::from_millis(600));
        assert_eq!(counter.update(80, 180).rep_count, 1);

        clock.set(Duration::from_millis(800));
        assert_eq!(counter.update(170, 180).stage, Stage::Up);

        clock.set(Duration::from_millis(900));
        let state = counter.update(80, 180);
        assert_eq!(state.rep_count, 1);
        // Still armed, the next flexion after the window counts
        assert_eq!(state.stage, Stage::Up);

        // Exactly one interval is not enough
        clock.set(Duration::from_millis(1100));
        assert_eq!(counter.update(80, 180).rep_count, 1);

        clock.set(Duration::from_millis(1200));
        let state = counter.update(80, 180);
        assert_eq!(state.rep_count, 2);
        assert_eq!(state.good_form_rep_count, 2);
    }

    #[test]
    fn test_flexion_without_extension_does_not_count() {
        let (mut counter, clock) = raw_counter();
        for _ in 0..5 {
            clock.advance_ms(600);
            let state = counter.update(80, 180);
            assert_eq!(state.rep_count, 0);
            assert_eq!(state.stage, Stage::Unset);
        }
    }

    #[test]
    fn test_half_rep_does_not_count() {
        let (mut counter, clock) = raw_counter();
        counter.update(170, 180);
        clock.advance_ms(600);
        // 110 is the boundary, not below it
        let state = counter.update(110, 180);
        assert_eq!(state.rep_count, 0);
        assert_eq!(state.stage, Stage::Up);
    }

    #[test]
    fn test_bad_hips_still_count_by_default() {
        let (mut counter, clock) = raw_counter();
        counter.update(170, 120);
        clock.advance_ms(600);

        let state = counter.update(80, 120);
        assert_eq!(state.rep_count, 1);
        assert_eq!(state.good_form_rep_count, 0);
        assert_eq!(state.rep_quality, RepQuality::Acceptable);
        assert_eq!(state.form_feedback, FormFeedback::HipsSagging);
    }

    #[test]
    fn test_enforced_hip_form_blocks_rep() {
        let (mut counter, clock) = counter_with(CounterConfig {
            enforce_hip_form: true,
            smoothing_window: 1,
            ..CounterConfig::default()
        });
        counter.update(170, 120);
        clock.advance_ms(600);

        let state = counter.update(80, 120);
        assert_eq!(state.rep_count, 0);
        assert_eq!(state.stage, Stage::Up);

        // Straightening the hips on the next frame completes it
        let state = counter.update(80, 175);
        assert_eq!(state.rep_count, 1);
        assert_eq!(state.good_form_rep_count, 1);
    }

    #[test]
    fn test_quality_of_counted_reps() {
        let (mut counter, clock) = raw_counter();

        counter.update(170, 180);
        clock.advance_ms(600);
        let state = counter.update(95, 170);
        assert_eq!(state.rep_quality, RepQuality::Good);
        assert_eq!(state.good_form_rep_count, 1);

        counter.update(170, 180);
        clock.advance_ms(600);
        let state = counter.update(105, 180);
        assert_eq!(state.rep_count, 2);
        assert_eq!(state.rep_quality, RepQuality::Acceptable);
        assert_eq!(state.good_form_rep_count, 1);
    }

    #[test]
    fn test_feedback_uses_stage_before_transition() {
        let (mut counter, clock) = raw_counter();

        assert_eq!(counter.update(150, 180).form_feedback, FormFeedback::KeepGoing);
        counter.update(170, 180);
        assert_eq!(counter.update(150, 180).form_feedback, FormFeedback::ExtendArms);

        clock.advance_ms(600);
        counter.update(80, 180);
        assert_eq!(counter.update(120, 180).form_feedback, FormFeedback::GoDeeper);
    }

    #[test]
    fn test_smoothing_absorbs_single_frame_dip() {
        let (mut counter, clock) = counter_with(CounterConfig::default());
        for _ in 0..4 {
            counter.update(170, 180);
            clock.advance_ms(33);
        }
        // One glitched frame reads a deep bend
        let state = counter.update(60, 180);
        assert_eq!(state.smoothed_elbow_angle, 170);
        assert_eq!(state.rep_count, 0);
    }

    #[test]
    fn test_no_subject_keeps_counts() {
        let (mut counter, clock) = raw_counter();
        counter.update(170, 180);
        clock.advance_ms(600);
        counter.update(80, 180);

        let state = counter.observe(Observation::NoSubject);
        assert_eq!(state.rep_count, 1);
        assert_eq!(state.good_form_rep_count, 1);
        assert_eq!(state.smoothed_elbow_angle, 0);
        assert_eq!(state.raw_hip_angle, 0);
        assert_eq!(state.form_feedback.message(), "");
        assert_eq!(state.stage, Stage::Unset);
        assert!(!state.subject_detected);
        // Only the display stage is neutral
        assert_eq!(counter.stage(), Stage::Down);
    }

    #[test]
    fn test_no_subject_clears_smoothing_history() {
        let (mut counter, _clock) = counter_with(CounterConfig::default());
        counter.update(90, 180);
        counter.update(90, 180);
        counter.update(90, 180);
        counter.no_subject();

        // With history kept this would be smoothed back to 90
        let state = counter.update(150, 180);
        assert_eq!(state.smoothed_elbow_angle, 150);
    }

    #[test]
    fn test_reset() {
        let (mut counter, clock) = raw_counter();
        counter.update(170, 180);
        clock.advance_ms(600);
        counter.update(80, 180);

        counter.reset();
        assert_eq!(counter.rep_count(), 0);
        assert_eq!(counter.good_form_rep_count(), 0);
        assert_eq!(counter.stage(), Stage::Unset);

        // Debounce timer cleared: counts without advancing the clock
        counter.update(170, 180);
        assert_eq!(counter.update(80, 180).rep_count, 1);
    }

    #[test]
    fn test_clock_running_backwards_never_counts() {
        let (mut counter, clock) = raw_counter();
        clock.set(Duration::from_secs(10));
        counter.update(170, 180);
        counter.update(80, 180);

        clock.set(Duration::from_secs(5));
        counter.update(170, 180);
        assert_eq!(counter.update(80, 180).rep_count, 1);
    }

    #[test]
    fn test_extreme_angles_flow_through() {
        let (mut counter, clock) = raw_counter();

        let state = counter.update(170, i32::MIN);
        assert_eq!(state.stage, Stage::Up);
        assert_eq!(state.raw_hip_angle, i32::MIN);
        assert_eq!(state.rep_quality, RepQuality::Acceptable);
        assert_eq!(state.form_feedback, FormFeedback::HipsSagging);

        clock.advance_ms(600);
        let state = counter.update(i32::MIN, i32::MAX);
        assert_eq!(state.rep_count, 1);
        assert_eq!(state.good_form_rep_count, 0);
        assert_eq!(state.form_feedback, FormFeedback::HipsTooHigh);

        let (mut counter, _clock) = counter_with(CounterConfig::default());
        counter.update(i32::MAX, 180);
        counter.update(i32::MAX, 180);
        assert_eq!(counter.update(-5, 180).smoothed_elbow_angle, i32::MAX);
    }

    #[test]
    fn test_state_serializes_for_ui() {
        let (mut counter, _clock) = raw_counter();
        let json = serde_json::to_value(counter.update(170, 180)).unwrap();
        assert_eq!(json["repCount"], 0);
        assert_eq!(json["stage"], "up");
        assert_eq!(json["repQuality"], "acceptable");
        assert_eq!(json["formFeedback"], "Keep going");

        let json = serde_json::to_value(counter.no_subject()).unwrap();
        assert!(json["stage"].is_null());
    }

    proptest! {
        #[test]
        fn prop_counts_are_consistent(
            frames in prop::collection::vec((0i32..=180, 0i32..=200, 0u64..400, any::<bool>()), 1..200),
            enforce_hip_form in any::<bool>(),
        ) {
            let (mut counter, clock) = counter_with(CounterConfig {
                enforce_hip_form,
                ..CounterConfig::default()
            });
            let mut last_reps = 0;

            for (elbow, hip, dt, lost) in frames {
                clock.advance_ms(dt);
                let state = if lost && dt < 40 {
                    counter.no_subject()
                } else {
                    counter.update(elbow, hip)
                };

                prop_assert!(state.good_form_rep_count <= state.rep_count);
                prop_assert!(state.rep_count >= last_reps);
                prop_assert!(state.rep_count - last_reps <= 1);
                prop_assert_eq!(state.rep_completed, state.rep_count > last_reps);
                last_reps = state.rep_count;
            }
        }

        #[test]
        fn prop_reps_are_spaced_by_debounce(
            frames in prop::collection::vec((0i32..=180, 0u64..300), 1..200),
        ) {
            let (mut counter, clock) = counter_with(CounterConfig::default());
            let mut last_rep_at: Option<Duration> = None;

            for (elbow, dt) in frames {
                clock.advance_ms(dt);
                if counter.update(elbow, 180).rep_completed {
                    let now = clock.now();
                    if let Some(prev) = last_rep_at {
                        prop_assert!(now - prev > Duration::from_millis(500));
                    }
                    last_rep_at = Some(now);
                }
            }
        }
    }
}
