//! Workout integration - connects the rep counter with landmark frames
//!
//! Owns the active workout (counter + session recorder) and exports the
//! per-frame entry points called from JavaScript.

use std::cell::RefCell;
use std::time::Duration;

use wasm_bindgen::prelude::*;

use super::error::BridgeError;
use super::landmarks::{joint_angles, parse_landmarks, store_landmarks};
use crate::physics::{Clock, CounterConfig, JointAngleSample, Observation, RepCounter, RepState};
use crate::session::{SessionRecorder, WorkoutSummary};

/// Browser time source: `performance.now()`, or `Date.now()` off the main window
pub struct JsClock {
    performance: Option<web_sys::Performance>,
}

impl JsClock {
    pub fn new() -> Self {
        Self {
            performance: web_sys::window().and_then(|window| window.performance()),
        }
    }
}

impl Default for JsClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for JsClock {
    fn now(&self) -> Duration {
        let ms = match &self.performance {
            Some(performance) => performance.now(),
            None => js_sys::Date::now(),
        };
        Duration::from_secs_f64(ms.max(0.0) / 1000.0)
    }
}

/// Rep state for JavaScript consumption
#[derive(Debug, Clone, PartialEq)]
#[wasm_bindgen(getter_with_clone)]
pub struct JsRepState {
    pub rep_count: u32,
    pub good_form_rep_count: u32,
    /// "up", "down" or undefined
    pub stage: Option<String>,
    pub smoothed_elbow_angle: i32,
    pub raw_hip_angle: i32,
    /// Coaching cue, empty while nobody is in view
    pub form_feedback: String,
    /// "excellent", "good" or "acceptable"
    pub rep_quality: String,
    pub subject_detected: bool,
    /// Set only on the frame that counted a rep
    pub rep_completed: bool,
}

impl From<&RepState> for JsRepState {
    fn from(state: &RepState) -> Self {
        Self {
            rep_count: state.rep_count,
            good_form_rep_count: state.good_form_rep_count,
            stage: state.stage.label().map(str::to_string),
            smoothed_elbow_angle: state.smoothed_elbow_angle,
            raw_hip_angle: state.raw_hip_angle,
            form_feedback: state.form_feedback.message().to_string(),
            rep_quality: state.rep_quality.as_str().to_string(),
            subject_detected: state.subject_detected,
            rep_completed: state.rep_completed,
        }
    }
}

/// One workout: counter, recorder and the last snapshot
pub struct Workout<C: Clock> {
    counter: RepCounter<C>,
    recorder: SessionRecorder,
    goal_reps: Option<u32>,
    last_state: Option<RepState>,
}

impl<C: Clock> Workout<C> {
    pub fn start(config: CounterConfig, goal_reps: Option<u32>, clock: C) -> Result<Self, BridgeError> {
        config.validate()?;
        let recorder = SessionRecorder::start(clock.now(), goal_reps);
        Ok(Self {
            counter: RepCounter::new(config, clock),
            recorder,
            goal_reps,
            last_state: None,
        })
    }

    pub fn observe(&mut self, observation: Observation) -> RepState {
        let state = self.counter.observe(observation);
        self.recorder.record(&state);
        self.last_state = Some(state.clone());
        state
    }

    pub fn update_angles(&mut self, elbow_deg: i32, hip_deg: i32) -> RepState {
        self.observe(Observation::Angles(JointAngleSample::new(elbow_deg, hip_deg)))
    }

    pub fn last_state(&self) -> Option<&RepState> {
        self.last_state.as_ref()
    }

    /// Restart counting in place, keeping config and goal
    pub fn reset(&mut self) {
        self.counter.reset();
        self.recorder = SessionRecorder::start(self.counter.clock().now(), self.goal_reps);
        self.last_state = None;
    }

    pub fn finish(&self) -> WorkoutSummary {
        self.recorder.finish(self.counter.clock().now())
    }
}

// Thread-local storage (WASM is single-threaded)
thread_local! {
    static WORKOUT: RefCell<Option<Workout<JsClock>>> = RefCell::new(None);
}

fn with_workout<T>(f: impl FnOnce(&mut Workout<JsClock>) -> T) -> Result<T, BridgeError> {
    WORKOUT.with(|cell| {
        let mut workout = cell.borrow_mut();
        workout.as_mut().map(f).ok_or(BridgeError::NoActiveWorkout)
    })
}

// ============================================================================
// WASM ENTRY POINTS
// ============================================================================

/// Start a workout, replacing any workout in progress
///
/// `config` is a partial counter config object; undefined or null uses the
/// defaults.
#[wasm_bindgen]
pub fn start_workout(config: JsValue, goal_reps: Option<u32>) -> Result<(), JsValue> {
    let config: CounterConfig = if config.is_undefined() || config.is_null() {
        CounterConfig::default()
    } else {
        serde_wasm_bindgen::from_value(config).map_err(BridgeError::from)?
    };

    let workout = Workout::start(config, goal_reps, JsClock::new())?;
    WORKOUT.with(|cell| *cell.borrow_mut() = Some(workout));
    store_landmarks(None);

    log::info!("workout started (goal: {:?})", goal_reps);
    Ok(())
}

/// Process one frame of 33 x (x, y, z, visibility) landmarks
///
/// An empty array reports that nobody is in view.
#[wasm_bindgen]
pub fn process_landmarks(data: &[f32]) -> Result<JsRepState, JsValue> {
    let state = observe_landmarks(data)?;
    Ok(JsRepState::from(&state))
}

/// Overlay storage follows the frame only while a workout is active; a
/// rejected buffer clears it.
fn observe_landmarks(data: &[f32]) -> Result<RepState, BridgeError> {
    with_workout(|workout| {
        let landmarks = match parse_landmarks(data) {
            Ok(landmarks) => landmarks,
            Err(err) => {
                log::warn!("{}", err);
                store_landmarks(None);
                return Err(err);
            }
        };
        store_landmarks(landmarks.as_ref());

        let observation = match landmarks {
            Some(landmarks) => Observation::Angles(joint_angles(&landmarks)),
            None => Observation::NoSubject,
        };
        Ok(workout.observe(observation))
    })?
}

/// Process angles computed by the caller's own pose pipeline
#[wasm_bindgen]
pub fn process_angles(elbow_deg: i32, hip_deg: i32) -> Result<JsRepState, JsValue> {
    let state = with_workout(|workout| workout.update_angles(elbow_deg, hip_deg))?;
    Ok(JsRepState::from(&state))
}

/// The detector found nobody in this frame
#[wasm_bindgen]
pub fn report_no_subject() -> Result<JsRepState, JsValue> {
    let state = with_workout(|workout| workout.observe(Observation::NoSubject))?;
    store_landmarks(None);
    Ok(JsRepState::from(&state))
}

/// Last snapshot, undefined before the first frame
#[wasm_bindgen]
pub fn get_rep_state() -> Option<JsRepState> {
    with_workout(|workout| workout.last_state().map(JsRepState::from))
        .ok()
        .flatten()
}

#[wasm_bindgen]
pub fn is_workout_active() -> bool {
    WORKOUT.with(|cell| cell.borrow().is_some())
}

/// Zero the counters without ending the workout
#[wasm_bindgen]
pub fn reset_workout() -> Result<(), JsValue> {
    with_workout(Workout::reset)?;
    log::info!("workout reset");
    Ok(())
}

/// End the workout and return its summary object
#[wasm_bindgen]
pub fn finish_workout() -> Result<JsValue, JsValue> {
    let workout = WORKOUT
        .with(|cell| cell.borrow_mut().take())
        .ok_or(BridgeError::NoActiveWorkout)?;
    store_landmarks(None);

    let summary = workout.finish();
    log::info!(
        "workout finished: {} reps, {} with good form, {} ms",
        summary.total_reps,
        summary.good_form_reps,
        summary.duration_ms
    );

    let value = serde_wasm_bindgen::to_value(&summary).map_err(BridgeError::from)?;
    Ok(value)
}
