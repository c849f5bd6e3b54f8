//! Physics module - joint angles, smoothing and the rep counting state machine
//!
//! Re-exports only. All logic in submodules.

mod angles;
mod clock;
mod config;
mod counter;
mod form;
mod smoothing;
mod stage;

pub use angles::calculate_angle_deg;
#[cfg(not(target_arch = "wasm32"))]
pub use clock::SystemClock;
pub use clock::{Clock, ManualClock};
pub use config::{ConfigError, CounterConfig};
pub use counter::{JointAngleSample, Observation, RepCounter, RepState};
pub use form::{classify_quality, form_feedback, FormFeedback, HipCheck, RepQuality};
pub use smoothing::{AngleHistory, DEFAULT_OUTLIER_BAND, DEFAULT_WINDOW, MIN_FILTER_SAMPLES};
pub use stage::Stage;
