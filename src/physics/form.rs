//! Form scoring - rep quality tiers and coaching feedback
//!
//! Push-up form is judged from two signals: elbow depth and how far the hip
//! angle deviates from a straight body line (180°).

use serde::{Serialize, Serializer};

use super::config::CounterConfig;
use super::stage::Stage;

/// Quality tier of the current observation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RepQuality {
    Excellent,
    Good,
    Acceptable,
}

impl RepQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepQuality::Excellent => "excellent",
            RepQuality::Good => "good",
            RepQuality::Acceptable => "acceptable",
        }
    }

    /// Counted reps of this tier increment the good-form total
    pub fn is_good_form(&self) -> bool {
        !matches!(self, RepQuality::Acceptable)
    }
}

/// Hip alignment derived from one hip angle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HipCheck {
    /// |hip - 180|, widened so any input angle fits
    pub deviation: i64,
    pub acceptable: bool,
    pub perfect: bool,
}

impl HipCheck {
    pub fn new(hip_deg: i32, config: &CounterConfig) -> Self {
        let deviation = (i64::from(hip_deg) - 180).abs();
        Self {
            deviation,
            acceptable: deviation < i64::from(config.hip_acceptable_deg),
            perfect: deviation < i64::from(config.hip_perfect_deg),
        }
    }
}

/// Classify quality; first matching tier wins
pub fn classify_quality(elbow_deg: i32, hip: HipCheck, config: &CounterConfig) -> RepQuality {
    if elbow_deg <= config.perfect_flexion_deg && hip.perfect {
        RepQuality::Excellent
    } else if elbow_deg <= config.good_flexion_deg && hip.acceptable {
        RepQuality::Good
    } else {
        RepQuality::Acceptable
    }
}

/// Coaching cue shown alongside the counter
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FormFeedback {
    HipsSagging,
    HipsTooHigh,
    GoDeeper,
    ExtendArms,
    Perfect,
    Good,
    KeepGoing,
    /// No subject in frame, nothing to say
    Silent,
}

impl FormFeedback {
    pub fn message(&self) -> &'static str {
        match self {
            FormFeedback::HipsSagging => "Hips sagging, engage your core",
            FormFeedback::HipsTooHigh => "Lower your hips",
            FormFeedback::GoDeeper => "Go deeper",
            FormFeedback::ExtendArms => "Extend your arms fully",
            FormFeedback::Perfect => "Perfect form!",
            FormFeedback::Good => "Good form, keep it up",
            FormFeedback::KeepGoing => "Keep going",
            FormFeedback::Silent => "",
        }
    }
}

impl Serialize for FormFeedback {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.message())
    }
}

/// Pick the feedback cue; body line problems take priority over depth
///
/// `stage` is the stage before this observation's transitions.
pub fn form_feedback(
    elbow_deg: i32,
    hip_deg: i32,
    hip: HipCheck,
    stage: Stage,
    quality: RepQuality,
    config: &CounterConfig,
) -> FormFeedback {
    let hip_warning = hip.deviation > i64::from(config.hip_warning_deg);
    if hip_warning && hip_deg < 180 {
        FormFeedback::HipsSagging
    } else if hip_warning && hip_deg > 180 {
        FormFeedback::HipsTooHigh
    } else if elbow_deg > config.depth_warning_deg && stage == Stage::Down {
        FormFeedback::GoDeeper
    } else if elbow_deg < config.extension_threshold_deg && stage == Stage::Up {
        FormFeedback::ExtendArms
    } else {
        match quality {
            RepQuality::Excellent => FormFeedback::Perfect,
            RepQuality::Good => FormFeedback::Good,
            RepQuality::Acceptable => FormFeedback::KeepGoing,
        }
    }
}
