//! Counter tuning - thresholds, debounce and smoothing parameters
//!
//! Deserializes from a partial camelCase object; missing fields take the
//! defaults below.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::smoothing::{DEFAULT_OUTLIER_BAND, DEFAULT_WINDOW};

/// Rejected counter configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("extension threshold {extension}° must be above flexion threshold {flexion}°")]
    ExtensionBelowFlexion { extension: i32, flexion: i32 },

    #[error("perfect flexion threshold {perfect}° must not exceed flexion threshold {flexion}°")]
    PerfectAboveFlexion { perfect: i32, flexion: i32 },

    #[error("perfect flexion threshold {perfect}° must not exceed good flexion threshold {good}°")]
    PerfectAboveGood { perfect: i32, good: i32 },

    #[error("hip perfect band {perfect}° must not exceed hip acceptable band {acceptable}°")]
    HipPerfectAboveAcceptable { perfect: i32, acceptable: i32 },

    #[error("smoothing window must hold at least one sample")]
    EmptySmoothingWindow,

    #[error("outlier band must be positive, got {0}°")]
    NonPositiveOutlierBand(i32),
}

/// Rep counter parameters (angles in degrees)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CounterConfig {
    /// Smoothed elbow below this completes a rep
    pub flexion_threshold_deg: i32,
    /// Elbow at or below this can score Excellent
    pub perfect_flexion_deg: i32,
    /// Elbow at or below this can score Good
    pub good_flexion_deg: i32,
    /// Smoothed elbow above this marks the top of a rep
    pub extension_threshold_deg: i32,
    /// Hip deviation from straight below this is acceptable
    pub hip_acceptable_deg: i32,
    /// Hip deviation from straight below this is perfect
    pub hip_perfect_deg: i32,
    /// Hip deviation above this triggers hip feedback
    pub hip_warning_deg: i32,
    /// Elbow above this while down triggers "go deeper"
    pub depth_warning_deg: i32,
    /// Refuse to count reps with unacceptable hips
    pub enforce_hip_form: bool,
    /// Minimum gap between two counted reps
    pub rep_debounce_ms: u64,
    /// Elbow history length
    pub smoothing_window: usize,
    /// Median rejection band for the elbow history
    pub outlier_band_deg: i32,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            flexion_threshold_deg: 110,
            perfect_flexion_deg: 90,
            good_flexion_deg: 100,
            extension_threshold_deg: 160,
            hip_acceptable_deg: 30,
            hip_perfect_deg: 15,
            hip_warning_deg: 40,
            depth_warning_deg: 105,
            enforce_hip_form: false,
            rep_debounce_ms: 500,
            smoothing_window: DEFAULT_WINDOW,
            outlier_band_deg: DEFAULT_OUTLIER_BAND,
        }
    }
}

impl CounterConfig {
    pub fn rep_debounce(&self) -> Duration {
        Duration::from_millis(self.rep_debounce_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.extension_threshold_deg <= self.flexion_threshold_deg {
            return Err(ConfigError::ExtensionBelowFlexion {
                extension: self.extension_threshold_deg,
                flexion: self.flexion_threshold_deg,
            });
        }
        if self.perfect_flexion_deg > self.flexion_threshold_deg {
            return Err(ConfigError::PerfectAboveFlexion {
                perfect: self.perfect_flexion_deg,
                flexion: self.flexion_threshold_deg,
            });
        }
        if self.perfect_flexion_deg > self.good_flexion_deg {
            return Err(ConfigError::PerfectAboveGood {
                perfect: self.perfect_flexion_deg,
                good: self.good_flexion_deg,
            });
        }
        if self.hip_perfect_deg > self.hip_acceptable_deg {
            return Err(ConfigError::HipPerfectAboveAcceptable {
                perfect: self.hip_perfect_deg,
                acceptable: self.hip_acceptable_deg,
            });
        }
        if self.smoothing_window == 0 {
            return Err(ConfigError::EmptySmoothingWindow);
        }
        if self.outlier_band_deg <= 0 {
            return Err(ConfigError::NonPositiveOutlierBand(self.outlier_band_deg));
        }
        Ok(())
    }
}
