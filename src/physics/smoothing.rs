//! Angle smoothing with median-based outlier rejection
//!
//! Keeps a short history of elbow angles and averages the samples that sit
//! close to the window median. A single frame where pose estimation snaps to
//! the wrong limb is dropped instead of dragging the average.

use std::collections::VecDeque;

/// Number of buffered samples needed before the filter engages
pub const MIN_FILTER_SAMPLES: usize = 3;

/// Default history length
pub const DEFAULT_WINDOW: usize = 5;

/// Default rejection band around the median (degrees)
pub const DEFAULT_OUTLIER_BAND: i32 = 20;

/// Sliding window of recent angles for one channel
#[derive(Debug, Clone)]
pub struct AngleHistory {
    /// Ring buffer of recent angles, oldest first
    history: VecDeque<i32>,
    capacity: usize,
    /// Samples deviating from the median by this much or more are dropped
    outlier_band: i32,
}

impl AngleHistory {
    pub fn new(capacity: usize, outlier_band: i32) -> Self {
        let capacity = capacity.max(1);
        Self {
            history: VecDeque::with_capacity(capacity + 1),
            capacity,
            outlier_band,
        }
    }

    /// Push a raw angle, returns the smoothed angle
    ///
    /// Below `MIN_FILTER_SAMPLES` the raw value passes through. Otherwise the
    /// result is the truncated mean of every buffered sample within
    /// `outlier_band` of the median.
    pub fn update(&mut self, raw: i32) -> i32 {
        self.history.push_back(raw);

        if self.history.len() > self.capacity {
            self.history.pop_front();
        }

        if self.history.len() < MIN_FILTER_SAMPLES {
            return raw;
        }

        let median = i64::from(self.median());
        let band = i64::from(self.outlier_band);

        let (sum, count) = self
            .history
            .iter()
            .filter(|&&v| (i64::from(v) - median).abs() < band)
            .fold((0i64, 0i64), |(sum, count), &v| (sum + v as i64, count + 1));

        if count == 0 {
            return raw;
        }

        (sum / count) as i32
    }

    /// Upper median of the buffered samples
    ///
    /// Always one of the samples, so the median itself survives the band.
    fn median(&self) -> i32 {
        let mut sorted: Vec<i32> = self.history.iter().copied().collect();
        sorted.sort_unstable();
        sorted[sorted.len() / 2]
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Clear history (tracking lost or new session)
    pub fn clear(&mut self) {
        self.history.clear();
    }
}

impl Default for AngleHistory {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW, DEFAULT_OUTLIER_BAND)
    }
}
