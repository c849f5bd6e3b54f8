//! Pose landmark ingestion and storage
//!
//! Receives MediaPipe Pose landmarks from JavaScript, derives the elbow and
//! hip angles from whichever body side is more visible, and keeps the frame
//! for the skeleton overlay.

use std::cell::RefCell;

use wasm_bindgen::prelude::*;

use super::error::BridgeError;
use crate::physics::{calculate_angle_deg, JointAngleSample};

// ============================================================================
// LANDMARK INDICES (MediaPipe Pose - 33 total)
// ============================================================================

pub const LANDMARK_COUNT: usize = 33;
pub const LEFT_SHOULDER: usize = 11;
pub const RIGHT_SHOULDER: usize = 12;
pub const LEFT_ELBOW: usize = 13;
pub const RIGHT_ELBOW: usize = 14;
pub const LEFT_WRIST: usize = 15;
pub const RIGHT_WRIST: usize = 16;
pub const LEFT_HIP: usize = 23;
pub const RIGHT_HIP: usize = 24;
pub const LEFT_KNEE: usize = 25;
pub const RIGHT_KNEE: usize = 26;
pub const LEFT_ANKLE: usize = 27;
pub const RIGHT_ANKLE: usize = 28;

/// x, y, z, visibility
pub const VALUES_PER_LANDMARK: usize = 4;
pub const LANDMARK_BUFFER_LEN: usize = LANDMARK_COUNT * VALUES_PER_LANDMARK;

/// Bones drawn by the overlay (pairs of landmark indices)
pub const OVERLAY_SKELETON: [(usize, usize); 12] = [
    (LEFT_SHOULDER, RIGHT_SHOULDER),
    (LEFT_HIP, RIGHT_HIP),
    (LEFT_SHOULDER, LEFT_HIP),
    (RIGHT_SHOULDER, RIGHT_HIP),
    (LEFT_SHOULDER, LEFT_ELBOW),
    (LEFT_ELBOW, LEFT_WRIST),
    (RIGHT_SHOULDER, RIGHT_ELBOW),
    (RIGHT_ELBOW, RIGHT_WRIST),
    (LEFT_HIP, LEFT_KNEE),
    (LEFT_KNEE, LEFT_ANKLE),
    (RIGHT_HIP, RIGHT_KNEE),
    (RIGHT_KNEE, RIGHT_ANKLE),
];

// ============================================================================
// LANDMARK DATA STRUCTURE
// ============================================================================

/// A single landmark (normalized image coordinates)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Detector confidence that the point is visible, 0-1
    pub visibility: f32,
}

impl Landmark {
    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }
}

pub type PoseLandmarks = [Landmark; LANDMARK_COUNT];

/// Parse a flat landmark buffer
///
/// An empty buffer means the detector found nobody and yields `Ok(None)`.
pub fn parse_landmarks(data: &[f32]) -> Result<Option<PoseLandmarks>, BridgeError> {
    if data.is_empty() {
        return Ok(None);
    }
    if data.len() != LANDMARK_BUFFER_LEN {
        return Err(BridgeError::InvalidLandmarkData {
            len: data.len(),
            expected: LANDMARK_BUFFER_LEN,
        });
    }

    let mut landmarks = [Landmark::default(); LANDMARK_COUNT];
    for (landmark, chunk) in landmarks.iter_mut().zip(data.chunks_exact(VALUES_PER_LANDMARK)) {
        *landmark = Landmark {
            x: chunk[0],
            y: chunk[1],
            z: chunk[2],
            visibility: chunk[3],
        };
    }
    Ok(Some(landmarks))
}

/// Pick the more visible of a left/right landmark pair, left on ties
pub fn best_side(landmarks: &PoseLandmarks, left: usize, right: usize) -> Landmark {
    let l = landmarks[left];
    let r = landmarks[right];
    if l.visibility >= r.visibility {
        l
    } else {
        r
    }
}

/// Elbow (shoulder-elbow-wrist) and hip (shoulder-hip-knee) angles
///
/// Each joint picks its side independently.
pub fn joint_angles(landmarks: &PoseLandmarks) -> JointAngleSample {
    let shoulder = best_side(landmarks, LEFT_SHOULDER, RIGHT_SHOULDER).position();
    let elbow = best_side(landmarks, LEFT_ELBOW, RIGHT_ELBOW).position();
    let wrist = best_side(landmarks, LEFT_WRIST, RIGHT_WRIST).position();
    let hip = best_side(landmarks, LEFT_HIP, RIGHT_HIP).position();
    let knee = best_side(landmarks, LEFT_KNEE, RIGHT_KNEE).position();

    JointAngleSample::new(
        calculate_angle_deg(shoulder, elbow, wrist),
        calculate_angle_deg(shoulder, hip, knee),
    )
}

// ============================================================================
// OVERLAY STORAGE
// ============================================================================

#[derive(Default)]
struct LandmarkStore {
    landmarks: Option<PoseLandmarks>,
}

// Thread-local storage (WASM is single-threaded)
thread_local! {
    static LANDMARKS: RefCell<LandmarkStore> = RefCell::new(LandmarkStore::default());
}

/// Keep the latest frame for the overlay; `None` clears it
pub fn store_landmarks(landmarks: Option<&PoseLandmarks>) {
    LANDMARKS.with(|store_cell| {
        store_cell.borrow_mut().landmarks = landmarks.copied();
    });
}

/// Latest stored frame, if a subject was in view
pub fn get_all_landmarks() -> Option<PoseLandmarks> {
    LANDMARKS.with(|store_cell| store_cell.borrow().landmarks)
}

/// Flat [x0, y0, x1, y1, ...] for the overlay, empty when nobody is in view
#[wasm_bindgen]
pub fn get_overlay_landmarks() -> Vec<f32> {
    get_all_landmarks()
        .map(|landmarks| landmarks.iter().flat_map(|l| [l.x, l.y]).collect())
        .unwrap_or_default()
}

/// Flat [from0, to0, from1, to1, ...] bone list for the overlay
#[wasm_bindgen]
pub fn get_overlay_skeleton() -> Vec<u32> {
    OVERLAY_SKELETON
        .iter()
        .flat_map(|&(from, to)| [from as u32, to as u32])
        .collect()
}
