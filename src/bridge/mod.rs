//! Bridge module - JS ↔ Rust communication
//!
//! All #[wasm_bindgen] entry points live here.
//! Re-exports only in mod.rs, logic in submodules.

mod error;
mod landmarks;
mod workout;

pub use error::BridgeError;

pub use landmarks::{
    // WASM entry points
    get_overlay_landmarks,
    get_overlay_skeleton,
    // Internal API
    best_side,
    get_all_landmarks,
    joint_angles,
    parse_landmarks,
    store_landmarks,
    Landmark,
    PoseLandmarks,
    // Constants
    LANDMARK_BUFFER_LEN, LANDMARK_COUNT, VALUES_PER_LANDMARK, OVERLAY_SKELETON,
    LEFT_SHOULDER, RIGHT_SHOULDER,
    LEFT_ELBOW, RIGHT_ELBOW,
    LEFT_WRIST, RIGHT_WRIST,
    LEFT_HIP, RIGHT_HIP,
    LEFT_KNEE, RIGHT_KNEE,
    LEFT_ANKLE, RIGHT_ANKLE,
};

pub use workout::{
    // WASM entry points
    start_workout,
    process_landmarks,
    process_angles,
    report_no_subject,
    get_rep_state,
    is_workout_active,
    reset_workout,
    finish_workout,
    // Internal API
    JsClock,
    JsRepState,
    Workout,
};
