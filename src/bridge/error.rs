//! Bridge errors - surfaced to JavaScript as thrown strings

use thiserror::Error;
use wasm_bindgen::JsValue;

use crate::physics::ConfigError;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("invalid landmark data length: {len} (expected 0 or {expected})")]
    InvalidLandmarkData { len: usize, expected: usize },

    #[error("no workout in progress, call start_workout first")]
    NoActiveWorkout,

    #[error("invalid counter config: {0}")]
    Config(#[from] ConfigError),

    #[error("value conversion failed: {0}")]
    Serialization(String),
}

impl From<serde_wasm_bindgen::Error> for BridgeError {
    fn from(err: serde_wasm_bindgen::Error) -> Self {
        BridgeError::Serialization(err.to_string())
    }
}

impl From<BridgeError> for JsValue {
    fn from(err: BridgeError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
