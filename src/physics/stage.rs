//! Limb stage - last observed extension/flexion state

use serde::{Serialize, Serializer};

/// Where the tracked limb was last seen in the rep cycle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Nothing observed yet (or display reset while tracking is lost)
    #[default]
    Unset,
    /// Arms extended (top of the push-up)
    Up,
    /// Arms flexed (bottom of the push-up)
    Down,
}

impl Stage {
    /// Display label, `None` while unset
    pub fn label(&self) -> Option<&'static str> {
        match self {
            Stage::Unset => None,
            Stage::Up => Some("up"),
            Stage::Down => Some("down"),
        }
    }
}

impl Serialize for Stage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.label() {
            Some(label) => serializer.serialize_str(label),
            None => serializer.serialize_none(),
        }
    }
}
