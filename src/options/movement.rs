use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Speed law for first-person movement, in scene units per second.
pub struct MovementOptions {
    /// Speed the ramp starts from and resets to when no key is held.
    pub base_speed: f32,
    /// Upper bound of the ramp.
    pub max_speed: f32,
    /// Growth rate: speed is multiplied by `1 + acceleration * dt` per
    /// frame while moving.
    pub acceleration: f32,
}

impl Default for MovementOptions {
    fn default() -> Self {
        Self {
            base_speed: 250.0,
            max_speed: 1500.0,
            acceleration: 1.5,
        }
    }
}
