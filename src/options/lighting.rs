use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Scene lights: one ambient term plus one directional light.
pub struct LightingOptions {
    /// Ambient light color (linear RGB).
    pub ambient_color: [f32; 3],
    /// Ambient light intensity.
    pub ambient_intensity: f32,
    /// Directional light color (linear RGB).
    pub directional_color: [f32; 3],
    /// Directional light intensity.
    pub directional_intensity: f32,
    /// Directional light position; the light shines from here toward the
    /// origin.
    pub directional_position: [f32; 3],
    /// Background clear color.
    pub clear_color: [f32; 3],
}

impl Default for LightingOptions {
    fn default() -> Self {
        Self {
            ambient_color: [1.0, 1.0, 1.0],
            ambient_intensity: 0.4,
            // #efefff
            directional_color: [0.937, 0.937, 1.0],
            directional_intensity: 1.5,
            directional_position: [10.0, 10.0, 10.0],
            clear_color: [0.0, 0.0, 0.0],
        }
    }
}
