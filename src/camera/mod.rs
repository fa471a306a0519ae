//! First-person camera.
//!
//! The camera pose lives in [`look::PointerLookControls`], which turns
//! pointer-lock mouse deltas into yaw and pitch. [`motion::CameraMotion`]
//! moves it each frame from the held movement keys.

/// Core camera struct and GPU uniform types.
pub mod core;
/// Pointer-lock mouse look.
pub mod look;
/// Accelerating keyboard movement.
pub mod motion;

pub use self::core::{Camera, CameraUniform};
pub use look::PointerLookControls;
pub use motion::{CameraMotion, FirstPersonControls, MovementScale};
