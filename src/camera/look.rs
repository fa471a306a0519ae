use std::f32::consts::FRAC_PI_2;

use glam::{Vec2, Vec3};

use super::core::Camera;
use super::motion::FirstPersonControls;

/// Radians of rotation per pixel of mouse movement at `pointer_speed` 1.
const RADIANS_PER_PIXEL: f32 = 0.002;

/// Pointer-lock mouse look.
///
/// Owns the camera. Mouse deltas are only accepted while locked and are
/// queued until [`update`](FirstPersonControls::update), so a frame's
/// translation always uses the orientation the frame started with.
#[derive(Debug, Clone)]
pub struct PointerLookControls {
    /// The controlled camera.
    pub camera: Camera,
    locked: bool,
    pointer_speed: f32,
    pending: Vec2,
}

impl PointerLookControls {
    /// Wrap a camera; starts unlocked.
    #[must_use]
    pub fn new(camera: Camera, pointer_speed: f32) -> Self {
        Self {
            camera,
            locked: false,
            pointer_speed,
            pending: Vec2::ZERO,
        }
    }

    /// Whether the pointer is locked.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Set the lock state. Returns `true` if it changed.
    pub fn set_locked(&mut self, locked: bool) -> bool {
        if self.locked == locked {
            return false;
        }
        self.locked = locked;
        if !locked {
            self.pending = Vec2::ZERO;
        }
        true
    }

    /// Queue a relative mouse movement. Ignored while unlocked.
    pub fn queue_motion(&mut self, dx: f32, dy: f32) {
        if self.locked {
            self.pending += Vec2::new(dx, dy);
        }
    }
}

impl FirstPersonControls for PointerLookControls {
    fn direction(&self) -> Vec3 {
        self.camera.direction()
    }

    fn move_forward(&mut self, distance: f32) {
        self.camera.position += self.camera.direction() * distance;
    }

    fn move_right(&mut self, distance: f32) {
        self.camera.position += self.camera.right() * distance;
    }

    fn update(&mut self) {
        if self.pending == Vec2::ZERO {
            return;
        }
        let scale = RADIANS_PER_PIXEL * self.pointer_speed;
        self.camera.yaw -= self.pending.x * scale;
        self.camera.pitch =
            (self.camera.pitch - self.pending.y * scale).clamp(-FRAC_PI_2, FRAC_PI_2);
        self.pending = Vec2::ZERO;
    }
}
