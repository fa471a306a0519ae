//! Accelerating first-person movement.
//!
//! Each frame the held movement keys translate the camera along its look
//! direction and right axis. While any movement key stays held the speed
//! grows geometrically up to a cap; releasing every key drops it straight
//! back to the base speed.

use glam::Vec3;

use crate::input::{KeyState, MoveDirection};
use crate::options::{KeybindingOptions, MovementOptions};

/// First-person camera controls driven by [`CameraMotion`].
pub trait FirstPersonControls {
    /// Current unit look direction, including pitch.
    fn direction(&self) -> Vec3;
    /// Translate along the look direction. Negative moves backwards.
    fn move_forward(&mut self, distance: f32);
    /// Translate along the camera's right axis. Negative moves left.
    fn move_right(&mut self, distance: f32);
    /// Apply queued orientation changes.
    fn update(&mut self);
}

/// Speed of the accelerating ramp.
#[derive(Debug, Clone, PartialEq)]
pub struct MovementScale {
    value: f32,
    base: f32,
    cap: f32,
    acceleration: f32,
}

impl MovementScale {
    /// Ramp starting at the configured base speed.
    #[must_use]
    pub fn new(options: &MovementOptions) -> Self {
        Self {
            value: options.base_speed,
            base: options.base_speed,
            cap: options.max_speed,
            acceleration: options.acceleration,
        }
    }

    /// Current speed in units per second.
    #[must_use]
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Advance the ramp by one frame.
    pub fn advance(&mut self, dt: f32, moving: bool) {
        self.value = if moving {
            (self.value * (1.0 + self.acceleration * dt)).min(self.cap)
        } else {
            self.base
        };
    }
}

/// Per-frame movement model.
#[derive(Debug, Clone)]
pub struct CameraMotion {
    scale: MovementScale,
}

impl CameraMotion {
    /// Motion model with the configured speed law.
    #[must_use]
    pub fn new(options: &MovementOptions) -> Self {
        Self {
            scale: MovementScale::new(options),
        }
    }

    /// Current movement speed.
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.scale.value()
    }

    /// Advance one frame.
    ///
    /// Translations use the speed from before this frame's ramp step and
    /// the orientation from before this frame's queued look deltas. Order:
    /// forward, backward, left, right, then `controls.update()`, then the
    /// ramp step.
    pub fn update<C: FirstPersonControls>(
        &mut self,
        dt: f32,
        keys: &KeyState,
        bindings: &KeybindingOptions,
        controls: &mut C,
    ) {
        let step = self.scale.value() * dt;
        let mut moving = false;

        for direction in MoveDirection::ALL {
            if !keys.any_held(bindings.keys(direction)) {
                continue;
            }
            moving = true;
            match direction {
                MoveDirection::Forward => controls.move_forward(step),
                MoveDirection::Backward => controls.move_forward(-step),
                MoveDirection::Left => controls.move_right(-step),
                MoveDirection::Right => controls.move_right(step),
            }
        }

        controls.update();
        self.scale.advance(dt, moving);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Recorder {
        calls: Vec<String>,
        position: Vec3,
    }

    impl FirstPersonControls for Recorder {
        fn direction(&self) -> Vec3 {
            Vec3::NEG_Z
        }

        fn move_forward(&mut self, distance: f32) {
            self.calls.push(format!("forward {distance}"));
            self.position += Vec3::NEG_Z * distance;
        }

        fn move_right(&mut self, distance: f32) {
            self.calls.push(format!("right {distance}"));
            self.position += Vec3::X * distance;
        }

        fn update(&mut self) {
            self.calls.push("update".into());
        }
    }

    fn held(codes: &[&str]) -> KeyState {
        let mut keys = KeyState::new();
        for code in codes {
            keys.set(code, true);
        }
        keys
    }

    fn step(
        motion: &mut CameraMotion,
        keys: &KeyState,
        controls: &mut Recorder,
        dt: f32,
    ) {
        motion.update(dt, keys, &KeybindingOptions::default(), controls);
    }

    #[test]
    fn moving_grows_the_speed() {
        let mut motion = CameraMotion::new(&MovementOptions::default());
        let keys = held(&["KeyW"]);
        let mut rec = Recorder::default();
        step(&mut motion, &keys, &mut rec, 0.1);
        assert!((motion.speed() - 250.0 * 1.15).abs() < 1e-3);
    }

    #[test]
    fn translation_uses_speed_from_before_the_ramp() {
        let mut motion = CameraMotion::new(&MovementOptions::default());
        let keys = held(&["KeyW"]);
        let mut rec = Recorder::default();
        step(&mut motion, &keys, &mut rec, 0.5);
        assert_eq!(rec.calls, ["forward 125", "update"]);
    }

    #[test]
    fn speed_is_capped_and_never_decreases_while_moving() {
        let mut motion = CameraMotion::new(&MovementOptions::default());
        let keys = held(&["ArrowUp"]);
        let mut rec = Recorder::default();
        let mut last = motion.speed();
        for _ in 0..600 {
            step(&mut motion, &keys, &mut rec, 1.0 / 60.0);
            assert!(motion.speed() >= last);
            assert!(motion.speed() <= 1500.0);
            last = motion.speed();
        }
        assert_eq!(motion.speed(), 1500.0);
    }

    #[test]
    fn idle_frame_resets_to_base() {
        let mut motion = CameraMotion::new(&MovementOptions::default());
        let mut rec = Recorder::default();
        let keys = held(&["KeyD"]);
        for _ in 0..30 {
            step(&mut motion, &keys, &mut rec, 0.05);
        }
        assert!(motion.speed() > 250.0);

        step(&mut motion, &KeyState::new(), &mut rec, 0.05);
        assert_eq!(motion.speed(), 250.0);

        // Pressing again restarts the ramp from base.
        rec.calls.clear();
        step(&mut motion, &keys, &mut rec, 0.1);
        assert_eq!(rec.calls[0], "right 25");
    }

    #[test]
    fn idle_frame_still_updates_controls() {
        let mut motion = CameraMotion::new(&MovementOptions::default());
        let mut rec = Recorder::default();
        step(&mut motion, &KeyState::new(), &mut rec, 0.016);
        assert_eq!(rec.calls, ["update"]);
        assert_eq!(rec.position, Vec3::ZERO);
    }

    #[test]
    fn directions_apply_in_fixed_order() {
        let mut motion = CameraMotion::new(&MovementOptions::default());
        let keys = held(&["KeyD", "KeyA", "KeyS", "KeyW"]);
        let mut rec = Recorder::default();
        step(&mut motion, &keys, &mut rec, 0.1);
        assert_eq!(
            rec.calls,
            ["forward 25", "forward -25", "right -25", "right 25", "update"]
        );
        assert!(rec.position.abs_diff_eq(Vec3::ZERO, 1e-5));
    }

    #[test]
    fn diagonal_movement_is_not_normalized() {
        let mut single = CameraMotion::new(&MovementOptions::default());
        let mut straight = Recorder::default();
        step(&mut single, &held(&["KeyW"]), &mut straight, 0.1);

        let mut both = CameraMotion::new(&MovementOptions::default());
        let mut diagonal = Recorder::default();
        step(&mut both, &held(&["KeyW", "KeyD"]), &mut diagonal, 0.1);

        assert!(diagonal.position.length() > straight.position.length());
        assert!((diagonal.position.length() - 25.0 * 2f32.sqrt()).abs() < 1e-3);
    }

    #[test]
    fn unbound_keys_do_not_move() {
        let mut motion = CameraMotion::new(&MovementOptions::default());
        let mut rec = Recorder::default();
        step(&mut motion, &held(&["KeyQ", "Space"]), &mut rec, 0.1);
        assert_eq!(rec.calls, ["update"]);
        assert_eq!(motion.speed(), 250.0);
    }

    #[test]
    fn ramp_advances_from_custom_options() {
        let mut scale = MovementScale::new(&MovementOptions {
            base_speed: 10.0,
            max_speed: 12.0,
            acceleration: 1.0,
        });
        scale.advance(0.1, true);
        assert!((scale.value() - 11.0).abs() < 1e-5);
        scale.advance(0.5, true);
        assert_eq!(scale.value(), 12.0);
        scale.advance(0.5, false);
        assert_eq!(scale.value(), 10.0);
    }
}
