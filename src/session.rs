//! The viewer session: sole owner of all per-session mutable state.
//!
//! Front-ends translate platform events into calls on one
//! [`ViewerSession`]: [`handle_input`](ViewerSession::handle_input) for
//! input, [`handle_load`](ViewerSession::handle_load) when the map load
//! completes, and [`frame`](ViewerSession::frame) once per rendered frame.

use crate::camera::{Camera, CameraMotion, PointerLookControls};
use crate::error::ViewerError;
use crate::input::{InputEvent, KeyState};
use crate::options::Options;
use crate::scene::{Lights, Scene, SceneGraph};
use crate::ui::{load_failure_message, Overlay, UiEvent, VisibilityController};

/// Per-session viewer state.
pub struct ViewerSession<O: Overlay> {
    options: Options,
    keys: KeyState,
    look: PointerLookControls,
    motion: CameraMotion,
    scene: Scene,
    overlay: O,
    visibility: VisibilityController,
    release_keys_on_unlock: bool,
}

impl<O: Overlay> ViewerSession<O> {
    /// Fresh session: empty scene, nothing held, pointer unlocked, prompt
    /// and loading indicator showing.
    pub fn new(options: Options, overlay: O, aspect: f32) -> Self {
        let camera = Camera::new(&options.camera, aspect);
        let mut session = Self {
            keys: KeyState::new(),
            look: PointerLookControls::new(camera, options.camera.pointer_speed),
            motion: CameraMotion::new(&options.movement),
            scene: Scene::new(Lights::from_options(&options.lighting)),
            options,
            overlay,
            visibility: VisibilityController,
            release_keys_on_unlock: false,
        };
        session.dispatch(&UiEvent::PointerUnlocked);
        session
    }

    /// Forget held keys whenever pointer lock is lost.
    #[must_use]
    pub fn with_release_keys_on_unlock(mut self, release: bool) -> Self {
        self.release_keys_on_unlock = release;
        self
    }

    fn dispatch(&mut self, event: &UiEvent) {
        self.visibility.apply(event, &mut self.overlay);
    }

    /// Apply one input event.
    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::Key { code, pressed } => self.keys.set(&code, pressed),
            InputEvent::MouseMotion { dx, dy } => self.look.queue_motion(dx, dy),
            InputEvent::PointerLock { locked } => {
                if !self.look.set_locked(locked) {
                    return;
                }
                log::debug!("pointer {}", if locked { "locked" } else { "unlocked" });
                if locked {
                    self.dispatch(&UiEvent::PointerLocked);
                } else {
                    if self.release_keys_on_unlock {
                        self.keys.release_all();
                    }
                    self.dispatch(&UiEvent::PointerUnlocked);
                }
            }
            InputEvent::FocusLost => self.keys.release_all(),
            InputEvent::Resized { width, height } => {
                self.look.camera.set_viewport(width, height);
            }
        }
    }

    /// Apply the outcome of the map load.
    ///
    /// On success materials are made non-metallic and the graph joins the
    /// scene; on failure the loading indicator shows the error.
    pub fn handle_load(&mut self, result: Result<SceneGraph, ViewerError>) {
        match result {
            Ok(mut graph) => {
                let changed = graph.normalize_metalness();
                log::info!("map loaded; {changed} materials made non-metallic");
                self.scene.add(graph);
                self.dispatch(&UiEvent::LoadSucceeded);
            }
            Err(e) => {
                log::error!("map load failed: {e}");
                self.dispatch(&UiEvent::LoadFailed(load_failure_message(&e)));
            }
        }
    }

    /// Advance one frame by `dt` seconds. Negative or non-finite deltas
    /// count as zero.
    pub fn frame(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.motion
            .update(dt, &self.keys, &self.options.keybindings, &mut self.look);
    }

    /// Current camera.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.look.camera
    }

    /// Camera and mutable scene together, for rendering.
    pub fn render_parts(&mut self) -> (&Camera, &mut Scene) {
        (&self.look.camera, &mut self.scene)
    }

    /// The render scene.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// The overlay.
    #[must_use]
    pub fn overlay(&self) -> &O {
        &self.overlay
    }

    /// Whether pointer lock is held.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.look.is_locked()
    }

    /// Current movement speed.
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.motion.speed()
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::scene::{Material, StandardMaterial};
    use crate::ui::OverlayState;

    fn session() -> ViewerSession<OverlayState> {
        ViewerSession::new(Options::default(), OverlayState::default(), 1.0)
    }

    fn key(code: &str, pressed: bool) -> InputEvent {
        InputEvent::Key {
            code: code.into(),
            pressed,
        }
    }

    fn metallic_graph() -> SceneGraph {
        let mut graph = SceneGraph {
            roots: vec![0],
            materials: vec![Material::Standard(StandardMaterial::default())],
            ..Default::default()
        };
        graph.nodes.push(crate::scene::SceneNode {
            name: None,
            transform: glam::Mat4::IDENTITY,
            children: vec![],
            mesh: Some(0),
        });
        graph.meshes.push(crate::scene::Mesh {
            name: None,
            primitives: vec![crate::scene::Primitive {
                material: 0,
                ..Default::default()
            }],
        });
        graph
    }

    #[test]
    fn forward_key_moves_along_look_direction() {
        let mut s = session();
        s.handle_input(key("KeyW", true));
        s.frame(0.1);
        assert!(s.camera().position.abs_diff_eq(Vec3::new(0.0, 0.0, -25.0), 1e-4));
        assert!(s.speed() > 250.0);

        s.handle_input(key("KeyW", false));
        s.frame(0.1);
        assert_eq!(s.speed(), 250.0);
    }

    #[test]
    fn successful_load_normalizes_and_clears_loading() {
        let mut s = session();
        s.handle_load(Ok(metallic_graph()));
        assert_eq!(s.scene().graphs().len(), 1);
        assert_eq!(s.scene().graphs()[0].materials[0].metalness(), Some(0.0));
        assert!(!s.overlay().loading);
    }

    #[test]
    fn failed_load_keeps_indicator_with_message() {
        let mut s = session();
        s.handle_load(Err(ViewerError::Fetch("HTTP 404 Not Found".into())));
        assert!(s.scene().graphs().is_empty());
        assert!(s.overlay().loading);
        assert!(s.overlay().loading_message.contains("HTTP 404 Not Found"));
        assert!(s.overlay().loading_message.starts_with("Failed to load map"));
    }

    #[test]
    fn pointer_lock_drives_prompt_and_look() {
        let mut s = session();
        assert!(s.overlay().start_prompt_visible);

        s.handle_input(InputEvent::MouseMotion { dx: 50.0, dy: 0.0 });
        s.frame(0.016);
        assert_eq!(s.camera().yaw, 0.0);

        s.handle_input(InputEvent::PointerLock { locked: true });
        s.handle_input(InputEvent::PointerLock { locked: true });
        assert!(s.is_locked());
        assert!(!s.overlay().start_prompt_visible);

        s.handle_input(InputEvent::MouseMotion { dx: 50.0, dy: 0.0 });
        s.frame(0.016);
        assert!(s.camera().yaw < 0.0);

        s.handle_input(InputEvent::PointerLock { locked: false });
        assert!(s.overlay().start_prompt_visible);
    }

    #[test]
    fn unlock_releases_keys_when_configured() {
        let mut s = session().with_release_keys_on_unlock(true);
        s.handle_input(InputEvent::PointerLock { locked: true });
        s.handle_input(key("KeyD", true));
        s.handle_input(InputEvent::PointerLock { locked: false });
        s.frame(0.1);
        assert_eq!(s.camera().position, Vec3::ZERO);
    }

    #[test]
    fn keys_survive_unlock_by_default() {
        let mut s = session();
        s.handle_input(InputEvent::PointerLock { locked: true });
        s.handle_input(key("KeyD", true));
        s.handle_input(InputEvent::PointerLock { locked: false });
        s.frame(0.1);
        assert!(s.camera().position.x > 0.0);
    }

    #[test]
    fn focus_loss_releases_keys_while_unlocked() {
        let mut s = session();
        s.handle_input(key("KeyW", true));
        s.handle_input(InputEvent::FocusLost);
        s.frame(0.1);
        assert_eq!(s.camera().position, Vec3::ZERO);
        assert_eq!(s.speed(), 250.0);
    }

    #[test]
    fn resize_updates_aspect() {
        let mut s = session();
        s.handle_input(InputEvent::Resized { width: 1920, height: 1080 });
        assert!((s.camera().aspect - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn bad_frame_deltas_do_not_move() {
        let mut s = session();
        s.handle_input(key("KeyW", true));
        s.frame(f32::NAN);
        s.frame(-1.0);
        assert_eq!(s.camera().position, Vec3::ZERO);
    }
}
