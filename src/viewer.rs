//! Standalone map viewer window backed by winit.
//!
//! Clicking the window grabs the cursor (pointer lock); the configured
//! release key or losing focus releases it. The map loads on a worker
//! thread while the window is already interactive, and the overlay state
//! is shown in the window title.
//!
//! ```no_run
//! # use mapview::Viewer;
//! Viewer::builder()
//!     .with_location("/view/mapA")
//!     .build()
//!     .run()
//!     .unwrap();
//! ```

use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{CursorGrabMode, Window, WindowId},
};

use crate::{
    error::ViewerError,
    gpu::render_context::RenderContext,
    loader::MapSource,
    options::Options,
    renderer::SceneRenderer,
    scene::SceneGraph,
    ui::OverlayState,
    util::FrameClock,
    InputEvent, ViewerSession,
};

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    location: Option<String>,
    options: Option<Options>,
    title: String,
}

impl ViewerBuilder {
    /// Create a builder with sensible defaults (title "mapview", no
    /// location, default options).
    fn new() -> Self {
        Self {
            location: None,
            options: None,
            title: "mapview".into(),
        }
    }

    /// Set the map location: `/view/<map>`, `?map=<map>&..`, a full URL,
    /// or a local `.glb`/`.gltf` path.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Override the default options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }

    /// Set the window title prefix used before a map is named.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer {
        Viewer {
            location: self.location,
            options: self.options.unwrap_or_default(),
            title: self.title,
        }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A standalone window that displays one map.
///
/// Construct via [`Viewer::builder`], then call [`run`](Self::run) to
/// enter the event loop.
pub struct Viewer {
    location: Option<String>,
    options: Options,
    title: String,
}

impl Viewer {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }

    /// Open the window and run the event loop. Blocks until the window is
    /// closed.
    pub fn run(self) -> Result<(), ViewerError> {
        let event_loop =
            EventLoop::new().map_err(|e| ViewerError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = ViewerApp {
            window: None,
            gpu: None,
            session: None,
            pending_load: None,
            clock: FrameClock::new(),
            location: self.location,
            options: self.options,
            name: self.title,
            shown_title: String::new(),
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| ViewerError::Viewer(e.to_string()))
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

/// GPU state created once the window exists.
struct Gpu {
    context: RenderContext,
    renderer: SceneRenderer,
}

impl Gpu {
    fn new(
        window: Arc<Window>,
        size: (u32, u32),
        clear_color: [f32; 3],
    ) -> Result<Self, ViewerError> {
        let context = pollster::block_on(RenderContext::new(window, size))?;
        let renderer = SceneRenderer::new(&context, clear_color);
        Ok(Self { context, renderer })
    }
}

type LoadResult = Result<SceneGraph, ViewerError>;

/// Internal winit application handler.
struct ViewerApp {
    window: Option<Arc<Window>>,
    gpu: Option<Gpu>,
    session: Option<ViewerSession<OverlayState>>,
    pending_load: Option<Receiver<LoadResult>>,
    clock: FrameClock,
    location: Option<String>,
    options: Options,
    /// Map name shown in the title.
    name: String,
    /// Last title pushed to the window.
    shown_title: String,
}

impl ViewerApp {
    /// Resolve the location and start the load on a worker thread.
    fn start_load(&mut self, textures: crate::loader::TextureSupport) {
        let source = match &self.location {
            Some(location) => MapSource::resolve(location, &self.options.loader),
            None => Err(ViewerError::Location("no map given".into())),
        };
        match source {
            Ok(source) => {
                self.name = source.label();
                log::info!("Loading map {} from {source:?}", self.name);
                self.pending_load = Some(source.spawn_load(textures));
            }
            Err(e) => {
                if let Some(session) = &mut self.session {
                    session.handle_load(Err(e));
                }
            }
        }
    }

    /// Deliver the load result once the worker has finished.
    fn poll_load(&mut self) {
        let Some(rx) = &self.pending_load else {
            return;
        };
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => {
                Err(ViewerError::Viewer("load worker exited".into()))
            }
        };
        self.pending_load = None;
        if let Some(session) = &mut self.session {
            session.handle_load(result);
        }
    }

    /// Grab or release the cursor and tell the session.
    fn set_pointer_lock(&mut self, locked: bool) {
        let (Some(window), Some(session)) = (&self.window, &mut self.session) else {
            return;
        };
        if session.is_locked() == locked {
            return;
        }
        if locked {
            let grab = window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
            if let Err(e) = grab {
                log::warn!("cursor grab failed: {e}");
                return;
            }
            window.set_cursor_visible(false);
        } else {
            if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
                log::warn!("cursor release failed: {e}");
            }
            window.set_cursor_visible(true);
        }
        session.handle_input(InputEvent::PointerLock { locked });
    }

    fn refresh_title(&mut self) {
        let (Some(window), Some(session)) = (&self.window, &self.session) else {
            return;
        };
        let title = session.overlay().title(&self.name);
        if title != self.shown_title {
            window.set_title(&title);
            self.shown_title = title;
        }
    }

    fn redraw(&mut self) {
        self.poll_load();
        let dt = self.clock.tick();

        let (Some(window), Some(gpu), Some(session)) =
            (&self.window, &mut self.gpu, &mut self.session)
        else {
            return;
        };
        session.frame(dt);

        let (camera, scene) = session.render_parts();
        match gpu.renderer.render(&gpu.context, camera, scene) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                let inner = window.inner_size();
                gpu.context.resize(inner.width, inner.height);
                gpu.renderer.resize(&gpu.context);
            }
            Err(e) => {
                log::error!("render error: {e:?}");
            }
        }
        window.request_redraw();
        self.refresh_title();
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let monitor = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next());
        let attrs = if let Some(mon) = &monitor {
            let mon_size = mon.size();
            let scale = mon.scale_factor();
            let logical_w = (mon_size.width as f64 / scale * 0.75) as u32;
            let logical_h = (mon_size.height as f64 / scale * 0.75) as u32;
            Window::default_attributes()
                .with_title(&self.name)
                .with_inner_size(winit::dpi::LogicalSize::new(
                    logical_w, logical_h,
                ))
        } else {
            Window::default_attributes().with_title(&self.name)
        };

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let inner = window.inner_size();
        let (width, height) = (inner.width.max(1), inner.height.max(1));
        let gpu = match Gpu::new(
            window.clone(),
            (width, height),
            self.options.lighting.clear_color,
        ) {
            Ok(gpu) => gpu,
            Err(e) => {
                log::error!("Failed to initialize viewer: {e}");
                event_loop.exit();
                return;
            }
        };
        let textures = gpu.context.texture_support;

        self.session = Some(
            ViewerSession::new(
                self.options.clone(),
                OverlayState::default(),
                width as f32 / height as f32,
            )
            .with_release_keys_on_unlock(true),
        );
        self.gpu = Some(gpu);
        self.window = Some(window.clone());

        self.start_load(textures);
        self.refresh_title();
        window.request_redraw();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        if matches!(event, WindowEvent::CloseRequested) {
            event_loop.exit();
            return;
        }

        // Guard: window, GPU and session must be initialised.
        if self.window.is_none() || self.gpu.is_none() || self.session.is_none() {
            return;
        }

        match event {
            WindowEvent::Resized(size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.context.resize(size.width, size.height);
                    gpu.renderer.resize(&gpu.context);
                }
                if let Some(session) = &mut self.session {
                    session.handle_input(InputEvent::Resized {
                        width: size.width,
                        height: size.height,
                    });
                }
            }

            WindowEvent::Focused(false) => {
                if let Some(session) = &mut self.session {
                    session.handle_input(InputEvent::FocusLost);
                }
                self.set_pointer_lock(false);
            }

            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => self.set_pointer_lock(true),

            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(code) = event.physical_key else {
                    return;
                };
                let code = format!("{code:?}");
                let pressed = event.state == ElementState::Pressed;
                if pressed && code == self.options.keybindings.release_pointer {
                    self.set_pointer_lock(false);
                    return;
                }
                if let Some(session) = &mut self.session {
                    session.handle_input(InputEvent::Key { code, pressed });
                }
            }

            WindowEvent::RedrawRequested => self.redraw(),

            _ => (),
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            if let Some(session) = &mut self.session {
                session.handle_input(InputEvent::MouseMotion {
                    dx: dx as f32,
                    dy: dy as f32,
                });
            }
        }
    }
}
