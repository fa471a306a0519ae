//! Browser entry point.
//!
//! Creates a full-window canvas, resolves the map from
//! `window.location`, and drives one [`ViewerSession`] from DOM events and
//! `requestAnimationFrame`. All state lives behind one `Rc<RefCell<_>>`
//! shared by the event closures.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::JsCast;
use web_sys::{Document, EventTarget, HtmlCanvasElement, KeyboardEvent, MouseEvent, Window};

use crate::gpu::render_context::RenderContext;
use crate::loader::{self, fetch, LoadTarget, TranscoderConfig};
use crate::options::Options;
use crate::renderer::SceneRenderer;
use crate::ui::DomOverlay;
use crate::util::FrameClock;
use crate::{InputEvent, ViewerError, ViewerSession};

struct WebState {
    session: ViewerSession<DomOverlay>,
    context: RenderContext,
    renderer: SceneRenderer,
    clock: FrameClock,
}

impl WebState {
    fn frame(&mut self) {
        let dt = self.clock.tick();
        self.session.frame(dt);
        let (camera, scene) = self.session.render_parts();
        match self.renderer.render(&self.context, camera, scene) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                let (width, height) = (self.context.config.width, self.context.config.height);
                self.context.resize(width, height);
                self.renderer.resize(&self.context);
            }
            Err(e) => log::error!("render error: {e:?}"),
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.context.resize(width, height);
        self.renderer.resize(&self.context);
        self.session.handle_input(InputEvent::Resized { width, height });
    }
}

type Shared = Rc<RefCell<WebState>>;

/// Module start hook: sets up logging and launches the viewer.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    wasm_bindgen_futures::spawn_local(async {
        if let Err(e) = run().await {
            log::error!("viewer failed to start: {e:?}");
        }
    });
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn canvas_size(window: &Window) -> (u32, u32) {
    let dpr = window.device_pixel_ratio();
    let dim = |v: Result<JsValue, JsValue>| {
        v.ok().and_then(|v| v.as_f64()).map_or(1, |v| ((v * dpr) as u32).max(1))
    };
    (dim(window.inner_width()), dim(window.inner_height()))
}

async fn run() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| js_err("no window"))?;
    let document = window.document().ok_or_else(|| js_err("no document"))?;
    let body = document.body().ok_or_else(|| js_err("no body"))?;

    let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
    let (width, height) = canvas_size(&window);
    canvas.set_width(width);
    canvas.set_height(height);
    // Backing store is in device pixels; the box stays one viewport.
    let style = canvas.style();
    style.set_property("display", "block")?;
    style.set_property("width", "100vw")?;
    style.set_property("height", "100vh")?;
    let _ = body.append_child(&canvas)?;

    let options = Options::default();
    let location = format!(
        "{}{}",
        window.location().pathname()?,
        window.location().search()?
    );
    let transcoder = TranscoderConfig::from_options(&options.loader);
    log::info!("Basis transcoder path: {}", transcoder.path);

    let context = RenderContext::new(wgpu::SurfaceTarget::Canvas(canvas.clone()), (width, height))
        .await
        .map_err(|e| js_err(ViewerError::from(e)))?;
    let renderer = SceneRenderer::new(&context, options.lighting.clear_color);
    let textures = context.texture_support;
    let target = LoadTarget::from_location(&location, &options.loader);

    let session = ViewerSession::new(
        options,
        DomOverlay::new(document.clone()),
        width as f32 / height as f32,
    );
    let state: Shared = Rc::new(RefCell::new(WebState {
        session,
        context,
        renderer,
        clock: FrameClock::new(),
    }));

    install_input(&window, &document, &canvas, &state)?;
    start_frame_loop(&state)?;

    let load_state = state.clone();
    wasm_bindgen_futures::spawn_local(async move {
        let result = load(target, textures).await;
        load_state.borrow_mut().session.handle_load(result);
    });
    Ok(())
}

async fn load(
    target: Result<LoadTarget, ViewerError>,
    textures: loader::TextureSupport,
) -> Result<crate::scene::SceneGraph, ViewerError> {
    let url = target?.fetch_url();
    log::info!("Loading map from {url}");
    let bytes = fetch::fetch_bytes(&url).await?;
    loader::finish(&bytes, None, textures)
}

fn listen<E: FromWasmAbi + 'static>(
    target: &EventTarget,
    event: &str,
    handler: impl FnMut(E) + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::<dyn FnMut(E)>::new(handler);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn install_input(
    window: &Window,
    document: &Document,
    canvas: &HtmlCanvasElement,
    state: &Shared,
) -> Result<(), JsValue> {
    for (event, pressed) in [("keydown", true), ("keyup", false)] {
        let state = state.clone();
        listen(document, event, move |e: KeyboardEvent| {
            state
                .borrow_mut()
                .session
                .handle_input(InputEvent::Key { code: e.code(), pressed });
        })?;
    }

    let motion_state = state.clone();
    listen(document, "mousemove", move |e: MouseEvent| {
        motion_state
            .borrow_mut()
            .session
            .handle_input(InputEvent::MouseMotion {
                dx: e.movement_x() as f32,
                dy: e.movement_y() as f32,
            });
    })?;

    let lock_state = state.clone();
    let lock_document = document.clone();
    listen(document, "pointerlockchange", move |_: web_sys::Event| {
        let locked = lock_document.pointer_lock_element().is_some();
        lock_state
            .borrow_mut()
            .session
            .handle_input(InputEvent::PointerLock { locked });
    })?;

    let request_lock = {
        let canvas = canvas.clone();
        move |_: MouseEvent| canvas.request_pointer_lock()
    };
    if let Some(button) = document.get_element_by_id("startButton") {
        listen(&button, "click", request_lock.clone())?;
    }
    listen(canvas, "click", request_lock)?;

    let resize_state = state.clone();
    let resize_window = window.clone();
    let resize_canvas = canvas.clone();
    listen(window, "resize", move |_: web_sys::Event| {
        let (width, height) = canvas_size(&resize_window);
        resize_canvas.set_width(width);
        resize_canvas.set_height(height);
        resize_state.borrow_mut().resize(width, height);
    })?;
    Ok(())
}

fn request_animation_frame(callback: &Closure<dyn FnMut()>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    if let Err(e) = window.request_animation_frame(callback.as_ref().unchecked_ref()) {
        log::error!("requestAnimationFrame failed: {e:?}");
    }
}

fn start_frame_loop(state: &Shared) -> Result<(), JsValue> {
    let next: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let this = next.clone();
    let state = state.clone();

    *this.borrow_mut() = Some(Closure::new(move || {
        state.borrow_mut().frame();
        if let Some(callback) = next.borrow().as_ref() {
            request_animation_frame(callback);
        }
    }));

    let first = this.borrow();
    let callback = first.as_ref().ok_or_else(|| js_err("frame loop not installed"))?;
    request_animation_frame(callback);
    Ok(())
}
