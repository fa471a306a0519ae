/// Platform-agnostic input events.
///
/// Front-ends translate winit window/device events or DOM events into
/// these and hand them to
/// [`ViewerSession::handle_input`](crate::ViewerSession::handle_input).
///
/// # Example
///
/// ```
/// # use mapview::InputEvent;
/// let press = InputEvent::Key { code: "KeyW".into(), pressed: true };
/// assert!(matches!(press, InputEvent::Key { pressed: true, .. }));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A key went down (or auto-repeated) or up.
    Key {
        /// Physical key code, e.g. `"KeyW"` or `"ArrowUp"`.
        code: String,
        /// `true` for press, `false` for release.
        pressed: bool,
    },
    /// Relative mouse movement, as delivered while the pointer is locked.
    MouseMotion {
        /// Horizontal movement in pixels.
        dx: f32,
        /// Vertical movement in pixels.
        dy: f32,
    },
    /// Pointer lock was acquired or released.
    PointerLock {
        /// Whether the pointer is now locked.
        locked: bool,
    },
    /// The window lost keyboard focus; key releases will not arrive.
    FocusLost,
    /// The drawable area changed size.
    Resized {
        /// New width in physical pixels.
        width: u32,
        /// New height in physical pixels.
        height: u32,
    },
}
