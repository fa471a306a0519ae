//! Input handling: platform-agnostic event types and held-key tracking.

/// Platform-agnostic input events.
pub mod event;
/// Held-key tracking and bindable movement directions.
pub mod keyboard;

pub use event::InputEvent;
pub use keyboard::{KeyState, MoveDirection};
