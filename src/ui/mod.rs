//! Overlay visibility: the start prompt and the loading indicator.
//!
//! [`VisibilityController`] maps [`UiEvent`]s onto an [`Overlay`]. The
//! browser overlay is the page DOM; the native viewer keeps an
//! [`OverlayState`] and shows it in the window title.

#[cfg(all(feature = "web", target_arch = "wasm32"))]
mod dom;

#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub use dom::DomOverlay;

/// Events that change what the overlay shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// Pointer lock was acquired.
    PointerLocked,
    /// Pointer lock was released.
    PointerUnlocked,
    /// The map finished loading.
    LoadSucceeded,
    /// The map failed to load; carries the user-facing message.
    LoadFailed(String),
}

/// Overlay primitives the controller drives.
pub trait Overlay {
    /// Show or hide the "click to start" prompt.
    fn set_start_prompt_visible(&mut self, visible: bool);
    /// Remove the loading indicator.
    fn clear_loading(&mut self);
    /// Replace the loading indicator's text. The indicator stays visible.
    fn set_loading_message(&mut self, message: &str);
}

/// Stateless mapping from [`UiEvent`] to [`Overlay`] calls.
#[derive(Debug, Default, Clone, Copy)]
pub struct VisibilityController;

impl VisibilityController {
    /// Apply one event.
    pub fn apply(self, event: &UiEvent, overlay: &mut impl Overlay) {
        match event {
            UiEvent::PointerLocked => overlay.set_start_prompt_visible(false),
            UiEvent::PointerUnlocked => overlay.set_start_prompt_visible(true),
            UiEvent::LoadSucceeded => overlay.clear_loading(),
            UiEvent::LoadFailed(message) => overlay.set_loading_message(message),
        }
    }
}

/// Message shown when a load fails.
#[must_use]
pub fn load_failure_message(detail: &impl std::fmt::Display) -> String {
    format!("Failed to load map: {detail}")
}

/// Retained overlay for front-ends without a DOM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayState {
    /// Whether the start prompt is showing.
    pub start_prompt_visible: bool,
    /// Whether the loading indicator is showing.
    pub loading: bool,
    /// Loading indicator text.
    pub loading_message: String,
}

impl Default for OverlayState {
    fn default() -> Self {
        Self {
            start_prompt_visible: true,
            loading: true,
            loading_message: "Loading...".into(),
        }
    }
}

impl OverlayState {
    /// Window title reflecting the overlay, e.g. `mapA - Loading...`.
    #[must_use]
    pub fn title(&self, name: &str) -> String {
        let mut title = name.to_owned();
        if self.loading {
            title.push_str(" - ");
            title.push_str(&self.loading_message);
        }
        if self.start_prompt_visible {
            title.push_str(" - click to look around");
        }
        title
    }
}

impl Overlay for OverlayState {
    fn set_start_prompt_visible(&mut self, visible: bool) {
        self.start_prompt_visible = visible;
    }

    fn clear_loading(&mut self) {
        self.loading = false;
    }

    fn set_loading_message(&mut self, message: &str) {
        message.clone_into(&mut self.loading_message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(events: &[UiEvent]) -> OverlayState {
        let mut overlay = OverlayState::default();
        for event in events {
            VisibilityController.apply(event, &mut overlay);
        }
        overlay
    }

    #[test]
    fn pointer_lock_toggles_the_prompt() {
        assert!(!apply(&[UiEvent::PointerLocked]).start_prompt_visible);
        assert!(
            apply(&[UiEvent::PointerLocked, UiEvent::PointerUnlocked])
                .start_prompt_visible
        );
    }

    #[test]
    fn repeated_events_are_idempotent() {
        let once = apply(&[UiEvent::PointerLocked]);
        let twice = apply(&[UiEvent::PointerLocked, UiEvent::PointerLocked]);
        assert_eq!(once, twice);

        let once = apply(&[UiEvent::LoadSucceeded]);
        let twice = apply(&[UiEvent::LoadSucceeded, UiEvent::LoadSucceeded]);
        assert_eq!(once, twice);
    }

    #[test]
    fn failure_keeps_the_indicator_and_shows_the_error() {
        let message = load_failure_message(&"HTTP 404 Not Found");
        let overlay = apply(&[UiEvent::LoadFailed(message)]);
        assert!(overlay.loading);
        assert!(overlay.loading_message.contains("HTTP 404 Not Found"));
        assert!(overlay.loading_message.starts_with("Failed to load map: "));
    }

    #[test]
    fn success_removes_the_indicator() {
        let overlay = apply(&[UiEvent::LoadSucceeded]);
        assert!(!overlay.loading);
        assert!(overlay.start_prompt_visible);
    }

    #[test]
    fn title_reflects_overlay() {
        let overlay = OverlayState::default();
        assert_eq!(overlay.title("mapA"), "mapA - Loading... - click to look around");
        let overlay = apply(&[UiEvent::LoadSucceeded, UiEvent::PointerLocked]);
        assert_eq!(overlay.title("mapA"), "mapA");
    }
}
