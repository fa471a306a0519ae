use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

use super::Overlay;

/// Overlay backed by the page: `#startButton`, `#loading` and the
/// `loading` class on `<body>`.
///
/// Missing elements are skipped, so a bare page still runs.
#[derive(Debug, Clone)]
pub struct DomOverlay {
    document: Document,
}

impl DomOverlay {
    /// Overlay over `document`.
    #[must_use]
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    fn element(&self, id: &str) -> Option<HtmlElement> {
        self.document
            .get_element_by_id(id)
            .and_then(|e| e.dyn_into::<HtmlElement>().ok())
    }
}

impl Overlay for DomOverlay {
    fn set_start_prompt_visible(&mut self, visible: bool) {
        if let Some(button) = self.element("startButton") {
            let display = if visible { "block" } else { "none" };
            if let Err(e) = button.style().set_property("display", display) {
                log::warn!("failed to toggle start prompt: {e:?}");
            }
        }
    }

    fn clear_loading(&mut self) {
        if let Some(body) = self.document.body() {
            if let Err(e) = body.class_list().remove_1("loading") {
                log::warn!("failed to clear loading class: {e:?}");
            }
        }
    }

    fn set_loading_message(&mut self, message: &str) {
        if let Some(indicator) = self.element("loading") {
            indicator.set_text_content(Some(message));
        }
    }
}
