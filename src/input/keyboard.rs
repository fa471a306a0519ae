use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Movement directions that can be bound to keys.
///
/// Serde serializes as `snake_case` strings so TOML stays readable:
/// ```toml
/// [keybindings.bindings]
/// forward = ["KeyW", "ArrowUp"]
/// left = ["KeyA", "ArrowLeft"]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveDirection {
    /// Along the look direction.
    Forward,
    /// Against the look direction.
    Backward,
    /// Against the camera's right axis.
    Left,
    /// Along the camera's right axis.
    Right,
}

impl MoveDirection {
    /// Every direction, in the order the motion model applies them.
    pub const ALL: [Self; 4] =
        [Self::Forward, Self::Backward, Self::Left, Self::Right];
}

/// Which key codes are currently held.
///
/// Written by key transitions, read once per frame. Auto-repeat presses
/// just re-set `true`.
#[derive(Debug, Default, Clone)]
pub struct KeyState {
    held: FxHashMap<String, bool>,
}

impl KeyState {
    /// Empty state: nothing held.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key transition.
    pub fn set(&mut self, code: &str, pressed: bool) {
        if let Some(flag) = self.held.get_mut(code) {
            *flag = pressed;
        } else {
            let _ = self.held.insert(code.to_owned(), pressed);
        }
    }

    /// Whether `code` is held. Keys never seen are not held.
    #[must_use]
    pub fn is_held(&self, code: &str) -> bool {
        self.held.get(code).copied().unwrap_or(false)
    }

    /// Whether any of `codes` is held.
    #[must_use]
    pub fn any_held<S: AsRef<str>>(&self, codes: &[S]) -> bool {
        codes.iter().any(|code| self.is_held(code.as_ref()))
    }

    /// Mark every key released, e.g. when the window loses focus and the
    /// matching key-up events will never arrive.
    pub fn release_all(&mut self) {
        self.held.values_mut().for_each(|flag| *flag = false);
    }
}
