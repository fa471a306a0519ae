use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::input::MoveDirection;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
/// Configurable keyboard bindings mapping movement directions to key codes.
pub struct KeybindingOptions {
    /// Maps direction → key codes (e.g. `Forward` → `["KeyW", "ArrowUp"]`).
    pub bindings: HashMap<MoveDirection, Vec<String>>,
    /// Key that releases pointer lock in the native viewer. Browsers
    /// reserve Escape for this themselves.
    pub release_pointer: String,
}

impl Default for KeybindingOptions {
    fn default() -> Self {
        let bindings = HashMap::from([
            (MoveDirection::Forward, vec!["KeyW".into(), "ArrowUp".into()]),
            (
                MoveDirection::Backward,
                vec!["KeyS".into(), "ArrowDown".into()],
            ),
            (MoveDirection::Left, vec!["KeyA".into(), "ArrowLeft".into()]),
            (MoveDirection::Right, vec!["KeyD".into(), "ArrowRight".into()]),
        ]);

        Self {
            bindings,
            release_pointer: "Escape".into(),
        }
    }
}

impl KeybindingOptions {
    /// Key codes bound to a direction (empty if unbound).
    #[must_use]
    pub fn keys(&self, direction: MoveDirection) -> &[String] {
        self.bindings.get(&direction).map_or(&[], Vec::as_slice)
    }
}
