//! Centralized viewer options with TOML support.
//!
//! All tweakable settings (camera, movement speed law, key bindings,
//! lighting, asset locations) are consolidated here. Options serialize
//! to/from TOML so a session can be tuned without rebuilding.

mod camera;
mod keybindings;
mod lighting;
mod loader;
mod movement;

use std::path::Path;

pub use camera::CameraOptions;
pub use keybindings::KeybindingOptions;
pub use lighting::LightingOptions;
pub use loader::LoaderOptions;
pub use movement::MovementOptions;
use serde::{Deserialize, Serialize};

use crate::error::ViewerError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[movement]`) work correctly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Options {
    /// Camera projection and look parameters.
    pub camera: CameraOptions,
    /// Movement speed law.
    pub movement: MovementOptions,
    /// Keyboard binding options.
    pub keybindings: KeybindingOptions,
    /// Lighting parameters.
    pub lighting: LightingOptions,
    /// Asset locations and conversion parameters.
    pub loader: LoaderOptions,
}

impl Options {
    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, ViewerError> {
        let content = std::fs::read_to_string(path).map_err(ViewerError::Io)?;
        Self::from_toml(&content)
    }

    /// Parse options from a TOML string. Missing fields use defaults.
    pub fn from_toml(content: &str) -> Result<Self, ViewerError> {
        toml::from_str(content)
            .map_err(|e| ViewerError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), ViewerError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ViewerError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ViewerError::Io)?;
        }
        std::fs::write(path, content).map_err(ViewerError::Io)
    }
}
