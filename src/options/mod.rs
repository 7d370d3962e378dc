//! Centralized viewer options with TOML preset support.
//!
//! All tweakable settings (camera, ray-march rendering, keybindings) are
//! consolidated here. Options serialize to/from TOML; all sub-structs use
//! `#[serde(default)]` so partial files (e.g. only overriding `[camera]`)
//! work correctly.

mod camera;
mod keybindings;
mod render;

use std::path::Path;

pub use camera::CameraOptions;
pub use keybindings::KeybindingOptions;
pub use render::RenderOptions;
use serde::{Deserialize, Serialize};

use crate::error::VolrayError;

/// Top-level options container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Options {
    /// Camera projection and control parameters.
    pub camera: CameraOptions,
    /// Ray-march rendering parameters.
    pub render: RenderOptions,
    /// Keyboard binding options.
    pub keybindings: KeybindingOptions,
}

impl Options {
    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be read, `OptionsParse` on invalid TOML.
    pub fn load(path: &Path) -> Result<Self, VolrayError> {
        let content = std::fs::read_to_string(path).map_err(VolrayError::Io)?;
        let mut options: Self = toml::from_str(&content)
            .map_err(|e| VolrayError::OptionsParse(e.to_string()))?;
        options.keybindings.rebuild_reverse_map();
        Ok(options)
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// `OptionsParse` on serialization failure, `Io` if the file cannot be
    /// written.
    pub fn save(&self, path: &Path) -> Result<(), VolrayError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| VolrayError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(VolrayError::Io)?;
        }
        std::fs::write(path, content).map_err(VolrayError::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyAction;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let mut parsed: Options = toml::from_str(&toml_str).unwrap();
        parsed.keybindings.rebuild_reverse_map();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[camera]
sensitivity = 0.25
";
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert_eq!(opts.camera.sensitivity, 0.25);
        // Everything else should be default
        assert_eq!(opts.camera.speed, 128.0);
        assert_eq!(opts.render.step_size, 1.0);
    }

    #[test]
    fn keybinding_lookup() {
        let opts = Options::default();
        assert_eq!(
            opts.keybindings.lookup("KeyW"),
            Some(KeyAction::MoveForward)
        );
        assert_eq!(opts.keybindings.lookup("Escape"), Some(KeyAction::Quit));
        assert_eq!(opts.keybindings.lookup("KeyZ"), None);
    }

    #[test]
    fn load_rebuilds_keybinding_reverse_map() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("options.toml");
        std::fs::write(
            &path,
            r#"
[keybindings.bindings]
move_forward = "ArrowUp"
"#,
        )
        .unwrap();

        let opts = Options::load(&path).unwrap();
        assert_eq!(
            opts.keybindings.lookup("ArrowUp"),
            Some(KeyAction::MoveForward)
        );
        assert_eq!(opts.keybindings.lookup("KeyW"), None);
    }
}
