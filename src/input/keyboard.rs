use serde::{Deserialize, Serialize};

/// Viewer-level actions that can be bound to keys.
///
/// Serde serializes as `snake_case` strings so TOML presets stay readable:
/// ```toml
/// [keybindings.bindings]
/// move_forward = "KeyW"
/// quit = "Escape"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    /// Fly along the camera's front vector.
    MoveForward,
    /// Fly against the camera's front vector.
    MoveBackward,
    /// Strafe along the negative right vector.
    StrafeLeft,
    /// Strafe along the right vector.
    StrafeRight,
    /// Fly along the up vector.
    MoveUp,
    /// Fly against the up vector.
    MoveDown,
    /// Close the viewer.
    Quit,
}
