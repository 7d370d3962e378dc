//! Input handling: platform-agnostic event types and bindable key actions.

/// Platform-agnostic input events.
pub mod event;
/// Bindable viewer actions.
pub mod keyboard;

pub use event::{InputEvent, MouseButton};
pub use keyboard::KeyAction;
