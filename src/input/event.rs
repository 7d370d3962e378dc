/// Platform-agnostic input events.
///
/// The windowing host translates raw window events into these and feeds
/// them to [`VolumeRenderEngine::handle_input`], which dispatches to the
/// camera controller. Pointer events are dropped while the GUI overlay has
/// input focus.
///
/// [`VolumeRenderEngine::handle_input`]: crate::engine::VolumeRenderEngine::handle_input
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Cursor moved to an absolute screen position.
    CursorMoved {
        /// Horizontal position in physical pixels.
        x: f32,
        /// Vertical position in physical pixels.
        y: f32,
    },
    /// Mouse button pressed or released.
    MouseButton {
        /// Which button changed.
        button: MouseButton,
        /// `true` for press, `false` for release.
        pressed: bool,
    },
    /// Scroll wheel tick (positive = up).
    Scroll {
        /// Scroll amount in lines.
        delta: f32,
    },
}

/// Platform-agnostic mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary (left) button, which drives arcball rotation.
    Left,
    /// Secondary (right) button, which drives first-person look.
    Right,
    /// Middle button (wheel click).
    Middle,
}

#[cfg(feature = "viewer")]
impl From<winit::event::MouseButton> for MouseButton {
    fn from(button: winit::event::MouseButton) -> Self {
        match button {
            winit::event::MouseButton::Right => Self::Right,
            winit::event::MouseButton::Middle => Self::Middle,
            _ => Self::Left,
        }
    }
}
