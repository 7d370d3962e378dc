//! Input dispatch for [`VolumeRenderEngine`].

use glam::Vec2;

use super::VolumeRenderEngine;
use crate::camera::FlyDirection;
use crate::input::{InputEvent, KeyAction};

impl VolumeRenderEngine {
    /// Process a platform-agnostic input event.
    ///
    /// This is the primary pointer entry point. Consumers translate raw
    /// window events into [`InputEvent`] variants; the engine dispatches
    /// them to the camera controller. While the GUI overlay has input
    /// focus, pointer events are swallowed here so widget drags never
    /// rotate the camera.
    ///
    /// Returns `true` if the camera changed.
    pub fn handle_input(&mut self, event: InputEvent) -> bool {
        if self.gui_has_focus {
            return false;
        }
        match event {
            InputEvent::CursorMoved { x, y } => {
                self.camera_controller.cursor_moved(Vec2::new(x, y))
            }
            InputEvent::MouseButton { button, pressed } => {
                self.camera_controller.set_button(button, pressed);
                false
            }
            InputEvent::Scroll { delta } => {
                self.camera_controller.scroll(delta);
                false
            }
        }
    }

    /// Apply a bound keyboard action. Movement actions are scaled by
    /// `delta_time` seconds.
    ///
    /// Returns `true` when the action requests application exit.
    pub fn apply_key_action(
        &mut self,
        action: KeyAction,
        delta_time: f32,
    ) -> bool {
        let direction = match action {
            KeyAction::Quit => return true,
            KeyAction::MoveForward => FlyDirection::Forward,
            KeyAction::MoveBackward => FlyDirection::Backward,
            KeyAction::StrafeLeft => FlyDirection::Left,
            KeyAction::StrafeRight => FlyDirection::Right,
            KeyAction::MoveUp => FlyDirection::Up,
            KeyAction::MoveDown => FlyDirection::Down,
        };
        self.camera_controller.fly(direction, delta_time);
        false
    }
}
