//! Transfer-function editing methods for [`VolumeRenderEngine`].
//!
//! Each method forwards to the editor session and marks the lookup table
//! dirty when the control points actually changed, so the next frame
//! re-uploads it exactly once no matter how many edits landed in between.

use super::VolumeRenderEngine;

impl VolumeRenderEngine {
    /// Select (or deselect) a control point in the editor.
    pub fn select_point(&mut self, index: Option<usize>) {
        self.editor.select_point(&self.transfer, index);
    }

    /// Insert a control point from a palette click and select it.
    ///
    /// Returns `true` if a point was inserted.
    pub fn click_palette(&mut self, position: f32, alpha: f32) -> bool {
        let changed =
            self.editor.click_palette(&mut self.transfer, position, alpha);
        self.lut_dirty |= changed;
        changed
    }

    /// Drag the selected control point to a new position.
    ///
    /// Returns `true` if the point moved.
    pub fn drag_selected(&mut self, position: f32) -> bool {
        let changed = self.editor.drag_selected(&mut self.transfer, position);
        self.lut_dirty |= changed;
        changed
    }

    /// Overwrite the selected control point's color.
    ///
    /// Returns `true` if a point was recolored.
    pub fn set_selected_color(&mut self, color: [f32; 4]) -> bool {
        let changed =
            self.editor.set_selected_color(&mut self.transfer, color);
        self.lut_dirty |= changed;
        changed
    }

    /// Delete the selected control point.
    ///
    /// Returns `true` if a point was removed; boundary points are kept.
    pub fn delete_selected(&mut self) -> bool {
        let changed = self.editor.delete_selected(&mut self.transfer);
        self.lut_dirty |= changed;
        changed
    }

    /// Save the current transfer function under the typed preset name.
    ///
    /// Returns `true` on success; failures are logged by the session.
    pub fn save_preset(&mut self) -> bool {
        let saved = self.editor.save(&self.transfer);
        if saved {
            self.editor.refresh_files();
        }
        saved
    }

    /// Re-scan the preset directory.
    pub fn refresh_presets(&mut self) {
        self.editor.refresh_files();
    }

    /// Select a preset in the browser list.
    pub fn select_preset(&mut self, index: usize) {
        self.editor.select_file(index);
    }

    /// Load the browser-selected preset, replacing the transfer function.
    ///
    /// Returns `true` on success. On failure the current points are kept
    /// and the error is logged by the session.
    pub fn load_selected_preset(&mut self) -> bool {
        let loaded = self.editor.load_selected(&mut self.transfer);
        self.lut_dirty |= loaded;
        loaded
    }
}
