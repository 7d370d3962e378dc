//! Editor-session state for the transfer-function overlay.
//!
//! The overlay host owns the widget drawing; this struct owns everything
//! the widgets need to remember between frames — the selected control
//! point, the filename being typed, and the `.dat` browser state — as
//! explicit fields rather than function-local statics, so several editors
//! (or tests) can run side by side.
//!
//! Every mutating method returns `true` when the transfer function
//! actually changed, which is the caller's cue to re-upload the lookup
//! table. Save/load failures are user-triggered and recoverable: they are
//! logged and absorbed here instead of propagating.

use std::path::{Path, PathBuf};

use log::{error, warn};

use super::{list_transfer_functions, TransferFunction};

/// Alpha assigned to points inserted by clicking the palette; the click's
/// vertical position supplies the alpha, the color starts out white.
const INSERT_COLOR_RGB: [f32; 3] = [1.0, 1.0, 1.0];

/// Mutable state behind the transfer-function editor overlay.
#[derive(Debug)]
pub struct EditorSession {
    /// Directory scanned for `.dat` files and used for saving.
    directory: PathBuf,
    /// Currently selected control point, if any.
    selected: Option<usize>,
    /// Filename (without extension) the user is typing for the next save.
    pub filename: String,
    /// Cached directory listing shown by the file browser.
    files: Vec<String>,
    /// Selection index into `files`.
    selected_file: Option<usize>,
    /// Whether the file browser is open.
    pub show_browser: bool,
}

impl EditorSession {
    /// New session storing and browsing files under `directory`.
    #[must_use]
    pub fn new(directory: PathBuf) -> Self {
        Self {
            directory,
            selected: None,
            filename: String::new(),
            files: Vec::new(),
            selected_file: None,
            show_browser: false,
        }
    }

    /// Currently selected control point index.
    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Select (or deselect) a control point.
    pub fn select_point(
        &mut self,
        tf: &TransferFunction,
        index: Option<usize>,
    ) {
        self.selected = index.filter(|&i| i < tf.len());
    }

    /// Click on the palette at normalized `position` with the alpha implied
    /// by the click height; inserts a white point there and selects it.
    ///
    /// Returns `true` if a point was inserted. Clicks on top of an existing
    /// point's position (or on the palette edges) insert nothing.
    pub fn click_palette(
        &mut self,
        tf: &mut TransferFunction,
        position: f32,
        alpha: f32,
    ) -> bool {
        let position = position.clamp(0.0, 1.0);
        let alpha = alpha.clamp(0.0, 1.0);
        let [r, g, b] = INSERT_COLOR_RGB;
        match tf.insert(position, [r, g, b, alpha]) {
            Ok(index) => {
                self.selected = Some(index);
                true
            }
            Err(_) => false,
        }
    }

    /// Drag the selected point to `position` (clamped between neighbors).
    ///
    /// Returns `true` if the point moved. Boundary points and empty
    /// selections are silently rejected.
    pub fn drag_selected(
        &mut self,
        tf: &mut TransferFunction,
        position: f32,
    ) -> bool {
        self.selected
            .is_some_and(|index| tf.reposition(index, position).is_ok())
    }

    /// Overwrite the selected point's color.
    pub fn set_selected_color(
        &mut self,
        tf: &mut TransferFunction,
        color: [f32; 4],
    ) -> bool {
        self.selected
            .is_some_and(|index| tf.set_color(index, color).is_ok())
    }

    /// Delete the selected point and clear the selection.
    ///
    /// Returns `true` if a point was removed; boundary points are silently
    /// kept.
    pub fn delete_selected(&mut self, tf: &mut TransferFunction) -> bool {
        let Some(index) = self.selected else {
            return false;
        };
        if tf.remove(index).is_ok() {
            self.selected = None;
            true
        } else {
            false
        }
    }

    /// Save `tf` under the typed filename (plus `.dat`) in the session
    /// directory. Returns `false` (and logs) on an empty name or an
    /// unwritable path; the model is never modified.
    pub fn save(&self, tf: &TransferFunction) -> bool {
        if self.filename.is_empty() {
            warn!("transfer-function save requested without a filename");
            return false;
        }
        let path = self.dat_path(&self.filename);
        match tf.save(&path) {
            Ok(()) => true,
            Err(e) => {
                error!("failed to save transfer function to {path:?}: {e}");
                false
            }
        }
    }

    /// Re-scan the session directory for `.dat` files, preserving the
    /// current selection when its file survives the rescan.
    pub fn refresh_files(&mut self) {
        let previous = self
            .selected_file
            .and_then(|i| self.files.get(i).cloned());
        self.files = list_transfer_functions(&self.directory);
        self.selected_file = previous
            .and_then(|name| self.files.iter().position(|f| *f == name));
    }

    /// Files currently shown by the browser.
    #[must_use]
    pub fn files(&self) -> &[String] {
        &self.files
    }

    /// Select a file in the browser list.
    pub fn select_file(&mut self, index: usize) {
        if index < self.files.len() {
            self.selected_file = Some(index);
        }
    }

    /// Index of the selected browser entry, if any.
    #[must_use]
    pub fn selected_file(&self) -> Option<usize> {
        self.selected_file
    }

    /// Load the browser-selected file into `tf`, replacing it wholesale.
    ///
    /// Returns `true` on success (the caller must re-upload the LUT). On
    /// failure the previous point list is kept and the error is logged.
    /// The point selection is cleared either way, since indices from the
    /// old list are meaningless against the new one.
    pub fn load_selected(&mut self, tf: &mut TransferFunction) -> bool {
        let Some(name) =
            self.selected_file.and_then(|i| self.files.get(i))
        else {
            return false;
        };
        let path = self.dat_path(name);
        match tf.load_from(&path) {
            Ok(()) => {
                self.selected = None;
                true
            }
            Err(e) => {
                error!(
                    "failed to load transfer function from {path:?}: {e}"
                );
                false
            }
        }
    }

    fn dat_path(&self, name: &str) -> PathBuf {
        self.directory.join(format!("{name}.dat"))
    }

    /// The directory this session saves into and browses.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_in_tempdir() -> (tempfile::TempDir, EditorSession) {
        let dir = tempfile::tempdir().unwrap();
        let session = EditorSession::new(dir.path().to_path_buf());
        (dir, session)
    }

    #[test]
    fn palette_click_inserts_and_selects() {
        let (_dir, mut session) = session_in_tempdir();
        let mut tf = TransferFunction::new();

        assert!(session.click_palette(&mut tf, 0.4, 0.8));
        assert_eq!(session.selected(), Some(1));
        assert_eq!(tf.points()[1].color, [1.0, 1.0, 1.0, 0.8]);

        // A second click on the same position changes nothing.
        assert!(!session.click_palette(&mut tf, 0.4, 0.2));
        assert_eq!(tf.len(), 3);
    }

    #[test]
    fn deleting_boundary_selection_is_a_no_op() {
        let (_dir, mut session) = session_in_tempdir();
        let mut tf = TransferFunction::new();

        session.select_point(&tf, Some(0));
        assert!(!session.delete_selected(&mut tf));
        assert_eq!(tf.len(), 2);
        // Selection survives the rejected delete.
        assert_eq!(session.selected(), Some(0));
    }

    #[test]
    fn delete_clears_selection() {
        let (_dir, mut session) = session_in_tempdir();
        let mut tf = TransferFunction::new();
        assert!(session.click_palette(&mut tf, 0.5, 0.5));
        assert!(session.delete_selected(&mut tf));
        assert_eq!(session.selected(), None);
        assert_eq!(tf.len(), 2);
    }

    #[test]
    fn save_refresh_load_round_trip() {
        let (_dir, mut session) = session_in_tempdir();
        let mut tf = TransferFunction::new();
        assert!(session.click_palette(&mut tf, 0.25, 0.9));

        session.filename = "preset".to_owned();
        assert!(session.save(&tf));

        session.refresh_files();
        assert_eq!(session.files(), ["preset".to_owned()]);
        session.select_file(0);

        let mut other = TransferFunction::new();
        assert!(session.load_selected(&mut other));
        assert_eq!(other, tf);
    }

    #[test]
    fn save_without_filename_fails() {
        let (_dir, session) = session_in_tempdir();
        let tf = TransferFunction::new();
        assert!(!session.save(&tf));
    }

    #[test]
    fn failed_load_keeps_previous_points() {
        let (dir, mut session) = session_in_tempdir();
        std::fs::write(dir.path().join("junk.dat"), b"not a preset")
            .unwrap();
        session.refresh_files();
        session.select_file(0);

        let mut tf = TransferFunction::new();
        let _ = tf.insert(0.5, [0.5; 4]).unwrap();
        let before = tf.clone();
        assert!(!session.load_selected(&mut tf));
        assert_eq!(tf, before);
    }
}
