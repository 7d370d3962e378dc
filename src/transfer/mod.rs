//! Transfer-function model: ordered control points mapping normalized
//! scalar intensity to RGBA color.
//!
//! The model owns a sorted list of [`ControlPoint`]s and derives a 256-entry
//! [`LookupTable`] from it by piecewise-linear interpolation. Two boundary
//! points are pinned at positions 0 and 1 and can never be removed or
//! reordered past each other; everything in between is user-editable.

pub mod editor;
mod io;
mod lut;

pub use editor::EditorSession;
pub use io::list_transfer_functions;
pub use lut::{LookupTable, LUT_SIZE};

use std::fmt;

/// Minimum separation kept between neighboring control points when
/// repositioning, so the strictly-ascending invariant survives a drag all
/// the way into a neighbor.
const NEIGHBOR_GAP: f32 = 1e-4;

/// A (position, color) pair anchoring the piecewise-linear curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlPoint {
    /// Normalized scalar position in `[0, 1]`.
    pub position: f32,
    /// RGBA color, each channel in `[0, 1]`.
    pub color: [f32; 4],
}

/// Errors produced by transfer-function operations.
#[derive(Debug)]
pub enum TransferFunctionError {
    /// Index out of range, or refers to a pinned boundary point in an
    /// operation that must not touch boundaries.
    InvalidIndex(usize),
    /// Insertion position duplicates an existing point or lies outside the
    /// open interval (0, 1).
    InvalidPosition(f32),
    /// Persisted file could not be read or written.
    Io(std::io::Error),
    /// Persisted file is truncated, mislabeled, or violates the model
    /// invariants; the in-memory state is left unchanged.
    CorruptFile(String),
}

impl fmt::Display for TransferFunctionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidIndex(i) => {
                write!(f, "invalid control-point index: {i}")
            }
            Self::InvalidPosition(p) => {
                write!(f, "invalid control-point position: {p}")
            }
            Self::Io(e) => write!(f, "transfer-function I/O error: {e}"),
            Self::CorruptFile(msg) => {
                write!(f, "corrupt transfer-function file: {msg}")
            }
        }
    }
}

impl std::error::Error for TransferFunctionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for TransferFunctionError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Ordered control-point list with pinned boundary points.
///
/// Invariants (upheld by every mutating operation):
/// - points are sorted strictly ascending by position,
/// - the first point sits at 0.0 and the last at 1.0,
/// - at least two points exist,
/// - no two points share a position.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferFunction {
    points: Vec<ControlPoint>,
}

impl Default for TransferFunction {
    fn default() -> Self {
        Self::new()
    }
}

impl TransferFunction {
    /// A fresh transfer function: black-transparent at 0, white-opaque at 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            points: vec![
                ControlPoint {
                    position: 0.0,
                    color: [0.0, 0.0, 0.0, 0.0],
                },
                ControlPoint {
                    position: 1.0,
                    color: [1.0, 1.0, 1.0, 1.0],
                },
            ],
        }
    }

    /// Read-only view of the control points, for overlay drawing.
    #[must_use]
    pub fn points(&self) -> &[ControlPoint] {
        &self.points
    }

    /// Number of control points (always at least 2).
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`; present for API completeness alongside [`len`].
    ///
    /// [`len`]: Self::len
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Insert a new point, maintaining sort order. Returns its index.
    ///
    /// # Errors
    ///
    /// `InvalidPosition` if `position` lies outside the open interval
    /// (0, 1) or duplicates an existing point's position.
    pub fn insert(
        &mut self,
        position: f32,
        color: [f32; 4],
    ) -> Result<usize, TransferFunctionError> {
        if !(position > 0.0 && position < 1.0) {
            return Err(TransferFunctionError::InvalidPosition(position));
        }
        if self.points.iter().any(|p| p.position == position) {
            return Err(TransferFunctionError::InvalidPosition(position));
        }

        let index = self
            .points
            .partition_point(|p| p.position < position);
        self.points.insert(
            index,
            ControlPoint {
                position,
                color: clamp_color(color),
            },
        );
        Ok(index)
    }

    /// Remove the point at `index`.
    ///
    /// # Errors
    ///
    /// `InvalidIndex` if `index` is out of range or refers to one of the
    /// two boundary points.
    pub fn remove(
        &mut self,
        index: usize,
    ) -> Result<(), TransferFunctionError> {
        if index == 0 || index >= self.points.len() - 1 {
            return Err(TransferFunctionError::InvalidIndex(index));
        }
        let _ = self.points.remove(index);
        Ok(())
    }

    /// Move the point at `index` to `new_position`, clamped strictly
    /// between its immediate neighbors so it can never cross them.
    ///
    /// # Errors
    ///
    /// `InvalidIndex` if `index` is out of range or refers to a boundary
    /// point.
    pub fn reposition(
        &mut self,
        index: usize,
        new_position: f32,
    ) -> Result<(), TransferFunctionError> {
        if index == 0 || index >= self.points.len() - 1 {
            return Err(TransferFunctionError::InvalidIndex(index));
        }
        let lo = self.points[index - 1].position + NEIGHBOR_GAP;
        let hi = self.points[index + 1].position - NEIGHBOR_GAP;
        if lo <= hi {
            self.points[index].position = new_position.clamp(lo, hi);
        }
        Ok(())
    }

    /// Overwrite the color of the point at `index` (boundary points
    /// included), clamping each channel to `[0, 1]`.
    ///
    /// # Errors
    ///
    /// `InvalidIndex` if `index` is out of range.
    pub fn set_color(
        &mut self,
        index: usize,
        color: [f32; 4],
    ) -> Result<(), TransferFunctionError> {
        let point = self
            .points
            .get_mut(index)
            .ok_or(TransferFunctionError::InvalidIndex(index))?;
        point.color = clamp_color(color);
        Ok(())
    }

    /// Recompute the derived 256-entry lookup table.
    #[must_use]
    pub fn lookup_table(&self) -> LookupTable {
        LookupTable::from_points(&self.points)
    }

    /// Replace the point list wholesale with already-validated data.
    pub(crate) fn replace_points(&mut self, points: Vec<ControlPoint>) {
        self.points = points;
    }

    /// Check the model invariants on a candidate point list (used when
    /// loading persisted data).
    pub(crate) fn validate(
        points: &[ControlPoint],
    ) -> Result<(), TransferFunctionError> {
        if points.len() < 2 {
            return Err(TransferFunctionError::CorruptFile(format!(
                "need at least 2 control points, found {}",
                points.len()
            )));
        }
        if points[0].position != 0.0 {
            return Err(TransferFunctionError::CorruptFile(format!(
                "first point must sit at 0.0, found {}",
                points[0].position
            )));
        }
        if points[points.len() - 1].position != 1.0 {
            return Err(TransferFunctionError::CorruptFile(format!(
                "last point must sit at 1.0, found {}",
                points[points.len() - 1].position
            )));
        }
        for pair in points.windows(2) {
            if pair[0].position >= pair[1].position {
                return Err(TransferFunctionError::CorruptFile(format!(
                    "positions not strictly ascending: {} then {}",
                    pair[0].position, pair[1].position
                )));
            }
        }
        Ok(())
    }
}

fn clamp_color(color: [f32; 4]) -> [f32; 4] {
    color.map(|c| c.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(tf: &TransferFunction) -> bool {
        tf.points()
            .windows(2)
            .all(|w| w[0].position < w[1].position)
    }

    #[test]
    fn new_has_pinned_boundaries() {
        let tf = TransferFunction::new();
        assert_eq!(tf.len(), 2);
        assert_eq!(tf.points()[0].position, 0.0);
        assert_eq!(tf.points()[1].position, 1.0);
        assert_eq!(tf.points()[0].color, [0.0, 0.0, 0.0, 0.0]);
        assert_eq!(tf.points()[1].color, [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn inserts_keep_list_sorted() {
        let mut tf = TransferFunction::new();
        for pos in [0.7, 0.2, 0.9, 0.4, 0.05] {
            let idx = tf.insert(pos, [0.5; 4]).unwrap();
            assert_eq!(tf.points()[idx].position, pos);
            assert!(sorted(&tf));
        }
        assert_eq!(tf.points()[0].position, 0.0);
        assert_eq!(tf.points()[tf.len() - 1].position, 1.0);
    }

    #[test]
    fn insert_rejects_duplicates_and_out_of_range() {
        let mut tf = TransferFunction::new();
        let _ = tf.insert(0.5, [0.5; 4]).unwrap();
        assert!(tf.insert(0.5, [0.1; 4]).is_err());
        assert!(tf.insert(0.0, [0.1; 4]).is_err());
        assert!(tf.insert(1.0, [0.1; 4]).is_err());
        assert!(tf.insert(-0.1, [0.1; 4]).is_err());
        assert!(tf.insert(1.1, [0.1; 4]).is_err());
        assert_eq!(tf.len(), 3);
    }

    #[test]
    fn boundary_points_cannot_be_removed() {
        let mut tf = TransferFunction::new();
        let _ = tf.insert(0.5, [0.5; 4]).unwrap();
        assert!(tf.remove(0).is_err());
        assert!(tf.remove(2).is_err());
        assert!(tf.remove(7).is_err());
        assert_eq!(tf.len(), 3);
        tf.remove(1).unwrap();
        assert_eq!(tf.len(), 2);
    }

    #[test]
    fn reposition_clamps_between_neighbors() {
        let mut tf = TransferFunction::new();
        let a = tf.insert(0.3, [0.5; 4]).unwrap();
        let b = tf.insert(0.6, [0.5; 4]).unwrap();
        assert_eq!((a, b), (1, 2));

        // Dragging past the right neighbor stops just short of it.
        tf.reposition(1, 0.9).unwrap();
        assert!(tf.points()[1].position < tf.points()[2].position);
        assert!(sorted(&tf));

        // Dragging past the left boundary stops just past 0.
        tf.reposition(1, -5.0).unwrap();
        assert!(tf.points()[1].position > 0.0);
        assert!(sorted(&tf));
    }

    #[test]
    fn reposition_rejects_boundary_points() {
        let mut tf = TransferFunction::new();
        assert!(tf.reposition(0, 0.5).is_err());
        assert!(tf.reposition(1, 0.5).is_err());
        assert_eq!(tf.points()[0].position, 0.0);
        assert_eq!(tf.points()[1].position, 1.0);
    }

    #[test]
    fn set_color_clamps_channels() {
        let mut tf = TransferFunction::new();
        tf.set_color(0, [-1.0, 2.0, 0.5, 1.5]).unwrap();
        assert_eq!(tf.points()[0].color, [0.0, 1.0, 0.5, 1.0]);
        assert!(tf.set_color(9, [0.0; 4]).is_err());
    }

    #[test]
    fn validate_rejects_broken_invariants() {
        let ok = |pos: &[f32]| {
            pos.iter()
                .map(|&position| ControlPoint {
                    position,
                    color: [0.0; 4],
                })
                .collect::<Vec<_>>()
        };
        assert!(TransferFunction::validate(&ok(&[0.0, 1.0])).is_ok());
        assert!(TransferFunction::validate(&ok(&[0.0, 0.5, 1.0])).is_ok());
        assert!(TransferFunction::validate(&ok(&[0.0])).is_err());
        assert!(TransferFunction::validate(&ok(&[0.1, 1.0])).is_err());
        assert!(TransferFunction::validate(&ok(&[0.0, 0.9])).is_err());
        assert!(
            TransferFunction::validate(&ok(&[0.0, 0.5, 0.5, 1.0])).is_err()
        );
        assert!(
            TransferFunction::validate(&ok(&[0.0, 0.6, 0.4, 1.0])).is_err()
        );
    }
}
