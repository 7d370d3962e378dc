//! Binary persistence for transfer functions.
//!
//! On-disk layout (all little-endian):
//!
//! ```text
//! [4 bytes]  magic "VRTF"
//! [2 bytes]  format version (currently 1)
//! [8 bytes]  point count, u64
//! repeated count times:
//!   [4 bytes]   position, f32
//!   [16 bytes]  color, 4 x f32 RGBA
//! ```
//!
//! The header replaces the original headerless format with its
//! platform-width count field; loading validates the declared count against
//! the actual byte length and the model invariants before any state is
//! replaced, so a truncated or corrupt file can never leave a
//! half-populated list behind.

use std::path::Path;

use super::{ControlPoint, TransferFunction, TransferFunctionError};

const MAGIC: [u8; 4] = *b"VRTF";
const FORMAT_VERSION: u16 = 1;
const HEADER_LEN: usize = 14;
const RECORD_LEN: usize = 20;

impl TransferFunction {
    /// Serialize the control-point list to `path`.
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be created or written.
    pub fn save(&self, path: &Path) -> Result<(), TransferFunctionError> {
        let points = self.points();
        let mut bytes =
            Vec::with_capacity(HEADER_LEN + points.len() * RECORD_LEN);
        bytes.extend_from_slice(&MAGIC);
        bytes.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
        bytes.extend_from_slice(&(points.len() as u64).to_le_bytes());
        for point in points {
            bytes.extend_from_slice(&point.position.to_le_bytes());
            for channel in point.color {
                bytes.extend_from_slice(&channel.to_le_bytes());
            }
        }
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Replace the control-point list with the contents of `path`.
    ///
    /// The file is parsed and validated in full before the in-memory list
    /// is touched; on any error the previous state is kept unchanged.
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be opened or read; `CorruptFile` if the
    /// magic/version is wrong, the byte length disagrees with the declared
    /// count, or the decoded points violate the model invariants.
    pub fn load_from(
        &mut self,
        path: &Path,
    ) -> Result<(), TransferFunctionError> {
        let bytes = std::fs::read(path)?;
        let points = decode(&bytes)?;
        Self::validate(&points)?;
        self.replace_points(points);
        Ok(())
    }
}

fn decode(
    bytes: &[u8],
) -> Result<Vec<ControlPoint>, TransferFunctionError> {
    if bytes.len() < HEADER_LEN {
        return Err(TransferFunctionError::CorruptFile(format!(
            "file too short for header: {} bytes",
            bytes.len()
        )));
    }
    if bytes[0..4] != MAGIC {
        return Err(TransferFunctionError::CorruptFile(
            "bad magic, not a transfer-function file".into(),
        ));
    }
    let version = u16::from_le_bytes([bytes[4], bytes[5]]);
    if version != FORMAT_VERSION {
        return Err(TransferFunctionError::CorruptFile(format!(
            "unsupported format version {version}"
        )));
    }

    let mut count_bytes = [0_u8; 8];
    count_bytes.copy_from_slice(&bytes[6..HEADER_LEN]);
    let count = u64::from_le_bytes(count_bytes) as usize;

    let expected = count
        .checked_mul(RECORD_LEN)
        .and_then(|n| n.checked_add(HEADER_LEN));
    if expected != Some(bytes.len()) {
        return Err(TransferFunctionError::CorruptFile(format!(
            "declared {count} points but file has {} bytes",
            bytes.len()
        )));
    }

    let mut points = Vec::with_capacity(count);
    for record in bytes[HEADER_LEN..].chunks_exact(RECORD_LEN) {
        let mut fields = [0.0_f32; 5];
        for (field, raw) in fields.iter_mut().zip(record.chunks_exact(4)) {
            *field = f32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]);
        }
        points.push(ControlPoint {
            position: fields[0],
            color: [fields[1], fields[2], fields[3], fields[4]],
        });
    }
    Ok(points)
}

/// Names of `.dat` transfer-function files in `dir`, sorted, without the
/// extension. Unreadable directories yield an empty list.
#[must_use]
pub fn list_transfer_functions(dir: &Path) -> Vec<String> {
    let mut names = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "dat") {
                if let Some(stem) =
                    path.file_stem().and_then(|s| s.to_str())
                {
                    names.push(stem.to_owned());
                }
            }
        }
    }
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(point_count: usize) -> TransferFunction {
        let mut tf = TransferFunction::new();
        for i in 1..point_count.saturating_sub(1) {
            let pos = i as f32 / (point_count - 1) as f32;
            let c = i as f32 / point_count as f32;
            let _ = tf.insert(pos, [c, 1.0 - c, c * 0.5, c]).unwrap();
        }
        tf
    }

    #[test]
    fn save_load_round_trips_exactly() {
        let dir = tempfile::tempdir().unwrap();
        for n in [2, 3, 8, 32] {
            let tf = sample(n);
            let path = dir.path().join(format!("tf_{n}.dat"));
            tf.save(&path).unwrap();

            let mut loaded = TransferFunction::new();
            loaded.load_from(&path).unwrap();
            assert_eq!(loaded, tf);
        }
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let mut tf = TransferFunction::new();
        let err = tf
            .load_from(Path::new("/nonexistent/volray.dat"))
            .unwrap_err();
        assert!(matches!(err, TransferFunctionError::Io(_)));
    }

    #[test]
    fn save_to_unwritable_path_is_io_error() {
        let tf = TransferFunction::new();
        let err =
            tf.save(Path::new("/nonexistent/dir/out.dat")).unwrap_err();
        assert!(matches!(err, TransferFunctionError::Io(_)));
    }

    #[test]
    fn truncated_file_leaves_state_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("truncated.dat");
        let full = sample(8);
        full.save(&path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        std::fs::write(&path, &bytes[..bytes.len() - 7]).unwrap();

        let mut tf = sample(4);
        let before = tf.clone();
        let err = tf.load_from(&path).unwrap_err();
        assert!(matches!(err, TransferFunctionError::CorruptFile(_)));
        assert_eq!(tf, before);
    }

    #[test]
    fn bad_magic_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.dat");
        std::fs::write(&path, b"NOPE\x01\x00\x00\x00\x00\x00\x00\x00\x00\x00")
            .unwrap();

        let mut tf = TransferFunction::new();
        let err = tf.load_from(&path).unwrap_err();
        assert!(matches!(err, TransferFunctionError::CorruptFile(_)));
    }

    #[test]
    fn invariant_violating_data_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("unsorted.dat");

        // Well-framed file whose points are out of order.
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"VRTF");
        bytes.extend_from_slice(&1_u16.to_le_bytes());
        bytes.extend_from_slice(&3_u64.to_le_bytes());
        for pos in [0.0_f32, 0.8, 0.2] {
            bytes.extend_from_slice(&pos.to_le_bytes());
            for c in [0.0_f32; 4] {
                bytes.extend_from_slice(&c.to_le_bytes());
            }
        }
        std::fs::write(&path, bytes).unwrap();

        let mut tf = TransferFunction::new();
        let before = tf.clone();
        assert!(tf.load_from(&path).is_err());
        assert_eq!(tf, before);
    }

    #[test]
    fn lists_dat_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["zeta.dat", "alpha.dat", "ignored.txt"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        assert_eq!(
            list_transfer_functions(dir.path()),
            vec!["alpha".to_owned(), "zeta".to_owned()]
        );
    }
}
