//! Raw scalar volume loading.

use std::path::Path;

use glam::Vec3;

use crate::error::VolrayError;

/// Dimensions assumed for headerless raw volume files.
pub const DEFAULT_DIMENSIONS: (u32, u32, u32) = (256, 256, 256);

/// An owned 3D scalar field of unsigned-byte voxels.
///
/// Raw files carry no header; the dimensions are fixed up front and the
/// byte count is validated against them at load time. The buffer is sized
/// once at construction and owned for the volume's whole lifetime.
#[derive(Debug, Clone)]
pub struct Volume {
    data: Vec<u8>,
    dimensions: (u32, u32, u32),
}

impl Volume {
    /// Load a headerless raw volume with the given voxel dimensions.
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be read; `VolumeLoad` if its size does not
    /// match `width * height * depth` bytes.
    pub fn load_raw(
        path: &Path,
        dimensions: (u32, u32, u32),
    ) -> Result<Self, VolrayError> {
        let data = std::fs::read(path)?;
        let expected = dimensions.0 as usize
            * dimensions.1 as usize
            * dimensions.2 as usize;
        if data.len() != expected {
            return Err(VolrayError::VolumeLoad(format!(
                "{path:?}: expected {expected} bytes for {}x{}x{} voxels, found {}",
                dimensions.0,
                dimensions.1,
                dimensions.2,
                data.len()
            )));
        }
        Ok(Self { data, dimensions })
    }

    /// Build a volume from an in-memory voxel buffer.
    ///
    /// # Errors
    ///
    /// `VolumeLoad` if the buffer size does not match the dimensions.
    pub fn from_bytes(
        data: Vec<u8>,
        dimensions: (u32, u32, u32),
    ) -> Result<Self, VolrayError> {
        let expected = dimensions.0 as usize
            * dimensions.1 as usize
            * dimensions.2 as usize;
        if data.len() != expected {
            return Err(VolrayError::VolumeLoad(format!(
                "expected {expected} bytes, got {}",
                data.len()
            )));
        }
        Ok(Self { data, dimensions })
    }

    /// Raw voxel bytes in x-major, then y, then z order.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Voxel dimensions (width, height, depth).
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32, u32) {
        self.dimensions
    }

    /// World-space extent of the volume (one unit per voxel).
    #[must_use]
    pub fn extent(&self) -> Vec3 {
        Vec3::new(
            self.dimensions.0 as f32,
            self.dimensions.1 as f32,
            self.dimensions.2 as f32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_exactly_sized_buffers() {
        let v = Volume::from_bytes(vec![0; 8], (2, 2, 2)).unwrap();
        assert_eq!(v.dimensions(), (2, 2, 2));
        assert_eq!(v.data().len(), 8);
        assert_eq!(v.extent(), Vec3::splat(2.0));
    }

    #[test]
    fn rejects_mismatched_buffers() {
        assert!(Volume::from_bytes(vec![0; 7], (2, 2, 2)).is_err());
        assert!(Volume::from_bytes(vec![0; 9], (2, 2, 2)).is_err());
    }

    #[test]
    fn load_validates_file_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.raw");
        std::fs::write(&path, vec![7_u8; 27]).unwrap();

        let v = Volume::load_raw(&path, (3, 3, 3)).unwrap();
        assert_eq!(v.data()[0], 7);

        assert!(Volume::load_raw(&path, (4, 3, 3)).is_err());
        assert!(matches!(
            Volume::load_raw(Path::new("/nonexistent.raw"), (3, 3, 3)),
            Err(VolrayError::Io(_))
        ));
    }
}
