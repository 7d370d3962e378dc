use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Ray-march rendering parameters.
pub struct RenderOptions {
    /// Sampling step along each ray, in voxel units.
    pub step_size: f32,
    /// Background clear color (RGBA).
    pub background: [f32; 4],
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            step_size: 1.0,
            background: [1.0, 1.0, 1.0, 1.0],
        }
    }
}
