//! GPU resource management utilities.
//!
//! Provides wgpu device/surface initialization and the volume and
//! lookup-table textures consumed by the ray-march pipeline.

/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// Volume and transfer-function texture upload.
pub mod texture;
