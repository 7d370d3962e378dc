//! Volume and transfer-function texture upload.

use crate::gpu::render_context::RenderContext;
use crate::transfer::{LookupTable, LUT_SIZE};
use crate::volume::Volume;

/// The scalar volume as a 3D texture with a linear-filtering sampler.
///
/// Uploaded once at construction; the voxel data never changes at runtime.
pub struct VolumeTexture {
    /// The underlying 3D texture (R8Unorm, one byte per voxel).
    pub texture: wgpu::Texture,
    /// A default full-texture view.
    pub view: wgpu::TextureView,
    /// Trilinear sampler with clamp-to-edge addressing.
    pub sampler: wgpu::Sampler,
}

impl VolumeTexture {
    /// Create and upload the 3D texture for `volume`.
    #[must_use]
    pub fn new(context: &RenderContext, volume: &Volume) -> Self {
        let (width, height, depth) = volume.dimensions();
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: depth,
        };

        let texture = context.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Volume Texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D3,
            format: wgpu::TextureFormat::R8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        context.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            volume.data(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = context.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Volume Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }
}

/// The transfer-function lookup table as a 256x1 RGBA texture.
///
/// Re-uploaded whenever the control-point list changes. Colors are
/// quantized to 8 bits per channel, which matches the [0,1] range the
/// model guarantees and keeps the format linearly filterable everywhere.
pub struct LutTexture {
    /// The underlying 256x1 texture (Rgba8Unorm).
    pub texture: wgpu::Texture,
    /// A default full-texture view.
    pub view: wgpu::TextureView,
    /// Linear sampler with clamp-to-edge addressing.
    pub sampler: wgpu::Sampler,
}

impl LutTexture {
    /// Create the LUT texture and upload the initial table.
    #[must_use]
    pub fn new(context: &RenderContext, lut: &LookupTable) -> Self {
        let texture = context.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Transfer Function Texture"),
            size: wgpu::Extent3d {
                width: LUT_SIZE as u32,
                height: 1,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = context.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Transfer Function Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let lut_texture = Self {
            texture,
            view,
            sampler,
        };
        lut_texture.upload(&context.queue, lut);
        lut_texture
    }

    /// Re-upload the table after the transfer function changed.
    pub fn upload(&self, queue: &wgpu::Queue, lut: &LookupTable) {
        let mut texels = [0_u8; LUT_SIZE * 4];
        for (texel, entry) in
            texels.chunks_exact_mut(4).zip(lut.entries().iter())
        {
            for (byte, channel) in texel.iter_mut().zip(entry.iter()) {
                *byte = (channel * 255.0).round() as u8;
            }
        }

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &texels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(LUT_SIZE as u32 * 4),
                rows_per_image: Some(1),
            },
            wgpu::Extent3d {
                width: LUT_SIZE as u32,
                height: 1,
                depth_or_array_layers: 1,
            },
        );
    }
}
