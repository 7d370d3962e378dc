//! Ray-march pass: draws the volume bounding box and marches rays through
//! the 3D texture, compositing colors from the transfer-function LUT.
//!
//! This is the thin rendering collaborator the core state feeds: it
//! receives the LUT texels whenever the transfer function changes and the
//! camera matrices whenever the camera moves, and draws one cube per
//! frame.

use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use crate::gpu::render_context::RenderContext;
use crate::gpu::texture::{LutTexture, VolumeTexture};
use crate::options::RenderOptions;
use crate::transfer::LookupTable;
use crate::volume::Volume;

/// Uniform block shared by the ray-march vertex and fragment stages.
///
/// `extent_min`/`extent_max` are the world-space corners of the volume
/// box; rays are clipped against them and sampling coordinates derive
/// from them.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct RaymarchUniforms {
    model: [[f32; 4]; 4],
    view: [[f32; 4]; 4],
    proj: [[f32; 4]; 4],
    camera_pos: [f32; 3],
    step_size: f32,
    extent_min: [f32; 3],
    _pad0: f32,
    extent_max: [f32; 3],
    _pad1: f32,
}

/// Ray-march pass renderer.
pub struct RaymarchRenderer {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    uniform_buffer: wgpu::Buffer,
    vertex_buffer: wgpu::Buffer,
    vertex_count: u32,
    uniforms: RaymarchUniforms,
    model: Mat4,
    background: wgpu::Color,
    lut_texture: LutTexture,
    #[allow(dead_code)] // must stay alive to back the bind group views
    volume_texture: VolumeTexture,
}

impl RaymarchRenderer {
    /// Build the pipeline, upload the volume and initial LUT, and place
    /// the volume box centered on the origin.
    #[must_use]
    pub fn new(
        context: &RenderContext,
        volume: &Volume,
        lut: &LookupTable,
        options: &RenderOptions,
    ) -> Self {
        let extent = volume.extent();
        // Model coordinates span [0, x] x [0, y] x [-z, 0]; the model
        // matrix centers the box on the origin for arcball rotation.
        let model = Mat4::from_translation(Vec3::new(
            -extent.x / 2.0,
            -extent.y / 2.0,
            extent.z / 2.0,
        ));
        let world_min = Vec3::new(
            -extent.x / 2.0,
            -extent.y / 2.0,
            -extent.z / 2.0,
        );
        let world_max = -world_min;

        let uniforms = RaymarchUniforms {
            model: model.to_cols_array_2d(),
            view: Mat4::IDENTITY.to_cols_array_2d(),
            proj: Mat4::IDENTITY.to_cols_array_2d(),
            camera_pos: [0.0; 3],
            step_size: options.step_size,
            extent_min: world_min.to_array(),
            _pad0: 0.0,
            extent_max: world_max.to_array(),
            _pad1: 0.0,
        };

        let uniform_buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Raymarch Uniform Buffer"),
                contents: bytemuck::cast_slice(&[uniforms]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            },
        );

        let vertices = cube_vertices(extent);
        let vertex_buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Volume Box Vertex Buffer"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            },
        );

        let volume_texture = VolumeTexture::new(context, volume);
        let lut_texture = LutTexture::new(context, lut);

        let bind_group_layout = context.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Raymarch Bind Group Layout"),
                entries: &[
                    // binding 0: uniforms
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX
                            | wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    },
                    // binding 1: volume texture
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float {
                                filterable: true,
                            },
                            view_dimension: wgpu::TextureViewDimension::D3,
                            multisampled: false,
                        },
                        count: None,
                    },
                    // binding 2: volume sampler
                    wgpu::BindGroupLayoutEntry {
                        binding: 2,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(
                            wgpu::SamplerBindingType::Filtering,
                        ),
                        count: None,
                    },
                    // binding 3: LUT texture
                    wgpu::BindGroupLayoutEntry {
                        binding: 3,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float {
                                filterable: true,
                            },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    // binding 4: LUT sampler
                    wgpu::BindGroupLayoutEntry {
                        binding: 4,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(
                            wgpu::SamplerBindingType::Filtering,
                        ),
                        count: None,
                    },
                ],
            },
        );

        let bind_group = context.device.create_bind_group(
            &wgpu::BindGroupDescriptor {
                label: Some("Raymarch Bind Group"),
                layout: &bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: uniform_buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(
                            &volume_texture.view,
                        ),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::Sampler(
                            &volume_texture.sampler,
                        ),
                    },
                    wgpu::BindGroupEntry {
                        binding: 3,
                        resource: wgpu::BindingResource::TextureView(
                            &lut_texture.view,
                        ),
                    },
                    wgpu::BindGroupEntry {
                        binding: 4,
                        resource: wgpu::BindingResource::Sampler(
                            &lut_texture.sampler,
                        ),
                    },
                ],
            },
        );

        let shader = context.device.create_shader_module(
            wgpu::include_wgsl!("../assets/shaders/raymarch.wgsl"),
        );

        let pipeline_layout = context.device.create_pipeline_layout(
            &wgpu::PipelineLayoutDescriptor {
                label: Some("Raymarch Pipeline Layout"),
                bind_group_layouts: &[&bind_group_layout],
                immediate_size: 0,
            },
        );

        let pipeline = context.device.create_render_pipeline(
            &wgpu::RenderPipelineDescriptor {
                label: Some("Raymarch Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[wgpu::VertexBufferLayout {
                        array_stride: 12,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![0 => Float32x3],
                    }],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: context.config.format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState::default(),
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            },
        );

        let [r, g, b, a] = options.background;
        Self {
            pipeline,
            bind_group,
            uniform_buffer,
            vertex_buffer,
            vertex_count: vertices.len() as u32,
            uniforms,
            model,
            background: wgpu::Color {
                r: f64::from(r),
                g: f64::from(g),
                b: f64::from(b),
                a: f64::from(a),
            },
            lut_texture,
            volume_texture,
        }
    }

    /// The model matrix placing the volume box in world space.
    #[must_use]
    pub fn model_matrix(&self) -> Mat4 {
        self.model
    }

    /// Push a new view matrix and eye position to the GPU.
    pub fn update_view(&mut self, queue: &wgpu::Queue, view: Mat4, eye: Vec3) {
        self.uniforms.view = view.to_cols_array_2d();
        self.uniforms.camera_pos = eye.to_array();
        self.write_uniforms(queue);
    }

    /// Push a new projection matrix to the GPU.
    pub fn update_projection(&mut self, queue: &wgpu::Queue, proj: Mat4) {
        self.uniforms.proj = proj.to_cols_array_2d();
        self.write_uniforms(queue);
    }

    /// Re-upload the transfer-function LUT after it changed.
    pub fn upload_lut(&self, queue: &wgpu::Queue, lut: &LookupTable) {
        self.lut_texture.upload(queue, lut);
    }

    fn write_uniforms(&self, queue: &wgpu::Queue) {
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::cast_slice(&[self.uniforms]),
        );
    }

    /// Draw the volume into `target_view`, clearing to the background
    /// color first.
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target_view: &wgpu::TextureView,
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Raymarch Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.background),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            ..Default::default()
        });

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.draw(0..self.vertex_count, 0..1);
    }
}

/// Expand the volume bounding box into a triangle list.
///
/// Model coordinates follow the volume's voxel space: x and y grow from 0,
/// z grows negative into the screen.
fn cube_vertices(extent: Vec3) -> Vec<[f32; 3]> {
    let (x, y, z) = (extent.x, extent.y, extent.z);
    let corners: [[f32; 3]; 8] = [
        [x, y, -z],
        [0.0, y, -z],
        [0.0, 0.0, -z],
        [x, 0.0, -z],
        [x, y, 0.0],
        [0.0, y, 0.0],
        [0.0, 0.0, 0.0],
        [x, 0.0, 0.0],
    ];
    #[rustfmt::skip]
    let indices: [usize; 36] = [
        0, 1, 2, 0, 2, 3, // back
        4, 7, 5, 5, 7, 6, // front
        1, 6, 2, 1, 5, 6, // left
        0, 3, 4, 4, 7, 3, // right
        0, 4, 1, 4, 5, 1, // top
        2, 6, 3, 3, 6, 7, // bottom
    ];
    indices.iter().map(|&i| corners[i]).collect()
}
