//! The engine tying camera, transfer function, and GPU state together.

mod editor_ops;
mod input;

use std::path::PathBuf;

use glam::Vec2;

use crate::camera::CameraController;
use crate::error::VolrayError;
use crate::gpu::render_context::RenderContext;
use crate::options::Options;
use crate::renderer::RaymarchRenderer;
use crate::transfer::{EditorSession, TransferFunction};
use crate::volume::Volume;

/// The core rendering engine for interactive volume visualization.
///
/// Owns the GPU context, the ray-march renderer, the camera controller,
/// and the transfer-function model plus its editor session. Everything
/// runs single-threaded: input events mutate state between frames and the
/// next [`render`](Self::render) call observes the result.
///
/// # Frame loop
///
/// Each frame, call [`render`](Self::render) to draw and present. Call
/// [`resize`](Self::resize) when the window size changes. Input is
/// forwarded via [`handle_input`](Self::handle_input) and keyboard
/// actions via [`apply_key_action`](Self::apply_key_action).
pub struct VolumeRenderEngine {
    /// Core wgpu device, queue, and surface.
    pub context: RenderContext,
    /// Fly / look / arcball camera state.
    pub camera_controller: CameraController,
    /// Whether an overlay widget currently owns pointer input. While set,
    /// pointer events are not forwarded to the camera.
    pub gui_has_focus: bool,
    renderer: RaymarchRenderer,
    transfer: TransferFunction,
    editor: EditorSession,
    options: Options,
    /// Set whenever the control points change; the next frame re-uploads
    /// the lookup table before drawing.
    lut_dirty: bool,
}

impl VolumeRenderEngine {
    /// Build the engine for `volume`, drawing to `window`.
    ///
    /// `preset_dir` is where transfer-function presets are saved and
    /// browsed.
    ///
    /// # Errors
    ///
    /// Returns [`VolrayError`] if GPU initialization fails.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        size: (u32, u32),
        volume: &Volume,
        options: Options,
        preset_dir: PathBuf,
    ) -> Result<Self, VolrayError> {
        let context = RenderContext::new(window, size).await?;

        let transfer = TransferFunction::new();
        let renderer = RaymarchRenderer::new(
            &context,
            volume,
            &transfer.lookup_table(),
            &options.render,
        );

        let mut camera_controller = CameraController::new(
            &options.camera,
            Vec2::new(size.0 as f32, size.1 as f32),
        );
        camera_controller.set_model(renderer.model_matrix());

        let mut editor = EditorSession::new(preset_dir);
        editor.refresh_files();

        let mut engine = Self {
            context,
            camera_controller,
            gui_has_focus: false,
            renderer,
            transfer,
            editor,
            options,
            lut_dirty: false,
        };
        engine.upload_projection();
        Ok(engine)
    }

    /// Execute one frame: flush camera and transfer-function state to the
    /// GPU, draw the volume, and present.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] if the swapchain frame cannot be
    /// acquired.
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        if self.lut_dirty {
            self.renderer
                .upload_lut(&self.context.queue, &self.transfer.lookup_table());
            self.lut_dirty = false;
        }
        self.renderer.update_view(
            &self.context.queue,
            self.camera_controller.view_matrix(),
            self.camera_controller.eye(),
        );

        let frame = self.context.get_next_frame()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self.context.create_encoder();
        self.renderer.render(&mut encoder, &view);
        self.context.submit(encoder);

        frame.present();
        Ok(())
    }

    /// Resize the surface and the camera projection to match the new
    /// window size.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.context.resize(width, height);
            self.camera_controller
                .set_viewport(width as f32, height as f32);
            self.upload_projection();
        }
    }

    fn upload_projection(&mut self) {
        self.renderer.update_projection(
            &self.context.queue,
            self.camera_controller.camera().projection_matrix(),
        );
    }

    /// Current runtime options.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The transfer function currently driving the lookup table.
    #[must_use]
    pub fn transfer_function(&self) -> &TransferFunction {
        &self.transfer
    }

    /// The transfer-function editor session (selection, filename, browser).
    #[must_use]
    pub fn editor(&self) -> &EditorSession {
        &self.editor
    }

    /// Replace the filename the next preset save will use.
    pub fn set_preset_filename(&mut self, name: String) {
        self.editor.filename = name;
    }
}
