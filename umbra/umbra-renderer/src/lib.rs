//! Umbra renderer: two-pass shadow mapping. The depth pass renders the scene
//! from the orbiting light into an off-screen target; the lit pass renders
//! from the camera and samples that target with a PCF lookup.

pub mod config;
pub mod depth_pass;
pub mod importer;
pub mod lit_pass;
pub mod mesh;
pub mod resources;
pub mod scene;
pub mod texture;

pub use config::UmbraConfig;
pub use depth_pass::DepthPass;
pub use lit_pass::LitPass;
pub use mesh::{GpuMesh, MeshData};
pub use resources::ShadowTarget;
pub use scene::SceneState;

use render_api::{FrameStats, RenderError};

pub struct Renderer {
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: UmbraConfig,
    depth_pass: DepthPass,
    lit_pass: LitPass,
    shadow_target: Option<ShadowTarget>,
    scene_depth: Option<wgpu::Texture>,
}

impl Renderer {
    /// Compile both programs and build the pass pipelines. Validation
    /// failures here are fatal; nothing can render without programs. Both
    /// pipelines and their layouts are created exactly once, so per-frame
    /// encoding never re-queries pipeline state.
    pub async fn new(
        device: wgpu::Device,
        queue: wgpu::Queue,
        config: UmbraConfig,
    ) -> Result<Self, RenderError> {
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let depth_shader = DepthPass::compile(&device);
        let lit_shader = LitPass::compile(&device);
        if let Some(e) = device.pop_error_scope().await {
            return Err(RenderError::ShaderCompile {
                pass: "depth_map/shadow_lit".to_string(),
                message: e.to_string(),
            });
        }

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let depth_pass = DepthPass::new(&device, &depth_shader);
        let lit_pass = LitPass::new(&device, &lit_shader, config.output_format);
        if let Some(e) = device.pop_error_scope().await {
            return Err(RenderError::ShaderLink {
                pass: "depth/lit pipelines".to_string(),
                message: e.to_string(),
            });
        }

        Ok(Self {
            device,
            queue,
            config,
            depth_pass,
            lit_pass,
            shadow_target: None,
            scene_depth: None,
        })
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn config(&self) -> &UmbraConfig {
        &self.config
    }

    /// (Re)allocate the shadow target and the lit pass depth attachment for
    /// a new surface size. The shadow map stays 1:1 with the surface.
    pub fn ensure_targets(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        let existing = self.shadow_target.take();
        let target = ShadowTarget::ensure_size(&self.device, existing, width, height)?;
        debug_assert!(target.is_complete());
        self.shadow_target = Some(target);

        let stale = self
            .scene_depth
            .as_ref()
            .map(|t| t.width() != width || t.height() != height)
            .unwrap_or(true);
        if stale {
            self.scene_depth = Some(resources::create_scene_depth(&self.device, width, height));
        }
        Ok(())
    }

    pub fn shadow_target(&self) -> Option<&ShadowTarget> {
        self.shadow_target.as_ref()
    }

    /// Encode one frame into the given encoder: depth pass, then lit pass to
    /// `output_view`. An object whose asset failed to load is skipped in
    /// both passes; the frame still completes.
    pub fn encode_frame(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        output_view: &wgpu::TextureView,
        state: &SceneState,
        plane: Option<&GpuMesh>,
        model: Option<&GpuMesh>,
    ) -> Result<FrameStats, RenderError> {
        let shadow = self.shadow_target.as_ref().ok_or_else(|| {
            RenderError::Surface("draw_frame before surface_changed".to_string())
        })?;
        let scene_depth = self.scene_depth.as_ref().expect("allocated with target");
        let depth_view = scene_depth.create_view(&Default::default());

        let depth_draws = self.depth_pass.encode(
            encoder,
            &self.queue,
            shadow,
            plane,
            model,
            state.light_mvp_static,
            state.light_mvp_dynamic,
        );
        let lit_draws = self.lit_pass.encode(
            encoder,
            &self.device,
            &self.queue,
            output_view,
            &depth_view,
            (shadow.width(), shadow.height()),
            shadow,
            state,
            self.config.depth_texture_capability,
            plane,
            model,
        );
        Ok(FrameStats {
            depth_draws,
            lit_draws,
        })
    }

    /// Encode a whole frame into a fresh command buffer.
    pub fn render_frame(
        &self,
        output_view: &wgpu::TextureView,
        state: &SceneState,
        plane: Option<&GpuMesh>,
        model: Option<&GpuMesh>,
    ) -> Result<(wgpu::CommandBuffer, FrameStats), RenderError> {
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("umbra_frame"),
            });
        let stats = self.encode_frame(&mut encoder, output_view, state, plane, model)?;
        Ok((encoder.finish(), stats))
    }

    pub fn submit(&self, command_buffers: impl IntoIterator<Item = wgpu::CommandBuffer>) {
        self.queue.submit(command_buffers);
    }
}
