//! Umbra plugin: SurfaceRenderer lifecycle over the renderer. Owns the scene
//! objects, the animation clock and the shared rotation input.

use std::sync::Arc;
use std::time::Instant;

use render_api::{
    AssetSource, FrameStats, RenderError, RotationInput, SceneSources, SurfaceRenderer,
    TextureData,
};
use umbra_renderer::{importer, GpuMesh, MeshData, Renderer, SceneState, UmbraConfig};

/// Implements the surface lifecycle: construction compiles the programs and
/// loads the scene (the fatal and non-fatal halves of initialization),
/// `surface_changed` reallocates the shadow target, `draw_frame` runs the
/// two-pass sequence.
pub struct UmbraPlugin {
    renderer: Renderer,
    plane: Option<GpuMesh>,
    model: Option<GpuMesh>,
    input: Arc<RotationInput>,
    started: Instant,
    surface_size: Option<(u32, u32)>,
    offscreen: Option<wgpu::Texture>,
}

impl UmbraPlugin {
    /// Create with a wgpu device and queue, blocking on pipeline validation.
    pub fn new(
        device: wgpu::Device,
        queue: wgpu::Queue,
        config: UmbraConfig,
        sources: &SceneSources,
        assets: &dyn AssetSource,
        input: Arc<RotationInput>,
    ) -> Result<Self, RenderError> {
        let renderer = pollster::block_on(Renderer::new(device, queue, config))?;
        Ok(Self::with_renderer(renderer, sources, assets, input))
    }

    /// Create around an already-built renderer (async hosts). Asset failures
    /// are recovered here: the affected object is logged and left out.
    pub fn with_renderer(
        renderer: Renderer,
        sources: &SceneSources,
        assets: &dyn AssetSource,
        input: Arc<RotationInput>,
    ) -> Self {
        let plane = Self::build_object(
            &renderer,
            "plane",
            Ok(MeshData::ground_plane()),
            sources.plane_texture.as_ref(),
        );
        let model = Self::build_object(
            &renderer,
            &sources.model_asset,
            importer::import_model(assets, &sources.model_asset),
            sources.model_texture.as_ref(),
        );
        Self {
            renderer,
            plane,
            model,
            input,
            started: Instant::now(),
            surface_size: None,
            offscreen: None,
        }
    }

    fn build_object(
        renderer: &Renderer,
        name: &str,
        data: Result<MeshData, RenderError>,
        texture: Option<&TextureData>,
    ) -> Option<GpuMesh> {
        let data = match data {
            Ok(data) => data,
            Err(e) => {
                log::warn!("{name}: {e}; object left out of the scene");
                return None;
            }
        };
        let Some(texture) = texture else {
            log::warn!("{name}: texture unavailable; object left out of the scene");
            return None;
        };
        Some(GpuMesh::upload(
            renderer.device(),
            renderer.queue(),
            &data,
            texture,
            name,
        ))
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn device(&self) -> &wgpu::Device {
        self.renderer.device()
    }

    pub fn queue(&self) -> &wgpu::Queue {
        self.renderer.queue()
    }

    pub fn surface_size(&self) -> Option<(u32, u32)> {
        self.surface_size
    }

    /// The dynamic mesh imported successfully and will be drawn.
    pub fn model_present(&self) -> bool {
        self.model.is_some()
    }

    pub fn plane_present(&self) -> bool {
        self.plane.is_some()
    }

    fn scene_state(&self, width: u32, height: u32) -> SceneState {
        let aspect = width as f32 / height.max(1) as f32;
        SceneState::compute(
            self.started.elapsed().as_millis() as u64,
            self.input.angles(),
            aspect,
        )
    }

    /// Render a frame to `output`, or to the internal offscreen target when
    /// headless.
    pub(crate) fn draw_frame_impl(
        &mut self,
        output: Option<&wgpu::TextureView>,
    ) -> Result<FrameStats, RenderError> {
        let (width, height) = self.surface_size.ok_or_else(|| {
            RenderError::Surface("draw_frame before surface_changed".to_string())
        })?;
        let state = self.scene_state(width, height);

        let offscreen_view;
        let view = match output {
            Some(view) => view,
            None => {
                offscreen_view = self.ensure_offscreen(width, height);
                &offscreen_view
            }
        };
        let (cmd, stats) =
            self.renderer
                .render_frame(view, &state, self.plane.as_ref(), self.model.as_ref())?;
        self.renderer.submit([cmd]);
        Ok(stats)
    }

    fn ensure_offscreen(&mut self, width: u32, height: u32) -> wgpu::TextureView {
        let stale = self
            .offscreen
            .as_ref()
            .map(|t| t.width() != width || t.height() != height)
            .unwrap_or(true);
        if stale {
            self.offscreen = Some(self.device().create_texture(&wgpu::TextureDescriptor {
                label: Some("umbra_offscreen"),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: self.renderer.config().output_format,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
                view_formats: &[],
            }));
        }
        self.offscreen
            .as_ref()
            .expect("just created")
            .create_view(&Default::default())
    }
}

impl SurfaceRenderer for UmbraPlugin {
    fn surface_created(&mut self) -> Result<(), RenderError> {
        // Pipelines and assets live from construction; a fresh surface only
        // restarts the animation clock.
        self.started = Instant::now();
        Ok(())
    }

    fn surface_changed(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        self.renderer.ensure_targets(width, height)?;
        self.surface_size = Some((width, height));
        Ok(())
    }

    fn draw_frame(&mut self) -> Result<FrameStats, RenderError> {
        self.draw_frame_impl(None)
    }
}
