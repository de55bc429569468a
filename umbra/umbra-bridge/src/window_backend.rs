//! Window-capable backend: created from a window, implements
//! SurfaceRendererWindow. The surface is recreated each frame (wgpu::Surface
//! lifetime tied to the window; avoids transmute and platform staleness when
//! the window is dragged or resized).

use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use render_api::{
    AssetSource, FrameStats, RenderError, RotationInput, SceneSources, SurfaceRenderer,
    SurfaceRendererWindow,
};
use std::sync::Arc;
use umbra_renderer::{Renderer, UmbraConfig};
use wgpu::SurfaceTargetUnsafe;

use crate::plugin::UmbraPlugin;

/// Backend that owns the wgpu instance and the plugin; can present to a
/// window. The host keeps the window alive and passes its raw handles to
/// `draw_frame_to_window` each frame.
pub struct UmbraWindowBackend {
    instance: wgpu::Instance,
    plugin: UmbraPlugin,
}

impl UmbraWindowBackend {
    /// Create from a winit-style window: adapter selection against an
    /// initial surface, device acquisition, program compilation (fatal) and
    /// asset import (non-fatal).
    pub fn from_window(
        window: &(impl HasWindowHandle + HasDisplayHandle),
        sources: &SceneSources,
        assets: &dyn AssetSource,
        input: Arc<RotationInput>,
    ) -> Result<Box<dyn SurfaceRendererWindow>, RenderError> {
        let (raw_window, raw_display) = {
            let wh = window
                .window_handle()
                .map_err(|e| RenderError::Surface(e.to_string()))?;
            let dh = window
                .display_handle()
                .map_err(|e| RenderError::Surface(e.to_string()))?;
            (wh.as_raw(), dh.as_raw())
        };
        let backend = pollster::block_on(Self::from_raw_handles_async(
            raw_window,
            raw_display,
            sources,
            assets,
            input,
        ))?;
        Ok(Box::new(backend))
    }

    async fn from_raw_handles_async(
        raw_window_handle: raw_window_handle::RawWindowHandle,
        raw_display_handle: raw_window_handle::RawDisplayHandle,
        sources: &SceneSources,
        assets: &dyn AssetSource,
        input: Arc<RotationInput>,
    ) -> Result<Self, RenderError> {
        let instance = wgpu::Instance::default();
        let target = SurfaceTargetUnsafe::RawHandle {
            raw_window_handle,
            raw_display_handle,
        };
        let surface = unsafe {
            instance
                .create_surface_unsafe(target)
                .map_err(|e| RenderError::Surface(e.to_string()))?
        };
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RenderError::AdapterUnavailable)?;
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor::default(), None)
            .await
            .map_err(|_| RenderError::AdapterUnavailable)?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .first()
            .copied()
            .unwrap_or(wgpu::TextureFormat::Rgba8Unorm);
        let config = UmbraConfig {
            output_format: format,
            ..UmbraConfig::default()
        };
        let renderer = Renderer::new(device, queue, config).await?;
        let plugin = UmbraPlugin::with_renderer(renderer, sources, assets, input);
        drop(surface);
        Ok(Self { instance, plugin })
    }

    fn surface_config(
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> wgpu::SurfaceConfiguration {
        wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: wgpu::CompositeAlphaMode::Opaque,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        }
    }
}

impl SurfaceRenderer for UmbraWindowBackend {
    fn surface_created(&mut self) -> Result<(), RenderError> {
        self.plugin.surface_created()
    }

    fn surface_changed(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        self.plugin.surface_changed(width, height)
    }

    fn draw_frame(&mut self) -> Result<FrameStats, RenderError> {
        self.plugin.draw_frame()
    }
}

impl SurfaceRendererWindow for UmbraWindowBackend {
    fn draw_frame_to_window(
        &mut self,
        raw_window_handle: raw_window_handle::RawWindowHandle,
        raw_display_handle: raw_window_handle::RawDisplayHandle,
    ) -> Result<FrameStats, RenderError> {
        let (width, height) = self.plugin.surface_size().ok_or_else(|| {
            RenderError::Surface("draw_frame_to_window before surface_changed".to_string())
        })?;
        let target = SurfaceTargetUnsafe::RawHandle {
            raw_window_handle,
            raw_display_handle,
        };
        let surface = unsafe {
            self.instance
                .create_surface_unsafe(target)
                .map_err(|e| RenderError::Surface(e.to_string()))?
        };
        let format = self.plugin.renderer().config().output_format;
        let config = Self::surface_config(format, width.max(1), height.max(1));
        surface.configure(self.plugin.device(), &config);

        let frame = match surface.get_current_texture() {
            Ok(f) => f,
            Err(wgpu::SurfaceError::Outdated) | Err(wgpu::SurfaceError::Lost) => {
                surface.configure(self.plugin.device(), &config);
                surface
                    .get_current_texture()
                    .map_err(|e| RenderError::Surface(e.to_string()))?
            }
            Err(e) => return Err(RenderError::Surface(e.to_string())),
        };
        let view = frame.texture.create_view(&Default::default());
        let stats = self.plugin.draw_frame_impl(Some(&view))?;
        frame.present();
        Ok(stats)
    }
}
