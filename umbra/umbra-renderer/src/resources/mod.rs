//! Shadow render target: the off-screen color + depth pair the depth pass
//! renders into and the lit pass samples. Resolution is locked 1:1 to the
//! display surface.

use render_api::RenderError;
use wgpu::TextureView;

pub const SHADOW_COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
pub const SHADOW_DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Off-screen shadow map target. The color texture holds packed depth
/// written by the depth pass; the depth texture is the pass's depth
/// attachment.
#[derive(Debug)]
pub struct ShadowTarget {
    pub color: wgpu::Texture,
    pub depth: wgpu::Texture,
    width: u32,
    height: u32,
}

impl ShadowTarget {
    /// (Re)allocate for the given surface size. Returns the existing target
    /// untouched when the size is unchanged; otherwise the previous GPU
    /// resources are dropped before the new ones are created. A target that
    /// cannot be made complete is a fatal error, not a degradation.
    pub fn ensure_size(
        device: &wgpu::Device,
        existing: Option<Self>,
        width: u32,
        height: u32,
    ) -> Result<Self, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::FramebufferIncomplete {
                reason: format!("zero-sized target {width}x{height}"),
            });
        }
        let max_dim = device.limits().max_texture_dimension_2d;
        if width > max_dim || height > max_dim {
            return Err(RenderError::FramebufferIncomplete {
                reason: format!("{width}x{height} exceeds device limit {max_dim}"),
            });
        }
        if let Some(t) = existing {
            if t.width == width && t.height == height {
                return Ok(t);
            }
        }
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let color = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("shadow_color"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: SHADOW_COLOR_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let depth = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("shadow_depth"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: SHADOW_DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        Ok(Self {
            color,
            depth,
            width,
            height,
        })
    }

    /// Both attachments exist at the recorded size.
    pub fn is_complete(&self) -> bool {
        self.color.width() == self.width
            && self.color.height() == self.height
            && self.depth.width() == self.width
            && self.depth.height() == self.height
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Texel step (1/width, 1/height) consumed by the PCF lookup.
    pub fn map_step(&self) -> (f32, f32) {
        (1.0 / self.width as f32, 1.0 / self.height as f32)
    }

    pub fn color_view(&self) -> TextureView {
        self.color.create_view(&Default::default())
    }

    pub fn depth_view(&self) -> TextureView {
        self.depth.create_view(&Default::default())
    }
}

/// Depth attachment for the lit pass, sized to the output surface.
pub fn create_scene_depth(device: &wgpu::Device, width: u32, height: u32) -> wgpu::Texture {
    device.create_texture(&wgpu::TextureDescriptor {
        label: Some("scene_depth"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: SHADOW_DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    })
}
