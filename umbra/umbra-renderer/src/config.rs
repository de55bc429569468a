//! Umbra configuration: output format and shadow lookup path.

/// Renderer and bridge configuration.
#[derive(Clone, Debug)]
pub struct UmbraConfig {
    /// Output texture format for the lit pass (e.g. Rgba8Unorm or Bgra8Unorm).
    pub output_format: wgpu::TextureFormat,
    /// When true, the light-space MVP handed to the lit pass is premultiplied
    /// by the fixed bias matrix so the fragment stage samples the shadow map
    /// directly; when false, the fragment stage remaps clip coordinates to
    /// texture space per fragment.
    pub depth_texture_capability: bool,
}

impl Default for UmbraConfig {
    fn default() -> Self {
        Self {
            output_format: wgpu::TextureFormat::Rgba8Unorm,
            depth_texture_capability: true,
        }
    }
}
