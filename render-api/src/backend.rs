//! Surface lifecycle traits. The host drives these in strict sequence on one
//! render thread: created, then changed on every resize, then a draw per
//! refresh.

use crate::assets::FrameStats;
use crate::error::RenderError;
use raw_window_handle::{RawDisplayHandle, RawWindowHandle};

/// Renderer driven by a host's surface callbacks, window or headless.
pub trait SurfaceRenderer: Send {
    /// Surface/context (re)acquired. Pipelines and assets already live from
    /// construction; this resets per-session state such as the animation
    /// clock.
    fn surface_created(&mut self) -> Result<(), RenderError>;

    /// Surface resized. Reallocates the shadow target to match; fatal if the
    /// target cannot be made complete.
    fn surface_changed(&mut self, width: u32, height: u32) -> Result<(), RenderError>;

    /// Render one frame to the internal offscreen target. Returns draw-call
    /// accounting for the frame.
    fn draw_frame(&mut self) -> Result<FrameStats, RenderError>;
}

/// Extension for renderers that can present to a window. The host passes raw
/// handles each frame (e.g. from winit); the renderer owns surface
/// configuration and present internally.
pub trait SurfaceRendererWindow: SurfaceRenderer + Send {
    fn draw_frame_to_window(
        &mut self,
        raw_window_handle: RawWindowHandle,
        raw_display_handle: RawDisplayHandle,
    ) -> Result<FrameStats, RenderError>;
}
