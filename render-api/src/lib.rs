//! Shared render API for the Umbra shadow demo.
//! Defines the surface lifecycle traits, the cross-thread rotation input cell
//! and the asset intake types so hosts and the renderer agree on one contract.

mod assets;
mod backend;
mod error;
mod input;

pub use assets::{AssetSource, FrameStats, SceneSources, TextureData};
pub use backend::{SurfaceRenderer, SurfaceRendererWindow};
pub use error::RenderError;
pub use input::RotationInput;
pub use raw_window_handle::{RawDisplayHandle, RawWindowHandle};
