//! Umbra bridge: implements render_api's surface lifecycle using
//! umbra-renderer.

mod plugin;
mod window_backend;

pub use plugin::UmbraPlugin;
pub use window_backend::UmbraWindowBackend;
