//! Headless smoke run: drive the surface lifecycle against an offscreen
//! target and print per-frame draw stats.
//! Run from repo root: cargo run -p demo --bin headless_frame

use std::sync::Arc;

use demo::{asset_dir, scene_sources, DirAssetSource};
use render_api::{RotationInput, SurfaceRenderer};
use umbra_bridge::UmbraPlugin;
use umbra_renderer::UmbraConfig;

fn main() {
    env_logger::init();
    let (device, queue) = pollster::block_on(async {
        let instance = wgpu::Instance::default();
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions::default())
            .await
            .expect("No adapter");
        adapter
            .request_device(&wgpu::DeviceDescriptor::default(), None)
            .await
            .expect("No device")
    });

    let dir = asset_dir();
    let sources = scene_sources(&dir);
    let assets = DirAssetSource::new(dir);
    let input = Arc::new(RotationInput::new());

    let mut plugin = UmbraPlugin::new(
        device,
        queue,
        UmbraConfig::default(),
        &sources,
        &assets,
        input,
    )
    .expect("plugin init");
    plugin.surface_created().expect("surface_created");
    plugin.surface_changed(800, 600).expect("surface_changed");
    for frame in 0..2 {
        let stats = plugin.draw_frame().expect("draw_frame");
        println!(
            "frame {frame}: {} depth draws, {} lit draws",
            stats.depth_draws, stats.lit_draws
        );
    }
    println!("Umbra headless_frame: OK");
}
