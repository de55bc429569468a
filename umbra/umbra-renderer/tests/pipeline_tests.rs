//! GPU-backed tests: shadow target allocation and the two-pass frame.
//! Each test skips itself when no adapter is available.

use std::io::Cursor;

use render_api::{RenderError, TextureData};
use umbra_renderer::importer::parse_model;
use umbra_renderer::{GpuMesh, MeshData, Renderer, SceneState, ShadowTarget, UmbraConfig};

const CUBE_OBJ: &str = include_str!("../../../demo/assets/cube.obj");

fn test_device() -> Option<(wgpu::Device, wgpu::Queue)> {
    let instance = wgpu::Instance::default();
    let adapter =
        pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions::default()))?;
    pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor::default(), None)).ok()
}

macro_rules! device_or_skip {
    () => {
        match test_device() {
            Some(pair) => pair,
            None => {
                eprintln!("skipping: no gpu adapter");
                return;
            }
        }
    };
}

#[test]
fn zero_sized_target_is_incomplete() {
    let (device, _queue) = device_or_skip!();
    let err = ShadowTarget::ensure_size(&device, None, 0, 600).unwrap_err();
    assert!(matches!(err, RenderError::FramebufferIncomplete { .. }));
    assert!(err.is_fatal());
}

#[test]
fn ensure_size_is_idempotent() {
    let (device, _queue) = device_or_skip!();
    let target = ShadowTarget::ensure_size(&device, None, 800, 600).expect("first allocation");
    assert!(target.is_complete());
    let target = ShadowTarget::ensure_size(&device, Some(target), 800, 600).expect("same size");
    assert!(target.is_complete());
    assert_eq!((target.width(), target.height()), (800, 600));
    let step = target.map_step();
    assert!((step.0 - 1.0 / 800.0).abs() < f32::EPSILON);
    assert!((step.1 - 1.0 / 600.0).abs() < f32::EPSILON);
}

#[test]
fn resize_reallocates() {
    let (device, _queue) = device_or_skip!();
    let target = ShadowTarget::ensure_size(&device, None, 800, 600).expect("first");
    let target = ShadowTarget::ensure_size(&device, Some(target), 400, 300).expect("resize");
    assert!(target.is_complete());
    assert_eq!((target.width(), target.height()), (400, 300));
}

#[test]
fn pipelines_pass_validation() {
    let (device, queue) = device_or_skip!();
    pollster::block_on(Renderer::new(device, queue, UmbraConfig::default()))
        .expect("both programs compile and link");
}

#[test]
fn draw_before_surface_change_is_an_error() {
    let (device, queue) = device_or_skip!();
    let renderer = pollster::block_on(Renderer::new(device, queue, UmbraConfig::default()))
        .expect("renderer");
    let output = make_output(renderer.device(), 64, 64);
    let view = output.create_view(&Default::default());
    let state = SceneState::compute(0, (0.0, 0.0), 1.0);
    let err = renderer
        .render_frame(&view, &state, None, None)
        .unwrap_err();
    assert!(matches!(err, RenderError::Surface(_)));
}

#[test]
fn frame_draws_both_objects_in_both_passes() {
    let (device, queue) = device_or_skip!();
    let mut renderer = pollster::block_on(Renderer::new(device, queue, UmbraConfig::default()))
        .expect("renderer");
    renderer.ensure_targets(800, 600).expect("targets");

    let texture = TextureData::solid([255, 255, 255, 255]);
    let plane = GpuMesh::upload(
        renderer.device(),
        renderer.queue(),
        &MeshData::ground_plane(),
        &texture,
        "plane",
    );
    let cube_data = parse_model("cube.obj", Cursor::new(CUBE_OBJ.as_bytes().to_vec()))
        .expect("cube parses");
    let cube = GpuMesh::upload(
        renderer.device(),
        renderer.queue(),
        &cube_data,
        &texture,
        "cube",
    );

    let output = make_output(renderer.device(), 800, 600);
    let view = output.create_view(&Default::default());
    for frame in 0..2u64 {
        let state = SceneState::compute(frame * 16, (15.0, 5.0), 800.0 / 600.0);
        let (cmd, stats) = renderer
            .render_frame(&view, &state, Some(&plane), Some(&cube))
            .expect("frame encodes");
        renderer.submit([cmd]);
        assert_eq!(stats.depth_draws, 2, "frame {frame}");
        assert_eq!(stats.lit_draws, 2, "frame {frame}");
    }
    let _ = renderer.device().poll(wgpu::Maintain::Wait);
    assert!(renderer.shadow_target().expect("target").is_complete());
}

#[test]
fn missing_object_is_skipped_not_fatal() {
    let (device, queue) = device_or_skip!();
    let mut renderer = pollster::block_on(Renderer::new(device, queue, UmbraConfig::default()))
        .expect("renderer");
    renderer.ensure_targets(320, 240).expect("targets");
    let texture = TextureData::solid([128, 128, 128, 255]);
    let plane = GpuMesh::upload(
        renderer.device(),
        renderer.queue(),
        &MeshData::ground_plane(),
        &texture,
        "plane",
    );
    let output = make_output(renderer.device(), 320, 240);
    let view = output.create_view(&Default::default());
    let state = SceneState::compute(100, (0.0, 0.0), 320.0 / 240.0);
    let (cmd, stats) = renderer
        .render_frame(&view, &state, Some(&plane), None)
        .expect("partial scene still renders");
    renderer.submit([cmd]);
    assert_eq!(stats.depth_draws, 1);
    assert_eq!(stats.lit_draws, 1);
}

fn make_output(device: &wgpu::Device, width: u32, height: u32) -> wgpu::Texture {
    device.create_texture(&wgpu::TextureDescriptor {
        label: Some("test_output"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8Unorm,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    })
}
