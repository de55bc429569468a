//! Windowed shadow demo: ground plane plus imported cube, orbiting light,
//! drag with the left mouse button to rotate the cube.
//! Run from repo root: cargo run -p demo --bin shadow_scene

use std::sync::Arc;

use demo::{asset_dir, scene_sources, DirAssetSource, TOUCH_SCALE_FACTOR};
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use render_api::{RotationInput, SceneSources, SurfaceRenderer, SurfaceRendererWindow};
use umbra_bridge::UmbraWindowBackend;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::window::WindowId;

struct App {
    window: Option<winit::window::Window>,
    backend: Option<Box<dyn SurfaceRendererWindow>>,
    sources: SceneSources,
    assets: DirAssetSource,
    input: Arc<RotationInput>,
    dragging: bool,
    cursor: Option<(f64, f64)>,
}

impl App {
    fn new() -> Self {
        let dir = asset_dir();
        Self {
            window: None,
            backend: None,
            sources: scene_sources(&dir),
            assets: DirAssetSource::new(dir),
            input: Arc::new(RotationInput::new()),
            dragging: false,
            cursor: None,
        }
    }

    /// Lazily build the backend; adapter or shader failure is fatal for the
    /// session, matching the original "unsupported GL version" bail-out.
    fn ensure_backend(&mut self, event_loop: &ActiveEventLoop) -> bool {
        if self.backend.is_some() {
            return true;
        }
        let window = match &self.window {
            Some(w) => w,
            None => return false,
        };
        match UmbraWindowBackend::from_window(
            window,
            &self.sources,
            &self.assets,
            Arc::clone(&self.input),
        ) {
            Ok(mut backend) => {
                let size = window.inner_size();
                if let Err(e) = backend
                    .surface_created()
                    .and_then(|_| backend.surface_changed(size.width.max(1), size.height.max(1)))
                {
                    log::error!("surface setup failed: {e}");
                    event_loop.exit();
                    return false;
                }
                self.backend = Some(backend);
                true
            }
            Err(e) => {
                log::error!("renderer unavailable: {e}");
                event_loop.exit();
                false
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let attrs = winit::window::WindowAttributes::default()
            .with_title("Umbra Shadows")
            .with_inner_size(winit::dpi::LogicalSize::new(800, 600));
        let window = event_loop.create_window(attrs).expect("create window");
        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(physical) => {
                if let Some(backend) = &mut self.backend {
                    if let Err(e) =
                        backend.surface_changed(physical.width.max(1), physical.height.max(1))
                    {
                        log::error!("resize failed: {e}");
                        event_loop.exit();
                        return;
                    }
                }
                if let Some(w) = &self.window {
                    w.request_redraw();
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if button == MouseButton::Left {
                    self.dragging = state == ElementState::Pressed;
                    if !self.dragging {
                        self.cursor = None;
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let (x, y) = (position.x, position.y);
                if self.dragging {
                    if let Some((px, py)) = self.cursor {
                        self.input.add_delta(
                            (x - px) as f32 * TOUCH_SCALE_FACTOR,
                            (y - py) as f32 * TOUCH_SCALE_FACTOR,
                        );
                    }
                }
                self.cursor = Some((x, y));
            }
            WindowEvent::RedrawRequested => {
                if !self.ensure_backend(event_loop) {
                    return;
                }
                let window = self.window.as_ref().expect("backend implies window");
                let (raw_window, raw_display) =
                    match (window.window_handle(), window.display_handle()) {
                        (Ok(wh), Ok(dh)) => (wh.as_raw(), dh.as_raw()),
                        _ => return,
                    };
                window.pre_present_notify();
                if let Some(backend) = &mut self.backend {
                    if let Err(e) = backend.draw_frame_to_window(raw_window, raw_display) {
                        log::warn!("frame skipped: {e}");
                    }
                }
                // Continuous animation: the light orbit never stops.
                window.request_redraw();
            }
            _ => {}
        }
    }
}

fn main() {
    env_logger::init();
    let event_loop = winit::event_loop::EventLoop::new().expect("event loop");
    let mut app = App::new();
    event_loop.run_app(&mut app).expect("run app");
}
