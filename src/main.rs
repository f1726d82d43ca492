//! Making Waves - a wireframe ocean rolling under a slow orbit camera,
//! optionally seen through a CRT scanline filter.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use making_waves::cli::Args;
use making_waves::clock::FrameClock;
use making_waves::mesh::save_mesh;
use making_waves::params::RecordingConfig;
use making_waves::rendering::RenderSystem;
use making_waves::sketch::{self, Sketch};

/// Main application state
struct App {
    sketch: Sketch,
    recording: Option<RecordingConfig>,
    clock: FrameClock,

    // Created on resume
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,
}

impl App {
    fn new(sketch: Sketch, recording: Option<RecordingConfig>) -> Self {
        let clock = match &recording {
            Some(config) => FrameClock::fixed_rate(config.fps),
            None => FrameClock::wall_clock(),
        };
        Self {
            sketch,
            recording,
            clock,
            window: None,
            render_system: None,
        }
    }

    /// Render a single frame
    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        let Some(render_system) = &mut self.render_system else {
            return;
        };

        let (width, height) = render_system.size();
        // The tick is only consumed once the frame made it to the screen
        let frame = self.clock.frame(width, height);

        match render_system.render(&frame) {
            Ok(()) => self.clock.advance(),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                render_system.resize(width, height);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory");
                event_loop.exit();
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }

        if let Some(config) = &self.recording {
            if self.clock.ticks() >= config.total_frames() {
                log::info!(
                    "Recording complete: {} frames in {}",
                    config.total_frames(),
                    config.frames_dir().display()
                );
                event_loop.exit();
            }
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        let render_config = &self.sketch.config.render;
        let window_attributes = Window::default_attributes()
            .with_title(render_config.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                render_config.window_width,
                render_config.window_height,
            ));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let render_system = match pollster::block_on(RenderSystem::new(
            Arc::clone(&window),
            &self.sketch,
            self.recording.clone(),
        )) {
            Ok(render_system) => render_system,
            Err(e) => {
                log::error!("{}", e);
                event_loop.exit();
                return;
            }
        };

        log::info!("Making Waves is running; press ESC to quit");
        self.window = Some(window);
        self.render_system = Some(render_system);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(physical_size) => {
                if let Some(render_system) = &mut self.render_system {
                    render_system.resize(physical_size.width, physical_size.height);
                }
            }
            WindowEvent::RedrawRequested => self.render_frame(event_loop),
            _ => {}
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();

    if let Some(path) = &args.bake_text {
        let params = args.bake_params();
        let outline = sketch::text_outline(&params);
        save_mesh(path, &outline)?;
        log::info!(
            "Baked {:?} to {}: {} positions, {} cells",
            params.text,
            path.display(),
            outline.positions.len(),
            outline.cells.len()
        );
        return Ok(());
    }

    let recording = args.recording_config();
    if let Some(config) = &recording {
        std::fs::create_dir_all(config.frames_dir()).with_context(|| {
            format!("failed to create {}", config.frames_dir().display())
        })?;
        log::info!(
            "Recording {} frames to {}",
            config.total_frames(),
            config.frames_dir().display()
        );
    }

    log::info!("Variant {:?}", args.variant);
    let sketch = Sketch::build(args.sketch_config(), args.seed(), &args.text_source())?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(sketch, recording);
    event_loop.run_app(&mut app)?;
    Ok(())
}
