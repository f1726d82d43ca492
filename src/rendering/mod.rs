//! Rendering system: owns the wgpu surface and device, runs the scene pass
//! into the off-screen target and the post pass onto the screen.

mod capture;
mod post;
mod scene;
mod target;

use std::sync::Arc;

use winit::window::Window;

use crate::camera::OrbitCamera;
use crate::clock::FrameContext;
use crate::error::SketchError;
use crate::params::RecordingConfig;
use crate::sketch::Sketch;

pub use capture::FrameCapture;
pub use post::{scan_resolution, scanline_brightness, visibility, PostPass, PostUniforms};
pub use scene::{ScenePass, SceneUniforms};
pub use target::{OffscreenTarget, TargetSize, DEPTH_FORMAT};

/// Rendering system managing wgpu device, passes and targets
pub struct RenderSystem {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    camera: OrbitCamera,
    clear_color: wgpu::Color,
    target: OffscreenTarget,
    scene: ScenePass,
    /// `None` draws the scene straight to the screen
    post: Option<PostPass>,
    capture: Option<FrameCapture>,
}

impl RenderSystem {
    /// Bring up the GPU and upload every immutable buffer of `sketch`
    pub async fn new(
        window: Arc<Window>,
        sketch: &Sketch,
        recording: Option<RecordingConfig>,
    ) -> Result<Self, SketchError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // Window must have 'static lifetime via Arc
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(SketchError::NoAdapter)?;
        log::info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(SketchError::UnsupportedSurface)?;
        log::info!("Surface format: {:?}", surface_format);

        let mut usage = wgpu::TextureUsages::RENDER_ATTACHMENT;
        // Frame capture copies out of the presented texture
        if recording.is_some() {
            usage |= wgpu::TextureUsages::COPY_SRC;
        }

        let target_size = TargetSize::new(size.width, size.height);
        let config = wgpu::SurfaceConfiguration {
            usage,
            format: surface_format,
            width: target_size.width,
            height: target_size.height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let target = OffscreenTarget::new(&device, surface_format, target_size);
        let scene = ScenePass::new(&device, surface_format, sketch);
        let post = sketch.config.post.as_ref().map(|params| {
            PostPass::new(
                &device,
                surface_format,
                &target,
                params,
                sketch.post_waves.as_ref(),
            )
        });

        let [r, g, b, a] = sketch.config.render.clear_color;
        Ok(Self {
            surface,
            device,
            queue,
            config,
            camera: OrbitCamera::new(sketch.config.camera.clone()),
            clear_color: wgpu::Color { r, g, b, a },
            target,
            scene,
            post,
            capture: recording.map(FrameCapture::new),
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Reconfigure the surface; zero-sized requests are ignored
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Render one frame (and capture it when recording)
    pub fn render(&mut self, frame: &FrameContext) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        // Follow the presented texture so depth always matches it
        self.target.resize(
            &self.device,
            TargetSize::new(output.texture.width(), output.texture.height()),
        );
        self.scene.prepare(&self.queue, &self.camera, frame);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        match &mut self.post {
            Some(post) => {
                post.prepare(&self.device, &self.queue, &self.target, frame);
                self.scene.draw(
                    &mut encoder,
                    self.target.color_view(),
                    self.target.depth_view(),
                    self.clear_color,
                );
                post.draw(&mut encoder, &view, self.clear_color);
            }
            None => {
                self.scene.draw(
                    &mut encoder,
                    &view,
                    self.target.depth_view(),
                    self.clear_color,
                );
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));

        if let Some(capture) = &self.capture {
            if let Err(e) = capture.capture(&self.device, &self.queue, &output.texture, frame.tick) {
                log::error!("{}", e);
            }
        }

        output.present();
        Ok(())
    }
}
