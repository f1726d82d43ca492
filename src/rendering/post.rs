//! Post pass: pixelation + scanline filter from the off-screen target to the
//! screen, optionally blended with the raw scene.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use super::target::OffscreenTarget;
use crate::clock::FrameContext;
use crate::params::PostParams;
use crate::waves::{WaveField, WaveUniforms};

/// Uniforms for `post_scanline.wgsl`
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct PostUniforms {
    pub scanres: [f32; 2],
    pub time: f32,
    pub blend_enabled: u32,
    pub fade_frequency: f32,
    pub _padding: [f32; 3],
    pub waves: WaveUniforms,
}

impl PostUniforms {
    pub fn new(params: &PostParams, waves: Option<&WaveField>, frame: &FrameContext) -> Self {
        let blend = params.blend.as_ref().zip(waves);
        Self {
            scanres: scan_resolution(
                frame.viewport_width,
                frame.viewport_height,
                params.pixel_size,
            )
            .to_array(),
            time: frame.time_s,
            blend_enabled: blend.is_some() as u32,
            fade_frequency: blend.map_or(0.0, |(b, _)| b.fade_frequency),
            _padding: [0.0; 3],
            waves: blend.map_or_else(|| WaveField::flat().uniforms(), |(_, w)| w.uniforms()),
        }
    }
}

/// Fake pixels across and down a viewport
pub fn scan_resolution(width: u32, height: u32, pixel_size: f32) -> Vec2 {
    Vec2::new(width.max(1) as f32, height.max(1) as f32) / pixel_size.max(1.0)
}

/// Brightness of a point inside one fake pixel, from its in-pixel fractions
/// (`fy` runs bottom to top).
pub fn scanline_brightness(fx: f32, fy: f32) -> f32 {
    let in_column = fx > 0.0 && fx < 0.8;
    let in_row = fy > 0.0 && fy < 0.8;
    match (in_column, in_row) {
        (true, true) if fy > 0.4 => 1.0,
        (true, true) => 0.7,
        (false, true) => 0.5,
        _ => 0.3,
    }
}

/// Texture coordinates for a screen UV; texture rows run top to bottom
pub fn texture_uv(uv: Vec2) -> Vec2 {
    Vec2::new(uv.x, 1.0 - uv.y)
}

/// The nine texture coordinates averaged for one fake pixel.
///
/// `uv` snaps to the lower-left corner of its fake pixel, then samples sit at
/// `(i, j) / (2 · scanres)` for `i, j` in -1..=1, `i` outermost.
pub fn supersample_uvs(uv: Vec2, scanres: Vec2) -> [Vec2; 9] {
    let binned = (uv * scanres).floor() / scanres;
    let half = 0.5 / scanres;
    let mut uvs = [Vec2::ZERO; 9];
    for (k, slot) in uvs.iter_mut().enumerate() {
        let step = Vec2::new((k / 3) as f32 - 1.0, (k % 3) as f32 - 1.0);
        *slot = texture_uv(binned + step * half);
    }
    uvs
}

/// How much of the filtered image shows at `uv` and `time`, in [0, 1]
pub fn visibility(field: &WaveField, uv: Vec2, time: f32, fade_frequency: f32) -> f32 {
    let local = (0.5 + field.sample(uv.x, uv.y, time)).clamp(0.0, 1.0);
    let fade = 0.5 - 0.5 * (fade_frequency * time).cos();
    local * fade
}

pub struct PostPass {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    /// Target generation `bind_group` points at
    bound_generation: u64,
    params: PostParams,
    waves: Option<WaveField>,
}

impl PostPass {
    pub fn new(
        device: &wgpu::Device,
        output_format: wgpu::TextureFormat,
        target: &OffscreenTarget,
        params: &PostParams,
        waves: Option<&WaveField>,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Post Scanline Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("post_scanline.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Post Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Post Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Post Uniform Buffer"),
            size: std::mem::size_of::<PostUniforms>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Post Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Post Scanline Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: output_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let bind_group =
            Self::create_bind_group(device, &bind_group_layout, &sampler, &uniform_buffer, target);

        Self {
            pipeline,
            bind_group_layout,
            sampler,
            uniform_buffer,
            bind_group,
            bound_generation: target.generation(),
            params: params.clone(),
            waves: waves.copied(),
        }
    }

    fn create_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        uniform_buffer: &wgpu::Buffer,
        target: &OffscreenTarget,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Post Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(target.color_view()),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: uniform_buffer.as_entire_binding(),
                },
            ],
        })
    }

    /// Rebind a reallocated target and upload this frame's uniforms
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target: &OffscreenTarget,
        frame: &FrameContext,
    ) {
        if target.generation() != self.bound_generation {
            self.bind_group = Self::create_bind_group(
                device,
                &self.bind_group_layout,
                &self.sampler,
                &self.uniform_buffer,
                target,
            );
            self.bound_generation = target.generation();
        }
        let uniforms = PostUniforms::new(&self.params, self.waves.as_ref(), frame);
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
    }

    /// Draw the full-screen triangle into `view`
    pub fn draw(&self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView, clear: wgpu::Color) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Post Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.draw(0..3, 0..1); // Fullscreen triangle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::PostBlendParams;
    use crate::waves::WaveDescriptor;

    const EPS: f32 = 1e-6;

    fn frame(width: u32, height: u32, time_s: f32) -> FrameContext {
        FrameContext {
            viewport_width: width,
            viewport_height: height,
            tick: 0,
            time_s,
        }
    }

    #[test]
    fn test_shader_validates() {
        let module = naga::front::wgsl::parse_str(include_str!("post_scanline.wgsl")).unwrap();
        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        )
        .validate(&module)
        .unwrap();

        let mut layouter = naga::proc::Layouter::default();
        layouter.update(module.to_ctx()).unwrap();
        let (handle, _) = module
            .types
            .iter()
            .find(|(_, ty)| ty.name.as_deref() == Some("PostUniforms"))
            .unwrap();
        assert_eq!(
            layouter[handle].size as usize,
            std::mem::size_of::<PostUniforms>()
        );
    }

    #[test]
    fn test_scanline_pattern() {
        // Lit cell: bright top half, dimmer bottom half
        assert_eq!(scanline_brightness(0.5, 0.6), 1.0);
        assert_eq!(scanline_brightness(0.5, 0.2), 0.7);
        // Gap between rows
        assert_eq!(scanline_brightness(0.5, 0.9), 0.3);
        // Gap between columns
        assert_eq!(scanline_brightness(0.9, 0.5), 0.5);
        // Corner where both gaps meet
        assert_eq!(scanline_brightness(0.9, 0.9), 0.3);
        // Cell edges are gaps
        assert_eq!(scanline_brightness(0.0, 0.5), 0.5);
        assert_eq!(scanline_brightness(0.5, 0.0), 0.3);
    }

    fn assert_close(a: Vec2, b: Vec2) {
        assert!(a.abs_diff_eq(b, 1e-6), "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_supersample_offsets() {
        let scanres = Vec2::new(64.0, 32.0);
        let uvs = supersample_uvs(Vec2::new(0.26, 0.26), scanres);

        // Center sample is the fake pixel's corner, flipped into texture rows
        assert_close(uvs[4], Vec2::new(0.25, 0.75));
        // Half a fake pixel either way
        assert_close(uvs[0], Vec2::new(0.25 - 1.0 / 128.0, 0.75 + 1.0 / 64.0));
        assert_close(uvs[8], Vec2::new(0.25 + 1.0 / 128.0, 0.75 - 1.0 / 64.0));
        assert_close(uvs[2], Vec2::new(0.25 - 1.0 / 128.0, 0.75 - 1.0 / 64.0));
        assert_close(uvs[6], Vec2::new(0.25 + 1.0 / 128.0, 0.75 + 1.0 / 64.0));

        // The samples span exactly one fake pixel
        let (min, max) = uvs
            .iter()
            .fold((Vec2::splat(f32::MAX), Vec2::splat(f32::MIN)), |(lo, hi), uv| {
                (lo.min(*uv), hi.max(*uv))
            });
        assert_close(max - min, 1.0 / scanres);
    }

    #[test]
    fn test_supersample_bins() {
        let scanres = Vec2::new(64.0, 32.0);
        // Anywhere inside one fake pixel reads the same samples
        let corner = supersample_uvs(Vec2::new(0.25, 0.25), scanres);
        let inside = supersample_uvs(Vec2::new(0.265, 0.28), scanres);
        for (a, b) in corner.iter().zip(inside.iter()) {
            assert_close(*a, *b);
        }
        // The next fake pixel over moves by a whole pixel
        let right = supersample_uvs(Vec2::new(17.0 / 64.0, 0.25), scanres);
        assert_close(right[4] - corner[4], Vec2::new(1.0 / 64.0, 0.0));
        let up = supersample_uvs(Vec2::new(0.25, 9.0 / 32.0), scanres);
        assert_close(up[4] - corner[4], Vec2::new(0.0, -1.0 / 32.0));
    }

    #[test]
    fn test_texture_uv_flips_rows() {
        assert_close(texture_uv(Vec2::new(0.2, 0.0)), Vec2::new(0.2, 1.0));
        assert_close(texture_uv(Vec2::new(0.2, 1.0)), Vec2::new(0.2, 0.0));
        // Top of the screen reads the first texture row
        let top = supersample_uvs(Vec2::new(0.5, 0.999), Vec2::new(64.0, 32.0));
        assert!(top[4].y < 1.0 / 32.0 + 1e-6);
    }

    #[test]
    fn test_scan_resolution() {
        let res = scan_resolution(1280, 720, 5.0);
        assert_eq!(res, Vec2::new(256.0, 144.0));
        assert!(scan_resolution(0, 0, 5.0).is_finite());
    }

    #[test]
    fn test_visibility_flat_field_follows_fade() {
        let field = WaveField::flat();
        // cos(0) = 1: fully faded out at t = 0
        assert!(visibility(&field, Vec2::splat(0.3), 0.0, 0.25).abs() < EPS);
        // Half period: fade = 1, flat field gives 0.5
        let t = std::f32::consts::PI / 0.25;
        assert!((visibility(&field, Vec2::splat(0.3), t, 0.25) - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_visibility_is_clamped() {
        let mut field = WaveField::flat();
        field.primary.waves[0].descriptor = WaveDescriptor::new(5.0, 0.0, 0.0, 0.0);
        let t = std::f32::consts::PI;
        assert!((visibility(&field, Vec2::ZERO, t, 1.0) - 1.0).abs() < 1e-5);

        field.primary.waves[0].descriptor = WaveDescriptor::new(-5.0, 0.0, 0.0, 0.0);
        assert_eq!(visibility(&field, Vec2::ZERO, t, 1.0), 0.0);
    }

    #[test]
    fn test_uniforms_without_blend() {
        let uniforms = PostUniforms::new(&PostParams::default(), None, &frame(640, 480, 2.0));
        assert_eq!(uniforms.blend_enabled, 0);
        assert_eq!(uniforms.scanres, [128.0, 96.0]);
        assert_eq!(uniforms.time, 2.0);
    }

    #[test]
    fn test_uniforms_with_blend() {
        let params = PostParams {
            blend: Some(PostBlendParams::default()),
            ..PostParams::default()
        };
        let mut field = WaveField::flat();
        field.secondary.waves[2].descriptor = WaveDescriptor::new(0.1, 2.0, 0.3, 0.4);
        let uniforms = PostUniforms::new(&params, Some(&field), &frame(100, 100, 0.0));
        assert_eq!(uniforms.blend_enabled, 1);
        assert_eq!(uniforms.fade_frequency, 0.25);
        assert_eq!(uniforms.waves.secondary_waves[2], [0.1, 2.0, 0.3, 0.4]);

        // Blend configured but no field drawn: filter shows unblended
        let unblended = PostUniforms::new(&params, None, &frame(100, 100, 0.0));
        assert_eq!(unblended.blend_enabled, 0);
    }
}
