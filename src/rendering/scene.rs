//! Scene pass: wave-displaced thick wireframes for the ocean and the text
//! overlay.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::util::DeviceExt;

use super::target::DEPTH_FORMAT;
use crate::camera::OrbitCamera;
use crate::clock::FrameContext;
use crate::mesh::{WireVertex, WireframeMesh};
use crate::params::TextParams;
use crate::sketch::Sketch;
use crate::waves::{WaveField, WaveUniforms};

/// Per-draw uniforms for `wireframe_wave.wgsl`
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct SceneUniforms {
    pub proj: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
    pub time: f32,
    pub aspect: f32,
    pub thickness: f32,
    pub _padding: f32,
}

impl SceneUniforms {
    pub fn new(
        camera: &OrbitCamera,
        frame: &FrameContext,
        model: Mat4,
        color: [f32; 4],
        thickness: f32,
    ) -> Self {
        let aspect = frame.aspect_ratio();
        Self {
            proj: camera.projection(aspect).to_cols_array_2d(),
            view: camera.view(frame.tick).to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            color,
            time: frame.time_s,
            aspect,
            thickness,
            _padding: 0.0,
        }
    }
}

/// Quad corners: (endpoint select, side)
const CORNERS: [[f32; 2]; 4] = [[0.0, -1.0], [0.0, 1.0], [1.0, -1.0], [1.0, 1.0]];
const CORNER_INDICES: [u16; 6] = [0, 1, 2, 2, 1, 3];

/// How a draw gets its model matrix each frame
#[derive(Debug, Clone)]
enum Placement {
    World,
    Text(TextParams),
}

impl Placement {
    fn model(&self, camera: &OrbitCamera, tick: u64) -> Mat4 {
        match self {
            Placement::World => Mat4::IDENTITY,
            Placement::Text(text) => camera.text_model(text, tick),
        }
    }
}

/// One wireframe with its own uniforms
struct WireDraw {
    placement: Placement,
    color: [f32; 4],
    thickness: f32,
    instance_buffer: wgpu::Buffer,
    segment_count: u32,
    scene_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

pub struct ScenePass {
    pipeline: wgpu::RenderPipeline,
    corner_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    draws: Vec<WireDraw>,
}

impl ScenePass {
    pub fn new(device: &wgpu::Device, color_format: wgpu::TextureFormat, sketch: &Sketch) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Wireframe Wave Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("wireframe_wave.wgsl").into()),
        });

        let uniform_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Scene Bind Group Layout"),
            entries: &[uniform_entry(0), uniform_entry(1)],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let instance_attributes = wgpu::vertex_attr_array![
            1 => Float32x3,
            2 => Float32x3,
            3 => Float32,
            4 => Float32x3,
            5 => Float32x3,
            6 => Float32
        ];

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Wireframe Wave Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![0 => Float32x2],
                    },
                    wgpu::VertexBufferLayout {
                        // Both endpoint entries of a segment
                        array_stride: (2 * std::mem::size_of::<WireVertex>())
                            as wgpu::BufferAddress,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &instance_attributes,
                    },
                ],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
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
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let corner_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Line Corner Buffer"),
            contents: bytemuck::cast_slice(&CORNERS),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Line Index Buffer"),
            contents: bytemuck::cast_slice(&CORNER_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        let config = &sketch.config;
        let mut draws = Vec::new();
        draws.extend(WireDraw::new(
            device,
            &bind_group_layout,
            "Ocean",
            &sketch.ocean_mesh,
            &sketch.ocean_waves,
            Placement::World,
            config.ocean.color,
            config.ocean.thickness,
        ));
        if let (Some(text), Some(mesh)) = (&config.text, &sketch.text_mesh) {
            draws.extend(WireDraw::new(
                device,
                &bind_group_layout,
                "Text",
                mesh,
                &WaveField::flat(),
                Placement::Text(text.clone()),
                text.color,
                text.thickness,
            ));
        }

        Self {
            pipeline,
            corner_buffer,
            index_buffer,
            draws,
        }
    }

    /// Upload this frame's camera, time and model matrices
    pub fn prepare(&self, queue: &wgpu::Queue, camera: &OrbitCamera, frame: &FrameContext) {
        for draw in &self.draws {
            let uniforms = SceneUniforms::new(
                camera,
                frame,
                draw.placement.model(camera, frame.tick),
                draw.color,
                draw.thickness,
            );
            queue.write_buffer(&draw.scene_buffer, 0, bytemuck::bytes_of(&uniforms));
        }
    }

    /// Clear `color_view` and `depth_view`, then draw every wireframe
    pub fn draw(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        color_view: &wgpu::TextureView,
        depth_view: &wgpu::TextureView,
        clear: wgpu::Color,
    ) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_vertex_buffer(0, self.corner_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        for draw in &self.draws {
            render_pass.set_bind_group(0, &draw.bind_group, &[]);
            render_pass.set_vertex_buffer(1, draw.instance_buffer.slice(..));
            render_pass.draw_indexed(0..CORNER_INDICES.len() as u32, 0, 0..draw.segment_count);
        }
    }
}

impl WireDraw {
    /// `None` for an empty wireframe; there is nothing to draw
    #[allow(clippy::too_many_arguments)]
    fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        label: &'static str,
        mesh: &WireframeMesh,
        waves: &WaveField,
        placement: Placement,
        color: [f32; 4],
        thickness: f32,
    ) -> Option<Self> {
        if mesh.is_empty() {
            log::warn!("{} wireframe is empty, skipping its draw", label);
            return None;
        }

        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(mesh.vertices()),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let scene_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Scene Uniform Buffer"),
            size: std::mem::size_of::<SceneUniforms>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let wave_uniforms: WaveUniforms = waves.uniforms();
        let wave_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Wave Uniform Buffer"),
            contents: bytemuck::bytes_of(&wave_uniforms),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: scene_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wave_buffer.as_entire_binding(),
                },
            ],
        });

        Some(Self {
            placement,
            color,
            thickness,
            instance_buffer,
            segment_count: mesh.segment_count() as u32,
            scene_buffer,
            bind_group,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::OrbitParams;

    fn shader_module() -> naga::Module {
        naga::front::wgsl::parse_str(include_str!("wireframe_wave.wgsl")).unwrap()
    }

    fn wgsl_size(module: &naga::Module, name: &str) -> u32 {
        let mut layouter = naga::proc::Layouter::default();
        layouter.update(module.to_ctx()).unwrap();
        let (handle, _) = module
            .types
            .iter()
            .find(|(_, ty)| ty.name.as_deref() == Some(name))
            .unwrap();
        layouter[handle].size
    }

    #[test]
    fn test_shader_validates() {
        let module = shader_module();
        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        )
        .validate(&module)
        .unwrap();
    }

    #[test]
    fn test_uniform_layouts_match_shader() {
        let module = shader_module();
        assert_eq!(
            wgsl_size(&module, "SceneUniforms") as usize,
            std::mem::size_of::<SceneUniforms>()
        );
        assert_eq!(
            wgsl_size(&module, "WaveUniforms") as usize,
            std::mem::size_of::<WaveUniforms>()
        );
    }

    #[test]
    fn test_instance_stride_covers_two_entries() {
        assert_eq!(std::mem::size_of::<WireVertex>(), 28);
        let attrs = wgpu::vertex_attr_array![
            1 => Float32x3,
            2 => Float32x3,
            3 => Float32,
            4 => Float32x3,
            5 => Float32x3,
            6 => Float32
        ];
        assert_eq!(attrs[3].offset, std::mem::size_of::<WireVertex>() as u64);
        assert_eq!(attrs[5].offset + 4, 2 * std::mem::size_of::<WireVertex>() as u64);
    }

    #[test]
    fn test_corner_quad_covers_both_sides() {
        // Two triangles sharing the (start, +1)-(end, -1) diagonal
        assert_eq!(&CORNER_INDICES[..3], &[0, 1, 2]);
        assert_eq!(&CORNER_INDICES[3..], &[2, 1, 3]);
        for (select, side) in CORNERS.map(|[a, b]| (a, b)) {
            assert!(select == 0.0 || select == 1.0);
            assert_eq!(side.abs(), 1.0);
        }
    }

    #[test]
    fn test_uniforms_follow_frame() {
        let camera = OrbitCamera::new(OrbitParams::default());
        let frame = FrameContext {
            viewport_width: 1920,
            viewport_height: 1080,
            tick: 42,
            time_s: 0.7,
        };
        let uniforms = SceneUniforms::new(&camera, &frame, Mat4::IDENTITY, [1.0; 4], 0.02);
        assert!((uniforms.aspect - 1920.0 / 1080.0).abs() < 1e-6);
        assert_eq!(uniforms.time, 0.7);
        assert_eq!(uniforms.view, camera.view(42).to_cols_array_2d());
        assert_eq!(uniforms.model, Mat4::IDENTITY.to_cols_array_2d());
        assert_eq!(uniforms.thickness, 0.02);
    }

    #[test]
    fn test_text_placement_uses_camera() {
        let camera = OrbitCamera::new(OrbitParams::default());
        let text = TextParams::default();
        let placement = Placement::Text(text.clone());
        assert_eq!(placement.model(&camera, 9), camera.text_model(&text, 9));
        assert_eq!(Placement::World.model(&camera, 9), Mat4::IDENTITY);
    }
}
