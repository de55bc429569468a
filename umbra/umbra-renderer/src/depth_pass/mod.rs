//! Depth pass: render both objects from the light's viewpoint into the
//! shadow target. Front faces are culled so the back faces of light-facing
//! geometry fill the map, which keeps self-shadowing off the lit boundary.

use glam::Mat4;
use wgpu::CommandEncoder;

use crate::mesh::GpuMesh;
use crate::resources::{ShadowTarget, SHADOW_COLOR_FORMAT, SHADOW_DEPTH_FORMAT};

const DEPTH_SHADER: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/shaders/depth_map.wgsl"));

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct DepthUniform {
    light_mvp: [f32; 16],
}

pub struct DepthPass {
    pipeline: wgpu::RenderPipeline,
    static_buf: wgpu::Buffer,
    static_bind_group: wgpu::BindGroup,
    dynamic_buf: wgpu::Buffer,
    dynamic_bind_group: wgpu::BindGroup,
}

impl DepthPass {
    pub fn compile(device: &wgpu::Device) -> wgpu::ShaderModule {
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("depth_map_shader"),
            source: wgpu::ShaderSource::Wgsl(DEPTH_SHADER.into()),
        })
    }

    pub fn new(device: &wgpu::Device, shader: &wgpu::ShaderModule) -> Self {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("depth_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: std::num::NonZeroU64::new(64),
                },
                count: None,
            }],
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("depth_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("depth_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: 12,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &[wgpu::VertexAttribute {
                        offset: 0,
                        shader_location: 0,
                        format: wgpu::VertexFormat::Float32x3,
                    }],
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs"),
                targets: &[Some(SHADOW_COLOR_FORMAT.into())],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                cull_mode: Some(wgpu::Face::Front),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: SHADOW_DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        // Exactly two objects ever pass through here, so both uniform
        // buffers and bind groups are fixed at creation.
        let make_slot = |label: &str| {
            let buf = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size: 64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &bind_group_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buf.as_entire_binding(),
                }],
            });
            (buf, bind_group)
        };
        let (static_buf, static_bind_group) = make_slot("depth_static");
        let (dynamic_buf, dynamic_bind_group) = make_slot("depth_dynamic");

        Self {
            pipeline,
            static_buf,
            static_bind_group,
            dynamic_buf,
            dynamic_bind_group,
        }
    }

    /// Encode the depth pass: clear to white (max packed depth), then one
    /// position-only draw per present object. Returns the draw count.
    pub fn encode(
        &self,
        encoder: &mut CommandEncoder,
        queue: &wgpu::Queue,
        target: &ShadowTarget,
        plane: Option<&GpuMesh>,
        model: Option<&GpuMesh>,
        light_mvp_static: Mat4,
        light_mvp_dynamic: Mat4,
    ) -> u32 {
        if plane.is_some() {
            let u = DepthUniform {
                light_mvp: light_mvp_static.to_cols_array(),
            };
            queue.write_buffer(&self.static_buf, 0, bytemuck::bytes_of(&u));
        }
        if model.is_some() {
            let u = DepthUniform {
                light_mvp: light_mvp_dynamic.to_cols_array(),
            };
            queue.write_buffer(&self.dynamic_buf, 0, bytemuck::bytes_of(&u));
        }

        let color_view = target.color_view();
        let depth_view = target.depth_view();
        let mut rp = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("depth_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::WHITE),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        rp.set_pipeline(&self.pipeline);
        rp.set_viewport(
            0.0,
            0.0,
            target.width() as f32,
            target.height() as f32,
            0.0,
            1.0,
        );
        let mut draws = 0;
        if let Some(mesh) = plane {
            rp.set_bind_group(0, &self.static_bind_group, &[]);
            mesh.bind(&mut rp, true);
            mesh.draw(&mut rp);
            draws += 1;
        }
        if let Some(mesh) = model {
            rp.set_bind_group(0, &self.dynamic_bind_group, &[]);
            mesh.bind(&mut rp, true);
            mesh.draw(&mut rp);
            draws += 1;
        }
        drop(rp);
        draws
    }
}
