//! Lit pass: the main camera render. Samples the packed shadow map with a
//! 3x3 PCF kernel while shading both objects with textured diffuse lighting.

use glam::Mat4;
use wgpu::CommandEncoder;

use crate::mesh::GpuMesh;
use crate::resources::{ShadowTarget, SHADOW_DEPTH_FORMAT};
use crate::scene::{bias_matrix, normal_matrix, SceneState};

const LIT_SHADER: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/shaders/shadow_lit.wgsl"));

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct LitUniform {
    mv: [f32; 16],
    mvp: [f32; 16],
    normal_matrix: [f32; 16],
    shadow_mvp: [f32; 16],
    light_pos_eye: [f32; 3],
    biased: u32,
    map_step: [f32; 2],
    _pad: [f32; 2],
}

pub struct LitPass {
    pipeline: wgpu::RenderPipeline,
    texture_bind_group_layout: wgpu::BindGroupLayout,
    base_sampler: wgpu::Sampler,
    shadow_sampler: wgpu::Sampler,
    static_buf: wgpu::Buffer,
    static_bind_group: wgpu::BindGroup,
    dynamic_buf: wgpu::Buffer,
    dynamic_bind_group: wgpu::BindGroup,
}

impl LitPass {
    pub fn compile(device: &wgpu::Device) -> wgpu::ShaderModule {
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shadow_lit_shader"),
            source: wgpu::ShaderSource::Wgsl(LIT_SHADER.into()),
        })
    }

    pub fn new(
        device: &wgpu::Device,
        shader: &wgpu::ShaderModule,
        output_format: wgpu::TextureFormat,
    ) -> Self {
        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("lit_uniform_bind_group_layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: std::num::NonZeroU64::new(
                            std::mem::size_of::<LitUniform>() as u64,
                        ),
                    },
                    count: None,
                }],
            });
        let texture_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("lit_texture_bind_group_layout"),
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
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 3,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("lit_pipeline_layout"),
            bind_group_layouts: &[&uniform_bind_group_layout, &texture_bind_group_layout],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("lit_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs"),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: 12,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &[wgpu::VertexAttribute {
                            offset: 0,
                            shader_location: 0,
                            format: wgpu::VertexFormat::Float32x3,
                        }],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: 12,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &[wgpu::VertexAttribute {
                            offset: 0,
                            shader_location: 1,
                            format: wgpu::VertexFormat::Float32x3,
                        }],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: 8,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &[wgpu::VertexAttribute {
                            offset: 0,
                            shader_location: 2,
                            format: wgpu::VertexFormat::Float32x2,
                        }],
                    },
                ],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs"),
                targets: &[Some(output_format.into())],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                cull_mode: Some(wgpu::Face::Back),
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

        let base_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("lit_base_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });
        // Nearest and clamped: interpolating packed depth across texel
        // boundaries would corrupt the comparison.
        let shadow_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("lit_shadow_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let make_slot = |label: &str| {
            let buf = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size: std::mem::size_of::<LitUniform>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &uniform_bind_group_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buf.as_entire_binding(),
                }],
            });
            (buf, bind_group)
        };
        let (static_buf, static_bind_group) = make_slot("lit_static");
        let (dynamic_buf, dynamic_bind_group) = make_slot("lit_dynamic");

        Self {
            pipeline,
            texture_bind_group_layout,
            base_sampler,
            shadow_sampler,
            static_buf,
            static_bind_group,
            dynamic_buf,
            dynamic_bind_group,
        }
    }

    fn object_uniform(
        &self,
        scene: &SceneState,
        model: Mat4,
        light_mvp: Mat4,
        map_step: (f32, f32),
        biased: bool,
    ) -> LitUniform {
        let mv = scene.view * model;
        let shadow_mvp = if biased {
            bias_matrix() * light_mvp
        } else {
            light_mvp
        };
        LitUniform {
            mv: mv.to_cols_array(),
            mvp: (scene.proj * mv).to_cols_array(),
            normal_matrix: normal_matrix(mv).to_cols_array(),
            shadow_mvp: shadow_mvp.to_cols_array(),
            light_pos_eye: scene.light_eye().to_array(),
            biased: biased as u32,
            map_step: [map_step.0, map_step.1],
            _pad: [0.0; 2],
        }
    }

    fn texture_bind_group(
        &self,
        device: &wgpu::Device,
        mesh: &GpuMesh,
        shadow_view: &wgpu::TextureView,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("lit_texture_bind_group"),
            layout: &self.texture_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(mesh.texture_view()),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.base_sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(shadow_view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(&self.shadow_sampler),
                },
            ],
        })
    }

    /// Encode the lit pass to `output_view`. Returns the draw count.
    #[allow(clippy::too_many_arguments)]
    pub fn encode(
        &self,
        encoder: &mut CommandEncoder,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        output_view: &wgpu::TextureView,
        depth_view: &wgpu::TextureView,
        viewport: (u32, u32),
        shadow: &ShadowTarget,
        scene: &SceneState,
        biased: bool,
        plane: Option<&GpuMesh>,
        model: Option<&GpuMesh>,
    ) -> u32 {
        let map_step = shadow.map_step();
        if plane.is_some() {
            let u = self.object_uniform(
                scene,
                Mat4::IDENTITY,
                scene.light_mvp_static,
                map_step,
                biased,
            );
            queue.write_buffer(&self.static_buf, 0, bytemuck::bytes_of(&u));
        }
        if model.is_some() {
            let u = self.object_uniform(
                scene,
                scene.object_rotation,
                scene.light_mvp_dynamic,
                map_step,
                biased,
            );
            queue.write_buffer(&self.dynamic_buf, 0, bytemuck::bytes_of(&u));
        }

        let shadow_view = shadow.color_view();
        let mut rp = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("lit_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: output_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
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
        rp.set_pipeline(&self.pipeline);
        rp.set_viewport(0.0, 0.0, viewport.0 as f32, viewport.1 as f32, 0.0, 1.0);
        let mut draws = 0;
        if let Some(mesh) = plane {
            let textures = self.texture_bind_group(device, mesh, &shadow_view);
            rp.set_bind_group(0, &self.static_bind_group, &[]);
            rp.set_bind_group(1, &textures, &[]);
            mesh.bind(&mut rp, false);
            mesh.draw(&mut rp);
            draws += 1;
        }
        if let Some(mesh) = model {
            let textures = self.texture_bind_group(device, mesh, &shadow_view);
            rp.set_bind_group(0, &self.dynamic_bind_group, &[]);
            rp.set_bind_group(1, &textures, &[]);
            mesh.bind(&mut rp, false);
            mesh.draw(&mut rp);
            draws += 1;
        }
        drop(rp);
        draws
    }
}
