use crate::camera::OrbitCamera;
use crate::shaders;
use bytemuck::{Pod, Zeroable};
use galaxy_common::{CloudId, Rgb};
use galaxy_kernel::{PointCloud, PointStyle};
use galaxy_render::SceneBackend;
use glam::Mat4;
use std::collections::BTreeMap;
use wgpu::util::DeviceExt;

/// Background of the viewer, `#262837`.
const CLEAR_COLOR: u32 = 0x262837;

/// Length of each axes-helper arm.
const AXES_SIZE: f32 = 1.0;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct CameraUniforms {
    view: [[f32; 4]; 4],
    proj: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct PointUniforms {
    style: [f32; 4],
}

impl PointUniforms {
    fn new(style: PointStyle, viewport_height: f32) -> Self {
        let attenuate = if style.size_attenuation { 1.0 } else { 0.0 };
        Self {
            style: [style.size, attenuate, viewport_height, 0.0],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct LineVertex {
    position: [f32; 3],
    color: [f32; 4],
}

/// Generate the axes helper: X red, Y green, Z blue.
fn axes_mesh(size: f32) -> Vec<LineVertex> {
    let axes = [
        ([size, 0.0, 0.0], [1.0, 0.0, 0.0, 1.0]),
        ([0.0, size, 0.0], [0.0, 1.0, 0.0, 1.0]),
        ([0.0, 0.0, size], [0.0, 0.0, 1.0, 1.0]),
    ];
    axes.iter()
        .flat_map(|&(end, color)| {
            [
                LineVertex {
                    position: [0.0; 3],
                    color,
                },
                LineVertex {
                    position: end,
                    color,
                },
            ]
        })
        .collect()
}

/// Convert an sRGB channel to linear.
fn srgb_to_linear(c: f32) -> f64 {
    let c = c as f64;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Channel value to write so that `c` (sRGB-encoded, as parsed from hex)
/// shows up unchanged on the target. sRGB targets re-encode on store.
fn target_channel(c: f32, srgb_target: bool) -> f64 {
    if srgb_target {
        srgb_to_linear(c)
    } else {
        c as f64
    }
}

/// Per-point colors for upload. Uncolored clouds draw white.
fn upload_colors(colors: Option<&[f32]>, len: usize, srgb_target: bool) -> Vec<f32> {
    match colors {
        Some(colors) => colors
            .iter()
            .map(|&c| target_channel(c, srgb_target) as f32)
            .collect(),
        None => vec![1.0; len],
    }
}

/// GPU resources of one uploaded cloud.
struct GpuCloud {
    positions: wgpu::Buffer,
    colors: wgpu::Buffer,
    uniforms: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    count: u32,
    style: PointStyle,
}

impl GpuCloud {
    fn destroy(self) {
        self.positions.destroy();
        self.colors.destroy();
        self.uniforms.destroy();
    }
}

/// wgpu-based point-cloud renderer.
pub struct WgpuRenderer {
    /// One point pipeline per blend mode and depth-write combination.
    point_pipelines: [wgpu::RenderPipeline; 4],
    axes_pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    points_layout: wgpu::BindGroupLayout,
    axes_vertex_buffer: wgpu::Buffer,
    axes_vertex_count: u32,
    clouds: BTreeMap<CloudId, GpuCloud>,
    depth_texture: wgpu::TextureView,
    surface_format: wgpu::TextureFormat,
    viewport_height: f32,
}

impl WgpuRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("camera_buffer"),
            contents: bytemuck::bytes_of(&CameraUniforms {
                view: Mat4::IDENTITY.to_cols_array_2d(),
                proj: Mat4::IDENTITY.to_cols_array_2d(),
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("camera_bind_group_layout"),
            entries: &[uniform_entry()],
        });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("camera_bind_group"),
            layout: &camera_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let points_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("points_bind_group_layout"),
            entries: &[uniform_entry()],
        });

        let point_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("point_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::POINT_SHADER.into()),
        });

        let point_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("point_pipeline_layout"),
            bind_group_layouts: &[&camera_layout, &points_layout],
            push_constant_ranges: &[],
        });

        let point_pipelines = std::array::from_fn(|index| {
            let (additive, depth_write) = (index >= 2, index % 2 == 1);
            point_pipeline(
                device,
                &point_layout,
                &point_shader,
                surface_format,
                point_blend(additive),
                depth_write,
            )
        });

        // Axes helper pipeline
        let axes_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("axes_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::AXES_SHADER.into()),
        });

        let axes_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("axes_pipeline_layout"),
            bind_group_layouts: &[&camera_layout],
            push_constant_ranges: &[],
        });

        let axes_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("axes_pipeline"),
            layout: Some(&axes_layout),
            vertex: wgpu::VertexState {
                module: &axes_shader,
                entry_point: Some("vs_axes"),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<LineVertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x3,
                        1 => Float32x4,
                    ],
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &axes_shader,
                entry_point: Some("fs_axes"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                ..Default::default()
            },
            depth_stencil: Some(depth_state(true)),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let axes_verts = axes_mesh(AXES_SIZE);
        let axes_vertex_count = axes_verts.len() as u32;
        let axes_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("axes_vertex_buffer"),
            contents: bytemuck::cast_slice(&axes_verts),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let depth_texture = Self::create_depth_texture(device, width, height);

        Self {
            point_pipelines,
            axes_pipeline,
            camera_buffer,
            camera_bind_group,
            points_layout,
            axes_vertex_buffer,
            axes_vertex_count,
            clouds: BTreeMap::new(),
            depth_texture,
            surface_format,
            viewport_height: height.max(1) as f32,
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
        self.viewport_height = height.max(1) as f32;
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    /// Upload a cloud's buffers as tightly packed `f32` triples. Positions go
    /// as-is; colors are decoded to linear when the surface is sRGB.
    pub fn upload_cloud(&mut self, device: &wgpu::Device, id: CloudId, cloud: &PointCloud) {
        let srgb_target = self.surface_format.is_srgb();
        let colors = upload_colors(cloud.colors(), cloud.positions().len(), srgb_target);

        let positions = vertex_buffer(device, "cloud_positions", cloud.positions());
        let colors = vertex_buffer(device, "cloud_colors", &colors);

        let style = cloud.style();
        let uniforms = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cloud_uniforms"),
            contents: bytemuck::bytes_of(&PointUniforms::new(style, self.viewport_height)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("cloud_bind_group"),
            layout: &self.points_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniforms.as_entire_binding(),
            }],
        });

        let gpu = GpuCloud {
            positions,
            colors,
            uniforms,
            bind_group,
            count: cloud.len() as u32,
            style,
        };
        if let Some(previous) = self.clouds.insert(id, gpu) {
            previous.destroy();
        }
        tracing::debug!(id = %id, points = cloud.len(), "uploaded cloud buffers");
    }

    /// Destroy a cloud's buffers. Returns false if it was not uploaded.
    pub fn release_cloud(&mut self, id: CloudId) -> bool {
        match self.clouds.remove(&id) {
            Some(gpu) => {
                gpu.destroy();
                tracing::debug!(id = %id, "released cloud buffers");
                true
            }
            None => false,
        }
    }

    pub fn cloud_count(&self) -> usize {
        self.clouds.len()
    }

    /// Render one frame: axes helper + every uploaded cloud.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        camera: &OrbitCamera,
    ) {
        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::bytes_of(&CameraUniforms {
                view: camera.view_matrix().to_cols_array_2d(),
                proj: camera.projection_matrix().to_cols_array_2d(),
            }),
        );
        for gpu in self.clouds.values() {
            queue.write_buffer(
                &gpu.uniforms,
                0,
                bytemuck::bytes_of(&PointUniforms::new(gpu.style, self.viewport_height)),
            );
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        let clear = Rgb::from_u32(CLEAR_COLOR);
        let srgb_target = self.surface_format.is_srgb();
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: target_channel(clear.r, srgb_target),
                            g: target_channel(clear.g, srgb_target),
                            b: target_channel(clear.b, srgb_target),
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_bind_group(0, &self.camera_bind_group, &[]);

            // Draw axes helper
            pass.set_pipeline(&self.axes_pipeline);
            pass.set_vertex_buffer(0, self.axes_vertex_buffer.slice(..));
            pass.draw(0..self.axes_vertex_count, 0..1);

            // Draw clouds, six quad corners per point
            for gpu in self.clouds.values().filter(|g| g.count > 0) {
                pass.set_pipeline(&self.point_pipelines[pipeline_index(gpu.style)]);
                pass.set_bind_group(1, &gpu.bind_group, &[]);
                pass.set_vertex_buffer(0, gpu.positions.slice(..));
                pass.set_vertex_buffer(1, gpu.colors.slice(..));
                pass.draw(0..6, 0..gpu.count);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

/// Scene view over the GPU renderer for one frame's worth of edits.
///
/// Holds the device so uploads can happen through [`SceneBackend`].
pub struct GpuScene<'a> {
    pub renderer: &'a mut WgpuRenderer,
    pub device: &'a wgpu::Device,
}

impl SceneBackend for GpuScene<'_> {
    fn insert_cloud(&mut self, id: CloudId, cloud: &PointCloud) {
        self.renderer.upload_cloud(self.device, id, cloud);
    }

    fn remove_cloud(&mut self, id: CloudId) -> bool {
        self.renderer.release_cloud(id)
    }

    fn cloud_count(&self) -> usize {
        self.renderer.cloud_count()
    }
}

fn uniform_entry() -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding: 0,
        visibility: wgpu::ShaderStages::VERTEX,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn depth_state(write: bool) -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: wgpu::TextureFormat::Depth32Float,
        depth_write_enabled: write,
        depth_compare: wgpu::CompareFunction::Less,
        stencil: Default::default(),
        bias: Default::default(),
    }
}

/// Instance-rate vertex buffer of `f32` triples. Empty clouds still get a
/// one-point buffer since zero-sized vertex buffers cannot be bound.
fn vertex_buffer(device: &wgpu::Device, label: &str, data: &[f32]) -> wgpu::Buffer {
    const EMPTY: [f32; 3] = [0.0; 3];
    let data = if data.is_empty() { &EMPTY[..] } else { data };
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::cast_slice(data),
        usage: wgpu::BufferUsages::VERTEX,
    })
}

/// Slot in [`WgpuRenderer::point_pipelines`] for a style.
fn pipeline_index(style: PointStyle) -> usize {
    usize::from(style.additive) * 2 + usize::from(style.depth_write)
}

fn point_blend(additive: bool) -> wgpu::BlendState {
    if !additive {
        return wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING;
    }
    let add = wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    };
    wgpu::BlendState {
        color: add,
        alpha: add,
    }
}

fn point_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    surface_format: wgpu::TextureFormat,
    blend: wgpu::BlendState,
    depth_write: bool,
) -> wgpu::RenderPipeline {
    let stride = (3 * std::mem::size_of::<f32>()) as u64;
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("point_pipeline"),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_points"),
            compilation_options: Default::default(),
            buffers: &[
                wgpu::VertexBufferLayout {
                    array_stride: stride,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &wgpu::vertex_attr_array![0 => Float32x3],
                },
                wgpu::VertexBufferLayout {
                    array_stride: stride,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &wgpu::vertex_attr_array![1 => Float32x3],
                },
            ],
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_points"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            ..Default::default()
        },
        depth_stencil: Some(depth_state(depth_write)),
        multisample: Default::default(),
        multiview: None,
        cache: None,
    })
}
