//! Triangle-soup geometry and its GPU form: three flat attribute streams
//! bound to fixed shader slots, drawn non-indexed.

use std::sync::Arc;

use render_api::TextureData;

use crate::texture::upload_texture;

/// De-indexed triangle geometry. One entry per emitted vertex in every
/// stream; triangles are never indexed at draw time.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub texcoords: Vec<[f32; 2]>,
}

impl MeshData {
    pub fn with_capacity(vertices: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices),
            normals: Vec::with_capacity(vertices),
            texcoords: Vec::with_capacity(vertices),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Ground plane: a two-triangle quad spanning x [-30, 30], z [-20, 7] at
    /// y = -1.5, facing up.
    pub fn ground_plane() -> Self {
        Self {
            positions: vec![
                [-30.0, -1.5, -20.0],
                [-30.0, -1.5, 7.0],
                [30.0, -1.5, -20.0],
                [-30.0, -1.5, 7.0],
                [30.0, -1.5, 7.0],
                [30.0, -1.5, -20.0],
            ],
            normals: vec![[0.0, 1.0, 0.0]; 6],
            texcoords: vec![
                [0.0, 0.0],
                [0.0, 1.0],
                [1.0, 0.0],
                [0.0, 1.0],
                [1.0, 1.0],
                [1.0, 0.0],
            ],
        }
    }
}

/// Uploaded mesh: one vertex buffer per attribute stream plus the object's
/// texture. Slot 0 carries positions, slot 1 normals, slot 2 texcoords.
pub struct GpuMesh {
    position_buf: Arc<wgpu::Buffer>,
    normal_buf: Arc<wgpu::Buffer>,
    texcoord_buf: Arc<wgpu::Buffer>,
    vertex_count: u32,
    texture_view: Arc<wgpu::TextureView>,
}

impl GpuMesh {
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &MeshData,
        texture: &TextureData,
        label: &str,
    ) -> Self {
        let make_stream = |suffix: &str, bytes: &[u8]| {
            let buf = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(&format!("{label}_{suffix}")),
                size: bytes.len() as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            queue.write_buffer(&buf, 0, bytes);
            Arc::new(buf)
        };
        let position_buf = make_stream("positions", bytemuck::cast_slice(&data.positions));
        let normal_buf = make_stream("normals", bytemuck::cast_slice(&data.normals));
        let texcoord_buf = make_stream("texcoords", bytemuck::cast_slice(&data.texcoords));
        let texture_view = Arc::new(upload_texture(device, queue, texture, label));
        Self {
            position_buf,
            normal_buf,
            texcoord_buf,
            vertex_count: data.vertex_count() as u32,
            texture_view,
        }
    }

    /// Bind the attribute streams to the pass's vertex slots. The depth pass
    /// binds geometry only and must not touch normal or texcoord state, so
    /// `position_only` skips slots 1 and 2. Idempotent; safe every frame.
    pub fn bind(&self, rp: &mut wgpu::RenderPass<'_>, position_only: bool) {
        rp.set_vertex_buffer(0, self.position_buf.slice(..));
        if !position_only {
            rp.set_vertex_buffer(1, self.normal_buf.slice(..));
            rp.set_vertex_buffer(2, self.texcoord_buf.slice(..));
        }
    }

    /// Issue the non-indexed triangle-list draw for the whole mesh.
    pub fn draw(&self, rp: &mut wgpu::RenderPass<'_>) {
        rp.draw(0..self.vertex_count, 0..1);
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn texture_view(&self) -> &wgpu::TextureView {
        &self.texture_view
    }
}
