//! Vertex, index, and uniform buffer creation.

use bytemuck::Pod;
use planetgen_mesh::{Mesh, interleave};
use wgpu::util::DeviceExt;

/// A mesh uploaded to the GPU, ready for one indexed draw call.
pub struct MeshBuffer {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub vertex_count: u32,
    pub index_count: u32,
    pub index_format: wgpu::IndexFormat,
}

impl MeshBuffer {
    /// Bind vertex and index buffers to a render pass.
    pub fn bind(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), self.index_format);
    }

    /// Draw the entire mesh using indexed rendering.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

/// Index data in either u16 or u32 format.
pub enum IndexData<'a> {
    U16(&'a [u16]),
    U32(&'a [u32]),
}

impl IndexData<'_> {
    pub fn format(&self) -> wgpu::IndexFormat {
        match self {
            IndexData::U16(_) => wgpu::IndexFormat::Uint16,
            IndexData::U32(_) => wgpu::IndexFormat::Uint32,
        }
    }

    pub fn count(&self) -> u32 {
        match self {
            IndexData::U16(data) => data.len() as u32,
            IndexData::U32(data) => data.len() as u32,
        }
    }

    /// Raw bytes for buffer creation.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            IndexData::U16(data) => bytemuck::cast_slice(data),
            IndexData::U32(data) => bytemuck::cast_slice(data),
        }
    }
}

/// Narrow 32-bit indices to 16 bits when every vertex is addressable that way.
pub fn narrow_indices(indices: &[u32], vertex_count: usize) -> Option<Vec<u16>> {
    if vertex_count > usize::from(u16::MAX) + 1 {
        return None;
    }
    indices.iter().map(|&i| u16::try_from(i).ok()).collect()
}

/// Creates buffers on a borrowed device.
pub struct BufferAllocator<'a> {
    device: &'a wgpu::Device,
}

impl<'a> BufferAllocator<'a> {
    pub fn new(device: &'a wgpu::Device) -> Self {
        Self { device }
    }

    pub fn device(&self) -> &'a wgpu::Device {
        self.device
    }

    /// Upload a generated mesh as interleaved [`PlanetVertex`](planetgen_mesh::PlanetVertex)
    /// data, using 16-bit indices when the vertex count allows it.
    pub fn upload_mesh(&self, label: &str, mesh: &Mesh) -> MeshBuffer {
        let vertices = interleave(mesh);
        let narrowed = narrow_indices(&mesh.indices, mesh.vertex_count());
        let indices = match &narrowed {
            Some(short) => IndexData::U16(short),
            None => IndexData::U32(&mesh.indices),
        };

        let buffer = MeshBuffer {
            vertex_count: vertices.len() as u32,
            ..self.create_mesh(label, bytemuck::cast_slice(&vertices), indices)
        };
        log::debug!(
            "Uploaded mesh '{label}' ({} vertices, {} indices, {:?})",
            buffer.vertex_count,
            buffer.index_count,
            buffer.index_format
        );
        buffer
    }

    /// Create a mesh buffer from raw vertex bytes and index data.
    ///
    /// `vertex_count` is left at zero since the vertex stride is unknown here.
    pub fn create_mesh(&self, label: &str, vertices: &[u8], indices: IndexData) -> MeshBuffer {
        let vertex_buffer = self.create_vertex_buffer(&format!("{label}-vertices"), vertices);
        let index_buffer = self.create_index_buffer(&format!("{label}-indices"), &indices);

        MeshBuffer {
            vertex_buffer,
            index_buffer,
            vertex_count: 0,
            index_count: indices.count(),
            index_format: indices.format(),
        }
    }

    pub fn create_vertex_buffer(&self, label: &str, data: &[u8]) -> wgpu::Buffer {
        self.device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: data,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            })
    }

    pub fn create_index_buffer(&self, label: &str, indices: &IndexData) -> wgpu::Buffer {
        self.device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: indices.as_bytes(),
                usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            })
    }

    /// Uniform buffer initialized with `value`, writable each frame via `Queue::write_buffer`.
    pub fn create_uniform_buffer<T: Pod>(&self, label: &str, value: &T) -> wgpu::Buffer {
        self.device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::bytes_of(value),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            })
    }
}
