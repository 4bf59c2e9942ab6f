use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::render::error::ShaderError;
use crate::render::shader::{ShaderProgram, UniformSlot};

/// Vertex layout shared by every model: homogeneous position at location 0,
/// texture coordinate at location 1.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 4],
    pub tex_coord: [f32; 2],
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x4, 1 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// CPU vertices plus the GPU buffer they are uploaded to.
#[derive(Debug)]
pub struct Mesh {
    label: &'static str,
    vertices: Vec<Vertex>,
    topology: wgpu::PrimitiveTopology,
    vbo: Option<wgpu::Buffer>,
}

impl Mesh {
    pub fn new(label: &'static str, vertices: Vec<Vertex>, topology: wgpu::PrimitiveTopology) -> Self {
        Self { label, vertices, topology, vbo: None }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn topology(&self) -> wgpu::PrimitiveTopology {
        self.topology
    }

    pub fn is_initialized(&self) -> bool {
        self.vbo.is_some()
    }

    /// Creates the vertex buffer. Re-initializing replaces it.
    pub fn upload(&mut self, device: &wgpu::Device) {
        self.vbo = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(self.label),
            contents: bytemuck::cast_slice(&self.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        }));
    }

    pub fn draw(
        &self,
        pass: &mut wgpu::RenderPass<'_>,
        program: &ShaderProgram,
        slot: UniformSlot,
    ) -> Result<(), ShaderError> {
        let vbo = self.vbo.as_ref().ok_or(ShaderError::UninitializedModel)?;

        if program.topology() != self.topology {
            return Err(ShaderError::TopologyMismatch {
                program: program.name().to_string(),
                program_topology: program.topology(),
                model_topology: self.topology,
            });
        }

        program.bind(pass, slot);
        pass.set_vertex_buffer(0, vbo.slice(..));
        pass.draw(0..self.vertices.len() as u32, 0..1);
        Ok(())
    }
}

/// Something with a mesh that can be uploaded once and drawn many times.
pub trait Model {
    fn mesh(&self) -> &Mesh;
    fn mesh_mut(&mut self) -> &mut Mesh;

    fn vertices(&self) -> &[Vertex] {
        self.mesh().vertices()
    }

    fn topology(&self) -> wgpu::PrimitiveTopology {
        self.mesh().topology()
    }

    fn init(&mut self, device: &wgpu::Device) {
        self.mesh_mut().upload(device);
    }

    /// Draws with `program`, whose uniforms were uploaded into `slot`.
    fn draw(
        &self,
        pass: &mut wgpu::RenderPass<'_>,
        program: &ShaderProgram,
        slot: UniformSlot,
    ) -> Result<(), ShaderError> {
        self.mesh().draw(pass, program, slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
        let layout = Vertex::layout();
        assert_eq!(layout.array_stride, 24);
        assert_eq!(layout.attributes[1].offset, 16);
    }

    #[test]
    fn new_mesh_is_not_initialized() {
        let mesh = Mesh::new("test", Vec::new(), wgpu::PrimitiveTopology::LineList);
        assert!(!mesh.is_initialized());
        assert_eq!(mesh.topology(), wgpu::PrimitiveTopology::LineList);
    }
}
