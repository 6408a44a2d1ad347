// ============================================
// Mesh - Вершины сцены и GPU буферы
// ============================================

use bytemuck::{Pod, Zeroable};
use ultraviolet::Vec3;
use wgpu::util::DeviceExt;

/// Вершина сцены. Битангент восстанавливается в шейдере как cross(T, N)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable, PartialEq)]
pub struct ModelVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub tangent: [f32; 3],
}

impl ModelVertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ModelVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: 12,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: 24,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: 32,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Касательная с учётом знака битангента.
/// На симметричных моделях T бывает развёрнут: если cross(N, T)
/// смотрит туда же, куда B, T переворачивается.
pub fn fix_tangent(normal: Vec3, tangent: Vec3, bitangent: Vec3) -> Vec3 {
    if normal.cross(tangent).dot(bitangent) > 0.0 {
        -tangent
    } else {
        tangent
    }
}

/// Любая касательная, перпендикулярная нормали (для мешей без TANGENT)
pub fn fallback_tangent(normal: Vec3) -> Vec3 {
    let axis = if normal.x.abs() < 0.9 { Vec3::unit_x() } else { Vec3::unit_y() };
    (axis - normal * normal.dot(axis)).normalized()
}

/// Меш на CPU после загрузки
#[derive(Debug, Clone)]
pub struct MeshData {
    pub vertices: Vec<ModelVertex>,
    pub indices: Vec<u32>,
    /// Индекс материала в сцене
    pub material: usize,
}

/// Меш на GPU
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
    pub material: usize,
}

impl GpuMesh {
    pub fn upload(device: &wgpu::Device, mesh: &MeshData) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Vertex Buffer"),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Index Buffer"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
            material: mesh.material,
        }
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_layout_matches_struct() {
        assert_eq!(std::mem::size_of::<ModelVertex>(), 44);
        assert_eq!(ModelVertex::desc().array_stride, 44);
    }

    #[test]
    fn test_tangent_flipped_when_bitangent_agrees_with_cross() {
        let n = Vec3::unit_z();
        let t = Vec3::unit_x();
        // cross(N, T) = +Y
        assert_eq!(fix_tangent(n, t, Vec3::unit_y()), -t);
        assert_eq!(fix_tangent(n, t, -Vec3::unit_y()), t);
    }

    #[test]
    fn test_fixed_tangent_reconstructs_bitangent() {
        let n = Vec3::unit_z();
        let t = Vec3::unit_x();
        for b in [Vec3::unit_y(), -Vec3::unit_y()] {
            let fixed = fix_tangent(n, t, b);
            // Шейдер: B = cross(T, N)
            assert!((fixed.cross(n) - b).mag() < 1e-6);
        }
    }

    #[test]
    fn test_fallback_tangent_is_perpendicular() {
        for n in [Vec3::unit_x(), Vec3::unit_y(), Vec3::new(0.3, -0.5, 0.8).normalized()] {
            let t = fallback_tangent(n);
            assert!(t.dot(n).abs() < 1e-5);
            assert!((t.mag() - 1.0).abs() < 1e-5);
        }
    }
}
