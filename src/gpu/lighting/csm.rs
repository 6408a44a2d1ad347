// ============================================
// Cascaded Shadow Maps (CSM) - GPU ресурсы каскадов
// ============================================
// - Разбиение frustum считается один раз при старте
// - Матрицы каскадов пересчитываются каждый кадр
// - На каждый каскад свой uniform буфер и bind group

use bytemuck::{Pod, Zeroable};
use ultraviolet::Mat4;
use wgpu::util::DeviceExt;

use super::cascade::CascadePartition;
use super::shadow_map::ShadowMapArray;

/// Uniform одного shadow pass
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ShadowPassUniform {
    pub light_view_proj: [[f32; 4]; 4],
}

pub struct CascadedShadowMaps {
    /// Границы каскадов в view space
    pub partition: CascadePartition,
    /// Текстура-массив глубины
    pub shadow_maps: ShadowMapArray,
    pass_buffers: Vec<wgpu::Buffer>,
    /// Bind group с матрицей света каждого каскада
    pub pass_bind_groups: Vec<wgpu::BindGroup>,
}

impl CascadedShadowMaps {
    pub fn new(
        device: &wgpu::Device,
        shadow_pass_layout: &wgpu::BindGroupLayout,
        partition: CascadePartition,
        resolution: u32,
    ) -> Self {
        let num_cascades = partition.cascade_count();
        let shadow_maps = ShadowMapArray::new(device, resolution, num_cascades as u32);

        let pass_buffers: Vec<wgpu::Buffer> = (0..num_cascades)
            .map(|i| {
                device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("Shadow Pass Buffer {}", i)),
                    contents: bytemuck::cast_slice(&[ShadowPassUniform {
                        light_view_proj: Mat4::identity().into(),
                    }]),
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                })
            })
            .collect();

        let pass_bind_groups = pass_buffers
            .iter()
            .enumerate()
            .map(|(i, buffer)| {
                device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some(&format!("Shadow Pass Bind Group {}", i)),
                    layout: shadow_pass_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: buffer.as_entire_binding(),
                    }],
                })
            })
            .collect();

        log::info!(
            "CSM: {} cascades at {}x{}, limits {:?}",
            num_cascades,
            resolution,
            resolution,
            partition.limits()
        );

        Self {
            partition,
            shadow_maps,
            pass_buffers,
            pass_bind_groups,
        }
    }

    /// Записать матрицы каскадов этого кадра
    pub fn update(&self, queue: &wgpu::Queue, cascades: &[Mat4]) {
        for (buffer, matrix) in self.pass_buffers.iter().zip(cascades) {
            let uniform = ShadowPassUniform {
                light_view_proj: (*matrix).into(),
            };
            queue.write_buffer(buffer, 0, bytemuck::cast_slice(&[uniform]));
        }
    }
}
