pub mod ambient_occlusion;
pub mod eye_adaptation;
pub mod geometry;
pub mod mipmap;
pub mod present;
pub mod shading;
pub mod shadow;
pub mod smaa;
pub mod taa;
pub mod tonemap;

use crate::gpu::render::bind_groups::BindGroupLayouts;
use crate::gpu::render::pipelines::Pipelines;
use crate::gpu::render::samplers::Samplers;

use super::core::UniformBuffers;

/// Неизменные за кадр ресурсы, нужные полноэкранным проходам
pub struct PassContext<'a> {
    pub device: &'a wgpu::Device,
    pub layouts: &'a BindGroupLayouts,
    pub pipelines: &'a Pipelines,
    pub samplers: &'a Samplers,
    pub uniforms: &'a UniformBuffers,
}

/// Один полноэкранный треугольник без глубины
pub fn draw_fullscreen(
    encoder: &mut wgpu::CommandEncoder,
    label: &str,
    targets: &[&wgpu::TextureView],
    pipeline: &wgpu::RenderPipeline,
    bind_group: &wgpu::BindGroup,
) {
    let color_attachments: Vec<Option<wgpu::RenderPassColorAttachment>> = targets
        .iter()
        .map(|&view| {
            Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
            })
        })
        .collect();

    let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &color_attachments,
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    });

    pass.set_pipeline(pipeline);
    pass.set_bind_group(0, bind_group, &[]);
    pass.draw(0..3, 0..1);
}
