use crate::gpu::render::pipelines::Pipelines;
use crate::gpu::render::targets::FrameTargets;
use crate::gpu::scene::Scene;

fn cleared(view: &wgpu::TextureView) -> Option<wgpu::RenderPassColorAttachment> {
    Some(wgpu::RenderPassColorAttachment {
        view,
        resolve_target: None,
        ops: wgpu::Operations {
            load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
            store: wgpu::StoreOp::Store,
        },
    })
}

/// Geometry pass - G-buffer и глубина; velocity очищается явно
pub fn render(
    encoder: &mut wgpu::CommandEncoder,
    pipelines: &Pipelines,
    geometry_bind_group: &wgpu::BindGroup,
    targets: &FrameTargets,
    depth: &wgpu::TextureView,
    scene: &Scene,
) {
    let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("Geometry Pass"),
        color_attachments: &[
            cleared(&targets.diffuse_spec.view),
            cleared(&targets.normal.view),
            cleared(&targets.velocity.view),
        ],
        depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
            view: depth,
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(0.0), // Reversed-Z: clear to 0 instead of 1
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: None,
        }),
        timestamp_writes: None,
        occlusion_query_set: None,
    });

    render_pass.set_pipeline(&pipelines.geometry_opaque);
    render_pass.set_bind_group(0, geometry_bind_group, &[]);
    scene.draw_opaque(&mut render_pass);

    render_pass.set_pipeline(&pipelines.geometry_masked);
    render_pass.set_bind_group(0, geometry_bind_group, &[]);
    scene.draw_masked(&mut render_pass);
}
