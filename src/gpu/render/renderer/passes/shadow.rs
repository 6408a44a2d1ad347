use crate::gpu::lighting::CascadedShadowMaps;
use crate::gpu::render::pipelines::Pipelines;
use crate::gpu::scene::Scene;

/// Shadow pass - каждый каскад: очистка слоя, opaque, затем masked
pub fn render(
    encoder: &mut wgpu::CommandEncoder,
    pipelines: &Pipelines,
    csm: &CascadedShadowMaps,
    scene: &Scene,
) {
    for (i, layer) in csm.shadow_maps.layer_views.iter().enumerate() {
        let mut shadow_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(&format!("Shadow Pass {}", i)),
            color_attachments: &[],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: layer,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(0.0), // Reversed-Z
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        shadow_pass.set_pipeline(&pipelines.shadow_opaque);
        shadow_pass.set_bind_group(0, &csm.pass_bind_groups[i], &[]);
        scene.draw_opaque_depth(&mut shadow_pass);

        shadow_pass.set_pipeline(&pipelines.shadow_masked);
        shadow_pass.set_bind_group(0, &csm.pass_bind_groups[i], &[]);
        scene.draw_masked_depth(&mut shadow_pass);
    }
}
