use crate::gpu::render::binding::BindingTable;
use crate::gpu::render::targets::FrameTargets;

use super::super::core::LightingResources;
use super::PassContext;

/// Интегрирует среднюю яркость (последний мип) в адаптированное значение
pub fn render(
    encoder: &mut wgpu::CommandEncoder,
    ctx: &PassContext,
    lighting: &LightingResources,
    targets: &FrameTargets,
) {
    let bind_group = BindingTable::new("Eye Adaptation Bind Group")
        .texture(0, &targets.diffuse_light.view)
        .buffer(1, &lighting.adapted_luminance)
        .buffer(2, &ctx.uniforms.eye_adaptation)
        .build(ctx.device, &ctx.layouts.eye_adaptation);

    let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
        label: Some("Eye Adaptation Pass"),
        timestamp_writes: None,
    });
    pass.set_pipeline(&ctx.pipelines.eye_adaptation);
    pass.set_bind_group(0, &bind_group, &[]);
    pass.dispatch_workgroups(1, 1, 1);
}
