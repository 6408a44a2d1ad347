use crate::gpu::post::HistoryBuffers;
use crate::gpu::render::binding::BindingTable;
use crate::gpu::render::targets::{FrameTargets, RenderTarget};

use super::{draw_fullscreen, PassContext};

/// Temporal resolve - текущий LDR против репроецированной истории
pub fn render(
    encoder: &mut wgpu::CommandEncoder,
    ctx: &PassContext,
    targets: &FrameTargets,
    history: &HistoryBuffers<RenderTarget>,
) {
    let bind_group = BindingTable::new("TAA Bind Group")
        .texture(0, &targets.ldr.view)
        .texture(1, &history.taa_color.previous().view)
        .texture(2, &targets.velocity.view)
        .texture(3, &history.full_depth.current().view)
        .texture(4, &history.full_depth.previous().view)
        .sampler(5, &ctx.samplers.linear_clamp)
        .buffer(6, &ctx.uniforms.taa)
        .build(ctx.device, &ctx.layouts.taa);

    draw_fullscreen(
        encoder,
        "TAA Pass",
        &[&history.taa_color.current().view],
        &ctx.pipelines.taa,
        &bind_group,
    );
}
