use crate::gpu::post::{HistoryBuffers, SmaaAreaTexture};
use crate::gpu::render::binding::BindingTable;
use crate::gpu::render::targets::{FrameTargets, RenderTarget};

use super::{draw_fullscreen, PassContext};

/// Рёбра по яркости LDR кадра
pub fn edges(encoder: &mut wgpu::CommandEncoder, ctx: &PassContext, targets: &FrameTargets) {
    let bind_group = BindingTable::new("SMAA Edges Bind Group")
        .texture(0, &targets.ldr.view)
        .buffer(1, &ctx.uniforms.smaa)
        .build(ctx.device, &ctx.layouts.smaa_edges);

    draw_fullscreen(
        encoder,
        "SMAA Edges Pass",
        &[&targets.smaa_edges.view],
        &ctx.pipelines.smaa_edges,
        &bind_group,
    );
}

pub fn weights(
    encoder: &mut wgpu::CommandEncoder,
    ctx: &PassContext,
    area: &SmaaAreaTexture,
    targets: &FrameTargets,
) {
    let bind_group = BindingTable::new("SMAA Weights Bind Group")
        .texture(0, &targets.smaa_edges.view)
        .texture(1, &area.view)
        .sampler(2, &ctx.samplers.linear_clamp)
        .buffer(3, &ctx.uniforms.smaa)
        .build(ctx.device, &ctx.layouts.smaa_weights);

    draw_fullscreen(
        encoder,
        "SMAA Weights Pass",
        &[&targets.smaa_weights.view],
        &ctx.pipelines.smaa_weights,
        &bind_group,
    );
}

/// Сглаженный кадр пишется в current истории SMAA: T2x смешивает его со следующим
pub fn blend(
    encoder: &mut wgpu::CommandEncoder,
    ctx: &PassContext,
    targets: &FrameTargets,
    history: &HistoryBuffers<RenderTarget>,
) {
    let bind_group = BindingTable::new("SMAA Blend Bind Group")
        .texture(0, &targets.ldr.view)
        .texture(1, &targets.smaa_weights.view)
        .texture(2, &targets.velocity.view)
        .sampler(3, &ctx.samplers.linear_clamp)
        .buffer(4, &ctx.uniforms.smaa)
        .build(ctx.device, &ctx.layouts.smaa_blend);

    draw_fullscreen(
        encoder,
        "SMAA Blend Pass",
        &[&history.smaa_color.current().view],
        &ctx.pipelines.smaa_blend,
        &bind_group,
    );
}

/// T2x: текущий и прошлый сглаженные кадры с учётом движения
pub fn temporal_resolve(
    encoder: &mut wgpu::CommandEncoder,
    ctx: &PassContext,
    targets: &FrameTargets,
    history: &HistoryBuffers<RenderTarget>,
) {
    let bind_group = BindingTable::new("SMAA Temporal Bind Group")
        .texture(0, &history.smaa_color.current().view)
        .texture(1, &history.smaa_color.previous().view)
        .texture(2, &targets.velocity.view)
        .sampler(3, &ctx.samplers.linear_clamp)
        .buffer(4, &ctx.uniforms.smaa)
        .build(ctx.device, &ctx.layouts.smaa_temporal);

    draw_fullscreen(
        encoder,
        "SMAA Temporal Pass",
        &[&targets.smaa_resolve.view],
        &ctx.pipelines.smaa_temporal,
        &bind_group,
    );
}
