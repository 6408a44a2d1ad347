// Цепочка AO в половинном разрешении:
// downsample → оценка → spatial denoise → temporal denoise

use crate::gpu::post::HistoryBuffers;
use crate::gpu::render::binding::BindingTable;
use crate::gpu::render::targets::{FrameTargets, RenderTarget};

use super::{draw_fullscreen, PassContext};

/// Глубина (линейная) и velocity в половинном разрешении, без фильтрации
pub fn downsample(
    encoder: &mut wgpu::CommandEncoder,
    ctx: &PassContext,
    targets: &FrameTargets,
    history: &HistoryBuffers<RenderTarget>,
) {
    let bind_group = BindingTable::new("Depth Downsample Bind Group")
        .texture(0, &history.full_depth.current().view)
        .texture(1, &targets.velocity.view)
        .build(ctx.device, &ctx.layouts.depth_downsample);

    draw_fullscreen(
        encoder,
        "Depth Downsample Pass",
        &[&history.half_depth.current().view, &targets.velocity_half.view],
        &ctx.pipelines.depth_downsample,
        &bind_group,
    );
}

pub fn estimate(
    encoder: &mut wgpu::CommandEncoder,
    ctx: &PassContext,
    targets: &FrameTargets,
    history: &HistoryBuffers<RenderTarget>,
) {
    let bind_group = BindingTable::new("SSAO Bind Group")
        .texture(0, &history.half_depth.current().view)
        .buffer(1, &ctx.uniforms.ssao)
        .build(ctx.device, &ctx.layouts.ssao);

    draw_fullscreen(encoder, "SSAO Pass", &[&targets.ao_raw.view], &ctx.pipelines.ssao, &bind_group);
}

/// Размытие с учётом разрывов глубины
pub fn spatial_denoise(
    encoder: &mut wgpu::CommandEncoder,
    ctx: &PassContext,
    targets: &FrameTargets,
    history: &HistoryBuffers<RenderTarget>,
) {
    let bind_group = BindingTable::new("AO Spatial Bind Group")
        .texture(0, &targets.ao_raw.view)
        .texture(1, &history.half_depth.current().view)
        .buffer(2, &ctx.uniforms.ao_denoise)
        .build(ctx.device, &ctx.layouts.ao_spatial);

    draw_fullscreen(
        encoder,
        "AO Spatial Denoise Pass",
        &[&targets.ao_spatial.view],
        &ctx.pipelines.ao_spatial,
        &bind_group,
    );
}

/// Смешивание с репроецированным AO прошлого кадра
pub fn temporal_denoise(
    encoder: &mut wgpu::CommandEncoder,
    ctx: &PassContext,
    targets: &FrameTargets,
    history: &HistoryBuffers<RenderTarget>,
) {
    let bind_group = BindingTable::new("AO Temporal Bind Group")
        .texture(0, &targets.ao_spatial.view)
        .texture(1, &history.ambient_occlusion.previous().view)
        .texture(2, &history.half_depth.current().view)
        .texture(3, &history.half_depth.previous().view)
        .texture(4, &targets.velocity_half.view)
        .sampler(5, &ctx.samplers.linear_clamp)
        .buffer(6, &ctx.uniforms.ao_denoise)
        .build(ctx.device, &ctx.layouts.ao_temporal);

    draw_fullscreen(
        encoder,
        "AO Temporal Denoise Pass",
        &[&history.ambient_occlusion.current().view],
        &ctx.pipelines.ao_temporal,
        &bind_group,
    );
}
