use crate::gpu::post::HistoryBuffers;
use crate::gpu::render::binding::BindingTable;
use crate::gpu::render::targets::{FrameTargets, RenderTarget};

use super::super::core::LightingResources;
use super::{draw_fullscreen, PassContext};

/// Deferred shading - HDR цвет и яркость диффузного света (уровень 0)
pub fn render(
    encoder: &mut wgpu::CommandEncoder,
    ctx: &PassContext,
    lighting: &LightingResources,
    targets: &FrameTargets,
    history: &HistoryBuffers<RenderTarget>,
) {
    let shadow_maps = &lighting.csm.shadow_maps;

    // AO привязан всегда; при выключенном AO шейдер его не читает
    let bind_group = BindingTable::new("Shading Bind Group")
        .texture(0, &targets.diffuse_spec.view)
        .texture(1, &targets.normal.view)
        .texture(2, &history.full_depth.current().view)
        .texture(3, &shadow_maps.array_view)
        .sampler(4, &shadow_maps.compare_sampler)
        .sampler(5, &shadow_maps.depth_sampler)
        .texture(6, &lighting.random_angles.view)
        .texture(7, &history.ambient_occlusion.current().view)
        .buffer(8, &ctx.uniforms.shading)
        .build(ctx.device, &ctx.layouts.shading);

    draw_fullscreen(
        encoder,
        "Shading Pass",
        &[&targets.hdr.view, &targets.diffuse_light.level_views[0]],
        &ctx.pipelines.shading,
        &bind_group,
    );
}
