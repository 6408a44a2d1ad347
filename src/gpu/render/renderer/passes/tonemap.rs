use crate::gpu::post::HistoryBuffers;
use crate::gpu::render::binding::BindingTable;
use crate::gpu::render::targets::{FrameTargets, RenderTarget};

use super::super::core::LightingResources;
use super::{draw_fullscreen, PassContext};

/// Экспозиция и кривая Лоттеса в LDR (или отладочный вид теней/AO)
pub fn render(
    encoder: &mut wgpu::CommandEncoder,
    ctx: &PassContext,
    lighting: &LightingResources,
    targets: &FrameTargets,
    history: &HistoryBuffers<RenderTarget>,
) {
    // AO этого кадра к этому моменту уже переехал в previous
    let bind_group = BindingTable::new("Tone Map Bind Group")
        .texture(0, &targets.hdr.view)
        .texture(1, &history.ambient_occlusion.previous().view)
        .texture(2, &lighting.csm.shadow_maps.array_view)
        .buffer(3, &lighting.adapted_luminance)
        .buffer(4, &ctx.uniforms.tonemap)
        .build(ctx.device, &ctx.layouts.tonemap);

    draw_fullscreen(encoder, "Tone Map Pass", &[&targets.ldr.view], &ctx.pipelines.tonemap, &bind_group);
}
