use crate::gpu::render::binding::BindingTable;
use crate::gpu::render::targets::MipTarget;

use super::{draw_fullscreen, PassContext};

/// Цепочка мипов диффузного света: каждый уровень из предыдущего, 2x вниз
pub fn render(encoder: &mut wgpu::CommandEncoder, ctx: &PassContext, target: &MipTarget) {
    for level in 1..target.level_views.len() {
        let bind_group = BindingTable::new("Mipmap Bind Group")
            .texture(0, &target.level_views[level - 1])
            .sampler(1, &ctx.samplers.linear_clamp)
            .build(ctx.device, &ctx.layouts.mipmap);

        draw_fullscreen(
            encoder,
            &format!("Diffuse Light Mip {}", level),
            &[&target.level_views[level]],
            &ctx.pipelines.mipmap,
            &bind_group,
        );
    }
}
