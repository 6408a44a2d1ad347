use crate::gpu::render::binding::BindingTable;

use super::{draw_fullscreen, PassContext};

/// Копия готового кадра в back buffer
pub fn render(
    encoder: &mut wgpu::CommandEncoder,
    ctx: &PassContext,
    source: &wgpu::TextureView,
    surface_view: &wgpu::TextureView,
) {
    let bind_group = BindingTable::new("Present Bind Group")
        .texture(0, source)
        .build(ctx.device, &ctx.layouts.present);

    draw_fullscreen(encoder, "Present Pass", &[surface_view], &ctx.pipelines.present, &bind_group);
}
