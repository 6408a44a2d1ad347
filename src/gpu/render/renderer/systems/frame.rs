use crate::gpu::core::config::EYE_ADAPTATION_RATE;
use crate::gpu::render::uniforms::{
    EyeAdaptationUniform, GeometryUniform, ShadingUniform, SmaaUniform, TaaUniform, ToneMapUniform,
};

use crate::gpu::render::renderer::core::{LightingResources, ScreenResources, UniformBuffers};
use crate::gpu::render::renderer::params::FrameParams;
use crate::gpu::render::renderer::plan::{FramePlan, Stage};

/// Запись uniform'ов кадра до кодирования проходов
pub fn update(
    queue: &wgpu::Queue,
    params: &FrameParams,
    plan: &FramePlan,
    lighting: &LightingResources,
    uniforms: &UniformBuffers,
    screen: &ScreenResources,
) {
    // Shadows
    lighting.csm.update(queue, &params.cascades);

    queue.write_buffer(&uniforms.geometry, 0, bytemuck::cast_slice(&[GeometryUniform::from(params)]));
    queue.write_buffer(&uniforms.shading, 0, bytemuck::cast_slice(&[ShadingUniform::from(params)]));

    // AO
    if let Some((ssao, denoise)) = params.ao_uniforms() {
        queue.write_buffer(&uniforms.ssao, 0, bytemuck::cast_slice(&[ssao]));
        queue.write_buffer(&uniforms.ao_denoise, 0, bytemuck::cast_slice(&[denoise]));
    }

    if plan.contains(Stage::EyeAdaptation) {
        let eye = EyeAdaptationUniform {
            delta_time: params.delta_time,
            rate: EYE_ADAPTATION_RATE,
            last_mip: screen.targets.diffuse_light.last_level(),
            _pad0: 0,
        };
        queue.write_buffer(&uniforms.eye_adaptation, 0, bytemuck::cast_slice(&[eye]));
    }

    // Post
    queue.write_buffer(&uniforms.tonemap, 0, bytemuck::cast_slice(&[ToneMapUniform::from(params)]));
    queue.write_buffer(&uniforms.taa, 0, bytemuck::cast_slice(&[TaaUniform::from(params)]));
    if params.smaa.is_some() {
        queue.write_buffer(&uniforms.smaa, 0, bytemuck::cast_slice(&[SmaaUniform::from(params)]));
    }
}
