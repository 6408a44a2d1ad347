// ============================================
// Uniforms - Структуры uniform буферов для каждого прохода
// ============================================
// Раскладка совпадает с WGSL: vec3 всегда в паре со скаляром,
// хвосты добиваются скалярными полями.

use bytemuck::{Pod, Zeroable};
use ultraviolet::Vec3;

use crate::gpu::core::config::{CAMERA_NEAR, NUM_CASCADES, SHADOW_MAP_SIZE, SKY_COLOR};
use crate::gpu::render::renderer::FrameParams;

fn vec4(v: Vec3, w: f32) -> [f32; 4] {
    [v.x, v.y, v.z, w]
}

/// Geometry pass: текущая и прошлая матрицы + jitter для velocity
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct GeometryUniform {
    pub view_proj: [[f32; 4]; 4],
    pub prev_view_proj: [[f32; 4]; 4],
    pub jitter: [f32; 2],
    pub prev_jitter: [f32; 2],
    pub normal_mapping: u32,
    pub _pad0: u32,
    pub _pad1: u32,
    pub _pad2: u32,
}

impl From<&FrameParams> for GeometryUniform {
    fn from(params: &FrameParams) -> Self {
        Self {
            view_proj: params.view_proj.into(),
            prev_view_proj: params.prev_view_proj.into(),
            jitter: [params.jitter.x, params.jitter.y],
            prev_jitter: [params.prev_jitter.x, params.prev_jitter.y],
            normal_mapping: params.normal_mapping as u32,
            _pad0: 0,
            _pad1: 0,
            _pad2: 0,
        }
    }
}

/// Оценка AO в половинном разрешении
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct SsaoUniform {
    /// (1/P00, 1/P11): NDC → view space при известной дистанции
    pub view_scale: [f32; 2],
    pub half_size: [f32; 2],
    pub radius: f32,
    pub rotation: f32,
    pub _pad0: f32,
    pub _pad1: f32,
}

/// Spatial + temporal denoise
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct AoDenoiseUniform {
    pub half_size: [f32; 2],
    pub near: f32,
    pub rate_of_change: f32,
}

impl FrameParams {
    /// Uniform'ы цепочки AO (None если AO выключен)
    pub fn ao_uniforms(&self) -> Option<(SsaoUniform, AoDenoiseUniform)> {
        let ao = self.ao?;
        let half = [(self.width / 2).max(1) as f32, (self.height / 2).max(1) as f32];

        let ssao = SsaoUniform {
            view_scale: [1.0 / self.projection.cols[0].x, 1.0 / self.projection.cols[1].y],
            half_size: half,
            radius: ao.radius,
            rotation: ao.rotation,
            _pad0: 0.0,
            _pad1: 0.0,
        };
        let denoise = AoDenoiseUniform {
            half_size: half,
            near: CAMERA_NEAR,
            rate_of_change: ao.rate_of_change,
        };
        Some((ssao, denoise))
    }
}

// В WGSL cascade_far объявлен как vec4<f32>
const _: () = assert!(NUM_CASCADES == 4);

/// Deferred shading: CSM lookup, свет, параметры фильтра
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ShadingUniform {
    pub inv_view_proj: [[f32; 4]; 4],
    pub reference_shadow: [[f32; 4]; 4],
    pub cascade_scale: [[f32; 4]; NUM_CASCADES],
    pub cascade_offset: [[f32; 4]; NUM_CASCADES],
    pub cascade_far: [f32; NUM_CASCADES],
    pub point_light_position: [[f32; 4]; 4],
    pub point_light_color: [[f32; 4]; 4],
    pub camera_position: [f32; 3],
    pub near: f32,
    /// Направление НА источник
    pub to_sun: [f32; 3],
    pub light_width: f32,
    pub sun_color: [f32; 3],
    pub shadow_bias: f32,
    pub sky_color: [f32; 3],
    pub normal_offset_bias: f32,
    pub filter_size: f32,
    pub enable_ao: u32,
    pub shadow_map_size: f32,
    pub num_point_lights: u32,
}

impl From<&FrameParams> for ShadingUniform {
    fn from(params: &FrameParams) -> Self {
        let mut cascade_scale = [[0.0; 4]; NUM_CASCADES];
        let mut cascade_offset = [[0.0; 4]; NUM_CASCADES];
        let mut cascade_far = [0.0; NUM_CASCADES];
        for i in 0..NUM_CASCADES.min(params.lookup.scales.len()) {
            cascade_scale[i] = vec4(params.lookup.scales[i], 0.0);
            cascade_offset[i] = vec4(params.lookup.offsets[i], 0.0);
            cascade_far[i] = params.cascade_far[i];
        }

        let mut point_light_position = [[0.0; 4]; 4];
        let mut point_light_color = [[0.0; 4]; 4];
        for (i, light) in params.point_lights.iter().take(4).enumerate() {
            point_light_position[i] = vec4(light.position, 1.0);
            point_light_color[i] = vec4(light.color, 0.0);
        }

        Self {
            inv_view_proj: params.view_proj.inversed().into(),
            reference_shadow: params.lookup.reference.into(),
            cascade_scale,
            cascade_offset,
            cascade_far,
            point_light_position,
            point_light_color,
            camera_position: params.camera_position.into(),
            near: CAMERA_NEAR,
            to_sun: (-params.sun.direction()).into(),
            light_width: params.shadow.light_width,
            sun_color: params.sun.color.into(),
            shadow_bias: params.shadow.bias,
            sky_color: [SKY_COLOR[0] as f32, SKY_COLOR[1] as f32, SKY_COLOR[2] as f32],
            normal_offset_bias: params.shadow.normal_offset_bias,
            filter_size: params.shadow.filter_size,
            enable_ao: params.ao.is_some() as u32,
            shadow_map_size: SHADOW_MAP_SIZE as f32,
            num_point_lights: params.point_lights.len().min(4) as u32,
        }
    }
}

/// Адаптация глаза (compute)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct EyeAdaptationUniform {
    pub delta_time: f32,
    pub rate: f32,
    pub last_mip: u32,
    pub _pad0: u32,
}

/// Экспозиция, кривая Лоттеса, отладочные виды
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ToneMapUniform {
    pub lottes: [f32; 4],
    pub exposure: f32,
    pub white_point: f32,
    pub cross_talk: f32,
    pub eye_adaptation: u32,
    pub show_shadow_map: u32,
    pub show_ao: u32,
    pub cascade: u32,
    pub _pad0: u32,
}

impl From<&FrameParams> for ToneMapUniform {
    fn from(params: &FrameParams) -> Self {
        let tone = &params.tone;
        Self {
            lottes: tone.curve.to_array(),
            exposure: tone.exposure,
            white_point: tone.white_point,
            cross_talk: tone.cross_talk,
            eye_adaptation: tone.eye_adaptation as u32,
            show_shadow_map: tone.show_shadow_map as u32,
            show_ao: tone.show_ao as u32,
            cascade: tone.debug_cascade as u32,
            _pad0: 0,
        }
    }
}

/// Temporal resolve
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct TaaUniform {
    pub blend_rate: f32,
    pub near: f32,
    pub _pad0: f32,
    pub _pad1: f32,
}

impl From<&FrameParams> for TaaUniform {
    fn from(params: &FrameParams) -> Self {
        Self {
            blend_rate: params.taa_blend_rate,
            near: CAMERA_NEAR,
            _pad0: 0.0,
            _pad1: 0.0,
        }
    }
}

/// Общий uniform проходов SMAA
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct SmaaUniform {
    /// (1/w, 1/h, w, h)
    pub rt_metrics: [f32; 4],
    pub subsample_indices: [f32; 4],
    pub history_weight: f32,
    pub _pad0: f32,
    pub _pad1: f32,
    pub _pad2: f32,
}

impl From<&FrameParams> for SmaaUniform {
    fn from(params: &FrameParams) -> Self {
        let (w, h) = (params.width as f32, params.height as f32);
        let (subsample_indices, history_weight) = params
            .smaa
            .map_or(([0.0; 4], 0.0), |smaa| (smaa.subsample_indices, smaa.history_weight));
        Self {
            rt_metrics: [1.0 / w, 1.0 / h, w, h],
            subsample_indices,
            history_weight,
            _pad0: 0.0,
            _pad1: 0.0,
            _pad2: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_sizes_are_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<GeometryUniform>() % 16, 0);
        assert_eq!(std::mem::size_of::<SsaoUniform>() % 16, 0);
        assert_eq!(std::mem::size_of::<AoDenoiseUniform>() % 16, 0);
        assert_eq!(std::mem::size_of::<ShadingUniform>() % 16, 0);
        assert_eq!(std::mem::size_of::<EyeAdaptationUniform>() % 16, 0);
        assert_eq!(std::mem::size_of::<ToneMapUniform>() % 16, 0);
        assert_eq!(std::mem::size_of::<TaaUniform>() % 16, 0);
        assert_eq!(std::mem::size_of::<SmaaUniform>() % 16, 0);
    }

    #[test]
    fn test_cascade_far_packs_into_one_vec4() {
        let shading = std::mem::size_of::<ShadingUniform>();
        assert_eq!(std::mem::size_of::<[f32; NUM_CASCADES]>(), 16);
        // 2 mat4 + 2 x 4 vec4 + vec4 far + 2 x 4 vec4 lights + 5 vec4 хвост
        assert_eq!(shading, 64 * 2 + 16 * 8 + 16 + 16 * 8 + 16 * 5);
    }

    #[test]
    fn test_geometry_uniform_layout() {
        assert_eq!(std::mem::size_of::<GeometryUniform>(), 160);
        assert_eq!(std::mem::size_of::<ToneMapUniform>(), 48);
        assert_eq!(std::mem::size_of::<SmaaUniform>(), 48);
    }
}
