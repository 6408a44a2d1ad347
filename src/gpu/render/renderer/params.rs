// ============================================
// Frame Params - Всё, что кадр передаёт на GPU
// ============================================
// Собирается из настроек и камеры без обращения к GPU,
// поэтому проверяется тестами целиком.

use ultraviolet::{Mat4, Vec2, Vec3};

use crate::gpu::camera::Camera;
use crate::gpu::core::config::{CAMERA_NEAR, SHADOW_MAP_SIZE, WHITE_POINT};
use crate::gpu::core::settings::RenderSettings;
use crate::gpu::lighting::{
    fit_cascades, scene_point_lights, CascadeCamera, CascadePartition, PointLight, ShadowLookup, SunLight,
};
use crate::gpu::post::{
    cross_talk_coefficient, jitter, jitter_projection, previous_jitter, AoFrameParams, HistoryKind, HistoryValidity,
    SmaaFrameParams, SmaaMode, ToneCurve,
};

/// Что осталось от прошлого кадра
#[derive(Debug, Default)]
pub struct PreviousFrame {
    /// None на первом кадре и после resize
    pub view_proj: Option<Mat4>,
    pub history: HistoryValidity,
}

/// Параметры фильтрации теней
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowParams {
    pub bias: f32,
    pub normal_offset_bias: f32,
    pub filter_size: f32,
    pub light_width: f32,
}

/// Экспозиция, кривая и отладочные виды
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneParams {
    pub curve: ToneCurve,
    pub exposure: f32,
    pub white_point: f32,
    pub cross_talk: f32,
    pub eye_adaptation: bool,
    pub show_shadow_map: bool,
    pub show_ao: bool,
    pub debug_cascade: usize,
}

#[derive(Debug, Clone)]
pub struct FrameParams {
    pub frame: u64,
    pub width: u32,
    pub height: u32,
    pub delta_time: f32,

    /// Проекция с jitter
    pub projection: Mat4,
    pub view_proj: Mat4,
    pub prev_view_proj: Mat4,
    pub jitter: Vec2,
    pub prev_jitter: Vec2,
    pub camera_position: Vec3,
    pub normal_mapping: bool,

    /// Матрицы света по каскадам
    pub cascades: Vec<Mat4>,
    /// Дальние границы каскадов как положительные расстояния
    pub cascade_far: Vec<f32>,
    pub lookup: ShadowLookup,
    pub sun: SunLight,
    pub point_lights: Vec<PointLight>,
    pub shadow: ShadowParams,

    /// None - цепочка AO выключена
    pub ao: Option<AoFrameParams>,
    pub tone: ToneParams,
    /// 1.0 пока история TAA не записана
    pub taa_blend_rate: f32,
    /// None - SMAA выключен
    pub smaa: Option<SmaaFrameParams>,
}

impl FrameParams {
    pub fn build(
        settings: &RenderSettings,
        camera: &Camera,
        partition: &CascadePartition,
        frame: u64,
        delta_time: f32,
        (width, height): (u32, u32),
        previous: &PreviousFrame,
    ) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        let aspect = width as f32 / height as f32;
        let view = camera.view_matrix();

        let (jitter, prev_jitter) = match settings.active_jitter() {
            Some(pattern) => (
                jitter(pattern, frame, width, height),
                previous_jitter(pattern, frame, width, height),
            ),
            None => (Vec2::zero(), Vec2::zero()),
        };
        let projection = jitter_projection(camera.projection_matrix(aspect, CAMERA_NEAR), jitter);
        let view_proj = projection * view;

        let sun = SunLight::new(settings.sun_position);
        let cascade_camera = CascadeCamera {
            view,
            vertical_fov: camera.fov_deg().to_radians(),
            aspect,
        };
        let cascades = fit_cascades(partition, &cascade_camera, SHADOW_MAP_SIZE, sun.direction(), Camera::world_up());
        let lookup = ShadowLookup::from_cascades(&cascades);
        let cascade_far = partition.far_limits().iter().map(|limit| -limit).collect();

        // Эффект только что включён: previous содержит чужой кадр, берём только текущий
        let history = &previous.history;
        let ao_rate = if history.is_valid(HistoryKind::AmbientOcclusion) {
            settings.ao_rate_of_change
        } else {
            1.0
        };
        let ao = settings
            .ambient_occlusion
            .then(|| AoFrameParams::new(settings.ao_radius, ao_rate, frame));
        let taa_blend_rate = if history.is_valid(HistoryKind::TaaColor) {
            settings.taa_blend_rate
        } else {
            1.0
        };
        let smaa = (settings.smaa != SmaaMode::Off).then(|| {
            SmaaFrameParams::new(
                settings.smaa,
                settings.smaa_subsample_indices,
                frame,
                history.is_valid(HistoryKind::SmaaColor),
            )
        });

        Self {
            frame,
            width,
            height,
            delta_time,
            projection,
            view_proj,
            prev_view_proj: previous.view_proj.unwrap_or(view_proj),
            jitter,
            prev_jitter,
            camera_position: camera.position,
            normal_mapping: settings.normal_mapping,
            cascades,
            cascade_far,
            lookup,
            sun,
            point_lights: scene_point_lights(),
            shadow: ShadowParams {
                bias: settings.shadow_bias,
                normal_offset_bias: settings.normal_offset_bias,
                filter_size: settings.shadow_filter_size,
                light_width: settings.light_width,
            },
            ao,
            tone: ToneParams {
                curve: ToneCurve::solve(WHITE_POINT),
                exposure: settings.exposure,
                white_point: WHITE_POINT,
                cross_talk: cross_talk_coefficient(WHITE_POINT),
                eye_adaptation: settings.eye_adaptation,
                show_shadow_map: settings.show_shadow_map,
                show_ao: settings.show_ao,
                debug_cascade: settings.debug_cascade,
            },
            taa_blend_rate,
            smaa,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::core::config::{CASCADE_FAR, CASCADE_NEAR, NUM_CASCADES};
    use crate::gpu::post::temporal_rotation;
    use crate::gpu::render::renderer::plan::{FramePlan, Stage};
    use crate::gpu::render::uniforms::{GeometryUniform, ShadingUniform, SmaaUniform, TaaUniform, ToneMapUniform};

    fn partition() -> CascadePartition {
        CascadePartition::compute_view_space_limits(CASCADE_NEAR, CASCADE_FAR, NUM_CASCADES)
    }

    fn build(settings: &RenderSettings, frame: u64, prev: Option<Mat4>) -> FrameParams {
        let previous = PreviousFrame {
            view_proj: prev,
            ..Default::default()
        };
        build_after(settings, frame, &previous)
    }

    fn build_after(settings: &RenderSettings, frame: u64, previous: &PreviousFrame) -> FrameParams {
        let camera = Camera::new(Vec3::new(0.0, 2.0, 3.0));
        FrameParams::build(settings, &camera, &partition(), frame, 0.016, (1280, 720), previous)
    }

    /// Прогоняет кадр: история записана тем, что план этого кадра swap'нул
    fn render(settings: &RenderSettings, frame: u64, previous: &mut PreviousFrame) -> FrameParams {
        let params = build_after(settings, frame, previous);
        previous.view_proj = Some(params.view_proj);
        previous.history.advance(FramePlan::new(settings).swaps());
        params
    }

    #[test]
    fn test_no_jitter_without_taa() {
        let settings = RenderSettings {
            taa: false,
            ..Default::default()
        };
        let params = build(&settings, 3, None);
        assert_eq!(params.jitter, Vec2::zero());
        assert_eq!(params.prev_jitter, Vec2::zero());
    }

    #[test]
    fn test_jitter_follows_pattern() {
        let settings = RenderSettings::default();
        let params = build(&settings, 5, None);
        assert_eq!(params.jitter, jitter(settings.jitter_pattern, 5, 1280, 720));
        assert_eq!(params.prev_jitter, jitter(settings.jitter_pattern, 4, 1280, 720));
        assert_ne!(params.jitter, Vec2::zero());
    }

    #[test]
    fn test_first_frame_reuses_current_matrix() {
        let params = build(&RenderSettings::default(), 0, None);
        assert_eq!(params.prev_view_proj, params.view_proj);
    }

    #[test]
    fn test_cascade_far_is_positive_and_increasing() {
        let params = build(&RenderSettings::default(), 0, None);
        assert_eq!(params.cascades.len(), NUM_CASCADES);
        assert_eq!(params.cascade_far.len(), NUM_CASCADES);
        for pair in params.cascade_far.windows(2) {
            assert!(pair[0] > 0.0 && pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_ao_params_only_when_enabled() {
        let mut settings = RenderSettings::default();
        let params = build(&settings, 7, None);
        let ao = params.ao.expect("AO enabled by default");
        assert_eq!(ao.rotation, temporal_rotation(7));
        assert_eq!(ao.radius, settings.ao_radius);

        settings.ambient_occlusion = false;
        assert!(build(&settings, 7, None).ao.is_none());
        assert!(build(&settings, 7, None).ao_uniforms().is_none());
    }

    #[test]
    fn test_tone_params_use_white_point() {
        let params = build(&RenderSettings::default(), 0, None);
        assert_eq!(params.tone.white_point, WHITE_POINT);
        assert_eq!(params.tone.cross_talk, WHITE_POINT * (WHITE_POINT - 1.0));
        assert!((params.tone.curve.evaluate(WHITE_POINT) - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_static_frames_are_identical_without_temporal_features() {
        let settings = RenderSettings {
            taa: false,
            ambient_occlusion: false,
            eye_adaptation: false,
            ..Default::default()
        };
        let first = build(&settings, 10, None);
        let second = build(&settings, 11, Some(first.view_proj));

        assert_eq!(
            bytemuck::bytes_of(&GeometryUniform::from(&first)),
            bytemuck::bytes_of(&GeometryUniform::from(&second)),
        );
        assert_eq!(
            bytemuck::bytes_of(&ShadingUniform::from(&first)),
            bytemuck::bytes_of(&ShadingUniform::from(&second)),
        );
        assert_eq!(
            bytemuck::bytes_of(&ToneMapUniform::from(&first)),
            bytemuck::bytes_of(&ToneMapUniform::from(&second)),
        );
        assert_eq!(
            bytemuck::bytes_of(&TaaUniform::from(&first)),
            bytemuck::bytes_of(&TaaUniform::from(&second)),
        );
        assert_eq!(first.cascades, second.cascades);

        // Без временных эффектов в плане нет ни resolve, ни swap истории
        let plan = FramePlan::new(&settings);
        assert_eq!(plan.swaps().count(), 0);
        for stage in [Stage::AoTemporalDenoise, Stage::TemporalResolve, Stage::SmaaTemporalResolve] {
            assert!(!plan.contains(stage));
        }
        assert!(first.smaa.is_none() && first.ao.is_none());
    }

    #[test]
    fn test_reenabled_features_ignore_stale_history() {
        let mut settings = RenderSettings::default();
        let mut previous = PreviousFrame::default();

        // Первый кадр: истории ещё нет
        let first = render(&settings, 0, &mut previous);
        assert_eq!(first.taa_blend_rate, 1.0);
        assert_eq!(first.ao.map(|ao| ao.rate_of_change), Some(1.0));

        let steady = render(&settings, 1, &mut previous);
        assert_eq!(steady.taa_blend_rate, settings.taa_blend_rate);
        assert_eq!(steady.ao.map(|ao| ao.rate_of_change), Some(settings.ao_rate_of_change));

        settings.taa = false;
        settings.ambient_occlusion = false;
        render(&settings, 2, &mut previous);

        // Выкл → вкл: один кадр без смешивания с устаревшим previous
        settings.taa = true;
        settings.ambient_occlusion = true;
        let reenabled = render(&settings, 3, &mut previous);
        assert_eq!(reenabled.taa_blend_rate, 1.0);
        assert_eq!(reenabled.ao.map(|ao| ao.rate_of_change), Some(1.0));

        let after = render(&settings, 4, &mut previous);
        assert_eq!(after.taa_blend_rate, settings.taa_blend_rate);
    }

    #[test]
    fn test_smaa_t2x_history_after_mode_switch() {
        let mut settings = RenderSettings {
            smaa: SmaaMode::X1,
            taa: false,
            ..Default::default()
        };
        let mut previous = PreviousFrame::default();
        render(&settings, 0, &mut previous);

        settings.smaa = SmaaMode::T2x;
        let switched = render(&settings, 1, &mut previous);
        assert_eq!(SmaaUniform::from(&switched).history_weight, 0.0);

        let steady = render(&settings, 2, &mut previous);
        assert_eq!(SmaaUniform::from(&steady).history_weight, 1.0);
    }

    #[test]
    fn test_smaa_jitter() {
        let x1 = RenderSettings {
            smaa: SmaaMode::X1,
            taa: false,
            ..Default::default()
        };
        assert_eq!(build(&x1, 5, None).jitter, Vec2::zero());

        let t2x = RenderSettings {
            smaa: SmaaMode::T2x,
            taa: false,
            jitter_pattern: crate::gpu::post::JitterPattern::Halton,
            ..Default::default()
        };
        let params = build(&t2x, 5, None);
        assert_eq!(params.jitter, jitter(crate::gpu::post::JitterPattern::Flip, 5, 1280, 720));
        assert_eq!(params.prev_jitter, -params.jitter);
    }
}
