// ============================================
// Frame Plan - Порядок проходов кадра
// ============================================
// План строится из настроек как чистые данные; рендерер только
// исполняет стадии по порядку. Точки swap истории входят в план.

use crate::gpu::core::settings::RenderSettings;
use crate::gpu::post::{HistoryKind, SmaaMode};

/// Что выводится на экран
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentSource {
    ToneMapped,
    TemporalResolve,
    SmaaBlend,
    SmaaResolve,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Shadow,
    Geometry,
    DepthDownsample,
    AoEstimate,
    AoSpatialDenoise,
    AoTemporalDenoise,
    Shading,
    DiffuseLightMips,
    EyeAdaptation,
    ToneMap,
    TemporalResolve,
    SmaaEdges,
    SmaaWeights,
    SmaaBlend,
    SmaaTemporalResolve,
    Present(PresentSource),
    SwapHistory(HistoryKind),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramePlan {
    stages: Vec<Stage>,
}

impl FramePlan {
    pub fn new(settings: &RenderSettings) -> Self {
        let mut stages = vec![Stage::Shadow, Stage::Geometry];

        if settings.ambient_occlusion {
            stages.extend([
                Stage::DepthDownsample,
                Stage::AoEstimate,
                Stage::AoSpatialDenoise,
                Stage::AoTemporalDenoise,
                Stage::SwapHistory(HistoryKind::HalfDepth),
            ]);
        }

        stages.extend([Stage::Shading, Stage::DiffuseLightMips]);
        if settings.ambient_occlusion {
            // После swap свежий AO виден как previous (так его читает отладочный вид)
            stages.push(Stage::SwapHistory(HistoryKind::AmbientOcclusion));
        }

        if settings.eye_adaptation {
            stages.push(Stage::EyeAdaptation);
        }
        stages.push(Stage::ToneMap);

        // Отладочный вид выводится как есть, без сглаживания
        if settings.debug_view() {
            stages.push(Stage::Present(PresentSource::ToneMapped));
        } else if settings.smaa != SmaaMode::Off {
            stages.extend([Stage::SmaaEdges, Stage::SmaaWeights, Stage::SmaaBlend]);
            if settings.smaa == SmaaMode::T2x {
                stages.extend([
                    Stage::SmaaTemporalResolve,
                    Stage::Present(PresentSource::SmaaResolve),
                    Stage::SwapHistory(HistoryKind::SmaaColor),
                ]);
            } else {
                stages.push(Stage::Present(PresentSource::SmaaBlend));
            }
        } else if settings.taa {
            stages.extend([
                Stage::TemporalResolve,
                Stage::Present(PresentSource::TemporalResolve),
                Stage::SwapHistory(HistoryKind::TaaColor),
                Stage::SwapHistory(HistoryKind::FullDepth),
            ]);
        } else {
            stages.push(Stage::Present(PresentSource::ToneMapped));
        }

        Self { stages }
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn contains(&self, stage: Stage) -> bool {
        self.stages.contains(&stage)
    }

    /// Истории, которые этот кадр записывает
    pub fn swaps(&self) -> impl Iterator<Item = HistoryKind> + '_ {
        self.stages.iter().filter_map(|stage| match stage {
            Stage::SwapHistory(kind) => Some(*kind),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(plan: &FramePlan, stage: Stage) -> Option<usize> {
        plan.stages().iter().position(|s| *s == stage)
    }

    fn settings(ao: bool, taa: bool, eye: bool) -> RenderSettings {
        RenderSettings {
            ambient_occlusion: ao,
            taa,
            eye_adaptation: eye,
            ..Default::default()
        }
    }

    #[test]
    fn test_full_plan_order() {
        let plan = FramePlan::new(&settings(true, true, true));
        assert_eq!(
            plan.stages(),
            &[
                Stage::Shadow,
                Stage::Geometry,
                Stage::DepthDownsample,
                Stage::AoEstimate,
                Stage::AoSpatialDenoise,
                Stage::AoTemporalDenoise,
                Stage::SwapHistory(HistoryKind::HalfDepth),
                Stage::Shading,
                Stage::DiffuseLightMips,
                Stage::SwapHistory(HistoryKind::AmbientOcclusion),
                Stage::EyeAdaptation,
                Stage::ToneMap,
                Stage::TemporalResolve,
                Stage::Present(PresentSource::TemporalResolve),
                Stage::SwapHistory(HistoryKind::TaaColor),
                Stage::SwapHistory(HistoryKind::FullDepth),
            ]
        );
    }

    #[test]
    fn test_disabled_features_leave_no_temporal_stages() {
        let plan = FramePlan::new(&settings(false, false, false));
        assert_eq!(
            plan.stages(),
            &[
                Stage::Shadow,
                Stage::Geometry,
                Stage::Shading,
                Stage::DiffuseLightMips,
                Stage::ToneMap,
                Stage::Present(PresentSource::ToneMapped),
            ]
        );
        assert!(!plan.stages().iter().any(|s| matches!(s, Stage::SwapHistory(_))));
    }

    #[test]
    fn test_shadow_before_geometry_before_shading() {
        let plan = FramePlan::new(&RenderSettings::default());
        let shadow = position(&plan, Stage::Shadow);
        let geometry = position(&plan, Stage::Geometry);
        let shading = position(&plan, Stage::Shading);
        assert!(shadow < geometry && geometry < shading);
    }

    #[test]
    fn test_ao_chain_precedes_shading() {
        let plan = FramePlan::new(&settings(true, false, false));
        let temporal = position(&plan, Stage::AoTemporalDenoise);
        let swap_depth = position(&plan, Stage::SwapHistory(HistoryKind::HalfDepth));
        let shading = position(&plan, Stage::Shading);
        let swap_ao = position(&plan, Stage::SwapHistory(HistoryKind::AmbientOcclusion));
        assert!(temporal < swap_depth && swap_depth < shading && shading < swap_ao);
    }

    #[test]
    fn test_debug_view_bypasses_taa() {
        let mut s = settings(true, true, false);
        s.show_shadow_map = true;
        let plan = FramePlan::new(&s);
        assert!(!plan.contains(Stage::TemporalResolve));
        assert!(plan.contains(Stage::Present(PresentSource::ToneMapped)));

        s.show_shadow_map = false;
        s.show_ao = true;
        assert!(!FramePlan::new(&s).contains(Stage::TemporalResolve));
    }

    #[test]
    fn test_present_is_after_tone_map_exactly_once() {
        for (ao, taa, eye) in [(true, true, true), (false, true, false), (true, false, true)] {
            let plan = FramePlan::new(&settings(ao, taa, eye));
            let presents = plan.stages().iter().filter(|s| matches!(s, Stage::Present(_))).count();
            assert_eq!(presents, 1);
            let tone = position(&plan, Stage::ToneMap);
            let present = plan.stages().iter().position(|s| matches!(s, Stage::Present(_)));
            assert!(tone < present);
        }
    }

    fn smaa(mode: SmaaMode) -> RenderSettings {
        RenderSettings {
            smaa: mode,
            taa: false,
            ..settings(false, false, false)
        }
    }

    #[test]
    fn test_smaa_x1_order() {
        let plan = FramePlan::new(&smaa(SmaaMode::X1));
        assert_eq!(
            &plan.stages()[4..],
            &[
                Stage::ToneMap,
                Stage::SmaaEdges,
                Stage::SmaaWeights,
                Stage::SmaaBlend,
                Stage::Present(PresentSource::SmaaBlend),
            ]
        );
        assert_eq!(plan.swaps().count(), 0);
    }

    #[test]
    fn test_smaa_t2x_order() {
        let plan = FramePlan::new(&smaa(SmaaMode::T2x));
        assert_eq!(
            &plan.stages()[4..],
            &[
                Stage::ToneMap,
                Stage::SmaaEdges,
                Stage::SmaaWeights,
                Stage::SmaaBlend,
                Stage::SmaaTemporalResolve,
                Stage::Present(PresentSource::SmaaResolve),
                Stage::SwapHistory(HistoryKind::SmaaColor),
            ]
        );
        assert_eq!(plan.swaps().collect::<Vec<_>>(), vec![HistoryKind::SmaaColor]);
    }

    #[test]
    fn test_smaa_replaces_taa() {
        let mut s = smaa(SmaaMode::X1);
        s.taa = true;
        let plan = FramePlan::new(&s);
        assert!(plan.contains(Stage::SmaaBlend));
        assert!(!plan.contains(Stage::TemporalResolve));
        assert!(!plan.contains(Stage::SwapHistory(HistoryKind::TaaColor)));
    }

    #[test]
    fn test_debug_view_bypasses_smaa() {
        let mut s = smaa(SmaaMode::T2x);
        s.show_ao = true;
        let plan = FramePlan::new(&s);
        assert!(!plan.contains(Stage::SmaaEdges));
        assert!(plan.contains(Stage::Present(PresentSource::ToneMapped)));
    }

    #[test]
    fn test_swaps_follow_stage_order() {
        let plan = FramePlan::new(&settings(true, true, false));
        assert_eq!(
            plan.swaps().collect::<Vec<_>>(),
            vec![
                HistoryKind::HalfDepth,
                HistoryKind::AmbientOcclusion,
                HistoryKind::TaaColor,
                HistoryKind::FullDepth,
            ]
        );
    }

    #[test]
    fn test_eye_adaptation_between_mips_and_tone_map() {
        let plan = FramePlan::new(&settings(false, false, true));
        let mips = position(&plan, Stage::DiffuseLightMips);
        let eye = position(&plan, Stage::EyeAdaptation);
        let tone = position(&plan, Stage::ToneMap);
        assert!(mips < eye && eye < tone);
    }
}
