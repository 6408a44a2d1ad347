// ============================================
// Render Settings - Живые настройки кадра
// ============================================
// Всё, что меняется с клавиатуры, живёт здесь и явно
// передаётся в рендерер каждый кадр.

use ultraviolet::Vec3;

use crate::gpu::core::config::{NUM_CASCADES, SUN_POSITION};
use crate::gpu::post::{JitterPattern, SmaaMode};

/// Непрерывно регулируемый параметр (клавиша удерживается)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tunable {
    Exposure,
    SunX,
    ShadowBias,
    NormalOffsetBias,
    ShadowFilterSize,
    LightWidth,
    AoRadius,
    AoRateOfChange,
    TaaBlendRate,
}

impl Tunable {
    /// Шаг за один кадр
    pub fn step(self) -> f32 {
        match self {
            Tunable::Exposure => 0.05,
            Tunable::SunX => 1.0,
            Tunable::ShadowBias => 0.00001,
            Tunable::NormalOffsetBias => 1.0,
            Tunable::ShadowFilterSize => 0.1,
            Tunable::LightWidth => 20.0,
            Tunable::AoRadius => 0.1,
            Tunable::AoRateOfChange => 0.01,
            Tunable::TaaBlendRate => 0.01,
        }
    }

    /// Допустимый диапазон
    pub fn range(self) -> (f32, f32) {
        match self {
            Tunable::Exposure => (0.0, f32::MAX),
            Tunable::SunX | Tunable::ShadowBias | Tunable::NormalOffsetBias => (f32::MIN, f32::MAX),
            Tunable::ShadowFilterSize => (1.0, 200.0),
            Tunable::LightWidth => (0.1, 200_000.0),
            Tunable::AoRadius => (0.0, 50.0),
            Tunable::AoRateOfChange => (0.01, 1.0),
            Tunable::TaaBlendRate => (0.01, 1.0),
        }
    }
}

/// Переключатель (по нажатию)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Toggle {
    ShadowMapDebug,
    NextCascade,
    NormalMapping,
    Taa,
    JitterPattern,
    SmaaMode,
    SmaaSubsampleIndices,
    AmbientOcclusion,
    AoDebug,
    EyeAdaptation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    pub exposure: f32,
    pub sun_position: Vec3,
    pub shadow_bias: f32,
    pub normal_offset_bias: f32,
    pub shadow_filter_size: f32,
    pub light_width: f32,
    pub ao_radius: f32,
    pub ao_rate_of_change: f32,
    pub taa_blend_rate: f32,

    pub show_shadow_map: bool,
    pub debug_cascade: usize,
    pub normal_mapping: bool,
    pub taa: bool,
    pub jitter_pattern: JitterPattern,
    pub smaa: SmaaMode,
    pub smaa_subsample_indices: bool,
    pub ambient_occlusion: bool,
    pub show_ao: bool,
    pub eye_adaptation: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            exposure: 0.35,
            sun_position: Vec3::from(SUN_POSITION),
            shadow_bias: 0.0,
            normal_offset_bias: 0.0,
            shadow_filter_size: 15.0,
            light_width: 800.0,
            ao_radius: 3.5,
            ao_rate_of_change: 0.11,
            taa_blend_rate: 0.1,

            show_shadow_map: false,
            debug_cascade: 0,
            normal_mapping: true,
            taa: true,
            jitter_pattern: JitterPattern::Flip,
            smaa: SmaaMode::Off,
            smaa_subsample_indices: false,
            ambient_occlusion: true,
            show_ao: false,
            eye_adaptation: true,
        }
    }
}

impl RenderSettings {
    pub fn value(&self, tunable: Tunable) -> f32 {
        match tunable {
            Tunable::Exposure => self.exposure,
            Tunable::SunX => self.sun_position.x,
            Tunable::ShadowBias => self.shadow_bias,
            Tunable::NormalOffsetBias => self.normal_offset_bias,
            Tunable::ShadowFilterSize => self.shadow_filter_size,
            Tunable::LightWidth => self.light_width,
            Tunable::AoRadius => self.ao_radius,
            Tunable::AoRateOfChange => self.ao_rate_of_change,
            Tunable::TaaBlendRate => self.taa_blend_rate,
        }
    }

    fn value_mut(&mut self, tunable: Tunable) -> &mut f32 {
        match tunable {
            Tunable::Exposure => &mut self.exposure,
            Tunable::SunX => &mut self.sun_position.x,
            Tunable::ShadowBias => &mut self.shadow_bias,
            Tunable::NormalOffsetBias => &mut self.normal_offset_bias,
            Tunable::ShadowFilterSize => &mut self.shadow_filter_size,
            Tunable::LightWidth => &mut self.light_width,
            Tunable::AoRadius => &mut self.ao_radius,
            Tunable::AoRateOfChange => &mut self.ao_rate_of_change,
            Tunable::TaaBlendRate => &mut self.taa_blend_rate,
        }
    }

    /// Один шаг вверх (+1) или вниз (-1) с ограничением диапазона
    pub fn adjust(&mut self, tunable: Tunable, direction: f32) {
        let (min, max) = tunable.range();
        let value = self.value_mut(tunable);
        *value = (*value + tunable.step() * direction).clamp(min, max);
    }

    pub fn toggle(&mut self, toggle: Toggle) {
        match toggle {
            Toggle::ShadowMapDebug => self.show_shadow_map = !self.show_shadow_map,
            Toggle::NextCascade => self.debug_cascade = (self.debug_cascade + 1) % NUM_CASCADES,
            Toggle::NormalMapping => self.normal_mapping = !self.normal_mapping,
            Toggle::Taa => {
                self.taa = !self.taa;
                if self.taa {
                    self.smaa = SmaaMode::Off;
                }
            }
            Toggle::JitterPattern => self.jitter_pattern = self.jitter_pattern.toggled(),
            Toggle::SmaaMode => {
                self.smaa = self.smaa.next();
                if self.smaa != SmaaMode::Off {
                    self.taa = false;
                }
            }
            Toggle::SmaaSubsampleIndices => self.smaa_subsample_indices = !self.smaa_subsample_indices,
            Toggle::AmbientOcclusion => self.ambient_occlusion = !self.ambient_occlusion,
            Toggle::AoDebug => self.show_ao = !self.show_ao,
            Toggle::EyeAdaptation => self.eye_adaptation = !self.eye_adaptation,
        }
    }

    /// Любой отладочный вид подменяет обычный вывод тонмаппинга
    pub fn debug_view(&self) -> bool {
        self.show_shadow_map || self.show_ao
    }

    /// Субпиксельный сдвиг проекции: T2x всегда flip, TAA - выбранный паттерн
    pub fn active_jitter(&self) -> Option<JitterPattern> {
        match self.smaa {
            SmaaMode::T2x => Some(JitterPattern::Flip),
            SmaaMode::X1 => None,
            SmaaMode::Off => self.taa.then_some(self.jitter_pattern),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = RenderSettings::default();
        assert_eq!(settings.exposure, 0.35);
        assert_eq!(settings.shadow_filter_size, 15.0);
        assert_eq!(settings.light_width, 800.0);
        assert_eq!(settings.ao_radius, 3.5);
        assert!(settings.ambient_occlusion && settings.normal_mapping);
        assert!(!settings.debug_view());
    }

    #[test]
    fn test_exposure_never_negative() {
        let mut settings = RenderSettings::default();
        for _ in 0..100 {
            settings.adjust(Tunable::Exposure, -1.0);
        }
        assert_eq!(settings.exposure, 0.0);
    }

    #[test]
    fn test_ranges_are_enforced() {
        let mut settings = RenderSettings::default();
        for _ in 0..10_000 {
            settings.adjust(Tunable::ShadowFilterSize, 1.0);
            settings.adjust(Tunable::AoRadius, 1.0);
            settings.adjust(Tunable::AoRateOfChange, -1.0);
            settings.adjust(Tunable::TaaBlendRate, 1.0);
            settings.adjust(Tunable::LightWidth, -1.0);
        }
        assert_eq!(settings.shadow_filter_size, 200.0);
        assert_eq!(settings.ao_radius, 50.0);
        assert_eq!(settings.ao_rate_of_change, 0.01);
        assert_eq!(settings.taa_blend_rate, 1.0);
        assert_eq!(settings.light_width, 0.1);
    }

    #[test]
    fn test_unbounded_tunables_step() {
        let mut settings = RenderSettings::default();
        settings.adjust(Tunable::SunX, 1.0);
        settings.adjust(Tunable::NormalOffsetBias, -1.0);
        assert_eq!(settings.sun_position.x, 218.0);
        assert_eq!(settings.normal_offset_bias, -1.0);
        assert_eq!(settings.value(Tunable::SunX), 218.0);
    }

    #[test]
    fn test_cascade_cycles() {
        let mut settings = RenderSettings::default();
        for i in 1..=NUM_CASCADES {
            settings.toggle(Toggle::NextCascade);
            assert_eq!(settings.debug_cascade, i % NUM_CASCADES);
        }
    }

    #[test]
    fn test_toggles_flip_back() {
        let mut settings = RenderSettings::default();
        let original = settings.clone();
        for toggle in [Toggle::Taa, Toggle::JitterPattern, Toggle::AoDebug, Toggle::EyeAdaptation] {
            settings.toggle(toggle);
        }
        assert_ne!(settings, original);
        for toggle in [Toggle::Taa, Toggle::JitterPattern, Toggle::AoDebug, Toggle::EyeAdaptation] {
            settings.toggle(toggle);
        }
        assert_eq!(settings, original);
    }

    #[test]
    fn test_smaa_and_taa_are_exclusive() {
        let mut settings = RenderSettings::default();
        assert!(settings.taa);

        settings.toggle(Toggle::SmaaMode);
        assert_eq!(settings.smaa, SmaaMode::X1);
        assert!(!settings.taa);

        settings.toggle(Toggle::Taa);
        assert!(settings.taa);
        assert_eq!(settings.smaa, SmaaMode::Off);
    }

    #[test]
    fn test_jitter_only_for_t2x_and_taa() {
        let mut settings = RenderSettings::default();
        settings.jitter_pattern = JitterPattern::Halton;
        assert_eq!(settings.active_jitter(), Some(JitterPattern::Halton));

        settings.toggle(Toggle::SmaaMode);
        assert_eq!(settings.active_jitter(), None);

        settings.toggle(Toggle::SmaaMode);
        assert_eq!(settings.smaa, SmaaMode::T2x);
        assert_eq!(settings.active_jitter(), Some(JitterPattern::Flip));

        settings.toggle(Toggle::SmaaMode);
        assert_eq!(settings.smaa, SmaaMode::Off);
        assert_eq!(settings.active_jitter(), None);
    }
}
