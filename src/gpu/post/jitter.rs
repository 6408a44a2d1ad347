// ============================================
// Jitter - Субпиксельные смещения проекции для TAA
// ============================================
// Последовательность полностью определяется номером кадра,
// поэтому jitter(frame - 1) всегда можно пересчитать без хранения.

use ultraviolet::{Mat4, Vec2, Vec3};

/// Период шаблона "flip"
pub const FLIP_PERIOD: u64 = 2;
/// Период выборки Halton(2,3)
pub const HALTON_PERIOD: u64 = 8;

/// Генератор смещений
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JitterPattern {
    /// Два противоположных полупиксельных смещения
    Flip,
    /// Halton по базам 2 и 3, 8 кадров
    Halton,
}

impl JitterPattern {
    pub fn period(self) -> u64 {
        match self {
            JitterPattern::Flip => FLIP_PERIOD,
            JitterPattern::Halton => HALTON_PERIOD,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            JitterPattern::Flip => JitterPattern::Halton,
            JitterPattern::Halton => JitterPattern::Flip,
        }
    }
}

/// Радикальная инверсия index по базе base
pub fn halton(mut index: u64, base: u64) -> f32 {
    let mut f = 1.0f32;
    let mut result = 0.0f32;
    while index > 0 {
        f /= base as f32;
        result += f * (index % base) as f32;
        index /= base;
    }
    result
}

/// Смещение в NDC для кадра frame при разрешении width x height
pub fn jitter(pattern: JitterPattern, frame: u64, width: u32, height: u32) -> Vec2 {
    let pixel = Vec2::new(1.0 / width as f32, 1.0 / height as f32);
    match pattern {
        JitterPattern::Flip => {
            // y уже перевёрнут (начало клипа внизу слева), умножено на 2
            let offset = if frame % pattern.period() == 0 {
                Vec2::new(0.5, 0.5)
            } else {
                Vec2::new(-0.5, -0.5)
            };
            offset * pixel
        }
        JitterPattern::Halton => {
            let index = frame % pattern.period() + 1;
            let sample = Vec2::new(halton(index, 2) - 0.5, halton(index, 3) - 0.5);
            sample * pixel * 2.0
        }
    }
}

/// Смещение предыдущего кадра. На кадре 0 индекс оборачивается,
/// что безопасно при любом периоде, делящем 2^64
pub fn previous_jitter(pattern: JitterPattern, frame: u64, width: u32, height: u32) -> Vec2 {
    jitter(pattern, frame.wrapping_sub(1), width, height)
}

/// translate(jitter) * proj
pub fn jitter_projection(proj: Mat4, offset: Vec2) -> Mat4 {
    Mat4::from_translation(Vec3::new(offset.x, offset.y, 0.0)) * proj
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_halton_first_values() {
        assert_eq!(halton(1, 2), 0.5);
        assert_eq!(halton(2, 2), 0.25);
        assert_eq!(halton(3, 2), 0.75);
        assert!((halton(1, 3) - 1.0 / 3.0).abs() < 1e-6);
        assert!((halton(2, 3) - 2.0 / 3.0).abs() < 1e-6);
        assert!((halton(4, 3) - 4.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_flip_alternates() {
        let a = jitter(JitterPattern::Flip, 0, 1920, 1080);
        let b = jitter(JitterPattern::Flip, 1, 1920, 1080);
        assert!((a + b).mag() < 1e-9);
        assert!((a.x - 0.5 / 1920.0).abs() < 1e-9);
        assert!((a.y - 0.5 / 1080.0).abs() < 1e-9);
    }

    #[test]
    fn test_sequences_are_periodic() {
        for pattern in [JitterPattern::Flip, JitterPattern::Halton] {
            let period = pattern.period();
            for i in 0..period {
                let base = jitter(pattern, i, 1280, 720);
                for k in 1..5 {
                    assert_eq!(base, jitter(pattern, i + k * period, 1280, 720));
                }
            }
        }
    }

    #[test]
    fn test_previous_jitter_wraps_at_frame_zero() {
        for pattern in [JitterPattern::Flip, JitterPattern::Halton] {
            let wrapped = previous_jitter(pattern, 0, 1280, 720);
            let expected = jitter(pattern, pattern.period() - 1, 1280, 720);
            assert_eq!(wrapped, expected);
        }
    }

    #[test]
    fn test_halton_stays_within_one_pixel() {
        for frame in 0..HALTON_PERIOD {
            let offset = jitter(JitterPattern::Halton, frame, 100, 50);
            assert!(offset.x.abs() <= 1.0 / 100.0);
            assert!(offset.y.abs() <= 1.0 / 50.0);
        }
    }

    #[test]
    fn test_halton_samples_are_distinct() {
        let samples: Vec<Vec2> = (0..HALTON_PERIOD)
            .map(|f| jitter(JitterPattern::Halton, f, 64, 64))
            .collect();
        for (i, a) in samples.iter().enumerate() {
            for b in &samples[i + 1..] {
                assert!((*a - *b).mag() > 1e-6);
            }
        }
    }

    #[test]
    fn test_jitter_projection_shifts_ndc() {
        let offset = Vec2::new(0.01, -0.02);
        let proj = crate::gpu::camera::infinite_reversed_z_projection(1.0, 1.5, 0.1);
        let p = ultraviolet::Vec4::new(1.0, 2.0, -5.0, 1.0);
        let plain = proj * p;
        let shifted = jitter_projection(proj, offset) * p;
        assert!((shifted.x / shifted.w - plain.x / plain.w - offset.x).abs() < 1e-6);
        assert!((shifted.y / shifted.w - plain.y / plain.w - offset.y).abs() < 1e-6);
        assert!((shifted.z - plain.z).abs() < 1e-6);
    }
}
