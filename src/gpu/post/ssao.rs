// ============================================
// SSAO - Параметры оценки и денойзинга
// ============================================

/// Повороты шаблона выборки по кадрам (градусы)
pub const TEMPORAL_ROTATIONS_DEG: [f32; 6] = [60.0, 300.0, 180.0, 240.0, 120.0, 0.0];

/// Угол поворота шаблона для кадра (радианы)
pub fn temporal_rotation(frame: u64) -> f32 {
    let index = (frame % TEMPORAL_ROTATIONS_DEG.len() as u64) as usize;
    TEMPORAL_ROTATIONS_DEG[index].to_radians()
}

/// Параметры цепочки AO на один кадр
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AoFrameParams {
    /// Радиус ядра в мировых единицах
    pub radius: f32,
    /// Скорость накопления в temporal denoise
    pub rate_of_change: f32,
    pub rotation: f32,
}

impl AoFrameParams {
    pub fn new(radius: f32, rate_of_change: f32, frame: u64) -> Self {
        Self {
            radius,
            rate_of_change,
            rotation: temporal_rotation(frame),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_table_period() {
        for frame in 0..6 {
            assert_eq!(temporal_rotation(frame), temporal_rotation(frame + 6 * 1000));
        }
        assert!((temporal_rotation(0) - std::f32::consts::FRAC_PI_3).abs() < 1e-6);
        assert_eq!(temporal_rotation(5), 0.0);
    }

    #[test]
    fn test_rotations_cover_all_sextants() {
        let mut angles: Vec<i32> = (0..6).map(|f| temporal_rotation(f).to_degrees().round() as i32).collect();
        angles.sort();
        assert_eq!(angles, vec![0, 60, 120, 180, 240, 300]);
    }
}
