// ============================================
// Light Sources - Солнце и точечные источники
// ============================================

use ultraviolet::Vec3;

use crate::gpu::core::config::{POINT_LIGHTS, SUN_COLOR};

/// Направленный свет, смотрящий из позиции солнца в начало координат
#[derive(Clone, Copy, Debug)]
pub struct SunLight {
    pub position: Vec3,
    pub color: Vec3,
}

impl SunLight {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            color: Vec3::from(SUN_COLOR),
        }
    }

    /// Направление распространения света (от солнца)
    pub fn direction(&self) -> Vec3 {
        (-self.position).normalized()
    }
}

/// Точечный источник без теней
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Vec3,
}

/// Фиксированный набор точечных источников сцены
pub fn scene_point_lights() -> Vec<PointLight> {
    POINT_LIGHTS
        .iter()
        .map(|(position, color)| PointLight {
            position: Vec3::from(*position),
            color: Vec3::from(*color),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sun_direction_points_to_origin() {
        let sun = SunLight::new(Vec3::new(217.0, 265.0, -80.0));
        let reached = sun.position + sun.direction() * sun.position.mag();
        assert!(reached.mag() < 1e-3);
    }

    #[test]
    fn test_scene_has_four_point_lights() {
        let lights = scene_point_lights();
        assert_eq!(lights.len(), 4);
        assert_eq!(lights[0].position, Vec3::new(0.0, 10.0, 0.0));
        assert!(lights.iter().all(|l| l.color == Vec3::broadcast(50.0)));
    }
}
