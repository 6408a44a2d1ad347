// ============================================
// Cascades - Разбиение frustum и подгонка ортопроекций
// ============================================
// Разбиение считается один раз (смесь uniform/log),
// матрицы каскадов - каждый кадр, со стабилизацией по текселям.

use ultraviolet::{Mat4, Vec3, Vec4};

/// Вес логарифмического разбиения (остальное - равномерное)
pub const LOG_SPLIT_WEIGHT: f32 = 0.8;

/// Ближняя/дальняя плоскости ортопроекции света (в масштабе сцены)
pub const LIGHT_NEAR: f32 = -500.0;
pub const LIGHT_FAR: f32 = 2000.0;

/// Границы каскадов в view space (отрицательные, камера смотрит в -Z)
#[derive(Clone, Debug, PartialEq)]
pub struct CascadePartition {
    limits: Vec<f32>,
}

impl CascadePartition {
    /// N+1 границ для N каскадов
    pub fn compute_view_space_limits(near: f32, far: f32, cascade_count: usize) -> Self {
        Self::with_blend(near, far, cascade_count, LOG_SPLIT_WEIGHT)
    }

    /// blend = 0 - равномерное разбиение, 1 - чисто логарифмическое
    pub fn with_blend(near: f32, far: f32, cascade_count: usize, blend: f32) -> Self {
        let mut limits = Vec::with_capacity(cascade_count + 1);
        limits.push(-near);

        for i in 1..=cascade_count {
            let t = i as f32 / cascade_count as f32;
            let log_step = near * (far / near).powf(t);
            let uniform_step = near + (far - near) * t;
            limits.push(-(uniform_step + (log_step - uniform_step) * blend));
        }

        Self { limits }
    }

    pub fn limits(&self) -> &[f32] {
        &self.limits
    }

    pub fn cascade_count(&self) -> usize {
        self.limits.len() - 1
    }

    /// Дальние границы каскадов (для выбора каскада в шейдере)
    pub fn far_limits(&self) -> &[f32] {
        &self.limits[1..]
    }
}

/// Параметры камеры, нужные для подгонки каскадов
#[derive(Clone, Copy, Debug)]
pub struct CascadeCamera {
    pub view: Mat4,
    pub vertical_fov: f32,
    pub aspect: f32,
}

/// Ортографическая проекция с Reversed-Z: z_view = -near → 1, z_view = -far → 0
pub fn reversed_z_orthographic(radius: f32, near: f32, far: f32) -> Mat4 {
    let depth = far - near;
    Mat4::new(
        Vec4::new(1.0 / radius, 0.0, 0.0, 0.0),
        Vec4::new(0.0, 1.0 / radius, 0.0, 0.0),
        Vec4::new(0.0, 0.0, 1.0 / depth, 0.0),
        Vec4::new(0.0, 0.0, far / depth, 1.0),
    )
}

/// 8 углов среза frustum в мировых координатах
pub fn slice_corners(camera: &CascadeCamera, near_limit: f32, far_limit: f32) -> [Vec3; 8] {
    let tan_half_v = (camera.vertical_fov / 2.0).tan();
    let tan_half_h = tan_half_v * camera.aspect;
    let inv_view = camera.view.inversed();

    let mut corners = [Vec3::zero(); 8];
    for (slice, z) in [near_limit, far_limit].into_iter().enumerate() {
        // z отрицательный, полуширина растёт с расстоянием
        let x = -z * tan_half_h;
        let y = -z * tan_half_v;
        let local = [
            Vec4::new(x, y, z, 1.0),
            Vec4::new(-x, y, z, 1.0),
            Vec4::new(x, -y, z, 1.0),
            Vec4::new(-x, -y, z, 1.0),
        ];
        for (i, corner) in local.into_iter().enumerate() {
            let world = inv_view * corner;
            corners[slice * 4 + i] = Vec3::new(world.x, world.y, world.z);
        }
    }
    corners
}

/// Подогнать стабилизированную матрицу света для одного среза
pub fn fit_cascade(
    corners: &[Vec3; 8],
    shadow_map_size: u32,
    light_direction: Vec3,
    world_up: Vec3,
) -> Mat4 {
    let centroid = corners.iter().fold(Vec3::zero(), |acc, c| acc + *c) / 8.0;
    let radius = corners
        .iter()
        .map(|c| (*c - centroid).mag())
        .fold(0.0f32, f32::max);

    let light_dir = light_direction.normalized();
    let view = Mat4::look_at(centroid - light_dir * radius, centroid, world_up);
    let mut proj = reversed_z_orthographic(radius, LIGHT_NEAR, LIGHT_FAR);

    // Привязка начала координат к целому текселю
    let size = shadow_map_size as f32;
    let origin = proj * view * Vec4::new(0.0, 0.0, 0.0, 1.0);
    let texel_x = origin.x * size / 2.0;
    let texel_y = origin.y * size / 2.0;
    proj.cols[3].x += (texel_x.round() - texel_x) * 2.0 / size;
    proj.cols[3].y += (texel_y.round() - texel_y) * 2.0 / size;

    proj * view
}

/// Матрицы света для всех каскадов
pub fn fit_cascades(
    partition: &CascadePartition,
    camera: &CascadeCamera,
    shadow_map_size: u32,
    light_direction: Vec3,
    world_up: Vec3,
) -> Vec<Mat4> {
    partition
        .limits()
        .windows(2)
        .map(|pair| {
            let corners = slice_corners(camera, pair[0], pair[1]);
            fit_cascade(&corners, shadow_map_size, light_direction, world_up)
        })
        .collect()
}

/// NDC → texture space (y вниз в wgpu)
pub fn tex_scale_bias() -> Mat4 {
    Mat4::new(
        Vec4::new(0.5, 0.0, 0.0, 0.0),
        Vec4::new(0.0, -0.5, 0.0, 0.0),
        Vec4::new(0.0, 0.0, 1.0, 0.0),
        Vec4::new(0.5, 0.5, 0.0, 1.0),
    )
}

/// Одна матрица (каскад 0) + scale/offset для перехода в любой каскад:
/// uv_i = (uv_0 + offset_i) * scale_i
#[derive(Clone, Debug)]
pub struct ShadowLookup {
    pub reference: Mat4,
    pub scales: Vec<Vec3>,
    pub offsets: Vec<Vec3>,
}

impl ShadowLookup {
    pub fn from_cascades(cascade_matrices: &[Mat4]) -> Self {
        let scale_bias = tex_scale_bias();
        let reference = match cascade_matrices.first() {
            Some(first) => scale_bias * *first,
            None => Mat4::identity(),
        };

        let mut scales = Vec::with_capacity(cascade_matrices.len());
        let mut offsets = Vec::with_capacity(cascade_matrices.len());

        for matrix in cascade_matrices {
            let inv = (scale_bias * *matrix).inversed();
            let zero = reference * inv * Vec4::new(0.0, 0.0, 0.0, 1.0);
            let one = reference * inv * Vec4::new(1.0, 1.0, 1.0, 1.0);

            let zero = Vec3::new(zero.x, zero.y, zero.z);
            let one = Vec3::new(one.x, one.y, one.z);
            let span = one - zero;

            offsets.push(-zero);
            scales.push(Vec3::new(1.0 / span.x, 1.0 / span.y, 1.0 / span.z));
        }

        Self {
            reference,
            scales,
            offsets,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera_at(position: Vec3, yaw_deg: f32) -> CascadeCamera {
        let yaw = yaw_deg.to_radians();
        let front = Vec3::new(yaw.cos(), -0.2, yaw.sin()).normalized();
        CascadeCamera {
            view: Mat4::look_at(position, position + front, Vec3::unit_y()),
            vertical_fov: 45f32.to_radians(),
            aspect: 16.0 / 9.0,
        }
    }

    fn sun() -> Vec3 {
        -Vec3::new(217.0, 265.0, -80.0).normalized()
    }

    fn snapped_origin(matrix: &Mat4, size: u32) -> (f32, f32) {
        let p = *matrix * Vec4::new(0.0, 0.0, 0.0, 1.0);
        (p.x * size as f32 / 2.0, p.y * size as f32 / 2.0)
    }

    #[test]
    fn test_partition_limits() {
        let partition = CascadePartition::compute_view_space_limits(1.0, 1000.0, 4);
        let limits = partition.limits();
        assert_eq!(limits.len(), 5);
        assert_eq!(limits[0], -1.0);
        assert!((limits[4] + 1000.0).abs() < 1e-2);
        for pair in limits.windows(2) {
            assert!(pair[1].abs() > pair[0].abs());
        }
    }

    #[test]
    fn test_partition_blend_extremes() {
        let uniform = CascadePartition::with_blend(1.0, 1000.0, 4, 0.0);
        assert!((uniform.limits()[1] + 250.75).abs() < 1e-3);

        let log = CascadePartition::with_blend(1.0, 1000.0, 4, 1.0);
        let expected = 1000f32.powf(0.25);
        assert!((log.limits()[1] + expected).abs() < 1e-3);

        // Смесь лежит между двумя крайностями
        let mixed = CascadePartition::compute_view_space_limits(1.0, 1000.0, 4);
        let m = mixed.limits()[2].abs();
        assert!(m < uniform.limits()[2].abs());
        assert!(m > log.limits()[2].abs());
    }

    #[test]
    fn test_slice_corners_distance() {
        let camera = camera_at(Vec3::new(5.0, 3.0, -2.0), 30.0);
        let corners = slice_corners(&camera, -1.0, -10.0);
        for corner in &corners[4..] {
            let view = camera.view * Vec4::new(corner.x, corner.y, corner.z, 1.0);
            assert!((view.z + 10.0).abs() < 1e-3);
        }
        // Соотношение сторон: полуширина = полувысота * aspect
        let v = camera.view * Vec4::new(corners[4].x, corners[4].y, corners[4].z, 1.0);
        assert!((v.x / v.y - camera.aspect).abs() < 1e-3);
    }

    #[test]
    fn test_origin_is_snapped_to_texel() {
        let partition = CascadePartition::compute_view_space_limits(1.0, 1000.0, 4);
        let camera = camera_at(Vec3::new(12.3, 4.5, -7.7), 17.0);
        let matrices = fit_cascades(&partition, &camera, 2048, sun(), Vec3::unit_y());
        assert_eq!(matrices.len(), 4);

        for matrix in &matrices {
            let (x, y) = snapped_origin(matrix, 2048);
            assert!((x - x.round()).abs() < 1e-2, "x = {}", x);
            assert!((y - y.round()).abs() < 1e-2, "y = {}", y);
        }
    }

    #[test]
    fn test_stabilization_survives_texel_translation() {
        let partition = CascadePartition::compute_view_space_limits(1.0, 1000.0, 4);
        let base = camera_at(Vec3::new(0.0, 10.0, 0.0), 45.0);
        let first = fit_cascades(&partition, &base, 2048, sun(), Vec3::unit_y());

        for (i, matrix) in first.iter().enumerate() {
            // Размер текселя в мире для каскада i: 2 * radius / size
            let texel_world = 2.0 / (matrix.cols[0].xyz().mag() * 2048.0);
            for axis in [Vec3::unit_x(), Vec3::unit_y(), Vec3::unit_z()] {
                let moved = camera_at(Vec3::new(0.0, 10.0, 0.0) + axis * texel_world, 45.0);
                let refit = fit_cascades(&partition, &moved, 2048, sun(), Vec3::unit_y());
                let (x, y) = snapped_origin(&refit[i], 2048);
                assert!((x - x.round()).abs() < 1e-2);
                assert!((y - y.round()).abs() < 1e-2);
            }
        }
    }

    #[test]
    fn test_box_size_is_rotation_invariant() {
        let partition = CascadePartition::compute_view_space_limits(1.0, 1000.0, 4);
        let a = fit_cascades(&partition, &camera_at(Vec3::zero(), 0.0), 2048, sun(), Vec3::unit_y());
        let b = fit_cascades(&partition, &camera_at(Vec3::zero(), 123.0), 2048, sun(), Vec3::unit_y());
        for (ma, mb) in a.iter().zip(&b) {
            let sa = ma.cols[0].xyz().mag();
            let sb = mb.cols[0].xyz().mag();
            assert!((sa - sb).abs() / sa < 1e-4);
        }
    }

    #[test]
    fn test_reversed_z_orthographic_range() {
        let proj = reversed_z_orthographic(10.0, LIGHT_NEAR, LIGHT_FAR);
        let near = proj * Vec4::new(0.0, 0.0, -LIGHT_NEAR, 1.0);
        let far = proj * Vec4::new(0.0, 0.0, -LIGHT_FAR, 1.0);
        assert!((near.z - 1.0).abs() < 1e-5);
        assert!(far.z.abs() < 1e-5);
    }

    #[test]
    fn test_lookup_maps_reference_into_each_cascade() {
        let partition = CascadePartition::compute_view_space_limits(1.0, 1000.0, 4);
        let camera = camera_at(Vec3::new(3.0, 20.0, 8.0), 80.0);
        let matrices = fit_cascades(&partition, &camera, 2048, sun(), Vec3::unit_y());
        let lookup = ShadowLookup::from_cascades(&matrices);

        let points = [
            Vec4::new(0.0, 0.0, 0.0, 1.0),
            Vec4::new(30.0, 2.0, -15.0, 1.0),
            Vec4::new(-120.0, 40.0, 60.0, 1.0),
        ];
        for (i, matrix) in matrices.iter().enumerate() {
            for p in points {
                let expected = tex_scale_bias() * *matrix * p;
                let uv0 = lookup.reference * p;
                let uv0 = Vec3::new(uv0.x, uv0.y, uv0.z);
                let got = (uv0 + lookup.offsets[i]) * lookup.scales[i];
                assert!((got.x - expected.x).abs() < 1e-3, "cascade {} x", i);
                assert!((got.y - expected.y).abs() < 1e-3, "cascade {} y", i);
                assert!((got.z - expected.z).abs() < 1e-3, "cascade {} z", i);
            }
        }
    }

    #[test]
    fn test_lookup_first_cascade_is_identity() {
        let partition = CascadePartition::compute_view_space_limits(1.0, 1000.0, 4);
        let matrices = fit_cascades(&partition, &camera_at(Vec3::zero(), 0.0), 1024, sun(), Vec3::unit_y());
        let lookup = ShadowLookup::from_cascades(&matrices);
        assert!((lookup.scales[0] - Vec3::one()).mag() < 1e-4);
        assert!(lookup.offsets[0].mag() < 1e-4);
    }
}
