// ============================================
// Fly Camera - Камера на углах Эйлера
// ============================================
// Yaw/pitch в градусах, базис front/up/right пересчитывается
// при каждом изменении углов. Проекция - бесконечная с Reversed-Z.

use ultraviolet::{Mat4, Vec3, Vec4};

/// Ограничение pitch (без переворота у полюсов)
pub const MAX_PITCH_DEG: f32 = 89.0;
/// Диапазон вертикального FOV для зума колесом
pub const MIN_FOV_DEG: f32 = 35.0;
pub const MAX_FOV_DEG: f32 = 57.5;

/// Направление движения камеры
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Forward,
    Backward,
    Left,
    Right,
}

/// Камера - единственный экземпляр, живёт всё время работы программы
#[derive(Debug, Clone)]
pub struct Camera {
    /// Позиция в мировых координатах
    pub position: Vec3,

    front: Vec3,
    up: Vec3,
    right: Vec3,

    yaw_deg: f32,
    pitch_deg: f32,
    fov_deg: f32,

    /// Скорость движения (единиц/сек)
    pub speed: f32,
    /// Чувствительность мыши (градусов на пиксель)
    pub sensitivity: f32,
}

impl Camera {
    pub fn new(position: Vec3) -> Self {
        let mut camera = Self {
            position,
            front: Vec3::new(0.0, 0.0, -1.0),
            up: Vec3::unit_y(),
            right: Vec3::unit_x(),
            yaw_deg: -90.0,
            pitch_deg: 0.0,
            fov_deg: 45.0,
            speed: 50.0,
            sensitivity: 0.1,
        };
        camera.update_vectors();
        camera
    }

    /// Мировой "верх" - общий для камеры и look-at света
    pub fn world_up() -> Vec3 {
        Vec3::unit_y()
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn yaw_deg(&self) -> f32 {
        self.yaw_deg
    }

    pub fn pitch_deg(&self) -> f32 {
        self.pitch_deg
    }

    /// Вертикальный FOV в градусах
    pub fn fov_deg(&self) -> f32 {
        self.fov_deg
    }

    /// Движение вдоль front/right, без ограничений по позиции
    pub fn process_movement(&mut self, direction: Movement, dt: f32) {
        let velocity = self.speed * dt;
        match direction {
            Movement::Forward => self.position += self.front() * velocity,
            Movement::Backward => self.position -= self.front() * velocity,
            Movement::Left => self.position -= self.right() * velocity,
            Movement::Right => self.position += self.right() * velocity,
        }
    }

    /// Поворот мышью. dy положительный = взгляд вверх
    pub fn process_mouse_delta(&mut self, dx: f32, dy: f32) {
        self.yaw_deg += dx * self.sensitivity;
        self.pitch_deg += dy * self.sensitivity;
        self.pitch_deg = self.pitch_deg.clamp(-MAX_PITCH_DEG, MAX_PITCH_DEG);

        self.update_vectors();
    }

    /// Зум колесом: меняем FOV только пока он внутри диапазона
    pub fn process_scroll_delta(&mut self, dy: f32) {
        if self.fov_deg >= MIN_FOV_DEG && self.fov_deg <= MAX_FOV_DEG {
            self.fov_deg -= dy;
        }
        self.fov_deg = self.fov_deg.clamp(MIN_FOV_DEG, MAX_FOV_DEG);
    }

    /// Матрица вида (View Matrix)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at(self.position, self.position + self.front(), self.up())
    }

    /// Бесконечная перспектива с Reversed-Z (1 = near, 0 = бесконечность)
    pub fn projection_matrix(&self, aspect: f32, near: f32) -> Mat4 {
        infinite_reversed_z_projection(self.fov_deg.to_radians(), aspect, near)
    }

    /// Сферические координаты → front, затем right/up через векторные произведения
    fn update_vectors(&mut self) {
        let yaw = self.yaw_deg.to_radians();
        let pitch = self.pitch_deg.to_radians();

        let front = Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        );
        self.front = front.normalized();
        self.right = self.front.cross(Self::world_up()).normalized();
        self.up = self.right.cross(self.front).normalized();
    }
}

/// z_clip = near, w_clip = -z_view: глубина near/dist, на near = 1, на бесконечности = 0
pub fn infinite_reversed_z_projection(vertical_fov: f32, aspect: f32, near: f32) -> Mat4 {
    let f = 1.0 / (vertical_fov / 2.0).tan();
    Mat4::new(
        Vec4::new(f / aspect, 0.0, 0.0, 0.0),
        Vec4::new(0.0, f, 0.0, 0.0),
        Vec4::new(0.0, 0.0, 0.0, -1.0),
        Vec4::new(0.0, 0.0, near, 0.0),
    )
}
