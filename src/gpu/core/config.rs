// ============================================
// Config - Константы демо
// ============================================

/// Стартовый размер окна
pub const WINDOW_WIDTH: u32 = 1920;
pub const WINDOW_HEIGHT: u32 = 1080;
pub const WINDOW_TITLE: &str = "Deferred CSM - SSAO / TAA";

/// Сцена (glTF)
pub const SCENE_PATH: &str = "models/sponza/Sponza.gltf";

/// Ближняя плоскость основной камеры (бесконечная проекция)
pub const CAMERA_NEAR: f32 = 0.1;
/// Стартовая позиция камеры
pub const CAMERA_START: [f32; 3] = [0.0, 0.0, 3.0];

/// Каскады теней
pub const NUM_CASCADES: usize = 4;
pub const SHADOW_MAP_SIZE: u32 = 2048;
pub const CASCADE_NEAR: f32 = 1.0;
pub const CASCADE_FAR: f32 = 1000.0;

/// Смещение глубины при рендере теней (Reversed-Z, поэтому отрицательное)
pub const SHADOW_BIAS_CONSTANT: i32 = -8;
pub const SHADOW_BIAS_SLOPE: f32 = -2.5;

/// Объём случайных углов для PCF
pub const RANDOM_ANGLES_SIZE: u32 = 16;
pub const RANDOM_ANGLES_SEED: u64 = 0x5EED_CA5C;

/// Белая точка тонмаппинга
pub const WHITE_POINT: f32 = 10.0;

/// Цвет неба (скайбокса нет, это clear color HDR буфера)
pub const SKY_COLOR: [f64; 3] = [0.5, 0.8, 1.6];

/// Солнце
pub const SUN_COLOR: [f32; 3] = [3.0, 3.0, 3.0];
pub const SUN_POSITION: [f32; 3] = [217.0, 265.0, -80.0];

/// Точечные источники (позиция, цвет)
pub const POINT_LIGHTS: [([f32; 3], [f32; 3]); 4] = [
    ([0.0, 10.0, 0.0], [50.0, 50.0, 50.0]),
    ([-50.0, 10.0, -50.0], [50.0, 50.0, 50.0]),
    ([50.0, 10.0, 50.0], [50.0, 50.0, 50.0]),
    ([50.0, 10.0, -50.0], [50.0, 50.0, 50.0]),
];

/// Скорость адаптации глаза (1/сек)
pub const EYE_ADAPTATION_RATE: f32 = 1.5;
