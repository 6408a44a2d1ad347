// ============================================
// Camera Module - Свободная камера (WASD + мышь)
// ============================================

mod fly_camera;

pub use fly_camera::*;
