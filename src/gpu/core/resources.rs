// ============================================
// Resources - Общие ресурсы приложения
// ============================================

use std::sync::Arc;
use std::time::Instant;
use winit::window::Window;

use crate::gpu::camera::Camera;
use crate::gpu::core::config::CAMERA_START;
use crate::gpu::core::settings::RenderSettings;
use crate::gpu::render::Renderer;
use crate::gpu::systems::InputState;

/// Всё состояние процесса в одном месте
pub struct AppResources {
    // Window & Rendering
    pub window: Option<Arc<Window>>,
    pub renderer: Option<Renderer>,

    // Camera & live settings
    pub camera: Camera,
    pub settings: RenderSettings,

    // Input
    pub input: InputState,
    pub exit_requested: bool,

    // Timing
    pub last_frame: Instant,
}

impl AppResources {
    pub fn new() -> Self {
        Self {
            window: None,
            renderer: None,
            camera: Camera::new(CAMERA_START.into()),
            settings: RenderSettings::default(),
            input: InputState::default(),
            exit_requested: false,
            last_frame: Instant::now(),
        }
    }
}
