// ============================================
// Init System - Инициализация рендеринга
// ============================================

use std::fmt::Display;
use std::sync::Arc;
use winit::window::Window;

use crate::gpu::core::AppResources;
use crate::gpu::render::Renderer;

/// Система инициализации
pub struct InitSystem;

impl InitSystem {
    /// Инициализация рендеринга (вызывается при resumed)
    pub fn init_rendering(resources: &mut AppResources, window: Arc<Window>) {
        let renderer = match pollster::block_on(Renderer::new(window.clone())) {
            Ok(renderer) => renderer,
            Err(e) => Self::fatal("Failed to initialize renderer", e),
        };

        resources.window = Some(window);
        resources.renderer = Some(renderer);
    }

    /// Фатальная ошибка запуска: в лог и завершение процесса
    pub fn fatal(context: &str, error: impl Display) -> ! {
        log::error!("{context}: {error:#}");
        std::process::exit(1);
    }
}
