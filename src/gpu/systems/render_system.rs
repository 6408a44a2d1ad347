// ============================================
// Render System - Система рендеринга
// ============================================

use winit::event_loop::ActiveEventLoop;

use crate::gpu::core::AppResources;

/// Система рендеринга
pub struct RenderSystem;

impl RenderSystem {
    /// Один кадр. Ошибки surface обрабатываются здесь же
    pub fn render(resources: &mut AppResources, dt: f32, event_loop: &ActiveEventLoop) {
        let Some(renderer) = &mut resources.renderer else { return };

        match renderer.render(&resources.settings, &resources.camera, dt) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                renderer.resize(renderer.size());
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Surface out of memory");
                event_loop.exit();
            }
            Err(e) => log::warn!("Frame skipped: {e:?}"),
        }
    }
}
