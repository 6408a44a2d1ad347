// ============================================
// Update System - Обновление состояния кадра
// ============================================

use crate::gpu::core::AppResources;
use crate::gpu::systems::InputSystem;

/// Система обновления
pub struct UpdateSystem;

impl UpdateSystem {
    /// Ввод за кадр применяется к камере и настройкам до рендера
    pub fn update(resources: &mut AppResources, dt: f32) {
        if InputSystem::drain(&mut resources.input, &mut resources.camera, &mut resources.settings, dt) {
            let camera = &resources.camera;
            log::info!(
                "Exit requested, camera at {:?} yaw {:.1} pitch {:.1}",
                camera.position,
                camera.yaw_deg(),
                camera.pitch_deg()
            );
            resources.exit_requested = true;
        }
    }
}
