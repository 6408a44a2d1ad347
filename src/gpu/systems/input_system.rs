// ============================================
// Input System - Очередь ввода и раскладка клавиш
// ============================================
// Колбэки winit только складывают события в очередь.
// Очередь разбирается один раз за кадр, до построения кадра.

use std::collections::HashSet;

use winit::keyboard::KeyCode;
use winit::window::{CursorGrabMode, Window};

use crate::gpu::camera::{Camera, Movement};
use crate::gpu::core::settings::{RenderSettings, Toggle, Tunable};

/// Событие ввода, накопленное между кадрами
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Смещение мыши (dx вправо, dy вверх)
    MouseDelta(f32, f32),
    Scroll(f32),
    KeyPressed(KeyCode),
    KeyReleased(KeyCode),
}

/// Удерживаемые клавиши
#[derive(Debug, Default)]
pub struct HeldKeys {
    keys: HashSet<KeyCode>,
}

impl HeldKeys {
    /// true, если клавиша не была нажата раньше
    fn press(&mut self, key: KeyCode) -> bool {
        self.keys.insert(key)
    }

    fn release(&mut self, key: KeyCode) {
        self.keys.remove(&key);
    }

    fn iter(&self) -> impl Iterator<Item = KeyCode> + '_ {
        self.keys.iter().copied()
    }
}

/// Состояние ввода: очередь событий + удерживаемые клавиши
#[derive(Debug, Default)]
pub struct InputState {
    queue: Vec<InputEvent>,
    held: HeldKeys,
}

impl InputState {
    pub fn push(&mut self, event: InputEvent) {
        self.queue.push(event);
    }
}

/// Система обработки ввода
pub struct InputSystem;

impl InputSystem {
    /// Разбор очереди за кадр. Возвращает true, если запрошен выход
    pub fn drain(input: &mut InputState, camera: &mut Camera, settings: &mut RenderSettings, dt: f32) -> bool {
        let mut exit_requested = false;
        // Нажатые в этом кадре: короткое нажатие тоже даёт один шаг
        let mut tapped = HashSet::new();

        for event in input.queue.drain(..) {
            match event {
                InputEvent::MouseDelta(dx, dy) => camera.process_mouse_delta(dx, dy),
                InputEvent::Scroll(dy) => camera.process_scroll_delta(dy),
                InputEvent::KeyPressed(key) => {
                    // Переключатели срабатывают только на фронте нажатия
                    if !input.held.press(key) {
                        continue;
                    }
                    tapped.insert(key);
                    if key == KeyCode::Escape {
                        exit_requested = true;
                    }
                    if let Some(toggle) = Self::toggle_for(key) {
                        settings.toggle(toggle);
                        log::debug!("{:?} -> {:?}", toggle, settings);
                    }
                }
                InputEvent::KeyReleased(key) => input.held.release(key),
            }
        }

        tapped.extend(input.held.iter());
        for key in tapped {
            if let Some(movement) = Self::movement_for(key) {
                camera.process_movement(movement, dt);
            }
            if let Some((tunable, direction)) = Self::tunable_for(key) {
                settings.adjust(tunable, direction);
                log::debug!("{:?} = {}", tunable, settings.value(tunable));
            }
        }

        exit_requested
    }

    fn movement_for(key: KeyCode) -> Option<Movement> {
        match key {
            KeyCode::KeyW => Some(Movement::Forward),
            KeyCode::KeyS => Some(Movement::Backward),
            KeyCode::KeyA => Some(Movement::Left),
            KeyCode::KeyD => Some(Movement::Right),
            _ => None,
        }
    }

    /// Удерживаемая клавиша -> (параметр, направление шага)
    fn tunable_for(key: KeyCode) -> Option<(Tunable, f32)> {
        let binding = match key {
            KeyCode::KeyQ => (Tunable::Exposure, -1.0),
            KeyCode::KeyE => (Tunable::Exposure, 1.0),
            KeyCode::Numpad4 => (Tunable::SunX, -1.0),
            KeyCode::Numpad6 => (Tunable::SunX, 1.0),
            KeyCode::KeyR => (Tunable::ShadowBias, -1.0),
            KeyCode::KeyT => (Tunable::ShadowBias, 1.0),
            KeyCode::KeyY => (Tunable::NormalOffsetBias, -1.0),
            KeyCode::KeyU => (Tunable::NormalOffsetBias, 1.0),
            KeyCode::KeyK => (Tunable::ShadowFilterSize, -1.0),
            KeyCode::KeyL => (Tunable::ShadowFilterSize, 1.0),
            KeyCode::Comma => (Tunable::LightWidth, -1.0),
            KeyCode::Period => (Tunable::LightWidth, 1.0),
            KeyCode::KeyV => (Tunable::AoRadius, -1.0),
            KeyCode::KeyB => (Tunable::AoRadius, 1.0),
            KeyCode::KeyI => (Tunable::AoRateOfChange, -1.0),
            KeyCode::KeyO => (Tunable::AoRateOfChange, 1.0),
            KeyCode::Digit9 => (Tunable::TaaBlendRate, -1.0),
            KeyCode::Digit0 => (Tunable::TaaBlendRate, 1.0),
            _ => return None,
        };
        Some(binding)
    }

    fn toggle_for(key: KeyCode) -> Option<Toggle> {
        match key {
            KeyCode::KeyG => Some(Toggle::ShadowMapDebug),
            KeyCode::KeyH => Some(Toggle::NextCascade),
            KeyCode::KeyN => Some(Toggle::NormalMapping),
            KeyCode::KeyZ => Some(Toggle::SmaaMode),
            KeyCode::KeyX => Some(Toggle::SmaaSubsampleIndices),
            KeyCode::KeyC => Some(Toggle::Taa),
            KeyCode::KeyJ => Some(Toggle::JitterPattern),
            KeyCode::F1 => Some(Toggle::AmbientOcclusion),
            KeyCode::F2 => Some(Toggle::AoDebug),
            KeyCode::F3 => Some(Toggle::EyeAdaptation),
            _ => None,
        }
    }

    /// Захват курсора для управления камерой
    pub fn grab_cursor(window: &Window) {
        let grabbed = window
            .set_cursor_grab(CursorGrabMode::Confined)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked));
        if let Err(e) = grabbed {
            log::warn!("Cursor grab unavailable: {}", e);
        }
        window.set_cursor_visible(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ultraviolet::Vec3;

    fn setup() -> (InputState, Camera, RenderSettings) {
        (InputState::default(), Camera::new(Vec3::zero()), RenderSettings::default())
    }

    #[test]
    fn test_queue_is_emptied() {
        let (mut input, mut camera, mut settings) = setup();
        input.push(InputEvent::MouseDelta(10.0, 0.0));
        input.push(InputEvent::Scroll(1.0));
        InputSystem::drain(&mut input, &mut camera, &mut settings, 0.016);
        assert!(input.queue.is_empty());
        assert_eq!(camera.yaw_deg(), -89.0);
        assert_eq!(camera.fov_deg(), 44.0);
    }

    #[test]
    fn test_toggle_fires_once_per_press() {
        let (mut input, mut camera, mut settings) = setup();
        let taa = settings.taa;

        input.push(InputEvent::KeyPressed(KeyCode::KeyC));
        input.push(InputEvent::KeyPressed(KeyCode::KeyC));
        InputSystem::drain(&mut input, &mut camera, &mut settings, 0.016);
        assert_eq!(settings.taa, !taa);

        // Удержание на следующем кадре ничего не меняет
        InputSystem::drain(&mut input, &mut camera, &mut settings, 0.016);
        assert_eq!(settings.taa, !taa);

        input.push(InputEvent::KeyReleased(KeyCode::KeyC));
        input.push(InputEvent::KeyPressed(KeyCode::KeyC));
        InputSystem::drain(&mut input, &mut camera, &mut settings, 0.016);
        assert_eq!(settings.taa, taa);
    }

    #[test]
    fn test_held_tunable_steps_every_frame() {
        let (mut input, mut camera, mut settings) = setup();
        let start = settings.exposure;

        input.push(InputEvent::KeyPressed(KeyCode::KeyE));
        for _ in 0..4 {
            InputSystem::drain(&mut input, &mut camera, &mut settings, 0.016);
        }
        assert!((settings.exposure - (start + 4.0 * 0.05)).abs() < 1e-5);

        input.push(InputEvent::KeyReleased(KeyCode::KeyE));
        InputSystem::drain(&mut input, &mut camera, &mut settings, 0.016);
        assert!((settings.exposure - (start + 4.0 * 0.05)).abs() < 1e-5);
        assert!(!input.held.keys.contains(&KeyCode::KeyE));
    }

    #[test]
    fn test_press_and_release_in_one_frame() {
        let (mut input, mut camera, mut settings) = setup();
        let show_ao = settings.show_ao;

        input.push(InputEvent::KeyPressed(KeyCode::F2));
        input.push(InputEvent::KeyReleased(KeyCode::F2));
        InputSystem::drain(&mut input, &mut camera, &mut settings, 0.016);
        assert_eq!(settings.show_ao, !show_ao);
        assert!(!input.held.keys.contains(&KeyCode::F2));
    }

    #[test]
    fn test_tap_within_frame_moves_and_steps_once() {
        let (mut input, mut camera, mut settings) = setup();
        let start = camera.position;
        let exposure = settings.exposure;

        input.push(InputEvent::KeyPressed(KeyCode::KeyW));
        input.push(InputEvent::KeyReleased(KeyCode::KeyW));
        input.push(InputEvent::KeyPressed(KeyCode::KeyE));
        input.push(InputEvent::KeyReleased(KeyCode::KeyE));
        InputSystem::drain(&mut input, &mut camera, &mut settings, 0.5);

        assert!(((camera.position - start).mag() - camera.speed * 0.5).abs() < 1e-4);
        assert!((settings.exposure - (exposure + 0.05)).abs() < 1e-5);

        // Следующий кадр без событий: клавиши уже отпущены
        let position = camera.position;
        InputSystem::drain(&mut input, &mut camera, &mut settings, 0.5);
        assert_eq!(camera.position, position);
        assert!((settings.exposure - (exposure + 0.05)).abs() < 1e-5);
    }

    #[test]
    fn test_smaa_keys() {
        let (mut input, mut camera, mut settings) = setup();

        input.push(InputEvent::KeyPressed(KeyCode::KeyZ));
        input.push(InputEvent::KeyPressed(KeyCode::KeyX));
        InputSystem::drain(&mut input, &mut camera, &mut settings, 0.016);
        assert_eq!(settings.smaa, crate::gpu::post::SmaaMode::X1);
        assert!(settings.smaa_subsample_indices);
        assert!(!settings.taa);
    }

    #[test]
    fn test_movement_scales_with_dt() {
        let (mut input, mut camera, mut settings) = setup();
        let start = camera.position;

        input.push(InputEvent::KeyPressed(KeyCode::KeyW));
        InputSystem::drain(&mut input, &mut camera, &mut settings, 0.5);

        let moved = camera.position - start;
        assert!((moved.mag() - camera.speed * 0.5).abs() < 1e-4);
        assert!(moved.normalized().dot(camera.front()) > 0.999);
    }

    #[test]
    fn test_escape_requests_exit() {
        let (mut input, mut camera, mut settings) = setup();
        assert!(!InputSystem::drain(&mut input, &mut camera, &mut settings, 0.016));

        input.push(InputEvent::KeyPressed(KeyCode::Escape));
        assert!(InputSystem::drain(&mut input, &mut camera, &mut settings, 0.016));
    }

    #[test]
    fn test_unbound_keys_are_ignored() {
        let (mut input, mut camera, mut settings) = setup();
        let original = settings.clone();

        input.push(InputEvent::KeyPressed(KeyCode::KeyP));
        InputSystem::drain(&mut input, &mut camera, &mut settings, 0.016);
        assert_eq!(settings, original);
        assert!(input.held.keys.contains(&KeyCode::KeyP));
    }
}
