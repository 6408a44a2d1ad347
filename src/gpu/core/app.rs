// ============================================
// App - Главный обработчик приложения
// ============================================

use std::sync::Arc;
use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, ElementState, KeyEvent, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowId},
};

use crate::gpu::core::config::{WINDOW_HEIGHT, WINDOW_TITLE, WINDOW_WIDTH};
use crate::gpu::core::AppResources;
use crate::gpu::systems::{InitSystem, InputEvent, InputSystem, RenderSystem, UpdateSystem};

/// Главное приложение
pub struct App {
    resources: AppResources,
}

impl App {
    pub fn new() -> Self {
        Self {
            resources: AppResources::new(),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.resources.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(winit::dpi::PhysicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => InitSystem::fatal("Failed to create window", e),
        };

        InputSystem::grab_cursor(&window);
        InitSystem::init_rendering(&mut self.resources, window);
        self.resources.last_frame = Instant::now();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::Resized(physical_size) => {
                if let Some(renderer) = &mut self.resources.renderer {
                    renderer.resize(physical_size);
                }
            }

            WindowEvent::KeyboardInput {
                event: KeyEvent {
                    physical_key: PhysicalKey::Code(keycode),
                    state,
                    repeat,
                    ..
                },
                ..
            } => match state {
                ElementState::Pressed if !repeat => {
                    self.resources.input.push(InputEvent::KeyPressed(keycode));
                }
                ElementState::Released => {
                    self.resources.input.push(InputEvent::KeyReleased(keycode));
                }
                _ => {}
            },

            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let dt = (now - self.resources.last_frame).as_secs_f32();
                self.resources.last_frame = now;

                // Update
                UpdateSystem::update(&mut self.resources, dt);
                if self.resources.exit_requested {
                    event_loop.exit();
                    return;
                }

                // Render
                RenderSystem::render(&mut self.resources, dt, event_loop);

                if let Some(window) = &self.resources.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        match event {
            // Экранная ось y направлена вниз, камере нужен "вверх"
            DeviceEvent::MouseMotion { delta } => {
                self.resources
                    .input
                    .push(InputEvent::MouseDelta(delta.0 as f32, -delta.1 as f32));
            }

            DeviceEvent::MouseWheel { delta } => {
                let dy = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => (pos.y / 100.0) as f32,
                };
                self.resources.input.push(InputEvent::Scroll(dy));
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.resources.window {
            window.request_redraw();
        }
    }
}

/// Запуск демо
pub fn run() {
    env_logger::init();

    println!("=== Controls ===");
    println!("WASD - Move, Mouse - Look, Wheel - Zoom");
    println!("Q/E - Exposure");
    println!("Numpad 4/6 - Sun X position");
    println!("R/T - Shadow bias");
    println!("Y/U - Normal offset bias");
    println!("K/L - Shadow filter size");
    println!(",/. - Light width");
    println!("V/B - AO radius");
    println!("I/O - AO rate of change");
    println!("9/0 - TAA blend rate");
    println!("G - Shadow map view, H - Next cascade");
    println!("N - Normal mapping");
    println!("Z - SMAA (off / 1x / T2x), X - SMAA subsample indices");
    println!("C - TAA, J - Jitter pattern (flip / Halton)");
    println!("F1 - AO, F2 - AO view, F3 - Eye adaptation");
    println!("Escape - Quit");
    println!("================");

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => InitSystem::fatal("Failed to create event loop", e),
    };
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("Event loop terminated: {e}");
    }
}
