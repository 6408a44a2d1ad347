use std::sync::Arc;

use crate::gpu::lighting::{CascadedShadowMaps, RandomAngleVolume};
use crate::gpu::post::{HistoryBuffers, SmaaAreaTexture};
use crate::gpu::render::bind_groups::BindGroupLayouts;
use crate::gpu::render::pipelines::Pipelines;
use crate::gpu::render::samplers::Samplers;
use crate::gpu::render::targets::{create_history, FrameTargets, RenderTarget};
use crate::gpu::scene::Scene;

use super::super::params::{FrameParams, PreviousFrame};
use super::super::plan::FramePlan;

/// Основное состояние рендерера (GPU ресурсы)
pub struct RendererState {
    pub surface: wgpu::Surface<'static>,
    pub device: Arc<wgpu::Device>,
    pub queue: Arc<wgpu::Queue>,
    pub config: wgpu::SurfaceConfiguration,
    pub size: winit::dpi::PhysicalSize<u32>,
}

/// Компоненты рендеринга, не зависящие от размера окна
pub struct RenderComponents {
    pub layouts: BindGroupLayouts,
    pub pipelines: Pipelines,
    pub samplers: Samplers,
    pub scene: Scene,
    pub smaa_area: SmaaAreaTexture,
}

/// Ресурсы освещения и теней
pub struct LightingResources {
    pub csm: CascadedShadowMaps,
    pub random_angles: RandomAngleVolume,
    /// Адаптированная яркость: одно f32, живёт между кадрами и не участвует в swap
    pub adapted_luminance: wgpu::Buffer,
}

/// Uniform буферы проходов
pub struct UniformBuffers {
    pub geometry: wgpu::Buffer,
    pub geometry_bind_group: wgpu::BindGroup,
    pub ssao: wgpu::Buffer,
    pub ao_denoise: wgpu::Buffer,
    pub shading: wgpu::Buffer,
    pub eye_adaptation: wgpu::Buffer,
    pub tonemap: wgpu::Buffer,
    pub taa: wgpu::Buffer,
    pub smaa: wgpu::Buffer,
}

/// Экранные цели и история; пересоздаются при resize
pub struct ScreenResources {
    pub targets: FrameTargets,
    pub history: HistoryBuffers<RenderTarget>,
}

impl ScreenResources {
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        Self {
            targets: FrameTargets::new(device, width, height),
            history: create_history(device, width, height),
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.targets.width, self.targets.height)
    }
}

/// Что кадр оставляет следующему
#[derive(Default)]
pub struct CachedFrame {
    pub frame: u64,
    pub previous: PreviousFrame,
}

impl CachedFrame {
    pub fn advance(&mut self, params: &FrameParams, plan: &FramePlan) {
        self.frame = self.frame.wrapping_add(1);
        self.previous.view_proj = Some(params.view_proj);
        self.previous.history.advance(plan.swaps());
    }

    /// После resize история пуста, velocity не к чему привязывать
    pub fn reset_history(&mut self) {
        self.previous.view_proj = None;
        self.previous.history.invalidate_all();
    }
}
