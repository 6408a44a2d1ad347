use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use bytemuck::Pod;
use wgpu::util::DeviceExt;

use crate::gpu::core::config::{
    CASCADE_FAR, CASCADE_NEAR, NUM_CASCADES, RANDOM_ANGLES_SEED, RANDOM_ANGLES_SIZE, SCENE_PATH, SHADOW_MAP_SIZE,
};
use crate::gpu::lighting::{CascadePartition, CascadedShadowMaps, RandomAngleVolume};
use crate::gpu::post::SmaaAreaTexture;
use crate::gpu::render::bind_groups::BindGroupLayouts;
use crate::gpu::render::binding::BindingTable;
use crate::gpu::render::pipelines::Pipelines;
use crate::gpu::render::samplers::Samplers;
use crate::gpu::render::uniforms::{
    AoDenoiseUniform, EyeAdaptationUniform, GeometryUniform, ShadingUniform, SmaaUniform, SsaoUniform, TaaUniform,
    ToneMapUniform,
};
use crate::gpu::scene::Scene;

use super::state::{LightingResources, RenderComponents, ScreenResources, UniformBuffers};

/// Инициализация GPU устройства и surface
pub async fn init_gpu(window: Arc<winit::window::Window>) -> Result<(
    wgpu::Surface<'static>,
    Arc<wgpu::Device>,
    Arc<wgpu::Queue>,
    wgpu::SurfaceConfiguration,
    winit::dpi::PhysicalSize<u32>,
)> {
    let size = window.inner_size();
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    });

    let surface = instance.create_surface(window).context("creating window surface")?;
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        })
        .await
        .context("no suitable GPU adapter")?;

    log::info!("Adapter: {:?}", adapter.get_info());

    let (device, queue) = adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("GPU Device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            memory_hints: Default::default(),
            trace: wgpu::Trace::Off,
        })
        .await
        .context("requesting GPU device")?;

    // Ошибки валидации после инициализации только логируются
    device.on_uncaptured_error(Box::new(|error| {
        log::error!("wgpu: {}", error);
    }));

    let device = Arc::new(device);
    let queue = Arc::new(queue);

    let surface_caps = surface.get_capabilities(&adapter);
    let surface_format = surface_caps
        .formats
        .iter()
        .find(|f| f.is_srgb())
        .or_else(|| surface_caps.formats.first())
        .copied()
        .context("surface reports no formats")?;
    let alpha_mode = surface_caps
        .alpha_modes
        .first()
        .copied()
        .context("surface reports no alpha modes")?;

    let config = wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format: surface_format,
        width: size.width.max(1),
        height: size.height.max(1),
        present_mode: wgpu::PresentMode::AutoVsync,
        alpha_mode,
        view_formats: vec![],
        desired_maximum_frame_latency: 2,
    };
    surface.configure(&device, &config);

    Ok((surface, device, queue, config, size))
}

fn uniform_buffer<T: Pod>(device: &wgpu::Device, label: &str) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: std::mem::size_of::<T>() as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Инициализация всех компонентов рендеринга
pub fn init_components(
    device: &Arc<wgpu::Device>,
    queue: &Arc<wgpu::Queue>,
    config: &wgpu::SurfaceConfiguration,
) -> Result<(RenderComponents, LightingResources, UniformBuffers, ScreenResources)> {
    let layouts = BindGroupLayouts::new(device);
    let samplers = Samplers::new(device);

    // Ошибка сборки программы - фатальная, поднимается наверх
    let pipelines = Pipelines::new(device, config.format, &layouts).context("building render pipelines")?;

    let scene = Scene::load(device, queue, Path::new(SCENE_PATH), &layouts.material, &samplers)
        .with_context(|| format!("loading scene {}", SCENE_PATH))?;

    // Shadows
    let partition = CascadePartition::compute_view_space_limits(CASCADE_NEAR, CASCADE_FAR, NUM_CASCADES);
    let csm = CascadedShadowMaps::new(device, &layouts.shadow_pass, partition, SHADOW_MAP_SIZE);
    let random_angles = RandomAngleVolume::new(device, queue, RANDOM_ANGLES_SIZE, RANDOM_ANGLES_SEED);

    let adapted_luminance = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Adapted Luminance Buffer"),
        contents: bytemuck::cast_slice(&[1.0f32]),
        usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
    });

    // Uniforms
    let geometry = uniform_buffer::<GeometryUniform>(device, "Geometry Uniform Buffer");
    let geometry_bind_group = BindingTable::new("Geometry Bind Group")
        .buffer(0, &geometry)
        .build(device, &layouts.geometry);

    let uniforms = UniformBuffers {
        geometry_bind_group,
        geometry,
        ssao: uniform_buffer::<SsaoUniform>(device, "SSAO Uniform Buffer"),
        ao_denoise: uniform_buffer::<AoDenoiseUniform>(device, "AO Denoise Uniform Buffer"),
        shading: uniform_buffer::<ShadingUniform>(device, "Shading Uniform Buffer"),
        eye_adaptation: uniform_buffer::<EyeAdaptationUniform>(device, "Eye Adaptation Uniform Buffer"),
        tonemap: uniform_buffer::<ToneMapUniform>(device, "Tone Map Uniform Buffer"),
        taa: uniform_buffer::<TaaUniform>(device, "TAA Uniform Buffer"),
        smaa: uniform_buffer::<SmaaUniform>(device, "SMAA Uniform Buffer"),
    };

    let screen = ScreenResources::new(device, config.width, config.height);

    let components = RenderComponents {
        layouts,
        pipelines,
        samplers,
        scene,
        smaa_area: SmaaAreaTexture::new(device, queue),
    };

    let lighting = LightingResources {
        csm,
        random_angles,
        adapted_luminance,
    };

    Ok((components, lighting, uniforms, screen))
}
