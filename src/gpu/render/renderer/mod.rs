pub mod core;
mod params;
mod passes;
mod plan;
mod systems;

use std::sync::Arc;

use anyhow::Result;

use crate::gpu::camera::Camera;
use crate::gpu::core::settings::RenderSettings;

use self::core::{CachedFrame, LightingResources, RenderComponents, RendererState, ScreenResources, UniformBuffers};
use passes::PassContext;

pub use params::FrameParams;
use plan::{FramePlan, PresentSource, Stage};

pub struct Renderer {
    state: RendererState,
    components: RenderComponents,
    lighting: LightingResources,
    uniforms: UniformBuffers,
    screen: ScreenResources,
    cached: CachedFrame,
}

impl Renderer {
    pub async fn new(window: Arc<winit::window::Window>) -> Result<Self> {
        let (surface, device, queue, config, size) = core::init_gpu(window).await?;
        let (components, lighting, uniforms, screen) = core::init_components(&device, &queue, &config)?;

        log::info!("Renderer ready at {}x{}", config.width, config.height);

        Ok(Self {
            state: RendererState { surface, device, queue, config, size },
            components,
            lighting,
            uniforms,
            screen,
            cached: CachedFrame::default(),
        })
    }

    /// Новый размер: surface, все экранные цели и история заново
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.state.size = new_size;
            self.state.config.width = new_size.width;
            self.state.config.height = new_size.height;
            self.state.surface.configure(&self.state.device, &self.state.config);
            self.screen = ScreenResources::new(&self.state.device, new_size.width, new_size.height);
            self.cached.reset_history();
            log::debug!("Resized to {}x{}", new_size.width, new_size.height);
        }
    }

    pub fn size(&self) -> winit::dpi::PhysicalSize<u32> {
        self.state.size
    }

    pub fn render(
        &mut self,
        settings: &RenderSettings,
        camera: &Camera,
        delta_time: f32,
    ) -> Result<(), wgpu::SurfaceError> {
        let params = FrameParams::build(
            settings,
            camera,
            &self.lighting.csm.partition,
            self.cached.frame,
            delta_time,
            self.screen.size(),
            &self.cached.previous,
        );
        let plan = FramePlan::new(settings);

        systems::frame::update(&self.state.queue, &params, &plan, &self.lighting, &self.uniforms, &self.screen);

        let output = self.state.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.state.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });

        let ctx = PassContext {
            device: &self.state.device,
            layouts: &self.components.layouts,
            pipelines: &self.components.pipelines,
            samplers: &self.components.samplers,
            uniforms: &self.uniforms,
        };
        let scene = &self.components.scene;

        for stage in plan.stages() {
            let targets = &self.screen.targets;
            let history = &self.screen.history;

            match *stage {
                Stage::Shadow => passes::shadow::render(&mut encoder, ctx.pipelines, &self.lighting.csm, scene),
                Stage::Geometry => passes::geometry::render(
                    &mut encoder,
                    ctx.pipelines,
                    &self.uniforms.geometry_bind_group,
                    targets,
                    &history.full_depth.current().view,
                    scene,
                ),
                Stage::DepthDownsample => passes::ambient_occlusion::downsample(&mut encoder, &ctx, targets, history),
                Stage::AoEstimate => passes::ambient_occlusion::estimate(&mut encoder, &ctx, targets, history),
                Stage::AoSpatialDenoise => {
                    passes::ambient_occlusion::spatial_denoise(&mut encoder, &ctx, targets, history)
                }
                Stage::AoTemporalDenoise => {
                    passes::ambient_occlusion::temporal_denoise(&mut encoder, &ctx, targets, history)
                }
                Stage::Shading => passes::shading::render(&mut encoder, &ctx, &self.lighting, targets, history),
                Stage::DiffuseLightMips => passes::mipmap::render(&mut encoder, &ctx, &targets.diffuse_light),
                Stage::EyeAdaptation => passes::eye_adaptation::render(&mut encoder, &ctx, &self.lighting, targets),
                Stage::ToneMap => passes::tonemap::render(&mut encoder, &ctx, &self.lighting, targets, history),
                Stage::TemporalResolve => passes::taa::render(&mut encoder, &ctx, targets, history),
                Stage::SmaaEdges => passes::smaa::edges(&mut encoder, &ctx, targets),
                Stage::SmaaWeights => passes::smaa::weights(&mut encoder, &ctx, &self.components.smaa_area, targets),
                Stage::SmaaBlend => passes::smaa::blend(&mut encoder, &ctx, targets, history),
                Stage::SmaaTemporalResolve => passes::smaa::temporal_resolve(&mut encoder, &ctx, targets, history),
                Stage::Present(source) => {
                    let source_view = match source {
                        PresentSource::ToneMapped => &targets.ldr.view,
                        PresentSource::TemporalResolve => &history.taa_color.current().view,
                        PresentSource::SmaaBlend => &history.smaa_color.current().view,
                        PresentSource::SmaaResolve => &targets.smaa_resolve.view,
                    };
                    passes::present::render(&mut encoder, &ctx, source_view, &view);
                }
                Stage::SwapHistory(kind) => self.screen.history.swap(kind),
            }
        }

        self.state.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        self.cached.advance(&params, &plan);
        Ok(())
    }
}
