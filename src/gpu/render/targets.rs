// ============================================
// Render Targets - Экранные буферы кадра
// ============================================
// Всё, что зависит от размера окна, создаётся здесь и
// пересоздаётся целиком при resize.

use crate::gpu::post::{HistoryBuffers, PingPong};

pub const DIFFUSE_SPEC_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
pub const NORMAL_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgb10a2Unorm;
pub const VELOCITY_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rg16Float;
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
pub const HDR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;
pub const DIFFUSE_LIGHT_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::R16Float;
pub const HALF_DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::R32Float;
pub const AO_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::R8Unorm;
pub const LDR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;
pub const SMAA_EDGES_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rg8Unorm;
pub const SMAA_WEIGHTS_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// floor(log2(max(w, h))) + 1
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

/// Половинное разрешение, не меньше 1
pub fn half_extent(width: u32, height: u32) -> (u32, u32) {
    ((width / 2).max(1), (height / 2).max(1))
}

/// View на весь ресурс; view держит текстуру живой
pub struct RenderTarget {
    pub view: wgpu::TextureView,
}

impl RenderTarget {
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        (width, height): (u32, u32),
        format: wgpu::TextureFormat,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self { view }
    }
}

/// Текстура с полной цепочкой мипов и view на каждый уровень
pub struct MipTarget {
    /// View на все уровни (textureLoad с номером мипа)
    pub view: wgpu::TextureView,
    pub level_views: Vec<wgpu::TextureView>,
    pub level_count: u32,
}

impl MipTarget {
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        (width, height): (u32, u32),
        format: wgpu::TextureFormat,
    ) -> Self {
        let level_count = mip_level_count(width, height);
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: level_count,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let level_views = (0..level_count)
            .map(|level| {
                texture.create_view(&wgpu::TextureViewDescriptor {
                    label: Some(&format!("{} Mip {}", label, level)),
                    base_mip_level: level,
                    mip_level_count: Some(1),
                    ..Default::default()
                })
            })
            .collect();

        Self {
            view,
            level_views,
            level_count,
        }
    }

    pub fn last_level(&self) -> u32 {
        self.level_count - 1
    }
}

/// Промежуточные буферы одного кадра
pub struct FrameTargets {
    pub width: u32,
    pub height: u32,

    // G-buffer
    pub diffuse_spec: RenderTarget,
    pub normal: RenderTarget,
    pub velocity: RenderTarget,

    // SSAO (половинное разрешение)
    pub velocity_half: RenderTarget,
    pub ao_raw: RenderTarget,
    pub ao_spatial: RenderTarget,

    // Освещение и пост-обработка
    pub hdr: RenderTarget,
    pub diffuse_light: MipTarget,
    pub ldr: RenderTarget,

    // SMAA
    pub smaa_edges: RenderTarget,
    pub smaa_weights: RenderTarget,
    /// Итог T2x resolve
    pub smaa_resolve: RenderTarget,
}

impl FrameTargets {
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let full = (width.max(1), height.max(1));
        let half = half_extent(width, height);

        Self {
            width: full.0,
            height: full.1,
            diffuse_spec: RenderTarget::new(device, "GBuffer Diffuse/Spec", full, DIFFUSE_SPEC_FORMAT),
            normal: RenderTarget::new(device, "GBuffer Normal", full, NORMAL_FORMAT),
            velocity: RenderTarget::new(device, "GBuffer Velocity", full, VELOCITY_FORMAT),
            velocity_half: RenderTarget::new(device, "Velocity Half", half, VELOCITY_FORMAT),
            ao_raw: RenderTarget::new(device, "AO Raw", half, AO_FORMAT),
            ao_spatial: RenderTarget::new(device, "AO Spatially Denoised", half, AO_FORMAT),
            hdr: RenderTarget::new(device, "HDR", full, HDR_FORMAT),
            diffuse_light: MipTarget::new(device, "Diffuse Light", full, DIFFUSE_LIGHT_FORMAT),
            ldr: RenderTarget::new(device, "LDR", full, LDR_FORMAT),
            smaa_edges: RenderTarget::new(device, "SMAA Edges", full, SMAA_EDGES_FORMAT),
            smaa_weights: RenderTarget::new(device, "SMAA Blend Weights", full, SMAA_WEIGHTS_FORMAT),
            smaa_resolve: RenderTarget::new(device, "SMAA Resolve", full, LDR_FORMAT),
        }
    }
}

/// Пары истории; содержимое начинается заново после resize
pub fn create_history(device: &wgpu::Device, width: u32, height: u32) -> HistoryBuffers<RenderTarget> {
    let full = (width.max(1), height.max(1));
    let half = half_extent(width, height);
    let pair = |label: &str, size, format| {
        PingPong::new(
            RenderTarget::new(device, &format!("{} A", label), size, format),
            RenderTarget::new(device, &format!("{} B", label), size, format),
        )
    };

    HistoryBuffers {
        half_depth: pair("Half Depth", half, HALF_DEPTH_FORMAT),
        ambient_occlusion: pair("AO Accumulation", half, AO_FORMAT),
        taa_color: pair("TAA Color", full, LDR_FORMAT),
        full_depth: pair("Depth", full, DEPTH_FORMAT),
        smaa_color: pair("SMAA Color", full, LDR_FORMAT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mip_level_count() {
        assert_eq!(mip_level_count(1, 1), 1);
        assert_eq!(mip_level_count(2, 1), 2);
        assert_eq!(mip_level_count(1920, 1080), 11);
        assert_eq!(mip_level_count(1024, 1024), 11);
        assert_eq!(mip_level_count(1023, 17), 10);
    }

    #[test]
    fn test_half_extent_never_zero() {
        assert_eq!(half_extent(1920, 1080), (960, 540));
        assert_eq!(half_extent(1, 1), (1, 1));
        assert_eq!(half_extent(3, 0), (1, 1));
    }
}
