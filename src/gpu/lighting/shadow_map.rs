// ============================================
// Shadow Map Array - Глубина всех каскадов в одной текстуре
// ============================================

/// Формат глубины теней
pub const SHADOW_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Shadow map array для CSM (все каскады в одной текстуре)
pub struct ShadowMapArray {
    /// Views для рендеринга каждого слоя
    pub layer_views: Vec<wgpu::TextureView>,
    /// View для сэмплирования всего массива
    pub array_view: wgpu::TextureView,
    /// Sampler с comparison (PCF)
    pub compare_sampler: wgpu::Sampler,
    /// Sampler для чтения сырой глубины (поиск блокеров, отладка)
    pub depth_sampler: wgpu::Sampler,
}

impl ShadowMapArray {
    pub fn new(device: &wgpu::Device, resolution: u32, num_cascades: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("CSM Shadow Map Array"),
            size: wgpu::Extent3d {
                width: resolution,
                height: resolution,
                depth_or_array_layers: num_cascades,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: SHADOW_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                 | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });

        // View для каждого слоя (для рендеринга)
        let layer_views: Vec<_> = (0..num_cascades)
            .map(|i| {
                texture.create_view(&wgpu::TextureViewDescriptor {
                    label: Some(&format!("Shadow Map Layer {} View", i)),
                    format: Some(SHADOW_FORMAT),
                    dimension: Some(wgpu::TextureViewDimension::D2),
                    aspect: wgpu::TextureAspect::DepthOnly,
                    base_array_layer: i,
                    array_layer_count: Some(1),
                    ..Default::default()
                })
            })
            .collect();

        let array_view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("CSM Shadow Map Array View"),
            format: Some(SHADOW_FORMAT),
            dimension: Some(wgpu::TextureViewDimension::D2Array),
            aspect: wgpu::TextureAspect::DepthOnly,
            base_array_layer: 0,
            array_layer_count: Some(num_cascades),
            ..Default::default()
        });

        // Reversed-Z: ближе к свету = больше, освещено если depth >= stored
        let compare_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("CSM Compare Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            compare: Some(wgpu::CompareFunction::GreaterEqual),
            ..Default::default()
        });

        let depth_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("CSM Depth Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            layer_views,
            array_view,
            compare_sampler,
            depth_sampler,
        }
    }
}
