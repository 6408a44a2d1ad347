// ============================================
// Samplers - Общие сэмплеры
// ============================================

pub struct Samplers {
    /// Билинейный, clamp (история AO/TAA, мипы)
    pub linear_clamp: wgpu::Sampler,
    /// Point, repeat (маска альфы)
    pub nearest_repeat: wgpu::Sampler,
    /// Анизотропный, repeat (текстуры материалов)
    pub anisotropic_repeat: wgpu::Sampler,
}

impl Samplers {
    pub fn new(device: &wgpu::Device) -> Self {
        let linear_clamp = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Linear Clamp Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let nearest_repeat = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Nearest Repeat Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        // Анизотропия требует linear во всех фильтрах
        let anisotropic_repeat = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Anisotropic Repeat Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            anisotropy_clamp: 16,
            ..Default::default()
        });

        Self {
            linear_clamp,
            nearest_repeat,
            anisotropic_repeat,
        }
    }
}
