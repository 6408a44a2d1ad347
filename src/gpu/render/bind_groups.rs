// ============================================
// Bind Group Layouts - Раскладки всех проходов
// ============================================
// Номера слотов здесь и в WGSL должны совпадать.

fn uniform_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn storage_entry(binding: u32, visibility: wgpu::ShaderStages, read_only: bool) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn texture_entry(
    binding: u32,
    visibility: wgpu::ShaderStages,
    sample_type: wgpu::TextureSampleType,
    view_dimension: wgpu::TextureViewDimension,
) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Texture {
            sample_type,
            view_dimension,
            multisampled: false,
        },
        count: None,
    }
}

/// Текстура, читаемая через textureLoad
fn load_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    texture_entry(
        binding,
        wgpu::ShaderStages::FRAGMENT,
        wgpu::TextureSampleType::Float { filterable: false },
        wgpu::TextureViewDimension::D2,
    )
}

/// Текстура с фильтрацией
fn filtered_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    texture_entry(
        binding,
        wgpu::ShaderStages::FRAGMENT,
        wgpu::TextureSampleType::Float { filterable: true },
        wgpu::TextureViewDimension::D2,
    )
}

fn depth_entry(binding: u32, view_dimension: wgpu::TextureViewDimension) -> wgpu::BindGroupLayoutEntry {
    texture_entry(binding, wgpu::ShaderStages::FRAGMENT, wgpu::TextureSampleType::Depth, view_dimension)
}

fn sampler_entry(binding: u32, ty: wgpu::SamplerBindingType) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(ty),
        count: None,
    }
}

fn layout(device: &wgpu::Device, label: &str, entries: &[wgpu::BindGroupLayoutEntry]) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries,
    })
}

pub struct BindGroupLayouts {
    /// Матрицы камеры для geometry pass
    pub geometry: wgpu::BindGroupLayout,
    /// Текстуры материала (diffuse, specular, normal, mask)
    pub material: wgpu::BindGroupLayout,
    /// Матрица света одного каскада
    pub shadow_pass: wgpu::BindGroupLayout,
    pub depth_downsample: wgpu::BindGroupLayout,
    pub ssao: wgpu::BindGroupLayout,
    pub ao_spatial: wgpu::BindGroupLayout,
    pub ao_temporal: wgpu::BindGroupLayout,
    pub shading: wgpu::BindGroupLayout,
    pub mipmap: wgpu::BindGroupLayout,
    pub eye_adaptation: wgpu::BindGroupLayout,
    pub tonemap: wgpu::BindGroupLayout,
    pub taa: wgpu::BindGroupLayout,
    pub smaa_edges: wgpu::BindGroupLayout,
    /// Рёбра + таблица площадей
    pub smaa_weights: wgpu::BindGroupLayout,
    pub smaa_blend: wgpu::BindGroupLayout,
    pub smaa_temporal: wgpu::BindGroupLayout,
    pub present: wgpu::BindGroupLayout,
}

impl BindGroupLayouts {
    pub fn new(device: &wgpu::Device) -> Self {
        use wgpu::SamplerBindingType as S;
        use wgpu::ShaderStages as Stage;
        use wgpu::TextureViewDimension as Dim;

        let geometry = layout(device, "Geometry Layout", &[
            uniform_entry(0, Stage::VERTEX | Stage::FRAGMENT),
        ]);

        let material = layout(device, "Material Layout", &[
            filtered_entry(0),
            filtered_entry(1),
            filtered_entry(2),
            filtered_entry(3),
            sampler_entry(4, S::Filtering),
            sampler_entry(5, S::NonFiltering),
        ]);

        let shadow_pass = layout(device, "Shadow Pass Layout", &[
            uniform_entry(0, Stage::VERTEX),
        ]);

        let depth_downsample = layout(device, "Depth Downsample Layout", &[
            depth_entry(0, Dim::D2),
            load_entry(1),
        ]);

        let ssao = layout(device, "SSAO Layout", &[
            load_entry(0),
            uniform_entry(1, Stage::FRAGMENT),
        ]);

        let ao_spatial = layout(device, "AO Spatial Layout", &[
            load_entry(0),
            load_entry(1),
            uniform_entry(2, Stage::FRAGMENT),
        ]);

        let ao_temporal = layout(device, "AO Temporal Layout", &[
            load_entry(0),
            filtered_entry(1),
            load_entry(2),
            load_entry(3),
            load_entry(4),
            sampler_entry(5, S::Filtering),
            uniform_entry(6, Stage::FRAGMENT),
        ]);

        let shading = layout(device, "Shading Layout", &[
            load_entry(0),
            load_entry(1),
            depth_entry(2, Dim::D2),
            depth_entry(3, Dim::D2Array),
            sampler_entry(4, S::Comparison),
            sampler_entry(5, S::NonFiltering),
            texture_entry(
                6,
                Stage::FRAGMENT,
                wgpu::TextureSampleType::Float { filterable: false },
                Dim::D3,
            ),
            load_entry(7),
            uniform_entry(8, Stage::FRAGMENT),
        ]);

        let mipmap = layout(device, "Mipmap Layout", &[
            filtered_entry(0),
            sampler_entry(1, S::Filtering),
        ]);

        let eye_adaptation = layout(device, "Eye Adaptation Layout", &[
            texture_entry(
                0,
                Stage::COMPUTE,
                wgpu::TextureSampleType::Float { filterable: false },
                Dim::D2,
            ),
            storage_entry(1, Stage::COMPUTE, false),
            uniform_entry(2, Stage::COMPUTE),
        ]);

        let tonemap = layout(device, "Tone Map Layout", &[
            load_entry(0),
            load_entry(1),
            depth_entry(2, Dim::D2Array),
            storage_entry(3, Stage::FRAGMENT, true),
            uniform_entry(4, Stage::FRAGMENT),
        ]);

        let taa = layout(device, "TAA Layout", &[
            load_entry(0),
            filtered_entry(1),
            load_entry(2),
            depth_entry(3, Dim::D2),
            depth_entry(4, Dim::D2),
            sampler_entry(5, S::Filtering),
            uniform_entry(6, Stage::FRAGMENT),
        ]);

        let smaa_edges = layout(device, "SMAA Edges Layout", &[
            load_entry(0),
            uniform_entry(1, Stage::FRAGMENT),
        ]);

        let smaa_weights = layout(device, "SMAA Weights Layout", &[
            load_entry(0),
            filtered_entry(1),
            sampler_entry(2, S::Filtering),
            uniform_entry(3, Stage::FRAGMENT),
        ]);

        let smaa_blend = layout(device, "SMAA Blend Layout", &[
            filtered_entry(0),
            load_entry(1),
            load_entry(2),
            sampler_entry(3, S::Filtering),
            uniform_entry(4, Stage::FRAGMENT),
        ]);

        let smaa_temporal = layout(device, "SMAA Temporal Layout", &[
            load_entry(0),
            filtered_entry(1),
            load_entry(2),
            sampler_entry(3, S::Filtering),
            uniform_entry(4, Stage::FRAGMENT),
        ]);

        let present = layout(device, "Present Layout", &[
            load_entry(0),
        ]);

        Self {
            geometry,
            material,
            shadow_pass,
            depth_downsample,
            ssao,
            ao_spatial,
            ao_temporal,
            shading,
            mipmap,
            eye_adaptation,
            tonemap,
            taa,
            smaa_edges,
            smaa_weights,
            smaa_blend,
            smaa_temporal,
            present,
        }
    }
}
