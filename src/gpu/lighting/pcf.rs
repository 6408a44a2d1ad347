// ============================================
// PCF Rotation - Объём случайных углов для фильтрации теней
// ============================================
// Генерируется один раз при старте, в шейдере читается
// через textureLoad (без сэмплера).

use rand::{rngs::StdRng, Rng, SeedableRng};

/// size^3 углов в [0, 2π)
pub fn random_angles(size: u32, seed: u64) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    let count = (size * size * size) as usize;
    (0..count)
        .map(|_| rng.gen_range(0.0..std::f32::consts::TAU))
        .collect()
}

/// 3D текстура R32Float
pub struct RandomAngleVolume {
    pub view: wgpu::TextureView,
}

impl RandomAngleVolume {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, size: u32, seed: u64) -> Self {
        let extent = wgpu::Extent3d {
            width: size,
            height: size,
            depth_or_array_layers: size,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("PCF Random Angles"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D3,
            format: wgpu::TextureFormat::R32Float,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        let angles = random_angles(size, seed);
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            bytemuck::cast_slice(&angles),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(size * 4),
                rows_per_image: Some(size),
            },
            extent,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self { view }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_angles_are_in_range() {
        let angles = random_angles(16, 7);
        assert_eq!(angles.len(), 16 * 16 * 16);
        assert!(angles.iter().all(|a| *a >= 0.0 && *a < std::f32::consts::TAU));
    }

    #[test]
    fn test_angles_are_reproducible() {
        assert_eq!(random_angles(4, 42), random_angles(4, 42));
        assert_ne!(random_angles(4, 42), random_angles(4, 43));
    }
}
