// ============================================
// Texture - Текстуры материалов с мипами
// ============================================
// Мипы строятся на CPU (image::imageops), wgpu их не генерирует.

use image::{imageops::FilterType, RgbaImage};

/// Цвета заглушек для отсутствующих текстур
pub const WHITE: [u8; 4] = [255, 255, 255, 255];
/// Metallic/roughness: полностью шероховатая поверхность, без блика
pub const NO_SPECULAR: [u8; 4] = [0, 255, 0, 255];
/// Нормаль (0, 0, 1) в tangent space
pub const FLAT_NORMAL: [u8; 4] = [128, 128, 255, 255];

pub struct GpuTexture {
    pub view: wgpu::TextureView,
}

/// Цепочка уровней до 1x1
pub fn build_mip_chain(base: RgbaImage) -> Vec<RgbaImage> {
    let mut levels = vec![base];
    loop {
        let last = &levels[levels.len() - 1];
        let (w, h) = last.dimensions();
        if w == 1 && h == 1 {
            break;
        }
        let next = image::imageops::resize(last, (w / 2).max(1), (h / 2).max(1), FilterType::Triangle);
        levels.push(next);
    }
    levels
}

impl GpuTexture {
    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        image: RgbaImage,
        format: wgpu::TextureFormat,
    ) -> Self {
        let (width, height) = image.dimensions();
        let levels = build_mip_chain(image);

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: levels.len() as u32,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (level, data) in levels.iter().enumerate() {
            let (w, h) = data.dimensions();
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: level as u32,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                data.as_raw(),
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * w),
                    rows_per_image: Some(h),
                },
                wgpu::Extent3d {
                    width: w,
                    height: h,
                    depth_or_array_layers: 1,
                },
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { view }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mip_chain_ends_at_one_texel() {
        let levels = build_mip_chain(RgbaImage::new(64, 16));
        assert_eq!(levels.len(), 7);
        assert_eq!(levels[1].dimensions(), (32, 8));
        assert_eq!(levels[5].dimensions(), (2, 1));
        assert_eq!(levels[6].dimensions(), (1, 1));
    }

    #[test]
    fn test_mip_chain_averages() {
        let base = RgbaImage::from_pixel(4, 4, image::Rgba([200, 100, 50, 255]));
        let levels = build_mip_chain(base);
        assert_eq!(levels[2].get_pixel(0, 0).0, [200, 100, 50, 255]);
    }
}
