// ============================================
// Material - Классы материалов сцены
// ============================================
// Класс определяется один раз при загрузке; проходы рисуют
// "все opaque" или "все masked" и не смотрят на материалы.

/// Индекс текстуры в таблице сцены
pub type TextureId = usize;

/// Заглушки занимают первые слоты таблицы
pub const DUMMY_DIFFUSE: TextureId = 0;
pub const DUMMY_SPECULAR: TextureId = 1;
pub const DUMMY_NORMAL: TextureId = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Material {
    Opaque {
        diffuse: TextureId,
        specular: TextureId,
        normal: TextureId,
    },
    /// Альфа-тест; маски может не быть
    Masked {
        diffuse: TextureId,
        specular: TextureId,
        normal: TextureId,
        mask: Option<TextureId>,
    },
}

/// Откуда берётся маска при привязке
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskSource {
    /// Opaque: слот занят белой заглушкой и не читается
    Unused(TextureId),
    Texture(TextureId),
    /// Маски нет, используется альфа diffuse
    DiffuseAlpha(TextureId),
}

impl Material {
    /// base_color: текстура base color, если она есть и читается.
    /// У masked материала её альфа служит маской
    pub fn new(masked: bool, base_color: Option<TextureId>, specular: TextureId, normal: TextureId) -> Self {
        let diffuse = base_color.unwrap_or(DUMMY_DIFFUSE);
        if masked {
            Material::Masked {
                diffuse,
                specular,
                normal,
                mask: base_color,
            }
        } else {
            Material::Opaque {
                diffuse,
                specular,
                normal,
            }
        }
    }

    pub fn is_masked(&self) -> bool {
        matches!(self, Material::Masked { .. })
    }

    /// diffuse, specular, normal
    pub fn textures(&self) -> [TextureId; 3] {
        match *self {
            Material::Opaque { diffuse, specular, normal } => [diffuse, specular, normal],
            Material::Masked { diffuse, specular, normal, .. } => [diffuse, specular, normal],
        }
    }

    pub fn mask(&self) -> MaskSource {
        match *self {
            Material::Opaque { .. } => MaskSource::Unused(DUMMY_DIFFUSE),
            Material::Masked { mask: Some(mask), .. } => MaskSource::Texture(mask),
            Material::Masked { diffuse, mask: None, .. } => MaskSource::DiffuseAlpha(diffuse),
        }
    }
}

/// Разделить элементы на (opaque, masked)
pub fn partition_by_class<T>(items: Vec<T>, is_masked: impl Fn(&T) -> bool) -> (Vec<T>, Vec<T>) {
    items.into_iter().partition(|item| !is_masked(item))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alpha_mode_selects_class() {
        assert!(!Material::new(false, Some(3), 4, 5).is_masked());
        let masked = Material::new(true, Some(3), 4, 5);
        assert!(masked.is_masked());
        assert_eq!(masked.textures(), [3, 4, 5]);
    }

    #[test]
    fn test_masked_base_color_becomes_mask_texture() {
        assert_eq!(Material::new(true, Some(7), 1, 2).mask(), MaskSource::Texture(7));
        assert_eq!(Material::new(false, Some(7), 1, 2).mask(), MaskSource::Unused(DUMMY_DIFFUSE));
    }

    #[test]
    fn test_missing_base_color_falls_back_to_dummy() {
        let material = Material::new(true, None, 1, 2);
        assert_eq!(material.textures(), [DUMMY_DIFFUSE, 1, 2]);
        assert_eq!(material.mask(), MaskSource::DiffuseAlpha(DUMMY_DIFFUSE));
    }

    #[test]
    fn test_partition_keeps_order_within_class() {
        let materials = [Material::new(false, None, 1, 2), Material::new(true, None, 1, 2)];
        let meshes = vec![("wall", 0), ("leaves", 1), ("floor", 0), ("chain", 1)];
        let (opaque, masked) = partition_by_class(meshes, |(_, m)| materials[*m].is_masked());
        assert_eq!(opaque, vec![("wall", 0), ("floor", 0)]);
        assert_eq!(masked, vec![("leaves", 1), ("chain", 1)]);
    }
}
