// ============================================
// Model - Загрузка сцены из glTF и отрисовка по классам материалов
// ============================================

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use image::RgbaImage;
use ultraviolet::{Mat3, Mat4, Vec3, Vec4};

use crate::gpu::render::{BindingTable, Samplers};

use super::material::{
    partition_by_class, MaskSource, Material, TextureId, DUMMY_NORMAL, DUMMY_SPECULAR,
};
use super::mesh::{fallback_tangent, fix_tangent, GpuMesh, MeshData, ModelVertex};
use super::texture::{GpuTexture, FLAT_NORMAL, NO_SPECULAR, WHITE};

/// Группа материала в geometry и masked shadow pipeline
pub const MATERIAL_GROUP: u32 = 1;

const SRGB: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;
const LINEAR: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Декодированная текстура до загрузки на GPU
struct TextureData {
    label: String,
    image: RgbaImage,
    format: wgpu::TextureFormat,
}

/// Сцена на CPU: меши, материалы и таблица текстур
struct SceneData {
    meshes: Vec<MeshData>,
    materials: Vec<Material>,
    textures: Vec<TextureData>,
}

fn dummy_textures() -> Vec<TextureData> {
    [
        ("Dummy Diffuse", WHITE, SRGB),
        ("Dummy Specular", NO_SPECULAR, LINEAR),
        ("Dummy Normal", FLAT_NORMAL, LINEAR),
    ]
    .into_iter()
    .map(|(label, color, format)| TextureData {
        label: label.to_string(),
        image: RgbaImage::from_pixel(1, 1, image::Rgba(color)),
        format,
    })
    .collect()
}

fn decode_image(image: &gltf::Image, base: &Path, buffers: &[gltf::buffer::Data]) -> Result<RgbaImage> {
    let decoded = match image.source() {
        gltf::image::Source::Uri { uri, .. } => {
            let path = base.join(uri);
            image::open(&path).with_context(|| format!("decoding {}", path.display()))?
        }
        gltf::image::Source::View { view, .. } => {
            let buffer = buffers
                .get(view.buffer().index())
                .ok_or_else(|| anyhow!("image view points to missing buffer"))?;
            let bytes = buffer
                .0
                .get(view.offset()..view.offset() + view.length())
                .ok_or_else(|| anyhow!("image view out of buffer bounds"))?;
            image::load_from_memory(bytes).context("decoding embedded image")?
        }
    };
    Ok(decoded.to_rgba8())
}

struct TextureCache<'a> {
    base: &'a Path,
    buffers: &'a [gltf::buffer::Data],
    textures: Vec<TextureData>,
    /// None - изображение не декодировалось
    loaded: HashMap<(usize, bool), Option<TextureId>>,
}

impl TextureCache<'_> {
    /// Текстура материала; None, если её нет или она не читается
    fn try_get(&mut self, texture: Option<gltf::Texture>, srgb: bool, slot: &str) -> Option<TextureId> {
        let Some(texture) = texture else {
            log::warn!("Material has no {} texture, using dummy", slot);
            return None;
        };
        let image = texture.source();
        let key = (image.index(), srgb);
        if let Some(&id) = self.loaded.get(&key) {
            return id;
        }

        let id = match decode_image(&image, self.base, self.buffers) {
            Ok(data) => {
                let id = self.textures.len();
                self.textures.push(TextureData {
                    label: format!("{} Texture {}", slot, image.index()),
                    image: data,
                    format: if srgb { SRGB } else { LINEAR },
                });
                Some(id)
            }
            Err(err) => {
                log::warn!("Failed to load {} texture {}: {:#}", slot, image.index(), err);
                None
            }
        };
        self.loaded.insert(key, id);
        id
    }

    fn get(&mut self, texture: Option<gltf::Texture>, srgb: bool, fallback: TextureId, slot: &str) -> TextureId {
        self.try_get(texture, srgb, slot).unwrap_or(fallback)
    }
}

fn load_material(material: &gltf::Material, cache: &mut TextureCache) -> Material {
    let pbr = material.pbr_metallic_roughness();
    let base_color = cache.try_get(pbr.base_color_texture().map(|t| t.texture()), true, "diffuse");
    let specular = cache.get(
        pbr.metallic_roughness_texture().map(|t| t.texture()),
        false,
        DUMMY_SPECULAR,
        "specular",
    );
    let normal = cache.get(material.normal_texture().map(|t| t.texture()), false, DUMMY_NORMAL, "normal");

    let masked = material.alpha_mode() == gltf::material::AlphaMode::Mask;
    Material::new(masked, base_color, specular, normal)
}

/// Атрибуты вершин той же длины, что и позиции; индексы в пределах
fn check_attributes(positions: usize, attributes: &[(&str, usize)], indices: &[u32]) -> Result<()> {
    for &(name, len) in attributes {
        if len != positions {
            bail!("{} has {} entries for {} positions", name, len, positions);
        }
    }
    if let Some(&index) = indices.iter().find(|&&index| index as usize >= positions) {
        bail!("index {} out of range for {} vertices", index, positions);
    }
    Ok(())
}

fn load_primitive(
    primitive: &gltf::Primitive,
    buffers: &[gltf::buffer::Data],
    transform: Mat4,
    material: usize,
) -> Result<MeshData> {
    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| data.0.as_slice()));

    let positions: Vec<[f32; 3]> = reader
        .read_positions()
        .ok_or_else(|| anyhow!("primitive without positions"))?
        .collect();
    let normals: Vec<[f32; 3]> = reader
        .read_normals()
        .ok_or_else(|| anyhow!("primitive without normals"))?
        .collect();
    let uvs: Vec<[f32; 2]> = match reader.read_tex_coords(0) {
        Some(coords) => coords.into_f32().collect(),
        None => vec![[0.0; 2]; positions.len()],
    };
    let tangents: Option<Vec<[f32; 4]>> = reader.read_tangents().map(|t| t.collect());
    let indices: Vec<u32> = match reader.read_indices() {
        Some(indices) => indices.into_u32().collect(),
        None => (0..positions.len() as u32).collect(),
    };

    let mut attributes = vec![("normals", normals.len()), ("uvs", uvs.len())];
    if let Some(tangents) = &tangents {
        attributes.push(("tangents", tangents.len()));
    }
    check_attributes(positions.len(), &attributes, &indices)?;

    // Нормали и касательные через обратную транспонированную
    let linear = Mat3::new(transform.cols[0].xyz(), transform.cols[1].xyz(), transform.cols[2].xyz());
    let normal_matrix = linear.inversed().transposed();

    let vertices = positions
        .iter()
        .enumerate()
        .map(|(i, position)| {
            let world = transform * Vec4::new(position[0], position[1], position[2], 1.0);
            let n = (normal_matrix * Vec3::from(normals[i])).normalized();
            let t = match &tangents {
                Some(tangents) => {
                    let [x, y, z, w] = tangents[i];
                    let t = (linear * Vec3::new(x, y, z)).normalized();
                    fix_tangent(n, t, n.cross(t) * w)
                }
                None => fallback_tangent(n),
            };
            ModelVertex {
                position: world.xyz().into(),
                normal: n.into(),
                uv: uvs[i],
                tangent: t.into(),
            }
        })
        .collect();

    Ok(MeshData {
        vertices,
        indices,
        material,
    })
}

fn collect_node(
    node: &gltf::Node,
    parent: Mat4,
    buffers: &[gltf::buffer::Data],
    default_material: usize,
    meshes: &mut Vec<MeshData>,
) -> Result<()> {
    let m = node.transform().matrix();
    let local = Mat4::new(Vec4::from(m[0]), Vec4::from(m[1]), Vec4::from(m[2]), Vec4::from(m[3]));
    let transform = parent * local;

    if let Some(mesh) = node.mesh() {
        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                log::warn!("Skipping non-triangle primitive in mesh {:?}", mesh.name());
                continue;
            }
            let material = primitive.material().index().unwrap_or(default_material);
            let data = load_primitive(&primitive, buffers, transform, material)
                .with_context(|| format!("mesh {:?}", mesh.name()))?;
            meshes.push(data);
        }
    }

    for child in node.children() {
        collect_node(&child, transform, buffers, default_material, meshes)?;
    }
    Ok(())
}

fn load_scene_data(path: &Path) -> Result<SceneData> {
    let gltf = gltf::Gltf::open(path).with_context(|| format!("opening {}", path.display()))?;
    let base: PathBuf = path.parent().map(Path::to_path_buf).unwrap_or_default();
    let buffers = gltf::import_buffers(&gltf.document, Some(base.as_path()), gltf.blob.clone())
        .with_context(|| format!("loading buffers of {}", path.display()))?;

    let mut cache = TextureCache {
        base: &base,
        buffers: &buffers,
        textures: dummy_textures(),
        loaded: HashMap::new(),
    };

    let mut materials: Vec<Material> = gltf
        .document
        .materials()
        .map(|material| load_material(&material, &mut cache))
        .collect();
    // Примитивы без материала
    let default_material = materials.len();
    materials.push(Material::new(false, None, DUMMY_SPECULAR, DUMMY_NORMAL));

    let scene = gltf
        .document
        .default_scene()
        .or_else(|| gltf.document.scenes().next())
        .ok_or_else(|| anyhow!("{} has no scenes", path.display()))?;

    let mut meshes = Vec::new();
    for node in scene.nodes() {
        collect_node(&node, Mat4::identity(), &buffers, default_material, &mut meshes)?;
    }

    Ok(SceneData {
        meshes,
        materials,
        textures: cache.textures,
    })
}

/// Сцена на GPU. Снаружи видны только операции отрисовки по классам материалов.
pub struct Scene {
    _textures: Vec<GpuTexture>,
    material_bind_groups: Vec<wgpu::BindGroup>,
    opaque: Vec<GpuMesh>,
    masked: Vec<GpuMesh>,
}

impl Scene {
    pub fn load(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: impl AsRef<Path>,
        material_layout: &wgpu::BindGroupLayout,
        samplers: &Samplers,
    ) -> Result<Self> {
        let path = path.as_ref();
        let data = load_scene_data(path)?;

        let textures: Vec<GpuTexture> = data
            .textures
            .into_iter()
            .map(|t| GpuTexture::from_image(device, queue, &t.label, t.image, t.format))
            .collect();

        let material_bind_groups = data
            .materials
            .iter()
            .enumerate()
            .map(|(i, material)| {
                let [diffuse, specular, normal] = material.textures();
                let mask = match material.mask() {
                    MaskSource::Unused(id) | MaskSource::Texture(id) => id,
                    MaskSource::DiffuseAlpha(id) => {
                        log::warn!("Masked material {} has no base color texture, nothing is cut out", i);
                        id
                    }
                };
                BindingTable::new("Material Bind Group")
                    .texture(0, &textures[diffuse].view)
                    .texture(1, &textures[specular].view)
                    .texture(2, &textures[normal].view)
                    .texture(3, &textures[mask].view)
                    .sampler(4, &samplers.anisotropic_repeat)
                    .sampler(5, &samplers.nearest_repeat)
                    .build(device, material_layout)
            })
            .collect();

        let materials = &data.materials;
        let (opaque, masked) = partition_by_class(data.meshes, |mesh| materials[mesh.material].is_masked());
        let opaque: Vec<GpuMesh> = opaque.iter().map(|mesh| GpuMesh::upload(device, mesh)).collect();
        let masked: Vec<GpuMesh> = masked.iter().map(|mesh| GpuMesh::upload(device, mesh)).collect();

        log::info!(
            "Scene {} loaded: {} opaque / {} masked meshes, {} textures",
            path.display(),
            opaque.len(),
            masked.len(),
            textures.len()
        );

        Ok(Self {
            _textures: textures,
            material_bind_groups,
            opaque,
            masked,
        })
    }

    /// Только геометрия opaque (shadow pass)
    pub fn draw_opaque_depth(&self, pass: &mut wgpu::RenderPass) {
        for mesh in &self.opaque {
            mesh.draw(pass);
        }
    }

    /// Masked геометрия с маской (shadow pass)
    pub fn draw_masked_depth(&self, pass: &mut wgpu::RenderPass) {
        self.draw_with_materials(pass, &self.masked);
    }

    pub fn draw_opaque(&self, pass: &mut wgpu::RenderPass) {
        self.draw_with_materials(pass, &self.opaque);
    }

    pub fn draw_masked(&self, pass: &mut wgpu::RenderPass) {
        self.draw_with_materials(pass, &self.masked);
    }

    fn draw_with_materials(&self, pass: &mut wgpu::RenderPass, meshes: &[GpuMesh]) {
        for mesh in meshes {
            pass.set_bind_group(MATERIAL_GROUP, &self.material_bind_groups[mesh.material], &[]);
            mesh.draw(pass);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_attributes_pass() {
        let attributes = [("normals", 4), ("uvs", 4), ("tangents", 4)];
        assert!(check_attributes(4, &attributes, &[0, 1, 2, 2, 3, 0]).is_ok());
    }

    #[test]
    fn test_short_attribute_is_an_error() {
        let err = check_attributes(4, &[("normals", 4), ("uvs", 3)], &[0, 1, 2]).unwrap_err();
        assert!(err.to_string().contains("uvs"));

        let err = check_attributes(4, &[("normals", 4), ("tangents", 5)], &[]).unwrap_err();
        assert!(err.to_string().contains("tangents"));
    }

    #[test]
    fn test_index_out_of_range_is_an_error() {
        assert!(check_attributes(3, &[("normals", 3)], &[0, 1, 3]).is_err());
    }
}
