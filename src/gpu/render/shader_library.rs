// ============================================
// Shader Library - Сборка WGSL программ из именованных кусков
// ============================================
// Программа = набор исходников (общие функции + сам проход)
// и необязательные define'ы, которые становятся WGSL const.

use anyhow::{anyhow, Context, Result};

/// Все исходники, вшитые в бинарник
const SOURCES: &[(&str, &str)] = &[
    ("fullscreen", include_str!("../shaders/fullscreen.wgsl")),
    ("shadow", include_str!("../shaders/shadow.wgsl")),
    ("geometry", include_str!("../shaders/geometry.wgsl")),
    ("depth_downsample", include_str!("../shaders/depth_downsample.wgsl")),
    ("ssao", include_str!("../shaders/ssao.wgsl")),
    ("ao_spatial", include_str!("../shaders/ao_spatial.wgsl")),
    ("ao_temporal", include_str!("../shaders/ao_temporal.wgsl")),
    ("shading", include_str!("../shaders/shading.wgsl")),
    ("mipmap", include_str!("../shaders/mipmap.wgsl")),
    ("eye_adaptation", include_str!("../shaders/eye_adaptation.wgsl")),
    ("tonemap", include_str!("../shaders/tonemap.wgsl")),
    ("taa", include_str!("../shaders/taa.wgsl")),
    ("smaa_common", include_str!("../shaders/smaa_common.wgsl")),
    ("smaa_edges", include_str!("../shaders/smaa_edges.wgsl")),
    ("smaa_weights", include_str!("../shaders/smaa_weights.wgsl")),
    ("smaa_blend", include_str!("../shaders/smaa_blend.wgsl")),
    ("smaa_temporal", include_str!("../shaders/smaa_temporal.wgsl")),
    ("present", include_str!("../shaders/present.wgsl")),
];

/// Значение define'а
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Define {
    Bool(&'static str, bool),
    U32(&'static str, u32),
    F32(&'static str, f32),
}

impl Define {
    fn to_wgsl(self) -> String {
        match self {
            Define::Bool(name, value) => format!("const {}: bool = {};\n", name, value),
            Define::U32(name, value) => format!("const {}: u32 = {}u;\n", name, value),
            Define::F32(name, value) => format!("const {}: f32 = {:?};\n", name, value),
        }
    }
}

fn source(name: &str) -> Result<&'static str> {
    SOURCES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, src)| *src)
        .ok_or_else(|| anyhow!("unknown shader source '{}'", name))
}

/// Текст программы: define'ы, затем исходники в указанном порядке
pub fn compose(names: &[&str], defines: &[Define]) -> Result<String> {
    let mut text: String = defines.iter().map(|d| d.to_wgsl()).collect();
    for name in names {
        text.push_str(source(name)?);
        text.push('\n');
    }
    Ok(text)
}

/// Компилирует программу; ошибка валидации фатальна для setup
pub fn compile(
    device: &wgpu::Device,
    label: &str,
    names: &[&str],
    defines: &[Define],
) -> Result<wgpu::ShaderModule> {
    let text = compose(names, defines).with_context(|| format!("composing {}", label))?;

    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(text.into()),
    });
    if let Some(error) = pollster::block_on(device.pop_error_scope()) {
        return Err(anyhow!("{}", error)).with_context(|| format!("compiling shader {}", label));
    }

    log::debug!("Compiled shader {} from {:?}", label, names);
    Ok(module)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defines_come_first() {
        let text = compose(&["present"], &[Define::Bool("ALPHA_MASKED", true), Define::U32("NUM_CASCADES", 4)])
            .unwrap();
        assert!(text.starts_with("const ALPHA_MASKED: bool = true;\nconst NUM_CASCADES: u32 = 4u;\n"));
        assert!(text.contains("fn fs_main"));
    }

    #[test]
    fn test_sources_keep_order() {
        let text = compose(&["fullscreen", "present"], &[]).unwrap();
        let vs = text.find("fn vs_fullscreen").unwrap();
        let fs = text.find("fn fs_main").unwrap();
        assert!(vs < fs);
    }

    #[test]
    fn test_smaa_programs_share_one_uniform_declaration() {
        for name in ["smaa_edges", "smaa_weights", "smaa_blend", "smaa_temporal"] {
            let text = compose(&["fullscreen", "smaa_common", name], &[]).unwrap();
            assert_eq!(text.matches("struct SmaaUniform").count(), 1);
            assert!(text.find("struct SmaaUniform") < text.find("var<uniform> smaa"));
        }
    }

    #[test]
    fn test_unknown_source_is_an_error() {
        assert!(compose(&["fullscreen", "missing"], &[]).is_err());
    }

    #[test]
    fn test_float_define_is_a_wgsl_literal() {
        assert_eq!(Define::F32("CAMERA_NEAR", 0.1).to_wgsl(), "const CAMERA_NEAR: f32 = 0.1;\n");
        assert_eq!(Define::F32("ONE", 1.0).to_wgsl(), "const ONE: f32 = 1.0;\n");
    }
}
