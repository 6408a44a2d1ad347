use anyhow::Result;

use crate::gpu::core::config::{CAMERA_NEAR, NUM_CASCADES, SHADOW_BIAS_CONSTANT, SHADOW_BIAS_SLOPE};
use crate::gpu::lighting::SHADOW_FORMAT;
use crate::gpu::scene::ModelVertex;

use super::bind_groups::BindGroupLayouts;
use super::shader_library::{compile, Define};
use super::targets::{
    AO_FORMAT, DEPTH_FORMAT, DIFFUSE_LIGHT_FORMAT, DIFFUSE_SPEC_FORMAT, HALF_DEPTH_FORMAT, HDR_FORMAT,
    LDR_FORMAT, NORMAL_FORMAT, SMAA_EDGES_FORMAT, SMAA_WEIGHTS_FORMAT, VELOCITY_FORMAT,
};

pub struct Pipelines {
    pub shadow_opaque: wgpu::RenderPipeline,
    pub shadow_masked: wgpu::RenderPipeline,
    pub geometry_opaque: wgpu::RenderPipeline,
    pub geometry_masked: wgpu::RenderPipeline,
    pub depth_downsample: wgpu::RenderPipeline,
    pub ssao: wgpu::RenderPipeline,
    pub ao_spatial: wgpu::RenderPipeline,
    pub ao_temporal: wgpu::RenderPipeline,
    pub shading: wgpu::RenderPipeline,
    pub mipmap: wgpu::RenderPipeline,
    pub eye_adaptation: wgpu::ComputePipeline,
    pub tonemap: wgpu::RenderPipeline,
    pub taa: wgpu::RenderPipeline,
    pub smaa_edges: wgpu::RenderPipeline,
    pub smaa_weights: wgpu::RenderPipeline,
    pub smaa_blend: wgpu::RenderPipeline,
    pub smaa_temporal: wgpu::RenderPipeline,
    pub present: wgpu::RenderPipeline,
}

fn pipeline_layout(
    device: &wgpu::Device,
    label: &str,
    bind_group_layouts: &[&wgpu::BindGroupLayout],
) -> wgpu::PipelineLayout {
    device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts,
        push_constant_ranges: &[],
    })
}

fn color_target(format: wgpu::TextureFormat) -> Option<wgpu::ColorTargetState> {
    Some(wgpu::ColorTargetState {
        format,
        blend: Some(wgpu::BlendState::REPLACE),
        write_mask: wgpu::ColorWrites::ALL,
    })
}

fn primitive(cull_mode: Option<wgpu::Face>) -> wgpu::PrimitiveState {
    wgpu::PrimitiveState {
        topology: wgpu::PrimitiveTopology::TriangleList,
        front_face: wgpu::FrontFace::Ccw,
        cull_mode,
        ..Default::default()
    }
}

/// Полноэкранный проход: треугольник без вершинного буфера, без глубины
fn fullscreen(
    device: &wgpu::Device,
    label: &str,
    module: &wgpu::ShaderModule,
    layout: &wgpu::PipelineLayout,
    targets: &[Option<wgpu::ColorTargetState>],
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module,
            entry_point: Some("vs_fullscreen"),
            buffers: &[],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module,
            entry_point: Some("fs_main"),
            targets,
            compilation_options: Default::default(),
        }),
        primitive: primitive(None),
        depth_stencil: None,
        multisample: Default::default(),
        multiview: None,
        cache: None,
    })
}

/// Depth-only проход в слой shadow map
fn shadow(
    device: &wgpu::Device,
    label: &str,
    module: &wgpu::ShaderModule,
    layout: &wgpu::PipelineLayout,
    masked: bool,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module,
            entry_point: Some("vs_main"),
            buffers: &[ModelVertex::desc()],
            compilation_options: Default::default(),
        },
        fragment: masked.then(|| wgpu::FragmentState {
            module,
            entry_point: Some("fs_masked"),
            targets: &[],
            compilation_options: Default::default(),
        }),
        primitive: primitive(if masked { None } else { Some(wgpu::Face::Back) }),
        depth_stencil: Some(wgpu::DepthStencilState {
            format: SHADOW_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::GreaterEqual, // Reversed-Z
            stencil: Default::default(),
            bias: wgpu::DepthBiasState {
                constant: SHADOW_BIAS_CONSTANT,
                slope_scale: SHADOW_BIAS_SLOPE,
                clamp: 0.0,
            },
        }),
        multisample: Default::default(),
        multiview: None,
        cache: None,
    })
}

fn geometry(
    device: &wgpu::Device,
    label: &str,
    module: &wgpu::ShaderModule,
    layout: &wgpu::PipelineLayout,
    masked: bool,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module,
            entry_point: Some("vs_main"),
            buffers: &[ModelVertex::desc()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module,
            entry_point: Some("fs_main"),
            targets: &[
                color_target(DIFFUSE_SPEC_FORMAT),
                color_target(NORMAL_FORMAT),
                color_target(VELOCITY_FORMAT),
            ],
            compilation_options: Default::default(),
        }),
        primitive: primitive(if masked { None } else { Some(wgpu::Face::Back) }),
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Greater, // Reversed-Z
            stencil: Default::default(),
            bias: Default::default(),
        }),
        multisample: Default::default(),
        multiview: None,
        cache: None,
    })
}

impl Pipelines {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        layouts: &BindGroupLayouts,
    ) -> Result<Self> {
        let near = Define::F32("CAMERA_NEAR", CAMERA_NEAR);
        let cascades = Define::U32("NUM_CASCADES", NUM_CASCADES as u32);

        // Shadow
        let shadow_shader = compile(device, "Shadow Shader", &["shadow"], &[])?;
        let shadow_opaque_layout = pipeline_layout(device, "Shadow Opaque Layout", &[&layouts.shadow_pass]);
        let shadow_masked_layout = pipeline_layout(
            device,
            "Shadow Masked Layout",
            &[&layouts.shadow_pass, &layouts.material],
        );
        let shadow_opaque = shadow(device, "Shadow Opaque Pipeline", &shadow_shader, &shadow_opaque_layout, false);
        let shadow_masked = shadow(device, "Shadow Masked Pipeline", &shadow_shader, &shadow_masked_layout, true);

        // Geometry
        let geometry_opaque_shader =
            compile(device, "Geometry Shader", &["geometry"], &[Define::Bool("ALPHA_MASKED", false)])?;
        let geometry_masked_shader =
            compile(device, "Geometry Masked Shader", &["geometry"], &[Define::Bool("ALPHA_MASKED", true)])?;
        let geometry_layout = pipeline_layout(
            device,
            "Geometry Layout",
            &[&layouts.geometry, &layouts.material],
        );
        let geometry_opaque = geometry(device, "Geometry Pipeline", &geometry_opaque_shader, &geometry_layout, false);
        let geometry_masked = geometry(
            device,
            "Geometry Masked Pipeline",
            &geometry_masked_shader,
            &geometry_layout,
            true,
        );

        // SSAO chain
        let downsample_shader = compile(
            device,
            "Depth Downsample Shader",
            &["fullscreen", "depth_downsample"],
            &[near],
        )?;
        let depth_downsample = fullscreen(
            device,
            "Depth Downsample Pipeline",
            &downsample_shader,
            &pipeline_layout(device, "Depth Downsample Layout", &[&layouts.depth_downsample]),
            &[color_target(HALF_DEPTH_FORMAT), color_target(VELOCITY_FORMAT)],
        );

        let ssao_shader = compile(device, "SSAO Shader", &["fullscreen", "ssao"], &[])?;
        let ssao = fullscreen(
            device,
            "SSAO Pipeline",
            &ssao_shader,
            &pipeline_layout(device, "SSAO Layout", &[&layouts.ssao]),
            &[color_target(AO_FORMAT)],
        );

        let spatial_shader = compile(device, "AO Spatial Shader", &["fullscreen", "ao_spatial"], &[])?;
        let ao_spatial = fullscreen(
            device,
            "AO Spatial Pipeline",
            &spatial_shader,
            &pipeline_layout(device, "AO Spatial Layout", &[&layouts.ao_spatial]),
            &[color_target(AO_FORMAT)],
        );

        let temporal_shader = compile(device, "AO Temporal Shader", &["fullscreen", "ao_temporal"], &[])?;
        let ao_temporal = fullscreen(
            device,
            "AO Temporal Pipeline",
            &temporal_shader,
            &pipeline_layout(device, "AO Temporal Layout", &[&layouts.ao_temporal]),
            &[color_target(AO_FORMAT)],
        );

        // Shading
        let shading_shader = compile(device, "Shading Shader", &["fullscreen", "shading"], &[cascades])?;
        let shading = fullscreen(
            device,
            "Shading Pipeline",
            &shading_shader,
            &pipeline_layout(device, "Shading Layout", &[&layouts.shading]),
            &[color_target(HDR_FORMAT), color_target(DIFFUSE_LIGHT_FORMAT)],
        );

        let mipmap_shader = compile(device, "Mipmap Shader", &["fullscreen", "mipmap"], &[])?;
        let mipmap = fullscreen(
            device,
            "Mipmap Pipeline",
            &mipmap_shader,
            &pipeline_layout(device, "Mipmap Layout", &[&layouts.mipmap]),
            &[color_target(DIFFUSE_LIGHT_FORMAT)],
        );

        // Eye adaptation (compute)
        let eye_shader = compile(device, "Eye Adaptation Shader", &["eye_adaptation"], &[])?;
        let eye_adaptation = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("Eye Adaptation Pipeline"),
            layout: Some(&pipeline_layout(device, "Eye Adaptation Layout", &[&layouts.eye_adaptation])),
            module: &eye_shader,
            entry_point: Some("cs_main"),
            compilation_options: Default::default(),
            cache: None,
        });

        // Post
        let tonemap_shader = compile(device, "Tone Map Shader", &["fullscreen", "tonemap"], &[])?;
        let tonemap = fullscreen(
            device,
            "Tone Map Pipeline",
            &tonemap_shader,
            &pipeline_layout(device, "Tone Map Layout", &[&layouts.tonemap]),
            &[color_target(LDR_FORMAT)],
        );

        let taa_shader = compile(device, "TAA Shader", &["fullscreen", "taa"], &[])?;
        let taa = fullscreen(
            device,
            "TAA Pipeline",
            &taa_shader,
            &pipeline_layout(device, "TAA Layout", &[&layouts.taa]),
            &[color_target(LDR_FORMAT)],
        );

        // SMAA
        let smaa_pass = |name: &str,
                         label: &str,
                         layout: &wgpu::BindGroupLayout,
                         format: wgpu::TextureFormat|
         -> Result<wgpu::RenderPipeline> {
            let shader = compile(device, &format!("{} Shader", label), &["fullscreen", "smaa_common", name], &[])?;
            Ok(fullscreen(
                device,
                &format!("{} Pipeline", label),
                &shader,
                &pipeline_layout(device, &format!("{} Layout", label), &[layout]),
                &[color_target(format)],
            ))
        };
        let smaa_edges = smaa_pass("smaa_edges", "SMAA Edges", &layouts.smaa_edges, SMAA_EDGES_FORMAT)?;
        let smaa_weights = smaa_pass("smaa_weights", "SMAA Weights", &layouts.smaa_weights, SMAA_WEIGHTS_FORMAT)?;
        let smaa_blend = smaa_pass("smaa_blend", "SMAA Blend", &layouts.smaa_blend, LDR_FORMAT)?;
        let smaa_temporal = smaa_pass("smaa_temporal", "SMAA Temporal", &layouts.smaa_temporal, LDR_FORMAT)?;

        let present_shader = compile(device, "Present Shader", &["fullscreen", "present"], &[])?;
        let present = fullscreen(
            device,
            "Present Pipeline",
            &present_shader,
            &pipeline_layout(device, "Present Layout", &[&layouts.present]),
            &[color_target(surface_format)],
        );

        log::info!("Render pipelines created");

        Ok(Self {
            shadow_opaque,
            shadow_masked,
            geometry_opaque,
            geometry_masked,
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
        })
    }
}
