//! Render pipeline builders for the bar pass.

use super::shader::{ShaderProgram, FRAGMENT_ENTRY, VERTEX_ENTRY};
use crate::scene::PrimitiveMode;
use wgpu::{
    BindGroupLayout, ColorTargetState, Device, PipelineLayout, PrimitiveTopology, RenderPipeline,
    ShaderModule, TextureFormat, VertexBufferLayout,
};

/// Depth buffer format used by every bar pipeline.
pub const DEPTH_FORMAT: TextureFormat = TextureFormat::Depth32Float;

/// Topology drawn for a primitive mode.
pub fn topology(mode: PrimitiveMode) -> PrimitiveTopology {
    match mode {
        PrimitiveMode::Triangles => PrimitiveTopology::TriangleList,
        PrimitiveMode::Lines => PrimitiveTopology::LineList,
        PrimitiveMode::Points => PrimitiveTopology::PointList,
    }
}

/// Builder for render pipelines with separate vertex and fragment modules.
///
/// Blending is always off.
pub struct RenderPipelineBuilder<'a> {
    label: Option<&'static str>,
    layout: Option<&'a PipelineLayout>,
    vertex: Option<&'a ShaderModule>,
    fragment: Option<&'a ShaderModule>,
    vertex_buffers: Vec<VertexBufferLayout<'static>>,
    format: TextureFormat,
    topology: PrimitiveTopology,
    depth_format: Option<TextureFormat>,
}

impl<'a> RenderPipelineBuilder<'a> {
    pub fn new(label: &'static str) -> Self {
        Self {
            label: Some(label),
            layout: None,
            vertex: None,
            fragment: None,
            vertex_buffers: Vec::new(),
            format: TextureFormat::Rgba8Unorm,
            topology: PrimitiveTopology::TriangleList,
            depth_format: None,
        }
    }

    pub fn layout(mut self, layout: &'a PipelineLayout) -> Self {
        self.layout = Some(layout);
        self
    }

    /// Use both stages of a loaded program.
    pub fn program(mut self, program: &'a ShaderProgram) -> Self {
        self.vertex = Some(&program.vertex);
        self.fragment = Some(&program.fragment);
        self
    }

    pub fn vertex_buffers(mut self, buffers: impl Into<Vec<VertexBufferLayout<'static>>>) -> Self {
        self.vertex_buffers = buffers.into();
        self
    }

    pub fn format(mut self, format: TextureFormat) -> Self {
        self.format = format;
        self
    }

    pub fn topology(mut self, topology: PrimitiveTopology) -> Self {
        self.topology = topology;
        self
    }

    /// Enable depth testing (`Less`, writes on) against `format`.
    pub fn depth(mut self, format: TextureFormat) -> Self {
        self.depth_format = Some(format);
        self
    }

    /// Build the render pipeline. Returns `None` until a program is set.
    pub fn build(self, device: &Device) -> Option<RenderPipeline> {
        let vertex = self.vertex?;
        let fragment = self.fragment?;

        let depth_stencil = self.depth_format.map(|format| wgpu::DepthStencilState {
            format,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        });

        Some(device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: self.label,
            layout: self.layout,
            vertex: wgpu::VertexState {
                module: vertex,
                entry_point: Some(VERTEX_ENTRY),
                buffers: &self.vertex_buffers,
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: fragment,
                entry_point: Some(FRAGMENT_ENTRY),
                targets: &[Some(ColorTargetState {
                    format: self.format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: self.topology,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        }))
    }
}

/// Create a pipeline layout from bind group layouts.
pub fn create_pipeline_layout(
    device: &Device,
    label: &'static str,
    layouts: &[&BindGroupLayout],
) -> PipelineLayout {
    device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts: layouts,
        immediate_size: 0,
    })
}
