//! Bind group and vertex buffer layouts for the bar pipelines.

use wgpu::{BindGroupLayout, BindGroupLayoutEntry, Device, ShaderStages, VertexBufferLayout};

/// Bytes per vertex in either stream (three `f32`).
pub const VERTEX_STRIDE: u64 = std::mem::size_of::<[f32; 3]>() as u64;

/// Shader location of the position attribute.
pub const POSITION_LOCATION: u32 = 0;
/// Shader location of the color attribute.
pub const COLOR_LOCATION: u32 = 1;

/// Builder for creating bind group layouts.
pub struct BindGroupLayoutBuilder {
    label: Option<&'static str>,
    entries: Vec<BindGroupLayoutEntry>,
}

impl BindGroupLayoutBuilder {
    pub fn new(label: &'static str) -> Self {
        Self {
            label: Some(label),
            entries: Vec::new(),
        }
    }

    /// Add a uniform buffer entry.
    pub fn uniform(mut self, binding: u32, visibility: ShaderStages) -> Self {
        self.entries.push(BindGroupLayoutEntry {
            binding,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        });
        self
    }

    pub fn build(self, device: &Device) -> BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: self.label,
            entries: &self.entries,
        })
    }
}

/// Scene uniforms (matrices and point size), read by the vertex stage only.
pub fn create_scene_layout(device: &Device) -> BindGroupLayout {
    BindGroupLayoutBuilder::new("scene_bind_group_layout")
        .uniform(0, ShaderStages::VERTEX)
        .build(device)
}

static POSITION_ATTRIBUTES: [wgpu::VertexAttribute; 1] = [wgpu::VertexAttribute {
    offset: 0,
    shader_location: POSITION_LOCATION,
    format: wgpu::VertexFormat::Float32x3,
}];

static COLOR_ATTRIBUTES: [wgpu::VertexAttribute; 1] = [wgpu::VertexAttribute {
    offset: 0,
    shader_location: COLOR_LOCATION,
    format: wgpu::VertexFormat::Float32x3,
}];

/// Layouts of the two vertex streams: slot 0 positions, slot 1 colors.
pub fn bar_vertex_layouts() -> [VertexBufferLayout<'static>; 2] {
    [
        VertexBufferLayout {
            array_stride: VERTEX_STRIDE,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &POSITION_ATTRIBUTES,
        },
        VertexBufferLayout {
            array_stride: VERTEX_STRIDE,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &COLOR_ATTRIBUTES,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::GpuContext;

    #[test]
    fn test_vertex_layouts() {
        let [positions, colors] = bar_vertex_layouts();
        assert_eq!(positions.array_stride, 12);
        assert_eq!(positions.attributes[0].shader_location, POSITION_LOCATION);
        assert_eq!(colors.attributes[0].shader_location, COLOR_LOCATION);
        assert_eq!(colors.attributes[0].format, wgpu::VertexFormat::Float32x3);
    }

    #[tokio::test]
    async fn test_scene_layout_creation() {
        let ctx = match GpuContext::new().await {
            Ok(ctx) => ctx,
            Err(_) => return, // Skip if no GPU
        };

        let _layout = create_scene_layout(&ctx.device);
    }
}
