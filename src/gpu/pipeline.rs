//! Bar rendering pipeline: GPU state shared by every frame.

use super::context::GpuError;
use super::layouts::{bar_vertex_layouts, create_scene_layout, VERTEX_STRIDE};
use super::pipelines::{create_pipeline_layout, topology, RenderPipelineBuilder, DEPTH_FORMAT};
use super::shader::ShaderProgram;
use crate::scene::{PrimitiveMode, SceneGeometry, VERTICES_PER_BAR};
use glam::Mat4;
use wgpu::{BindGroup, Buffer, Device, Queue, RenderPipeline, TextureFormat};

/// Uniform data passed to the vertex stage.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniforms {
    pub projection: [[f32; 4]; 4],
    pub model_view: [[f32; 4]; 4],
    pub point_size: f32,
    pub _padding: [f32; 3],
}

impl SceneUniforms {
    pub fn new(projection: Mat4, model_view: Mat4, point_size: f32) -> Self {
        Self {
            projection: projection.to_cols_array_2d(),
            model_view: model_view.to_cols_array_2d(),
            point_size,
            _padding: [0.0; 3],
        }
    }
}

/// Pipelines, buffers and bind group for drawing `max_bars` bars.
pub struct BarPipeline {
    triangles: RenderPipeline,
    lines: RenderPipeline,
    points: RenderPipeline,
    pub uniform_buffer: Buffer,
    pub position_buffer: Buffer,
    pub color_buffer: Buffer,
    bind_group: BindGroup,
    max_bars: usize,
}

impl BarPipeline {
    /// Create the pipelines for all primitive modes.
    ///
    /// Validation errors are captured in an error scope, so a program whose
    /// bindings or vertex inputs do not match the bar layouts fails here with
    /// [`GpuError::Pipeline`].
    pub fn new(
        device: &Device,
        program: &ShaderProgram,
        format: TextureFormat,
        max_bars: usize,
    ) -> Result<Self, GpuError> {
        let bind_group_layout = create_scene_layout(device);
        let pipeline_layout =
            create_pipeline_layout(device, "bar_pipeline_layout", &[&bind_group_layout]);

        let build = |label: &'static str, mode: PrimitiveMode| {
            RenderPipelineBuilder::new(label)
                .layout(&pipeline_layout)
                .program(program)
                .vertex_buffers(bar_vertex_layouts())
                .format(format)
                .topology(topology(mode))
                .depth(DEPTH_FORMAT)
                .build(device)
                .ok_or_else(|| GpuError::Pipeline {
                    label,
                    message: "no shader program".to_string(),
                })
        };

        let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
        let triangles = build("bar_triangles_pipeline", PrimitiveMode::Triangles);
        let lines = build("bar_lines_pipeline", PrimitiveMode::Lines);
        let points = build("bar_points_pipeline", PrimitiveMode::Points);
        if let Some(err) = pollster::block_on(scope.pop()) {
            return Err(GpuError::Pipeline {
                label: "bar_pipelines",
                message: err.to_string(),
            });
        }
        let (triangles, lines, points) = (triangles?, lines?, points?);

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("scene_uniforms"),
            size: std::mem::size_of::<SceneUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let stream_size = VERTEX_STRIDE * (max_bars * VERTICES_PER_BAR) as u64;
        let position_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("bar_positions"),
            size: stream_size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let color_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("bar_colors"),
            size: stream_size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        Ok(Self {
            triangles,
            lines,
            points,
            uniform_buffer,
            position_buffer,
            color_buffer,
            bind_group,
            max_bars,
        })
    }

    pub fn pipeline(&self, mode: PrimitiveMode) -> &RenderPipeline {
        match mode {
            PrimitiveMode::Triangles => &self.triangles,
            PrimitiveMode::Lines => &self.lines,
            PrimitiveMode::Points => &self.points,
        }
    }

    pub fn bind_group(&self) -> &BindGroup {
        &self.bind_group
    }

    pub fn max_bars(&self) -> usize {
        self.max_bars
    }

    /// Upload uniforms and as many bars of `scene` as fit.
    ///
    /// Returns the number of bars uploaded.
    pub fn upload(&self, queue: &Queue, uniforms: &SceneUniforms, scene: &SceneGeometry) -> usize {
        let bars = scene.bar_count().min(self.max_bars);
        let vertices = bars * VERTICES_PER_BAR;

        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
        if vertices > 0 {
            queue.write_buffer(
                &self.position_buffer,
                0,
                bytemuck::cast_slice(&scene.positions[..vertices]),
            );
            queue.write_buffer(
                &self.color_buffer,
                0,
                bytemuck::cast_slice(&scene.colors[..vertices]),
            );
        }
        bars
    }

    /// Free the GPU buffers. The pipeline must not be drawn with afterwards.
    pub fn destroy(&self) {
        self.uniform_buffer.destroy();
        self.position_buffer.destroy();
        self.color_buffer.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::GpuContext;

    const VERT: &str = include_str!("../../resources/shaders/wgsl/vert.wgsl");
    const FRAG: &str = include_str!("../../resources/shaders/wgsl/frag.wgsl");

    fn program(device: &Device, vert: &str) -> ShaderProgram {
        let module = |label, code: &str| {
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(label),
                source: wgpu::ShaderSource::Wgsl(code.into()),
            })
        };
        ShaderProgram {
            vertex: module("test_vertex", vert),
            fragment: module("test_fragment", FRAG),
        }
    }

    #[tokio::test]
    async fn test_bundled_program_builds() {
        let ctx = match GpuContext::new().await {
            Ok(ctx) => ctx,
            Err(_) => return,
        };
        let program = program(&ctx.device, VERT);
        let pipeline =
            BarPipeline::new(&ctx.device, &program, TextureFormat::Rgba8Unorm, 256).unwrap();
        assert_eq!(pipeline.max_bars(), 256);
        pipeline.destroy();
    }

    #[tokio::test]
    async fn test_binding_mismatch_is_an_error() {
        let ctx = match GpuContext::new().await {
            Ok(ctx) => ctx,
            Err(_) => return,
        };
        let program = program(&ctx.device, &VERT.replace("@group(0)", "@group(1)"));
        let result = BarPipeline::new(&ctx.device, &program, TextureFormat::Rgba8Unorm, 256);
        assert!(matches!(result, Err(GpuError::Pipeline { .. })));
    }

    #[tokio::test]
    async fn test_vertex_input_mismatch_is_an_error() {
        let ctx = match GpuContext::new().await {
            Ok(ctx) => ctx,
            Err(_) => return,
        };
        let vert = VERT.replace("@location(1) color: vec3<f32>", "@location(3) color: vec3<f32>");
        let program = program(&ctx.device, &vert);
        let result = BarPipeline::new(&ctx.device, &program, TextureFormat::Rgba8Unorm, 256);
        assert!(matches!(result, Err(GpuError::Pipeline { .. })));
    }

    #[test]
    fn test_uniform_layout_matches_shader() {
        // Two mat4x4<f32> plus a 16-byte tail holding point_size.
        assert_eq!(std::mem::size_of::<SceneUniforms>(), 144);
        let uniforms = SceneUniforms::new(Mat4::IDENTITY, Mat4::IDENTITY, 3.0);
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&uniforms));
        assert_eq!(floats[32], 3.0);
        assert_eq!(floats[0], 1.0);
        assert_eq!(floats[5], 1.0);
    }
}
