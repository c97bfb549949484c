//! Frame renderer for the spectrum bars.

use super::{
    context::{GpuContext, GpuError},
    pipeline::{BarPipeline, SceneUniforms},
    shader::ShaderProgram,
    textures::{ReadbackBuffer, RenderTarget},
};
use crate::audio::NUM_BARS;
use crate::scene::{PrimitiveMode, SceneGeometry};
use wgpu::{TextureFormat, TextureView};

/// Size and color format of the surface being drawn into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn with_format(mut self, format: TextureFormat) -> Self {
        self.format = format;
        self
    }

    /// Whether textures of this size can be created with `max_dimension`.
    pub fn fits(&self, max_dimension: u32) -> bool {
        (1..=max_dimension).contains(&self.width) && (1..=max_dimension).contains(&self.height)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            format: TextureFormat::Rgba8Unorm,
        }
    }
}

/// Renders the bar scene into an offscreen target or a host-supplied view.
pub struct BarRenderer {
    ctx: GpuContext,
    pipeline: BarPipeline,
    depth: RenderTarget,
    output: RenderTarget,
    readback: ReadbackBuffer,
    viewport: Viewport,
}

impl BarRenderer {
    /// Create GPU resources for a full grid of bars.
    pub fn new(ctx: GpuContext, program: &ShaderProgram, viewport: Viewport) -> Result<Self, GpuError> {
        let device = &ctx.device;
        let max = device.limits().max_texture_dimension_2d;
        if !viewport.fits(max) {
            return Err(GpuError::Viewport {
                width: viewport.width,
                height: viewport.height,
                max,
            });
        }
        let pipeline = BarPipeline::new(device, program, viewport.format, NUM_BARS * NUM_BARS)?;
        let depth = RenderTarget::for_depth(device, "bar_depth", viewport.width, viewport.height);
        let output = RenderTarget::for_output(
            device,
            "bar_output",
            viewport.width,
            viewport.height,
            viewport.format,
        );
        let readback = ReadbackBuffer::new(device, viewport.width, viewport.height);

        Ok(Self {
            ctx,
            pipeline,
            depth,
            output,
            readback,
            viewport,
        })
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// wgpu has no per-vertex point size; points always rasterize at one pixel.
    pub fn supports_program_point_size(&self) -> bool {
        false
    }

    /// Draw into the offscreen target, cleared to black.
    ///
    /// Returns the number of bars drawn.
    pub fn render(&self, scene: &SceneGeometry, uniforms: &SceneUniforms, mode: PrimitiveMode) -> usize {
        self.draw(self.output.view(), true, scene, uniforms, mode)
    }

    /// Draw over the existing contents of `view`.
    ///
    /// Fails with [`GpuError::TargetMismatch`] unless `view`'s texture has the
    /// viewport's size and format.
    pub fn render_into(
        &self,
        view: &TextureView,
        scene: &SceneGeometry,
        uniforms: &SceneUniforms,
        mode: PrimitiveMode,
    ) -> Result<usize, GpuError> {
        let texture = view.texture();
        let found = Viewport::new(texture.width(), texture.height()).with_format(texture.format());
        if found != self.viewport {
            return Err(GpuError::TargetMismatch {
                expected: self.viewport,
                found,
            });
        }
        Ok(self.draw(view, false, scene, uniforms, mode))
    }

    fn draw(
        &self,
        view: &TextureView,
        clear_color: bool,
        scene: &SceneGeometry,
        uniforms: &SceneUniforms,
        mode: PrimitiveMode,
    ) -> usize {
        let bars = self.pipeline.upload(&self.ctx.queue, uniforms, scene);

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("bar_encoder"),
            });

        {
            let load = if clear_color {
                wgpu::LoadOp::Clear(wgpu::Color::BLACK)
            } else {
                wgpu::LoadOp::Load
            };
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("bar_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: self.depth.view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            render_pass.set_pipeline(self.pipeline.pipeline(mode));
            render_pass.set_bind_group(0, self.pipeline.bind_group(), &[]);
            render_pass.set_vertex_buffer(0, self.pipeline.position_buffer.slice(..));
            render_pass.set_vertex_buffer(1, self.pipeline.color_buffer.slice(..));
            // One draw per bar
            for bar in 0..bars {
                render_pass.draw(SceneGeometry::bar_range(bar), 0..1);
            }
        }

        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        bars
    }

    /// Tightly packed pixels of the offscreen target, in the viewport's format.
    pub fn read_pixels(&self) -> Result<Vec<u8>, GpuError> {
        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("readback_encoder"),
            });
        self.readback.copy_from(&mut encoder, self.output.texture());
        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        self.readback.read_pixels(&self.ctx.device)
    }

    /// The offscreen target as an RGBA image.
    pub fn snapshot(&self) -> Result<image::RgbaImage, GpuError> {
        let mut pixels = self.read_pixels()?;
        if matches!(
            self.viewport.format,
            TextureFormat::Bgra8Unorm | TextureFormat::Bgra8UnormSrgb
        ) {
            for px in pixels.chunks_exact_mut(4) {
                px.swap(0, 2);
            }
        }
        image::RgbaImage::from_raw(self.viewport.width, self.viewport.height, pixels)
            .ok_or(GpuError::Readback)
    }

    /// Destroy buffers and textures now instead of waiting for drop.
    pub fn release(self) {
        self.pipeline.destroy();
        self.readback.destroy();
        self.depth.destroy();
        self.output.destroy();
    }

    pub fn adapter_info(&self) -> &wgpu::AdapterInfo {
        self.ctx.adapter_info()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SpectrumHistory;
    use crate::gpu::shader::{ShaderBackend, ShaderSources};
    use crate::scene::{build_scene, scene_projection, BarColorScheme, CameraState};
    use std::path::Path;

    fn bundled_program(ctx: &GpuContext) -> ShaderProgram {
        let root = Path::new(env!("CARGO_MANIFEST_DIR"));
        let backend = ShaderBackend::Wgsl;
        ShaderSources::load(
            &root.join(backend.vertex_path()),
            &root.join(backend.fragment_path()),
        )
        .unwrap()
        .create_program(&ctx.device)
    }

    #[test]
    fn test_viewport_default() {
        let viewport = Viewport::default();
        assert_eq!((viewport.width, viewport.height), (640, 480));
        assert_eq!(Viewport::new(32, 16).format, TextureFormat::Rgba8Unorm);
    }

    #[test]
    fn test_viewport_fits() {
        assert!(Viewport::new(640, 480).fits(8192));
        assert!(Viewport::new(8192, 1).fits(8192));
        assert!(!Viewport::new(0, 0).fits(8192));
        assert!(!Viewport::new(640, 0).fits(8192));
        assert!(!Viewport::new(8193, 480).fits(8192));
    }

    #[tokio::test]
    async fn test_empty_viewport_is_an_error() {
        let ctx = match GpuContext::new().await {
            Ok(ctx) => ctx,
            Err(_) => return,
        };
        let program = bundled_program(&ctx);
        let result = BarRenderer::new(ctx, &program, Viewport::new(0, 0));
        assert!(matches!(result, Err(GpuError::Viewport { width: 0, height: 0, .. })));
    }

    #[tokio::test]
    async fn test_render_into_rejects_mismatched_view() {
        let ctx = match GpuContext::new().await {
            Ok(ctx) => ctx,
            Err(_) => return,
        };
        let program = bundled_program(&ctx);
        let target = RenderTarget::for_output(&ctx.device, "small_view", 32, 32, TextureFormat::Rgba8Unorm);
        let renderer = BarRenderer::new(ctx, &program, Viewport::new(64, 48)).unwrap();

        let scene = build_scene(SpectrumHistory::new().grid(), BarColorScheme::SolidColor, PrimitiveMode::Lines);
        let uniforms =
            SceneUniforms::new(scene_projection(), CameraState::default().model_matrix(), 0.0);
        let err = renderer
            .render_into(target.view(), &scene, &uniforms, PrimitiveMode::Lines)
            .unwrap_err();
        assert!(matches!(err, GpuError::TargetMismatch { found, .. } if found.width == 32));
    }

    #[tokio::test]
    async fn test_empty_grid_renders_black() {
        let ctx = match GpuContext::new().await {
            Ok(ctx) => ctx,
            Err(_) => return,
        };
        let program = bundled_program(&ctx);
        let viewport = Viewport::new(64, 48);
        let renderer = BarRenderer::new(ctx, &program, viewport).unwrap();

        let history = SpectrumHistory::new();
        let scene = build_scene(history.grid(), BarColorScheme::SolidColor, PrimitiveMode::Points);
        let camera = CameraState::default();
        let uniforms = SceneUniforms::new(scene_projection(), camera.model_matrix(), 0.0);

        assert_eq!(renderer.render(&scene, &uniforms, PrimitiveMode::Points), 256);
        let pixels = renderer.read_pixels().unwrap();
        assert_eq!(pixels.len(), 64 * 48 * 4);
        renderer.release();
    }

    #[tokio::test]
    async fn test_tall_bars_are_visible() {
        let ctx = match GpuContext::new().await {
            Ok(ctx) => ctx,
            Err(_) => return,
        };
        let program = bundled_program(&ctx);
        let renderer = BarRenderer::new(ctx, &program, Viewport::new(128, 96)).unwrap();

        let mut history = SpectrumHistory::new();
        history.update(&[0.1; 256]).unwrap();
        let scene = build_scene(history.grid(), BarColorScheme::ComputedGradient, PrimitiveMode::Triangles);
        let uniforms =
            SceneUniforms::new(scene_projection(), CameraState::default().model_matrix(), 0.0);
        renderer.render(&scene, &uniforms, PrimitiveMode::Triangles);

        let image = renderer.snapshot().unwrap();
        let lit = image.pixels().any(|p| p.0[0] > 0 || p.0[1] > 0 || p.0[2] > 0);
        assert!(lit, "Rendered frame should contain colored pixels");
    }
}
