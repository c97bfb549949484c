//! Benchmarks for GPU frame rendering.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use spectrum_bars::audio::{generate_white_noise, SpectrumHistory};
use spectrum_bars::gpu::{BarRenderer, GpuContext, SceneUniforms, ShaderBackend, ShaderSources, Viewport};
use spectrum_bars::scene::{build_scene, scene_projection, BarColorScheme, CameraState, PrimitiveMode};
use std::path::Path;

fn create_renderer(viewport: Viewport) -> Option<BarRenderer> {
    let ctx = match GpuContext::new_blocking() {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Skipping GPU benchmarks: {}", e);
            return None;
        }
    };

    let root = Path::new(env!("CARGO_MANIFEST_DIR"));
    let backend = ShaderBackend::Wgsl;
    let sources = ShaderSources::load(
        &root.join(backend.vertex_path()),
        &root.join(backend.fragment_path()),
    )
    .ok()?;
    let program = sources.create_program(&ctx.device);
    BarRenderer::new(ctx, &program, viewport).ok()
}

fn bench_render_modes(c: &mut Criterion) {
    let mut group = c.benchmark_group("Bar Rendering");

    let Some(renderer) = create_renderer(Viewport::new(1280, 720)) else {
        return;
    };

    let mut history = SpectrumHistory::new();
    for _ in 0..16 {
        let _ = history.update(&generate_white_noise(256, 1.0, 3));
    }
    let mut camera = CameraState::default();

    for &mode in PrimitiveMode::all() {
        let scene = build_scene(history.grid(), BarColorScheme::ComputedGradient, mode);
        group.bench_with_input(BenchmarkId::new("render", mode.name()), &mode, |b, &mode| {
            b.iter(|| {
                camera.advance();
                let uniforms = SceneUniforms::new(scene_projection(), camera.model_matrix(), 1.0);
                black_box(renderer.render(&scene, &uniforms, mode));
            });
        });
    }

    group.finish();
}

fn bench_render_with_readback(c: &mut Criterion) {
    let Some(renderer) = create_renderer(Viewport::new(640, 480)) else {
        return;
    };

    let history = SpectrumHistory::new();
    let scene = build_scene(history.grid(), BarColorScheme::SolidColor, PrimitiveMode::Triangles);
    let uniforms = SceneUniforms::new(scene_projection(), CameraState::default().model_matrix(), 0.0);

    c.bench_function("render_and_read_480p", |b| {
        b.iter(|| {
            renderer.render(&scene, &uniforms, PrimitiveMode::Triangles);
            black_box(renderer.read_pixels().ok());
        });
    });
}

criterion_group!(benches, bench_render_modes, bench_render_with_readback);
criterion_main!(benches);
