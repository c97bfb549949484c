//! Benchmarks for the CPU side of a frame: history updates and scene building.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use spectrum_bars::audio::{generate_white_noise, SpectrumAnalyzer, SpectrumHistory};
use spectrum_bars::scene::{build_scene, BarColorScheme, PrimitiveMode};

fn bench_history_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("History Update");

    for freq_len in [16, 256, 1024] {
        let magnitudes: Vec<f32> = (0..freq_len).map(|i| i as f32 / freq_len as f32).collect();

        group.throughput(Throughput::Elements(freq_len as u64));
        group.bench_with_input(BenchmarkId::new("update", freq_len), &magnitudes, |b, mags| {
            let mut history = SpectrumHistory::new();
            b.iter(|| {
                black_box(history.update(mags)).ok();
            });
        });
    }

    group.finish();
}

fn bench_host_fft(c: &mut Criterion) {
    let samples = generate_white_noise(512, 1.0, 42);
    let mut analyzer = SpectrumAnalyzer::default();

    c.bench_function("analyze_host_block", |b| {
        b.iter(|| {
            black_box(analyzer.analyze(&samples));
        });
    });
}

fn bench_build_scene(c: &mut Criterion) {
    let mut group = c.benchmark_group("Scene Build");

    let mut history = SpectrumHistory::new();
    for _ in 0..16 {
        let _ = history.update(&generate_white_noise(256, 1.0, 7));
    }

    for &mode in PrimitiveMode::all() {
        group.bench_with_input(BenchmarkId::new("build_scene", mode.name()), &mode, |b, &mode| {
            b.iter(|| {
                black_box(build_scene(history.grid(), BarColorScheme::ComputedGradient, mode));
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_history_update, bench_host_fft, bench_build_scene);
criterion_main!(benches);
