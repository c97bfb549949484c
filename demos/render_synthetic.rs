//! Demo: drive the spectrum visualization with synthetic audio.
//!
//! A chord sweeps through the standalone host's audio feed while the
//! visualization renders offscreen. The last frame is written as a PNG.
//!
//! Run with:
//!     cargo run --example render_synthetic --features tokio -- [output.png] [settings.json]

use anyhow::Context;
use spectrum_bars::audio::generate_chord;
use spectrum_bars::gpu::{GpuContext, Viewport};
use spectrum_bars::host::{FrequencyFeed, StandaloneHost};
use spectrum_bars::settings::JsonSettingsStore;
use spectrum_bars::visualization::{SpectrumVisualization, StreamInfo, Visualization};
use std::path::PathBuf;

const SAMPLE_RATE: u32 = 44100;
const FPS: u32 = 30;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let output = PathBuf::from(args.next().unwrap_or_else(|| "spectrum_bars.png".to_string()));
    let settings = match args.next() {
        Some(path) => JsonSettingsStore::open(&path)
            .with_context(|| format!("loading settings from {}", path))?,
        None => JsonSettingsStore::default(),
    };

    println!("Spectrum Bars - Synthetic Audio Demo");
    println!("====================================\n");

    let gpu = GpuContext::new().await.context("no GPU available")?;
    println!("  GPU: {}", gpu.adapter_info().name);

    let host = StandaloneHost::new(env!("CARGO_MANIFEST_DIR"))
        .with_settings(settings)
        .with_gpu(gpu)
        .with_viewport(Viewport::new(640, 480));
    let mut vis = SpectrumVisualization::new(host);

    let stream = StreamInfo {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 32,
        track_name: "synthetic chord".to_string(),
    };
    vis.start(&stream)?;

    // Two seconds of a chord whose root rises every frame
    let samples_per_frame = (SAMPLE_RATE / FPS) as usize;
    let frames = FPS * 2;
    let mut feed = FrequencyFeed::new();

    println!("Rendering {} frames...", frames);
    for frame in 0..frames {
        let root = 110.0 + frame as f32 * 15.0;
        let pcm = generate_chord(&[root, root * 1.25, root * 1.5], SAMPLE_RATE, samples_per_frame, 0.8);
        feed.push(&pcm, &mut vis);
        vis.render();
    }

    let renderer = vis.renderer().context("visualization is not started")?;
    let image = renderer.snapshot()?;
    image
        .save(&output)
        .with_context(|| format!("writing {}", output.display()))?;
    println!("Saved last frame to {}", output.display());

    vis.stop();
    Ok(())
}
