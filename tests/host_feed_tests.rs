//! Integration tests for the standalone host's audio feed.

use spectrum_bars::audio::{generate_sine, SpectrumAnalyzer, HOST_FFT_SIZE, NUM_BARS};
use spectrum_bars::settings::{SettingValue, KEY_SPEED};
use spectrum_bars::{FrequencyFeed, JsonSettingsStore, SpectrumVisualization, StandaloneHost, Visualization};

const SAMPLE_RATE: u32 = 44100;

#[test]
fn test_sine_lands_in_expected_bucket() {
    let freq = 3000.0;
    let samples = generate_sine(freq, SAMPLE_RATE, HOST_FFT_SIZE, 1.0);

    let mut analyzer = SpectrumAnalyzer::default();
    let spectrum = analyzer.analyze(&samples);
    assert_eq!(spectrum.len(), 256);

    let peak_bin = spectrum
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
        .map(|(i, _)| i)
        .unwrap();
    let expected = analyzer.freq_to_bin(freq, SAMPLE_RATE);
    assert!(peak_bin.abs_diff(expected) <= 1, "peak {} expected {}", peak_bin, expected);
    assert_eq!(peak_bin / (256 / NUM_BARS), expected / (256 / NUM_BARS));
}

#[test]
fn test_feed_follows_visualization_delay() {
    let store = JsonSettingsStore::from_json(r#"{"speed": 4}"#).unwrap();
    let mut vis = SpectrumVisualization::new(StandaloneHost::new("/nonexistent").with_settings(store));
    let mut feed = FrequencyFeed::new();
    let pcm = generate_sine(440.0, SAMPLE_RATE, HOST_FFT_SIZE * 6, 0.5);

    assert_eq!(feed.push(&pcm, &mut vis), 2);
    assert_eq!(feed.pending(), 4);

    vis.set_setting(KEY_SPEED, &SettingValue::from(0));
    assert_eq!(feed.push(&pcm[..HOST_FFT_SIZE], &mut vis), 5);
    assert_eq!(feed.pending(), 0);
}

#[test]
fn test_feed_through_trait_object() {
    let mut vis = spectrum_bars::create_visualization(StandaloneHost::new("/nonexistent"));
    let mut feed = FrequencyFeed::new();

    let delivered = feed.push(&vec![0.25; HOST_FFT_SIZE * 3], vis.as_mut());
    assert_eq!(delivered, 3);
    assert_eq!(feed.buffered_samples(), 0);
}
