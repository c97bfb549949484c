//! Audio-side state and signal helpers.
//!
//! This module provides:
//! - The scrolling spectrum history driven by host frequency data
//! - FFT magnitude analysis via RustFFT (used by the standalone host)
//! - Synthetic test signals

pub mod fft;
pub mod history;
pub mod synth;

pub use fft::{SpectrumAnalyzer, HOST_FFT_SIZE};
pub use history::{HeightGrid, HistoryError, SpectrumHistory, NUM_BARS, SENTINEL_HEIGHT};
pub use synth::{generate_chord, generate_sine, generate_white_noise};
