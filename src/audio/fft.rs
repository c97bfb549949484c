//! FFT magnitude analysis using RustFFT.
//!
//! Media-player hosts compute the frequency data they hand to a
//! visualization themselves. The standalone host uses this analyzer to do
//! the same from raw PCM blocks.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

/// Block size the standalone host feeds through the FFT.
pub const HOST_FFT_SIZE: usize = 512;

/// Windowed FFT producing `fft_size / 2` magnitudes per block.
pub struct SpectrumAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    fft_size: usize,
    window: Vec<f32>,
    scratch: Vec<Complex<f32>>,
}

impl SpectrumAnalyzer {
    /// Create a new analyzer with the given FFT size.
    ///
    /// # Panics
    ///
    /// Panics if `fft_size` is not a power of two.
    pub fn new(fft_size: usize) -> Self {
        assert!(fft_size.is_power_of_two(), "FFT size must be a power of 2");

        // Hann window
        let window: Vec<f32> = (0..fft_size)
            .map(|i| {
                let t = i as f32 / (fft_size - 1) as f32;
                0.5 * (1.0 - (2.0 * std::f32::consts::PI * t).cos())
            })
            .collect();

        let fft = FftPlanner::new().plan_fft_forward(fft_size);

        Self {
            fft,
            fft_size,
            window,
            scratch: vec![Complex::new(0.0, 0.0); fft_size],
        }
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Number of magnitudes returned per block.
    pub fn num_bins(&self) -> usize {
        self.fft_size / 2
    }

    /// Magnitude spectrum of one block.
    ///
    /// Blocks shorter than the FFT size are zero-padded; longer blocks are
    /// truncated.
    pub fn analyze(&mut self, samples: &[f32]) -> Vec<f32> {
        for (i, slot) in self.scratch.iter_mut().enumerate() {
            let s = samples.get(i).copied().unwrap_or(0.0);
            *slot = Complex::new(s * self.window[i], 0.0);
        }

        self.fft.process(&mut self.scratch);

        let norm = (self.fft_size as f32).sqrt();
        self.scratch[..self.num_bins()]
            .iter()
            .map(|c| c.norm() / norm)
            .collect()
    }

    /// Frequency in Hz of a bin index.
    pub fn bin_to_freq(&self, bin: usize, sample_rate: u32) -> f32 {
        bin as f32 * sample_rate as f32 / self.fft_size as f32
    }

    /// Bin index closest to a frequency in Hz.
    pub fn freq_to_bin(&self, freq: f32, sample_rate: u32) -> usize {
        (freq * self.fft_size as f32 / sample_rate as f32).round() as usize
    }
}

impl Default for SpectrumAnalyzer {
    fn default() -> Self {
        Self::new(HOST_FFT_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::synth::generate_sine;

    #[test]
    fn test_default_analyzer_matches_host_block() {
        let analyzer = SpectrumAnalyzer::default();
        assert_eq!(analyzer.fft_size(), HOST_FFT_SIZE);
        assert_eq!(analyzer.num_bins(), 256);
    }

    #[test]
    fn test_sine_peak_lands_in_expected_bin() {
        let sample_rate = 44100;
        let samples = generate_sine(2000.0, sample_rate, HOST_FFT_SIZE, 1.0);

        let mut analyzer = SpectrumAnalyzer::default();
        let spectrum = analyzer.analyze(&samples);

        let peak_bin = spectrum
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| i)
            .unwrap();

        let peak_freq = analyzer.bin_to_freq(peak_bin, sample_rate);
        assert!((peak_freq - 2000.0).abs() < 100.0, "peak at {} Hz", peak_freq);
    }

    #[test]
    fn test_short_block_is_zero_padded() {
        let mut analyzer = SpectrumAnalyzer::default();
        let spectrum = analyzer.analyze(&[0.0; 10]);
        assert_eq!(spectrum.len(), 256);
        assert!(spectrum.iter().all(|&m| m == 0.0));
    }
}
