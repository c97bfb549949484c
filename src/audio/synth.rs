//! Synthetic signals for tests, benches and demos.

use std::f32::consts::PI;

/// Sine wave of `num_samples` samples.
pub fn generate_sine(frequency: f32, sample_rate: u32, num_samples: usize, amplitude: f32) -> Vec<f32> {
    (0..num_samples)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            amplitude * (2.0 * PI * frequency * t).sin()
        })
        .collect()
}

/// Sum of equal-amplitude sines, scaled so the peak stays within `amplitude`.
pub fn generate_chord(
    frequencies: &[f32],
    sample_rate: u32,
    num_samples: usize,
    amplitude: f32,
) -> Vec<f32> {
    if frequencies.is_empty() {
        return vec![0.0; num_samples];
    }

    let voice_amp = amplitude / frequencies.len() as f32;
    let mut samples = vec![0.0; num_samples];
    for &freq in frequencies {
        for (out, s) in samples
            .iter_mut()
            .zip(generate_sine(freq, sample_rate, num_samples, voice_amp))
        {
            *out += s;
        }
    }
    samples
}

/// Reproducible white noise from a linear congruential generator.
pub fn generate_white_noise(num_samples: usize, amplitude: f32, seed: u64) -> Vec<f32> {
    let mut state = seed;
    let a: u64 = 6364136223846793005;
    let c: u64 = 1442695040888963407;

    (0..num_samples)
        .map(|_| {
            state = state.wrapping_mul(a).wrapping_add(c);
            let normalized = (state as f32 / u64::MAX as f32) * 2.0 - 1.0;
            amplitude * normalized
        })
        .collect()
}
