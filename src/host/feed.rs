//! Audio delivery the way a media player does it.

use crate::audio::{SpectrumAnalyzer, HOST_FFT_SIZE};
use crate::visualization::Visualization;
use std::collections::VecDeque;

/// One PCM block and the frequency data computed from it.
struct AudioBlock {
    pcm: Vec<f32>,
    freq: Vec<f32>,
}

/// Splits PCM into fixed-size blocks, computes their spectrum and hands them
/// to a visualization after the delay it asks for.
///
/// Samples that do not fill a whole block are kept for the next push.
pub struct FrequencyFeed {
    analyzer: SpectrumAnalyzer,
    carry: Vec<f32>,
    pending: VecDeque<AudioBlock>,
}

impl FrequencyFeed {
    pub fn new() -> Self {
        Self::with_block_size(HOST_FFT_SIZE)
    }

    /// # Panics
    ///
    /// Panics if `block_size` is not a power of two.
    pub fn with_block_size(block_size: usize) -> Self {
        Self {
            analyzer: SpectrumAnalyzer::new(block_size),
            carry: Vec::with_capacity(block_size),
            pending: VecDeque::new(),
        }
    }

    pub fn block_size(&self) -> usize {
        self.analyzer.fft_size()
    }

    /// Blocks held back waiting for the delay to pass.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Samples waiting for a block to fill.
    pub fn buffered_samples(&self) -> usize {
        self.carry.len()
    }

    /// Feed PCM samples and deliver every block whose delay has passed.
    ///
    /// The visualization's [`info`](Visualization::info) is read for every
    /// block, so a changed delay takes effect immediately. Returns the number
    /// of blocks delivered.
    pub fn push<V: Visualization + ?Sized>(&mut self, pcm: &[f32], vis: &mut V) -> usize {
        let block_size = self.block_size();
        let mut delivered = 0;

        for &sample in pcm {
            self.carry.push(sample);
            if self.carry.len() < block_size {
                continue;
            }

            let block = std::mem::replace(&mut self.carry, Vec::with_capacity(block_size));
            let info = vis.info();
            let freq = if info.wants_frequency_data {
                self.analyzer.analyze(&block)
            } else {
                Vec::new()
            };
            self.pending.push_back(AudioBlock { pcm: block, freq });

            while self.pending.len() > info.buffer_delay as usize {
                let Some(ready) = self.pending.pop_front() else {
                    break;
                };
                vis.audio_data(&ready.pcm, &ready.freq);
                delivered += 1;
            }
        }

        delivered
    }

    /// Drop held-back blocks and partial samples.
    pub fn clear(&mut self) {
        self.carry.clear();
        self.pending.clear();
    }
}

impl Default for FrequencyFeed {
    fn default() -> Self {
        Self::new()
    }
}
