//! Sampled waveform paired with its time axis.

use serde::Serialize;

/// `samples[k]` is the level held from `time_axis[k]` until the next sample.
///
/// Both vectors always have the same length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Signal {
    /// Sample timestamps in seconds
    pub time_axis: Vec<f64>,
    /// Sample levels
    pub samples: Vec<f64>,
}

impl Signal {
    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// `true` when the signal holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// `(time, level)` pairs in order.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.time_axis.iter().copied().zip(self.samples.iter().copied())
    }

    /// Indices `k` where `samples[k] != samples[k - 1]`.
    pub fn transitions(&self) -> Vec<usize> {
        self.samples
            .windows(2)
            .enumerate()
            .filter(|(_, pair)| pair.first() != pair.last())
            .map(|(k, _)| k + 1)
            .collect()
    }
}
