//! Shared time axis and per-bit sample boundaries.
//!
//! Every encoder writes into the same grid: `bit_count * samples_per_bit`
//! samples spread evenly over `[0, bit_count * bit_duration)`. Transition
//! points inside a bit are always derived from [`BitSpan`], never recomputed
//! by the encoders themselves.

use core::ops::Range;

/// Sample boundaries of a single bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitSpan {
    /// First sample of the bit.
    pub start: usize,
    /// First sample of the second half (`start + samples_per_bit / 2`).
    ///
    /// With an odd sample count the second half gets the extra sample.
    pub mid: usize,
    /// One past the last sample of the bit.
    pub end: usize,
}

impl BitSpan {
    /// The whole bit, `[start, end)`.
    pub fn full(&self) -> Range<usize> {
        self.start..self.end
    }

    /// First half, `[start, mid)`.
    pub fn first_half(&self) -> Range<usize> {
        self.start..self.mid
    }

    /// Second half, `[mid, end)`.
    pub fn second_half(&self) -> Range<usize> {
        self.mid..self.end
    }
}

/// Uniform sample grid for a message of `bit_count` bits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleGrid {
    bit_count: usize,
    samples_per_bit: usize,
    bit_duration: f64,
}

impl SampleGrid {
    /// Build a grid. `samples_per_bit` below 1 is clamped to 1.
    #[must_use]
    pub fn new(bit_count: usize, samples_per_bit: usize, bit_duration: f64) -> Self {
        Self {
            bit_count,
            samples_per_bit: samples_per_bit.max(1),
            bit_duration,
        }
    }

    /// Number of bits covered.
    pub fn bit_count(&self) -> usize {
        self.bit_count
    }

    /// Samples per bit (at least 1).
    pub fn samples_per_bit(&self) -> usize {
        self.samples_per_bit
    }

    /// Seconds per bit.
    pub fn bit_duration(&self) -> f64 {
        self.bit_duration
    }

    /// `bit_count * samples_per_bit`.
    pub fn total_samples(&self) -> usize {
        self.bit_count.saturating_mul(self.samples_per_bit)
    }

    /// Total signal duration in seconds.
    #[allow(clippy::cast_precision_loss)] // bit counts are tiny
    pub fn total_duration(&self) -> f64 {
        self.bit_count as f64 * self.bit_duration
    }

    /// Seconds between consecutive samples.
    #[allow(clippy::cast_precision_loss)]
    pub fn sample_period(&self) -> f64 {
        self.bit_duration / self.samples_per_bit as f64
    }

    /// Timestamps `k * total_duration / total_samples`, endpoint excluded.
    #[allow(clippy::cast_precision_loss)]
    pub fn time_axis(&self) -> Vec<f64> {
        let total = self.total_samples();
        if total == 0 {
            return Vec::new();
        }
        let step = self.total_duration() / total as f64;
        (0..total).map(|k| k as f64 * step).collect()
    }

    /// Boundaries of bit `index`, clamped to the grid.
    pub fn bit_span(&self, index: usize) -> BitSpan {
        let total = self.total_samples();
        let start = index.saturating_mul(self.samples_per_bit).min(total);
        let mid = start.saturating_add(self.samples_per_bit / 2).min(total);
        let end = index
            .saturating_add(1)
            .saturating_mul(self.samples_per_bit)
            .min(total);
        BitSpan { start, mid, end }
    }

    /// Spans of every bit, in order.
    pub fn spans(&self) -> impl Iterator<Item = BitSpan> + '_ {
        (0..self.bit_count).map(move |i| self.bit_span(i))
    }
}
