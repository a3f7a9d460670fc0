//! The four line-code encoders.
//!
//! Each encoder walks the message left to right and writes one level per
//! sample into a buffer laid out by a [`SampleGrid`]. Encoders are pure:
//! same message, grid and levels always give the same samples.

use core::ops::Range;

use crate::grid::SampleGrid;
use crate::levels::VoltageLevels;
use crate::message::BinaryMessage;

/// Signature shared by every encoder.
pub type EncoderFn = fn(&BinaryMessage, &SampleGrid, &VoltageLevels) -> Vec<f64>;

fn fill(samples: &mut [f64], range: Range<usize>, level: f64) {
    if let Some(slice) = samples.get_mut(range) {
        slice.fill(level);
    }
}

/// NRZ-M (differential, non-return-to-zero mark).
///
/// The level starts at `low_bipolar` and is negated on every `1`. A `0`
/// keeps whatever level the previous bit left behind.
pub fn nrz_m(message: &BinaryMessage, grid: &SampleGrid, levels: &VoltageLevels) -> Vec<f64> {
    let mut samples = vec![0.0; grid.total_samples()];
    let mut current = levels.low_bipolar;
    for (bit, span) in message.bits().iter().zip(grid.spans()) {
        if *bit {
            current = -current;
        }
        fill(&mut samples, span.full(), current);
    }
    samples
}

/// Manchester, Bi-phase L.
///
/// `0` is high then low, `1` is low then high, switching at the bit midpoint.
pub fn manchester(message: &BinaryMessage, grid: &SampleGrid, levels: &VoltageLevels) -> Vec<f64> {
    let mut samples = vec![0.0; grid.total_samples()];
    for (bit, span) in message.bits().iter().zip(grid.spans()) {
        let (first, second) = if *bit {
            (levels.low_bipolar, levels.high)
        } else {
            (levels.high, levels.low_bipolar)
        };
        fill(&mut samples, span.first_half(), first);
        fill(&mut samples, span.second_half(), second);
    }
    samples
}

/// Unipolar return-to-zero: a half-bit high pulse for every `1`.
pub fn unipolar_rz(message: &BinaryMessage, grid: &SampleGrid, levels: &VoltageLevels) -> Vec<f64> {
    let mut samples = vec![0.0; grid.total_samples()];
    for (bit, span) in message.bits().iter().zip(grid.spans()) {
        if *bit {
            fill(&mut samples, span.first_half(), levels.high);
            fill(&mut samples, span.second_half(), levels.low_unipolar);
        } else {
            fill(&mut samples, span.full(), levels.low_unipolar);
        }
    }
    samples
}

/// Bipolar alternate mark inversion.
///
/// Every `1` is a full-bit pulse whose sign is the opposite of the previous
/// pulse; the first pulse is the negation of `low_bipolar`. Zeros sit at
/// `low_unipolar` and do not affect the alternation.
pub fn bipolar_ami(message: &BinaryMessage, grid: &SampleGrid, levels: &VoltageLevels) -> Vec<f64> {
    let mut samples = vec![0.0; grid.total_samples()];
    let mut last_pulse = levels.low_bipolar;
    for (bit, span) in message.bits().iter().zip(grid.spans()) {
        if *bit {
            let pulse = -last_pulse;
            fill(&mut samples, span.full(), pulse);
            last_pulse = pulse;
        } else {
            fill(&mut samples, span.full(), levels.low_unipolar);
        }
    }
    samples
}

/// Raw bit values (`0.0` / `1.0`) held for a whole bit each.
///
/// Used to label plots next to the encoded waveform.
pub fn original_signal(message: &BinaryMessage, grid: &SampleGrid) -> Vec<f64> {
    let mut samples = vec![0.0; grid.total_samples()];
    for (bit, span) in message.bits().iter().zip(grid.spans()) {
        fill(&mut samples, span.full(), if *bit { 1.0 } else { 0.0 });
    }
    samples
}
