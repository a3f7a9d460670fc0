//! Known-answer tests for the four line codes at the default grid density.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use linecode::{GenerateError, MessageError, ModulationType, Signal, SignalGenerator};

/// Level of each bit's first and last sample.
fn edges(signal: &Signal) -> Vec<(f64, f64)> {
    signal
        .samples
        .chunks(100)
        .map(|bit| (bit[0], bit[bit.len() - 1]))
        .collect()
}

#[test]
fn manchester_10110() {
    let signal = SignalGenerator::default()
        .generate(ModulationType::Manchester, "10110")
        .unwrap();
    assert_eq!(
        edges(&signal),
        vec![(-1.0, 1.0), (1.0, -1.0), (-1.0, 1.0), (-1.0, 1.0), (1.0, -1.0)]
    );
    // Five mid-bit transitions plus one boundary flip between the adjacent 1s.
    let mids: Vec<usize> = (0..5).map(|i| i * 100 + 50).collect();
    let transitions = signal.transitions();
    for mid in &mids {
        assert!(transitions.contains(mid), "missing transition at {mid}");
    }
    assert_eq!(transitions, vec![50, 150, 250, 300, 350, 450]);
}

#[test]
fn bipolar_ami_all_zeros_is_flat() {
    let signal = SignalGenerator::default()
        .generate(ModulationType::BipolarAmi, "00000")
        .unwrap();
    assert!(signal.samples.iter().all(|l| *l == 0.0));
}

#[test]
fn bipolar_ami_all_ones_alternates() {
    let signal = SignalGenerator::default()
        .generate(ModulationType::BipolarAmi, "11111")
        .unwrap();
    assert_eq!(
        edges(&signal),
        vec![(1.0, 1.0), (-1.0, -1.0), (1.0, 1.0), (-1.0, -1.0), (1.0, 1.0)]
    );
}

#[test]
fn nrz_m_10110() {
    let signal = SignalGenerator::default()
        .generate(ModulationType::NrzM, "10110")
        .unwrap();
    assert_eq!(
        edges(&signal),
        vec![(1.0, 1.0), (1.0, 1.0), (-1.0, -1.0), (1.0, 1.0), (1.0, 1.0)]
    );
}

#[test]
fn unipolar_rz_10110() {
    let signal = SignalGenerator::default()
        .generate(ModulationType::UnipolarRz, "10110")
        .unwrap();
    assert_eq!(
        edges(&signal),
        vec![(1.0, 0.0), (0.0, 0.0), (1.0, 0.0), (1.0, 0.0), (0.0, 0.0)]
    );
    assert_eq!(signal.samples[49], 1.0);
    assert_eq!(signal.samples[50], 0.0);
}

#[test]
fn short_message_is_invalid_input() {
    let err = SignalGenerator::default()
        .generate(ModulationType::Manchester, "101")
        .unwrap_err();
    assert_eq!(
        err,
        GenerateError::InvalidInput(MessageError::InvalidLength {
            expected: 5,
            actual: 3
        })
    );
}

#[test]
fn time_axis_spans_half_a_second() {
    let signal = SignalGenerator::default()
        .generate(ModulationType::NrzM, "00000")
        .unwrap();
    assert_eq!(signal.time_axis[0], 0.0);
    assert!((signal.time_axis[1] - 0.001).abs() < 1e-12);
    assert!((signal.time_axis[499] - 0.499).abs() < 1e-9);
}
