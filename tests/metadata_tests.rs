//! Tests for sidecar capture metadata parsing

use replay_firmware::config::DEFAULT_SAMPLE_RATE;
use replay_firmware::metadata::CaptureMetadata;
use replay_firmware::types::Frequency;

#[test]
fn parses_both_fields() {
    let meta = CaptureMetadata::parse("center_frequency=433920000\nsample_rate=500000\n");

    assert_eq!(meta.center_frequency, Frequency::from_hz(433_920_000));
    assert_eq!(meta.sample_rate, Some(500_000));
}

#[test]
fn zero_center_frequency_means_unspecified() {
    let meta = CaptureMetadata::parse("center_frequency=0\nsample_rate=250000\n");

    assert_eq!(meta.center_frequency, None);
    let tuned = Frequency::from_hz(868_000_000).unwrap();
    assert_eq!(meta.center_or(tuned), tuned);
}

#[test]
fn absent_sidecar_fields_use_defaults() {
    let meta = CaptureMetadata::parse("");

    let tuned = Frequency::from_hz(915_000_000).unwrap();
    assert_eq!(meta.center_or(tuned), tuned);
    assert_eq!(meta.sample_rate_or_default(), DEFAULT_SAMPLE_RATE);
}

#[test]
fn unknown_keys_and_junk_lines_are_ignored() {
    let text = "comment without equals\nrecorder=portable\ncenter_frequency=100000000\nsample_rate=abc\n";
    let meta = CaptureMetadata::parse(text);

    assert_eq!(meta.center_frequency, Frequency::from_hz(100_000_000));
    assert_eq!(meta.sample_rate, None);
}

#[test]
fn whitespace_around_keys_and_values_is_tolerated() {
    let meta = CaptureMetadata::parse("  center_frequency = 2400000000 \n sample_rate = 20000000\n");

    assert_eq!(meta.center_frequency, Frequency::from_hz(2_400_000_000));
    assert_eq!(meta.sample_rate, Some(20_000_000));
}

#[test]
fn out_of_range_center_frequency_is_ignored() {
    let meta = CaptureMetadata::parse("center_frequency=9999999999999\n");

    assert_eq!(meta.center_frequency, None);
}
