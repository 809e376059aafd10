/*!
 * Tests for timecode parsing and formatting
 */

use srt_highlighter::errors::TimecodeError;
use srt_highlighter::timecode::{self, TimecodeStyle};

/// Test that every layout renders the same instant consistently
#[test]
fn test_format_timecode_withAllStyles_shouldUseLayoutSeparators() {
    let ms = 3_723_456; // 1h 2m 3s 456ms
    assert_eq!(timecode::format_timecode(ms, TimecodeStyle::Srt), "01:02:03,456");
    assert_eq!(timecode::format_timecode(ms, TimecodeStyle::Vtt), "01:02:03.456");
    assert_eq!(timecode::format_timecode(ms, TimecodeStyle::Ass), "1:02:03.45");
}

/// Test that ASS centiseconds are truncated, not rounded
#[test]
fn test_format_timecode_withAss_shouldTruncateCentiseconds() {
    assert_eq!(timecode::format_timecode(999, TimecodeStyle::Ass), "0:00:00.99");
    assert_eq!(timecode::format_timecode(1_009, TimecodeStyle::Ass), "0:00:01.00");
}

/// Test that hours beyond two digits are kept
#[test]
fn test_format_srt_withLongDuration_shouldNotWrapHours() {
    assert_eq!(timecode::format_srt(0), "00:00:00,000");
    assert_eq!(timecode::format_srt(100 * 3_600_000), "100:00:00,000");
}

/// Test parsing of both separators
#[test]
fn test_parse_timecode_withValidValues_shouldReturnMilliseconds() {
    let cases = [
        ("00:00:00,000", 0),
        ("00:00:01,500", 1_500),
        ("00:01:00.000", 60_000),
        ("02:00:00,001", 7_200_001),
    ];

    for (input, expected) in cases {
        assert_eq!(timecode::parse_timecode(input).unwrap(), expected, "Failed for input: {}", input);
    }
}

/// Test that malformed values are rejected with the offending input
#[test]
fn test_parse_timecode_withMalformedValues_shouldFail() {
    for input in ["", "abc", "00:00:01", "00:61:00,000", "00:00:60,000", "00-00-01,000"] {
        match timecode::parse_timecode(input) {
            Err(TimecodeError::Malformed { value, .. }) => assert_eq!(value, input),
            Ok(ms) => panic!("'{}' parsed as {}ms", input, ms),
        }
    }
}

/// Test that formatting then parsing gives back the original offset
#[test]
fn test_parse_timecode_withFormattedSrt_shouldRoundTrip() {
    for ms in [0, 1, 59_999, 3_599_999, 86_400_000] {
        let srt = timecode::format_timecode(ms, TimecodeStyle::Srt);
        let vtt = timecode::format_timecode(ms, TimecodeStyle::Vtt);
        assert_eq!(timecode::parse_timecode(&srt).unwrap(), ms);
        assert_eq!(timecode::parse_timecode(&vtt).unwrap(), ms);
    }
}
