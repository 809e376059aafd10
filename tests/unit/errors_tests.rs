/*!
 * Tests for error types and conversions
 */

use std::io;
use srt_highlighter::errors::{AppError, ConversionError, ParseError, RenderError, TimecodeError};

/// Test error messages name the offending data
#[test]
fn test_error_display_withFields_shouldIncludeDetails() {
    let err = ParseError::MalformedBlock {
        index: 4,
        line: 12,
        reason: "missing arrow".to_string(),
    };
    assert_eq!(err.to_string(), "Malformed caption block 4 (line 12): missing arrow");

    let err = ConversionError::UnsupportedFormatPair {
        from: "ass".to_string(),
        to: "srt".to_string(),
    };
    assert_eq!(err.to_string(), "Unsupported format conversion: ass -> srt");

    let err = RenderError::InvalidColor {
        color: "blue".to_string(),
        token: "sky".to_string(),
        position: 3,
    };
    assert_eq!(err.to_string(), "Invalid color 'blue' on token 'sky' (position 3)");
}

/// Test conversions into the application error
#[test]
fn test_app_error_from_withComponentErrors_shouldWrap() {
    let app: AppError = ParseError::NoCaptions.into();
    assert!(matches!(app, AppError::Parse(ParseError::NoCaptions)));

    let app: AppError = TimecodeError::Malformed {
        value: "x".to_string(),
        reason: "bad".to_string(),
    }
    .into();
    assert!(app.to_string().starts_with("Timecode error: Malformed timecode 'x'"));

    let app: AppError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
    assert!(matches!(app, AppError::File(ref msg) if msg == "gone"));

    let app: AppError = anyhow::anyhow!("boom").into();
    assert_eq!(app.to_string(), "Unknown error: boom");
}

/// Test that the timecode cause is kept as the error source
#[test]
fn test_render_error_withTimecodeSource_shouldExposeSource() {
    use std::error::Error;

    let err = RenderError::InvalidTime {
        position: 2,
        source: TimecodeError::Malformed {
            value: "soon".to_string(),
            reason: "bad".to_string(),
        },
    };
    assert!(err.source().is_some());
    assert!(err.to_string().contains("position 2"));
}
