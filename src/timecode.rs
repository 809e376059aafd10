/*!
 * Timecode codec.
 *
 * Converts between wall-clock timecode strings and integer millisecond
 * offsets. SRT uses `HH:MM:SS,mmm`, WebVTT `HH:MM:SS.mmm` and ASS/SSA
 * `H:MM:SS.cc` (centiseconds, truncated).
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::TimecodeError;

// @const: Accepts both the comma (SRT) and dot (VTT) separator
static TIMECODE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+):(\d{1,2}):(\d{1,2})[,.](\d{1,3})$").unwrap()
});

const MS_PER_HOUR: u64 = 3_600_000;
const MS_PER_MINUTE: u64 = 60_000;
const MS_PER_SECOND: u64 = 1_000;

/// Textual layout used when formatting a timecode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimecodeStyle {
    /// `HH:MM:SS,mmm`
    Srt,
    /// `HH:MM:SS.mmm`
    Vtt,
    /// `H:MM:SS.cc`
    Ass,
}

/// Parse a `HH:MM:SS,mmm` or `HH:MM:SS.mmm` timecode into milliseconds
pub fn parse_timecode(value: &str) -> Result<u64, TimecodeError> {
    let trimmed = value.trim();
    let caps = TIMECODE_REGEX.captures(trimmed).ok_or_else(|| TimecodeError::Malformed {
        value: value.to_string(),
        reason: "expected HH:MM:SS,mmm or HH:MM:SS.mmm".to_string(),
    })?;

    let field = |idx: usize, name: &str| -> Result<u64, TimecodeError> {
        caps[idx].parse::<u64>().map_err(|e| TimecodeError::Malformed {
            value: value.to_string(),
            reason: format!("invalid {}: {}", name, e),
        })
    };

    let hours = field(1, "hours")?;
    let minutes = field(2, "minutes")?;
    let seconds = field(3, "seconds")?;
    let millis = field(4, "milliseconds")?;

    if minutes >= 60 || seconds >= 60 {
        return Err(TimecodeError::Malformed {
            value: value.to_string(),
            reason: format!("minutes and seconds must be below 60 (got {}:{})", minutes, seconds),
        });
    }

    hours
        .checked_mul(MS_PER_HOUR)
        .and_then(|h| h.checked_add(minutes * MS_PER_MINUTE + seconds * MS_PER_SECOND + millis))
        .ok_or_else(|| TimecodeError::Malformed {
            value: value.to_string(),
            reason: "hours out of range".to_string(),
        })
}

/// Format a millisecond offset using the given style
pub fn format_timecode(ms: u64, style: TimecodeStyle) -> String {
    let hours = ms / MS_PER_HOUR;
    let minutes = (ms % MS_PER_HOUR) / MS_PER_MINUTE;
    let seconds = (ms % MS_PER_MINUTE) / MS_PER_SECOND;
    let millis = ms % MS_PER_SECOND;

    match style {
        TimecodeStyle::Srt => format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis),
        TimecodeStyle::Vtt => format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis),
        TimecodeStyle::Ass => format!("{}:{:02}:{:02}.{:02}", hours, minutes, seconds, millis / 10),
    }
}

/// Shorthand for the SRT style, used as the canonical textual key
pub fn format_srt(ms: u64) -> String {
    format_timecode(ms, TimecodeStyle::Srt)
}
