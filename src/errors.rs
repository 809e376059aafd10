/*!
 * Error types for the srt-highlighter application.
 *
 * This module contains custom error types for the different stages of the
 * caption pipeline, using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors raised by the timecode codec
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimecodeError {
    /// The value does not look like `HH:MM:SS,mmm` / `HH:MM:SS.mmm`
    #[error("Malformed timecode '{value}': {reason}")]
    Malformed {
        /// Offending input
        value: String,
        /// Human readable cause
        reason: String,
    },
}

/// Errors that can occur while reading caption files
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A structurally invalid caption block. Recovered by skipping the block.
    #[error("Malformed caption block {index} (line {line}): {reason}")]
    MalformedBlock {
        /// Index declared by the block (0 when unknown)
        index: u32,
        /// 1-based line number where the problem was detected
        line: usize,
        /// Human readable cause
        reason: String,
    },

    /// The input did not contain a single usable caption block
    #[error("No valid caption blocks were found in the input")]
    NoCaptions,
}

/// Errors raised by whole-file format conversion
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    /// No mapping is defined between the two formats
    #[error("Unsupported format conversion: {from} -> {to}")]
    UnsupportedFormatPair {
        /// Source format name
        from: String,
        /// Target format name
        to: String,
    },

    /// The source format name is not known at all
    #[error("Unknown subtitle format: {0}")]
    UnknownFormat(String),
}

/// Errors raised while rendering an output document.
///
/// These never leave the serializer: they are turned into the
/// error document of the requested format.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// A style color that is not `#RRGGBB`
    #[error("Invalid color '{color}' on token '{token}' (position {position})")]
    InvalidColor {
        color: String,
        token: String,
        position: usize,
    },

    /// A token or group whose end precedes its start
    #[error("Invalid time range {start_ms}ms -> {end_ms}ms at position {position}")]
    InvalidTimeRange {
        start_ms: u64,
        end_ms: u64,
        position: usize,
    },

    /// A time field that could not be decoded
    #[error("Invalid time field at position {position}: {source}")]
    InvalidTime {
        position: usize,
        #[source]
        source: TimecodeError,
    },

    /// The JSON document could not be produced or read
    #[error("JSON error: {0}")]
    Json(String),
}

/// Errors raised while resolving a style descriptor
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StyleError {
    /// A configured color is not a `#RRGGBB` hex string
    #[error("Invalid color '{color}' in style '{style}'")]
    InvalidColor { color: String, style: String },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from timecode handling
    #[error("Timecode error: {0}")]
    Timecode(#[from] TimecodeError),

    /// Error from caption parsing
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Error from format conversion
    #[error("Conversion error: {0}")]
    Conversion(#[from] ConversionError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
