/*!
 * Whole-file format conversion.
 *
 * Structural transcoding between caption file formats, independent of the
 * word-level pipeline. Defined pairs: SRT to WebVTT, WebVTT to SRT, SRT to
 * ASS and JSON to SRT. Every other pair fails with
 * [`ConversionError::UnsupportedFormatPair`].
 */

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use log::{debug, warn};

use crate::errors::{ConversionError, ParseError, RenderError};
use crate::serializer::{self, JsonRecord, OutputFormat};
use crate::subtitle_processor::{self, CaptionBlock};
use crate::timecode::{self, TimecodeStyle};
use crate::word_timing::TimedToken;

/// Whole-file caption format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubtitleFormat {
    Srt,
    Vtt,
    Ass,
    Json,
}

impl SubtitleFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Srt => "srt",
            Self::Vtt => "vtt",
            Self::Ass => "ass",
            Self::Json => "json",
        }
    }

    /// Guess the format from a file extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConversionError> {
        let ext = path
            .as_ref()
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_default();
        ext.parse()
    }
}

impl fmt::Display for SubtitleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SubtitleFormat {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches('.').to_lowercase().as_str() {
            "srt" => Ok(Self::Srt),
            "vtt" | "webvtt" => Ok(Self::Vtt),
            "ass" | "ssa" => Ok(Self::Ass),
            "json" => Ok(Self::Json),
            _ => Err(ConversionError::UnknownFormat(s.to_string())),
        }
    }
}

/// Rendering choices for conversions that go through the serializer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionOptions {
    /// Merge records sharing a start time
    pub grouped: bool,
    /// Keep colors, weights and icons
    pub styled: bool,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            grouped: true,
            styled: true,
        }
    }
}

/// Convert a whole file with default options
pub fn convert_whole_file(bytes: &[u8], from: SubtitleFormat, to: SubtitleFormat) -> Result<Vec<u8>, ConversionError> {
    convert_with_options(bytes, from, to, &ConversionOptions::default())
}

/// Convert a whole file.
///
/// Only an undefined format pair is an error; empty or malformed input
/// yields the target format's sentinel or error document.
pub fn convert_with_options(
    bytes: &[u8],
    from: SubtitleFormat,
    to: SubtitleFormat,
    options: &ConversionOptions,
) -> Result<Vec<u8>, ConversionError> {
    debug!("Converting {} -> {}", from, to);

    let document = match (from, to) {
        (SubtitleFormat::Srt, SubtitleFormat::Vtt) => {
            captions_or_sentinel(subtitle_processor::parse_captions(bytes), OutputFormat::Vtt, |blocks| {
                blocks_to_vtt(&blocks)
            })
        }
        (SubtitleFormat::Vtt, SubtitleFormat::Srt) => {
            captions_or_sentinel(subtitle_processor::parse_vtt_captions(bytes), OutputFormat::PlainSrt, |blocks| {
                subtitle_processor::blocks_to_srt(&blocks)
            })
        }
        (SubtitleFormat::Srt, SubtitleFormat::Ass) => {
            captions_or_sentinel(subtitle_processor::parse_captions(bytes), OutputFormat::Ass, |blocks| {
                blocks_to_ass(&blocks)
            })
        }
        (SubtitleFormat::Json, SubtitleFormat::Srt) => json_to_srt(bytes, options),
        _ => {
            return Err(ConversionError::UnsupportedFormatPair {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
    };

    Ok(document.into_bytes())
}

fn captions_or_sentinel(
    parsed: Result<Vec<CaptionBlock>, ParseError>,
    target: OutputFormat,
    render: impl FnOnce(Vec<CaptionBlock>) -> String,
) -> String {
    match parsed {
        Ok(blocks) => render(blocks),
        Err(e) => {
            debug!("{}; emitting empty {} document", e, target);
            serializer::empty_document(target)
        }
    }
}

/// WebVTT document, one cue per block, line breaks kept
pub fn blocks_to_vtt(blocks: &[CaptionBlock]) -> String {
    let mut out = String::from("WEBVTT\n\n");
    for block in blocks {
        out.push_str(&format!(
            "{} --> {}\n{}\n\n",
            timecode::format_timecode(block.start_ms, TimecodeStyle::Vtt),
            timecode::format_timecode(block.end_ms, TimecodeStyle::Vtt),
            block.lines.join("\n")
        ));
    }
    out
}

/// ASS document, one plain `Dialogue:` line per block
pub fn blocks_to_ass(blocks: &[CaptionBlock]) -> String {
    let texts: Vec<String> = blocks.iter().map(|b| b.lines.join("\\N")).collect();
    serializer::render_plain_ass(
        blocks
            .iter()
            .zip(&texts)
            .map(|(b, text)| (b.start_ms, b.end_ms, text.as_str())),
    )
}

fn json_to_srt(bytes: &[u8], options: &ConversionOptions) -> String {
    let format = if options.styled {
        OutputFormat::StyledSrt
    } else {
        OutputFormat::PlainSrt
    };

    let content = subtitle_processor::decode_text(bytes);
    let records: Vec<JsonRecord> = match serde_json::from_str(&content) {
        Ok(records) => records,
        Err(e) => {
            warn!("Invalid JSON caption data: {}", e);
            return serializer::error_document(format, &RenderError::Json(e.to_string()));
        }
    };

    let tokens: Result<Vec<TimedToken>, RenderError> = records.iter().map(serializer::token_from_record).collect();
    match tokens {
        Ok(tokens) => serializer::render(&tokens, format, options.grouped),
        Err(e) => {
            warn!("Invalid JSON caption record: {}", e);
            serializer::error_document(format, &e)
        }
    }
}
