use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, warn};

use crate::errors::ParseError;
use crate::file_utils::FileManager;
use crate::timecode::{self, TimecodeStyle};

// @module: Caption file reading and writing

// @const: Separator between start and end timecodes
const ARROW: &str = "-->";

/// Single indexed, timestamped caption entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionBlock {
    // @field: Index declared in the source file
    pub index: u32,

    // @field: Start time in ms
    pub start_ms: u64,

    // @field: End time in ms
    pub end_ms: u64,

    // @field: Text lines joined with a single space
    pub text: String,

    // @field: Text lines as they appeared in the file
    pub lines: Vec<String>,
}

impl CaptionBlock {
    /// Create a block from already-joined text; each `\n` starts a new line
    pub fn new(index: u32, start_ms: u64, end_ms: u64, text: &str) -> Self {
        let lines: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();
        Self::from_lines(index, start_ms, end_ms, lines)
    }

    /// Create a block from its individual text lines
    pub fn from_lines(index: u32, start_ms: u64, end_ms: u64, lines: Vec<String>) -> Self {
        CaptionBlock {
            index,
            start_ms,
            end_ms,
            text: lines.join(" "),
            lines,
        }
    }

    /// Duration of the block, zero for an inverted range
    pub fn duration_ms(&self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }

    /// Check the `end >= start` invariant.
    ///
    /// The parser never fixes inverted ranges; callers decide what to do.
    pub fn validate(&self) -> Result<(), ParseError> {
        if self.end_ms < self.start_ms {
            return Err(ParseError::MalformedBlock {
                index: self.index,
                line: 0,
                reason: format!(
                    "end time {} precedes start time {}",
                    timecode::format_srt(self.end_ms),
                    timecode::format_srt(self.start_ms)
                ),
            });
        }
        Ok(())
    }

    /// Start time as an SRT timecode
    pub fn format_start_time(&self) -> String {
        timecode::format_srt(self.start_ms)
    }

    /// End time as an SRT timecode
    pub fn format_end_time(&self) -> String {
        timecode::format_srt(self.end_ms)
    }
}

impl fmt::Display for CaptionBlock {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.index)?;
        writeln!(f, "{} --> {}", self.format_start_time(), self.format_end_time())?;
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        writeln!(f)
    }
}

/// Collection of caption blocks read from one file
#[derive(Debug)]
pub struct SubtitleCollection {
    /// Source filename
    pub source_file: PathBuf,

    /// Caption blocks in file order
    pub blocks: Vec<CaptionBlock>,
}

impl SubtitleCollection {
    /// Create an empty collection
    pub fn new(source_file: PathBuf) -> Self {
        SubtitleCollection {
            source_file,
            blocks: Vec::new(),
        }
    }

    /// Read and parse an SRT file
    pub fn from_srt_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = FileManager::read_bytes(path)?;
        let blocks = parse_captions(&bytes)
            .with_context(|| format!("Failed to parse subtitle file: {}", path.display()))?;

        Ok(SubtitleCollection {
            source_file: path.to_path_buf(),
            blocks,
        })
    }

    /// Write the blocks out as SRT with sequential indices
    pub fn write_to_srt<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        FileManager::write_atomic(path, self.to_srt_string().as_bytes())
            .with_context(|| format!("Failed to write subtitle file: {}", path.display()))
    }

    /// Render the blocks as an SRT document
    pub fn to_srt_string(&self) -> String {
        blocks_to_srt(&self.blocks)
    }
}

impl fmt::Display for SubtitleCollection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Subtitle Collection")?;
        writeln!(f, "Source: {:?}", self.source_file)?;
        writeln!(f, "Blocks: {}", self.blocks.len())?;
        Ok(())
    }
}

/// Decode raw file bytes, tolerating invalid UTF-8 and a leading BOM
pub fn decode_text(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    text.strip_prefix('\u{feff}').unwrap_or(&text).to_string()
}

// @state: Caption parser states
enum ParserState {
    ExpectIndex,
    ExpectTimecodeLine {
        index: u32,
    },
    CollectTextLines {
        index: u32,
        start_ms: u64,
        end_ms: u64,
        lines: Vec<String>,
    },
}

/// Parse SRT bytes into caption blocks.
///
/// Malformed blocks are logged and skipped; the parse only fails when no
/// block at all survives.
pub fn parse_captions(bytes: &[u8]) -> Result<Vec<CaptionBlock>, ParseError> {
    let content = decode_text(bytes);
    let mut blocks = Vec::new();
    let mut state = ParserState::ExpectIndex;

    for (line_idx, raw_line) in content.lines().enumerate() {
        let line_no = line_idx + 1;
        let trimmed = raw_line.trim();

        state = match state {
            ParserState::ExpectIndex => {
                if is_index_line(trimmed) {
                    match trimmed.parse::<u32>() {
                        Ok(index) => ParserState::ExpectTimecodeLine { index },
                        Err(e) => {
                            warn!("Ignoring index '{}' at line {}: {}", trimmed, line_no, e);
                            ParserState::ExpectIndex
                        }
                    }
                } else {
                    if !trimmed.is_empty() {
                        debug!("Skipping stray line {}: {}", line_no, trimmed);
                    }
                    ParserState::ExpectIndex
                }
            }
            ParserState::ExpectTimecodeLine { index } => match parse_timing_line(trimmed) {
                Ok((start_ms, end_ms)) => ParserState::CollectTextLines {
                    index,
                    start_ms,
                    end_ms,
                    lines: Vec::new(),
                },
                Err(reason) => {
                    let err = ParseError::MalformedBlock {
                        index,
                        line: line_no,
                        reason,
                    };
                    warn!("Skipping caption: {}", err);
                    ParserState::ExpectIndex
                }
            },
            ParserState::CollectTextLines {
                index,
                start_ms,
                end_ms,
                mut lines,
            } => {
                if trimmed.is_empty() {
                    finish_block(&mut blocks, index, start_ms, end_ms, lines, line_no);
                    ParserState::ExpectIndex
                } else {
                    lines.push(trimmed.to_string());
                    ParserState::CollectTextLines {
                        index,
                        start_ms,
                        end_ms,
                        lines,
                    }
                }
            }
        };
    }

    // The trailing block does not need a blank line
    match state {
        ParserState::CollectTextLines {
            index,
            start_ms,
            end_ms,
            lines,
        } => {
            let line_no = content.lines().count();
            finish_block(&mut blocks, index, start_ms, end_ms, lines, line_no);
        }
        ParserState::ExpectTimecodeLine { index } => {
            warn!("Caption {} ends before its timecode line", index);
        }
        ParserState::ExpectIndex => {}
    }

    if blocks.is_empty() {
        warn!("No valid caption blocks found in content");
        return Err(ParseError::NoCaptions);
    }

    debug!("Parsed {} caption blocks", blocks.len());
    Ok(blocks)
}

/// Parse WebVTT bytes into caption blocks.
///
/// VTT has no native index, cues are numbered sequentially from 1.
/// Cue identifiers, `NOTE`, `STYLE` and `REGION` blocks are ignored.
pub fn parse_vtt_captions(bytes: &[u8]) -> Result<Vec<CaptionBlock>, ParseError> {
    let content = decode_text(bytes);
    let mut blocks = Vec::new();
    let mut chunk: Vec<(usize, &str)> = Vec::new();
    let mut header_seen = false;

    let mut lines = content.lines().enumerate().peekable();
    while let Some((line_idx, raw_line)) = lines.next() {
        let trimmed = raw_line.trim();
        if !trimmed.is_empty() {
            chunk.push((line_idx + 1, trimmed));
        }
        let at_end = lines.peek().is_none();
        if (trimmed.is_empty() || at_end) && !chunk.is_empty() {
            let mut cue_lines = chunk.as_slice();
            if !header_seen {
                header_seen = true;
                if chunk[0].1.starts_with("WEBVTT") {
                    // header metadata runs until the first timing line
                    let header_len = chunk
                        .iter()
                        .position(|(_, l)| l.contains(ARROW))
                        .unwrap_or(chunk.len());
                    cue_lines = &chunk[header_len..];
                } else {
                    warn!("WebVTT input is missing its WEBVTT header");
                }
            }
            if cue_lines.is_empty() {
                chunk.clear();
                continue;
            }
            if let Some(block) = vtt_cue(cue_lines, blocks.len() as u32 + 1) {
                blocks.push(block);
            }
            chunk.clear();
        }
    }

    if blocks.is_empty() {
        warn!("No valid cues found in WebVTT content");
        return Err(ParseError::NoCaptions);
    }

    Ok(blocks)
}

fn vtt_cue(chunk: &[(usize, &str)], index: u32) -> Option<CaptionBlock> {
    let (first_line, first) = chunk[0];
    if first.starts_with("NOTE") || first.starts_with("STYLE") || first.starts_with("REGION") {
        return None;
    }

    let Some(timing_pos) = chunk.iter().position(|(_, l)| l.contains(ARROW)) else {
        warn!("Skipping WebVTT block at line {}: no timing line", first_line);
        return None;
    };

    let (line_no, timing) = chunk[timing_pos];
    match parse_vtt_timing_line(timing) {
        Ok((start_ms, end_ms)) => {
            let lines = chunk[timing_pos + 1..].iter().map(|(_, l)| l.to_string()).collect();
            Some(CaptionBlock::from_lines(index, start_ms, end_ms, lines))
        }
        Err(reason) => {
            let err = ParseError::MalformedBlock {
                index,
                line: line_no,
                reason,
            };
            warn!("Skipping cue: {}", err);
            None
        }
    }
}

fn finish_block(
    blocks: &mut Vec<CaptionBlock>,
    index: u32,
    start_ms: u64,
    end_ms: u64,
    lines: Vec<String>,
    line_no: usize,
) {
    if lines.is_empty() {
        let err = ParseError::MalformedBlock {
            index,
            line: line_no,
            reason: "caption has no text".to_string(),
        };
        warn!("Skipping caption: {}", err);
        return;
    }

    let block = CaptionBlock::from_lines(index, start_ms, end_ms, lines);
    if let Err(e) = block.validate() {
        debug!("Keeping caption with inverted range: {}", e);
    }
    blocks.push(block);
}

fn is_index_line(line: &str) -> bool {
    !line.is_empty() && line.bytes().all(|b| b.is_ascii_digit())
}

/// Parse a `<start> --> <end>` line with SRT or VTT timecodes
fn parse_timing_line(line: &str) -> Result<(u64, u64), String> {
    let (start, end) = line
        .split_once(ARROW)
        .ok_or_else(|| format!("expected '<start> --> <end>', got '{}'", line))?;

    // cue settings may follow the end timecode
    let end = end.split_whitespace().next().unwrap_or("");

    let start_ms = timecode::parse_timecode(start).map_err(|e| e.to_string())?;
    let end_ms = timecode::parse_timecode(end).map_err(|e| e.to_string())?;
    Ok((start_ms, end_ms))
}

/// WebVTT allows the hour field to be omitted
fn parse_vtt_timing_line(line: &str) -> Result<(u64, u64), String> {
    let (start, end) = line
        .split_once(ARROW)
        .ok_or_else(|| format!("expected '<start> --> <end>', got '{}'", line))?;
    let end = end.split_whitespace().next().unwrap_or("");
    Ok((parse_vtt_timestamp(start)?, parse_vtt_timestamp(end)?))
}

fn parse_vtt_timestamp(value: &str) -> Result<u64, String> {
    let value = value.trim();
    let full = if value.matches(':').count() == 1 {
        format!("00:{}", value)
    } else {
        value.to_string()
    };
    timecode::parse_timecode(&full).map_err(|e| e.to_string())
}

/// Render blocks as an SRT document with sequential indices
pub fn blocks_to_srt(blocks: &[CaptionBlock]) -> String {
    let mut out = String::new();
    for (i, block) in blocks.iter().enumerate() {
        out.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            i + 1,
            timecode::format_timecode(block.start_ms, TimecodeStyle::Srt),
            timecode::format_timecode(block.end_ms, TimecodeStyle::Srt),
            block.lines.join("\n")
        ));
    }
    out
}
