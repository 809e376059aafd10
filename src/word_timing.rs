/*!
 * Word-level timing.
 *
 * Splits caption text into tokens (word runs and standalone punctuation)
 * and spreads the caption's duration evenly across them. Equal division is
 * a heuristic with no acoustic grounding; it is kept as-is so that output
 * timings stay stable between releases.
 */

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::ParseError;
use crate::styling::StyleDescriptor;
use crate::subtitle_processor::{self, CaptionBlock};

/// HTML-like tags (`<i>`, `<font color=..>`) and ASS override blocks (`{\b1}`)
static MARKUP_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>|\{\\[^}]*\}").unwrap());

/// Maximal word runs or one of `. , ! ? ;`
static TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+|[.,!?;]").unwrap());

/// A token with its own time interval and, once analyzed, its style
#[derive(Debug, Clone, PartialEq)]
pub struct TimedToken {
    /// Index of the caption block the token came from
    pub source_index: u32,
    /// Start time in ms
    pub start_ms: u64,
    /// End time in ms
    pub end_ms: u64,
    /// Token text
    pub text: String,
    /// Importance score in `[0, 1]`
    pub importance: f32,
    /// Whether `importance` reached the configured threshold
    pub important: bool,
    /// Matched category names, first match first
    pub categories: Vec<String>,
    /// Most relevant icon, empty when none
    pub primary_icon: String,
    /// Up to two further icons
    pub secondary_icons: Vec<String>,
    /// Resolved style; `None` until styling ran
    pub style: Option<StyleDescriptor>,
}

impl TimedToken {
    /// Create an unscored, unstyled token
    pub fn new(source_index: u32, start_ms: u64, end_ms: u64, text: impl Into<String>) -> Self {
        TimedToken {
            source_index,
            start_ms,
            end_ms,
            text: text.into(),
            importance: 0.0,
            important: false,
            categories: Vec::new(),
            primary_icon: String::new(),
            secondary_icons: Vec::new(),
            style: None,
        }
    }

    /// Attach a style
    pub fn with_style(mut self, style: StyleDescriptor) -> Self {
        self.style = Some(style);
        self
    }

    pub fn duration_ms(&self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }
}

/// Remove tags and override blocks, then collapse whitespace
pub fn strip_markup(text: &str) -> String {
    let stripped = MARKUP_REGEX.replace_all(text, "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split caption text into tokens in left-to-right order
pub fn tokenize(text: &str) -> Vec<String> {
    let clean = strip_markup(text);
    TOKEN_REGEX
        .find_iter(&clean)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Give each token of the block an equal share of its duration.
///
/// Token `i` of `n` spans `[start + i*D/n, start + (i+1)*D/n)` floored to
/// whole milliseconds, so consecutive tokens share their boundary and the
/// last one ends exactly at `block.end_ms`. An inverted block is treated as
/// zero-length.
pub fn allocate_word_timings(block: &CaptionBlock) -> Vec<TimedToken> {
    let tokens = tokenize(&block.text);
    if tokens.is_empty() {
        debug!("Caption {} has no tokens after cleaning", block.index);
        return Vec::new();
    }

    let count = tokens.len() as u128;
    let duration = block.duration_ms() as u128;
    let boundary = |k: usize| block.start_ms + ((k as u128 * duration) / count) as u64;

    tokens
        .into_iter()
        .enumerate()
        .map(|(i, text)| TimedToken::new(block.index, boundary(i), boundary(i + 1), text))
        .collect()
}

/// Allocate every block in order
pub fn allocate_blocks(blocks: &[CaptionBlock]) -> Vec<TimedToken> {
    blocks
        .iter()
        .filter(|block| match block.validate() {
            Ok(()) => true,
            Err(e) => {
                warn!("Skipping caption: {}", e);
                false
            }
        })
        .flat_map(allocate_word_timings)
        .collect()
}

/// Parse SRT bytes and allocate word timings in one step.
///
/// Shares tokenization and allocation with [`allocate_word_timings`]; blocks
/// with an inverted time range are skipped here.
pub fn parse_timed_tokens(bytes: &[u8]) -> Result<Vec<TimedToken>, ParseError> {
    let blocks = subtitle_processor::parse_captions(bytes)?;
    Ok(allocate_blocks(&blocks))
}
