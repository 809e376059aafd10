/*!
 * Caption error checking.
 *
 * Reports structural problems in a caption sequence:
 * - Negative durations (end before start)
 * - Overlaps with the following caption
 * - Captions without text
 * - Captions with too many words to read comfortably
 */

use std::fmt;

use log::debug;

use crate::subtitle_processor::CaptionBlock;

/// Generally accepted maximum number of words per caption
pub const DEFAULT_MAX_WORDS_PER_CAPTION: usize = 15;

/// Kind of problem found in a caption
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaptionIssueKind {
    NegativeDuration,
    Overlap,
    EmptyText,
    TooLong,
}

impl CaptionIssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NegativeDuration => "negative_duration",
            Self::Overlap => "overlap",
            Self::EmptyText => "empty_text",
            Self::TooLong => "too_long",
        }
    }
}

impl fmt::Display for CaptionIssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One problem, attached to a 1-based caption position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionIssue {
    pub kind: CaptionIssueKind,
    pub position: usize,
    pub message: String,
}

impl fmt::Display for CaptionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

/// Configuration for the caption checker
#[derive(Debug, Clone)]
pub struct CaptionCheckerConfig {
    /// Captions with more whitespace-separated words are reported
    pub max_words_per_caption: usize,
}

impl Default for CaptionCheckerConfig {
    fn default() -> Self {
        Self {
            max_words_per_caption: DEFAULT_MAX_WORDS_PER_CAPTION,
        }
    }
}

/// Checker for caption sequences
#[derive(Debug, Clone, Default)]
pub struct CaptionChecker {
    config: CaptionCheckerConfig,
}

impl CaptionChecker {
    /// Create a checker with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a checker with a custom configuration
    pub fn with_config(config: CaptionCheckerConfig) -> Self {
        Self { config }
    }

    /// Check a caption sequence in file order
    pub fn check(&self, blocks: &[CaptionBlock]) -> Vec<CaptionIssue> {
        let mut issues = Vec::new();

        for (i, block) in blocks.iter().enumerate() {
            let position = i + 1;

            if block.end_ms < block.start_ms {
                issues.push(CaptionIssue {
                    kind: CaptionIssueKind::NegativeDuration,
                    position,
                    message: format!(
                        "Negative duration at subtitle {} ({}ms -> {}ms)",
                        position, block.start_ms, block.end_ms
                    ),
                });
            }

            if let Some(next) = blocks.get(i + 1) {
                if block.end_ms > next.start_ms {
                    issues.push(CaptionIssue {
                        kind: CaptionIssueKind::Overlap,
                        position,
                        message: format!(
                            "Overlap between subtitles {} and {} by {}ms",
                            position,
                            position + 1,
                            block.end_ms - next.start_ms
                        ),
                    });
                }
            }

            if block.text.trim().is_empty() {
                issues.push(CaptionIssue {
                    kind: CaptionIssueKind::EmptyText,
                    position,
                    message: format!("Empty text at subtitle {}", position),
                });
            }

            let words = block.text.split_whitespace().count();
            if words > self.config.max_words_per_caption {
                issues.push(CaptionIssue {
                    kind: CaptionIssueKind::TooLong,
                    position,
                    message: format!("Too many words ({}) at subtitle {}", words, position),
                });
            }
        }

        debug!("Caption check: {} captions, {} issues", blocks.len(), issues.len());
        issues
    }
}
