/*!
 * Caption statistics: timing totals and word frequencies.
 */

use std::collections::{HashMap, HashSet};
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::subtitle_processor::CaptionBlock;
use crate::timecode;

static WORD_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").unwrap());

/// Number of entries kept in `top_words` by default
pub const DEFAULT_TOP_WORDS: usize = 10;

/// Summary of a caption sequence
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleStatistics {
    pub caption_count: usize,
    /// Sum of caption durations; inverted captions count as zero
    pub total_duration_ms: u64,
    pub word_count: usize,
    pub unique_word_count: usize,
    pub avg_words_per_caption: f64,
    pub avg_duration_ms: f64,
    /// Most frequent lowercase words, ties in alphabetical order
    pub top_words: Vec<(String, usize)>,
}

impl SubtitleStatistics {
    pub fn from_blocks(blocks: &[CaptionBlock]) -> Self {
        Self::from_blocks_with_top(blocks, DEFAULT_TOP_WORDS)
    }

    pub fn from_blocks_with_top(blocks: &[CaptionBlock], top_n: usize) -> Self {
        let mut total_duration_ms = 0u64;
        let mut word_count = 0usize;
        let mut unique: HashSet<String> = HashSet::new();
        let mut frequency: HashMap<String, usize> = HashMap::new();

        for block in blocks {
            total_duration_ms = total_duration_ms.saturating_add(block.duration_ms());
            let lower = block.text.to_lowercase();
            for word in WORD_REGEX.find_iter(&lower) {
                word_count += 1;
                unique.insert(word.as_str().to_string());
                *frequency.entry(word.as_str().to_string()).or_insert(0) += 1;
            }
        }

        let mut top_words: Vec<(String, usize)> = frequency.into_iter().collect();
        top_words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        top_words.truncate(top_n);

        let count = blocks.len();
        let (avg_words_per_caption, avg_duration_ms) = if count > 0 {
            (word_count as f64 / count as f64, total_duration_ms as f64 / count as f64)
        } else {
            (0.0, 0.0)
        };

        SubtitleStatistics {
            caption_count: count,
            total_duration_ms,
            word_count,
            unique_word_count: unique.len(),
            avg_words_per_caption,
            avg_duration_ms,
            top_words,
        }
    }
}

impl fmt::Display for SubtitleStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Captions:              {}", self.caption_count)?;
        writeln!(f, "Total duration:        {}", timecode::format_srt(self.total_duration_ms))?;
        writeln!(f, "Words:                 {}", self.word_count)?;
        writeln!(f, "Unique words:          {}", self.unique_word_count)?;
        writeln!(f, "Avg words per caption: {:.2}", self.avg_words_per_caption)?;
        writeln!(f, "Avg caption duration:  {:.0}ms", self.avg_duration_ms)?;
        if !self.top_words.is_empty() {
            writeln!(f, "Top words:")?;
            for (word, count) in &self.top_words {
                writeln!(f, "  {:<20} {}", word, count)?;
            }
        }
        Ok(())
    }
}
