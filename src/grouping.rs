/*!
 * Output grouping.
 *
 * Ungrouped output emits one cue per token. Grouped output merges tokens
 * that share the same textual start time (SRT layout, millisecond
 * precision) into one cue whose end is the start of the next group, or the
 * latest end among its own tokens for the final group.
 */

use std::collections::BTreeMap;

use crate::timecode;
use crate::word_timing::TimedToken;

/// One emitted cue
#[derive(Debug, Clone, PartialEq)]
pub struct OutputGroup<'a> {
    pub start_ms: u64,
    pub end_ms: u64,
    pub tokens: Vec<&'a TimedToken>,
}

impl OutputGroup<'_> {
    /// Token texts joined by single spaces
    pub fn plain_text(&self) -> String {
        self.tokens
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Split tokens into output groups
pub fn group_tokens(tokens: &[TimedToken], grouped: bool) -> Vec<OutputGroup<'_>> {
    if !grouped {
        return tokens
            .iter()
            .map(|t| OutputGroup {
                start_ms: t.start_ms,
                end_ms: t.end_ms,
                tokens: vec![t],
            })
            .collect();
    }

    // keyed by the formatted start so equal keys mean equal printed starts
    let mut buckets: BTreeMap<String, (u64, Vec<&TimedToken>)> = BTreeMap::new();
    for token in tokens {
        buckets
            .entry(timecode::format_srt(token.start_ms))
            .or_insert_with(|| (token.start_ms, Vec::new()))
            .1
            .push(token);
    }

    let starts: Vec<u64> = buckets.values().map(|(start, _)| *start).collect();

    buckets
        .into_values()
        .enumerate()
        .map(|(i, (start_ms, members))| {
            // overlapping captions and unsorted records can end the input on an earlier bucket
            let end_ms = starts.get(i + 1).copied().unwrap_or_else(|| {
                members.iter().map(|t| t.end_ms).max().unwrap_or(start_ms).max(start_ms)
            });
            OutputGroup {
                start_ms,
                end_ms,
                tokens: members,
            }
        })
        .collect()
}
