/*!
 * Readability timing optimizer.
 *
 * Stretches captions that are too short, caps captions that are too long
 * and keeps a minimum gap before the next caption. Start times never move.
 */

use log::debug;

use crate::subtitle_processor::CaptionBlock;

/// Timing limits applied by [`TimingOptimizer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimingOptimizerConfig {
    pub min_duration_ms: u64,
    pub max_duration_ms: u64,
    pub min_gap_ms: u64,
}

impl Default for TimingOptimizerConfig {
    fn default() -> Self {
        Self {
            min_duration_ms: 1_000,
            max_duration_ms: 7_000,
            min_gap_ms: 100,
        }
    }
}

/// Adjusts caption end times for readability
#[derive(Debug, Clone, Default)]
pub struct TimingOptimizer {
    config: TimingOptimizerConfig,
}

impl TimingOptimizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TimingOptimizerConfig) -> Self {
        Self { config }
    }

    /// Return the blocks with adjusted end times.
    ///
    /// The gap rule wins over the minimum duration, but an end time is
    /// never pulled before its own start.
    pub fn optimize(&self, blocks: &[CaptionBlock]) -> Vec<CaptionBlock> {
        let mut adjusted = 0usize;
        let optimized: Vec<CaptionBlock> = blocks
            .iter()
            .enumerate()
            .map(|(i, block)| {
                let mut end_ms = block.end_ms;

                if end_ms < block.start_ms || end_ms - block.start_ms < self.config.min_duration_ms {
                    end_ms = block.start_ms.saturating_add(self.config.min_duration_ms);
                }
                if end_ms - block.start_ms > self.config.max_duration_ms {
                    end_ms = block.start_ms.saturating_add(self.config.max_duration_ms);
                }
                if let Some(next) = blocks.get(i + 1) {
                    let latest_end = next.start_ms.saturating_sub(self.config.min_gap_ms);
                    if end_ms > latest_end {
                        end_ms = latest_end.max(block.start_ms);
                    }
                }

                if end_ms != block.end_ms {
                    adjusted += 1;
                }
                let mut out = block.clone();
                out.end_ms = end_ms;
                out
            })
            .collect();

        debug!("Timing optimizer adjusted {} of {} captions", adjusted, blocks.len());
        optimized
    }
}
