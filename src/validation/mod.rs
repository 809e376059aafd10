/*!
 * Validation of caption sequences.
 *
 * - `captions`: reports negative durations, overlaps, empty captions and
 *   overly long captions
 */

pub mod captions;

// Re-export main types
pub use captions::{CaptionChecker, CaptionCheckerConfig, CaptionIssue, CaptionIssueKind};
