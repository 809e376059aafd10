/*!
 * Tests for tokenization, timing allocation, analysis and grouping
 */

use srt_highlighter::analysis::{self, AnalysisOptions, CategoryConfig, ImportanceScorer, KeywordScorer};
use srt_highlighter::grouping;
use srt_highlighter::styling::{self, StyleOverrides, StyleResolver};
use srt_highlighter::subtitle_processor::CaptionBlock;
use srt_highlighter::word_timing::{self, TimedToken};

fn analyzed(text: &str) -> Vec<TimedToken> {
    let block = CaptionBlock::new(1, 0, 10_000, text);
    let mut tokens = word_timing::allocate_word_timings(&block);
    KeywordScorer::for_language("en").analyze(&mut tokens, &CategoryConfig::default(), &AnalysisOptions::default());
    tokens
}

/// Test that allocation covers the block exactly with contiguous tokens
#[test]
fn test_allocate_word_timings_withUnevenDivision_shouldCoverBlockExactly() {
    let block = CaptionBlock::new(3, 1_000, 2_000, "one two three");
    let tokens = word_timing::allocate_word_timings(&block);

    let spans: Vec<(u64, u64)> = tokens.iter().map(|t| (t.start_ms, t.end_ms)).collect();
    assert_eq!(spans, vec![(1_000, 1_333), (1_333, 1_666), (1_666, 2_000)]);
    assert!(tokens.iter().all(|t| t.source_index == 3));
}

/// Test that punctuation becomes its own token
#[test]
fn test_allocate_word_timings_withPunctuation_shouldTimePunctuation() {
    let block = CaptionBlock::new(1, 0, 4_000, "Stop, now!");
    let tokens = word_timing::allocate_word_timings(&block);

    let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["Stop", ",", "now", "!"]);
    assert_eq!(tokens[1].start_ms, 1_000);
    assert_eq!(tokens[3].end_ms, 4_000);
}

/// Test that a zero-length block yields zero-length tokens
#[test]
fn test_allocate_word_timings_withZeroDuration_shouldCollapseTokens() {
    let block = CaptionBlock::new(1, 5_000, 5_000, "a b");
    let tokens = word_timing::allocate_word_timings(&block);
    assert!(tokens.iter().all(|t| t.start_ms == 5_000 && t.end_ms == 5_000));
}

/// Test that markup-only captions produce no tokens
#[test]
fn test_allocate_word_timings_withOnlyMarkup_shouldBeEmpty() {
    let block = CaptionBlock::new(1, 0, 1_000, "<i></i> {\\an8}");
    assert!(word_timing::allocate_word_timings(&block).is_empty());
}

/// Test that inverted blocks are skipped when allocating a file
#[test]
fn test_allocate_blocks_withInvertedBlock_shouldSkipIt() {
    let blocks = vec![
        CaptionBlock::new(1, 0, 1_000, "kept"),
        CaptionBlock::new(2, 3_000, 2_000, "dropped"),
        CaptionBlock::new(3, 4_000, 5_000, "also kept"),
    ];
    let tokens = word_timing::allocate_blocks(&blocks);

    let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["kept", "also", "kept"]);
}

/// Test direct keyword icons and related context icons
#[test]
fn test_keyword_scorer_withCategoryWords_shouldAttachIcons() {
    let tokens = analyzed("My mother is happy today.");
    let mother = &tokens[1];

    assert_eq!(mother.categories, vec!["person"]);
    assert_eq!(mother.primary_icon, "👩");
    assert_eq!(mother.secondary_icons, vec!["😊", "📅"]);

    let happy = &tokens[3];
    assert_eq!(happy.categories, vec!["emotion"]);
    assert_eq!(happy.primary_icon, "😊");
}

/// Test that a capitalized word away from the start counts as important
#[test]
fn test_keyword_scorer_withProperNoun_shouldMarkImportant() {
    let tokens = analyzed("we went to Paris");
    let paris = tokens.iter().find(|t| t.text == "Paris").unwrap();
    let to = tokens.iter().find(|t| t.text == "to").unwrap();

    assert!(paris.important);
    assert!(paris.importance >= 0.5);
    assert!(!to.important);
}

/// Test that scoring never changes timings
#[test]
fn test_keyword_scorer_shouldLeaveTimingUntouched() {
    let block = CaptionBlock::new(1, 0, 3_000, "The family walks home");
    let before = word_timing::allocate_word_timings(&block);
    let mut after = before.clone();
    KeywordScorer::for_language("en").analyze(&mut after, &CategoryConfig::default(), &AnalysisOptions::default());

    for (a, b) in before.iter().zip(&after) {
        assert_eq!((a.start_ms, a.end_ms, &a.text), (b.start_ms, b.end_ms, &b.text));
    }
}

/// Test that icons are dropped when emojis are disabled
#[test]
fn test_keyword_scorer_withEmojisDisabled_shouldClearIcons() {
    let block = CaptionBlock::new(1, 0, 1_000, "mom");
    let mut tokens = word_timing::allocate_word_timings(&block);
    let options = AnalysisOptions {
        use_emojis: false,
        ..AnalysisOptions::default()
    };
    KeywordScorer::for_language("en").analyze(&mut tokens, &CategoryConfig::default(), &options);

    assert_eq!(tokens[0].categories, vec!["person"]);
    assert!(tokens[0].primary_icon.is_empty());
    assert!(tokens[0].secondary_icons.is_empty());
}

/// Test that equivalent language codes share one cached scorer
#[test]
fn test_scorer_for_language_withEquivalentCodes_shouldShareInstance() {
    let a = analysis::scorer_for_language("en");
    let b = analysis::scorer_for_language("eng");
    assert!(std::sync::Arc::ptr_eq(&a, &b));
    assert_eq!(a.name(), "keyword");
}

/// Test that color overrides replace category and important colors
#[test]
fn test_style_resolver_withOverrides_shouldReplaceColors() {
    let overrides = StyleOverrides {
        primary_color: Some("#123456".to_string()),
        secondary_color: Some("#ABCDEF".to_string()),
    };
    let resolver = StyleResolver::new(&CategoryConfig::default(), Some(&overrides), true);

    assert_eq!(resolver.resolve(true, &[]).color, "#123456");
    assert_eq!(resolver.resolve(true, &["place".to_string()]).color, "#ABCDEF");
    assert_eq!(resolver.resolve(false, &["place".to_string()]).color, "#000000");
}

/// Test that apply_style fills in every token
#[test]
fn test_apply_style_shouldStyleEveryToken() {
    let tokens = analyzed("Run to the park");
    let resolver = StyleResolver::new(&CategoryConfig::default(), None, true);
    let styled = styling::apply_style(tokens, &resolver);
    assert!(styled.iter().all(|t| t.style.is_some()));
}

/// Test grouping of tokens that share a start time
#[test]
fn test_group_tokens_withSharedStarts_shouldMergeAndChainEnds() {
    let tokens = vec![
        TimedToken::new(1, 0, 300, "a"),
        TimedToken::new(1, 0, 300, "b"),
        TimedToken::new(1, 0, 300, "c"),
        TimedToken::new(2, 1_000, 1_400, "d"),
    ];
    let groups = grouping::group_tokens(&tokens, true);

    assert_eq!(groups.len(), 2);
    assert_eq!((groups[0].start_ms, groups[0].end_ms), (0, 1_000));
    assert_eq!(groups[0].plain_text(), "a b c");
    assert_eq!((groups[1].start_ms, groups[1].end_ms), (1_000, 1_400));

    let ungrouped = grouping::group_tokens(&tokens, false);
    assert_eq!(ungrouped.len(), 4);
    assert_eq!(ungrouped[0].end_ms, 300);
}
