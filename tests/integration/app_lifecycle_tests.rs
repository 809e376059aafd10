/*!
 * Integration tests for folder runs, conversion and timing optimization
 */

use anyhow::Result;
use std::fs;
use srt_highlighter::app_config::Config;
use srt_highlighter::app_controller::{Controller, FolderSummary};
use srt_highlighter::converter::SubtitleFormat;
use srt_highlighter::subtitle_processor::SubtitleCollection;
use crate::common;

/// Test processing a folder, then re-running it without force
#[test]
fn test_run_folder_withSeveralFiles_shouldProcessThenSkip() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("s01");
    fs::create_dir_all(&nested)?;
    common::create_test_subtitle(temp_dir.path(), "e01.srt")?;
    common::create_test_subtitle(&nested, "e02.srt")?;

    let controller = Controller::with_config(Config::default())?;

    let first = controller.run_folder(temp_dir.path().to_path_buf(), false)?;
    assert_eq!(
        first,
        FolderSummary {
            processed: 2,
            skipped: 0,
            failed: 0
        }
    );
    assert!(temp_dir.path().join("e01.highlighted.srt").exists());
    assert!(nested.join("e02.highlighted.srt").exists());

    // previous outputs are not treated as inputs
    let second = controller.run_folder(temp_dir.path().to_path_buf(), false)?;
    assert_eq!(second.processed, 0);
    assert_eq!(second.skipped, 2);

    let forced = controller.run_folder(temp_dir.path().to_path_buf(), true)?;
    assert_eq!(forced.processed, 2);
    Ok(())
}

/// Test that a folder without subtitles is an error
#[test]
fn test_run_folder_withNoSubtitles_shouldFail() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "readme.txt", "nothing here")?;
    let controller = Controller::with_config(Config::default())?;
    assert!(controller.run_folder(temp_dir.path().to_path_buf(), false).is_err());
    Ok(())
}

/// Test converting SRT to VTT and back through files
#[test]
fn test_convert_srtToVttAndBack_shouldPreserveCaptions() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "talk.srt")?;
    let controller = Controller::with_config(Config::default())?;

    let vtt = controller.convert(&input, SubtitleFormat::Vtt, None, None, false)?.unwrap();
    assert_eq!(vtt, temp_dir.path().join("talk.converted.vtt"));

    let back_path = temp_dir.path().join("back.srt");
    controller.convert(&vtt, SubtitleFormat::Srt, None, Some(back_path.clone()), false)?;

    let original = SubtitleCollection::from_srt_file(&input)?;
    let back = SubtitleCollection::from_srt_file(&back_path)?;
    assert_eq!(back.blocks, original.blocks);
    Ok(())
}

/// Test a highlighted JSON file converted back to SRT
#[test]
fn test_convert_highlightedJson_shouldProduceStyledSrt() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "talk.srt")?;

    let json_controller = Controller::with_config(common::config_with_format("json"))?;
    let json_path = json_controller.run(input, temp_dir.path().to_path_buf(), false)?.unwrap();

    let controller = Controller::with_config(Config::default())?;
    let srt_path = controller
        .convert(&json_path, SubtitleFormat::Srt, Some(SubtitleFormat::Json), None, false)?
        .unwrap();

    let content = fs::read_to_string(&srt_path)?;
    assert!(content.starts_with("1\n00:00:01,000 --> "));
    assert!(content.contains("<font color="));
    assert!(content.contains("📱"));
    Ok(())
}

/// Test that an undefined conversion pair is reported and nothing is written
#[test]
fn test_convert_withUnsupportedPair_shouldFailWithoutOutput() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "talk.srt")?;
    let controller = Controller::with_config(Config::default())?;

    let result = controller.convert(&input, SubtitleFormat::Json, None, None, false);
    assert!(result.is_err());
    assert!(!temp_dir.path().join("talk.converted.json").exists());
    Ok(())
}

/// Test timing optimization of a caption file
#[test]
fn test_optimize_withShortAndOverlappingCaptions_shouldAdjustEnds() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(
        temp_dir.path(),
        "timing.srt",
        "1\n00:00:00,000 --> 00:00:00,200\nquick\n\n2\n00:00:00,500 --> 00:00:20,000\nvery long caption\n\n3\n00:00:10,000 --> 00:00:12,000\nlast\n",
    )?;
    let controller = Controller::with_config(Config::default())?;

    let output = controller.optimize(&input, None, false)?.unwrap();
    assert_eq!(output, temp_dir.path().join("timing.optimized.srt"));

    let blocks = SubtitleCollection::from_srt_file(&output)?.blocks;
    let ends: Vec<u64> = blocks.iter().map(|b| b.end_ms).collect();
    // min gap before the next start wins over the min duration
    assert_eq!(ends, vec![400, 7_500, 12_000]);
    assert!(controller.check(&output)?.is_empty());
    Ok(())
}
