/*!
 * Tests for file and directory utilities
 */

use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use srt_highlighter::converter::SubtitleFormat;
use srt_highlighter::file_utils::{FileManager, FileType};
use crate::common;

/// Test output path generation
#[test]
fn test_generate_output_path_withVariousInputs_shouldInsertSuffix() {
    let cases = [
        ("movie.srt", "out", "highlighted", "ass", "out/movie.highlighted.ass"),
        ("path/to/show.en.srt", "dest", "converted", "vtt", "dest/show.en.converted.vtt"),
        ("no_extension", ".", "optimized", "srt", "./no_extension.optimized.srt"),
    ];

    for (input, dir, suffix, ext, expected) in cases {
        let output = FileManager::generate_output_path(input, dir, suffix, ext);
        assert_eq!(output, PathBuf::from(expected), "Failed for input: {}", input);
    }
}

/// Test recursive, sorted file discovery by extension
#[test]
fn test_find_files_withNestedDirectories_shouldReturnSortedMatches() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("season1");
    fs::create_dir_all(&nested)?;

    common::create_test_subtitle(temp_dir.path(), "b.srt")?;
    common::create_test_subtitle(temp_dir.path(), "a.SRT")?;
    common::create_test_subtitle(&nested, "c.srt")?;
    common::create_test_file(temp_dir.path(), "notes.txt", "not a subtitle")?;

    let files = FileManager::find_files(temp_dir.path(), "srt")?;
    let names: Vec<String> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["a.SRT", "b.srt", "c.srt"]);
    Ok(())
}

/// Test atomic writes create parent directories and replace content
#[test]
fn test_write_atomic_withMissingParent_shouldCreateAndOverwrite() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("deep").join("dir").join("out.srt");

    FileManager::write_atomic(&path, b"first")?;
    assert_eq!(FileManager::read_to_string(&path)?, "first");

    FileManager::write_to_file(&path, "second")?;
    assert_eq!(FileManager::read_bytes(&path)?, b"second");

    // no temporary files are left behind
    let entries = fs::read_dir(path.parent().unwrap())?.count();
    assert_eq!(entries, 1);
    Ok(())
}

/// Test format detection by extension and by content
#[test]
fn test_detect_file_type_withVariousFiles_shouldDetectFormat() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();

    let cases = [
        ("a.srt", "anything", FileType::Subtitle(SubtitleFormat::Srt)),
        ("b.vtt", "anything", FileType::Subtitle(SubtitleFormat::Vtt)),
        ("c.txt", "WEBVTT\n\n00:01.000 --> 00:02.000\nHi\n", FileType::Subtitle(SubtitleFormat::Vtt)),
        ("d.txt", "[Script Info]\nTitle: x\n", FileType::Subtitle(SubtitleFormat::Ass)),
        ("e.txt", "[{\"index\": 1}]", FileType::Subtitle(SubtitleFormat::Json)),
        ("f.txt", common::SAMPLE_SRT, FileType::Subtitle(SubtitleFormat::Srt)),
        ("g.txt", "hello world", FileType::Unknown),
    ];

    for (name, content, expected) in cases {
        let path = common::create_test_file(dir, name, content)?;
        assert_eq!(FileManager::detect_file_type(&path)?, expected, "Failed for file: {}", name);
    }

    assert!(FileManager::detect_file_type(dir.join("missing.srt")).is_err());
    Ok(())
}

/// Test nested directory creation
#[test]
fn test_ensure_dir_withNestedPath_shouldCreateParents() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let created = temp_dir.path().join("a").join("b");
    FileManager::ensure_dir(&created)?;
    assert!(created.is_dir());

    // existing directories are left alone
    FileManager::ensure_dir(&created)?;
    assert!(created.is_dir());
    Ok(())
}
