/*!
 * Common test utilities for the srt-highlighter test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use srt_highlighter::app_config::Config;

/// Route library logs through the test harness, once per process
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Sample subtitle content used across tests
pub const SAMPLE_SRT: &str = r#"1
00:00:01,000 --> 00:00:04,000
My mother is happy today.

2
00:00:05,000 --> 00:00:09,000
We walk to the park.

3
00:00:10,000 --> 00:00:14,000
Did you see my phone?
"#;

/// Creates a sample subtitle file for testing
pub fn create_test_subtitle(dir: &Path, filename: &str) -> Result<PathBuf> {
    create_test_file(dir, filename, SAMPLE_SRT)
}

/// Default configuration with the given output format name
pub fn config_with_format(format: &str) -> Config {
    let mut config = Config::default();
    config.output.format = format.parse().unwrap_or_default();
    config
}
