/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use srt_highlighter::app_config::{Config, LogLevel};
use srt_highlighter::serializer::OutputFormat;
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.output.format, OutputFormat::StyledSrt);
    assert!(!config.output.grouped);
    assert_eq!(config.analysis.language, "en");
    assert_eq!(config.analysis.min_importance, 0.5);
    assert!(config.analysis.use_emojis);
    assert_eq!(config.timing.min_duration_ms, 1_000);
    assert_eq!(config.timing.max_words_per_caption, 15);
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    config.analysis.language = "xyz".to_string();
    assert!(config.validate().is_err());
    config.analysis.language = "vie".to_string();
    assert!(config.validate().is_ok());

    config.output.secondary_color = Some("#12345".to_string());
    assert!(config.validate().is_err());
    config.output.secondary_color = Some("#123456".to_string());
    assert!(config.validate().is_ok());

    config.timing.min_duration_ms = 10_000;
    assert!(config.validate().is_err());
}

/// Test that partial config files fill in defaults
#[test]
fn test_from_file_withPartialJson_shouldUseDefaultsForMissingFields() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{"output": {"format": "ass", "grouped": true}, "log_level": "debug"}"#,
    )?;

    let config = Config::from_file(&path)?;
    assert_eq!(config.output.format, OutputFormat::Ass);
    assert!(config.output.grouped);
    assert_eq!(config.analysis.language, "en");
    assert_eq!(config.log_level, LogLevel::Debug);
    Ok(())
}

/// Test that a malformed config file is an error
#[test]
fn test_from_file_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ output: ")?;
    assert!(Config::from_file(&path).is_err());
    Ok(())
}

/// Test that a missing config file is created with defaults
#[test]
fn test_load_or_create_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let config = Config::load_or_create(&path)?;
    assert_eq!(config, Config::default());
    assert!(path.exists());

    let reloaded = Config::load_or_create(&path)?;
    assert_eq!(reloaded, config);
    Ok(())
}

/// Test save and reload of a customized configuration
#[test]
fn test_save_withCustomValues_shouldReloadIdentically() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("custom.json");

    let mut config = common::config_with_format("json");
    config.output.primary_color = Some("#00FF00".to_string());
    config.analysis.use_emojis = false;
    config.save(&path)?;

    let loaded = Config::from_file(&path)?;
    assert_eq!(loaded.output.format, OutputFormat::Json);
    assert_eq!(loaded, config);
    Ok(())
}

/// Test conversion of config sections into component settings
#[test]
fn test_config_sections_shouldMapToComponentSettings() {
    let mut config = Config::default();
    assert!(config.output.style_overrides().is_none());

    config.output.primary_color = Some("#FF0000".to_string());
    let overrides = config.output.style_overrides().unwrap();
    assert_eq!(overrides.primary_color.as_deref(), Some("#FF0000"));
    assert!(overrides.secondary_color.is_none());

    config.timing.min_gap_ms = 250;
    assert_eq!(config.timing.optimizer_config().min_gap_ms, 250);
    assert_eq!(config.timing.checker_config().max_words_per_caption, 15);
    assert_eq!(config.analysis.options().min_importance, 0.5);
}
