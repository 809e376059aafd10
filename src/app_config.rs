use anyhow::{Context, Result, anyhow};
use log::{LevelFilter, warn};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::analysis::AnalysisOptions;
use crate::serializer::OutputFormat;
use crate::styling::{self, StyleOverrides};
use crate::timing_optimizer::TimingOptimizerConfig;
use crate::validation::CaptionCheckerConfig;

/// Application configuration module
/// This module handles loading, validating and saving the configuration.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Config {
    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Word analysis settings
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Timing limits for the checker and optimizer
    #[serde(default)]
    pub timing: TimingConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Output configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OutputConfig {
    // @field: Output grammar
    #[serde(default)]
    pub format: OutputFormat,

    // @field: Merge tokens sharing a start time
    #[serde(default)]
    pub grouped: bool,

    // @field: Overrides the important-word color
    #[serde(default)]
    pub primary_color: Option<String>,

    // @field: Overrides every category color
    #[serde(default)]
    pub secondary_color: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::StyledSrt,
            grouped: false,
            primary_color: None,
            secondary_color: None,
        }
    }
}

impl OutputConfig {
    /// Color overrides, `None` when neither is set
    pub fn style_overrides(&self) -> Option<StyleOverrides> {
        let overrides = StyleOverrides {
            primary_color: self.primary_color.clone(),
            secondary_color: self.secondary_color.clone(),
        };
        (!overrides.is_empty()).then_some(overrides)
    }
}

/// Analysis configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AnalysisConfig {
    // @field: ISO 639 code selecting the scorer
    #[serde(default = "default_language")]
    pub language: String,

    // @field: Importance threshold in [0, 1]
    #[serde(default = "default_min_importance")]
    pub min_importance: f32,

    // @field: Attach icons to words
    #[serde(default = "default_true")]
    pub use_emojis: bool,

    // @field: External category tables, built-in ones when unset
    #[serde(default)]
    pub categories_file: Option<PathBuf>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            min_importance: default_min_importance(),
            use_emojis: true,
            categories_file: None,
        }
    }
}

impl AnalysisConfig {
    pub fn options(&self) -> AnalysisOptions {
        AnalysisOptions {
            min_importance: self.min_importance,
            use_emojis: self.use_emojis,
        }
    }
}

/// Timing configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TimingConfig {
    #[serde(default = "default_min_duration_ms")]
    pub min_duration_ms: u64,

    #[serde(default = "default_max_duration_ms")]
    pub max_duration_ms: u64,

    #[serde(default = "default_min_gap_ms")]
    pub min_gap_ms: u64,

    #[serde(default = "default_max_words_per_caption")]
    pub max_words_per_caption: usize,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            min_duration_ms: default_min_duration_ms(),
            max_duration_ms: default_max_duration_ms(),
            min_gap_ms: default_min_gap_ms(),
            max_words_per_caption: default_max_words_per_caption(),
        }
    }
}

impl TimingConfig {
    pub fn optimizer_config(&self) -> TimingOptimizerConfig {
        TimingOptimizerConfig {
            min_duration_ms: self.min_duration_ms,
            max_duration_ms: self.max_duration_ms,
            min_gap_ms: self.min_gap_ms,
        }
    }

    pub fn checker_config(&self) -> CaptionCheckerConfig {
        CaptionCheckerConfig {
            max_words_per_caption: self.max_words_per_caption,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn default_language() -> String {
    "en".to_string()
}

fn default_min_importance() -> f32 {
    0.5
}

fn default_true() -> bool {
    true
}

fn default_min_duration_ms() -> u64 {
    1_000
}

fn default_max_duration_ms() -> u64 {
    7_000
}

fn default_min_gap_ms() -> u64 {
    100
}

fn default_max_words_per_caption() -> usize {
    15
}

impl Config {
    /// Read a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Read a configuration file, writing the default one when it is missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::from_file(path);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        crate::language_utils::validate_language_code(&self.analysis.language)?;

        if !(0.0..=1.0).contains(&self.analysis.min_importance) {
            return Err(anyhow!(
                "min_importance must be between 0 and 1, got {}",
                self.analysis.min_importance
            ));
        }

        for (name, color) in [
            ("primary_color", &self.output.primary_color),
            ("secondary_color", &self.output.secondary_color),
        ] {
            if let Some(color) = color {
                if !color.starts_with('#') || styling::parse_hex_rgb(color).is_none() {
                    return Err(anyhow!("{} must be a #RRGGBB color, got '{}'", name, color));
                }
            }
        }

        if self.timing.min_duration_ms > self.timing.max_duration_ms {
            return Err(anyhow!(
                "min_duration_ms ({}) must not exceed max_duration_ms ({})",
                self.timing.min_duration_ms,
                self.timing.max_duration_ms
            ));
        }

        Ok(())
    }
}
