use anyhow::{Context, Result, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::analysis::{self, CategoryConfig, ImportanceScorer};
use crate::app_config::Config;
use crate::converter::{self, SubtitleFormat};
use crate::errors::ParseError;
use crate::file_utils::{FileManager, FileType};
use crate::serializer::{self, OutputFormat};
use crate::statistics::SubtitleStatistics;
use crate::styling::{self, StyleResolver};
use crate::subtitle_processor::{self, CaptionBlock, SubtitleCollection};
use crate::timing_optimizer::TimingOptimizer;
use crate::validation::{CaptionChecker, CaptionIssue};
use crate::word_timing::{self, TimedToken};

// @module: Application controller for caption processing

// @const: Suffixes inserted before the output extension
const HIGHLIGHT_SUFFIX: &str = "highlighted";
const CONVERT_SUFFIX: &str = "converted";
const OPTIMIZE_SUFFIX: &str = "optimized";

/// Outcome counts of a folder run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FolderSummary {
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Keyword and style tables
    categories: CategoryConfig,

    // @field: Scorer for the configured language
    scorer: Arc<dyn ImportanceScorer>,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        let categories = CategoryConfig::load_or_default(config.analysis.categories_file.as_deref());
        let scorer = analysis::scorer_for_language(&config.analysis.language);
        debug!(
            "Controller ready: {} categories, '{}' scorer, {} output",
            categories.categories.len(),
            scorer.name(),
            config.output.format
        );

        Ok(Self {
            config,
            categories,
            scorer,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Parse, time, score and style the tokens of an SRT document
    pub fn analyze_bytes(&self, bytes: &[u8]) -> Vec<TimedToken> {
        let mut tokens = match word_timing::parse_timed_tokens(bytes) {
            Ok(tokens) => tokens,
            Err(ParseError::NoCaptions) => {
                warn!("No captions found in input");
                return Vec::new();
            }
            Err(e) => {
                warn!("{}", e);
                return Vec::new();
            }
        };

        let options = self.config.analysis.options();
        self.scorer.analyze(&mut tokens, &self.categories, &options);

        let overrides = self.config.output.style_overrides();
        let resolver = StyleResolver::new(&self.categories, overrides.as_ref(), options.use_emojis);
        styling::apply_style(tokens, &resolver)
    }

    /// Full pipeline from SRT bytes to output bytes
    pub fn highlight_bytes(&self, bytes: &[u8]) -> Vec<u8> {
        let tokens = self.analyze_bytes(bytes);
        serializer::serialize(&tokens, self.config.output.format, self.config.output.grouped)
    }

    /// Path the highlighted output of `input_file` is written to
    pub fn highlight_output_path(&self, input_file: &Path, output_dir: &Path) -> PathBuf {
        FileManager::generate_output_path(
            input_file,
            output_dir,
            HIGHLIGHT_SUFFIX,
            self.config.output.format.extension(),
        )
    }

    /// Highlight one SRT file. Returns the written path, `None` when skipped.
    pub fn run(&self, input_file: PathBuf, output_dir: PathBuf, force_overwrite: bool) -> Result<Option<PathBuf>> {
        let start_time = Instant::now();

        if !input_file.exists() {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        let output_path = self.highlight_output_path(&input_file, &output_dir);
        if output_path.exists() && !force_overwrite {
            warn!("Skipping file, output already exists (use -f to force overwrite): {:?}", output_path);
            return Ok(None);
        }

        let bytes = FileManager::read_bytes(&input_file)?;
        let output = self.highlight_bytes(&bytes);
        FileManager::write_atomic(&output_path, &output)?;

        info!(
            "Success: {} ({})",
            output_path.display(),
            Self::format_duration(start_time.elapsed())
        );
        Ok(Some(output_path))
    }

    /// Highlight every SRT file below `input_dir`, next to its source
    pub fn run_folder(&self, input_dir: PathBuf, force_overwrite: bool) -> Result<FolderSummary> {
        let start_time = Instant::now();

        if !input_dir.exists() {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        // outputs of a previous run are not inputs
        let marker = format!(".{}.", HIGHLIGHT_SUFFIX);
        let files: Vec<PathBuf> = FileManager::find_files(&input_dir, "srt")?
            .into_iter()
            .filter(|p| !p.to_string_lossy().contains(&marker))
            .collect();

        if files.is_empty() {
            return Err(anyhow!("No subtitle files found in directory: {:?}", input_dir));
        }

        let folder_pb = ProgressBar::new(files.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("█▓▒░"));
        folder_pb.set_message("Processing files");

        let mut summary = FolderSummary::default();

        for file in &files {
            let file_name = file
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            folder_pb.set_message(format!("Processing: {}", file_name));

            let output_dir = file.parent().map(Path::to_path_buf).unwrap_or_else(|| input_dir.clone());

            match self.run(file.clone(), output_dir, force_overwrite) {
                Ok(Some(_)) => summary.processed += 1,
                Ok(None) => summary.skipped += 1,
                Err(e) => {
                    error!("Error processing file {}: {}", file_name, e);
                    summary.failed += 1;
                }
            }

            folder_pb.inc(1);
        }

        folder_pb.finish_with_message("Folder processing complete");

        info!(
            "Folder processing completed: {} processed, {} skipped, {} errors in {}",
            summary.processed,
            summary.skipped,
            summary.failed,
            Self::format_duration(start_time.elapsed())
        );
        Ok(summary)
    }

    /// Convert a whole file between formats
    pub fn convert(
        &self,
        input_file: &Path,
        to: SubtitleFormat,
        from: Option<SubtitleFormat>,
        output_file: Option<PathBuf>,
        force_overwrite: bool,
    ) -> Result<Option<PathBuf>> {
        let from = match from {
            Some(format) => format,
            None => Self::detect_format(input_file)?,
        };

        let output_path = output_file.unwrap_or_else(|| {
            let dir = input_file.parent().unwrap_or(Path::new("."));
            FileManager::generate_output_path(input_file, dir, CONVERT_SUFFIX, to.as_str())
        });
        if output_path.exists() && !force_overwrite {
            warn!("Skipping conversion, output already exists (use -f to force overwrite): {:?}", output_path);
            return Ok(None);
        }

        let bytes = FileManager::read_bytes(input_file)?;
        let options = converter::ConversionOptions {
            grouped: self.config.output.grouped,
            styled: self.config.output.format.is_styled(),
        };
        let output = converter::convert_with_options(&bytes, from, to, &options)
            .with_context(|| format!("Failed to convert {:?}", input_file))?;
        FileManager::write_atomic(&output_path, &output)?;

        info!("Converted {} -> {}: {}", from, to, output_path.display());
        Ok(Some(output_path))
    }

    /// Statistics of an SRT or WebVTT file
    pub fn stats(&self, input_file: &Path) -> Result<SubtitleStatistics> {
        let blocks = self.read_captions(input_file)?;
        Ok(SubtitleStatistics::from_blocks(&blocks))
    }

    /// Problems found in an SRT or WebVTT file
    pub fn check(&self, input_file: &Path) -> Result<Vec<CaptionIssue>> {
        let blocks = self.read_captions(input_file)?;
        let checker = CaptionChecker::with_config(self.config.timing.checker_config());
        Ok(checker.check(&blocks))
    }

    /// Rewrite a caption file with readability-optimized timings as SRT
    pub fn optimize(&self, input_file: &Path, output_file: Option<PathBuf>, force_overwrite: bool) -> Result<Option<PathBuf>> {
        let output_path = output_file.unwrap_or_else(|| {
            let dir = input_file.parent().unwrap_or(Path::new("."));
            FileManager::generate_output_path(input_file, dir, OPTIMIZE_SUFFIX, OutputFormat::PlainSrt.extension())
        });
        if output_path.exists() && !force_overwrite {
            warn!("Skipping optimization, output already exists (use -f to force overwrite): {:?}", output_path);
            return Ok(None);
        }

        let blocks = self.read_captions(input_file)?;
        let optimizer = TimingOptimizer::with_config(self.config.timing.optimizer_config());

        let mut collection = SubtitleCollection::new(input_file.to_path_buf());
        collection.blocks = optimizer.optimize(&blocks);
        collection.write_to_srt(&output_path)?;

        info!("Optimized {} captions: {}", collection.blocks.len(), output_path.display());
        Ok(Some(output_path))
    }

    fn detect_format(input_file: &Path) -> Result<SubtitleFormat> {
        match FileManager::detect_file_type(input_file)? {
            FileType::Subtitle(format) => Ok(format),
            FileType::Unknown => Err(anyhow!("Cannot detect subtitle format of {:?}", input_file)),
        }
    }

    fn read_captions(&self, input_file: &Path) -> Result<Vec<CaptionBlock>> {
        match Self::detect_format(input_file)? {
            SubtitleFormat::Srt => Ok(SubtitleCollection::from_srt_file(input_file)?.blocks),
            SubtitleFormat::Vtt => {
                let bytes = FileManager::read_bytes(input_file)?;
                subtitle_processor::parse_vtt_captions(&bytes)
                    .with_context(|| format!("Failed to parse subtitle file: {:?}", input_file))
            }
            other => Err(anyhow!("Reading captions from {} files is not supported", other)),
        }
    }

    // Format duration in a human-readable format
    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
