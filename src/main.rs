// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};

use srt_highlighter::app_config::{self, Config};
use srt_highlighter::app_controller::Controller;
use srt_highlighter::converter::SubtitleFormat;
use srt_highlighter::serializer::OutputFormat;

/// CLI Wrapper for OutputFormat to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliOutputFormat {
    PlainSrt,
    StyledSrt,
    Vtt,
    Ass,
    Json,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(cli_format: CliOutputFormat) -> Self {
        match cli_format {
            CliOutputFormat::PlainSrt => OutputFormat::PlainSrt,
            CliOutputFormat::StyledSrt => OutputFormat::StyledSrt,
            CliOutputFormat::Vtt => OutputFormat::Vtt,
            CliOutputFormat::Ass => OutputFormat::Ass,
            CliOutputFormat::Json => OutputFormat::Json,
        }
    }
}

/// CLI Wrapper for SubtitleFormat to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliSubtitleFormat {
    Srt,
    Vtt,
    Ass,
    Json,
}

impl From<CliSubtitleFormat> for SubtitleFormat {
    fn from(cli_format: CliSubtitleFormat) -> Self {
        match cli_format {
            CliSubtitleFormat::Srt => SubtitleFormat::Srt,
            CliSubtitleFormat::Vtt => SubtitleFormat::Vtt,
            CliSubtitleFormat::Ass => SubtitleFormat::Ass,
            CliSubtitleFormat::Json => SubtitleFormat::Json,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Highlight words of a subtitle file or of every .srt file in a directory
    Highlight(HighlightArgs),

    /// Convert a whole subtitle file to another format
    Convert(ConvertArgs),

    /// Print caption statistics
    Stats {
        /// Subtitle file (SRT or WebVTT)
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },

    /// Report caption errors
    Check {
        /// Subtitle file (SRT or WebVTT)
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },

    /// Adjust caption timings for readability
    Optimize {
        /// Subtitle file (SRT or WebVTT)
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Force overwrite of existing output files
        #[arg(short, long)]
        force_overwrite: bool,
    },

    /// Generate shell completions for srt-highlighter
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct HighlightArgs {
    /// Input subtitle file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Output directory (defaults to the input's directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum)]
    format: Option<CliOutputFormat>,

    /// Merge words sharing a start time into one caption
    #[arg(short, long)]
    grouped: bool,

    /// Color of important words (#RRGGBB)
    #[arg(long)]
    primary_color: Option<String>,

    /// Color of every category (#RRGGBB)
    #[arg(long)]
    secondary_color: Option<String>,

    /// Language code of the captions (e.g., 'en', 'vi')
    #[arg(short = 'L', long)]
    language: Option<String>,

    /// Importance threshold between 0 and 1
    #[arg(long)]
    min_importance: Option<f32>,

    /// Do not attach icons to words
    #[arg(long)]
    no_emojis: bool,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    /// Input subtitle file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Target format
    #[arg(short, long, value_enum)]
    to: CliSubtitleFormat,

    /// Source format (detected from the file when omitted)
    #[arg(long, value_enum)]
    from: Option<CliSubtitleFormat>,

    /// Output file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,
}

/// srt-highlighter - word-level subtitle highlighting
///
/// Splits subtitles into timed words, highlights important ones and writes
/// them back as SRT, WebVTT, ASS or JSON.
#[derive(Parser, Debug)]
#[command(name = "srt-highlighter")]
#[command(version)]
#[command(about = "Word-level subtitle highlighting tool")]
#[command(long_about = "srt-highlighter splits subtitles into timed words, highlights important words and re-emits them in several subtitle formats.

EXAMPLES:
    srt-highlighter highlight movie.srt                      # Styled SRT using default config
    srt-highlighter highlight -g --format vtt movie.srt      # Grouped WebVTT output
    srt-highlighter highlight --format ass /subtitles/       # Process a whole directory
    srt-highlighter convert movie.srt --to vtt               # Whole-file conversion
    srt-highlighter stats movie.srt                          # Caption statistics
    srt-highlighter check movie.srt                          # Caption error report
    srt-highlighter optimize movie.srt                       # Readability timing fixes
    srt-highlighter completions bash > srt-highlighter.bash  # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color code for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let level = record.level();

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                Self::get_color_for_level(level),
                now,
                Self::get_emoji_for_level(level),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // The logger accepts everything; the effective level is set through
    // log::set_max_level once the config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "srt-highlighter", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(cmd_log_level) = &cli.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(config_log_level.into());
    }

    let mut config = Config::load_or_create(&cli.config_path)?;
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }

    match cli.command {
        Commands::Highlight(args) => run_highlight(config, args, cli.log_level.is_some()),
        Commands::Convert(args) => {
            let controller = prepare_controller(config, cli.log_level.is_some())?;
            let from = args.from.map(SubtitleFormat::from);
            if let Some(path) = controller.convert(&args.input, args.to.into(), from, args.output, args.force_overwrite)? {
                println!("{}", path.display());
            }
            Ok(())
        }
        Commands::Stats { input } => {
            let controller = prepare_controller(config, cli.log_level.is_some())?;
            let stats = controller.stats(&input)?;
            print!("{}", stats);
            Ok(())
        }
        Commands::Check { input } => {
            let controller = prepare_controller(config, cli.log_level.is_some())?;
            let issues = controller.check(&input)?;
            if issues.is_empty() {
                info!("No issues found in {}", input.display());
            }
            for issue in &issues {
                println!("{}", issue);
            }
            Ok(())
        }
        Commands::Optimize {
            input,
            output,
            force_overwrite,
        } => {
            let controller = prepare_controller(config, cli.log_level.is_some())?;
            if let Some(path) = controller.optimize(&input, output, force_overwrite)? {
                println!("{}", path.display());
            }
            Ok(())
        }
        Commands::Completions { .. } => Ok(()),
    }
}

// Validate the final config, apply its log level and build the controller
fn prepare_controller(config: Config, log_level_from_cli: bool) -> Result<Controller> {
    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if !log_level_from_cli {
        log::set_max_level(config.log_level.into());
    }

    Controller::with_config(config)
}

fn run_highlight(mut config: Config, args: HighlightArgs, log_level_from_cli: bool) -> Result<()> {
    // Override config with CLI options if provided
    if let Some(format) = args.format {
        config.output.format = format.into();
    }
    if args.grouped {
        config.output.grouped = true;
    }
    if let Some(color) = args.primary_color {
        config.output.primary_color = Some(color);
    }
    if let Some(color) = args.secondary_color {
        config.output.secondary_color = Some(color);
    }
    if let Some(language) = args.language {
        config.analysis.language = language;
    }
    if let Some(min_importance) = args.min_importance {
        config.analysis.min_importance = min_importance;
    }
    if args.no_emojis {
        config.analysis.use_emojis = false;
    }

    let controller = prepare_controller(config, log_level_from_cli)?;

    if args.input_path.is_file() {
        let output_dir = args
            .output_dir
            .unwrap_or_else(|| args.input_path.parent().unwrap_or(Path::new(".")).to_path_buf());
        if let Some(path) = controller.run(args.input_path.clone(), output_dir, args.force_overwrite)? {
            println!("{}", path.display());
        }
    } else if args.input_path.is_dir() {
        if args.output_dir.is_some() {
            warn!("--output-dir is ignored in folder mode, outputs are written next to their sources");
        }
        let summary = controller.run_folder(args.input_path.clone(), args.force_overwrite)?;
        if summary.failed > 0 {
            return Err(anyhow!("{} file(s) failed to process", summary.failed));
        }
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", args.input_path));
    }

    Ok(())
}
