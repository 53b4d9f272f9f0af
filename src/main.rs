// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, error};
use std::io::Write;
use std::path::PathBuf;

use khaya::app_config::{self, API_KEY_ENV_VAR, Config};
use khaya::app_controller::Controller;

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
    /// Translate a text file
    Translate(TranslateArgs),

    /// Generate shell completions for khaya
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Text file to translate
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file (default: <input stem>.<target>.<ext> next to the input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Language pair (e.g., 'en-tw', 'en-ee', 'tw-en')
    #[arg(short = 'l', long)]
    language_pair: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: PathBuf,

    /// Maximum number of words per chunk
    #[arg(long)]
    max_chunk_size: Option<usize>,

    /// Maximum number of concurrent requests
    #[arg(long)]
    concurrency: Option<usize>,

    /// Write a JSON report with statistics and per-chunk results
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,

    /// API key for the translation service
    #[arg(long, env = API_KEY_ENV_VAR, hide_env_values = true)]
    api_key: Option<String>,

    /// Force overwrite of an existing output file
    #[arg(short, long)]
    force_overwrite: bool,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// Khaya - chunked translation of large texts
///
/// Splits a text file into sentence-aligned chunks, translates them
/// concurrently through the GhanaNLP Khaya API, retries failures and
/// reassembles the result in the original order.
#[derive(Parser, Debug)]
#[command(name = "khaya")]
#[command(version)]
#[command(about = "Translate large texts through the Khaya translation API")]
#[command(long_about = "Khaya splits large texts into sentence-aligned chunks and translates them concurrently.

EXAMPLES:
    khaya translate story.txt                       # Translate using default config
    khaya translate -l en-ee story.txt              # Translate from English to Ewe
    khaya translate --report report.json story.txt  # Also write statistics
    khaya translate --concurrency 2 book.txt        # Fewer parallel requests
    khaya completions bash > khaya.bash             # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically. The API key is read from KHAYA_API_KEY when
    it is not set in the configuration.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
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
        log::set_boxed_logger(Box::new(CustomLogger::new(level)))?;
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

    // @returns: ANSI colour code for log level
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
        // The level can be raised later through log::set_max_level
        metadata.level() <= self.level.max(log::max_level())
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                Self::get_color_for_level(record.level()),
                now,
                Self::get_emoji_for_level(record.level()),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = CustomLogger::init(LevelFilter::Info) {
        eprintln!("Failed to initialize logger: {}", e);
    }

    let cli = CommandLineOptions::parse();

    let result = match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "khaya", &mut std::io::stdout());
            Ok(())
        }
        Commands::Translate(args) => run_translate(args).await,
    };

    if let Err(e) = result {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = Config::load_or_create(&options.config_path)?;

    // Override config with CLI options if provided
    if let Some(language_pair) = &options.language_pair {
        config.language_pair = language_pair.clone();
    }
    if let Some(max_chunk_size) = options.max_chunk_size {
        config.chunking.max_chunk_size = max_chunk_size;
    }
    if let Some(concurrency) = options.concurrency {
        config.dispatch.concurrency = concurrency;
    }
    if let Some(api_key) = &options.api_key {
        config.provider.api_key = api_key.clone();
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
    config.apply_env_overrides();

    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    let controller = Controller::with_config(config)?;
    let outcome = controller
        .run(
            &options.input,
            options.output.as_deref(),
            options.report.as_deref(),
            options.force_overwrite,
        )
        .await?;

    if !outcome.statistics.is_complete() {
        anyhow::bail!(
            "{} of {} chunks could not be translated",
            outcome.statistics.failed_chunks,
            outcome.statistics.total_chunks
        );
    }

    Ok(())
}
