// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, debug};
use std::io::{IsTerminal, Read, Write};
use std::path::PathBuf;

use livetrans::app_config::{self, Config, ModelBackend};
use livetrans::app_controller::{Controller, PLACEHOLDER_INPUT, TerminalRenderer};
use livetrans::language_utils;

/// CLI Wrapper for ModelBackend to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliModelBackend {
    Ollama,
    Mock,
}

impl From<CliModelBackend> for ModelBackend {
    fn from(cli_backend: CliModelBackend) -> Self {
        match cli_backend {
            CliModelBackend::Ollama => ModelBackend::Ollama,
            CliModelBackend::Mock => ModelBackend::Mock,
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
    /// Generate shell completions for livetrans
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// List the supported languages
    Languages,
}

/// livetrans - Live streaming translation with a local language model
///
/// Translates text as you type it, streaming the model output back and
/// cancelling stale translations as soon as new input arrives.
#[derive(Parser, Debug)]
#[command(name = "livetrans")]
#[command(version)]
#[command(about = "Live streaming translation with a local language model")]
#[command(long_about = "livetrans streams translations from a local language model. Newer input always wins: \
a running translation is stopped as soon as new text, a new target language or a new style arrives.

EXAMPLES:
    livetrans                                   # Interactive session
    livetrans Hello world                       # Translate, then stay interactive
    echo 'Bonjour' | livetrans                  # Translate piped text once
    livetrans --once -t Deutsch -s Casual Hi    # Translate once with a given target and style
    livetrans --backend mock                    # Offline demo without a model server
    livetrans languages                         # List supported languages
    livetrans completions bash > livetrans.bash # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json under the user configuration directory.
    You can specify a different file with --config. If the file doesn't exist, a
    default one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Text to translate
    #[arg(value_name = "TEXT")]
    text: Vec<String>,

    /// Target language, by display name or code (e.g., 'Français', 'fr')
    #[arg(short, long)]
    target: Option<String>,

    /// Translation style (Default, Academic, Web Chat, Casual, Dictionary)
    #[arg(short, long)]
    style: Option<String>,

    /// Model backend to use
    #[arg(short, long, value_enum)]
    backend: Option<CliModelBackend>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// Configuration file path
    #[arg(short, long, env = "LIVETRANS_CONFIG")]
    config: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Translate once and exit
    #[arg(long)]
    once: bool,
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
        // Register at the most verbose level; the max level filters later
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji and ANSI colour for log level
    fn decoration_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("❌ ", "1;31"),
            Level::Warn => ("🚧 ", "1;33"),
            Level::Info => (" ", "1;32"),
            Level::Debug => ("🔍 ", "1;36"),
            Level::Trace => ("📋 ", "1;35"),
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
            let (emoji, colour) = Self::decoration_for_level(record.level());
            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "\x1B[{}m{} {} {}\x1B[0m", colour, now, emoji, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "livetrans", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Languages) => {
            list_languages();
            Ok(())
        }
        None => run_translate(cli).await,
    }
}

fn list_languages() {
    for (name, code) in language_utils::LANGUAGES {
        let english = language_utils::get_language_name(code).unwrap_or_else(|_| "-".to_string());
        println!("{:<10} {:<12} {}", code, name, english);
    }
}

async fn run_translate(options: CommandLineOptions) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.into());
    }

    let config_path = options.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load_or_create(&config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path.display()))?;

    // Override config with CLI options if provided
    if let Some(backend) = &options.backend {
        config.model.backend = backend.clone().into();
    }
    if let Some(model) = &options.model {
        config.model.model = model.clone();
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
    if let Some(style) = &options.style {
        config.default_style = style.parse()?;
    }

    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(config.log_level.into());
    }

    let (initial_input, piped) = initial_input(&options.text)?;
    debug!("Initial input ({} chars, piped: {})", initial_input.chars().count(), piped);

    let mut controller = Controller::with_config(config, TerminalRenderer::new())?;
    controller.begin(&initial_input, options.target.as_deref())?;

    if options.once || piped {
        controller.run_once().await
    } else {
        controller.run_interactive().await
    }
}

/// Initial text from the arguments, else piped stdin, else the placeholder.
///
/// The flag is true when the text came from a pipe.
fn initial_input(args: &[String]) -> Result<(String, bool)> {
    if !args.is_empty() {
        return Ok((args.join(" "), false));
    }

    let mut stdin = std::io::stdin();
    if !stdin.is_terminal() {
        let mut content = String::new();
        stdin.read_to_string(&mut content).context("Failed to read stdin")?;
        let content = content.trim();
        if !content.is_empty() {
            return Ok((content.to_string(), true));
        }
    }

    Ok((PLACEHOLDER_INPUT.to_string(), false))
}
