use anyhow::{Context, Result, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use parking_lot::Mutex;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;

use crate::app_config::Config;
use crate::language_utils;
use crate::presentation::{self, DisplayBuffer, EventReceiver, PresentationEvent};
use crate::providers::ModelLoader;
use crate::translation::{GenerationCoordinator, LanguageClassifier, Style, TargetSelector};

// @module: Application controller for interactive translation

/// Input shown until the user provides some
pub const PLACEHOLDER_INPUT: &str = "Hello, waiting for input...";

const HELP_TEXT: &str = "Commands:
  <text>          translate text
  :lang NAME      change target language
  :style NAME     change style
  :stop           stop the running translation
  :swap           translate the translation back
  :open PATH      translate the contents of a text file
  :langs          list languages
  :styles         list styles
  :help           show this help
  :quit           exit";

/// One line of interactive input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// New input text
    Translate(String),
    /// Change the target language
    Language(String),
    /// Change the style
    Style(String),
    Stop,
    Swap,
    /// Load input from a text file
    Open(PathBuf),
    Languages,
    Styles,
    Help,
    Quit,
    /// Blank line
    Empty,
    /// Unrecognized `:` command
    Unknown(String),
}

/// Parse one line of interactive input
pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Empty;
    }

    let Some(rest) = line.strip_prefix(':') else {
        return Command::Translate(line.to_string());
    };

    let (name, argument) = match rest.split_once(char::is_whitespace) {
        Some((name, argument)) => (name, argument.trim()),
        None => (rest, ""),
    };

    match (name.to_lowercase().as_str(), argument.is_empty()) {
        ("lang" | "l", false) => Command::Language(argument.to_string()),
        ("style" | "s", false) => Command::Style(argument.to_string()),
        ("open" | "o", false) => Command::Open(PathBuf::from(argument)),
        ("stop", true) => Command::Stop,
        ("swap", true) => Command::Swap,
        ("langs", true) => Command::Languages,
        ("styles", true) => Command::Styles,
        ("help" | "h" | "?", true) => Command::Help,
        ("quit" | "q" | "exit", true) => Command::Quit,
        _ => Command::Unknown(line.to_string()),
    }
}

/// Receives presentation events after they were applied to the display buffer
pub trait Renderer: Send + 'static {
    /// Render one event; `buffer` already reflects it
    fn render(&mut self, event: &PresentationEvent, buffer: &DisplayBuffer);

    /// Called once after the last event
    fn finish(&mut self) {}
}

/// Renderer that draws nothing
#[derive(Debug, Default)]
pub struct SilentRenderer;

impl Renderer for SilentRenderer {
    fn render(&mut self, _event: &PresentationEvent, _buffer: &DisplayBuffer) {}
}

/// Renders the translation on stdout with a spinner while loading
#[derive(Default)]
pub struct TerminalRenderer {
    spinner: Option<ProgressBar>,
    line_open: bool,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    fn start_spinner(&mut self) {
        if self.spinner.is_some() {
            return;
        }

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message("Translating …");
        spinner.enable_steady_tick(Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    fn end_line(&mut self) {
        if self.line_open {
            println!();
            self.line_open = false;
        }
    }
}

impl Renderer for TerminalRenderer {
    fn render(&mut self, event: &PresentationEvent, _buffer: &DisplayBuffer) {
        match event {
            PresentationEvent::Loading { active: true, .. } => {
                self.end_line();
                self.start_spinner();
            }
            PresentationEvent::Loading { active: false, .. } => self.stop_spinner(),
            PresentationEvent::Display { text, append, .. } => {
                self.stop_spinner();
                if !append {
                    self.end_line();
                }
                if !text.is_empty() {
                    print!("{}", text);
                    let _ = std::io::stdout().flush();
                    self.line_open = true;
                }
            }
        }
    }

    fn finish(&mut self) {
        self.stop_spinner();
        self.end_line();
    }
}

/// Current input, target and style
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub input: String,
    pub target: String,
    pub style: Style,
}

/// Main application controller for live translation
pub struct Controller {
    // @field: App configuration
    config: Config,
    coordinator: GenerationCoordinator,
    classifier: LanguageClassifier,
    selector: TargetSelector,
    session: Session,
    display: Arc<Mutex<DisplayBuffer>>,
    presenter: JoinHandle<()>,
}

impl Controller {
    /// Start a controller with the loader built from `config`
    pub fn with_config(config: Config, renderer: impl Renderer) -> Result<Self> {
        let loader = config.build_loader();
        Self::with_loader(config, loader, renderer)
    }

    // @method: Start the coordinator and the presenter task
    pub fn with_loader(config: Config, loader: Arc<dyn ModelLoader>, renderer: impl Renderer) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;

        let (events, receiver) = presentation::channel();
        let display = Arc::new(Mutex::new(DisplayBuffer::new()));
        let presenter = tokio::spawn(run_presenter(receiver, Arc::clone(&display), renderer));

        info!("Using {} backend with model {}", config.model.backend.display_name(), config.model.model);
        let coordinator = GenerationCoordinator::start(loader, config.coordinator_settings(), events);

        let session = Session {
            input: String::new(),
            target: config.primary_foreign_language.clone(),
            style: config.default_style,
        };

        Ok(Self {
            classifier: LanguageClassifier::new(&config.native_language),
            selector: TargetSelector::new(&config.native_language, &config.primary_foreign_language),
            config,
            coordinator,
            session,
            display,
            presenter,
        })
    }

    /// Current session state
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Configuration in use
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Snapshot of the displayed text
    pub fn display(&self) -> DisplayBuffer {
        self.display.lock().clone()
    }

    /// Whether the model failed to load
    pub fn is_model_unavailable(&self) -> bool {
        self.coordinator.is_model_unavailable()
    }

    /// Replace the input, pick a target for it and translate
    pub fn set_input(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            debug!("Ignoring empty input");
            return;
        }

        self.session.input = text.to_string();
        self.session.target = self.selector.auto_select(text, &self.classifier);
        debug!("Auto-selected target language: {}", self.session.target);
        self.translate();
    }

    /// Set the first input and translate it
    ///
    /// Without `target` the target language is picked from the input.
    pub fn begin(&mut self, input: &str, target: Option<&str>) -> Result<()> {
        let Some(target) = target else {
            self.set_input(input);
            return Ok(());
        };

        self.session.target = supported_display_name(target)?.to_string();
        self.session.input = input.trim().to_string();
        self.translate();
        Ok(())
    }

    /// Change the target language and translate again
    pub fn set_target(&mut self, name: &str) -> Result<()> {
        self.session.target = supported_display_name(name)?.to_string();
        self.translate();
        Ok(())
    }

    /// Change the style and translate again
    pub fn set_style(&mut self, name: &str) -> Result<()> {
        self.session.style = name.parse()?;
        self.translate();
        Ok(())
    }

    /// Submit the current session to the coordinator
    pub fn translate(&mut self) {
        if self.session.input.is_empty() {
            return;
        }

        self.selector.note_target(&self.session.target);
        let target = language_utils::resolve_target_language(&self.session.target);
        self.coordinator.submit_with(&self.session.input, target, self.session.style);
    }

    /// Stop the running translation
    pub fn stop(&self) {
        self.coordinator.stop();
    }

    /// Move the translation into the input and translate it back
    ///
    /// Returns `false` when there is no translation to swap.
    pub fn swap(&mut self) -> bool {
        let translation = self.display.lock().clean_text();
        if translation.is_empty() || translation.starts_with(presentation::ERROR_PREFIX) {
            debug!("Nothing to swap");
            return false;
        }

        let target = self.selector.swap_target(&self.session.input, &self.session.target, &self.classifier);
        self.session.input = translation;
        self.session.target = target;
        self.translate();
        true
    }

    /// Translate the contents of a text file
    pub async fn open(&mut self, path: &Path) -> Result<()> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read input file: {}", path.display()))?;
        info!("Loaded input from {}", path.display());
        self.set_input(&content);
        Ok(())
    }

    /// Apply one interactive command; returns `false` when the session should end
    pub async fn handle(&mut self, command: Command) -> bool {
        match command {
            Command::Translate(text) => self.set_input(&text),
            Command::Language(name) => {
                if let Err(e) = self.set_target(&name) {
                    warn!("{}", e);
                }
            }
            Command::Style(name) => {
                if let Err(e) = self.set_style(&name) {
                    warn!("{}", e);
                }
            }
            Command::Stop => self.stop(),
            Command::Swap => {
                self.swap();
            }
            Command::Open(path) => {
                if let Err(e) = self.open(&path).await {
                    error!("{:#}", e);
                }
            }
            Command::Languages => {
                for (name, code) in language_utils::LANGUAGES {
                    let marker = if *name == self.session.target { "*" } else { " " };
                    println!("{} {:<10} {}", marker, code, name);
                }
            }
            Command::Styles => {
                for style in Style::ALL {
                    let marker = if style == self.session.style { "*" } else { " " };
                    println!("{} {}", marker, style);
                }
            }
            Command::Help => println!("{}", HELP_TEXT),
            Command::Quit => return false,
            Command::Empty => {}
            Command::Unknown(line) => warn!("Unknown command: {} (try :help)", line),
        }
        true
    }

    /// Serve commands from stdin until `:quit` or end of input
    pub async fn run_interactive(mut self) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await.context("Failed to read from stdin")? {
            if !self.handle(parse_command(&line)).await {
                break;
            }
        }

        self.coordinator.cancel();
        self.shutdown().await;
        Ok(())
    }

    /// Wait for the submitted translation and exit
    ///
    /// Fails when the translation ended in an error.
    pub async fn run_once(self) -> Result<()> {
        let display = Arc::clone(&self.display);
        self.shutdown().await;

        let text = display.lock().text().to_string();
        if text.starts_with(presentation::ERROR_PREFIX) {
            return Err(anyhow!("{}", text));
        }
        Ok(())
    }

    /// Finish pending work and wait for the presenter to drain
    pub async fn shutdown(self) {
        self.coordinator.shutdown().await;
        if let Err(e) = self.presenter.await {
            error!("Presenter task panicked: {}", e);
        }
    }
}

/// Display name of a supported language given by name or code
fn supported_display_name(name: &str) -> Result<&'static str> {
    language_utils::code_for_display_name(name)
        .and_then(language_utils::display_name_for_code)
        .ok_or_else(|| anyhow!("Unsupported language: {}", name))
}

async fn run_presenter(mut receiver: EventReceiver, display: Arc<Mutex<DisplayBuffer>>, mut renderer: impl Renderer) {
    while let Some(event) = receiver.recv().await {
        let buffer = {
            let mut display = display.lock();
            display.apply(&event);
            display.clone()
        };
        renderer.render(&event, &buffer);
    }
    renderer.finish();
}
