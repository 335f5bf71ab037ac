use std::{
    io::{self, stdin},
    sync::Once,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    cursor::Show,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use totatype::{
    app::{App, Control},
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore, ModeKind},
    language::{FixedPassageSource, PassageSource, RandomPassageSource, SupportedLanguage},
    runtime::{AppEvent, CrosstermEventSource, EventSource, FixedTicker, Runner, Ticker},
    ui::screen::current_screen,
};

/// How long the loop waits for input while no session timer is armed.
const IDLE_INTERVAL_MS: u64 = 250;

const LOG_ENV: &str = "TOTATYPE_LOG";
const LOG_FILE: &str = "totatype.log";

/// typing speed test for the terminal, in Amharic and English
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A typing speed test for the terminal. Type a random Amharic or English passage against the clock or to a word count, then review wpm, accuracy and consistency."
)]
pub struct Cli {
    /// end the test after a countdown (time) or after a number of words (words)
    #[clap(short = 'm', long, value_enum)]
    mode: Option<ModeKind>,

    /// number of seconds to run a timed test: 15, 30, 60 or 120
    #[clap(short = 's', long)]
    number_of_secs: Option<u64>,

    /// number of words to use in a words test: 10, 25, 50 or 100
    #[clap(short = 'w', long)]
    number_of_words: Option<usize>,

    /// language to pull words from
    #[clap(short = 'l', long, value_enum)]
    language: Option<SupportedLanguage>,

    /// custom prompt to use instead of random words
    #[clap(short = 'p', long)]
    prompt: Option<String>,
}

impl Cli {
    /// Saved preferences overridden by the flags given on the command line.
    /// A bound flag without `--mode` selects the matching mode.
    fn apply(&self, mut config: Config) -> Config {
        if let Some(secs) = self.number_of_secs {
            config.number_of_secs = secs;
            config.mode = ModeKind::Time;
        }
        if let Some(words) = self.number_of_words {
            config.number_of_words = words;
            config.mode = ModeKind::Words;
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(language) = self.language {
            config.language = language;
        }
        config.normalized()
    }

    fn passage_source(&self) -> Result<Box<dyn PassageSource>> {
        Ok(match &self.prompt {
            Some(prompt) => Box::new(FixedPassageSource::new(prompt.clone())),
            None => Box::new(RandomPassageSource::embedded().context("loading word lists")?),
        })
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let _log_guard = configure_logging();
    install_panic_hook();

    let store = FileConfigStore::new();
    let config = cli.apply(store.load());
    tracing::info!(target: "config", mode = %config.mode, language = %config.language, "startup");
    let app = App::new(config, cli.passage_source()?).with_store(Box::new(store));

    enable_raw_mode()?;
    restoring(|| run_in_terminal(app), restore_terminal)
}

fn run_in_terminal(app: App) -> Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(IDLE_INTERVAL_MS)),
    );
    start_tui(&mut terminal, app, &runner)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, Show)?;
    Ok(())
}

/// Runs `body`, then `restore` whatever `body` returned. An error from `body`
/// is reported over one from `restore`.
fn restoring<T>(
    body: impl FnOnce() -> Result<T>,
    restore: impl FnOnce() -> Result<()>,
) -> Result<T> {
    let result = body();
    let restored = restore();
    let value = result?;
    restored?;
    Ok(value)
}

fn start_tui<B: Backend, E: EventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    mut app: App,
    runner: &Runner<E, T>,
) -> Result<()> {
    terminal.draw(|f| current_screen(app.state).render(&mut app, f))?;

    loop {
        match runner.step(app.session.next_deadline()) {
            AppEvent::Key(key) => {
                if app.on_key(key, Instant::now()) == Control::Quit {
                    break;
                }
            }
            AppEvent::Tick => app.on_tick(Instant::now()),
            AppEvent::Resize => {}
            AppEvent::Closed => {
                tracing::warn!(target: "runtime", "event_source_closed");
                break;
            }
        }

        terminal.draw(|f| current_screen(app.state).render(&mut app, f))?;
    }

    Ok(())
}

/// File logging in the state directory; a TUI owns stdout. The guard must be
/// kept alive for buffered lines to reach the file.
fn configure_logging() -> Option<WorkerGuard> {
    let log_dir = AppDirs::log_dir()?;
    std::fs::create_dir_all(&log_dir).ok()?;

    let file_appender = tracing_appender::rolling::never(&log_dir, LOG_FILE);
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(nb_writer)
        .with_ansi(false)
        .try_init()
        .ok()
        .map(|_| guard)
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            // leave raw mode so the panic message is readable
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}
