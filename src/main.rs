use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
};
use tracing::{error, info};

use typer_zone::{
    app::{App, Flow, Settings},
    config::{Config, ConfigStore, FileConfigStore},
    logging,
    runtime::{CrosstermEventSource, FixedTicker, Runner, TyperEvent},
    sentences::Preset,
};

/// race the countdown through a random sentence and see your wpm and accuracy
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal typing test. Type the sentence shown before the timer runs out; the timer starts on your first keystroke. Typing speed and accuracy are shown when you finish."
)]
pub struct Cli {
    /// sentence pool and timer preset [default: classic, or the saved preset]
    #[clap(short = 'm', long, value_enum)]
    preset: Option<Preset>,

    /// number of seconds on the countdown (overrides the preset's timer)
    #[clap(short = 's', long, value_parser = clap::value_parser!(u32).range(1..))]
    number_of_secs: Option<u32>,

    /// custom sentence to type instead of one from the pool
    #[clap(short = 'p', long)]
    prompt: Option<String>,

    /// write logs to this file (also enabled by setting TYPER_ZONE_LOG)
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// remember the chosen preset and timer as defaults
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Merge command line flags over the saved config
    fn to_settings(&self, config: &Config) -> Settings {
        Settings {
            preset: self.preset.unwrap_or(config.preset),
            number_of_secs: self.number_of_secs.or(config.number_of_secs),
            prompt: self.prompt.clone(),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if matches!(cli.prompt.as_deref(), Some(p) if p.is_empty()) {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::InvalidValue, "prompt must not be empty")
            .exit();
    }

    logging::init(cli.log_file.as_deref())?;

    let store = FileConfigStore::new();
    let settings = cli.to_settings(&store.load());
    if cli.save_config {
        store.save(&Config::from(&settings))?;
        info!(path = %store.path().display(), "saved config");
    }

    let mut app = App::new(settings)?;

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);
    app.shutdown();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        error!(error = %e, "event loop failed");
    }
    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());

    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    loop {
        let redraw = match runner.step_within(app.next_wakeup()) {
            TyperEvent::Tick => app.on_tick(),
            TyperEvent::Resize => true,
            TyperEvent::Key(key) => match app.handle_key(key) {
                Flow::Quit => break,
                Flow::Continue => true,
            },
        };

        if redraw {
            terminal.draw(|f| f.render_widget(&*app, f.area()))?;
        }
    }

    Ok(())
}
