use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::error::Error;
use std::time::{Duration, Instant};
use tracing::warn;

use crate::{
    countdown::Countdown,
    sentences::{Preset, SentencePool},
    session::{Phase, Session},
};

/// Resolved run settings: command line merged over the saved config
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    pub preset: Preset,
    pub number_of_secs: Option<u32>,
    pub prompt: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug)]
pub struct App {
    pub settings: Settings,
    pool: SentencePool,
    session: Session,
    countdown: Countdown,
}

impl App {
    pub fn new(settings: Settings) -> Result<Self, Box<dyn Error>> {
        Self::with_countdown(settings, Countdown::default())
    }

    pub fn with_countdown(settings: Settings, countdown: Countdown) -> Result<Self, Box<dyn Error>> {
        let preset_pool = SentencePool::for_preset(settings.preset)?;
        let duration_secs = match settings.number_of_secs {
            Some(0) => {
                warn!(
                    fallback_secs = preset_pool.duration_secs(),
                    "ignoring zero-second timer"
                );
                preset_pool.duration_secs()
            }
            Some(secs) => secs,
            None => preset_pool.duration_secs(),
        };

        let pool = match settings.prompt {
            Some(ref prompt) => SentencePool::custom(prompt.clone(), duration_secs)?,
            None => preset_pool,
        };

        let session = Session::new(pool.select_sentence(), duration_secs);

        Ok(Self {
            settings,
            pool,
            session,
            countdown,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn pool(&self) -> &SentencePool {
        &self.pool
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    /// How long the event loop may wait before the next countdown second is due.
    pub fn next_wakeup(&self) -> Option<Duration> {
        self.countdown.time_until_next(Instant::now())
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Flow {
        self.handle_key_at(key, Instant::now())
    }

    pub fn handle_key_at(&mut self, key: KeyEvent, now: Instant) -> Flow {
        if key.kind != KeyEventKind::Press {
            return Flow::Continue;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Flow::Quit;
        }

        if self.session.is_completed() {
            match key.code {
                KeyCode::Esc | KeyCode::Char('q') => return Flow::Quit,
                KeyCode::Char('r') | KeyCode::Enter => self.restart(),
                _ => {}
            }
            return Flow::Continue;
        }

        match key.code {
            KeyCode::Esc => return Flow::Quit,
            KeyCode::Tab => self.restart(),
            KeyCode::Backspace => self.session.backspace(),
            KeyCode::Char(c) => self.session.write(c),
            _ => {}
        }

        self.sync_countdown(now);
        Flow::Continue
    }

    pub fn on_tick(&mut self) -> bool {
        self.on_tick_at(Instant::now())
    }

    /// Feed elapsed countdown periods into the session. Returns true when the
    /// screen needs redrawing.
    pub fn on_tick_at(&mut self, now: Instant) -> bool {
        let fired = self.countdown.poll(now);

        for _ in 0..fired {
            self.session.tick();
            if self.session.is_completed() {
                break;
            }
        }

        self.sync_countdown(now);
        fired > 0
    }

    /// New sentence, cleared input, full timer.
    pub fn restart(&mut self) {
        self.countdown.cancel();
        self.session.restart(self.pool.select_sentence());
    }

    pub fn shutdown(&mut self) {
        self.countdown.cancel();
    }

    fn sync_countdown(&mut self, now: Instant) {
        match self.session.phase() {
            Phase::Running => self.countdown.arm(now),
            Phase::NotStarted | Phase::Completed => self.countdown.cancel(),
        }
    }
}
