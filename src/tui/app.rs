//! Main TUI application.

use std::io::{self, Stdout};

use chrono::{DateTime, Local};
use crossterm::event::KeyEvent;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};
use tracing::{debug, info, warn};

use crate::config::{DashboardConfig, Target, resolve_entity};
use crate::entity::TrackedEntity;
use crate::error::DashboardError;
use crate::fmt::NumberFormat;
use crate::poller;
use crate::source::{DescriptorSource, MetricsSource};

use super::event::{Event, EventHandler, EventSource};
use super::input::{KeyAction, handle_key};
use super::layout;
use super::render::{Panel, compose, draw};
use super::state::Screen;

/// Event loop state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Running,
    Terminating,
}

/// Main TUI application.
pub struct App<S> {
    source: S,
    entity: TrackedEntity,
    config: DashboardConfig,
    format: NumberFormat,
    screen: Screen,
    last_update: Option<DateTime<Local>>,
    phase: Phase,
}

impl<S: MetricsSource + DescriptorSource> App<S> {
    /// Resolves the target and sizes the first generation.
    ///
    /// All startup checks happen here, before the terminal is touched.
    pub fn new(
        source: S,
        target: Target,
        config: DashboardConfig,
        (width, height): (u16, u16),
    ) -> Result<Self, DashboardError> {
        let format = NumberFormat::new(&config.locale)?;
        if layout::series_capacity(width).is_none() {
            return Err(DashboardError::TerminalTooNarrow {
                width,
                min: layout::min_width(),
            });
        }
        let entity = resolve_entity(&source, &target)?;
        let screen = Screen::build(&entity, &config, width, height);

        Ok(Self {
            source,
            entity,
            config,
            format,
            screen,
            last_update: None,
            phase: Phase::Running,
        })
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn entity(&self) -> &TrackedEntity {
        &self.entity
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Fetches one reading and pushes it into the series.
    ///
    /// A failed fetch is logged and leaves every series untouched.
    pub fn on_tick(&mut self) {
        match poller::poll(&self.source, &self.entity) {
            Ok(reading) => {
                let samples = reading.band_samples(&self.entity);
                debug!(?samples, "tick");
                if let Some(generation) = self.screen.generation_mut() {
                    generation.record(&samples);
                }
                self.last_update = Some(Local::now());
            }
            Err(err) => {
                warn!(
                    entity = %self.entity.describe(),
                    error = %err,
                    "metrics fetch failed; keeping previous samples"
                );
            }
        }
    }

    /// Replaces the whole generation for the new size.
    ///
    /// The entity resolved at startup is reused as is.
    pub fn on_resize(&mut self, width: u16, height: u16) {
        self.screen = Screen::build(&self.entity, &self.config, width, height);
        match &self.screen {
            Screen::Ready(generation) => {
                info!(width, height, capacity = generation.capacity, "layout rebuilt");
            }
            Screen::TooNarrow { .. } => warn!(width, height, "terminal too narrow for plots"),
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if handle_key(key) == KeyAction::Quit {
            debug!("quit requested");
            self.phase = Phase::Terminating;
        }
    }

    /// Panels for the current state.
    pub fn panels(&self) -> Vec<Panel> {
        compose(&self.entity, &self.screen, &self.format, self.last_update)
    }

    /// Runs until a quit key arrives or the event stream closes.
    ///
    /// Draws once before waiting for the first event.
    pub fn run_loop<B: Backend, E: EventSource>(
        &mut self,
        terminal: &mut Terminal<B>,
        events: &mut E,
    ) -> Result<(), DashboardError> {
        self.draw(terminal)?;

        while self.phase == Phase::Running {
            let Some(event) = events.next_event() else {
                debug!("event stream closed");
                self.phase = Phase::Terminating;
                break;
            };
            match event {
                Event::Tick => {
                    self.on_tick();
                    self.draw(terminal)?;
                }
                Event::Resize(width, height) => {
                    self.on_resize(width, height);
                    terminal.clear()?;
                    self.draw(terminal)?;
                }
                Event::Key(key) => self.on_key(key),
            }
        }
        Ok(())
    }

    fn draw<B: Backend>(&self, terminal: &mut Terminal<B>) -> Result<(), DashboardError> {
        let panels = self.panels();
        terminal.draw(|frame| draw(frame, &panels))?;
        Ok(())
    }

    /// Runs the dashboard on the real terminal.
    pub fn run(mut self) -> Result<(), DashboardError> {
        let mut guard = TerminalGuard::enter()?;
        let mut events = EventHandler::new(self.config.interval);
        info!(entity = %self.entity.describe(), interval = ?self.config.interval, "dashboard started");
        self.run_loop(&mut guard.terminal, &mut events)
    }
}

/// Raw mode plus alternate screen, restored on drop.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let setup = execute!(io::stdout(), EnterAlternateScreen)
            .and_then(|()| Terminal::new(CrosstermBackend::new(io::stdout())));
        match setup {
            Ok(terminal) => {
                let mut guard = Self { terminal };
                guard.terminal.hide_cursor()?;
                Ok(guard)
            }
            Err(err) => {
                let _ = execute!(io::stdout(), LeaveAlternateScreen);
                let _ = disable_raw_mode();
                Err(err)
            }
        }
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}
