//! Event handling for TUI.
//!
//! A ticker thread and an input thread feed one channel. The event loop is
//! the only consumer, so handlers never run concurrently. At most one tick is
//! queued at a time: if the loop falls behind (a slow metrics fetch), missed
//! ticks collapse into the pending one.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use tracing::debug;

/// How long the input thread blocks before checking for shutdown.
const INPUT_POLL: Duration = Duration::from_millis(100);

/// Application events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Timer tick for data refresh.
    Tick,
    /// Keyboard input.
    Key(KeyEvent),
    /// Terminal resize (width, height).
    Resize(u16, u16),
}

/// Blocking event stream consumed by the event loop.
pub trait EventSource {
    /// Returns the next event, or `None` once the stream is closed.
    fn next_event(&mut self) -> Option<Event>;
}

/// Event handler backed by a ticker thread and a terminal input thread.
pub struct EventHandler {
    rx: Receiver<Event>,
    tick_pending: Arc<AtomicBool>,
    shutdown: Arc<AtomicBool>,
}

impl EventHandler {
    /// Starts both threads. The first tick fires one `interval` from now.
    pub fn new(interval: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        let tick_pending = Arc::new(AtomicBool::new(false));
        let shutdown = Arc::new(AtomicBool::new(false));

        spawn_ticker(interval, tx.clone(), tick_pending.clone(), shutdown.clone());
        spawn_input(tx, shutdown.clone());

        Self {
            rx,
            tick_pending,
            shutdown,
        }
    }
}

impl EventSource for EventHandler {
    fn next_event(&mut self) -> Option<Event> {
        let event = self.rx.recv().ok()?;
        if event == Event::Tick {
            self.tick_pending.store(false, Ordering::Release);
        }
        Some(event)
    }
}

impl Drop for EventHandler {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Release);
    }
}

fn spawn_ticker(
    interval: Duration,
    tx: Sender<Event>,
    tick_pending: Arc<AtomicBool>,
    shutdown: Arc<AtomicBool>,
) {
    thread::spawn(move || {
        let mut deadline = Instant::now() + interval;
        loop {
            thread::sleep(deadline.saturating_duration_since(Instant::now()));
            if shutdown.load(Ordering::Acquire) {
                break;
            }
            deadline = (deadline + interval).max(Instant::now());

            if tick_pending.swap(true, Ordering::AcqRel) {
                debug!("tick coalesced");
                continue;
            }
            if tx.send(Event::Tick).is_err() {
                break;
            }
        }
    });
}

fn spawn_input(tx: Sender<Event>, shutdown: Arc<AtomicBool>) {
    thread::spawn(move || {
        while !shutdown.load(Ordering::Acquire) {
            // Poll with timeout so shutdown is noticed.
            match event::poll(INPUT_POLL) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(_) => break,
            }
            let event = match event::read() {
                Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => Event::Key(key),
                Ok(CrosstermEvent::Resize(w, h)) => Event::Resize(w, h),
                Ok(_) => continue,
                Err(_) => break,
            };
            if tx.send(event).is_err() {
                break;
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_tick_coalesces() {
        let (tx, rx) = mpsc::channel();
        let tick_pending = Arc::new(AtomicBool::new(false));
        let shutdown = Arc::new(AtomicBool::new(false));
        spawn_ticker(
            Duration::from_millis(5),
            tx,
            tick_pending.clone(),
            shutdown.clone(),
        );

        // Nobody consumes ticks, so only one may be queued.
        thread::sleep(Duration::from_millis(100));
        shutdown.store(true, Ordering::Release);

        let queued: Vec<Event> = rx.try_iter().collect();
        assert_eq!(queued, vec![Event::Tick]);
        assert!(tick_pending.load(Ordering::Acquire));
    }
}
