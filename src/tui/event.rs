use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEvent};

use crate::tmux::{EntityId, Level, Snapshot, TmuxAction};

/// Everything the main loop reacts to, in arrival order.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize(u16, u16),
    Tick,
    Refreshed(Result<Snapshot>),
    Preview {
        level: Level,
        id: EntityId,
        result: Result<String>,
    },
    ActionDone {
        action: TmuxAction,
        result: Result<()>,
    },
}

/// Single-consumer queue fed by the input thread, the ticker thread and the
/// worker threads that run tmux.
pub struct EventQueue {
    tx: Sender<AppEvent>,
    rx: Receiver<AppEvent>,
}

impl Default for EventQueue {
    fn default() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }
}

impl EventQueue {
    pub fn sender(&self) -> Sender<AppEvent> {
        self.tx.clone()
    }

    /// Forward terminal key and resize events.
    pub fn spawn_input(&self) {
        let tx = self.sender();
        thread::spawn(move || {
            loop {
                let event = match event::read() {
                    Ok(Event::Key(key)) => AppEvent::Key(key),
                    Ok(Event::Resize(w, h)) => AppEvent::Resize(w, h),
                    Ok(_) => continue,
                    Err(e) => {
                        tracing::error!("terminal input error: {e}");
                        break;
                    }
                };
                if tx.send(event).is_err() {
                    break;
                }
            }
        });
    }

    /// Emit a [`AppEvent::Tick`] every `interval`.
    pub fn spawn_ticker(&self, interval: Duration) {
        let tx = self.sender();
        thread::spawn(move || {
            loop {
                thread::sleep(interval);
                if tx.send(AppEvent::Tick).is_err() {
                    break;
                }
            }
        });
    }

    /// Block until the next event.
    pub fn next(&self) -> Result<AppEvent> {
        self.rx.recv().context("event channel closed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_arrive_in_send_order() {
        let queue = EventQueue::default();
        let tx = queue.sender();
        tx.send(AppEvent::Tick).unwrap();
        tx.send(AppEvent::Resize(80, 24)).unwrap();
        assert!(matches!(queue.next().unwrap(), AppEvent::Tick));
        assert!(matches!(queue.next().unwrap(), AppEvent::Resize(80, 24)));
    }

    #[test]
    fn ticker_emits_ticks() {
        let queue = EventQueue::default();
        queue.spawn_ticker(Duration::from_millis(5));
        assert!(matches!(queue.next().unwrap(), AppEvent::Tick));
        assert!(matches!(queue.next().unwrap(), AppEvent::Tick));
    }
}
