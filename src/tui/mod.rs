pub mod app;
pub mod event;
pub mod input;
pub mod keymap;
pub mod preview;
pub mod selector;
pub mod theme;
mod ui;

use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;

use anyhow::{Result, bail};
use ratatui::DefaultTerminal;

use crate::config::Config;
use crate::tmux::{Multiplexer, Tmux};

use self::app::{App, Command};
use self::event::{AppEvent, EventQueue};
use self::theme::Theme;

pub fn run(config: &Config) -> Result<()> {
    let tmux: Arc<dyn Multiplexer> = Arc::new(Tmux::new(&config.tmux_binary));
    let mut app = App::new(config.show_all);
    let theme = config.theme.build();

    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, &mut app, &tmux, &theme, config);
    ratatui::restore();
    result?;
    tracing::info!("exiting");

    if let Some(error) = app.error {
        bail!(error);
    }
    Ok(())
}

fn event_loop(
    terminal: &mut DefaultTerminal,
    app: &mut App,
    tmux: &Arc<dyn Multiplexer>,
    theme: &Theme,
    config: &Config,
) -> Result<()> {
    let events = EventQueue::default();
    events.spawn_input();
    events.spawn_ticker(config.tick_interval());

    for command in app.init() {
        dispatch(command, tmux, events.sender());
    }

    loop {
        terminal.draw(|frame| ui::draw(frame, app, theme, crate::VERSION))?;

        let event = events.next()?;
        for command in app.handle_event(event) {
            dispatch(command, tmux, events.sender());
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

/// Run one command on a worker thread; its result comes back as an event.
fn dispatch(command: Command, tmux: &Arc<dyn Multiplexer>, tx: Sender<AppEvent>) {
    tracing::debug!(?command, "dispatch");
    let tmux = Arc::clone(tmux);
    thread::spawn(move || {
        let event = match command {
            Command::Refresh => AppEvent::Refreshed(tmux.snapshot()),
            Command::Preview { level, id } => AppEvent::Preview {
                level,
                id,
                result: tmux.capture(level, id),
            },
            Command::Run(action) => {
                tracing::info!("{}", action.describe());
                let result = tmux.execute(&action);
                AppEvent::ActionDone { action, result }
            }
        };
        // The receiver is gone once the UI has exited.
        let _ = tx.send(event);
    });
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::time::Duration;

    use super::*;
    use crate::tmux::fake::FakeMultiplexer;
    use crate::tmux::{Entity, Level, Snapshot, TmuxAction};

    fn fake() -> Arc<FakeMultiplexer> {
        Arc::new(FakeMultiplexer::with_snapshot(Snapshot {
            sessions: vec![Entity::new(1, "main", None)],
            windows: vec![Entity::new(2, "shell", Some(1))],
            panes: vec![Entity::new(3, "zsh", Some(2))],
            active_session: Some(1),
            active_window: Some(2),
            active_pane: Some(3),
        }))
    }

    fn roundtrip(fake: &Arc<FakeMultiplexer>, command: Command) -> AppEvent {
        let tmux: Arc<dyn Multiplexer> = fake.clone();
        let (tx, rx) = mpsc::channel();
        dispatch(command, &tmux, tx);
        rx.recv_timeout(Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn refresh_delivers_snapshot() {
        let event = roundtrip(&fake(), Command::Refresh);
        let AppEvent::Refreshed(Ok(snapshot)) = event else {
            panic!("unexpected event");
        };
        assert_eq!(snapshot.sessions.len(), 1);
    }

    #[test]
    fn preview_delivers_capture_for_target() {
        let event = roundtrip(
            &fake(),
            Command::Preview {
                level: Level::Pane,
                id: 3,
            },
        );
        let AppEvent::Preview { level, id, result } = event else {
            panic!("unexpected event");
        };
        assert_eq!((level, id), (Level::Pane, 3));
        assert_eq!(result.unwrap(), "contents of %3");
    }

    #[test]
    fn actions_run_and_report_back() {
        let fake = fake();
        let action = TmuxAction::Delete {
            level: Level::Window,
            id: 2,
        };
        let event = roundtrip(&fake, Command::Run(action.clone()));
        let AppEvent::ActionDone { action: done, result } = event else {
            panic!("unexpected event");
        };
        assert_eq!(done, action);
        assert!(result.is_ok());
        assert_eq!(*fake.executed.lock().unwrap(), vec![action]);
    }

    #[test]
    fn app_and_workers_drive_a_full_cycle() {
        let fake = fake();
        let mut app = App::new(false);
        let mut pending = app.init();
        let mut rounds = 0;
        while let Some(command) = pending.pop() {
            rounds += 1;
            assert!(rounds < 10, "command loop did not settle");
            let event = roundtrip(&fake, command);
            pending.extend(app.handle_event(event));
        }
        assert_eq!(app.panes.current(), Some(3));
        assert_eq!(app.preview, "contents of $1");
    }
}
