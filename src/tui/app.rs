use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::tmux::{EntityId, Level, Snapshot, TmuxAction};

use super::event::AppEvent;
use super::input::{InputController, InputMode, InputOutcome};
use super::keymap::{Action, KeyMap};
use super::selector::ListSelector;

pub const NO_SESSIONS: &str = "No sessions found. Is tmux running?";

/// Work the main loop must hand to a worker thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Refresh,
    Preview { level: Level, id: EntityId },
    Run(TmuxAction),
}

/// Key dispatch mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Input(InputMode),
    SwapPending,
}

/// One status-bar hint; `highlighted` hints use the accent colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hint {
    pub text: &'static str,
    pub highlighted: bool,
}

impl Hint {
    fn plain(text: &'static str) -> Self {
        Self {
            text,
            highlighted: false,
        }
    }
}

pub struct App {
    pub sessions: ListSelector,
    pub windows: ListSelector,
    pub panes: ListSelector,
    pub focus: Level,
    pub show_all: bool,
    /// Entity picked as the first half of a swap, at the focused level.
    pub swap_src: Option<EntityId>,
    pub input: InputController,
    /// Committed filter text, shared by all three lists.
    pub filter: String,
    pub preview: String,
    /// Fatal condition to report once the TUI has shut down.
    pub error: Option<String>,
    pub should_quit: bool,
    keymap: KeyMap,
}

impl App {
    pub fn new(show_all: bool) -> Self {
        Self {
            sessions: ListSelector::new(Level::Session),
            windows: ListSelector::new(Level::Window),
            panes: ListSelector::new(Level::Pane),
            focus: Level::Session,
            show_all,
            swap_src: None,
            input: InputController::default(),
            filter: String::new(),
            preview: String::new(),
            error: None,
            should_quit: false,
            keymap: KeyMap::default(),
        }
    }

    /// Commands to issue before the first event.
    pub fn init(&self) -> Vec<Command> {
        vec![Command::Refresh]
    }

    pub fn selector(&self, level: Level) -> &ListSelector {
        match level {
            Level::Session => &self.sessions,
            Level::Window => &self.windows,
            Level::Pane => &self.panes,
        }
    }

    fn selector_mut(&mut self, level: Level) -> &mut ListSelector {
        match level {
            Level::Session => &mut self.sessions,
            Level::Window => &mut self.windows,
            Level::Pane => &mut self.panes,
        }
    }

    pub fn focused(&self) -> &ListSelector {
        self.selector(self.focus)
    }

    pub fn is_swapping(&self) -> bool {
        self.swap_src.is_some()
    }

    /// Which handler owns the keyboard. A pending swap takes priority over
    /// an open prompt.
    pub fn mode(&self) -> Mode {
        if self.is_swapping() {
            Mode::SwapPending
        } else if self.input.is_active() {
            Mode::Input(self.input.mode())
        } else {
            Mode::Normal
        }
    }

    fn focused_target(&self) -> Option<(Level, EntityId)> {
        self.focused().current().map(|id| (self.focus, id))
    }

    fn preview_command(&self) -> Option<Command> {
        self.focused_target()
            .map(|(level, id)| Command::Preview { level, id })
    }

    pub fn handle_event(&mut self, event: AppEvent) -> Vec<Command> {
        match event {
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Tick => vec![Command::Refresh],
            AppEvent::Resize(..) => vec![],
            AppEvent::Refreshed(Ok(snapshot)) => self.apply_snapshot(snapshot),
            AppEvent::Refreshed(Err(e)) => {
                tracing::warn!("refresh failed: {e:#}");
                vec![]
            }
            AppEvent::Preview { level, id, result } => {
                match result {
                    Ok(text) if self.focused_target() == Some((level, id)) => self.preview = text,
                    Ok(_) => {}
                    Err(e) => tracing::warn!("preview of {} failed: {e:#}", level.target(id)),
                }
                vec![]
            }
            AppEvent::ActionDone { action, result } => {
                if let Err(e) = result {
                    tracing::warn!("{e:#}");
                }
                if action.terminates() {
                    self.should_quit = true;
                    vec![]
                } else {
                    vec![Command::Refresh]
                }
            }
        }
    }

    /// Merge a fresh snapshot into the three lists, keeping selections that
    /// are still visible.
    fn apply_snapshot(&mut self, snapshot: Snapshot) -> Vec<Command> {
        if snapshot.sessions.is_empty() {
            self.error = Some(NO_SESSIONS.to_string());
            self.should_quit = true;
            return vec![];
        }

        // The first snapshot starts on whatever tmux has active.
        let seed = self.sessions.current().is_none() && self.filter.is_empty();

        for level in Level::ALL {
            let selector = self.selector_mut(level);
            selector.set_items(snapshot.entities(level).to_vec());
            if seed {
                selector.select(snapshot.active(level));
            }
        }
        tracing::debug!(
            sessions = snapshot.sessions.len(),
            windows = snapshot.windows.len(),
            panes = snapshot.panes.len(),
            "refreshed"
        );

        self.sync();
        self.preview_command().into_iter().collect()
    }

    /// Re-scope windows and panes to the selection above them, then make
    /// every selection visible again.
    fn sync(&mut self) {
        self.sessions.update();
        let window_parent = if self.show_all {
            None
        } else {
            self.sessions.current()
        };
        self.windows.set_parent(window_parent);
        self.windows.update();
        let pane_parent = if self.show_all {
            None
        } else {
            self.windows.current()
        };
        self.panes.set_parent(pane_parent);
        self.panes.update();
    }

    fn set_filter(&mut self, filter: String) {
        for level in Level::ALL {
            self.selector_mut(level).set_filter(&filter);
        }
        self.filter = filter;
    }

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Command> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }

        let before = self.focused_target();
        let mut commands = match self.mode() {
            Mode::SwapPending => self.handle_swap_key(key),
            Mode::Input(_) => self.handle_input_key(key),
            Mode::Normal => self.handle_normal_key(key),
        };

        self.sync();
        let after = self.focused_target();
        let wants_preview = commands
            .iter()
            .any(|c| matches!(c, Command::Preview { .. }));
        if before != after && !wants_preview {
            commands.extend(self.preview_command());
        }
        commands
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Vec<Command> {
        let Some(action) = self.keymap.lookup(key.code, key.modifiers) else {
            return vec![];
        };
        let level = self.focus;
        let current = self.focused().current();

        match action {
            Action::Focus(level) => {
                self.focus = level;
                return self.preview_command().into_iter().collect();
            }
            Action::GoTo => {
                if let Some(id) = current {
                    return vec![Command::Run(TmuxAction::GoTo { level, id })];
                }
            }
            Action::Delete => {
                if let Some(id) = current {
                    return vec![Command::Run(TmuxAction::Delete { level, id })];
                }
            }
            Action::New => {
                if let Some(mode) = InputMode::new_for(level) {
                    self.input.open(mode, "");
                }
            }
            Action::Rename => {
                if let Some(mode) = InputMode::rename_for(level)
                    && let Some(entity) = self.focused().selected()
                {
                    let name = entity.name.clone();
                    self.input.open(mode, &name);
                }
            }
            Action::NewNameless => {
                if level.is_nameable() {
                    return vec![Command::Run(self.create_action(level, None))];
                }
            }
            Action::SplitHorizontal | Action::SplitVertical => {
                if level == Level::Pane
                    && let Some(pane) = current
                {
                    let horizontal = action == Action::SplitHorizontal;
                    return vec![Command::Run(TmuxAction::Split { pane, horizontal })];
                }
            }
            Action::Swap => {
                if level.is_swappable() && current.is_some() {
                    self.swap_src = current;
                    self.selector_mut(level).mark_selection();
                }
            }
            Action::Filter => {
                let filter = self.filter.clone();
                self.input.open(InputMode::Filter, &filter);
            }
            Action::Quit | Action::MoveUp | Action::MoveDown | Action::ToggleShowAll => {
                self.apply_shared(action);
            }
        }
        vec![]
    }

    /// Actions that behave the same in normal and swap-pending mode.
    fn apply_shared(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::MoveUp => self.selector_mut(self.focus).select_previous(),
            Action::MoveDown => self.selector_mut(self.focus).select_next(),
            Action::ToggleShowAll => self.show_all = !self.show_all,
            _ => {}
        }
    }

    fn create_action(&self, level: Level, name: Option<String>) -> TmuxAction {
        let parent = match level {
            Level::Session => None,
            Level::Window => self.sessions.current(),
            Level::Pane => self.windows.current(),
        };
        TmuxAction::Create {
            level,
            parent,
            name,
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) -> Vec<Command> {
        match self.input.handle_key(key) {
            InputOutcome::Editing => vec![],
            InputOutcome::Cancelled(InputMode::Filter) => {
                self.set_filter(String::new());
                vec![]
            }
            InputOutcome::Cancelled(_) => vec![],
            InputOutcome::Submitted(InputMode::Filter, text) => {
                self.set_filter(text);
                vec![]
            }
            InputOutcome::Submitted(mode, text) => {
                let Some(level) = mode.level() else {
                    return vec![];
                };
                if text.is_empty() {
                    tracing::debug!("discarding empty {mode:?} input");
                    return vec![];
                }
                let action = if matches!(mode, InputMode::NewSession | InputMode::NewWindow) {
                    self.create_action(level, Some(text))
                } else {
                    let Some(id) = self.selector(level).current() else {
                        return vec![];
                    };
                    TmuxAction::Rename {
                        level,
                        id,
                        name: text,
                    }
                };
                vec![Command::Run(action)]
            }
        }
    }

    fn handle_swap_key(&mut self, key: KeyEvent) -> Vec<Command> {
        match key.code {
            KeyCode::Esc => {
                self.swap_src = None;
                self.windows.clear_marks();
                self.panes.clear_marks();
                vec![]
            }
            KeyCode::Char('s' | ' ') | KeyCode::Enter => {
                let src = self.swap_src.take();
                self.windows.clear_marks();
                self.panes.clear_marks();
                match (src, self.focused().current()) {
                    (Some(src), Some(dst)) if src != dst => {
                        vec![Command::Run(TmuxAction::Swap {
                            level: self.focus,
                            src,
                            dst,
                        })]
                    }
                    _ => vec![],
                }
            }
            code => {
                if let Some(
                    action @ (Action::Quit
                    | Action::MoveUp
                    | Action::MoveDown
                    | Action::ToggleShowAll),
                ) = self.keymap.lookup(code, key.modifiers)
                {
                    self.apply_shared(action);
                }
                vec![]
            }
        }
    }

    /// Status-bar hints for the current mode and focus.
    pub fn status_hints(&self) -> Vec<Hint> {
        let hint = |action| self.keymap.hint(action).unwrap_or_default();
        let mut hints = vec![Hint::plain(hint(Action::Quit))];

        if self.is_swapping() {
            hints.push(Hint {
                text: "Swap: s/<space>/<enter>",
                highlighted: true,
            });
            hints.push(Hint::plain("Cancel: <esc>"));
        } else {
            hints.push(Hint::plain(hint(Action::GoTo)));
            hints.push(Hint::plain(hint(Action::Delete)));
            if self.focus.is_swappable() {
                hints.push(Hint::plain(hint(Action::Swap)));
            }
            let extra: &[Action] = if self.focus.is_nameable() {
                &[Action::New, Action::NewNameless, Action::Rename]
            } else {
                &[Action::SplitVertical, Action::SplitHorizontal]
            };
            hints.extend(extra.iter().map(|&a| Hint::plain(hint(a))));
        }

        hints.push(Hint {
            text: hint(Action::ToggleShowAll),
            highlighted: self.show_all,
        });
        hints.push(Hint {
            text: hint(Action::Filter),
            highlighted: !self.filter.is_empty(),
        });
        hints
    }
}
