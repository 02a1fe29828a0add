use crossterm::event::{KeyCode, KeyModifiers};

use crate::tmux::Level;

// ── Actions ──────────────────────────────────────────────────────────

/// Every discrete action available from the main (normal-mode) screen.
///
/// Actions are context-free; `App` decides what they mean for the focused
/// level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Focus(Level),
    MoveUp,
    MoveDown,
    GoTo,
    Delete,
    New,
    NewNameless,
    Rename,
    SplitHorizontal,
    SplitVertical,
    Swap,
    Filter,
    ToggleShowAll,
}

// ── Keybinding ───────────────────────────────────────────────────────

/// A single key → action mapping with the hint shown in the status bar.
#[derive(Debug, Clone)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
    pub action: Action,
    /// Status-bar hint, e.g. `"Delete: d"`. Empty for aliases.
    pub hint: &'static str,
}

const fn bind(code: KeyCode, action: Action, hint: &'static str) -> KeyBinding {
    KeyBinding {
        code,
        modifiers: KeyModifiers::NONE,
        action,
        hint,
    }
}

const fn ctrl(c: char, action: Action) -> KeyBinding {
    KeyBinding {
        code: KeyCode::Char(c),
        modifiers: KeyModifiers::CONTROL,
        action,
        hint: "",
    }
}

// ── KeyMap ────────────────────────────────────────────────────────────

/// Declarative table of the normal-mode key bindings.
pub struct KeyMap {
    pub normal: Vec<KeyBinding>,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            normal: default_normal_bindings(),
        }
    }
}

impl KeyMap {
    /// Look up the action bound to a key. Shifted letters arrive as their
    /// uppercase char, so SHIFT is ignored for character keys.
    pub fn lookup(&self, code: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
        let modifiers = if matches!(code, KeyCode::Char(_)) {
            modifiers.difference(KeyModifiers::SHIFT)
        } else {
            modifiers
        };
        self.normal
            .iter()
            .find(|kb| kb.code == code && kb.modifiers == modifiers)
            .map(|kb| kb.action)
    }

    /// The hint for an action, from its first binding that has one.
    pub fn hint(&self, action: Action) -> Option<&'static str> {
        self.normal
            .iter()
            .find(|kb| kb.action == action && !kb.hint.is_empty())
            .map(|kb| kb.hint)
    }
}

#[allow(clippy::enum_glob_use)]
fn default_normal_bindings() -> Vec<KeyBinding> {
    use Action::*;

    vec![
        bind(KeyCode::Char('q'), Quit, "Quit: q"),
        bind(KeyCode::Esc, Quit, ""),
        ctrl('c', Quit),
        bind(KeyCode::Char('1'), Focus(Level::Session), ""),
        bind(KeyCode::Char('2'), Focus(Level::Window), ""),
        bind(KeyCode::Char('3'), Focus(Level::Pane), ""),
        bind(KeyCode::Char('k'), MoveUp, ""),
        bind(KeyCode::Up, MoveUp, ""),
        ctrl('p', MoveUp),
        bind(KeyCode::Char('j'), MoveDown, ""),
        bind(KeyCode::Down, MoveDown, ""),
        ctrl('n', MoveDown),
        bind(KeyCode::Enter, GoTo, "Go to: <enter>"),
        bind(KeyCode::Char('d'), Delete, "Delete: d"),
        bind(KeyCode::Char('s'), Swap, "Swap: s"),
        bind(KeyCode::Char('n'), New, "New: n"),
        bind(KeyCode::Char('N'), NewNameless, "New (nameless): N"),
        bind(KeyCode::Char('r'), Rename, "Rename: r"),
        bind(KeyCode::Char('v'), SplitVertical, "Vertical split: v"),
        bind(KeyCode::Char('h'), SplitHorizontal, "Horizontal split: h"),
        bind(KeyCode::Char('a'), ToggleShowAll, "Show all: a"),
        bind(KeyCode::Char('/'), Filter, "Filter: /"),
    ]
}

// ── Tests ────────────────────────────────────────────────────────────
