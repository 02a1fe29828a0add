use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tmux::Level;

/// Which text prompt, if any, currently owns the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Filter,
    NewSession,
    NewWindow,
    RenameSession,
    RenameWindow,
}

impl InputMode {
    /// Creation prompt for a level; panes cannot be created by name.
    pub fn new_for(level: Level) -> Option<Self> {
        match level {
            Level::Session => Some(Self::NewSession),
            Level::Window => Some(Self::NewWindow),
            Level::Pane => None,
        }
    }

    pub fn rename_for(level: Level) -> Option<Self> {
        match level {
            Level::Session => Some(Self::RenameSession),
            Level::Window => Some(Self::RenameWindow),
            Level::Pane => None,
        }
    }

    /// The level a create/rename prompt acts on.
    pub fn level(self) -> Option<Level> {
        match self {
            Self::NewSession | Self::RenameSession => Some(Level::Session),
            Self::NewWindow | Self::RenameWindow => Some(Level::Window),
            Self::Normal | Self::Filter => None,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Normal => "Status",
            Self::Filter => "Filter",
            Self::NewSession | Self::NewWindow | Self::RenameSession | Self::RenameWindow => {
                "New name"
            }
        }
    }
}

/// Single-line text buffer with a byte-offset cursor.
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    value: String,
    cursor: usize,
}

impl TextInput {
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replace the contents and put the cursor at the end.
    pub fn set_value(&mut self, value: &str) {
        value.clone_into(&mut self.value);
        self.cursor = self.value.len();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.value)
    }

    fn prev_boundary(&self) -> usize {
        self.value[..self.cursor]
            .chars()
            .next_back()
            .map_or(0, |c| self.cursor - c.len_utf8())
    }

    fn next_boundary(&self) -> usize {
        self.value[self.cursor..]
            .chars()
            .next()
            .map_or(self.cursor, |c| self.cursor + c.len_utf8())
    }

    /// Start of the word before the cursor, skipping trailing whitespace.
    fn word_start(&self) -> usize {
        let before = self.value[..self.cursor].trim_end();
        before
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map_or(0, |(i, c)| i + c.len_utf8())
    }

    fn delete_back_to(&mut self, start: usize) {
        self.value.drain(start..self.cursor);
        self.cursor = start;
    }

    /// Apply a line-editing key. Returns `false` if the key was not consumed.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        self.cursor = self.cursor.min(self.value.len());
        let ctrl = modifiers.contains(KeyModifiers::CONTROL);
        let alt = modifiers.contains(KeyModifiers::ALT);

        match code {
            KeyCode::Left => self.cursor = self.prev_boundary(),
            KeyCode::Right => self.cursor = self.next_boundary(),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.value.len(),
            KeyCode::Char('a') if ctrl => self.cursor = 0,
            KeyCode::Char('e') if ctrl => self.cursor = self.value.len(),
            KeyCode::Char('u') if ctrl => self.delete_back_to(0),
            KeyCode::Char('w') if ctrl => self.delete_back_to(self.word_start()),
            KeyCode::Backspace if alt => self.delete_back_to(self.word_start()),
            KeyCode::Backspace => self.delete_back_to(self.prev_boundary()),
            KeyCode::Delete => {
                let end = self.next_boundary();
                self.value.drain(self.cursor..end);
            }
            KeyCode::Char(c) if !ctrl && !alt => {
                self.value.insert(self.cursor, c);
                self.cursor += c.len_utf8();
            }
            _ => return false,
        }
        true
    }

    /// The buffer with a block cursor drawn at the cursor position.
    pub fn with_cursor(&self) -> String {
        let (before, after) = self.value.split_at(self.cursor.min(self.value.len()));
        format!("{before}\u{2588}{after}")
    }
}

/// Result of feeding a key to an open prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputOutcome {
    /// The key edited the buffer (or was ignored); the prompt stays open.
    Editing,
    /// Escape: the prompt closed without committing.
    Cancelled(InputMode),
    /// Enter: the prompt closed, committing its text.
    Submitted(InputMode, String),
}

/// Owns the active prompt mode and its text buffer.
#[derive(Debug, Clone)]
pub struct InputController {
    mode: InputMode,
    input: TextInput,
}

impl Default for InputController {
    fn default() -> Self {
        Self {
            mode: InputMode::Normal,
            input: TextInput::default(),
        }
    }
}

impl InputController {
    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn is_active(&self) -> bool {
        self.mode != InputMode::Normal
    }

    pub fn input(&self) -> &TextInput {
        &self.input
    }

    /// Open a prompt with the buffer pre-filled with `seed`.
    pub fn open(&mut self, mode: InputMode, seed: &str) {
        self.mode = mode;
        self.input.set_value(seed);
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> InputOutcome {
        if !self.is_active() {
            return InputOutcome::Editing;
        }

        match key.code {
            KeyCode::Esc => {
                let mode = std::mem::replace(&mut self.mode, InputMode::Normal);
                self.input.clear();
                InputOutcome::Cancelled(mode)
            }
            KeyCode::Enter => {
                let mode = std::mem::replace(&mut self.mode, InputMode::Normal);
                InputOutcome::Submitted(mode, self.input.take())
            }
            code => {
                self.input.handle_key(code, key.modifiers);
                InputOutcome::Editing
            }
        }
    }
}
