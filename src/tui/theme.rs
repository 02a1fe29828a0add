use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

/// Semantic colour theme for the entire TUI.
///
/// Every colour used by the renderer is stored here so the user can
/// override any of them via `[theme]` in `config.toml`.
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub foreground: Color,
    /// Focused border, highlighted hints and the prompt.
    pub accent: Color,
    /// Entities marked as a swap source.
    pub secondary: Color,
    /// The selected row.
    pub selection: Color,
    pub border_unfocused: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::Rgb(0x28, 0x2A, 0x36),
            foreground: Color::Rgb(0xE3, 0xE3, 0xDE),
            accent: Color::Rgb(0x50, 0xFA, 0x7B),
            secondary: Color::Rgb(0xFF, 0xB8, 0x6C),
            selection: Color::Rgb(0xBD, 0x93, 0xF9),
            border_unfocused: Color::Rgb(0x62, 0x72, 0xA4),
        }
    }
}

impl Theme {
    pub fn base(&self) -> Style {
        Style::default().fg(self.foreground).bg(self.background)
    }

    pub fn focused_border(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn unfocused_border(&self) -> Style {
        Style::default().fg(self.border_unfocused)
    }

    pub fn border(&self, focused: bool) -> Style {
        if focused {
            self.focused_border()
        } else {
            self.unfocused_border()
        }
    }

    pub fn selected_style(&self) -> Style {
        Style::default()
            .fg(self.selection)
            .add_modifier(Modifier::BOLD)
    }

    pub fn marked_style(&self) -> Style {
        Style::default().fg(self.secondary)
    }

    pub fn hint_style(&self, highlighted: bool) -> Style {
        if highlighted {
            Style::default().fg(self.accent)
        } else {
            Style::default().fg(self.foreground)
        }
    }
}

// ── Config deserialization ────────────────────────────────────────────

/// All-optional mirror of [`Theme`] for the `[theme]` section of
/// `config.toml`. Unset or unparseable fields keep their default.
#[derive(Debug, Default, Deserialize, Clone, PartialEq, Eq)]
pub struct ThemeConfig {
    pub background: Option<String>,
    pub foreground: Option<String>,
    pub accent: Option<String>,
    pub secondary: Option<String>,
    pub selection: Option<String>,
    pub border_unfocused: Option<String>,
}

/// Parse a colour string into a ratatui `Color`.
///
/// Supports named colours (`"cyan"`, `"dark_gray"`, ...), `"rgb(R,G,B)"` and
/// `"#RRGGBB"`.
fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    if let Some(inner) = s.strip_prefix("rgb(").and_then(|r| r.strip_suffix(')')) {
        let parts: Vec<&str> = inner.split(',').collect();
        if let [r, g, b] = parts.as_slice() {
            return Some(Color::Rgb(
                r.trim().parse().ok()?,
                g.trim().parse().ok()?,
                b.trim().parse().ok()?,
            ));
        }
        return None;
    }

    if let Some(hex) = s.strip_prefix('#') {
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        return Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?));
    }

    let lower = s.to_lowercase().replace('-', "_");
    match lower.as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "gray" | "grey" => Some(Color::Gray),
        "dark_gray" | "dark_grey" | "darkgray" | "darkgrey" => Some(Color::DarkGray),
        "light_red" | "lightred" => Some(Color::LightRed),
        "light_green" | "lightgreen" => Some(Color::LightGreen),
        "light_yellow" | "lightyellow" => Some(Color::LightYellow),
        "light_blue" | "lightblue" => Some(Color::LightBlue),
        "light_magenta" | "lightmagenta" => Some(Color::LightMagenta),
        "light_cyan" | "lightcyan" => Some(Color::LightCyan),
        "white" => Some(Color::White),
        "reset" | "default" => Some(Color::Reset),
        _ => None,
    }
}

fn apply(target: &mut Color, source: Option<&String>) {
    let Some(s) = source else {
        return;
    };
    match parse_color(s) {
        Some(color) => *target = color,
        None => tracing::warn!("ignoring unknown theme colour {s:?}"),
    }
}

impl ThemeConfig {
    /// Build a `Theme` starting from defaults, overriding any fields that
    /// were set in the config file.
    pub fn build(&self) -> Theme {
        let mut t = Theme::default();

        apply(&mut t.background, self.background.as_ref());
        apply(&mut t.foreground, self.foreground.as_ref());
        apply(&mut t.accent, self.accent.as_ref());
        apply(&mut t.secondary, self.secondary.as_ref());
        apply(&mut t.selection, self.selection.as_ref());
        apply(&mut t.border_unfocused, self.border_unfocused.as_ref());

        t
    }
}
