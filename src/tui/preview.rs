use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Widget;

/// Width of the virtual screen captured text is laid out on. Wider than any
/// real pane so long lines are clipped by the widget, not wrapped by vt100.
const SCREEN_COLS: u16 = 512;

/// Renders captured pane text, interpreting its ANSI escapes.
///
/// Only the first `area.height` lines are shown; the rest are cut.
pub struct PreviewWidget<'a> {
    text: &'a str,
}

impl<'a> PreviewWidget<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }

    fn screen(&self, rows: u16, cols: u16) -> vt100::Parser {
        let mut parser = vt100::Parser::new(rows, cols.max(SCREEN_COLS), 0);
        let visible: Vec<&str> = self.text.lines().take(usize::from(rows)).collect();
        parser.process(visible.join("\r\n").as_bytes());
        parser
    }
}

impl Widget for PreviewWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        let parser = self.screen(area.height, area.width);
        let screen = parser.screen();

        for row in 0..area.height {
            for col in 0..area.width {
                let Some(vt_cell) = screen.cell(row, col) else {
                    continue;
                };
                let Some(buf_cell) = buf.cell_mut((area.x + col, area.y + row)) else {
                    continue;
                };

                let contents = vt_cell.contents();
                if contents.is_empty() {
                    buf_cell.set_char(' ');
                } else {
                    buf_cell.set_symbol(&contents);
                }

                // Default colours fall through to the surrounding style.
                if let Some(fg) = vt100_color_to_ratatui(vt_cell.fgcolor()) {
                    buf_cell.set_fg(fg);
                }
                if let Some(bg) = vt100_color_to_ratatui(vt_cell.bgcolor()) {
                    buf_cell.set_bg(bg);
                }

                let mut mods = Modifier::empty();
                if vt_cell.bold() {
                    mods |= Modifier::BOLD;
                }
                if vt_cell.italic() {
                    mods |= Modifier::ITALIC;
                }
                if vt_cell.underline() {
                    mods |= Modifier::UNDERLINED;
                }
                if vt_cell.inverse() {
                    mods |= Modifier::REVERSED;
                }
                buf_cell.set_style(Style::default().add_modifier(mods));
            }
        }
    }
}

fn vt100_color_to_ratatui(color: vt100::Color) -> Option<Color> {
    match color {
        vt100::Color::Default => None,
        vt100::Color::Idx(i) => Some(Color::Indexed(i)),
        vt100::Color::Rgb(r, g, b) => Some(Color::Rgb(r, g, b)),
    }
}
