use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, HighlightSpacing, List, ListItem, ListState, Paragraph},
};

use crate::tmux::Level;

use super::app::App;
use super::preview::PreviewWidget;
use super::theme::Theme;

pub fn draw(frame: &mut Frame, app: &App, theme: &Theme, version: &str) {
    let area = frame.area();
    frame.render_widget(Block::default().style(theme.base()), area);

    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(60),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(area);

    draw_preview(frame, app, theme, outer[0]);

    let lists = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(outer[1]);
    for (level, rect) in Level::ALL.into_iter().zip(lists.iter()) {
        draw_list(frame, app, theme, level, *rect);
    }

    draw_status(frame, app, theme, version, outer[2]);
}

fn draw_preview(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let block = Block::default()
        .title(" Preview ")
        .borders(Borders::ALL)
        .border_style(theme.unfocused_border());
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(PreviewWidget::new(&app.preview), inner);
}

fn list_title(level: Level, swapping: bool) -> String {
    if swapping {
        format!(" {} ", level.title())
    } else {
        format!(" [{}] {} ", level.number(), level.title())
    }
}

fn draw_list(frame: &mut Frame, app: &App, theme: &Theme, level: Level, area: Rect) {
    let selector = app.selector(level);
    let focused = app.focus == level;

    let block = Block::default()
        .title(list_title(level, app.is_swapping()))
        .borders(Borders::ALL)
        .border_style(theme.border(focused));

    let visible = selector.visible_items();
    let items: Vec<ListItem> = visible
        .iter()
        .map(|entity| {
            let style = if selector.is_marked(entity.id) {
                theme.marked_style()
            } else {
                Style::default()
            };
            ListItem::new(Line::from(Span::styled(entity.name.as_str(), style)))
        })
        .collect();

    let mut state = ListState::default().with_selected(
        selector
            .current()
            .and_then(|id| visible.iter().position(|e| e.id == id)),
    );

    let list = List::new(items)
        .block(block)
        .highlight_style(theme.selected_style())
        .highlight_symbol("→ ")
        .highlight_spacing(HighlightSpacing::Always);
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_status(frame: &mut Frame, app: &App, theme: &Theme, version: &str, area: Rect) {
    let mode = app.input.mode();
    let block = Block::default()
        .title(format!(" {} ", mode.title()))
        .borders(Borders::ALL)
        .border_style(theme.border(app.input.is_active()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.input.is_active() {
        let prompt = Line::from(vec![
            Span::styled("> ", theme.hint_style(true)),
            Span::raw(app.input.input().with_cursor()),
        ]);
        frame.render_widget(Paragraph::new(prompt), inner);
        return;
    }

    let mut spans = Vec::new();
    for (i, hint) in app.status_hints().into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" | "));
        }
        spans.push(Span::styled(hint.text, theme.hint_style(hint.highlighted)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), inner);
    frame.render_widget(
        Paragraph::new(Span::styled(version, theme.unfocused_border())).alignment(Alignment::Right),
        inner,
    );
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::tmux::{Entity, Snapshot};
    use crate::tui::event::AppEvent;

    fn app() -> App {
        let mut app = App::new(false);
        app.handle_event(AppEvent::Refreshed(Ok(Snapshot {
            sessions: vec![Entity::new(1, "main", None)],
            windows: vec![Entity::new(2, "editor", Some(1))],
            panes: vec![Entity::new(3, "vim", Some(2))],
            active_session: Some(1),
            active_window: Some(2),
            active_pane: Some(3),
        })));
        app.preview = "preview line".into();
        app
    }

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(90, 24)).unwrap();
        terminal
            .draw(|f| draw(f, app, &Theme::default(), "v1.2.3"))
            .unwrap();
        let buffer = terminal.backend().buffer();
        (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn renders_lists_preview_and_status() {
        let out = screen(&app());
        assert!(out.contains("[1] Sessions"));
        assert!(out.contains("[3] Panes"));
        assert!(out.contains("→ main"));
        assert!(out.contains("→ editor"));
        assert!(out.contains("preview line"));
        assert!(out.contains("Quit: q"));
        assert!(out.contains("v1.2.3"));
    }

    #[test]
    fn titles_drop_numbers_while_swapping() {
        assert_eq!(list_title(Level::Window, false), " [2] Windows ");
        assert_eq!(list_title(Level::Window, true), " Windows ");
    }

    #[test]
    fn prompt_replaces_hints_in_input_mode() {
        let mut app = app();
        app.handle_event(AppEvent::Key(crossterm::event::KeyEvent::from(
            crossterm::event::KeyCode::Char('r'),
        )));
        let out = screen(&app);
        assert!(out.contains("New name"));
        assert!(out.contains("> main\u{2588}"));
        assert!(!out.contains("Quit: q"));
    }
}
