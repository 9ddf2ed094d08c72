use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::presenter::{
    OutageBlock, Panel, Presenter, ERROR_MESSAGE, LOADING_MESSAGE, NO_MATCHES_MESSAGE,
};

pub const WINDOW_TITLE: &str = "İZSU Su Kesintileri";
pub const SEARCH_PLACEHOLDER: &str = "İlçe veya mahalle ara...";
pub const PANEL_LABEL: &str = "Güncel Kesintiler";

const SEARCH_HEIGHT: u16 = 3;
/// Rows above and below the panel content: the search field and the panel borders.
pub const CHROME_HEIGHT: u16 = SEARCH_HEIGHT + 2;
/// Columns taken by the panel's side borders.
pub const CHROME_WIDTH: u16 = 2;

pub fn draw(frame: &mut Frame, presenter: &Presenter) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(SEARCH_HEIGHT), Constraint::Min(0)])
        .split(frame.area());

    draw_search(frame, chunks[0], presenter.query());
    draw_panel(frame, chunks[1], presenter);
}

fn draw_search(frame: &mut Frame, area: Rect, query: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(WINDOW_TITLE)
        .title_style(Style::default().add_modifier(Modifier::BOLD));
    let text = if query.is_empty() {
        Line::styled(SEARCH_PLACEHOLDER, Style::default().fg(Color::DarkGray))
    } else {
        Line::raw(query)
    };
    frame.render_widget(Paragraph::new(text).block(block), area);

    let typed_width = u16::try_from(Line::raw(query).width()).unwrap_or(u16::MAX);
    let cursor_x = area
        .x
        .saturating_add(1)
        .saturating_add(typed_width)
        .min(area.right().saturating_sub(2));
    frame.set_cursor_position((cursor_x, area.y + 1));
}

fn draw_panel(frame: &mut Frame, area: Rect, presenter: &Presenter) {
    let block = Block::default().borders(Borders::ALL).title(PANEL_LABEL);
    let paragraph = panel_paragraph(presenter.panel())
        .block(block)
        .scroll((presenter.scroll(), 0));
    frame.render_widget(paragraph, area);
}

/// Rows the panel content occupies once wrapped to `width` columns.
pub fn content_height(panel: &Panel, width: u16) -> usize {
    panel_paragraph(panel).line_count(width)
}

fn panel_paragraph(panel: &Panel) -> Paragraph<'static> {
    let alignment = match panel {
        Panel::Outages(_) => Alignment::Left,
        _ => Alignment::Center,
    };
    Paragraph::new(panel_lines(panel))
        .alignment(alignment)
        .wrap(Wrap { trim: false })
}

/// The panel content before wrapping.
pub fn panel_lines(panel: &Panel) -> Vec<Line<'static>> {
    match panel {
        Panel::Loading => message_lines(LOADING_MESSAGE, Style::default()),
        Panel::NoMatches => message_lines(NO_MATCHES_MESSAGE, Style::default()),
        Panel::Error => message_lines(ERROR_MESSAGE, Style::default().fg(Color::Red)),
        Panel::Outages(blocks) => blocks.iter().flat_map(outage_lines).collect(),
    }
}

fn message_lines(message: &'static str, style: Style) -> Vec<Line<'static>> {
    std::iter::once(Line::default())
        .chain(message.lines().map(|line| Line::from(Span::styled(line, style))))
        .collect()
}

fn outage_lines(block: &OutageBlock) -> [Line<'static>; 5] {
    [
        Line::from(Span::styled(
            format!("📍 {}", block.district),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::raw(format!("🏘️ Mahalleler: {}", block.neighborhoods)),
        Line::raw(format!("🕒 Süre: {}", block.duration)),
        Line::raw(format!("ℹ️ Açıklama: {}", block.description)),
        Line::default(),
    ]
}
