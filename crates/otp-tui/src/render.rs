//! Pure view/render functions for the OTP prompt.
//!
//! Functions here take `&AppState`, draw to a ratatui Frame and never mutate
//! state. `field_rects` is shared with the reducer for mouse hit-testing.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::state::AppState;

/// Width of one digit box, borders included.
pub const FIELD_WIDTH: u16 = 5;

/// Height of one digit box, borders included.
pub const FIELD_HEIGHT: u16 = 3;

/// Horizontal gap between boxes.
const FIELD_GAP: u16 = 1;

/// Character drawn for digits when `secure_text_entry` is set.
const MASK_CHAR: char = '•';

const TITLE: &str = "Enter verification code";

const HINTS: &str = "0-9 type · ←/→ move · Enter submit · Esc hide/quit";

/// Boxes for each field, centered in `area`.
pub fn field_rects(area: Rect, pin_count: usize) -> Vec<Rect> {
    let count = u16::try_from(pin_count).unwrap_or(u16::MAX);
    let total = count
        .saturating_mul(FIELD_WIDTH)
        .saturating_add(count.saturating_sub(1).saturating_mul(FIELD_GAP));
    let x0 = area.x + area.width.saturating_sub(total) / 2;
    let y = area.y + area.height.saturating_sub(FIELD_HEIGHT) / 2;

    (0..count)
        .map(|i| Rect {
            x: x0.saturating_add(i.saturating_mul(FIELD_WIDTH + FIELD_GAP)),
            y,
            width: FIELD_WIDTH,
            height: FIELD_HEIGHT,
        })
        .map(|rect| rect.intersection(area))
        .collect()
}

/// Text shown inside field `index`.
pub fn field_text(app: &AppState, index: usize) -> String {
    let config = app.widget.config();
    if config.clear_inputs {
        return String::new();
    }
    match app.widget.controller().digits().get(index).copied().flatten() {
        Some(_) if config.secure_text_entry => MASK_CHAR.to_string(),
        Some(digit) => digit.to_string(),
        None => config.placeholder_character.clone(),
    }
}

fn field_style(app: &AppState, index: usize) -> Style {
    if app.widget.config().error {
        return Style::default().fg(Color::Red);
    }
    if app.focused == Some(index) {
        return Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
    }
    if app.widget.controller().has_value(index) {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

pub fn render(app: &AppState, frame: &mut Frame) {
    let area = frame.area();
    let rects = field_rects(area, app.pin_count());

    if let Some(first) = rects.first()
        && first.y >= area.y + 2
    {
        let title_area = Rect {
            x: area.x,
            y: first.y - 2,
            width: area.width,
            height: 1,
        };
        frame.render_widget(
            Paragraph::new(TITLE)
                .alignment(Alignment::Center)
                .style(Style::default().add_modifier(Modifier::BOLD)),
            title_area,
        );
    }

    for (index, rect) in rects.iter().enumerate() {
        let style = field_style(app, index);
        let block = Block::default().borders(Borders::ALL).border_style(style);
        let text = Paragraph::new(field_text(app, index))
            .alignment(Alignment::Center)
            .style(style)
            .block(block);
        frame.render_widget(text, *rect);
    }

    let status_y = rects
        .first()
        .map_or(area.y, |rect| rect.y + FIELD_HEIGHT + 1);
    if status_y < area.y + area.height {
        let status_area = Rect {
            x: area.x,
            y: status_y,
            width: area.width,
            height: (area.y + area.height - status_y).min(3),
        };
        frame.render_widget(
            Paragraph::new(status_lines(app)).alignment(Alignment::Center),
            status_area,
        );
    }
}

fn status_lines(app: &AppState) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if let Some(status) = &app.status {
        lines.push(Line::from(Span::styled(
            status.clone(),
            Style::default().fg(Color::Yellow),
        )));
    }
    let hashes = &app.widget.sms().hashes;
    if !hashes.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("App hash: {}", hashes.join(", ")),
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines.push(Line::from(Span::styled(
        HINTS,
        Style::default().fg(Color::DarkGray),
    )));
    lines
}
