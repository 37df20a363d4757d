//! Bordered push button

use crate::ui::theme::Theme;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

/// Rows taken by a button: border, label, border
pub const BUTTON_HEIGHT: u16 = 3;

/// Draw a button; `primary` buttons get an accent border and thick edges
pub fn render_button(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    is_focused: bool,
    primary: bool,
    theme: &Theme,
) {
    let label_style = match (is_focused, primary) {
        (true, _) => theme.focused().add_modifier(Modifier::REVERSED),
        (false, true) => Style::default().fg(theme.accent),
        (false, false) => theme.base(),
    };
    let border_style = if primary && !is_focused {
        Style::default().fg(theme.accent)
    } else {
        theme.border_style(is_focused, false)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(if primary { BorderType::Thick } else { BorderType::Plain })
        .border_style(border_style);

    frame.render_widget(
        Paragraph::new(label)
            .style(label_style)
            .alignment(Alignment::Center)
            .block(block),
        area,
    );
}
