//! Field rendering utilities for forms

use crate::ui::layout::provider_toggle_position;
use crate::ui::theme::Theme;
use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Everything needed to draw one bordered input
#[derive(Debug, Clone, Default)]
pub struct FieldView<'a> {
    pub label: &'a str,
    pub value: &'a str,
    pub is_focused: bool,
    pub is_required: bool,
    /// Message shown in the bottom border while invalid
    pub error: Option<&'a str>,
    /// Placeholder shown while empty
    pub hint: Option<&'a str>,
    /// Character counter as `(used, max)`
    pub counter: Option<(usize, usize)>,
    pub is_multiline: bool,
    /// Combobox toggle marker; `Some(expanded)` draws ▲/▼
    pub toggle: Option<bool>,
}

/// Draw a bordered form field
pub fn draw_field(frame: &mut Frame, area: Rect, field: &FieldView, theme: &Theme) {
    let value_style = if field.is_focused {
        theme.focused()
    } else {
        theme.base()
    };
    let cursor = if field.is_focused { "▌" } else { "" };

    let mut lines: Vec<Line> = if field.value.is_empty() {
        let placeholder = field.hint.unwrap_or(if field.is_focused { "" } else { "(empty)" });
        vec![Line::from(Span::styled(placeholder.to_string(), theme.muted()))]
    } else if field.is_multiline {
        field
            .value
            .split('\n')
            .map(|l| Line::from(Span::styled(l.to_string(), value_style)))
            .collect()
    } else {
        vec![Line::from(Span::styled(field.value.to_string(), value_style))]
    };

    if field.is_focused {
        let cursor_span = Span::styled(cursor, Style::default().fg(theme.accent));
        match lines.last_mut() {
            Some(last) if !field.value.is_empty() => last.spans.push(cursor_span),
            Some(last) => last.spans.insert(0, cursor_span),
            None => lines.push(Line::from(cursor_span)),
        }
    }

    // Keep the cursor line in view for long text areas
    let inner_height = area.height.saturating_sub(2) as usize;
    let scroll = lines.len().saturating_sub(inner_height.max(1)) as u16;

    let title = if field.is_required {
        format!(" {} * ", field.label)
    } else {
        format!(" {} ", field.label)
    };

    let mut block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(theme.border_style(field.is_focused, field.error.is_some()));

    if let Some(message) = field.error {
        block = block.title_bottom(Line::styled(format!(" {message} "), theme.error()));
    }
    if let Some((used, max)) = field.counter {
        let style = if used >= max { theme.error() } else { theme.muted() };
        block = block.title_bottom(
            Line::styled(format!(" {used}/{max} "), style).alignment(Alignment::Right),
        );
    }

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(block);
    frame.render_widget(paragraph, area);

    if let Some(expanded) = field.toggle {
        let marker = if expanded { "▲" } else { "▼" };
        let (x, y) = provider_toggle_position(area);
        frame.render_widget(
            Paragraph::new(marker).style(Style::default().fg(theme.accent)),
            Rect::new(x, y, 1, 1),
        );
    }
}
