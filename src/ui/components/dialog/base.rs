//! Centered modal overlay

use crate::ui::theme::Theme;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Paragraph},
    Frame,
};

/// What a modal shows
pub struct DialogConfig<'a> {
    pub title: &'a str,
    /// Border and title color
    pub accent: Color,
    /// Body text; `\n` starts a new paragraph
    pub message: &'a str,
    /// Muted footer line
    pub hint: Option<Vec<Span<'a>>>,
    pub max_width: u16,
}

/// Border plus horizontal padding on each side
const CHROME_WIDTH: u16 = 2 + 2 * 2;

pub fn render_dialog(frame: &mut Frame, config: DialogConfig, theme: &Theme) {
    let screen = frame.area();
    let text_width = config
        .max_width
        .min(screen.width)
        .saturating_sub(CHROME_WIDTH)
        .max(1);

    let body = wrap_text(config.message, text_width as usize);
    let widest = body
        .iter()
        .map(|l| l.chars().count())
        .chain(std::iter::once(config.title.chars().count() + 2))
        .max()
        .unwrap_or(0) as u16;

    let footer_rows = if config.hint.is_some() { 2 } else { 0 };
    let height = body.len() as u16 + footer_rows + 2;
    let area = centered_rect(screen, widest + CHROME_WIDTH, height);

    let mut lines: Vec<Line> = body.into_iter().map(Line::from).collect();
    if let Some(hint) = config.hint {
        lines.push(Line::default());
        lines.push(Line::from(hint));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(config.accent))
        .title(Span::styled(
            format!(" {} ", config.title),
            Style::default()
                .fg(config.accent)
                .add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center)
        .padding(Padding::horizontal(2))
        .style(theme.base());

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// A `width` x `height` rect centered in `outer`, clipped to fit
fn centered_rect(outer: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(outer.width);
    let height = height.min(outer.height);
    Rect::new(
        outer.x + (outer.width - width) / 2,
        outer.y + (outer.height - height) / 2,
        width,
        height,
    )
}

/// Greedy word wrap by character count; words longer than a line are split
fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let max_width = max_width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut used = 0;
        for word in paragraph.split_whitespace() {
            let mut chars: Vec<char> = word.chars().collect();
            if used > 0 && used + 1 + chars.len() > max_width {
                lines.push(std::mem::take(&mut line));
                used = 0;
            }
            while chars.len() > max_width {
                let rest = chars.split_off(max_width);
                lines.push(chars.into_iter().collect());
                chars = rest;
            }
            if used > 0 {
                line.push(' ');
                used += 1;
            }
            used += chars.len();
            line.extend(chars);
        }
        lines.push(line);
    }

    lines
}
