//! Announcements, saved time and key help

use super::theme::Theme;
use crate::platform::{
    BACK_SHORTCUT, CONTRAST_SHORTCUT, NEXT_SHORTCUT, PRINT_SHORTCUT, SAVE_SHORTCUT,
};
use crate::state::{IntakeState, Politeness};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub fn draw_status_bar(frame: &mut Frame, area: Rect, state: &IntakeState, theme: &Theme) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);
    let bar_style = Style::default().bg(theme.status_bg).fg(theme.text);

    // Announcement line; urgent messages take over
    let mut spans = Vec::new();
    if let Some(announcement) = state.announcer.current() {
        let span = match announcement.politeness {
            Politeness::Assertive => Span::styled(
                format!(" ! {}", announcement.message),
                Style::default()
                    .fg(theme.error)
                    .add_modifier(Modifier::BOLD),
            ),
            Politeness::Polite => Span::raw(format!(" {}", announcement.message)),
        };
        spans.push(span);
    }
    if let Some(message) = &state.status_message {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(message.clone(), Style::default().fg(theme.accent)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)).style(bar_style), rows[0]);

    let hints = format!(
        " Tab:field  {NEXT_SHORTCUT}:next  {BACK_SHORTCUT}:back  {SAVE_SHORTCUT}:save  \
         {CONTRAST_SHORTCUT}:contrast  {PRINT_SHORTCUT}:print  ^C:quit"
    );
    frame.render_widget(
        Paragraph::new(hints).style(bar_style.fg(theme.muted)),
        rows[1],
    );

    // Saved time on the right of the announcement line
    if let Some(saved) = state.last_saved {
        let saved = format!(" Saved {} ", saved.format("%H:%M:%S"));
        let width = (saved.chars().count() as u16).min(rows[0].width);
        let saved_area = Rect {
            x: rows[0].x + rows[0].width - width,
            y: rows[0].y,
            width,
            height: 1,
        };
        frame.render_widget(
            Paragraph::new(saved).style(bar_style.fg(theme.success)),
            saved_area,
        );
    }
}
