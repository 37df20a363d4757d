//! Title, progress gauge and step indicators

use super::theme::Theme;
use crate::state::{IntakeState, Step, TOTAL_STEPS};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

/// Draw the bordered title with the animated progress gauge
pub fn draw_header(frame: &mut Frame, area: Rect, state: &IntakeState, theme: &Theme) {
    let percent = state.progress.value();
    let label = format!(
        "Step {} of {} · {:.0}%",
        state.step().number(),
        TOTAL_STEPS,
        percent
    );

    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(" Patient intake ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border)),
        )
        .gauge_style(Style::default().fg(theme.accent).bg(theme.background))
        .ratio((percent / 100.0).clamp(0.0, 1.0))
        .label(label);

    frame.render_widget(gauge, area);
}

/// One indicator per step; exactly one is marked current
pub fn indicator_spans(current: Step, theme: &Theme) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for step in Step::ALL {
        let (marker, style) = if step == current {
            ("●", theme.focused().add_modifier(Modifier::UNDERLINED))
        } else if step < current {
            ("✓", Style::default().fg(theme.success))
        } else {
            ("○", theme.muted())
        };
        spans.push(Span::styled(
            format!(" {marker} {}. {} ", step.number(), step.title()),
            style,
        ));
    }
    spans
}

pub fn draw_step_indicators(frame: &mut Frame, area: Rect, state: &IntakeState, theme: &Theme) {
    let line = Line::from(indicator_spans(state.step(), theme));
    frame.render_widget(Paragraph::new(line).style(theme.base()), area);
}
