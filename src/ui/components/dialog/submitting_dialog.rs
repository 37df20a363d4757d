//! Overlay shown while a submission is in flight

use super::base::{render_dialog, DialogConfig};
use crate::ui::theme::Theme;
use ratatui::{text::Span, Frame};

pub fn render_submitting_dialog(frame: &mut Frame, theme: &Theme) {
    let hint = vec![Span::styled("Input is paused until this finishes", theme.muted())];

    render_dialog(
        frame,
        DialogConfig {
            title: "Submitting",
            accent: theme.accent,
            message: "Sending your intake form. Please wait.",
            hint: Some(hint),
            max_width: 50,
        },
        theme,
    );
}
