//! UI module for rendering the TUI

mod combobox;
mod components;
mod forms;
mod header;
pub mod layout;
mod status_bar;
mod theme;

use crate::app::App;
use ratatui::Frame;
use theme::Theme;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let state = &app.state;
    let theme = Theme::for_contrast(state.ui.contrast);
    let screen = layout::screen_layout(area);

    header::draw_header(frame, screen.header, state, &theme);
    header::draw_step_indicators(frame, screen.steps, state, &theme);
    forms::draw_step(frame, screen.content, state, &theme);
    combobox::draw_provider_popup(frame, area, state, &theme);
    status_bar::draw_status_bar(frame, screen.status, state, &theme);

    if state.submitting {
        components::render_submitting_dialog(frame, &theme);
    }
}
