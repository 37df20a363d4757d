//! Provider popup list

use super::layout::provider_popup;
use super::theme::Theme;
use crate::state::IntakeState;
use ratatui::{
    layout::Rect,
    style::Modifier,
    widgets::{Block, Borders, Clear, List, ListItem, ListState},
    Frame,
};

/// Draw the open provider list below its input
pub fn draw_provider_popup(frame: &mut Frame, screen: Rect, state: &IntakeState, theme: &Theme) {
    let Some((popup, _)) = provider_popup(state, screen) else {
        return;
    };

    frame.render_widget(Clear, popup);

    let items: Vec<ListItem> = state
        .combobox
        .options()
        .iter()
        .map(|name| ListItem::new(*name))
        .collect();

    let title = format!(" {} matches ", state.combobox.options().len());
    let list = List::new(items)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(theme.border_style(true, false)),
        )
        .style(theme.base())
        .highlight_style(theme.focused().add_modifier(Modifier::REVERSED));

    // A fresh state scrolls just far enough to show the active option,
    // matching `layout::popup_offset`
    let mut list_state = ListState::default().with_selected(state.combobox.active_index());
    frame.render_stateful_widget(list, popup, &mut list_state);
}
