//! Screen geometry
//!
//! Drawing and mouse handling both derive positions from these functions, so
//! a click always lands on what was drawn there. Nothing here depends on
//! frame state: every position is a function of the screen size and
//! [`IntakeState`].

use super::components::BUTTON_HEIGHT;
use crate::state::{step_buttons, Field, FieldKind, Focus, IntakeState, Step, CONDITIONS};
use ratatui::layout::{Constraint, Direction, Layout, Margin, Rect};

pub const HEADER_HEIGHT: u16 = 3;
pub const STEPS_HEIGHT: u16 = 1;
pub const STATUS_HEIGHT: u16 = 2;
/// Bordered single-line input
pub const FIELD_HEIGHT: u16 = 3;
/// Bordered input with three lines of text
pub const TEXT_AREA_HEIGHT: u16 = 5;
pub const BUTTON_WIDTH: u16 = 14;
pub const BUTTON_SPACING: u16 = 2;
/// Popup height including borders
pub const POPUP_MAX_HEIGHT: u16 = 8;
pub const POPUP_MAX_WIDTH: u16 = 40;

/// Top-level screen regions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub header: Rect,
    pub steps: Rect,
    pub content: Rect,
    pub status: Rect,
}

pub fn screen_layout(area: Rect) -> ScreenLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT), // Title and progress
            Constraint::Length(STEPS_HEIGHT),  // Step indicators
            Constraint::Min(0),                // Step content
            Constraint::Length(STATUS_HEIGHT), // Announcements and key help
        ])
        .split(area);

    ScreenLayout {
        header: chunks[0],
        steps: chunks[1],
        content: chunks[2],
        status: chunks[3],
    }
}

/// Area inside the bordered content block
pub fn content_inner(content: Rect) -> Rect {
    content.inner(Margin::new(1, 1))
}

/// One vertical slot of step content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Field(Field),
    Heading(&'static str),
    AllergyInput,
    Allergy(usize),
    NoAllergies,
    Condition(usize),
    /// Review section title with its edit control
    SectionHeader(Step),
    /// Review line, by section and row index
    Summary { section: usize, row: usize },
    Spacer,
    Buttons,
}

impl RowKind {
    pub fn height(self) -> u16 {
        match self {
            RowKind::Field(field) => match field.kind() {
                FieldKind::TextArea { .. } => TEXT_AREA_HEIGHT,
                _ => FIELD_HEIGHT,
            },
            RowKind::AllergyInput => FIELD_HEIGHT,
            RowKind::Buttons => BUTTON_HEIGHT,
            _ => 1,
        }
    }

    /// Whether `focus` is drawn inside this row
    pub fn holds(self, focus: Focus) -> bool {
        match (self, focus) {
            (RowKind::Field(a), Focus::Field(b)) => a == b,
            (RowKind::AllergyInput, Focus::AllergyInput) => true,
            (RowKind::Allergy(a), Focus::Allergy(b)) => a == b,
            (RowKind::Condition(a), Focus::Condition(b)) => a == b,
            (RowKind::SectionHeader(a), Focus::Edit(b)) => a == b,
            (RowKind::Buttons, focus) => focus.is_button(),
            _ => false,
        }
    }

    /// Focus target when the row is clicked
    fn focus_target(self) -> Option<Focus> {
        match self {
            RowKind::Field(field) => Some(Focus::Field(field)),
            RowKind::AllergyInput => Some(Focus::AllergyInput),
            RowKind::Allergy(i) => Some(Focus::Allergy(i)),
            RowKind::Condition(i) => Some(Focus::Condition(i)),
            RowKind::SectionHeader(step) => Some(Focus::Edit(step)),
            _ => None,
        }
    }
}

/// Rows making up the current step, top to bottom
pub fn step_rows(state: &IntakeState) -> Vec<RowKind> {
    let step = state.step();
    let mut rows = Vec::new();
    match step {
        Step::Demographics | Step::Insurance => {
            rows.extend(step.fields().into_iter().map(RowKind::Field));
        }
        Step::History => {
            rows.push(RowKind::Heading("Allergies"));
            rows.push(RowKind::AllergyInput);
            if state.data.allergies.is_empty() {
                rows.push(RowKind::NoAllergies);
            } else {
                rows.extend((0..state.data.allergies.len()).map(RowKind::Allergy));
            }
            rows.push(RowKind::Spacer);
            rows.push(RowKind::Heading("Conditions"));
            rows.extend((0..CONDITIONS.len()).map(RowKind::Condition));
            rows.push(RowKind::Spacer);
            rows.extend(step.fields().into_iter().map(RowKind::Field));
        }
        Step::Review => {
            for (section_index, section) in state.review.iter().enumerate() {
                rows.push(RowKind::SectionHeader(section.step));
                rows.extend((0..section.rows.len()).map(|row| RowKind::Summary {
                    section: section_index,
                    row,
                }));
                rows.push(RowKind::Spacer);
            }
        }
    }
    rows.push(RowKind::Buttons);
    rows
}

/// Rows to skip from the top so the focused row is fully visible
pub fn scroll_offset(rows: &[RowKind], focus: Focus, height: u16) -> u16 {
    let mut top = 0u16;
    for row in rows {
        if row.holds(focus) {
            let bottom = top.saturating_add(row.height());
            return bottom.saturating_sub(height);
        }
        top = top.saturating_add(row.height());
    }
    0
}

/// A row positioned on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedRow {
    pub kind: RowKind,
    pub area: Rect,
}

/// Rows that fit entirely inside `inner` after scrolling to the focus
pub fn place_rows(state: &IntakeState, inner: Rect) -> Vec<PlacedRow> {
    let rows = step_rows(state);
    let offset = scroll_offset(&rows, state.focus, inner.height);
    let mut placed = Vec::new();
    let mut top = 0u16;
    for kind in rows {
        let height = kind.height();
        let visible = top >= offset && top + height <= offset + inner.height;
        if visible {
            placed.push(PlacedRow {
                kind,
                area: Rect {
                    x: inner.x,
                    y: inner.y + (top - offset),
                    width: inner.width,
                    height,
                },
            });
        }
        top += height;
    }
    placed
}

/// Navigation buttons laid out left to right inside the buttons row
pub fn button_areas(step: Step, row: Rect) -> Vec<(Focus, Rect)> {
    step_buttons(step)
        .into_iter()
        .enumerate()
        .map(|(i, focus)| {
            let x = row.x + (i as u16) * (BUTTON_WIDTH + BUTTON_SPACING);
            let width = BUTTON_WIDTH.min((row.x + row.width).saturating_sub(x));
            (
                focus,
                Rect {
                    x,
                    y: row.y,
                    width,
                    height: row.height,
                },
            )
        })
        .collect()
}

/// Cell of the ▼ toggle inside the provider input's right border
pub fn provider_toggle_position(row: Rect) -> (u16, u16) {
    (row.x + row.width.saturating_sub(3), row.y + 1)
}

/// Popup below the provider input, clipped to the screen
pub fn provider_popup_area(row: Rect, screen: Rect, option_count: usize) -> Option<Rect> {
    if option_count == 0 {
        return None;
    }
    let y = row.y + row.height;
    let available = (screen.y + screen.height).saturating_sub(y);
    let wanted = (option_count as u16).saturating_add(2).min(POPUP_MAX_HEIGHT);
    let height = wanted.min(available);
    if height < 3 {
        return None;
    }
    Some(Rect {
        x: row.x,
        y,
        width: row.width.min(POPUP_MAX_WIDTH),
        height,
    })
}

/// First option shown when `visible` rows fit and `active` must be in view
pub fn popup_offset(active: Option<usize>, visible: usize) -> usize {
    match active {
        Some(active) if visible > 0 && active >= visible => active + 1 - visible,
        _ => 0,
    }
}

/// What a click landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Focus(Focus),
    ProviderOption(usize),
    ProviderToggle,
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x && column < area.x + area.width && row >= area.y && row < area.y + area.height
}

/// Provider popup geometry for the current state, if the list is open and
/// the provider input is on screen
pub fn provider_popup(state: &IntakeState, screen: Rect) -> Option<(Rect, PlacedRow)> {
    if !state.combobox.is_open() {
        return None;
    }
    let inner = content_inner(screen_layout(screen).content);
    let row = place_rows(state, inner)
        .into_iter()
        .find(|r| r.kind == RowKind::Field(Field::Provider))?;
    let area = provider_popup_area(row.area, screen, state.combobox.options().len())?;
    Some((area, row))
}

/// Resolve a click at (`column`, `row`) against what is drawn
pub fn hit_test(state: &IntakeState, screen: Rect, column: u16, row: u16) -> Option<Hit> {
    if let Some((popup, _)) = provider_popup(state, screen) {
        let list = popup.inner(Margin::new(1, 1));
        if contains(list, column, row) {
            let visible = list.height as usize;
            let offset = popup_offset(state.combobox.active_index(), visible);
            let index = offset + (row - list.y) as usize;
            return (index < state.combobox.options().len()).then_some(Hit::ProviderOption(index));
        }
        if contains(popup, column, row) {
            return None;
        }
    }

    let inner = content_inner(screen_layout(screen).content);
    let placed = place_rows(state, inner)
        .into_iter()
        .find(|r| contains(r.area, column, row))?;

    match placed.kind {
        RowKind::Buttons => button_areas(state.step(), placed.area)
            .into_iter()
            .find(|(_, area)| contains(*area, column, row))
            .map(|(focus, _)| Hit::Focus(focus)),
        RowKind::Field(Field::Provider)
            if provider_toggle_position(placed.area) == (column, row) =>
        {
            Some(Hit::ProviderToggle)
        }
        kind => kind.focus_target().map(Hit::Focus),
    }
}
