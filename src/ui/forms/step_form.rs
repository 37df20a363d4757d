//! Step content: inputs, history controls, review summary and buttons

use super::field_renderer::{draw_field, FieldView};
use crate::state::{Field, FieldKind, Focus, Gender, IntakeState, Step, CONDITIONS, TOTAL_STEPS};
use crate::ui::components::render_button;
use crate::ui::layout::{button_areas, content_inner, place_rows, RowKind};
use crate::ui::theme::Theme;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Draw the bordered block for the current step and every visible row
pub fn draw_step(frame: &mut Frame, area: Rect, state: &IntakeState, theme: &Theme) {
    let step = state.step();
    let block = Block::default()
        .title(format!(
            " Step {} of {}: {} ",
            step.number(),
            TOTAL_STEPS,
            step.title()
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .style(theme.base());
    frame.render_widget(block, area);

    for row in place_rows(state, content_inner(area)) {
        match row.kind {
            RowKind::Field(field) => draw_form_field(frame, row.area, state, field, theme),
            RowKind::Heading(title) => {
                let heading = Span::styled(title, Style::default().add_modifier(Modifier::BOLD));
                frame.render_widget(Paragraph::new(heading), row.area);
            }
            RowKind::AllergyInput => {
                let view = FieldView {
                    label: "Add allergy",
                    value: &state.allergy_draft,
                    is_focused: state.focus == Focus::AllergyInput,
                    hint: Some("Type an allergy and press Enter"),
                    ..Default::default()
                };
                draw_field(frame, row.area, &view, theme);
            }
            RowKind::Allergy(index) => {
                let Some(allergy) = state.data.allergies.get(index) else {
                    continue;
                };
                let is_focused = state.focus == Focus::Allergy(index);
                draw_line_control(
                    frame,
                    row.area,
                    format!("  [{allergy} ✕]"),
                    is_focused.then_some("Enter or Delete removes"),
                    is_focused,
                    theme,
                );
            }
            RowKind::NoAllergies => {
                let line = Span::styled("  No allergies added", theme.muted());
                frame.render_widget(Paragraph::new(line), row.area);
            }
            RowKind::Condition(index) => {
                let Some(condition) = CONDITIONS.get(index) else {
                    continue;
                };
                let mark = if state.data.has_condition(condition) { "x" } else { " " };
                let is_focused = state.focus == Focus::Condition(index);
                draw_line_control(
                    frame,
                    row.area,
                    format!("  [{mark}] {condition}"),
                    is_focused.then_some("Space toggles"),
                    is_focused,
                    theme,
                );
            }
            RowKind::SectionHeader(section) => {
                draw_section_header(frame, row.area, section, state, theme)
            }
            RowKind::Summary { section, row: index } => {
                let Some(summary) = state.review.get(section).and_then(|s| s.rows.get(index))
                else {
                    continue;
                };
                let line = Line::from(vec![
                    Span::styled(format!("  {:<20}", summary.label), theme.muted()),
                    Span::styled(summary.value.clone(), theme.base()),
                ]);
                frame.render_widget(Paragraph::new(line), row.area);
            }
            RowKind::Spacer => {}
            RowKind::Buttons => {
                for (focus, button_area) in button_areas(step, row.area) {
                    render_button(
                        frame,
                        button_area,
                        button_label(focus),
                        state.focus == focus,
                        focus != Focus::Back,
                        theme,
                    );
                }
            }
        }
    }
}

fn button_label(focus: Focus) -> &'static str {
    match focus {
        Focus::Back => "← Back",
        Focus::Next => "Next →",
        Focus::Submit => "Submit",
        _ => "",
    }
}

/// Draw one of the scalar inputs with its verdict, hint and counter
fn draw_form_field(frame: &mut Frame, area: Rect, state: &IntakeState, field: Field, theme: &Theme) {
    let is_focused = state.focus == Focus::Field(field);
    let hint = field.input_hint(state.today);
    let raw = state.data.get(field);

    let (value, hint) = match field.kind() {
        FieldKind::Choice => (
            Gender::from_code(raw).map(Gender::label).unwrap_or(""),
            Some("Not specified (←/→ to choose)".to_string()),
        ),
        _ => (raw, hint),
    };
    let counter = match field.kind() {
        FieldKind::TextArea { max_len } => Some((raw.chars().count(), max_len)),
        _ => None,
    };

    let view = FieldView {
        label: field.label(),
        value,
        is_focused,
        is_required: field.is_required(),
        error: state
            .verdicts
            .is_invalid(field)
            .then_some(field.invalid_message()),
        hint: hint.as_deref(),
        counter,
        is_multiline: matches!(field.kind(), FieldKind::TextArea { .. }),
        toggle: (field.kind() == FieldKind::Combobox).then_some(state.combobox.expanded()),
    };
    draw_field(frame, area, &view, theme);
}

/// Single-line control (chip or checkbox) with an optional trailing hint
fn draw_line_control(
    frame: &mut Frame,
    area: Rect,
    text: String,
    hint: Option<&str>,
    is_focused: bool,
    theme: &Theme,
) {
    let style = if is_focused {
        theme.focused().add_modifier(Modifier::REVERSED)
    } else {
        theme.base()
    };
    let mut spans = vec![Span::styled(text, style)];
    if let Some(hint) = hint {
        spans.push(Span::styled(format!("  {hint}"), theme.muted()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_section_header(
    frame: &mut Frame,
    area: Rect,
    section: Step,
    state: &IntakeState,
    theme: &Theme,
) {
    let is_focused = state.focus == Focus::Edit(section);
    let edit_style = if is_focused {
        theme.focused().add_modifier(Modifier::REVERSED)
    } else {
        Style::default().fg(theme.accent)
    };
    let line = Line::from(vec![
        Span::styled(
            format!("{} ", section.title()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled("[Edit]", edit_style),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
