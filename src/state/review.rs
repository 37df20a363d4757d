//! Review step projection
//!
//! Turns `FormData` into display strings for the final step and for the
//! printable summary. Never mutates the form.

use crate::state::{Field, FormData, Gender, Step};

/// Shown for any empty scalar value
pub const EMPTY_PLACEHOLDER: &str = "—";
pub const NO_ALLERGIES: &str = "None reported";
pub const NO_CONDITIONS: &str = "None selected";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRow {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSection {
    pub step: Step,
    pub title: &'static str,
    pub rows: Vec<ReviewRow>,
}

/// Display string for one scalar field
pub fn display_value(field: Field, data: &FormData) -> String {
    let value = data.get(field).trim();
    if value.is_empty() {
        return EMPTY_PLACEHOLDER.to_string();
    }
    match field {
        Field::Gender => Gender::from_code(value)
            .map(|g| g.label().to_string())
            .unwrap_or_else(|| value.to_string()),
        _ => value.to_string(),
    }
}

fn join_or(items: &[&str], none: &str) -> String {
    if items.is_empty() {
        none.to_string()
    } else {
        items.join(", ")
    }
}

pub fn compile_review(data: &FormData) -> Vec<ReviewSection> {
    [Step::Demographics, Step::Insurance, Step::History]
        .into_iter()
        .map(|step| {
            let mut rows = Vec::new();
            if step == Step::History {
                let allergies: Vec<&str> = data.allergies.iter().map(String::as_str).collect();
                rows.push(ReviewRow {
                    label: "Allergies",
                    value: join_or(&allergies, NO_ALLERGIES),
                });
                rows.push(ReviewRow {
                    label: "Conditions",
                    value: join_or(&data.conditions_in_display_order(), NO_CONDITIONS),
                });
            }
            rows.extend(
                step.fields()
                    .into_iter()
                    // The confirmation repeats the policy number
                    .filter(|f| *f != Field::ConfirmPolicyNumber)
                    .map(|f| ReviewRow {
                        label: f.label(),
                        value: display_value(f, data),
                    }),
            );
            ReviewSection {
                step,
                title: step.title(),
                rows,
            }
        })
        .collect()
}

/// Plain-text rendering used for the printable summary
pub fn render_plain_text(sections: &[ReviewSection]) -> String {
    let mut out = String::from("Patient intake summary\n");
    for section in sections {
        out.push('\n');
        out.push_str(section.title);
        out.push('\n');
        out.push_str(&"-".repeat(section.title.chars().count()));
        out.push('\n');
        for row in &section.rows {
            out.push_str(&format!("{}: {}\n", row.label, row.value));
        }
    }
    out
}
