//! Focusable controls and their per-step order

use crate::state::{Field, FormData, Step, CONDITIONS};

/// Anything keyboard focus can rest on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Focus {
    Field(Field),
    /// Text input for adding an allergy
    AllergyInput,
    /// An allergy chip, by position
    Allergy(usize),
    /// A condition checkbox, by position in [`CONDITIONS`]
    Condition(usize),
    Back,
    Next,
    Submit,
    /// "Edit this section" control on the review step
    Edit(Step),
}

impl Focus {
    pub fn is_button(self) -> bool {
        matches!(self, Focus::Back | Focus::Next | Focus::Submit)
    }
}

/// Navigation buttons shown at the bottom of a step
pub fn step_buttons(step: Step) -> Vec<Focus> {
    match step {
        Step::Demographics => vec![Focus::Next],
        Step::Insurance | Step::History => vec![Focus::Back, Focus::Next],
        Step::Review => vec![Focus::Back, Focus::Submit],
    }
}

/// Tab order for a step
pub fn focus_order(step: Step, data: &FormData) -> Vec<Focus> {
    let mut order = Vec::new();
    match step {
        Step::Demographics | Step::Insurance => {
            order.extend(step.fields().into_iter().map(Focus::Field));
        }
        Step::History => {
            order.push(Focus::AllergyInput);
            order.extend((0..data.allergies.len()).map(Focus::Allergy));
            order.extend((0..CONDITIONS.len()).map(Focus::Condition));
            order.extend(step.fields().into_iter().map(Focus::Field));
        }
        Step::Review => {
            order.extend(
                [Step::Demographics, Step::Insurance, Step::History]
                    .into_iter()
                    .map(Focus::Edit),
            );
        }
    }
    order.extend(step_buttons(step));
    order
}
