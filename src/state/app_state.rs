//! Intake form state
//!
//! [`IntakeState`] is the single owner of everything the screen shows. Input
//! handlers mutate it, the renderer only reads it. Storage and timers live one
//! level up in `App`.

use crate::state::validation::{validate_field, Verdicts};
use crate::state::{
    focus_order, AllergyAdd, Announcer, Field, FieldKind, Focus, FormData, Gender,
    NavigationState, PersistedSnapshot, ProgressAnimation, ProviderCombobox, ReviewSection,
    Step, UiPreferences, CONDITIONS,
};
use chrono::{DateTime, Local, NaiveDate};

#[derive(Debug, Clone)]
pub struct IntakeState {
    pub data: FormData,
    pub ui: UiPreferences,
    pub nav: NavigationState,
    pub verdicts: Verdicts,
    pub focus: Focus,
    pub combobox: ProviderCombobox,
    /// Compiled when the review step is entered
    pub review: Vec<ReviewSection>,
    pub announcer: Announcer,
    pub progress: ProgressAnimation,
    /// Text typed into the allergy input, not yet added
    pub allergy_draft: String,
    /// A submission is in flight; input is blocked
    pub submitting: bool,
    /// Reference date for date validation
    pub today: NaiveDate,
    /// Transient message for failures outside the form (clipboard)
    pub status_message: Option<String>,
    pub last_saved: Option<DateTime<Local>>,
}

impl IntakeState {
    pub fn new(today: NaiveDate) -> Self {
        let nav = NavigationState::default();
        Self {
            data: FormData::default(),
            ui: UiPreferences::default(),
            progress: ProgressAnimation::new(nav.progress_percent()),
            nav,
            verdicts: Verdicts::default(),
            focus: Focus::Field(Field::FirstName),
            combobox: ProviderCombobox::new(),
            review: Vec::new(),
            announcer: Announcer::default(),
            allergy_draft: String::new(),
            submitting: false,
            today,
            status_message: None,
            last_saved: None,
        }
    }

    /// Rebuild from a saved snapshot without announcing the step
    pub fn from_snapshot(snapshot: PersistedSnapshot, today: NaiveDate) -> Self {
        let mut state = Self::new(today);
        state.data = snapshot.data;
        state.ui = snapshot.ui;
        state.go_to(snapshot.step, false);
        state.progress.settle(state.nav.progress_percent());
        state
    }

    pub fn step(&self) -> Step {
        self.nav.step
    }

    pub fn snapshot(&self) -> PersistedSnapshot {
        PersistedSnapshot {
            step: self.nav.step,
            data: self.data.clone(),
            ui: self.ui,
        }
    }

    /// Validate one field and record the verdict. Committing either policy
    /// number re-checks the confirmation once it has been touched.
    pub fn validate(&mut self, field: Field) -> bool {
        let valid = validate_field(field, &self.data, self.today);
        self.verdicts.mark(field, valid);
        if field == Field::PolicyNumber
            && (self.verdicts.get(Field::ConfirmPolicyNumber).is_some()
                || !self.data.confirm_policy_number.is_empty())
        {
            let confirmed = validate_field(Field::ConfirmPolicyNumber, &self.data, self.today);
            self.verdicts.mark(Field::ConfirmPolicyNumber, confirmed);
        }
        valid
    }

    pub fn focus_order(&self) -> Vec<Focus> {
        focus_order(self.nav.step, &self.data)
    }

    /// First field flagged invalid on `step`, else its first control
    pub fn first_focus(&self, step: Step) -> Focus {
        if let Some(field) = self.verdicts.first_invalid_in(step) {
            return Focus::Field(field);
        }
        focus_order(step, &self.data)
            .first()
            .copied()
            .unwrap_or(Focus::Next)
    }

    /// Move focus, closing the provider list when focus leaves it
    pub fn set_focus(&mut self, focus: Focus) {
        if self.focus == Focus::Field(Field::Provider) && focus != self.focus {
            self.combobox.close();
        }
        self.focus = focus;
    }

    /// Neighbour in the tab order, wrapping at either end. Focus that is no
    /// longer in the order (a removed chip) restarts from the first control.
    pub fn adjacent_focus(&self, forward: bool) -> Focus {
        let order = self.focus_order();
        if order.is_empty() {
            return self.focus;
        }
        match order.iter().position(|f| *f == self.focus) {
            Some(i) if forward => order[(i + 1) % order.len()],
            Some(0) => order[order.len() - 1],
            Some(i) => order[i - 1],
            None => order[0],
        }
    }

    /// Append a typed character to a text-like field. Returns false when the
    /// field does not take text or a text area is full.
    pub fn insert_char(&mut self, field: Field, c: char) -> bool {
        match field.kind() {
            FieldKind::Choice => return false,
            FieldKind::TextArea { max_len } => {
                if self.data.get(field).chars().count() >= max_len {
                    return false;
                }
            }
            FieldKind::Text | FieldKind::Date | FieldKind::Combobox => {
                if c == '\n' {
                    return false;
                }
            }
        }
        self.data.value_mut(field).push(c);
        true
    }

    pub fn delete_char(&mut self, field: Field) -> bool {
        if field.kind() == FieldKind::Choice {
            return false;
        }
        self.data.value_mut(field).pop().is_some()
    }

    pub fn cycle_gender(&mut self, forward: bool) {
        let code = Gender::cycle_code(&self.data.gender, forward);
        self.data.gender = code.to_string();
        self.validate(Field::Gender);
    }

    /// Add the drafted allergy; a duplicate keeps the draft and announces it
    pub fn add_allergy(&mut self) -> AllergyAdd {
        let outcome = self.data.add_allergy(&self.allergy_draft);
        match &outcome {
            AllergyAdd::Added(allergy) => {
                self.allergy_draft.clear();
                self.announcer.polite(format!("{allergy} added to allergies"));
            }
            AllergyAdd::Duplicate(allergy) => {
                self.announcer
                    .polite(format!("{allergy} is already listed"));
            }
            AllergyAdd::Empty => {}
        }
        outcome
    }

    /// Remove the chip at `index`, keeping focus inside the chip list
    pub fn remove_allergy(&mut self, index: usize) -> Option<String> {
        let removed = self.data.remove_allergy(index)?;
        self.announcer
            .polite(format!("{removed} removed from allergies"));
        let remaining = self.data.allergies.len();
        self.focus = if remaining == 0 {
            Focus::AllergyInput
        } else {
            Focus::Allergy(index.min(remaining - 1))
        };
        Some(removed)
    }

    /// Toggle the condition checkbox at `index`; returns the new state
    pub fn toggle_condition(&mut self, index: usize) -> Option<bool> {
        let condition = CONDITIONS.get(index)?;
        Some(self.data.toggle_condition(condition))
    }

    pub fn toggle_contrast(&mut self) -> bool {
        self.ui.contrast = !self.ui.contrast;
        self.announcer.polite(if self.ui.contrast {
            "High contrast on"
        } else {
            "High contrast off"
        });
        self.ui.contrast
    }

    /// Clear everything the user entered; display preferences survive
    pub fn reset_form(&mut self) {
        self.data = FormData::default();
        self.verdicts.clear();
        self.allergy_draft.clear();
        self.combobox.reset();
        self.review.clear();
    }
}
