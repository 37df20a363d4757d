//! Step state machine
//!
//! Four ordered steps. Moving forward is gated on the current step's
//! aggregate validity; moving back never is. Every transition re-renders the
//! target step: progress, focus and a polite announcement.

use crate::state::validation::check_step;
use crate::state::{compile_review, Field, Focus, IntakeState};
use serde::{Deserialize, Serialize};

pub const TOTAL_STEPS: u8 = 4;

/// One section of the intake form
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(from = "i64", into = "u8")]
pub enum Step {
    #[default]
    Demographics = 1,
    Insurance = 2,
    History = 3,
    Review = 4,
}

impl Step {
    pub const ALL: [Step; 4] = [
        Step::Demographics,
        Step::Insurance,
        Step::History,
        Step::Review,
    ];

    /// Step for an ordinal, clamped to `1..=4`
    pub fn from_number(number: i64) -> Self {
        match number {
            i64::MIN..=1 => Step::Demographics,
            2 => Step::Insurance,
            3 => Step::History,
            _ => Step::Review,
        }
    }

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::Demographics => "Demographics",
            Step::Insurance => "Insurance",
            Step::History => "Medical history",
            Step::Review => "Review",
        }
    }

    pub fn next(self) -> Self {
        Self::from_number(i64::from(self.number()) + 1)
    }

    pub fn previous(self) -> Self {
        Self::from_number(i64::from(self.number()) - 1)
    }

    /// Scalar fields shown on this step, in order
    pub fn fields(self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|f| f.step() == self)
            .collect()
    }
}

impl From<i64> for Step {
    fn from(number: i64) -> Self {
        Self::from_number(number)
    }
}

impl From<Step> for u8 {
    fn from(step: Step) -> Self {
        step.number()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavigationState {
    pub step: Step,
}

impl NavigationState {
    pub fn progress_percent(&self) -> f64 {
        f64::from(self.step.number()) / f64::from(TOTAL_STEPS) * 100.0
    }
}

/// Result of a navigation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    Moved { from: Step, to: Step },
    /// The current step has failing fields; nothing moved
    Refused {
        first_invalid: Field,
        invalid_count: usize,
    },
}

/// Result of a submit request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// All steps valid; the submission delay has started
    Started,
    /// A step failed and is now shown for correction
    Redirected { step: Step, first_invalid: Field },
    /// Not on the review step, or a submission is already in flight
    Ignored,
}

fn field_count(count: usize) -> String {
    if count == 1 {
        "1 field".to_string()
    } else {
        format!("{count} fields")
    }
}

impl IntakeState {
    /// Advance to `target` (default: the following step) if the current step
    /// passes validation
    pub fn next_step(&mut self, target: Option<u8>) -> NavOutcome {
        let from = self.nav.step;
        if let Some((first_invalid, invalid_count)) = self.check_and_mark(from) {
            self.set_focus(Focus::Field(first_invalid));
            self.announcer.assertive(format!(
                "Please correct {} in {} before continuing",
                field_count(invalid_count),
                from.title()
            ));
            tracing::info!(
                "Step {} refused: {} invalid, first {:?}",
                from.number(),
                invalid_count,
                first_invalid
            );
            return NavOutcome::Refused {
                first_invalid,
                invalid_count,
            };
        }

        let to = target
            .map(|n| Step::from_number(i64::from(n)))
            .unwrap_or_else(|| from.next());
        self.go_to(to, true);
        NavOutcome::Moved { from, to }
    }

    /// Go back to `target` (default: the preceding step). Never gated and
    /// never moves forward.
    pub fn previous_step(&mut self, target: Option<u8>) -> NavOutcome {
        let from = self.nav.step;
        let to = target
            .map(|n| Step::from_number(i64::from(n)))
            .unwrap_or_else(|| from.previous())
            .min(from);
        self.go_to(to, true);
        NavOutcome::Moved { from, to }
    }

    /// Jump to a section for correction. Earlier steps are always reachable;
    /// a later step goes through the forward gate.
    pub fn jump_to_step(&mut self, step: Step) -> NavOutcome {
        let from = self.nav.step;
        if step > from {
            return self.next_step(Some(step.number()));
        }
        self.go_to(step, true);
        NavOutcome::Moved { from, to: step }
    }

    /// Re-validate steps 1-3 and start the simulated submission
    pub fn begin_submission(&mut self) -> SubmitOutcome {
        if self.submitting || self.nav.step != Step::Review {
            return SubmitOutcome::Ignored;
        }
        for step in [Step::Demographics, Step::Insurance, Step::History] {
            if let Some((first_invalid, invalid_count)) = self.check_and_mark(step) {
                self.go_to(step, true);
                self.set_focus(Focus::Field(first_invalid));
                self.announcer.assertive(format!(
                    "Please correct {} in {} before submitting",
                    field_count(invalid_count),
                    step.title()
                ));
                tracing::info!("Submission redirected to step {}", step.number());
                return SubmitOutcome::Redirected {
                    step,
                    first_invalid,
                };
            }
        }
        self.submitting = true;
        self.announcer.polite("Submitting your intake form");
        tracing::info!("Submission started");
        SubmitOutcome::Started
    }

    /// Record verdicts for every field `step` checks; returns the first
    /// failing field and how many failed
    fn check_and_mark(&mut self, step: Step) -> Option<(Field, usize)> {
        let mut first_invalid = None;
        let mut invalid_count = 0;
        for (field, valid) in check_step(step, &self.data, self.today) {
            self.verdicts.mark(field, valid);
            if !valid {
                invalid_count += 1;
                first_invalid.get_or_insert(field);
            }
        }
        first_invalid.map(|field| (field, invalid_count))
    }

    /// Complete a started submission: clear the form and start over
    pub fn finish_submission(&mut self) {
        if !self.submitting {
            return;
        }
        self.submitting = false;
        self.reset_form();
        self.go_to(Step::Demographics, false);
        self.announcer
            .polite("Thank you. Your intake form was submitted.");
        tracing::info!("Submission complete, form reset");
    }

    /// Show `step`: recompile the review when entering it, move the progress
    /// gauge, focus the first invalid field (or first control) and announce
    pub fn go_to(&mut self, step: Step, announce: bool) {
        if step == Step::Review {
            self.review = compile_review(&self.data);
        }
        self.nav.step = step;
        self.combobox.close();
        self.announcer.clear_assertive();
        self.progress.retarget(self.nav.progress_percent());
        self.focus = self.first_focus(step);
        if announce {
            self.announcer.polite(format!(
                "Step {} of {}: {}",
                step.number(),
                TOTAL_STEPS,
                step.title()
            ));
        }
        tracing::debug!("Showing step {}", step.number());
    }
}
