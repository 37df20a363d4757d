//! Field validation rules
//!
//! Predicates are pure: they read values from `FormData` and the current date
//! and never touch rendering state. Verdicts are recorded separately in
//! [`Verdicts`], which the UI reads to mark fields valid or invalid.

use crate::state::{Field, FieldKind, FormData, Step};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use validator::ValidateEmail;

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9\s\-()]{7,20}$").expect("phone pattern"));
static POSTAL_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9\- ]{3,12}$").expect("postal code pattern"));
static POLICY_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9\-]{6,25}$").expect("policy number pattern"));

pub fn is_valid_phone(value: &str) -> bool {
    !value.trim().is_empty() && PHONE_RE.is_match(value)
}

pub fn is_valid_postal_code(value: &str) -> bool {
    POSTAL_CODE_RE.is_match(value)
}

pub fn is_valid_policy_number(value: &str) -> bool {
    POLICY_NUMBER_RE.is_match(value)
}

/// Email shape check on the value as stored; the domain must contain a dot
pub fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.rsplit_once('@') else {
        return false;
    };
    if local.is_empty() || !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.')
    {
        return false;
    }
    value.to_string().validate_email()
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Non-empty, parseable and not after `today`
pub fn is_valid_past_date(value: &str, today: NaiveDate) -> bool {
    parse_date(value).is_some_and(|date| date <= today)
}

/// Validate one field against the current form values
pub fn validate_field(field: Field, data: &FormData, today: NaiveDate) -> bool {
    let value = data.get(field);
    match field {
        Field::DateOfBirth | Field::CoverageStart => is_valid_past_date(value, today),
        Field::Phone => is_valid_phone(value),
        Field::InsurerPhone => value.trim().is_empty() || is_valid_phone(value),
        Field::Email => is_valid_email(value),
        Field::PostalCode => is_valid_postal_code(value),
        Field::PolicyNumber => is_valid_policy_number(value),
        Field::ConfirmPolicyNumber => !value.is_empty() && value == data.policy_number,
        _ => {
            if let FieldKind::TextArea { max_len } = field.kind() {
                if value.chars().count() > max_len {
                    return false;
                }
            }
            !field.is_required() || !value.trim().is_empty()
        }
    }
}

/// Fields that take part in a step's aggregate validity: every required
/// field plus any optional field that currently holds a value
pub fn fields_to_check(step: Step, data: &FormData) -> Vec<Field> {
    step.fields()
        .into_iter()
        .filter(|f| f.is_required() || !data.get(*f).is_empty())
        .collect()
}

/// Run the aggregate check for a step, returning each checked field with its
/// verdict in step order
pub fn check_step(step: Step, data: &FormData, today: NaiveDate) -> Vec<(Field, bool)> {
    fields_to_check(step, data)
        .into_iter()
        .map(|f| (f, validate_field(f, data, today)))
        .collect()
}

/// Per-field verdicts; an absent entry means the field has not been checked
#[derive(Debug, Clone, Default)]
pub struct Verdicts {
    verdicts: HashMap<Field, bool>,
}

impl Verdicts {
    pub fn mark(&mut self, field: Field, valid: bool) {
        self.verdicts.insert(field, valid);
    }

    pub fn get(&self, field: Field) -> Option<bool> {
        self.verdicts.get(&field).copied()
    }

    pub fn is_invalid(&self, field: Field) -> bool {
        self.get(field) == Some(false)
    }

    /// First field in step order currently marked invalid
    pub fn first_invalid_in(&self, step: Step) -> Option<Field> {
        step.fields().into_iter().find(|f| self.is_invalid(*f))
    }

    pub fn clear(&mut self) {
        self.verdicts.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn with(field: Field, value: &str) -> FormData {
        let mut data = FormData::default();
        data.set(field, value);
        data
    }

    #[rstest]
    #[case("+1 555 123 4567", true)]
    #[case("(555) 123-4567", true)]
    #[case("5551234", true)]
    #[case("abc", false)]
    #[case("123", false)]
    #[case("", false)]
    #[case("       ", false)]
    #[case("+1 555 123 4567 890 1234", false)]
    fn test_phone(#[case] value: &str, #[case] expected: bool) {
        assert_eq!(is_valid_phone(value), expected);
    }

    #[rstest]
    #[case("A1B 2C3", true)]
    #[case("90210", true)]
    #[case("SW1A-1AA", true)]
    #[case("##", false)]
    #[case("12", false)]
    #[case("1234567890123", false)]
    fn test_postal_code(#[case] value: &str, #[case] expected: bool) {
        assert_eq!(is_valid_postal_code(value), expected);
    }

    #[rstest]
    #[case("AB-123456", true)]
    #[case("XYZ987654321", true)]
    #[case("short", false)]
    #[case("AB 123456", false)]
    #[case("A234567890123456789012345X", false)]
    fn test_policy_number(#[case] value: &str, #[case] expected: bool) {
        assert_eq!(is_valid_policy_number(value), expected);
    }

    #[rstest]
    #[case("jane.doe@example.com", true)]
    #[case("j+tag@clinic.co.uk", true)]
    #[case("jane@localhost", false)]
    #[case("jane@", false)]
    #[case("@example.com", false)]
    #[case("jane.example.com", false)]
    #[case("jane@example.", false)]
    #[case("", false)]
    #[case(" ada@example.com ", false)]
    #[case("ada @example.com", false)]
    fn test_email(#[case] value: &str, #[case] expected: bool) {
        assert_eq!(is_valid_email(value), expected);
    }

    #[rstest]
    #[case("1990-04-12", true)]
    #[case("2026-10-16", true)]
    #[case("2026-10-17", false)]
    #[case("1990-13-01", false)]
    #[case("12/04/1990", false)]
    #[case("", false)]
    fn test_past_dates(#[case] value: &str, #[case] expected: bool) {
        assert_eq!(is_valid_past_date(value, today()), expected);
        assert_eq!(
            validate_field(Field::DateOfBirth, &with(Field::DateOfBirth, value), today()),
            expected
        );
        assert_eq!(
            validate_field(Field::CoverageStart, &with(Field::CoverageStart, value), today()),
            expected
        );
    }

    #[rstest]
    #[case(Field::FirstName)]
    #[case(Field::LastName)]
    #[case(Field::AddressLine1)]
    #[case(Field::City)]
    #[case(Field::Country)]
    #[case(Field::Provider)]
    fn test_required_non_empty_fields(#[case] field: Field) {
        assert!(!validate_field(field, &with(field, ""), today()));
        assert!(!validate_field(field, &with(field, "   \t"), today()));
        assert!(validate_field(field, &with(field, " x "), today()));
    }

    #[test]
    fn test_insurer_phone_is_optional() {
        assert!(validate_field(Field::InsurerPhone, &with(Field::InsurerPhone, ""), today()));
        assert!(!validate_field(Field::InsurerPhone, &with(Field::InsurerPhone, "abc"), today()));
        assert!(validate_field(
            Field::InsurerPhone,
            &with(Field::InsurerPhone, "800-555-0199"),
            today()
        ));
    }

    #[test]
    fn test_optional_text_is_always_valid() {
        assert!(validate_field(Field::AddressLine2, &FormData::default(), today()));
        assert!(validate_field(Field::GroupNumber, &with(Field::GroupNumber, "G-1"), today()));
        assert!(validate_field(Field::Gender, &FormData::default(), today()));
    }

    #[test]
    fn test_text_area_over_limit_is_invalid() {
        let long = "x".repeat(501);
        assert!(!validate_field(Field::Medications, &with(Field::Medications, &long), today()));
        assert!(validate_field(Field::Medications, &with(Field::Medications, "Aspirin"), today()));
    }

    #[test]
    fn test_confirmation_must_equal_policy_number() {
        let mut data = FormData::default();
        data.policy_number = "AB-123456".into();
        data.confirm_policy_number = "AB-123456".into();
        assert!(validate_field(Field::ConfirmPolicyNumber, &data, today()));

        data.policy_number = "AB-654321".into();
        assert!(!validate_field(Field::ConfirmPolicyNumber, &data, today()));

        data.policy_number.clear();
        data.confirm_policy_number.clear();
        assert!(!validate_field(Field::ConfirmPolicyNumber, &data, today()));
    }

    #[test]
    fn test_fields_to_check_includes_filled_optional_fields() {
        let mut data = FormData::default();
        let fields = fields_to_check(Step::Insurance, &data);
        assert!(!fields.contains(&Field::InsurerPhone));
        assert!(fields.contains(&Field::Provider));

        data.insurer_phone = "nope".into();
        let fields = fields_to_check(Step::Insurance, &data);
        assert!(fields.contains(&Field::InsurerPhone));
        let failing: Vec<Field> = check_step(Step::Insurance, &data, today())
            .into_iter()
            .filter_map(|(field, valid)| (!valid).then_some(field))
            .collect();
        assert_eq!(failing.first(), Some(&Field::Provider));
    }

    #[test]
    fn test_history_step_passes_when_empty() {
        assert!(check_step(Step::History, &FormData::default(), today())
            .iter()
            .all(|(_, valid)| *valid));
        assert!(check_step(Step::Review, &FormData::default(), today()).is_empty());
    }

    #[test]
    fn test_verdicts_first_invalid_follows_step_order() {
        let mut verdicts = Verdicts::default();
        verdicts.mark(Field::Email, false);
        verdicts.mark(Field::LastName, false);
        verdicts.mark(Field::FirstName, true);
        assert_eq!(verdicts.first_invalid_in(Step::Demographics), Some(Field::LastName));
        assert_eq!(verdicts.first_invalid_in(Step::Insurance), None);
        verdicts.clear();
        assert_eq!(verdicts.get(Field::Email), None);
    }
}
