//! Form field identities and metadata

use crate::state::Step;
use chrono::{Months, NaiveDate};

/// Maximum length of the medications text area
pub const MEDICATIONS_MAX_LEN: usize = 500;
/// Maximum length of the notes text area
pub const NOTES_MAX_LEN: usize = 1000;

/// How a field is edited and rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// ISO `YYYY-MM-DD` typed as text
    Date,
    /// Cycles through a fixed option list
    Choice,
    /// Text input paired with the provider popup list
    Combobox,
    /// Multi-line input with a character counter
    TextArea { max_len: usize },
}

/// Every scalar field of the intake form.
///
/// Collections (allergies, conditions) are not fields; they have their own
/// controls on the history step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    FirstName,
    LastName,
    DateOfBirth,
    Gender,
    Phone,
    Email,
    AddressLine1,
    AddressLine2,
    City,
    PostalCode,
    Country,
    Provider,
    PolicyNumber,
    ConfirmPolicyNumber,
    GroupNumber,
    CoverageStart,
    InsurerPhone,
    Medications,
    Notes,
}

impl Field {
    /// All fields in display order
    pub const ALL: [Field; 19] = [
        Field::FirstName,
        Field::LastName,
        Field::DateOfBirth,
        Field::Gender,
        Field::Phone,
        Field::Email,
        Field::AddressLine1,
        Field::AddressLine2,
        Field::City,
        Field::PostalCode,
        Field::Country,
        Field::Provider,
        Field::PolicyNumber,
        Field::ConfirmPolicyNumber,
        Field::GroupNumber,
        Field::CoverageStart,
        Field::InsurerPhone,
        Field::Medications,
        Field::Notes,
    ];

    /// Key used in the persisted snapshot
    pub fn key(self) -> &'static str {
        match self {
            Field::FirstName => "firstName",
            Field::LastName => "lastName",
            Field::DateOfBirth => "dateOfBirth",
            Field::Gender => "gender",
            Field::Phone => "phone",
            Field::Email => "email",
            Field::AddressLine1 => "addressLine1",
            Field::AddressLine2 => "addressLine2",
            Field::City => "city",
            Field::PostalCode => "postalCode",
            Field::Country => "country",
            Field::Provider => "provider",
            Field::PolicyNumber => "policyNumber",
            Field::ConfirmPolicyNumber => "confirmPolicyNumber",
            Field::GroupNumber => "groupNumber",
            Field::CoverageStart => "coverageStart",
            Field::InsurerPhone => "insurerPhone",
            Field::Medications => "medications",
            Field::Notes => "notes",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::FirstName => "First name",
            Field::LastName => "Last name",
            Field::DateOfBirth => "Date of birth",
            Field::Gender => "Gender",
            Field::Phone => "Phone",
            Field::Email => "Email",
            Field::AddressLine1 => "Address line 1",
            Field::AddressLine2 => "Address line 2",
            Field::City => "City",
            Field::PostalCode => "Postal code",
            Field::Country => "Country",
            Field::Provider => "Insurance provider",
            Field::PolicyNumber => "Policy number",
            Field::ConfirmPolicyNumber => "Confirm policy no.",
            Field::GroupNumber => "Group number",
            Field::CoverageStart => "Coverage start",
            Field::InsurerPhone => "Insurer phone",
            Field::Medications => "Medications",
            Field::Notes => "Additional notes",
        }
    }

    /// The step whose section contains this field
    pub fn step(self) -> Step {
        match self {
            Field::FirstName
            | Field::LastName
            | Field::DateOfBirth
            | Field::Gender
            | Field::Phone
            | Field::Email
            | Field::AddressLine1
            | Field::AddressLine2
            | Field::City
            | Field::PostalCode
            | Field::Country => Step::Demographics,
            Field::Provider
            | Field::PolicyNumber
            | Field::ConfirmPolicyNumber
            | Field::GroupNumber
            | Field::CoverageStart
            | Field::InsurerPhone => Step::Insurance,
            Field::Medications | Field::Notes => Step::History,
        }
    }

    pub fn is_required(self) -> bool {
        matches!(
            self,
            Field::FirstName
                | Field::LastName
                | Field::DateOfBirth
                | Field::Phone
                | Field::Email
                | Field::AddressLine1
                | Field::City
                | Field::PostalCode
                | Field::Country
                | Field::Provider
                | Field::PolicyNumber
                | Field::ConfirmPolicyNumber
                | Field::CoverageStart
        )
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Field::DateOfBirth | Field::CoverageStart => FieldKind::Date,
            Field::Gender => FieldKind::Choice,
            Field::Provider => FieldKind::Combobox,
            Field::Medications => FieldKind::TextArea {
                max_len: MEDICATIONS_MAX_LEN,
            },
            Field::Notes => FieldKind::TextArea {
                max_len: NOTES_MAX_LEN,
            },
            _ => FieldKind::Text,
        }
    }

    /// Message shown next to the field while it is marked invalid
    pub fn invalid_message(self) -> &'static str {
        match self {
            Field::DateOfBirth => "Enter a valid date (YYYY-MM-DD), not in the future",
            Field::CoverageStart => "Enter a coverage start date, not in the future",
            Field::Phone | Field::InsurerPhone => "Enter a valid phone number",
            Field::Email => "Enter a valid email address",
            Field::PostalCode => "Enter a valid postal code",
            Field::PolicyNumber => "6-25 letters, digits or dashes",
            Field::ConfirmPolicyNumber => "Policy numbers do not match",
            Field::Provider => "Select or enter your insurance provider",
            Field::Medications | Field::Notes => "Text is too long",
            _ => "This field is required",
        }
    }

    /// Selectable date range for date inputs as `(earliest, latest)`.
    ///
    /// Advisory only: the validation predicate enforces the upper bound alone.
    pub fn date_bounds(self, today: NaiveDate) -> Option<(Option<NaiveDate>, NaiveDate)> {
        match self {
            Field::DateOfBirth => Some((today.checked_sub_months(Months::new(120 * 12)), today)),
            Field::CoverageStart => Some((None, today)),
            _ => None,
        }
    }

    /// Placeholder hint for empty inputs
    pub fn input_hint(self, today: NaiveDate) -> Option<String> {
        match self.date_bounds(today) {
            Some((Some(earliest), latest)) => Some(format!("YYYY-MM-DD, {earliest} to {latest}")),
            Some((None, latest)) => Some(format!("YYYY-MM-DD, up to {latest}")),
            None => match self {
                Field::Phone | Field::InsurerPhone => Some("+1 555 123 4567".to_string()),
                Field::Email => Some("name@example.com".to_string()),
                Field::Provider => Some("Type to search providers".to_string()),
                _ => None,
            },
        }
    }
}

/// Gender options; the stored value is the code, the review shows the label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Female,
    Male,
    NonBinary,
    Other,
    PreferNotToSay,
}

impl Gender {
    pub const ALL: [Gender; 5] = [
        Gender::Female,
        Gender::Male,
        Gender::NonBinary,
        Gender::Other,
        Gender::PreferNotToSay,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Gender::Female => "female",
            Gender::Male => "male",
            Gender::NonBinary => "non_binary",
            Gender::Other => "other",
            Gender::PreferNotToSay => "prefer_not_to_say",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Gender::Female => "Female",
            Gender::Male => "Male",
            Gender::NonBinary => "Non-binary",
            Gender::Other => "Other",
            Gender::PreferNotToSay => "Prefer not to say",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.code() == code)
    }

    /// Next stored code when cycling; the empty code ("not specified") sits
    /// between the last and the first option
    pub fn cycle_code(current: &str, forward: bool) -> &'static str {
        let position = Self::from_code(current).map(|g| g as usize);
        let len = Self::ALL.len();
        let next = match (position, forward) {
            (None, true) => Some(0),
            (None, false) => Some(len - 1),
            (Some(i), true) if i + 1 < len => Some(i + 1),
            (Some(i), false) if i > 0 => Some(i - 1),
            _ => None,
        };
        next.map(|i| Self::ALL[i].code()).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_step_field_belongs_to_a_form_step() {
        for field in Field::ALL {
            assert_ne!(field.step(), Step::Review, "{field:?}");
        }
    }

    #[test]
    fn test_keys_are_unique() {
        let mut keys: Vec<_> = Field::ALL.iter().map(|f| f.key()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), Field::ALL.len());
    }

    #[test]
    fn test_optional_fields() {
        assert!(!Field::Gender.is_required());
        assert!(!Field::AddressLine2.is_required());
        assert!(!Field::GroupNumber.is_required());
        assert!(!Field::InsurerPhone.is_required());
        assert!(!Field::Notes.is_required());
        assert!(Field::ConfirmPolicyNumber.is_required());
    }

    #[test]
    fn test_text_area_limits() {
        assert_eq!(
            Field::Medications.kind(),
            FieldKind::TextArea { max_len: 500 }
        );
        assert_eq!(Field::Notes.kind(), FieldKind::TextArea { max_len: 1000 });
    }

    #[test]
    fn test_date_of_birth_bounds_span_120_years() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let (earliest, latest) = Field::DateOfBirth.date_bounds(today).unwrap();
        assert_eq!(earliest, NaiveDate::from_ymd_opt(1906, 10, 16));
        assert_eq!(latest, today);
        assert!(Field::City.date_bounds(today).is_none());
    }

    #[test]
    fn test_gender_cycle_wraps_through_unspecified() {
        assert_eq!(Gender::cycle_code("", true), "female");
        assert_eq!(Gender::cycle_code("female", true), "male");
        assert_eq!(Gender::cycle_code("prefer_not_to_say", true), "");
        assert_eq!(Gender::cycle_code("", false), "prefer_not_to_say");
        assert_eq!(Gender::cycle_code("female", false), "");
    }

    #[test]
    fn test_gender_label_lookup() {
        assert_eq!(Gender::from_code("non_binary").map(Gender::label), Some("Non-binary"));
        assert!(Gender::from_code("unknown").is_none());
    }
}
