//! Owned record of every value the user has entered

use super::field::Field;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Checkbox options on the history step
pub const CONDITIONS: [&str; 8] = [
    "Asthma",
    "Diabetes",
    "Hypertension",
    "Heart disease",
    "Epilepsy",
    "Arthritis",
    "Cancer",
    "Depression",
];

/// Result of adding an allergy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllergyAdd {
    Added(String),
    /// Already listed (case-sensitive match); nothing changed
    Duplicate(String),
    /// Input was blank after trimming
    Empty,
}

/// All intake values. Every field always holds a defined value; missing keys
/// in a snapshot deserialize to empty strings and empty collections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormData {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub gender: String,
    pub phone: String,
    pub email: String,
    pub address_line1: String,
    pub address_line2: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    pub provider: String,
    pub policy_number: String,
    pub confirm_policy_number: String,
    pub group_number: String,
    pub coverage_start: String,
    pub insurer_phone: String,
    /// Insertion order is display order; entries are unique
    pub allergies: Vec<String>,
    pub conditions: BTreeSet<String>,
    pub medications: String,
    pub notes: String,
}

impl FormData {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::FirstName => &self.first_name,
            Field::LastName => &self.last_name,
            Field::DateOfBirth => &self.date_of_birth,
            Field::Gender => &self.gender,
            Field::Phone => &self.phone,
            Field::Email => &self.email,
            Field::AddressLine1 => &self.address_line1,
            Field::AddressLine2 => &self.address_line2,
            Field::City => &self.city,
            Field::PostalCode => &self.postal_code,
            Field::Country => &self.country,
            Field::Provider => &self.provider,
            Field::PolicyNumber => &self.policy_number,
            Field::ConfirmPolicyNumber => &self.confirm_policy_number,
            Field::GroupNumber => &self.group_number,
            Field::CoverageStart => &self.coverage_start,
            Field::InsurerPhone => &self.insurer_phone,
            Field::Medications => &self.medications,
            Field::Notes => &self.notes,
        }
    }

    pub fn value_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::FirstName => &mut self.first_name,
            Field::LastName => &mut self.last_name,
            Field::DateOfBirth => &mut self.date_of_birth,
            Field::Gender => &mut self.gender,
            Field::Phone => &mut self.phone,
            Field::Email => &mut self.email,
            Field::AddressLine1 => &mut self.address_line1,
            Field::AddressLine2 => &mut self.address_line2,
            Field::City => &mut self.city,
            Field::PostalCode => &mut self.postal_code,
            Field::Country => &mut self.country,
            Field::Provider => &mut self.provider,
            Field::PolicyNumber => &mut self.policy_number,
            Field::ConfirmPolicyNumber => &mut self.confirm_policy_number,
            Field::GroupNumber => &mut self.group_number,
            Field::CoverageStart => &mut self.coverage_start,
            Field::InsurerPhone => &mut self.insurer_phone,
            Field::Medications => &mut self.medications,
            Field::Notes => &mut self.notes,
        }
    }

    #[cfg(test)]
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        *self.value_mut(field) = value.into();
    }

    /// Add a trimmed allergy unless blank or already present
    pub fn add_allergy(&mut self, raw: &str) -> AllergyAdd {
        let allergy = raw.trim();
        if allergy.is_empty() {
            return AllergyAdd::Empty;
        }
        if self.allergies.iter().any(|a| a == allergy) {
            return AllergyAdd::Duplicate(allergy.to_string());
        }
        self.allergies.push(allergy.to_string());
        AllergyAdd::Added(allergy.to_string())
    }

    pub fn remove_allergy(&mut self, index: usize) -> Option<String> {
        (index < self.allergies.len()).then(|| self.allergies.remove(index))
    }

    /// Drop repeated allergies, keeping the first occurrence
    pub fn dedupe_allergies(&mut self) {
        let mut seen = BTreeSet::new();
        self.allergies.retain(|a| seen.insert(a.clone()));
    }

    pub fn has_condition(&self, condition: &str) -> bool {
        self.conditions.contains(condition)
    }

    /// Toggle a condition, returning whether it is now selected
    pub fn toggle_condition(&mut self, condition: &str) -> bool {
        if self.conditions.remove(condition) {
            false
        } else {
            self.conditions.insert(condition.to_string());
            true
        }
    }

    /// Selected conditions in checkbox order, followed by any unknown entries
    pub fn conditions_in_display_order(&self) -> Vec<&str> {
        let mut ordered: Vec<&str> = CONDITIONS
            .iter()
            .copied()
            .filter(|c| self.conditions.contains(*c))
            .collect();
        ordered.extend(
            self.conditions
                .iter()
                .map(String::as_str)
                .filter(|c| !CONDITIONS.contains(c)),
        );
        ordered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_has_every_field_empty() {
        let data = FormData::default();
        for field in Field::ALL {
            assert_eq!(data.get(field), "", "{field:?}");
        }
        assert!(data.allergies.is_empty());
        assert!(data.conditions.is_empty());
    }

    #[test]
    fn test_set_and_get_each_field() {
        let mut data = FormData::default();
        for field in Field::ALL {
            data.set(field, field.key());
        }
        for field in Field::ALL {
            assert_eq!(data.get(field), field.key());
        }
    }

    #[test]
    fn test_add_allergy_trims_and_keeps_order() {
        let mut data = FormData::default();
        assert_eq!(data.add_allergy("  Peanuts "), AllergyAdd::Added("Peanuts".into()));
        assert_eq!(data.add_allergy("Latex"), AllergyAdd::Added("Latex".into()));
        assert_eq!(data.allergies, vec!["Peanuts", "Latex"]);
    }

    #[test]
    fn test_add_duplicate_allergy_is_a_notice() {
        let mut data = FormData::default();
        data.add_allergy("Penicillin");
        assert_eq!(
            data.add_allergy("Penicillin"),
            AllergyAdd::Duplicate("Penicillin".into())
        );
        assert_eq!(data.allergies.len(), 1);
    }

    #[test]
    fn test_allergy_duplicates_are_case_sensitive() {
        let mut data = FormData::default();
        data.add_allergy("Latex");
        assert_eq!(data.add_allergy("latex"), AllergyAdd::Added("latex".into()));
    }

    #[test]
    fn test_blank_allergy_is_ignored() {
        let mut data = FormData::default();
        assert_eq!(data.add_allergy("   "), AllergyAdd::Empty);
        assert!(data.allergies.is_empty());
    }

    #[test]
    fn test_remove_allergy_out_of_range() {
        let mut data = FormData::default();
        data.add_allergy("Peanuts");
        assert_eq!(data.remove_allergy(3), None);
        assert_eq!(data.remove_allergy(0), Some("Peanuts".into()));
    }

    #[test]
    fn test_dedupe_keeps_first_occurrence() {
        let mut data = FormData {
            allergies: vec!["B".into(), "A".into(), "B".into(), "C".into(), "A".into()],
            ..Default::default()
        };
        data.dedupe_allergies();
        assert_eq!(data.allergies, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_toggle_condition() {
        let mut data = FormData::default();
        assert!(data.toggle_condition("Asthma"));
        assert!(data.has_condition("Asthma"));
        assert!(!data.toggle_condition("Asthma"));
        assert!(!data.has_condition("Asthma"));
    }

    #[test]
    fn test_conditions_display_order_follows_checkboxes() {
        let mut data = FormData::default();
        data.toggle_condition("Depression");
        data.toggle_condition("Asthma");
        data.toggle_condition("Gout");
        assert_eq!(
            data.conditions_in_display_order(),
            vec!["Asthma", "Depression", "Gout"]
        );
    }

    #[test]
    fn test_serializes_with_camel_case_keys() {
        let data = FormData::default();
        let json = serde_json::to_value(&data).unwrap();
        for field in Field::ALL {
            assert!(json.get(field.key()).is_some(), "missing {}", field.key());
        }
        assert!(json.get("allergies").unwrap().is_array());
        assert!(json.get("conditions").unwrap().is_array());
    }

    #[test]
    fn test_missing_keys_deserialize_to_empty() {
        let data: FormData = serde_json::from_str(r#"{"firstName": "Ada"}"#).unwrap();
        assert_eq!(data.first_name, "Ada");
        assert_eq!(data.last_name, "");
        assert!(data.allergies.is_empty());
    }
}
