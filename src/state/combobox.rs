//! Provider combobox state
//!
//! A single-select, type-to-filter list bound to the provider text input.
//! Typing updates `FormData.provider` directly; this struct only tracks the
//! popup: which catalog entries match, whether the list is shown and which
//! option is active.

/// Known insurance providers, in display order
pub const PROVIDER_CATALOG: [&str; 20] = [
    "Aetna",
    "Allianz",
    "Anthem",
    "AXA",
    "Blue Cross Blue Shield",
    "Bupa",
    "Centene",
    "Cigna",
    "Highmark",
    "Humana",
    "Kaiser Permanente",
    "Medicaid",
    "Medicare",
    "Molina Healthcare",
    "Oscar Health",
    "Tricare",
    "UnitedHealthcare",
    "WellCare",
    "Aviva",
    "HealthPartners",
];

/// Prefix of option identifiers exposed as the active descendant
pub const OPTION_ID_PREFIX: &str = "provider-option-";

#[derive(Debug, Clone)]
pub struct ProviderCombobox {
    is_open: bool,
    filtered: Vec<&'static str>,
    active_index: Option<usize>,
}

impl Default for ProviderCombobox {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderCombobox {
    /// Closed, unfiltered
    pub fn new() -> Self {
        Self {
            is_open: false,
            filtered: PROVIDER_CATALOG.to_vec(),
            active_index: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn options(&self) -> &[&'static str] {
        &self.filtered
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active_index
    }

    /// Expanded state shared by the input and the toggle control
    pub fn expanded(&self) -> bool {
        self.is_open
    }

    /// Identifier of the active option while the list is open and non-empty
    pub fn active_descendant(&self) -> Option<String> {
        if !self.is_open || self.filtered.is_empty() {
            return None;
        }
        self.active_index
            .map(|index| format!("{OPTION_ID_PREFIX}{index}"))
    }

    /// Recompute matches (case-insensitive substring, catalog order), reset
    /// the active option and open only when something matches
    pub fn apply_filter(&mut self, text: &str) {
        let needle = text.to_lowercase();
        self.filtered = PROVIDER_CATALOG
            .iter()
            .copied()
            .filter(|name| name.to_lowercase().contains(&needle))
            .collect();
        self.active_index = if self.filtered.is_empty() { None } else { Some(0) };
        self.is_open = !self.filtered.is_empty();
    }

    /// Show the list with the current filter state; returns false when there
    /// is nothing to show
    pub fn open(&mut self) -> bool {
        if self.filtered.is_empty() {
            return false;
        }
        self.is_open = true;
        if self.active_index.is_none() {
            self.active_index = Some(0);
        }
        true
    }

    pub fn close(&mut self) {
        self.is_open = false;
    }

    pub fn toggle(&mut self) {
        if self.is_open {
            self.close();
        } else {
            self.open();
        }
    }

    pub fn move_next(&mut self) {
        let last = self.filtered.len().saturating_sub(1);
        self.navigate(|current| current.map_or(0, |i| (i + 1).min(last)));
    }

    pub fn move_prev(&mut self) {
        let last = self.filtered.len().saturating_sub(1);
        self.navigate(|current| current.map_or(last, |i| i.saturating_sub(1)));
    }

    pub fn move_first(&mut self) {
        self.navigate(|_| 0);
    }

    pub fn move_last(&mut self) {
        let last = self.filtered.len().saturating_sub(1);
        self.navigate(|_| last);
    }

    /// Open if closed, then move the active option. No-op on an empty list.
    fn navigate(&mut self, step: impl FnOnce(Option<usize>) -> usize) {
        if self.filtered.is_empty() {
            return;
        }
        let current = self.active_index;
        self.is_open = true;
        self.active_index = Some(step(current));
    }

    /// Commit the active option (or the first) and close; only while open
    pub fn commit(&mut self) -> Option<&'static str> {
        if !self.is_open {
            return None;
        }
        let index = self.active_index.unwrap_or(0);
        self.select(index)
    }

    /// Commit the option at `index` of the filtered list and close
    pub fn select(&mut self, index: usize) -> Option<&'static str> {
        let name = *self.filtered.get(index)?;
        self.active_index = Some(index);
        self.is_open = false;
        Some(name)
    }

    /// Return to the closed, unfiltered state
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
