//! Live-region style announcements
//!
//! Two channels mirror the polite and assertive regions a screen reader
//! would watch. The status bar renders whichever is current.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Politeness {
    Polite,
    Assertive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub politeness: Politeness,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct Announcer {
    polite: Option<String>,
    assertive: Option<String>,
}

impl Announcer {
    pub fn polite(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(target: "intake_tui::announce", "polite: {message}");
        self.polite = Some(message);
    }

    pub fn assertive(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(target: "intake_tui::announce", "assertive: {message}");
        self.assertive = Some(message);
    }

    pub fn clear_assertive(&mut self) {
        self.assertive = None;
    }

    #[cfg(test)]
    pub fn polite_message(&self) -> Option<&str> {
        self.polite.as_deref()
    }

    #[cfg(test)]
    pub fn assertive_message(&self) -> Option<&str> {
        self.assertive.as_deref()
    }

    /// Urgent messages take precedence over non-urgent ones
    pub fn current(&self) -> Option<Announcement> {
        if let Some(message) = &self.assertive {
            return Some(Announcement {
                politeness: Politeness::Assertive,
                message: message.clone(),
            });
        }
        self.polite.as_ref().map(|message| Announcement {
            politeness: Politeness::Polite,
            message: message.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_by_default() {
        assert_eq!(Announcer::default().current(), None);
    }

    #[test]
    fn test_assertive_takes_precedence() {
        let mut announcer = Announcer::default();
        announcer.polite("Step 2 of 4: Insurance");
        announcer.assertive("Please correct 2 fields");
        assert_eq!(
            announcer.current().map(|a| a.politeness),
            Some(Politeness::Assertive)
        );

        announcer.clear_assertive();
        let current = announcer.current().unwrap();
        assert_eq!(current.politeness, Politeness::Polite);
        assert_eq!(current.message, "Step 2 of 4: Insurance");
    }
}
