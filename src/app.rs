//! Application state and core logic

use crate::config::IntakeConfig;
use crate::platform;
use crate::state::scheduler::{Scheduler, Task};
use crate::state::snapshot::{self, FileSnapshotStore, MemorySnapshotStore, SnapshotStore};
use crate::state::{
    compile_review, render_plain_text, AllergyAdd, Field, FieldKind, Focus, IntakeState,
    NavOutcome, Step, SubmitOutcome, CONDITIONS,
};
use crate::ui::layout::{hit_test, Hit};
use anyhow::Result;
use chrono::Local;
use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;

/// Main application struct
pub struct App {
    /// Everything the screen shows
    pub state: IntakeState,
    store: Box<dyn SnapshotStore>,
    scheduler: Scheduler,
    config: IntakeConfig,
    /// Whether the app should quit
    quit: bool,
    /// Last drawn screen area, for mouse hit tests
    pub screen: Rect,
}

impl App {
    /// Create the app with the store the configuration asks for
    pub fn new(config: IntakeConfig) -> Self {
        let store: Box<dyn SnapshotStore> = match config.data_dir() {
            Some(dir) if config.autosave() => {
                let store = FileSnapshotStore::new(dir, config.storage_key());
                tracing::info!("Saving progress to {}", store.path().display());
                Box::new(store)
            }
            _ => {
                tracing::info!("Autosave off; progress is kept in memory");
                Box::new(MemorySnapshotStore::new())
            }
        };
        Self::with_store(config, store)
    }

    /// Create the app on top of an explicit store, restoring saved progress
    pub fn with_store(config: IntakeConfig, store: Box<dyn SnapshotStore>) -> Self {
        let today = Local::now().date_naive();
        let state = match snapshot::restore(store.as_ref()) {
            Some(saved) => IntakeState::from_snapshot(saved, today),
            None => {
                let mut state = IntakeState::new(today);
                state.ui.contrast = config.high_contrast();
                state
            }
        };

        Self {
            state,
            store,
            scheduler: Scheduler::new(),
            config,
            quit: false,
            screen: Rect::default(),
        }
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn request_quit(&mut self) {
        self.quit = true;
    }

    /// Whether the loop should redraw at animation speed
    pub fn is_busy(&self) -> bool {
        self.state.progress.is_animating() || self.scheduler.has_pending()
    }

    /// Run every scheduled task that has fired since the last frame
    pub fn drain_tasks(&mut self) {
        while let Some(task) = self.scheduler.try_next() {
            self.handle_task(task);
        }
    }

    pub fn handle_task(&mut self, task: Task) {
        match task {
            Task::Commit(field) => self.commit_field(field),
            Task::ProviderFilter => self.commit_provider_filter(),
            Task::Submission => self.finish_submission(),
        }
    }

    /// Validate a field and save progress
    fn commit_field(&mut self, field: Field) {
        self.state.validate(field);
        self.persist(false);
    }

    /// Recompute the provider list from the typed text, then commit it
    fn commit_provider_filter(&mut self) {
        let text = self.state.data.provider.clone();
        self.state.combobox.apply_filter(&text);
        if self.state.focus != Focus::Field(Field::Provider) {
            self.state.combobox.close();
        }
        self.commit_field(Field::Provider);
    }

    /// Apply a filter still waiting on its debounce
    fn flush_provider_filter(&mut self) {
        if self.scheduler.cancel(Task::ProviderFilter) {
            self.commit_provider_filter();
        }
    }

    /// Run any pending debounced commits right away
    fn flush_commits(&mut self) {
        self.flush_provider_filter();
        for field in self.scheduler.cancel_commits() {
            self.commit_field(field);
        }
    }

    /// Write the snapshot; failures are logged by the snapshot layer
    fn persist(&mut self, announce: bool) {
        if snapshot::persist(self.store.as_mut(), &self.state.snapshot()) {
            self.state.last_saved = Some(Local::now());
            if announce {
                self.state.announcer.polite("Progress saved");
            }
        }
    }

    /// Move focus, committing a field that still has a pending commit
    fn focus(&mut self, focus: Focus) {
        let previous = self.state.focus;
        if previous == focus {
            return;
        }
        self.state.set_focus(focus);
        if let Focus::Field(field) = previous {
            if field == Field::Provider && self.scheduler.cancel(Task::ProviderFilter) {
                self.commit_provider_filter();
            } else if self.scheduler.cancel(Task::Commit(field)) {
                self.commit_field(field);
            }
        }
    }

    fn move_focus(&mut self, forward: bool) {
        let target = self.state.adjacent_focus(forward);
        self.focus(target);
    }

    pub fn next_step(&mut self) -> NavOutcome {
        self.flush_commits();
        let outcome = self.state.next_step(None);
        if matches!(outcome, NavOutcome::Moved { .. }) {
            self.persist(false);
        }
        outcome
    }

    pub fn previous_step(&mut self) -> NavOutcome {
        self.flush_commits();
        let outcome = self.state.previous_step(None);
        self.persist(false);
        outcome
    }

    pub fn jump_to_step(&mut self, step: Step) -> NavOutcome {
        self.flush_commits();
        let outcome = self.state.jump_to_step(step);
        if matches!(outcome, NavOutcome::Moved { .. }) {
            self.persist(false);
        }
        outcome
    }

    pub fn submit(&mut self) -> SubmitOutcome {
        self.flush_commits();
        let outcome = self.state.begin_submission();
        match outcome {
            SubmitOutcome::Started => self
                .scheduler
                .schedule(Task::Submission, self.config.submission_delay()),
            SubmitOutcome::Redirected { .. } => self.persist(false),
            SubmitOutcome::Ignored => {}
        }
        outcome
    }

    fn finish_submission(&mut self) {
        self.scheduler.cancel_all();
        self.state.finish_submission();
        snapshot::clear(self.store.as_mut());
    }

    /// Save immediately and say so
    pub fn save_now(&mut self) {
        self.flush_commits();
        self.persist(true);
    }

    pub fn toggle_contrast(&mut self) {
        self.state.toggle_contrast();
        self.persist(false);
    }

    /// Copy the printable summary to the clipboard
    pub fn print_summary(&mut self) {
        let text = render_plain_text(&compile_review(&self.state.data));
        match copy_to_clipboard(&text) {
            Ok(()) => {
                self.state.status_message = Some("Summary copied to clipboard".to_string());
            }
            Err(err) => {
                tracing::warn!("Clipboard unavailable: {err}");
                self.state.status_message = Some(format!("Could not copy summary: {err}"));
            }
        }
    }

    /// Cancel outstanding work; pending edits get one last save
    pub fn shutdown(&mut self) {
        let had_filter = self.scheduler.cancel(Task::ProviderFilter);
        let pending_commits = self.scheduler.cancel_commits();
        let cancelled = self.scheduler.cancel_all();
        if (had_filter || !pending_commits.is_empty()) && !self.state.submitting {
            self.persist(false);
        }
        tracing::info!(
            "Shutting down ({} pending tasks cancelled)",
            cancelled + pending_commits.len() + usize::from(had_filter)
        );
    }

    /// Handle a key press
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press || self.state.submitting {
            return;
        }
        self.state.status_message = None;

        if platform::is_shortcut(key.modifiers) {
            match key.code {
                KeyCode::Char('s') => self.save_now(),
                KeyCode::Char('t') => self.toggle_contrast(),
                KeyCode::Char('p') => self.print_summary(),
                KeyCode::Char('n') => {
                    self.next_step();
                }
                KeyCode::Char('b') => {
                    self.previous_step();
                }
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Tab => self.move_focus(true),
            KeyCode::BackTab => self.move_focus(false),
            _ => match self.state.focus {
                Focus::Field(Field::Provider) => self.handle_provider_key(key),
                Focus::Field(field) => self.handle_field_key(field, key),
                Focus::AllergyInput => self.handle_allergy_input_key(key),
                Focus::Allergy(index) => {
                    if matches!(
                        key.code,
                        KeyCode::Enter | KeyCode::Delete | KeyCode::Backspace
                    ) && self.state.remove_allergy(index).is_some()
                    {
                        self.persist(false);
                    }
                }
                Focus::Condition(index) => {
                    if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                        self.toggle_condition(index);
                    }
                }
                focus @ (Focus::Back | Focus::Next | Focus::Submit | Focus::Edit(_)) => {
                    if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                        self.activate(focus);
                    }
                }
            },
        }
    }

    /// Press a button-like control
    fn activate(&mut self, focus: Focus) {
        match focus {
            Focus::Back => {
                self.previous_step();
            }
            Focus::Next => {
                self.next_step();
            }
            Focus::Submit => {
                self.submit();
            }
            Focus::Edit(step) => {
                self.jump_to_step(step);
            }
            Focus::Condition(index) => self.toggle_condition(index),
            _ => {}
        }
    }

    fn toggle_condition(&mut self, index: usize) {
        if let Some(selected) = self.state.toggle_condition(index) {
            let verb = if selected { "checked" } else { "unchecked" };
            self.state
                .announcer
                .polite(format!("{} {verb}", CONDITIONS[index]));
            self.persist(false);
        }
    }

    fn handle_field_key(&mut self, field: Field, key: KeyEvent) {
        if field.kind() == FieldKind::Choice {
            let forward = match key.code {
                KeyCode::Right | KeyCode::Down | KeyCode::Char(' ') => true,
                KeyCode::Left | KeyCode::Up => false,
                _ => return,
            };
            self.state.cycle_gender(forward);
            self.persist(false);
            return;
        }

        let is_text_area = matches!(field.kind(), FieldKind::TextArea { .. });
        let changed = match key.code {
            KeyCode::Char(c) if platform::is_text_input(key.modifiers) => {
                self.state.insert_char(field, c)
            }
            KeyCode::Enter if is_text_area => self.state.insert_char(field, '\n'),
            KeyCode::Enter => {
                self.move_focus(true);
                return;
            }
            KeyCode::Backspace => self.state.delete_char(field),
            _ => return,
        };
        if changed {
            self.scheduler
                .schedule(Task::Commit(field), self.config.input_debounce());
        }
    }

    fn handle_provider_key(&mut self, key: KeyEvent) {
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        let was_open = self.state.combobox.is_open();
        // List keys act on the options for the text as typed so far
        if !matches!(key.code, KeyCode::Char(_) | KeyCode::Backspace) {
            self.flush_provider_filter();
        }
        match key.code {
            KeyCode::Enter if self.state.combobox.is_open() => self.commit_provider_option(None),
            KeyCode::Enter => self.move_focus(true),
            KeyCode::Down if alt => self.toggle_provider_list(was_open),
            KeyCode::F(4) => self.toggle_provider_list(was_open),
            KeyCode::Down => self.state.combobox.move_next(),
            KeyCode::Up => self.state.combobox.move_prev(),
            KeyCode::Home => self.state.combobox.move_first(),
            KeyCode::End => self.state.combobox.move_last(),
            KeyCode::Esc => self.state.combobox.close(),
            KeyCode::Char(c) if platform::is_text_input(key.modifiers) => {
                if self.state.insert_char(Field::Provider, c) {
                    self.schedule_provider_filter();
                }
            }
            KeyCode::Backspace => {
                if self.state.delete_char(Field::Provider) {
                    self.schedule_provider_filter();
                }
            }
            _ => {}
        }
        if let Some(option) = self.state.combobox.active_descendant() {
            tracing::debug!(expanded = self.state.combobox.expanded(), "Active provider {option}");
        }
    }

    fn toggle_provider_list(&mut self, was_open: bool) {
        if was_open {
            self.state.combobox.close();
        } else {
            self.state.combobox.open();
        }
    }

    fn schedule_provider_filter(&mut self) {
        self.scheduler
            .schedule(Task::ProviderFilter, self.config.filter_debounce());
    }

    /// Take the option at `index` (or the active one) as the provider
    fn commit_provider_option(&mut self, index: Option<usize>) {
        let combobox = &mut self.state.combobox;
        let chosen = match index {
            Some(index) => combobox.select(index),
            None => combobox.commit(),
        };
        if let Some(name) = chosen {
            self.scheduler.cancel(Task::ProviderFilter);
            self.state.data.provider = name.to_string();
            self.state.set_focus(Focus::Field(Field::Provider));
            self.state.announcer.polite(format!("{name} selected"));
            self.commit_field(Field::Provider);
        }
    }

    fn handle_allergy_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                if let AllergyAdd::Added(_) = self.state.add_allergy() {
                    self.persist(false);
                }
            }
            KeyCode::Char(c) if platform::is_text_input(key.modifiers) => {
                self.state.allergy_draft.push(c);
            }
            KeyCode::Backspace => {
                self.state.allergy_draft.pop();
            }
            _ => {}
        }
    }

    /// Handle mouse input
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.state.submitting {
            return;
        }
        let MouseEventKind::Down(MouseButton::Left) = mouse.kind else {
            return;
        };

        let was_open = self.state.combobox.is_open();
        match hit_test(&self.state, self.screen, mouse.column, mouse.row) {
            Some(Hit::ProviderOption(index)) => self.commit_provider_option(Some(index)),
            Some(Hit::ProviderToggle) => {
                self.focus(Focus::Field(Field::Provider));
                self.state.combobox.toggle();
            }
            Some(Hit::Focus(focus)) => {
                if was_open && focus != Focus::Field(Field::Provider) {
                    self.state.combobox.close();
                }
                self.focus(focus);
                if focus.is_button() || matches!(focus, Focus::Edit(_) | Focus::Condition(_)) {
                    self.activate(focus);
                }
            }
            None => self.state.combobox.close(),
        }
    }
}

fn copy_to_clipboard(text: &str) -> Result<()> {
    use arboard::Clipboard;
    let mut clipboard = Clipboard::new()?;
    clipboard.set_text(text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::snapshot::{MockSnapshotStore, StorageError};
    use crate::state::FormData;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn memory_app() -> App {
        App::with_store(IntakeConfig::default(), Box::new(MemorySnapshotStore::new()))
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn ctrl(app: &mut App, c: char) {
        app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn stored(app: &App) -> Option<crate::state::PersistedSnapshot> {
        snapshot::restore(app.store.as_ref())
    }

    fn valid_data() -> FormData {
        FormData {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            date_of_birth: "1990-04-12".into(),
            phone: "+1 555 123 4567".into(),
            email: "ada@example.com".into(),
            address_line1: "1 Main St".into(),
            city: "Leeds".into(),
            postal_code: "LS1 4AP".into(),
            country: "United Kingdom".into(),
            provider: "Allianz".into(),
            policy_number: "AB-123456".into(),
            confirm_policy_number: "AB-123456".into(),
            coverage_start: "2024-01-01".into(),
            ..Default::default()
        }
    }

    async fn settle(app: &mut App) {
        tokio::time::sleep(Duration::from_millis(1_000)).await;
        app.drain_tasks();
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_commits_after_pause() {
        let mut app = memory_app();
        type_text(&mut app, "Ada");
        assert_eq!(app.state.data.first_name, "Ada");
        assert_eq!(app.state.verdicts.get(Field::FirstName), None);
        assert!(stored(&app).is_none());

        settle(&mut app).await;
        assert_eq!(app.state.verdicts.get(Field::FirstName), Some(true));
        assert_eq!(stored(&app).unwrap().data.first_name, "Ada");
        assert!(app.state.last_saved.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_leaving_field_commits_immediately() {
        let mut app = memory_app();
        type_text(&mut app, "A");
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.state.focus, Focus::Field(Field::LastName));
        assert_eq!(app.state.verdicts.get(Field::FirstName), Some(true));
        assert_eq!(stored(&app).unwrap().data.first_name, "A");
        assert!(!app.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn test_next_refused_on_empty_form() {
        let mut app = memory_app();
        ctrl(&mut app, 'n');
        assert_eq!(app.state.step(), Step::Demographics);
        assert_eq!(app.state.focus, Focus::Field(Field::FirstName));
        assert!(app.state.announcer.assertive_message().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_next_persists_new_step() {
        let mut app = memory_app();
        app.state.data = valid_data();
        ctrl(&mut app, 'n');
        assert_eq!(app.state.step(), Step::Insurance);
        assert_eq!(stored(&app).unwrap().step, Step::Insurance);
        // Transitions save silently
        assert_ne!(app.state.announcer.polite_message(), Some("Progress saved"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_restores_saved_progress() {
        let mut store = MemorySnapshotStore::new();
        store
            .write(r#"{"step":3,"data":{"firstName":"Ada","allergies":["Latex","Latex"]}}"#)
            .unwrap();
        let app = App::with_store(IntakeConfig::default(), Box::new(store));
        assert_eq!(app.state.step(), Step::History);
        assert_eq!(app.state.data.first_name, "Ada");
        assert_eq!(app.state.data.allergies, vec!["Latex".to_string()]);
        assert_eq!(app.state.announcer.current(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cold_start_uses_configured_contrast() {
        let config = IntakeConfig {
            high_contrast: Some(true),
            ..Default::default()
        };
        let app = App::with_store(config, Box::new(MemorySnapshotStore::new()));
        assert!(app.state.ui.contrast);
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_save_announces() {
        let mut app = memory_app();
        ctrl(&mut app, 's');
        assert_eq!(app.state.announcer.polite_message(), Some("Progress saved"));
        assert!(stored(&app).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_contrast_toggle_persists() {
        let mut app = memory_app();
        ctrl(&mut app, 't');
        assert!(app.state.ui.contrast);
        assert!(stored(&app).unwrap().ui.contrast);
    }

    #[tokio::test(start_paused = true)]
    async fn test_provider_typing_filters_after_pause() {
        let mut app = memory_app();
        app.state.go_to(Step::Insurance, false);
        type_text(&mut app, "cig");
        assert_eq!(app.state.data.provider, "cig");
        assert!(!app.state.combobox.is_open());

        settle(&mut app).await;
        assert!(app.state.combobox.is_open());
        assert_eq!(app.state.combobox.options(), &["Cigna"]);
        assert_eq!(
            app.state.combobox.active_descendant().as_deref(),
            Some("provider-option-0")
        );

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state.data.provider, "Cigna");
        assert!(!app.state.combobox.is_open());
        assert_eq!(app.state.focus, Focus::Field(Field::Provider));
        assert_eq!(app.state.verdicts.get(Field::Provider), Some(true));
        assert_eq!(stored(&app).unwrap().data.provider, "Cigna");
    }

    #[tokio::test(start_paused = true)]
    async fn test_altgr_characters_reach_text_fields() {
        let mut app = memory_app();
        type_text(&mut app, "Ada");
        let altgr = KeyModifiers::CONTROL | KeyModifiers::ALT;
        app.handle_key(KeyEvent::new(KeyCode::Char('@'), altgr));
        app.handle_key(KeyEvent::new(KeyCode::Char('s'), altgr));
        assert_eq!(app.state.data.first_name, "Ada@s");
        assert!(stored(&app).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_provider_enter_uses_text_typed_before_filter_fires() {
        let mut app = memory_app();
        app.state.go_to(Step::Insurance, false);
        type_text(&mut app, "a");
        settle(&mut app).await;
        assert_eq!(app.state.combobox.options()[0], "Aetna");

        type_text(&mut app, "llianz");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state.data.provider, "Allianz");
        assert_eq!(stored(&app).unwrap().data.provider, "Allianz");

        settle(&mut app).await;
        assert_eq!(app.state.data.provider, "Allianz");
        assert!(!app.state.combobox.is_open());
    }

    #[tokio::test(start_paused = true)]
    async fn test_provider_arrows_follow_pending_filter() {
        let mut app = memory_app();
        app.state.go_to(Step::Insurance, false);
        type_text(&mut app, "health");
        press(&mut app, KeyCode::Down);
        assert_eq!(
            app.state.combobox.options(),
            &["Molina Healthcare", "Oscar Health", "UnitedHealthcare", "HealthPartners"]
        );
        assert_eq!(app.state.combobox.active_index(), Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_provider_toggle_opens_pending_filter() {
        let mut app = memory_app();
        app.state.go_to(Step::Insurance, false);
        type_text(&mut app, "cig");
        press(&mut app, KeyCode::F(4));
        assert!(app.state.combobox.is_open());
        assert_eq!(app.state.combobox.options(), &["Cigna"]);

        press(&mut app, KeyCode::F(4));
        assert!(!app.state.combobox.is_open());
    }

    #[tokio::test(start_paused = true)]
    async fn test_provider_keyboard_navigation() {
        let mut app = memory_app();
        app.state.go_to(Step::Insurance, false);
        press(&mut app, KeyCode::Down);
        assert!(app.state.combobox.is_open());
        assert_eq!(app.state.combobox.active_index(), Some(0));
        press(&mut app, KeyCode::End);
        assert_eq!(app.state.combobox.active_index(), Some(19));
        press(&mut app, KeyCode::Esc);
        assert!(!app.state.combobox.is_open());
        assert_eq!(app.state.data.provider, "");

        press(&mut app, KeyCode::F(4));
        assert!(app.state.combobox.is_open());
        press(&mut app, KeyCode::Home);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state.data.provider, "Aetna");
    }

    #[tokio::test(start_paused = true)]
    async fn test_allergy_add_and_duplicate() {
        let mut app = memory_app();
        app.state.go_to(Step::History, false);
        assert_eq!(app.state.focus, Focus::AllergyInput);
        type_text(&mut app, "Latex");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state.data.allergies, vec!["Latex".to_string()]);
        assert_eq!(stored(&app).unwrap().data.allergies.len(), 1);

        type_text(&mut app, "Latex");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state.data.allergies.len(), 1);
        assert_eq!(
            app.state.announcer.polite_message(),
            Some("Latex is already listed")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_condition_toggle_persists() {
        let mut app = memory_app();
        app.state.go_to(Step::History, false);
        app.state.set_focus(Focus::Condition(1));
        press(&mut app, KeyCode::Char(' '));
        assert!(stored(&app).unwrap().data.has_condition("Diabetes"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_gender_cycles_and_persists() {
        let mut app = memory_app();
        app.state.set_focus(Focus::Field(Field::Gender));
        press(&mut app, KeyCode::Right);
        assert_eq!(app.state.data.gender, "female");
        assert_eq!(stored(&app).unwrap().data.gender, "female");
    }

    #[tokio::test(start_paused = true)]
    async fn test_text_area_limit() {
        let mut app = memory_app();
        app.state.go_to(Step::History, false);
        app.state.data.medications = "x".repeat(499);
        app.state.set_focus(Focus::Field(Field::Medications));
        type_text(&mut app, "yz");
        assert_eq!(app.state.data.medications.chars().count(), 500);
        assert!(app.state.data.medications.ends_with('y'));
    }

    #[tokio::test(start_paused = true)]
    async fn test_submission_resets_after_delay() {
        let mut app = memory_app();
        app.state.data = valid_data();
        app.state.go_to(Step::Review, false);
        app.persist(false);

        assert_eq!(app.submit(), SubmitOutcome::Started);
        assert!(app.state.submitting);

        // Input is blocked while submitting
        ctrl(&mut app, 'b');
        assert_eq!(app.state.step(), Step::Review);

        tokio::time::sleep(Duration::from_millis(899)).await;
        app.drain_tasks();
        assert!(app.state.submitting);

        settle(&mut app).await;
        assert!(!app.state.submitting);
        assert_eq!(app.state.step(), Step::Demographics);
        assert_eq!(app.state.data, FormData::default());
        assert!(stored(&app).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_redirects_invalid_step() {
        let mut app = memory_app();
        app.state.data = FormData {
            email: "not-an-email".into(),
            ..valid_data()
        };
        app.state.go_to(Step::Review, false);
        assert_eq!(
            app.submit(),
            SubmitOutcome::Redirected {
                step: Step::Demographics,
                first_invalid: Field::Email
            }
        );
        assert!(!app.state.submitting);
        assert_eq!(app.state.focus, Focus::Field(Field::Email));
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_redirect_keeps_saved_form() {
        let mut app = memory_app();
        let data = FormData {
            policy_number: "short".into(),
            confirm_policy_number: "short".into(),
            ..valid_data()
        };
        app.state.data = data.clone();
        app.state.go_to(Step::Review, false);
        app.save_now();
        assert_eq!(stored(&app).unwrap().data, data);

        assert_eq!(
            app.submit(),
            SubmitOutcome::Redirected {
                step: Step::Insurance,
                first_invalid: Field::PolicyNumber
            }
        );
        settle(&mut app).await;

        assert!(!app.state.submitting);
        assert_eq!(app.state.step(), Step::Insurance);
        assert_eq!(app.state.focus, Focus::Field(Field::PolicyNumber));
        assert_eq!(app.state.data, data);
        let saved = stored(&app).unwrap();
        assert_eq!(saved.data, data);
        assert_eq!(saved.step, Step::Insurance);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_saves_pending_edits_and_cancels() {
        let mut app = memory_app();
        type_text(&mut app, "Ada");
        app.shutdown();
        assert_eq!(stored(&app).unwrap().data.first_name, "Ada");

        settle(&mut app).await;
        assert_eq!(app.state.verdicts.get(Field::FirstName), None);
        assert!(!app.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_during_submission_skips_save() {
        let mut app = memory_app();
        app.state.data = valid_data();
        app.state.go_to(Step::Review, false);
        app.submit();
        app.scheduler
            .schedule(Task::Commit(Field::Notes), Duration::from_millis(60));
        app.shutdown();
        assert!(stored(&app).is_none());
        settle(&mut app).await;
        assert!(app.state.submitting);
    }

    #[tokio::test(start_paused = true)]
    async fn test_storage_failure_is_not_fatal() {
        let mut store = MockSnapshotStore::new();
        store.expect_read().returning(|| Ok(None));
        store
            .expect_write()
            .returning(|_| Err(StorageError::Unavailable));
        let mut app = App::with_store(IntakeConfig::default(), Box::new(store));

        ctrl(&mut app, 's');
        assert!(app.state.last_saved.is_none());
        assert_ne!(app.state.announcer.polite_message(), Some("Progress saved"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_click_focuses_and_activates() {
        let mut app = memory_app();
        app.screen = Rect::new(0, 0, 80, 40);
        app.state.data = valid_data();
        let click = |column, row| MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        };

        // Last name row: header 3 + steps 1 + border 1 + first field 3
        app.handle_mouse(click(10, 9));
        assert_eq!(app.state.focus, Focus::Field(Field::LastName));

        // Next button after scrolling to it
        app.state.set_focus(Focus::Next);
        let inner = crate::ui::layout::content_inner(
            crate::ui::layout::screen_layout(app.screen).content,
        );
        let row = crate::ui::layout::place_rows(&app.state, inner)
            .into_iter()
            .find(|r| r.kind == crate::ui::layout::RowKind::Buttons)
            .unwrap();
        app.handle_mouse(click(row.area.x + 2, row.area.y + 1));
        assert_eq!(app.state.step(), Step::Insurance);
    }
}
