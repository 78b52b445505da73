use crossterm::event::KeyCode;
use journey_api_client::ClientFactory;
use journey_client::{Controller, Page, Screen};
use journey_core::JournalEntry;
use journey_core::format::{checked_date_format, local_timestamp};
use journey_runtime_config::UiSettings;
use tokio::runtime::Runtime;
use tracing::debug;

use crate::async_ops::{self, AsyncCommand, CommandResult};
use crate::views::modal::{ConfirmAction, Modal};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashLevel {
    Success,
    Info,
}

/// Which text input receives typed characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    KeyInput,
    NameInput,
    Draft,
}

pub struct App<F: ClientFactory> {
    pub controller: Controller<F>,
    pub focus: Option<Focus>,
    /// Index into the entry list on the Main page.
    pub selected: usize,
    pub modal: Option<Modal>,
    pub flash_message: Option<(String, FlashLevel)>,
    pub pending_command: Option<AsyncCommand>,
    pub date_format: String,
}

impl<F: ClientFactory> App<F> {
    pub fn new(controller: Controller<F>, ui: &UiSettings) -> Self {
        Self {
            controller,
            focus: None,
            selected: 0,
            modal: None,
            flash_message: None,
            pending_command: None,
            date_format: checked_date_format(&ui.date_format),
        }
    }

    pub fn screen(&self) -> Screen {
        self.controller.screen()
    }

    pub fn busy(&self) -> bool {
        self.pending_command.is_some()
    }

    pub fn selected_entry(&self) -> Option<&JournalEntry> {
        self.controller.entries().get(self.selected)
    }

    pub fn format_time(&self, entry: &JournalEntry) -> String {
        local_timestamp(&entry.created_at, &self.date_format)
    }

    /// Current contents of `focus`'s input.
    pub fn input(&self, focus: Focus) -> &str {
        match focus {
            Focus::KeyInput => self.controller.key_input(),
            Focus::NameInput => self.controller.name_input(),
            Focus::Draft => self.controller.draft(),
        }
    }

    fn input_mut(&mut self, focus: Focus) -> &mut String {
        match focus {
            Focus::KeyInput => self.controller.key_input_mut(),
            Focus::NameInput => self.controller.name_input_mut(),
            Focus::Draft => self.controller.draft_mut(),
        }
    }

    /// Returns true if the app should quit.
    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        self.flash_message = None;

        if self.modal.is_some() {
            return self.handle_modal_key(key);
        }

        if let Some(focus) = self.focus {
            self.handle_edit_key(focus, key);
            return false;
        }

        match self.screen() {
            Screen::Welcome => self.handle_welcome_key(key),
            Screen::Onboarding => self.handle_onboarding_key(key),
            Screen::Journal(page) => self.handle_journal_key(page, key),
        }
    }

    fn handle_edit_key(&mut self, focus: Focus, key: KeyCode) {
        match key {
            KeyCode::Esc => self.focus = None,
            KeyCode::Enter => {
                self.focus = None;
                self.pending_command = Some(match focus {
                    Focus::KeyInput => AsyncCommand::SignIn,
                    Focus::NameInput => AsyncCommand::SubmitName,
                    Focus::Draft => AsyncCommand::SaveEntry,
                });
            }
            KeyCode::Backspace => {
                self.input_mut(focus).pop();
            }
            KeyCode::Char(c) => self.input_mut(focus).push(c),
            _ => {}
        }
    }

    fn handle_welcome_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char('q') => return true,
            KeyCode::Char('g') => self.pending_command = Some(AsyncCommand::GenerateKey),
            KeyCode::Char('i') | KeyCode::Enter => self.focus = Some(Focus::KeyInput),
            KeyCode::Esc => self.controller.clear_error(),
            _ => {}
        }
        false
    }

    fn handle_onboarding_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char('q') => return true,
            KeyCode::Char('i') | KeyCode::Enter => self.focus = Some(Focus::NameInput),
            KeyCode::Char('S') => self.open_sign_out(),
            KeyCode::Esc => self.controller.clear_error(),
            _ => {}
        }
        false
    }

    fn handle_journal_key(&mut self, page: Page, key: KeyCode) -> bool {
        match key {
            KeyCode::Char('q') => return true,
            KeyCode::Char(c @ '1'..='4') => {
                let idx = (c as usize) - ('1' as usize);
                self.controller.set_page(Page::ALL[idx]);
                return false;
            }
            KeyCode::Tab => {
                self.controller.set_page(page.next());
                return false;
            }
            KeyCode::BackTab => {
                self.controller.set_page(page.prev());
                return false;
            }
            KeyCode::Char('r') => {
                self.pending_command = Some(AsyncCommand::Reload);
                return false;
            }
            KeyCode::Char('S') => {
                self.open_sign_out();
                return false;
            }
            KeyCode::Esc => {
                self.controller.clear_error();
                return false;
            }
            _ => {}
        }

        if page == Page::Main {
            self.handle_main_key(key);
        }
        false
    }

    fn handle_main_key(&mut self, key: KeyCode) {
        let count = self.controller.entries().len();
        match key {
            KeyCode::Char('i') | KeyCode::Enter => self.focus = Some(Focus::Draft),
            KeyCode::Char('j') | KeyCode::Down => {
                if self.selected + 1 < count {
                    self.selected += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Char('g') | KeyCode::Home => self.selected = 0,
            KeyCode::Char('G') | KeyCode::End => self.selected = count.saturating_sub(1),
            KeyCode::Char('d') => {
                if let Some(entry) = self.selected_entry() {
                    let preview = journey_core::format::preview(&entry.text, 30);
                    self.modal = Some(Modal::Confirm {
                        title: "Delete entry".to_string(),
                        message: format!("Delete \"{preview}\"?"),
                        action: ConfirmAction::DeleteEntry {
                            entry_id: entry.id.clone(),
                        },
                    });
                }
            }
            _ => {}
        }
    }

    fn open_sign_out(&mut self) {
        self.controller.request_sign_out();
        self.modal = Some(Modal::Confirm {
            title: "Sign out".to_string(),
            message: "Are you sure you want to sign out?".to_string(),
            action: ConfirmAction::SignOut,
        });
    }

    // ── Modal key handler ────────────────────────────────────────────

    fn handle_modal_key(&mut self, key: KeyCode) -> bool {
        let Some(modal) = self.modal.take() else {
            return false;
        };

        let Modal::Confirm { action, .. } = &modal;
        match key {
            KeyCode::Char('y') | KeyCode::Enter => match action.clone() {
                ConfirmAction::DeleteEntry { entry_id } => {
                    self.pending_command = Some(AsyncCommand::DeleteEntry { entry_id });
                }
                ConfirmAction::SignOut => {
                    if self.controller.confirm_sign_out().is_ok() {
                        self.focus = None;
                        self.selected = 0;
                        self.flash_info("Signed out");
                    }
                }
            },
            KeyCode::Char('n') | KeyCode::Esc => {
                if matches!(action, ConfirmAction::SignOut) {
                    self.controller.cancel_sign_out();
                }
            }
            _ => self.modal = Some(modal),
        }
        false
    }

    // ── Async commands ───────────────────────────────────────────────

    /// Run queued commands to completion on `rt`.
    pub fn run_pending(&mut self, rt: &Runtime) {
        while let Some(cmd) = self.pending_command.take() {
            debug!(?cmd, "running command");
            let result = rt.block_on(async_ops::execute(cmd, &mut self.controller));
            self.apply_command_result(result);
        }
    }

    pub fn apply_command_result(&mut self, result: CommandResult) {
        match result {
            CommandResult::KeyGenerated(Ok(())) => {
                self.flash_success("Key created. Save it somewhere safe.");
                self.focus = Some(Focus::NameInput);
            }
            CommandResult::SignedIn(Ok(())) | CommandResult::Loaded(Ok(())) => {
                if self.screen() == Screen::Onboarding {
                    self.focus = Some(Focus::NameInput);
                }
                self.selected = 0;
            }
            CommandResult::NameSaved(Ok(())) => {
                if let Some(name) = self.controller.state().name() {
                    let msg = format!("Welcome, {name}");
                    self.flash_success(msg);
                }
            }
            CommandResult::EntrySaved(Ok(Some(_))) => {
                self.flash_success("Entry saved");
                self.selected = 0;
            }
            CommandResult::EntryDeleted(Ok(())) => self.flash_success("Entry deleted"),
            CommandResult::EntrySaved(Err(_)) => self.focus = Some(Focus::Draft),
            CommandResult::KeyGenerated(Err(_))
            | CommandResult::SignedIn(Err(_))
            | CommandResult::Loaded(Err(_))
            | CommandResult::NameSaved(Err(_))
            | CommandResult::EntrySaved(Ok(None))
            | CommandResult::EntryDeleted(Err(_))
            | CommandResult::Reloaded(_) => {}
        }
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        let count = self.controller.entries().len();
        if self.selected >= count {
            self.selected = count.saturating_sub(1);
        }
    }

    pub fn flash_success(&mut self, msg: impl Into<String>) {
        self.flash_message = Some((msg.into(), FlashLevel::Success));
    }

    pub fn flash_info(&mut self, msg: impl Into<String>) {
        self.flash_message = Some((msg.into(), FlashLevel::Info));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use journey_client::testing::{MemoryBackend, Op};
    use journey_client::{FlowState, MemorySessionStore, Session};
    use journey_core::AccessKey;

    struct Harness {
        app: App<MemoryBackend>,
        backend: MemoryBackend,
        store: MemorySessionStore,
        rt: Runtime,
    }

    impl Harness {
        fn new() -> Self {
            Self::with(MemoryBackend::new(), MemorySessionStore::new())
        }

        fn with(backend: MemoryBackend, store: MemorySessionStore) -> Self {
            let session =
                Session::open(backend.clone(), Box::new(store.clone())).expect("open session");
            let app = App::new(Controller::new(session), &UiSettings::default());
            let rt = Runtime::new().expect("runtime");
            Self {
                app,
                backend,
                store,
                rt,
            }
        }

        fn press(&mut self, key: KeyCode) -> bool {
            let quit = self.app.handle_key(key);
            self.app.run_pending(&self.rt);
            quit
        }

        fn type_text(&mut self, text: &str) {
            for c in text.chars() {
                self.press(KeyCode::Char(c));
            }
        }

        fn texts(&self) -> Vec<String> {
            self.app
                .controller
                .entries()
                .iter()
                .map(|e| e.text.clone())
                .collect()
        }
    }

    fn onboard(h: &mut Harness, name: &str) {
        h.press(KeyCode::Char('g'));
        assert_eq!(h.app.focus, Some(Focus::NameInput));
        h.type_text(name);
        h.press(KeyCode::Enter);
    }

    #[test]
    fn keyboard_walkthrough_from_new_key_to_two_entries() {
        let mut h = Harness::new();
        assert_eq!(h.app.screen(), Screen::Welcome);

        onboard(&mut h, "Ada");
        assert_eq!(h.app.screen(), Screen::Journal(Page::Main));
        assert_eq!(
            h.app.flash_message,
            Some(("Welcome, Ada".to_string(), FlashLevel::Success))
        );

        for note in ["note1", "note2"] {
            h.press(KeyCode::Char('i'));
            h.type_text(note);
            h.press(KeyCode::Enter);
        }
        assert_eq!(h.texts(), vec!["note2", "note1"]);
        assert_eq!(h.app.focus, None);
        assert_eq!(h.app.controller.draft(), "");
    }

    #[test]
    fn typing_into_an_input_does_not_trigger_shortcuts() {
        let mut h = Harness::new();
        h.press(KeyCode::Char('i'));
        h.type_text("gq");
        assert_eq!(h.app.controller.key_input(), "gq");
        assert_eq!(h.backend.total_calls(), 0);

        h.press(KeyCode::Backspace);
        assert_eq!(h.app.controller.key_input(), "g");
        h.press(KeyCode::Esc);
        assert_eq!(h.app.focus, None);
        assert!(h.press(KeyCode::Char('q')));
    }

    #[test]
    fn unknown_key_shows_the_error_and_stays_on_welcome() {
        let mut h = Harness::new();
        h.press(KeyCode::Enter);
        h.type_text("nobody");
        h.press(KeyCode::Enter);
        assert_eq!(h.app.screen(), Screen::Welcome);
        assert_eq!(h.app.controller.error(), Some("Key not found."));
        assert_eq!(h.store.peek(), None);

        h.press(KeyCode::Esc);
        assert_eq!(h.app.controller.error(), None);
    }

    #[test]
    fn startup_load_resumes_into_the_journal() {
        let backend = MemoryBackend::new();
        let key = AccessKey::parse("stored").unwrap();
        backend.register_key(&key);
        backend.seed(
            "journals",
            serde_json::json!({"user_key": "stored", "name": "Lin", "created_at": "2025-01-01T00:00:00Z"}),
        );
        let mut h = Harness::with(backend, MemorySessionStore::with_key(key));
        h.app.pending_command = Some(AsyncCommand::Load);
        h.app.run_pending(&h.rt);
        assert_eq!(h.app.screen(), Screen::Journal(Page::Main));
        assert_eq!(h.app.controller.state().name(), Some("Lin"));
    }

    #[test]
    fn failed_save_refocuses_the_kept_draft() {
        let mut h = Harness::new();
        onboard(&mut h, "Ada");
        h.backend.fail("entries", Op::Insert);

        h.press(KeyCode::Char('i'));
        h.type_text("draft");
        h.press(KeyCode::Enter);
        assert_eq!(h.app.focus, Some(Focus::Draft));
        assert_eq!(h.app.controller.draft(), "draft");
        assert_eq!(
            h.app.controller.error(),
            Some("Failed to save entry: service unavailable")
        );
    }

    #[test]
    fn delete_asks_first() {
        let mut h = Harness::new();
        onboard(&mut h, "Ada");
        for note in ["one", "two"] {
            h.press(KeyCode::Char('i'));
            h.type_text(note);
            h.press(KeyCode::Enter);
        }

        h.press(KeyCode::Char('j'));
        assert_eq!(h.app.selected, 1);
        h.press(KeyCode::Char('d'));
        assert!(h.app.modal.is_some());
        h.press(KeyCode::Char('n'));
        assert!(h.app.modal.is_none());
        assert_eq!(h.texts(), vec!["two", "one"]);

        h.press(KeyCode::Char('d'));
        h.press(KeyCode::Char('y'));
        assert_eq!(h.texts(), vec!["two"]);
        assert_eq!(h.app.selected, 0);
    }

    #[test]
    fn sign_out_can_be_cancelled_or_confirmed() {
        let mut h = Harness::new();
        onboard(&mut h, "Ada");
        let key = h.app.controller.state().key().cloned().expect("key");

        h.press(KeyCode::Char('S'));
        assert!(h.app.controller.sign_out_pending());
        h.press(KeyCode::Char('x'));
        assert!(h.app.modal.is_some());
        h.press(KeyCode::Esc);
        assert!(!h.app.controller.sign_out_pending());
        assert!(h.app.controller.state().is_active());
        assert_eq!(h.store.peek(), Some(key));

        h.press(KeyCode::Char('S'));
        h.press(KeyCode::Char('y'));
        assert_eq!(h.app.controller.state(), &FlowState::Welcome);
        assert_eq!(h.store.peek(), None);
        assert_eq!(
            h.app.flash_message,
            Some(("Signed out".to_string(), FlashLevel::Info))
        );
    }

    #[test]
    fn pages_switch_by_number_and_tab() {
        let mut h = Harness::new();
        onboard(&mut h, "Ada");

        h.press(KeyCode::Char('4'));
        assert_eq!(h.app.screen(), Screen::Journal(Page::Profile));
        h.press(KeyCode::Tab);
        assert_eq!(h.app.screen(), Screen::Journal(Page::Main));
        h.press(KeyCode::BackTab);
        assert_eq!(h.app.screen(), Screen::Journal(Page::Profile));

        // Entry shortcuts only apply on Main.
        h.press(KeyCode::Char('i'));
        assert_eq!(h.app.focus, None);
    }

    #[test]
    fn invalid_date_format_falls_back() {
        let ui = UiSettings {
            date_format: "%Q".to_string(),
            ..UiSettings::default()
        };
        let session = Session::open(MemoryBackend::new(), Box::new(MemorySessionStore::new()))
            .expect("session");
        let app = App::new(Controller::new(session), &ui);
        assert_eq!(app.date_format, "%Y-%m-%d %H:%M");
    }
}
