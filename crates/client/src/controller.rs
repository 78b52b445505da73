//! Top-level view state: owns the session, drives the identity flow and the
//! entry repository, and keeps the one user-facing error message.

use journey_api_client::ClientFactory;
use journey_core::{JournalEntry, JourneyError, Result};
use tracing::warn;

use crate::entries::EntryRepository;
use crate::identity::{FlowState, IdentityFlow};
use crate::session::Session;

/// Pages reachable once signed in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Page {
    #[default]
    Main,
    Analytics,
    Tracking,
    Profile,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Main, Page::Analytics, Page::Tracking, Page::Profile];

    pub fn title(self) -> &'static str {
        match self {
            Page::Main => "Main",
            Page::Analytics => "Analytics",
            Page::Tracking => "Personal Tracking",
            Page::Profile => "Profile",
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// What should be on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Create a key or sign in with one.
    Welcome,
    /// Key shown once, name requested.
    Onboarding,
    /// Signed in, showing one page.
    Journal(Page),
}

/// Pure mapping from flow state to screen.
pub fn screen_for(state: &FlowState, page: Page) -> Screen {
    match state {
        FlowState::Welcome => Screen::Welcome,
        FlowState::AwaitingName { .. } => Screen::Onboarding,
        FlowState::Active { .. } => Screen::Journal(page),
    }
}

const CTX_KEY_CREATE: &str = "Key creation error";
const CTX_SAVE_NAME: &str = "Failed to save name";
const CTX_LOAD_ENTRIES: &str = "Failed to load entries";
const CTX_SAVE_ENTRY: &str = "Failed to save entry";
const CTX_DELETE: &str = "Delete error";

/// The view controller's state and actions.
///
/// Every action clears the previous error before it runs and records at most
/// one new message when it fails. There is no in-flight guard: two overlapping
/// submissions each reach the backend.
pub struct Controller<F: ClientFactory> {
    session: Session<F>,
    flow: IdentityFlow,
    entries: Vec<JournalEntry>,
    key_input: String,
    name_input: String,
    draft: String,
    error: Option<String>,
    sign_out_pending: bool,
    page: Page,
}

impl<F: ClientFactory> Controller<F> {
    pub fn new(session: Session<F>) -> Self {
        Self {
            session,
            flow: IdentityFlow::new(),
            entries: Vec::new(),
            key_input: String::new(),
            name_input: String::new(),
            draft: String::new(),
            error: None,
            sign_out_pending: false,
            page: Page::Main,
        }
    }

    // ── Read access ──────────────────────────────────────────────────

    pub fn session(&self) -> &Session<F> {
        &self.session
    }

    pub fn state(&self) -> &FlowState {
        self.flow.state()
    }

    pub fn screen(&self) -> Screen {
        screen_for(self.flow.state(), self.page)
    }

    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn sign_out_pending(&self) -> bool {
        self.sign_out_pending
    }

    pub fn key_input(&self) -> &str {
        &self.key_input
    }

    pub fn name_input(&self) -> &str {
        &self.name_input
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    // ── Local edits ──────────────────────────────────────────────────

    pub fn key_input_mut(&mut self) -> &mut String {
        &mut self.key_input
    }

    pub fn name_input_mut(&mut self) -> &mut String {
        &mut self.name_input
    }

    pub fn draft_mut(&mut self) -> &mut String {
        &mut self.draft
    }

    pub fn set_page(&mut self, page: Page) {
        self.page = page;
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    // ── Identity ─────────────────────────────────────────────────────

    /// Application load: resume a stored key and, if signed in, load entries.
    pub async fn load(&mut self) -> Result<()> {
        self.error = None;
        let resumed = self.flow.resume(&mut self.session).await;
        self.record(resumed, "")?;
        self.load_entries_if_active().await;
        Ok(())
    }

    pub async fn generate_new_user(&mut self) -> Result<()> {
        self.error = None;
        let generated = self.flow.generate_new_user(&mut self.session).await;
        self.record(generated, CTX_KEY_CREATE)
    }

    /// Sign in with the key currently typed into the key input.
    pub async fn sign_in(&mut self) -> Result<()> {
        let candidate = self.key_input.clone();
        self.sign_in_with_key(&candidate).await
    }

    pub async fn sign_in_with_key(&mut self, candidate: &str) -> Result<()> {
        self.error = None;
        let signed_in = self.flow.sign_in_with_key(&mut self.session, candidate).await;
        self.record(signed_in, "")?;
        self.key_input.clear();
        self.load_entries_if_active().await;
        Ok(())
    }

    /// Submit the name currently typed into the name input.
    pub async fn submit_name(&mut self) -> Result<()> {
        let name = self.name_input.clone();
        self.submit_name_value(&name).await
    }

    pub async fn submit_name_value(&mut self, name: &str) -> Result<()> {
        self.error = None;
        let submitted = self.flow.submit_name(&mut self.session, name).await;
        self.record(submitted, CTX_SAVE_NAME)?;
        self.name_input.clear();
        self.load_entries_if_active().await;
        Ok(())
    }

    /// Open the sign-out confirmation. Nothing is cleared yet.
    pub fn request_sign_out(&mut self) {
        self.sign_out_pending = true;
    }

    pub fn cancel_sign_out(&mut self) {
        self.sign_out_pending = false;
    }

    /// Sign out after confirmation: clears the stored key and every piece of
    /// in-memory identity and entry state. Server rows are untouched.
    pub fn confirm_sign_out(&mut self) -> Result<()> {
        if !self.sign_out_pending {
            return Err(JourneyError::validation("Sign-out was not requested."));
        }
        self.sign_out_pending = false;
        let signed_out = self.flow.sign_out(&mut self.session);
        self.record(signed_out, "")?;
        self.entries.clear();
        self.key_input.clear();
        self.name_input.clear();
        self.draft.clear();
        self.error = None;
        self.page = Page::Main;
        Ok(())
    }

    // ── Entries ──────────────────────────────────────────────────────

    /// Reload the entry list. On failure the previous list stays as it was.
    pub async fn reload_entries(&mut self) -> Result<()> {
        self.error = None;
        let Some(key) = self.flow.state().key().cloned() else {
            return self.record(Err(not_signed_in()), "");
        };
        let listed = EntryRepository::new(self.session.client()).list(&key).await;
        let entries = self.record(listed, CTX_LOAD_ENTRIES)?;
        self.entries = entries;
        Ok(())
    }

    /// Save the current draft. Blank drafts are skipped silently. The draft
    /// is cleared only when the insert succeeds.
    pub async fn save_entry(&mut self) -> Result<Option<JournalEntry>> {
        let draft = self.draft.clone();
        self.save_entry_text(&draft).await
    }

    pub async fn save_entry_text(&mut self, text: &str) -> Result<Option<JournalEntry>> {
        self.error = None;
        let key = match self.flow.state() {
            FlowState::Active { key, .. } => key.clone(),
            _ => return self.record(Err(not_signed_in()), ""),
        };
        let created = EntryRepository::new(self.session.client())
            .create(&key, text)
            .await;
        let Some(entry) = self.record(created, CTX_SAVE_ENTRY)? else {
            return Ok(None);
        };
        self.draft.clear();
        let _ = self.reload_entries().await;
        Ok(Some(entry))
    }

    pub async fn delete_entry(&mut self, entry_id: &str) -> Result<()> {
        self.error = None;
        if !self.flow.state().is_active() {
            return self.record(Err(not_signed_in()), "");
        }
        let deleted = EntryRepository::new(self.session.client())
            .delete(entry_id)
            .await;
        self.record(deleted, CTX_DELETE)?;
        let _ = self.reload_entries().await;
        Ok(())
    }

    async fn load_entries_if_active(&mut self) {
        if self.flow.state().is_active() {
            let _ = self.reload_entries().await;
        }
    }

    /// Keep the failure message (replacing any previous one) and pass the
    /// result through.
    fn record<T>(&mut self, result: Result<T>, context: &str) -> Result<T> {
        if let Err(ref e) = result {
            let message = e.user_message(context);
            warn!(error = %message, "action failed");
            self.error = Some(message);
        }
        result
    }
}

fn not_signed_in() -> JourneyError {
    JourneyError::validation("Sign in to manage journal entries.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use journey_core::AccessKey;

    #[test]
    fn screen_follows_flow_state() {
        let key = AccessKey::generate();
        assert_eq!(screen_for(&FlowState::Welcome, Page::Profile), Screen::Welcome);
        assert_eq!(
            screen_for(&FlowState::AwaitingName { key: key.clone() }, Page::Main),
            Screen::Onboarding
        );
        assert_eq!(
            screen_for(
                &FlowState::Active {
                    key,
                    name: "Ada".into()
                },
                Page::Tracking
            ),
            Screen::Journal(Page::Tracking)
        );
    }

    #[test]
    fn pages_cycle_both_ways() {
        assert_eq!(Page::Main.next(), Page::Analytics);
        assert_eq!(Page::Profile.next(), Page::Main);
        assert_eq!(Page::Main.prev(), Page::Profile);
        assert_eq!(Page::Tracking.title(), "Personal Tracking");
    }
}
