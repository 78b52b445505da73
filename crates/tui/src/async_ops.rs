use journey_api_client::ClientFactory;
use journey_client::Controller;
use journey_core::{JournalEntry, Result};

/// Actions that talk to the backend. Queued by key handling, run by the
/// event loop one at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsyncCommand {
    /// Resume the stored key at startup.
    Load,
    GenerateKey,
    /// Sign in with the key typed into the key input.
    SignIn,
    /// Submit the name typed into the name input.
    SubmitName,
    /// Save the current draft.
    SaveEntry,
    DeleteEntry {
        entry_id: String,
    },
    Reload,
}

/// Results returned by async commands. Failure messages are already on the
/// controller; these only tell the app what finished.
#[derive(Debug)]
pub enum CommandResult {
    Loaded(Result<()>),
    KeyGenerated(Result<()>),
    SignedIn(Result<()>),
    NameSaved(Result<()>),
    EntrySaved(Result<Option<JournalEntry>>),
    EntryDeleted(Result<()>),
    Reloaded(Result<()>),
}

pub async fn execute<F: ClientFactory>(
    cmd: AsyncCommand,
    controller: &mut Controller<F>,
) -> CommandResult {
    match cmd {
        AsyncCommand::Load => CommandResult::Loaded(controller.load().await),
        AsyncCommand::GenerateKey => {
            CommandResult::KeyGenerated(controller.generate_new_user().await)
        }
        AsyncCommand::SignIn => CommandResult::SignedIn(controller.sign_in().await),
        AsyncCommand::SubmitName => CommandResult::NameSaved(controller.submit_name().await),
        AsyncCommand::SaveEntry => CommandResult::EntrySaved(controller.save_entry().await),
        AsyncCommand::DeleteEntry { entry_id } => {
            CommandResult::EntryDeleted(controller.delete_entry(&entry_id).await)
        }
        AsyncCommand::Reload => CommandResult::Reloaded(controller.reload_entries().await),
    }
}
