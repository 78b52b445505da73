//! Glue between one CLI invocation and the journal controller: every
//! command resumes the stored key first, then runs a single action.

use anyhow::{Context, Result, anyhow, bail};
use journey_api_client::ClientFactory;
use journey_client::{Controller, FlowState};
use journey_core::{AccessKey, JourneyError};
use tracing::debug;

/// Resume the stored key. A key the registry no longer knows has already
/// been cleared by the controller and is only worth a warning here.
pub async fn resume<F: ClientFactory>(ctl: &mut Controller<F>) -> Result<()> {
    match ctl.load().await {
        Ok(()) => {
            debug!(state = ?ctl.state(), "resumed");
            Ok(())
        }
        Err(JourneyError::KeyNotFound) => {
            eprintln!("Warning: the stored key is no longer registered and was cleared.");
            Ok(())
        }
        Err(e) => Err(surfaced(ctl, e)).context("Could not verify the stored key"),
    }
}

/// Map a controller failure to the message the controller recorded for it.
pub fn surface<T, F: ClientFactory>(
    ctl: &Controller<F>,
    result: journey_core::Result<T>,
) -> Result<T> {
    result.map_err(|e| surfaced(ctl, e))
}

fn surfaced<F: ClientFactory>(ctl: &Controller<F>, err: JourneyError) -> anyhow::Error {
    anyhow!(
        ctl.error()
            .map(str::to_string)
            .unwrap_or_else(|| err.to_string())
    )
}

/// Key and name of an active session, or a hint about what is missing.
pub fn require_active<F: ClientFactory>(ctl: &Controller<F>) -> Result<(AccessKey, String)> {
    match ctl.state() {
        FlowState::Active { key, name } => Ok((key.clone(), name.clone())),
        FlowState::AwaitingName { .. } => {
            bail!("no name set for this key yet (run `journey name <NAME>`)")
        }
        FlowState::Welcome => {
            bail!("not signed in (run `journey new` or `journey sign-in <KEY>`)")
        }
    }
}

/// Fail if loading entries during resume did not succeed, so an empty list
/// is never mistaken for "no entries".
pub fn require_entries<F: ClientFactory>(ctl: &Controller<F>) -> Result<()> {
    match ctl.error() {
        Some(err) => bail!("{err}"),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use journey_client::testing::{MemoryBackend, Op};
    use journey_client::{MemorySessionStore, Session};

    fn controller(backend: &MemoryBackend, store: &MemorySessionStore) -> Controller<MemoryBackend> {
        let session = Session::open(backend.clone(), Box::new(store.clone())).expect("session");
        Controller::new(session)
    }

    #[tokio::test]
    async fn resume_tolerates_a_forgotten_key() {
        let backend = MemoryBackend::new();
        let store = MemorySessionStore::with_key(AccessKey::parse("gone").unwrap());
        let mut ctl = controller(&backend, &store);
        resume(&mut ctl).await.expect("warning only");
        assert_eq!(store.peek(), None);
        assert!(require_active(&ctl).is_err());
    }

    #[tokio::test]
    async fn resume_fails_when_the_backend_is_down() {
        let backend = MemoryBackend::new();
        let key = AccessKey::parse("k").unwrap();
        backend.register_key(&key);
        backend.set_unavailable(true);
        let store = MemorySessionStore::with_key(key.clone());
        let mut ctl = controller(&backend, &store);

        let err = resume(&mut ctl).await.expect_err("backend down");
        assert_eq!(
            format!("{err:#}"),
            "Could not verify the stored key: service unavailable"
        );
        assert_eq!(store.peek(), Some(key));
    }

    #[tokio::test]
    async fn failed_entry_load_is_not_an_empty_journal() {
        let backend = MemoryBackend::new();
        let store = MemorySessionStore::new();
        let mut ctl = controller(&backend, &store);
        ctl.generate_new_user().await.expect("generate");
        ctl.submit_name_value("Ada").await.expect("name");

        backend.fail("entries", Op::Select);
        let mut again = controller(&backend, &store);
        resume(&mut again).await.expect("resumed");
        assert!(require_active(&again).is_ok());
        let err = require_entries(&again).expect_err("load failed");
        assert_eq!(
            err.to_string(),
            "Failed to load entries: service unavailable"
        );
    }

    #[tokio::test]
    async fn require_active_points_at_the_next_step() {
        let backend = MemoryBackend::new();
        let mut ctl = controller(&backend, &MemorySessionStore::new());
        let err = require_active(&ctl).expect_err("welcome");
        assert!(err.to_string().contains("journey new"));

        ctl.generate_new_user().await.expect("generate");
        let err = require_active(&ctl).expect_err("awaiting name");
        assert!(err.to_string().contains("journey name"));
    }
}
