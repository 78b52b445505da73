use anyhow::Result;
use journey_api_client::ClientFactory;
use journey_client::Controller;

use crate::flow::{require_active, require_entries, resume, surface};
use crate::output::{OutputFormat, render_entries};

/// `journey write <TEXT>...`
pub async fn run_write<F: ClientFactory>(ctl: &mut Controller<F>, text: &str) -> Result<()> {
    resume(ctl).await?;
    require_active(ctl)?;

    let saved = ctl.save_entry_text(text).await;
    match surface(ctl, saved)? {
        Some(entry) => {
            println!("Saved entry {}", entry.id);
            // The insert went through even if the follow-up reload did not.
            if let Some(err) = ctl.error() {
                eprintln!("Warning: {err}");
            }
        }
        None => println!("Nothing to save: the entry is empty."),
    }
    Ok(())
}

/// `journey list`
pub async fn run_list<F: ClientFactory>(
    ctl: &mut Controller<F>,
    format: OutputFormat,
    limit: Option<usize>,
    date_format: &str,
) -> Result<()> {
    resume(ctl).await?;
    require_active(ctl)?;
    require_entries(ctl)?;

    let entries = ctl.entries();
    let shown = &entries[..limit.unwrap_or(entries.len()).min(entries.len())];
    println!("{}", render_entries(shown, format, date_format)?);
    if format == OutputFormat::Text && shown.len() < entries.len() {
        println!();
        println!("({} of {} entries shown)", shown.len(), entries.len());
    }
    Ok(())
}

/// `journey delete <ID>`. Rows owned by another key are left alone by the
/// backend, so an id outside the list is reported rather than treated as an
/// error.
pub async fn run_delete<F: ClientFactory>(ctl: &mut Controller<F>, entry_id: &str) -> Result<()> {
    resume(ctl).await?;
    require_active(ctl)?;

    let owned = ctl.entries().iter().any(|e| e.id == entry_id);
    let deleted = ctl.delete_entry(entry_id).await;
    surface(ctl, deleted)?;

    if owned {
        println!("Deleted entry {entry_id}");
    } else {
        println!("No entry {entry_id} in your journal. Nothing was deleted.");
    }
    Ok(())
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

    async fn signed_up(backend: &MemoryBackend) -> MemorySessionStore {
        let store = MemorySessionStore::new();
        let mut ctl = controller(backend, &store);
        ctl.generate_new_user().await.expect("generate");
        ctl.submit_name_value("Ada").await.expect("name");
        store
    }

    #[tokio::test]
    async fn write_then_list_across_invocations() {
        let backend = MemoryBackend::new();
        let store = signed_up(&backend).await;

        run_write(&mut controller(&backend, &store), "note1")
            .await
            .expect("write 1");
        run_write(&mut controller(&backend, &store), "note2")
            .await
            .expect("write 2");

        let mut ctl = controller(&backend, &store);
        run_list(&mut ctl, OutputFormat::Text, None, "%Y")
            .await
            .expect("list");
        let texts: Vec<&str> = ctl.entries().iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts.len(), 2);
        assert!(texts.contains(&"note1") && texts.contains(&"note2"));
    }

    #[tokio::test]
    async fn blank_write_is_not_an_error() {
        let backend = MemoryBackend::new();
        let store = signed_up(&backend).await;
        let inserts = backend.call_count(Op::Insert, "entries");

        run_write(&mut controller(&backend, &store), "   ")
            .await
            .expect("nothing to save");
        assert_eq!(backend.call_count(Op::Insert, "entries"), inserts);
    }

    #[tokio::test]
    async fn write_needs_a_name() {
        let backend = MemoryBackend::new();
        let store = MemorySessionStore::new();
        controller(&backend, &store)
            .generate_new_user()
            .await
            .expect("generate");

        let err = run_write(&mut controller(&backend, &store), "hi")
            .await
            .expect_err("awaiting name");
        assert!(err.to_string().contains("journey name"));
    }

    #[tokio::test]
    async fn failed_write_reports_the_backend_message() {
        let backend = MemoryBackend::new();
        let store = signed_up(&backend).await;
        backend.fail("entries", Op::Insert);

        let err = run_write(&mut controller(&backend, &store), "hi")
            .await
            .expect_err("insert failed");
        assert_eq!(err.to_string(), "Failed to save entry: service unavailable");
    }

    #[tokio::test]
    async fn list_refuses_to_show_an_empty_journal_after_a_failed_load() {
        let backend = MemoryBackend::new();
        let store = signed_up(&backend).await;
        backend.fail("entries", Op::Select);

        let err = run_list(&mut controller(&backend, &store), OutputFormat::Json, None, "%Y")
            .await
            .expect_err("load failed");
        assert_eq!(err.to_string(), "Failed to load entries: service unavailable");
    }

    #[tokio::test]
    async fn delete_removes_an_owned_entry() {
        let backend = MemoryBackend::new();
        let store = signed_up(&backend).await;
        let mut ctl = controller(&backend, &store);
        ctl.load().await.expect("resume");
        let entry = ctl
            .save_entry_text("gone soon")
            .await
            .expect("save")
            .expect("entry");

        run_delete(&mut controller(&backend, &store), &entry.id)
            .await
            .expect("delete");
        assert!(backend.rows("entries").is_empty());
    }

    #[tokio::test]
    async fn delete_of_an_unknown_id_is_reported_not_failed() {
        let backend = MemoryBackend::new();
        let store = signed_up(&backend).await;
        run_delete(&mut controller(&backend, &store), "missing")
            .await
            .expect("no-op");
    }
}
