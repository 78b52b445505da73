use journey_api_client::ClientFactory;
use journey_core::{AccessKey, JourneyError, Result};
use tracing::info;

use crate::session_store::SessionStore;

/// The current access key together with the backend client bound to it.
///
/// Owned by the top-level controller and lent to the identity flow and the
/// entry repository. The client is rebuilt, never mutated, whenever the key
/// changes, so it always carries the key the store holds.
pub struct Session<F: ClientFactory> {
    factory: F,
    store: Box<dyn SessionStore>,
    key: Option<AccessKey>,
    client: F::Client,
}

impl<F: ClientFactory> Session<F> {
    /// Read the stored key (if any) and build a client for it.
    pub fn open(factory: F, store: Box<dyn SessionStore>) -> Result<Self> {
        let key = store.current_key()?;
        let client = build(&factory, key.as_ref())?;
        Ok(Self {
            factory,
            store,
            key,
            client,
        })
    }

    pub fn key(&self) -> Option<&AccessKey> {
        self.key.as_ref()
    }

    pub fn client(&self) -> &F::Client {
        &self.client
    }

    /// A one-off client carrying `key`, leaving the session untouched.
    pub fn scoped_client(&self, key: &AccessKey) -> Result<F::Client> {
        build(&self.factory, Some(key))
    }

    /// Persist `key` as the current key and rebuild the client for it.
    pub fn establish(&mut self, key: AccessKey) -> Result<()> {
        let client = build(&self.factory, Some(&key))?;
        self.store.set_current_key(&key)?;
        info!(key = key.short(), "access key established");
        self.key = Some(key);
        self.client = client;
        Ok(())
    }

    /// Forget the key locally and fall back to an unkeyed client.
    pub fn clear(&mut self) -> Result<()> {
        let client = build(&self.factory, None)?;
        self.store.clear_current_key()?;
        info!("access key cleared");
        self.key = None;
        self.client = client;
        Ok(())
    }
}

fn build<F: ClientFactory>(factory: &F, key: Option<&AccessKey>) -> Result<F::Client> {
    factory
        .build(key.map(AccessKey::as_str))
        .map_err(|e| JourneyError::storage(e.message()))
}
