//! Anonymous identity: key issuance, key sign-in and first-time name capture.
//!
//! ```text
//! Welcome --generate_new_user--> AwaitingName --submit_name--> Active
//! Welcome --sign_in_with_key---> AwaitingName | Active
//! AwaitingName | Active --sign_out--> Welcome
//! ```
//!
//! Whether a key exists and which rows it may touch is decided by the
//! backend. The flow only presents the key and reacts to what comes back.

use journey_api_client::{ApiError, ClientFactory, Select, TableStore};
use journey_core::validate::{validate_key_input, validate_name};
use journey_core::{
    AccessKey, JourneyError, KEYS_TABLE, KeyRecord, PROFILES_TABLE, Profile, ProfileName, Result,
};
use tracing::{info, warn};

use crate::session::Session;
use crate::{storage_error, to_row};

/// Where the user is in the identity lifecycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FlowState {
    /// No usable key.
    #[default]
    Welcome,
    /// Key established, no profile yet.
    AwaitingName { key: AccessKey },
    /// Key and display name known.
    Active { key: AccessKey, name: String },
}

impl FlowState {
    pub fn key(&self) -> Option<&AccessKey> {
        match self {
            Self::Welcome => None,
            Self::AwaitingName { key } | Self::Active { key, .. } => Some(key),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Active { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active { .. })
    }
}

/// The identity state machine. Every transition borrows the session that
/// owns the key and its client.
#[derive(Debug, Default)]
pub struct IdentityFlow {
    state: FlowState,
}

impl IdentityFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    /// Pick up a key left in the session store by an earlier run.
    ///
    /// A key the registry no longer knows is cleared from the store. A failed
    /// lookup keeps it so a later retry can still succeed.
    pub async fn resume<F: ClientFactory>(&mut self, session: &mut Session<F>) -> Result<()> {
        let Some(key) = session.key().cloned() else {
            self.state = FlowState::Welcome;
            return Ok(());
        };

        let client = session.scoped_client(&key)?;
        match key_exists(&client, &key).await {
            Ok(true) => {
                self.state = enter_with_key(session, key).await?;
                Ok(())
            }
            Ok(false) => {
                warn!(key = key.short(), "stored key is not registered, clearing");
                session.clear()?;
                self.state = FlowState::Welcome;
                Err(JourneyError::KeyNotFound)
            }
            Err(e) => {
                warn!(key = key.short(), error = %e, "could not verify stored key");
                self.state = FlowState::Welcome;
                Err(storage_error(e))
            }
        }
    }

    /// Mint a new key and register it. The key is only persisted once the
    /// registry has accepted it.
    pub async fn generate_new_user<F: ClientFactory>(
        &mut self,
        session: &mut Session<F>,
    ) -> Result<()> {
        self.require_welcome()?;
        let key = AccessKey::generate();
        let client = session.scoped_client(&key)?;
        client
            .insert(
                KEYS_TABLE,
                to_row(&KeyRecord {
                    user_key: key.clone(),
                })?,
            )
            .await
            .map_err(storage_error)?;

        session.establish(key.clone())?;
        info!(key = key.short(), "registered new access key");
        self.state = FlowState::AwaitingName { key };
        Ok(())
    }

    /// Sign in with a key typed by the user.
    ///
    /// Blank input fails without touching the network. A key that is absent
    /// from the registry, or a registry lookup that fails, reports
    /// [`JourneyError::KeyNotFound`] and leaves the session store unchanged.
    pub async fn sign_in_with_key<F: ClientFactory>(
        &mut self,
        session: &mut Session<F>,
        candidate: &str,
    ) -> Result<()> {
        self.require_welcome()?;
        let key = validate_key_input(candidate)?;

        let probe = session.scoped_client(&key)?;
        match key_exists(&probe, &key).await {
            Ok(true) => {}
            Ok(false) => return Err(JourneyError::KeyNotFound),
            Err(e) => {
                warn!(key = key.short(), error = %e, "key lookup failed");
                return Err(JourneyError::KeyNotFound);
            }
        }

        self.state = enter_with_key(session, key).await?;
        Ok(())
    }

    /// Attach a display name to the current key.
    pub async fn submit_name<F: ClientFactory>(
        &mut self,
        session: &mut Session<F>,
        name: &str,
    ) -> Result<()> {
        let key = match &self.state {
            FlowState::AwaitingName { key } => key.clone(),
            FlowState::Active { .. } => {
                return Err(JourneyError::validation("A name is already set for this key."));
            }
            FlowState::Welcome => {
                return Err(JourneyError::validation(
                    "Create or enter a key before choosing a name.",
                ));
            }
        };
        let name = validate_name(name)?;

        session
            .client()
            .insert(PROFILES_TABLE, to_row(&Profile::new(key.clone(), name))?)
            .await
            .map_err(storage_error)?;

        info!(key = key.short(), "profile created");
        self.state = FlowState::Active {
            key,
            name: name.to_string(),
        };
        Ok(())
    }

    /// Clear the stored key and return to `Welcome`. Server rows are kept.
    pub fn sign_out<F: ClientFactory>(&mut self, session: &mut Session<F>) -> Result<()> {
        session.clear()?;
        self.state = FlowState::Welcome;
        Ok(())
    }

    fn require_welcome(&self) -> Result<()> {
        if matches!(self.state, FlowState::Welcome) {
            Ok(())
        } else {
            Err(JourneyError::validation(
                "Already signed in. Sign out before using another key.",
            ))
        }
    }
}

/// Persist a verified key, then decide between onboarding and the journal.
async fn enter_with_key<F: ClientFactory>(
    session: &mut Session<F>,
    key: AccessKey,
) -> Result<FlowState> {
    session.establish(key.clone())?;
    Ok(match profile_name(session.client(), &key).await {
        Some(name) => {
            info!(key = key.short(), "signed in");
            FlowState::Active { key, name }
        }
        None => FlowState::AwaitingName { key },
    })
}

async fn key_exists<C: TableStore>(client: &C, key: &AccessKey) -> std::result::Result<bool, ApiError> {
    let rows = client
        .select(
            KEYS_TABLE,
            &Select::all().eq("user_key", key.as_str()).limit(1),
        )
        .await?;
    Ok(!rows.is_empty())
}

/// Display name for `key`, if a profile exists. A failed lookup is treated
/// as "no profile yet" so the user can still reach onboarding.
async fn profile_name<C: TableStore>(client: &C, key: &AccessKey) -> Option<String> {
    let rows = match client
        .select(
            PROFILES_TABLE,
            &Select::columns("name").eq("user_key", key.as_str()).limit(1),
        )
        .await
    {
        Ok(rows) => rows,
        Err(e) => {
            warn!(key = key.short(), error = %e, "profile lookup failed");
            return None;
        }
    };
    rows.into_iter()
        .next()
        .and_then(|row| serde_json::from_value::<ProfileName>(row).ok())
        .and_then(|p| p.name)
        .filter(|name| !name.trim().is_empty())
}
