//! Per-session catalogs. Each session id owns an independent catalog;
//! nothing is shared across sessions and nothing outlives the process.

use std::collections::BTreeMap;
use std::fmt;

use bazaar_common::catalog::{CatalogSnapshot, CatalogStore, Session};
use bazaar_common::config::CatalogConfig;
use bazaar_common::error::CatalogError;
use bazaar_common::listing::Listing;
use tokio::sync::Mutex;
use tracing::info;

const MAX_SESSION_ID_LEN: usize = 64;

/// Client-chosen session identifier: 1..=64 ASCII alphanumerics, `-` or `_`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid session id '{0}'")]
pub struct InvalidSessionId(pub String);

impl SessionId {
    pub fn parse(raw: &str) -> Result<Self, InvalidSessionId> {
        let valid = !raw.is_empty()
            && raw.len() <= MAX_SESSION_ID_LEN
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if valid {
            Ok(Self(raw.to_string()))
        } else {
            Err(InvalidSessionId(raw.to_string()))
        }
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub struct SessionRegistry {
    config: CatalogConfig,
    sessions: Mutex<BTreeMap<SessionId, Session>>,
}

impl SessionRegistry {
    pub fn new(config: CatalogConfig) -> Self {
        Self {
            config,
            sessions: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Activate the session's catalog if needed. Returns its current size.
    pub async fn initialize(&self, id: &SessionId) -> usize {
        let mut sessions = self.sessions.lock().await;
        let session = sessions.entry(id.clone()).or_default();
        if !session.is_active() {
            info!(session = %id, "session initialized");
        }
        session.initialize(&self.config).len()
    }

    /// Unknown or uninitialized sessions read as empty and are not created.
    pub async fn snapshot(&self, id: &SessionId) -> CatalogSnapshot {
        let sessions = self.sessions.lock().await;
        sessions
            .get(id)
            .and_then(Session::catalog)
            .map(CatalogStore::all)
            .unwrap_or_default()
    }

    pub async fn add(&self, id: &SessionId, listing: Listing) -> Result<(), CatalogError> {
        let mut sessions = self.sessions.lock().await;
        sessions
            .entry(id.clone())
            .or_default()
            .initialize(&self.config)
            .add(listing)
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.lock().await.len()
    }
}
