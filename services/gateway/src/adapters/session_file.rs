//! services/gateway/src/adapters/session_file.rs
//!
//! Persists the signed-in session as a JSON file, the desktop counterpart of
//! browser local storage. Implements the `SessionStorage` port.

use async_trait::async_trait;
use field_service_core::domain::PersistedSession;
use field_service_core::ports::{PortError, PortResult, SessionStorage};
use std::io::ErrorKind;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

fn io_error(action: &str, e: std::io::Error) -> PortError {
    PortError::Unexpected(format!("Failed to {} session file: {}", action, e))
}

#[async_trait]
impl SessionStorage for FileSessionStorage {
    async fn load(&self) -> PortResult<Option<PersistedSession>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => serde_json::from_str(&text)
                .map(Some)
                .map_err(|e| PortError::Unexpected(format!("Corrupt session file: {}", e))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error("read", e)),
        }
    }

    async fn save(&self, session: &PersistedSession) -> PortResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| io_error("create directory for", e))?;
        }
        let json = serde_json::to_vec_pretty(session)
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| io_error("write", e))
    }

    async fn clear(&self) -> PortResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error("remove", e)),
        }
    }
}
