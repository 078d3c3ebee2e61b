//! Durable storage for the Ferelix credential pair.
//!
//! The access and refresh tokens live under two fixed keys in a single JSON
//! document on disk, mirrored in memory behind a read/write lock. The store
//! survives restarts; `ApiClient` is its only writer.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

/// Token file name inside the data directory
const TOKEN_FILE: &str = "tokens.json";

/// The credential pair issued by the backend on login or refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// File-backed store for the current token pair.
pub struct TokenStore {
    data_dir: PathBuf,
    tokens: RwLock<Option<TokenPair>>,
}

impl TokenStore {
    /// Open a store rooted at `data_dir`, loading any persisted pair.
    /// A missing or unreadable token file yields an empty store.
    pub fn open(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        let tokens = match Self::read_pair(&data_dir.join(TOKEN_FILE)) {
            Ok(pair) => pair,
            Err(err) => {
                debug!(error = %err, "Ignoring unreadable token file");
                None
            }
        };
        Self {
            data_dir,
            tokens: RwLock::new(tokens),
        }
    }

    /// Current access token, if any.
    pub async fn access_token(&self) -> Option<String> {
        self.tokens
            .read()
            .await
            .as_ref()
            .map(|pair| pair.access_token.clone())
    }

    /// Current refresh token, if any.
    pub async fn refresh_token(&self) -> Option<String> {
        self.tokens
            .read()
            .await
            .as_ref()
            .map(|pair| pair.refresh_token.clone())
    }

    /// Whether a token pair is stored. Presence is the authentication
    /// predicate; the backend is the judge of validity.
    pub async fn is_authenticated(&self) -> bool {
        self.tokens.read().await.is_some()
    }

    /// Replace both tokens and persist them.
    ///
    /// The in-memory pair is updated before the disk write, so a write
    /// failure degrades to a session that works until restart.
    pub async fn save(&self, access_token: &str, refresh_token: &str) -> Result<()> {
        let pair = TokenPair {
            access_token: access_token.to_string(),
            refresh_token: refresh_token.to_string(),
        };
        *self.tokens.write().await = Some(pair.clone());
        self.write_pair(&pair)
    }

    /// Remove both tokens from memory and disk.
    pub async fn clear(&self) -> Result<()> {
        *self.tokens.write().await = None;
        let path = self.token_path();
        if path.exists() {
            std::fs::remove_file(&path).context("Failed to remove token file")?;
        }
        Ok(())
    }

    fn read_pair(path: &Path) -> Result<Option<TokenPair>> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(path).context("Failed to read token file")?;
        let pair: TokenPair =
            serde_json::from_str(&contents).context("Failed to parse token file")?;
        Ok(Some(pair))
    }

    fn write_pair(&self, pair: &TokenPair) -> Result<()> {
        let path = self.token_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create data directory")?;
        }
        let contents = serde_json::to_string_pretty(pair)?;
        std::fs::write(&path, contents).context("Failed to write token file")?;
        Ok(())
    }

    fn token_path(&self) -> PathBuf {
        self.data_dir.join(TOKEN_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_then_reopen_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = TokenStore::open(dir.path());
        assert!(!store.is_authenticated().await);

        store.save("access-1", "refresh-1").await.expect("save");
        assert_eq!(store.access_token().await.as_deref(), Some("access-1"));

        let reopened = TokenStore::open(dir.path());
        assert_eq!(reopened.access_token().await.as_deref(), Some("access-1"));
        assert_eq!(reopened.refresh_token().await.as_deref(), Some("refresh-1"));
        assert!(reopened.is_authenticated().await);
    }

    #[tokio::test]
    async fn clear_removes_backing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = TokenStore::open(dir.path());
        store.save("a", "r").await.expect("save");
        assert!(dir.path().join(TOKEN_FILE).exists());

        store.clear().await.expect("clear");
        assert!(store.access_token().await.is_none());
        assert!(store.refresh_token().await.is_none());
        assert!(!dir.path().join(TOKEN_FILE).exists());

        // Clearing an already empty store is not an error.
        store.clear().await.expect("clear twice");
    }

    #[tokio::test]
    async fn corrupt_file_yields_empty_store() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join(TOKEN_FILE), "definitely not json").expect("write");

        let store = TokenStore::open(dir.path());
        assert!(!store.is_authenticated().await);
        assert!(store.access_token().await.is_none());
    }

    #[tokio::test]
    async fn save_creates_missing_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let nested = dir.path().join("ferelix").join("session");

        let store = TokenStore::open(&nested);
        store.save("a", "r").await.expect("save");
        assert!(nested.join(TOKEN_FILE).exists());
    }
}
