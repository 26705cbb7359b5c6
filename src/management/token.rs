use std::{io::ErrorKind, path::PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{Res, config};

/// Holder of the single active access token.
///
/// The presence of a token is the only authentication signal: there is no
/// expiry tracking and no validation, a token is trusted until the Web API
/// rejects it.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Persists `value`, replacing any previous token.
    async fn save_token(&self, value: &str) -> Res<()>;

    /// Returns the current token, `None` when absent or unreadable.
    async fn read_token(&self) -> Option<String>;

    /// Removes the token. Clearing an absent token succeeds.
    async fn clear_token(&self) -> Res<()>;
}

/// Token store backed by a single file in the local data directory.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new() -> Self {
        Self {
            path: Self::token_path(),
        }
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn token_path() -> PathBuf {
        let mut path = config::data_dir();
        path.push("cache/token");
        path
    }
}

impl Default for FileTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn save_token(&self, value: &str) -> Res<()> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }
        async_fs::write(&self.path, value).await?;
        Ok(())
    }

    async fn read_token(&self) -> Option<String> {
        let content = async_fs::read_to_string(&self.path).await.ok()?;
        let token = content.trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    }

    async fn clear_token(&self) -> Res<()> {
        match async_fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory token store, used where nothing may touch the disk.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn save_token(&self, value: &str) -> Res<()> {
        *self.token.lock().await = Some(value.to_string());
        Ok(())
    }

    async fn read_token(&self) -> Option<String> {
        self.token.lock().await.clone()
    }

    async fn clear_token(&self) -> Res<()> {
        self.token.lock().await.take();
        Ok(())
    }
}
