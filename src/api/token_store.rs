use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Mutex,
};

use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

/// Tokens as they are persisted between runs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct StoredTokens {
    #[serde(rename = "authToken", default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
    #[serde(rename = "refreshToken", default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl StoredTokens {
    pub fn is_empty(&self) -> bool {
        self.auth_token.is_none() && self.refresh_token.is_none()
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait TokenStore: Send + Sync {
    fn load(&self) -> AppResult<StoredTokens>;
    fn save(&self, tokens: &StoredTokens) -> AppResult<()>;
    fn clear(&self) -> AppResult<()>;
}

/// JSON file holding `authToken` and `refreshToken`.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> AppResult<StoredTokens> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(StoredTokens::default()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(StoredTokens::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, tokens: &StoredTokens) -> AppResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(tokens)
            .map_err(|e| AppError::StorageError(e.to_string()))?;
        fs::write(&self.path, raw)?;
        Ok(())
    }

    fn clear(&self) -> AppResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Default)]
pub struct MemoryTokenStore {
    tokens: Mutex<StoredTokens>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(auth_token: &str, refresh_token: Option<&str>) -> Self {
        Self {
            tokens: Mutex::new(StoredTokens {
                auth_token: Some(auth_token.to_string()),
                refresh_token: refresh_token.map(str::to_string),
            }),
        }
    }

    fn lock(&self) -> AppResult<std::sync::MutexGuard<'_, StoredTokens>> {
        self.tokens
            .lock()
            .map_err(|_| AppError::StorageError("Token store lock poisoned".to_string()))
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> AppResult<StoredTokens> {
        Ok(self.lock()?.clone())
    }

    fn save(&self, tokens: &StoredTokens) -> AppResult<()> {
        *self.lock()? = tokens.clone();
        Ok(())
    }

    fn clear(&self) -> AppResult<()> {
        *self.lock()? = StoredTokens::default();
        Ok(())
    }
}
