use std::{
    future::Future,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, RwLock,
    },
};

use secrecy::{ExposeSecret, SecretString};
use tokio::sync::Mutex;

use crate::{
    api::token_store::{StoredTokens, TokenStore},
    errors::{AppError, AppResult},
};

#[derive(Default)]
struct TokenPair {
    access: Option<SecretString>,
    refresh: Option<SecretString>,
}

/// In-memory access and refresh tokens, written through to a [`TokenStore`].
///
/// Every change bumps a generation counter. A caller that saw a 401 passes
/// the generation its request was sent with to [`SessionTokens::refresh_with`];
/// if the tokens changed in the meantime the refresh is skipped and the
/// caller simply replays.
pub struct SessionTokens {
    pair: RwLock<TokenPair>,
    store: Arc<dyn TokenStore>,
    refresh_lock: Mutex<()>,
    generation: AtomicU64,
}

impl SessionTokens {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self {
            pair: RwLock::new(TokenPair::default()),
            store,
            refresh_lock: Mutex::new(()),
            generation: AtomicU64::new(0),
        }
    }

    /// Loads persisted tokens into memory. Returns whether an access token was found.
    pub fn restore(&self) -> AppResult<bool> {
        let stored = self.store.load()?;
        let found = stored.auth_token.is_some();
        self.replace(TokenPair {
            access: stored.auth_token.map(SecretString::from),
            refresh: stored.refresh_token.map(SecretString::from),
        });
        Ok(found)
    }

    pub fn access_token(&self) -> Option<SecretString> {
        self.read(|pair| pair.access.clone())
    }

    pub fn refresh_token(&self) -> Option<SecretString> {
        self.read(|pair| pair.refresh.clone())
    }

    pub fn has_refresh_token(&self) -> bool {
        self.read(|pair| pair.refresh.is_some())
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Stores a new token pair. A `None` refresh token keeps the current one.
    pub fn set(&self, access: &str, refresh: Option<&str>) {
        let refresh = refresh
            .map(|r| SecretString::from(r.to_string()))
            .or_else(|| self.refresh_token());
        self.replace(TokenPair {
            access: Some(SecretString::from(access.to_string())),
            refresh,
        });
        self.persist();
    }

    pub fn clear(&self) {
        self.replace(TokenPair::default());
        if let Err(e) = self.store.clear() {
            log::warn!("Failed to clear persisted tokens: {}", e);
        }
    }

    /// Single-flight refresh.
    ///
    /// `seen_generation` is the generation the failing request was sent with.
    /// Callers queued behind an in-flight refresh observe a newer generation
    /// and return without calling `refresher` again.
    pub async fn refresh_with<F, Fut>(&self, seen_generation: u64, refresher: F) -> AppResult<()>
    where
        F: FnOnce(SecretString) -> Fut,
        Fut: Future<Output = AppResult<(String, Option<String>)>>,
    {
        let _guard = self.refresh_lock.lock().await;

        if self.generation() != seen_generation {
            return match self.access_token() {
                Some(_) => Ok(()),
                None => Err(AppError::SessionExpired),
            };
        }

        let Some(refresh_token) = self.refresh_token() else {
            self.clear();
            return Err(AppError::SessionExpired);
        };

        match refresher(refresh_token).await {
            Ok((access, refresh)) => {
                log::info!("Access token refreshed");
                self.set(&access, refresh.as_deref());
                Ok(())
            }
            Err(e) => {
                log::warn!("Token refresh failed, clearing session: {}", e);
                self.clear();
                Err(AppError::SessionExpired)
            }
        }
    }

    fn read<T>(&self, f: impl FnOnce(&TokenPair) -> T) -> T {
        let pair = self.pair.read().unwrap_or_else(|e| e.into_inner());
        f(&pair)
    }

    fn replace(&self, next: TokenPair) {
        let mut pair = self.pair.write().unwrap_or_else(|e| e.into_inner());
        *pair = next;
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    fn persist(&self) {
        let tokens = self.read(|pair| StoredTokens {
            auth_token: pair.access.as_ref().map(|t| t.expose_secret().to_string()),
            refresh_token: pair.refresh.as_ref().map(|t| t.expose_secret().to_string()),
        });
        if let Err(e) = self.store.save(&tokens) {
            log::warn!("Failed to persist tokens: {}", e);
        }
    }
}
