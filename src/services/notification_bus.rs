use std::{
    collections::{HashMap, VecDeque},
    future::Future,
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
    time::Duration,
};

use chrono::Utc;
use tokio::{runtime::Handle, task::JoinHandle};
use uuid::Uuid;

use crate::{
    config::Config,
    errors::AppResult,
    models::domain::notification::{Toast, ToastKind, ToastRequest},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToastSettings {
    pub duration_ms: u64,
    pub error_duration_ms: u64,
    pub max_toasts: usize,
}

impl Default for ToastSettings {
    fn default() -> Self {
        Self {
            duration_ms: 5000,
            error_duration_ms: 7000,
            max_toasts: 5,
        }
    }
}

impl From<&Config> for ToastSettings {
    fn from(config: &Config) -> Self {
        Self {
            duration_ms: config.toast_duration_ms,
            error_duration_ms: config.toast_error_duration_ms,
            max_toasts: config.max_toasts.max(1),
        }
    }
}

#[derive(Default)]
struct BusState {
    toasts: VecDeque<Toast>,
    expiries: HashMap<String, JoinHandle<()>>,
}

impl BusState {
    fn take(&mut self, id: &str) -> Option<Toast> {
        let position = self.toasts.iter().position(|t| t.id == id)?;
        self.toasts.remove(position)
    }
}

/// Transient toast queue shared by every component of the client.
///
/// Cloning is cheap; clones share the same queue.
#[derive(Clone)]
pub struct NotificationBus {
    state: Arc<Mutex<BusState>>,
    settings: ToastSettings,
}

impl NotificationBus {
    pub fn new(settings: ToastSettings) -> Self {
        Self {
            state: Arc::new(Mutex::new(BusState::default())),
            settings,
        }
    }

    pub fn settings(&self) -> ToastSettings {
        self.settings
    }

    /// Queues a toast and returns its id. The oldest toasts are evicted once
    /// the queue is over capacity.
    pub fn push(&self, request: ToastRequest) -> String {
        let default_duration = match request.kind {
            ToastKind::Error => self.settings.error_duration_ms,
            _ => self.settings.duration_ms,
        };
        let toast = Toast {
            id: Uuid::new_v4().to_string(),
            kind: request.kind,
            title: request.title,
            message: request.message,
            duration_ms: if request.persistent {
                0
            } else {
                request.duration_ms.unwrap_or(default_duration)
            },
            persistent: request.persistent,
            created_at: Utc::now(),
        };
        let id = toast.id.clone();
        let expires_after = (!toast.persistent && toast.duration_ms > 0)
            .then(|| Duration::from_millis(toast.duration_ms));

        let mut state = self.lock();
        state.toasts.push_back(toast);
        while state.toasts.len() > self.settings.max_toasts {
            if let Some(evicted) = state.toasts.pop_front() {
                if let Some(handle) = state.expiries.remove(&evicted.id) {
                    handle.abort();
                }
            }
        }

        if let Some(after) = expires_after {
            if let Some(handle) = self.schedule_expiry(id.clone(), after) {
                state.expiries.insert(id.clone(), handle);
            }
        }

        id
    }

    pub fn remove(&self, id: &str) -> Option<Toast> {
        let mut state = self.lock();
        if let Some(handle) = state.expiries.remove(id) {
            handle.abort();
        }
        state.take(id)
    }

    pub fn clear(&self) {
        let mut state = self.lock();
        for (_, handle) in state.expiries.drain() {
            handle.abort();
        }
        state.toasts.clear();
    }

    /// Snapshot, oldest first.
    pub fn toasts(&self) -> Vec<Toast> {
        self.lock().toasts.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn success(&self, title: &str, message: &str) -> String {
        self.push(ToastRequest::new(ToastKind::Success, title, message))
    }

    pub fn error(&self, title: &str, message: &str) -> String {
        self.push(ToastRequest::new(ToastKind::Error, title, message))
    }

    pub fn warning(&self, title: &str, message: &str) -> String {
        self.push(ToastRequest::new(ToastKind::Warning, title, message))
    }

    pub fn info(&self, title: &str, message: &str) -> String {
        self.push(ToastRequest::new(ToastKind::Info, title, message))
    }

    pub fn persistent(&self, kind: ToastKind, title: &str, message: &str) -> String {
        self.push(ToastRequest::new(kind, title, message).persistent())
    }

    /// Runs `operation` with an optional loading toast, then reports the outcome.
    /// The loading toast is removed whatever the result.
    pub async fn run_with_notification<T, F>(
        &self,
        operation: F,
        messages: NotifyMessages,
    ) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        let loading_id = messages
            .loading
            .as_deref()
            .map(|loading| self.persistent(ToastKind::Info, "Loading", loading));

        let result = operation.await;

        if let Some(id) = loading_id {
            self.remove(&id);
        }

        match &result {
            Ok(_) => {
                if let Some(success) = messages.success.as_deref() {
                    self.success("Success", success);
                }
            }
            Err(e) => {
                let message = messages.error.clone().unwrap_or_else(|| e.to_string());
                self.error("Error", &message);
            }
        }

        result
    }

    fn schedule_expiry(&self, id: String, after: Duration) -> Option<JoinHandle<()>> {
        let handle = Handle::try_current().ok()?;
        let state: Weak<Mutex<BusState>> = Arc::downgrade(&self.state);

        Some(handle.spawn(async move {
            tokio::time::sleep(after).await;
            if let Some(state) = state.upgrade() {
                let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
                state.expiries.remove(&id);
                state.take(&id);
            }
        }))
    }

    fn lock(&self) -> MutexGuard<'_, BusState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new(ToastSettings::default())
    }
}

/// Messages shown by [`NotificationBus::run_with_notification`].
#[derive(Clone, Debug, Default)]
pub struct NotifyMessages {
    pub loading: Option<String>,
    pub success: Option<String>,
    pub error: Option<String>,
}

impl NotifyMessages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loading(mut self, message: impl Into<String>) -> Self {
        self.loading = Some(message.into());
        self
    }

    pub fn success(mut self, message: impl Into<String>) -> Self {
        self.success = Some(message.into());
        self
    }

    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self
    }
}
