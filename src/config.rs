use std::{env, path::PathBuf, time::Duration};

use crate::{
    auth::access_gate::RoutePolicy,
    errors::{AppError, AppResult},
};

#[derive(Clone, Debug)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub notification_poll_secs: u64,
    pub toast_duration_ms: u64,
    pub toast_error_duration_ms: u64,
    pub max_toasts: usize,
    pub autosave_interval_secs: u64,
    pub token_store_path: PathBuf,
    pub route_policy: RoutePolicy,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            api_base_url: env::var("LMS_API_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:5000/api".to_string()),
            request_timeout_secs: env_or("LMS_REQUEST_TIMEOUT_SECS", 70),
            notification_poll_secs: env_or("LMS_NOTIFICATION_POLL_SECS", 30),
            toast_duration_ms: env_or("LMS_TOAST_DURATION_MS", 5000),
            toast_error_duration_ms: env_or("LMS_TOAST_ERROR_DURATION_MS", 7000),
            max_toasts: env_or("LMS_MAX_TOASTS", 5),
            autosave_interval_secs: env_or("LMS_AUTOSAVE_INTERVAL_SECS", 30),
            token_store_path: env::var("LMS_TOKEN_STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".lms/session.json")),
            route_policy: env::var("LMS_ROUTE_POLICY")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or_default(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn notification_poll_interval(&self) -> Duration {
        Duration::from_secs(self.notification_poll_secs)
    }

    pub fn autosave_interval(&self) -> Duration {
        Duration::from_secs(self.autosave_interval_secs)
    }

    /// Rejects settings that only make sense against a local development API.
    pub fn validate_for_production(&self) -> AppResult<()> {
        if !self.api_base_url.starts_with("https://") {
            return Err(AppError::ValidationError(format!(
                "LMS_API_BASE_URL must use https in production, got '{}'",
                self.api_base_url
            )));
        }

        if self.request_timeout_secs == 0
            || self.notification_poll_secs == 0
            || self.autosave_interval_secs == 0
        {
            return Err(AppError::ValidationError(
                "Timeouts and intervals must be greater than zero".to_string(),
            ));
        }

        if self.max_toasts == 0 {
            return Err(AppError::ValidationError(
                "LMS_MAX_TOASTS must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    pub fn test_config() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:5000/api".to_string(),
            request_timeout_secs: 5,
            notification_poll_secs: 30,
            toast_duration_ms: 5000,
            toast_error_duration_ms: 7000,
            max_toasts: 5,
            autosave_interval_secs: 30,
            token_store_path: PathBuf::from("target/test-session.json"),
            route_policy: RoutePolicy::ExactOrAdmin,
        }
    }
}
