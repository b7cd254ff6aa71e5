use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};

use crate::{
    auth::claims::token_expiry,
    models::domain::user::{User, UserRole},
};

/// The single authenticated identity held by the client.
#[derive(Clone, Debug)]
pub struct Session {
    pub user_id: i64,
    pub email: String,
    pub role: UserRole,
    pub token: SecretString,
    pub token_expiry: Option<DateTime<Utc>>,
    pub user: User,
}

impl Session {
    pub fn new(user: User, token: SecretString) -> Self {
        let token_expiry = token_expiry(token.expose_secret());

        Self {
            user_id: user.id,
            email: user.email.clone(),
            role: user.role,
            token,
            token_expiry,
            user,
        }
    }

    /// Opaque tokens carry no expiry and are never considered expired locally.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.token_expiry.is_some_and(|exp| exp <= now)
    }
}
