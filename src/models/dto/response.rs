use serde::Deserialize;

use crate::{
    errors::AppError,
    models::domain::{notification::SystemNotification, User, UserRole},
};

/// User payload before validation. Every field is optional so that a
/// malformed payload surfaces as a `ValidationError` instead of a decode error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserDto {
    pub id: Option<i64>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<String>,
    pub employer_id: Option<i64>,
    pub department_id: Option<i64>,
    pub phone: Option<String>,
    pub profile_picture: Option<String>,
    pub is_active: Option<bool>,
    pub last_login: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, AppError> {
    value.ok_or_else(|| AppError::ValidationError(format!("User data is missing '{}'", field)))
}

impl TryFrom<UserDto> for User {
    type Error = AppError;

    fn try_from(dto: UserDto) -> Result<Self, Self::Error> {
        let email = required(dto.email.filter(|e| !e.trim().is_empty()), "email")?;

        Ok(User {
            id: required(dto.id, "id")?,
            email,
            first_name: required(dto.first_name, "first_name")?,
            last_name: required(dto.last_name, "last_name")?,
            role: UserRole::normalize(&required(dto.role, "role")?),
            employer_id: dto.employer_id,
            department_id: dto.department_id,
            phone: dto.phone,
            profile_picture: dto.profile_picture,
            is_active: dto.is_active.unwrap_or(true),
            last_login: dto.last_login,
            created_at: dto.created_at,
            updated_at: dto.updated_at,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user: Option<UserDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user: Option<UserDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshTokenResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotificationsResponse {
    #[serde(default)]
    pub unread: Vec<SystemNotification>,
    #[serde(default)]
    pub read: Vec<SystemNotification>,
}

impl NotificationsResponse {
    /// Unread first, then read; `is_read` is set from the list each came from.
    pub fn into_list(self) -> Vec<SystemNotification> {
        let unread = self.unread.into_iter().map(|n| SystemNotification { is_read: false, ..n });
        let read = self.read.into_iter().map(|n| SystemNotification { is_read: true, ..n });
        unread.chain(read).collect()
    }
}
