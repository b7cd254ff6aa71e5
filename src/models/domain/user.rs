use std::fmt;

use serde::{Deserialize, Serialize};

/// Account role as understood by the client.
///
/// Any role string coming from the server is matched case-insensitively;
/// anything unrecognised is treated as a plain learner account.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum UserRole {
    Admin,
    Trainer,
    User,
}

impl UserRole {
    pub fn normalize(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("admin") {
            UserRole::Admin
        } else if raw.eq_ignore_ascii_case("trainer") {
            UserRole::Trainer
        } else {
            UserRole::User
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Trainer => "trainer",
            UserRole::User => "user",
        }
    }

    /// Position in the admin > trainer > user hierarchy.
    pub fn level(&self) -> u8 {
        match self {
            UserRole::Admin => 3,
            UserRole::Trainer => 2,
            UserRole::User => 1,
        }
    }

    pub fn can_access(&self, required: UserRole) -> bool {
        self.level() >= required.level()
    }
}

impl From<String> for UserRole {
    fn from(raw: String) -> Self {
        UserRole::normalize(&raw)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employer_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl User {
    pub fn new(id: i64, email: &str, first_name: &str, last_name: &str, role: UserRole) -> Self {
        User {
            id,
            email: email.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            role,
            employer_id: None,
            department_id: None,
            phone: None,
            profile_picture: None,
            is_active: true,
            last_login: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn apply(&mut self, update: UserUpdate) {
        if let Some(first_name) = update.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            self.last_name = last_name;
        }
        if let Some(phone) = update.phone {
            self.phone = Some(phone);
        }
        if let Some(profile_picture) = update.profile_picture {
            self.profile_picture = Some(profile_picture);
        }
    }
}

/// Locally known profile changes, merged into the current session user.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub profile_picture: Option<String>,
}

#[cfg(test)]
impl User {
    pub fn test_user(role: UserRole) -> Self {
        User::new(7, "test@example.com", "Test", "User", role)
    }
}
