pub mod fixtures {
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use secrecy::SecretString;

    use crate::models::domain::{Session, User, UserRole};

    /// Creates a session for the standard test user with an opaque token
    pub fn test_session(role: UserRole) -> Session {
        Session::new(User::test_user(role), SecretString::from("test-token".to_string()))
    }

    /// Signs a JWT whose `exp` is `seconds` from now (negative for expired)
    pub fn jwt_expiring_in(seconds: i64) -> String {
        let claims = serde_json::json!({
            "sub": "7",
            "iat": Utc::now().timestamp(),
            "exp": Utc::now().timestamp() + seconds,
        });
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"server-side-secret"),
        )
        .expect("encoding a test token should succeed")
    }

    /// One user per role, admin first
    pub fn test_users() -> Vec<User> {
        vec![
            User::new(1, "admin@example.com", "Ada", "Admin", UserRole::Admin),
            User::new(2, "trainer@example.com", "Tom", "Trainer", UserRole::Trainer),
            User::new(3, "learner@example.com", "Lee", "Learner", UserRole::User),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use crate::models::domain::UserRole;

    #[test]
    fn test_fixtures_test_session() {
        let session = test_session(UserRole::Trainer);
        assert_eq!(session.role, UserRole::Trainer);
        assert_eq!(session.email, "test@example.com");
    }

    #[test]
    fn test_fixtures_jwt_carries_expiry() {
        let expiry = crate::auth::claims::token_expiry(&jwt_expiring_in(60)).unwrap();
        assert!(expiry > chrono::Utc::now());
    }

    #[test]
    fn test_fixtures_test_users() {
        let users = test_users();
        assert_eq!(users.len(), 3);
        assert_eq!(users[0].role, UserRole::Admin);
        assert_eq!(users[2].role, UserRole::User);
    }
}
