use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// The subset of JWT claims the client cares about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    pub sub: Option<serde_json::Value>,
    #[serde(default)]
    pub exp: Option<i64>, // Expiration time (as UTC timestamp)
    #[serde(default)]
    pub iat: Option<i64>, // Issued at (as UTC timestamp)
}

/// Reads claims without verifying the signature. The client has no key and
/// only uses the result to schedule refreshes and skip dead tokens; the
/// server remains the authority on validity.
pub fn read_claims(token: &str) -> Option<TokenClaims> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    decode::<TokenClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .ok()
}

pub fn token_expiry(token: &str) -> Option<DateTime<Utc>> {
    read_claims(token)?
        .exp
        .and_then(|exp| Utc.timestamp_opt(exp, 0).single())
}
