use std::{sync::Arc, time::Duration};

use reqwest::{Client, Method, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::{
    api::tokens::SessionTokens,
    errors::{AppError, AppResult},
    models::{
        domain::learner::CertificateBlob,
        dto::{request::RefreshTokenRequest, response::RefreshTokenResponse},
    },
};

const REFRESH_ENDPOINT: &str = "/refresh-token";

/// Thin JSON client over the LMS REST API.
///
/// Authenticated calls carry the current bearer token. A 401 triggers one
/// single-flight refresh followed by one replay; a second 401 ends the session.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    tokens: Arc<SessionTokens>,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration, tokens: Arc<SessionTokens>) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::InternalError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens,
        })
    }

    pub fn tokens(&self) -> &Arc<SessionTokens> {
        &self.tokens
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let response = self.send_authenticated(Method::GET, path, None).await?;
        Ok(response.json::<T>().await?)
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> AppResult<T> {
        let body = serde_json::to_value(body)?;
        let response = self.send_authenticated(Method::POST, path, Some(body)).await?;
        Ok(response.json::<T>().await?)
    }

    /// POST without a body whose response content is ignored.
    pub async fn post_empty(&self, path: &str) -> AppResult<()> {
        self.send_authenticated(Method::POST, path, None).await?;
        Ok(())
    }

    /// POST whose success body, if any, is ignored.
    pub async fn post_ignoring_response<B: Serialize>(&self, path: &str, body: &B) -> AppResult<()> {
        let body = serde_json::to_value(body)?;
        self.send_authenticated(Method::POST, path, Some(body)).await?;
        Ok(())
    }

    /// Unauthenticated POST used by login and register. A 401 here means the
    /// credentials were rejected, not that a session expired.
    pub async fn post_public<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> AppResult<T> {
        let body = serde_json::to_value(body)?;
        let response = self.send(Method::POST, path, Some(&body), None).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            let message = error_message(&response.text().await.unwrap_or_default());
            return Err(AppError::Unauthorized(
                message.unwrap_or_else(|| "Invalid credentials".to_string()),
            ));
        }

        let response = check_status(response, path).await?;
        Ok(response.json::<T>().await?)
    }

    pub async fn get_bytes(&self, path: &str) -> AppResult<CertificateBlob> {
        let response = self.send_authenticated(Method::GET, path, None).await?;
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?;

        Ok(CertificateBlob {
            content_type,
            bytes: bytes.to_vec(),
        })
    }

    /// Exchanges the refresh token for a new pair. Never goes through the
    /// 401 retry path.
    pub async fn exchange_refresh_token(
        &self,
        refresh_token: SecretString,
    ) -> AppResult<(String, Option<String>)> {
        let body = serde_json::to_value(RefreshTokenRequest {
            refresh_token: refresh_token.expose_secret().to_string(),
        })?;
        let response = self.send(Method::POST, REFRESH_ENDPOINT, Some(&body), None).await?;
        let response = check_status(response, REFRESH_ENDPOINT).await?;
        let refreshed: RefreshTokenResponse = response.json().await?;

        let token = refreshed
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::ValidationError("Refresh response has no token".to_string()))?;
        Ok((token, refreshed.refresh_token))
    }

    async fn send_authenticated(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> AppResult<Response> {
        let generation = self.tokens.generation();
        let token = self.tokens.access_token();
        let response = self
            .send(method.clone(), path, body.as_ref(), token.as_ref())
            .await?;

        if response.status() != StatusCode::UNAUTHORIZED || token.is_none() {
            return check_status(response, path).await;
        }

        log::debug!("{} {} returned 401, attempting token refresh", method, path);
        self.tokens
            .refresh_with(generation, |refresh| self.exchange_refresh_token(refresh))
            .await?;

        let token = self.tokens.access_token();
        let response = self.send(method, path, body.as_ref(), token.as_ref()).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            log::warn!("{} rejected the refreshed token, ending session", path);
            self.tokens.clear();
            return Err(AppError::SessionExpired);
        }
        check_status(response, path).await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        token: Option<&SecretString>,
    ) -> AppResult<Response> {
        let mut request = self
            .client
            .request(method, endpoint_url(&self.base_url, path))
            .header(reqwest::header::ACCEPT, "application/json");

        if let Some(token) = token {
            request = request.bearer_auth(token.expose_secret());
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        Ok(request.send().await?)
    }
}

async fn check_status(response: Response, path: &str) -> AppResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    log::debug!("{} failed with status {}", path, status);
    Err(AppError::from_status(status.as_u16(), error_message(&body), path))
}

pub fn endpoint_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Pulls the server's `message` (or `error`) field out of an error body.
pub fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|key| value.get(key).and_then(Value::as_str))
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}
