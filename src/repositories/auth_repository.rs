use async_trait::async_trait;

use crate::{
    api::ApiClient,
    errors::AppResult,
    models::dto::{
        request::{LoginRequest, RegisterRequest},
        response::{LoginResponse, RegisterResponse, UserDto},
    },
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> AppResult<LoginResponse>;
    async fn register(&self, request: &RegisterRequest) -> AppResult<RegisterResponse>;
    async fn logout(&self) -> AppResult<()>;
    async fn profile(&self) -> AppResult<UserDto>;
}

pub struct HttpAuthRepository {
    api: ApiClient,
}

impl HttpAuthRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl AuthRepository for HttpAuthRepository {
    async fn login(&self, request: &LoginRequest) -> AppResult<LoginResponse> {
        self.api.post_public("/login", request).await
    }

    async fn register(&self, request: &RegisterRequest) -> AppResult<RegisterResponse> {
        self.api.post_public("/register", request).await
    }

    async fn logout(&self) -> AppResult<()> {
        self.api.post_empty("/logout").await
    }

    async fn profile(&self) -> AppResult<UserDto> {
        self.api.get("/profile").await
    }
}
