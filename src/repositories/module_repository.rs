use async_trait::async_trait;
use serde_json::Value;

use crate::{api::ApiClient, errors::AppResult};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModuleRepository: Send + Sync {
    /// Raw module payload including the server's `access` verdict.
    async fn get_module(&self, module_id: i64) -> AppResult<Value>;
}

pub struct HttpModuleRepository {
    api: ApiClient,
}

impl HttpModuleRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ModuleRepository for HttpModuleRepository {
    async fn get_module(&self, module_id: i64) -> AppResult<Value> {
        self.api.get(&format!("/modules/{}", module_id)).await
    }
}
