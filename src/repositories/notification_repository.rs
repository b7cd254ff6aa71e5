use async_trait::async_trait;

use crate::{
    api::ApiClient,
    errors::AppResult,
    models::{
        domain::notification::SystemNotification,
        dto::{
            request::MarkNotificationsReadRequest,
            response::NotificationsResponse,
        },
    },
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Unread notifications first, then read ones.
    async fn list(&self) -> AppResult<Vec<SystemNotification>>;
    async fn mark_read(&self, notification_ids: Vec<i64>) -> AppResult<()>;
    async fn mark_all_read(&self) -> AppResult<()>;
}

pub struct HttpNotificationRepository {
    api: ApiClient,
}

impl HttpNotificationRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl NotificationRepository for HttpNotificationRepository {
    async fn list(&self) -> AppResult<Vec<SystemNotification>> {
        let response: NotificationsResponse = self.api.get("/notifications").await?;
        Ok(response.into_list())
    }

    async fn mark_read(&self, notification_ids: Vec<i64>) -> AppResult<()> {
        self.api
            .post_ignoring_response(
                "/notifications/mark-read",
                &MarkNotificationsReadRequest { notification_ids },
            )
            .await
    }

    async fn mark_all_read(&self) -> AppResult<()> {
        self.api.post_empty("/notifications/mark-all-read").await
    }
}
