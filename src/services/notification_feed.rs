use std::{sync::Arc, time::Duration};

use tokio::sync::RwLock;

use crate::{
    errors::AppError,
    models::domain::notification::SystemNotification,
    repositories::NotificationRepository,
    services::{
        notification_bus::NotificationBus,
        scheduled_task::{ScheduledTask, Tick},
    },
};

/// Server-side notifications, refreshed by polling.
///
/// No operation here returns an error. An expired session is never toasted;
/// a poll that finds it empties the list. Any other failure becomes an error toast.
pub struct SystemNotificationFeed {
    repository: Arc<dyn NotificationRepository>,
    bus: NotificationBus,
    notifications: RwLock<Vec<SystemNotification>>,
}

impl SystemNotificationFeed {
    pub fn new(repository: Arc<dyn NotificationRepository>, bus: NotificationBus) -> Self {
        Self {
            repository,
            bus,
            notifications: RwLock::new(Vec::new()),
        }
    }

    pub async fn poll(&self) -> Vec<SystemNotification> {
        match self.repository.list().await {
            Ok(list) => {
                log::debug!("Fetched {} notifications", list.len());
                *self.notifications.write().await = list.clone();
                list
            }
            Err(e) => {
                if e.is_session_expired() {
                    self.notifications.write().await.clear();
                }
                self.report_failure("Failed to load notifications", &e);
                self.notifications().await
            }
        }
    }

    pub async fn notifications(&self) -> Vec<SystemNotification> {
        self.notifications.read().await.clone()
    }

    pub async fn unread_count(&self) -> usize {
        self.notifications
            .read()
            .await
            .iter()
            .filter(|n| !n.is_read)
            .count()
    }

    /// Returns whether the server accepted the change.
    pub async fn mark_read(&self, notification_id: i64) -> bool {
        match self.repository.mark_read(vec![notification_id]).await {
            Ok(()) => {
                let mut notifications = self.notifications.write().await;
                if let Some(n) = notifications.iter_mut().find(|n| n.id == notification_id) {
                    n.is_read = true;
                }
                true
            }
            Err(e) => {
                self.report_failure("Failed to mark notification as read", &e);
                false
            }
        }
    }

    pub async fn mark_all_read(&self) -> bool {
        match self.repository.mark_all_read().await {
            Ok(()) => {
                let mut notifications = self.notifications.write().await;
                notifications.iter_mut().for_each(|n| n.is_read = true);
                true
            }
            Err(e) => {
                self.report_failure("Failed to mark notifications as read", &e);
                false
            }
        }
    }

    /// Polls every `period` until the returned task is dropped.
    pub fn spawn_polling(self: &Arc<Self>, period: Duration) -> ScheduledTask {
        let feed = Arc::clone(self);
        ScheduledTask::every("notification-poll", period, move || {
            let feed = feed.clone();
            async move {
                feed.poll().await;
                Tick::Continue
            }
        })
    }

    fn report_failure(&self, title: &str, error: &AppError) {
        if error.is_session_expired() {
            return;
        }
        log::warn!("{}: {}", title, error);
        self.bus.error(title, &error.to_string());
    }
}
