use serde_json::Value;

use mustivibes_types::models::Notification;

use crate::client::{BackendClient, Service};
use crate::envelope;
use crate::error::BackendError;

#[derive(Debug, Clone, Default)]
pub struct NotificationFeed {
    pub notifications: Vec<Notification>,
    /// The backend's own count, which may cover more than the returned page.
    pub unread_count: u64,
}

impl BackendClient {
    /// `GET /notifications` returns `{ notifications, pagination, unreadCount }`.
    pub async fn list_notifications(&self, token: &str) -> Result<NotificationFeed, BackendError> {
        let body = self.get(Service::Social, "notifications", token).await?;
        let unread_count = body.get("unreadCount").and_then(Value::as_u64);
        let notifications: Vec<Notification> = envelope::list(body, "notifications");
        let unread_count = unread_count
            .unwrap_or_else(|| notifications.iter().filter(|n| !n.is_read).count() as u64);

        Ok(NotificationFeed {
            notifications,
            unread_count,
        })
    }

    /// `PUT /notifications/{id}/read`.
    pub async fn mark_notification_read(&self, token: &str, id: &str) -> Result<(), BackendError> {
        self.put_empty(Service::Social, &format!("notifications/{id}/read"), token).await?;
        Ok(())
    }

    /// `DELETE /notifications/{id}`.
    pub async fn delete_notification(&self, token: &str, id: &str) -> Result<(), BackendError> {
        self.delete(Service::Social, &format!("notifications/{id}"), token).await?;
        Ok(())
    }

    /// Per-id results, in completion order.
    pub async fn mark_notifications_read(&self, token: &str, ids: Vec<String>) -> Vec<(String, Result<(), BackendError>)> {
        self.for_each_bounded(ids, |id| async move { self.mark_notification_read(token, &id).await })
            .await
    }

    pub async fn delete_notifications(&self, token: &str, ids: Vec<String>) -> Vec<(String, Result<(), BackendError>)> {
        self.for_each_bounded(ids, |id| async move { self.delete_notification(token, &id).await })
            .await
    }
}
