use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::account::models::Notification;

/// Wire format consumed by the mail relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "channel", rename_all = "snake_case")]
pub enum NotificationMessage {
    Email(EmailMessage),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub message_id: String,
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html_body: String,
    pub queued_at: DateTime<Utc>,
}

impl From<&Notification> for NotificationMessage {
    fn from(notification: &Notification) -> Self {
        NotificationMessage::Email(EmailMessage {
            message_id: Uuid::new_v4().to_string(),
            from: notification.from.clone(),
            to: notification.to.clone(),
            subject: notification.subject.clone(),
            html_body: notification.html_body.clone(),
            queued_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_shape() {
        let notification = Notification {
            from: "no-reply@x.com".to_string(),
            to: "a@x.com".to_string(),
            subject: "Verify your email!".to_string(),
            html_body: "<b>hi</b>".to_string(),
        };

        let value = serde_json::to_value(NotificationMessage::from(&notification)).unwrap();

        assert_eq!(value["channel"], "email");
        assert_eq!(value["to"], "a@x.com");
        assert_eq!(value["subject"], "Verify your email!");
        assert!(value["message_id"].as_str().is_some());
    }
}
