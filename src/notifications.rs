//! User notifications
//!
//! Notifications are plain rows per recipient; the feed adds the unread count
//! shown on the bell badge.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Notification type stored for a newly received message
pub const NEW_MESSAGE_KIND: &str = "New Message";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
    pub is_read: bool,
    pub created_at: Option<DateTime<Utc>>,
}

/// A user's notifications, newest first, with the unread count
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationFeed {
    pub notifications: Vec<Notification>,
    pub unread_count: usize,
}

impl NotificationFeed {
    pub fn new(notifications: Vec<Notification>) -> Self {
        let unread_count = notifications.iter().filter(|n| !n.is_read).count();
        Self {
            notifications,
            unread_count,
        }
    }
}

/// Result of marking notifications as read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MarkedRead {
    pub updated: u64,
}

/// Text of the notification sent to a message's receiver
pub fn new_message_notice(sender_name: Option<&str>) -> String {
    let name = sender_name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or("Someone");
    format!("You received a new message from {}.", name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn notification(is_read: bool) -> Notification {
        Notification {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            kind: NEW_MESSAGE_KIND.to_string(),
            content: new_message_notice(None),
            is_read,
            created_at: None,
        }
    }

    #[test]
    fn test_feed_counts_unread() {
        let feed = NotificationFeed::new(vec![notification(false), notification(true), notification(false)]);

        assert_eq!(feed.unread_count, 2);
        assert_eq!(feed.notifications.len(), 3);
        assert_eq!(NotificationFeed::new(Vec::new()).unread_count, 0);
    }

    #[test]
    fn test_new_message_notice() {
        assert_eq!(
            new_message_notice(Some("Thandi Nkosi")),
            "You received a new message from Thandi Nkosi."
        );
        assert_eq!(new_message_notice(Some("  ")), "You received a new message from Someone.");
        assert_eq!(new_message_notice(None), "You received a new message from Someone.");
    }

    #[test]
    fn test_notification_serializes_type_field() {
        let json = serde_json::to_value(notification(false)).unwrap();

        assert_eq!(json["type"], NEW_MESSAGE_KIND);
        assert_eq!(json["isRead"], false);
    }
}
