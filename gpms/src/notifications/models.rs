//! Notification data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Notification ID type
pub type NotificationId = i64;

/// Notification type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationKind {
    Invitation,
    InvitationAccepted,
    InvitationRejected,
    ApprovalRequest,
    ApprovalApproved,
    ApprovalRejected,
    SystemAlert,
    SystemInfo,
    Reminder,
    /// Tag the client does not recognize. Kept as a catch-all so one
    /// unknown tag cannot fail a whole fetched batch.
    #[serde(other)]
    Other,
}

/// A notification as fetched from the backend.
///
/// The `related_*` references are deliberately loose: the backend
/// embeds whatever summary of the group/project/user it sees fit, and
/// the client only ever displays them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub notification_id: NotificationId,
    pub title: String,
    pub message: String,
    pub notification_type: NotificationKind,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_group: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_project: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_user: Option<Value>,
}
