//! Group invitation data models.

use crate::session::models::User;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Invitation ID type
pub type InvitationId = i64;

/// Invitation lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Rejected,
}

/// A group invitation as fetched from the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupInvitation {
    pub invitation_id: InvitationId,
    /// Backend-shaped group summary, display-only on the client.
    pub group: Value,
    pub invited_student: User,
    pub invited_by: User,
    pub status: InvitationStatus,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}
