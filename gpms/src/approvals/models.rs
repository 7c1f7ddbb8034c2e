//! Approval request data models.

use crate::session::models::User;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Approval ID type
pub type ApprovalId = i64;

/// Approval lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

/// An approval request as fetched from the backend.
///
/// `approval_type` stays a free string (`project_proposal`,
/// `student_transfer`, ...); the client only displays it and new
/// types appear server-side without a client release.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalRequest {
    pub approval_id: ApprovalId,
    pub approval_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<Value>,
    pub requested_by: User,
    pub current_approver: User,
    pub approval_level: i32,
    pub status: ApprovalStatus,
    pub created_at: DateTime<Utc>,
}
