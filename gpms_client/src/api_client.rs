//! HTTP API client for the GPMS backend.

use anyhow::{Context, Result};
use gpms::approvals::ApprovalRequest;
use gpms::invitations::GroupInvitation;
use gpms::notifications::{Notification, NotificationId};
use gpms::storage::CredentialStore;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// API client for communicating with the GPMS backend
///
/// Cloning is cheap and shares the underlying connection pool and
/// credential store, so the poller and the interactive loop can hold
/// their own copies.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
    credentials: CredentialStore,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// Successful login payload: the opaque bearer token plus the raw user
/// object, which still needs normalization by the session store.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub access: String,
    pub user: Value,
}

#[derive(Debug, Deserialize)]
struct UnreadCountResponse {
    count: usize,
}

#[derive(Debug, Serialize)]
struct RejectRequest<'a> {
    reason: Option<&'a str>,
}

impl ApiClient {
    /// Create a new API client over a credential store
    pub fn new(base_url: String, credentials: CredentialStore) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            credentials,
        }
    }

    /// Credential store backing this client
    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Attach the bearer header when a token is present
    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.credentials.token() {
            Some(token) => request.header("Authorization", format!("Bearer {token}")),
            None => request,
        }
    }

    /// Log in with username and password
    ///
    /// Returns the raw response; recording it in the session store is
    /// the caller's job.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        let response = self
            .client
            .post(self.url("auth/login/"))
            .json(&LoginRequest { username, password })
            .send()
            .await
            .context("Failed to send login request")?;

        if !response.status().is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|e| format!("Failed to read error response: {}", e));
            anyhow::bail!("Login failed: {}", error_text);
        }

        response
            .json()
            .await
            .context("Failed to parse login response")
    }

    /// Fetch the current user's profile
    pub async fn me(&self) -> Result<Value> {
        let response = self
            .authorize(self.client.get(self.url("auth/me/")))
            .send()
            .await
            .context("Failed to fetch profile")?;

        if !response.status().is_success() {
            anyhow::bail!("Profile fetch failed with status {}", response.status());
        }

        response.json().await.context("Failed to parse profile")
    }

    /// Fetch notifications
    ///
    /// The backend sends either a plain array or a `{results: [...]}`
    /// pagination envelope; both are accepted. Anything else is
    /// treated as an empty batch rather than an error.
    pub async fn fetch_notifications(&self, limit: usize) -> Result<Vec<Notification>> {
        let response = self
            .authorize(
                self.client
                    .get(self.url("notifications/"))
                    .query(&[("limit", limit)]),
            )
            .send()
            .await
            .context("Failed to fetch notifications")?;

        if !response.status().is_success() {
            anyhow::bail!(
                "Notification fetch failed with status {}",
                response.status()
            );
        }

        let body: Value = response
            .json()
            .await
            .context("Failed to parse notification response")?;
        Ok(extract_notification_batch(body))
    }

    /// Server-side unread counter
    pub async fn unread_count(&self) -> Result<usize> {
        let response = self
            .authorize(self.client.get(self.url("notifications/unread-count/")))
            .send()
            .await
            .context("Failed to fetch unread count")?;

        if !response.status().is_success() {
            anyhow::bail!("Unread count failed with status {}", response.status());
        }

        let body: UnreadCountResponse = response
            .json()
            .await
            .context("Failed to parse unread count")?;
        Ok(body.count)
    }

    /// Tell the server a notification was read
    pub async fn mark_read(&self, id: NotificationId) -> Result<()> {
        self.post_empty(&format!("notifications/{id}/mark-read/"))
            .await
            .context("Failed to mark notification read")
    }

    /// Tell the server every notification was read
    pub async fn mark_all_read(&self) -> Result<()> {
        self.post_empty("notifications/mark-all-read/")
            .await
            .context("Failed to mark all notifications read")
    }

    /// Delete a notification server-side
    pub async fn delete_notification(&self, id: NotificationId) -> Result<()> {
        let response = self
            .authorize(self.client.delete(self.url(&format!("notifications/{id}/"))))
            .send()
            .await
            .context("Failed to send delete request")?;

        if !response.status().is_success() {
            anyhow::bail!("Delete failed with status {}", response.status());
        }
        Ok(())
    }

    /// Fetch the current user's group invitations
    pub async fn fetch_invitations(&self) -> Result<Vec<GroupInvitation>> {
        let response = self
            .authorize(self.client.get(self.url("invitations/")))
            .send()
            .await
            .context("Failed to fetch invitations")?;

        if !response.status().is_success() {
            anyhow::bail!("Invitation fetch failed with status {}", response.status());
        }

        response
            .json()
            .await
            .context("Failed to parse invitation list")
    }

    /// Accept a group invitation
    pub async fn accept_invitation(&self, id: i64) -> Result<()> {
        self.post_empty(&format!("invitations/{id}/accept/"))
            .await
            .context("Failed to accept invitation")
    }

    /// Reject a group invitation
    pub async fn reject_invitation(&self, id: i64) -> Result<()> {
        self.post_empty(&format!("invitations/{id}/reject/"))
            .await
            .context("Failed to reject invitation")
    }

    /// Fetch approval requests, optionally filtered by status
    pub async fn fetch_approvals(&self, status: Option<&str>) -> Result<Vec<ApprovalRequest>> {
        let mut request = self.client.get(self.url("approvals/"));
        if let Some(status) = status {
            request = request.query(&[("status", status)]);
        }

        let response = self
            .authorize(request)
            .send()
            .await
            .context("Failed to fetch approvals")?;

        if !response.status().is_success() {
            anyhow::bail!("Approval fetch failed with status {}", response.status());
        }

        response
            .json()
            .await
            .context("Failed to parse approval list")
    }

    /// Approve a pending request
    pub async fn approve_request(&self, id: i64) -> Result<()> {
        self.post_empty(&format!("approvals/{id}/approve/"))
            .await
            .context("Failed to approve request")
    }

    /// Reject a pending request with an optional reason
    pub async fn reject_request(&self, id: i64, reason: Option<&str>) -> Result<()> {
        let response = self
            .authorize(
                self.client
                    .post(self.url(&format!("approvals/{id}/reject/")))
                    .json(&RejectRequest { reason }),
            )
            .send()
            .await
            .context("Failed to send reject request")?;

        if !response.status().is_success() {
            anyhow::bail!("Reject failed with status {}", response.status());
        }
        Ok(())
    }

    async fn post_empty(&self, path: &str) -> Result<()> {
        let response = self
            .authorize(self.client.post(self.url(path)))
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            anyhow::bail!("Request failed with status {}", response.status());
        }
        Ok(())
    }
}

/// Unwrap the notification batch from either response shape.
fn extract_notification_batch(body: Value) -> Vec<Notification> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("results") {
            Some(Value::Array(items)) => items,
            _ => {
                log::warn!("notification response is not a sequence, treating as empty");
                return Vec::new();
            }
        },
        _ => {
            log::warn!("notification response is not a sequence, treating as empty");
            return Vec::new();
        }
    };

    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(notification) => Some(notification),
            Err(e) => {
                log::warn!("skipping malformed notification: {e}");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample(id: i64) -> Value {
        json!({
            "notification_id": id,
            "title": "Invitation",
            "message": "You were invited",
            "notification_type": "invitation",
            "is_read": false,
            "created_at": "2025-06-01T12:00:00Z",
        })
    }

    #[test]
    fn test_plain_array_batch() {
        let batch = extract_notification_batch(json!([sample(1), sample(2)]));
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].notification_id, 1);
    }

    #[test]
    fn test_paginated_envelope_batch() {
        let batch =
            extract_notification_batch(json!({"count": 2, "results": [sample(3), sample(4)]}));
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[1].notification_id, 4);
    }

    #[test]
    fn test_non_sequence_body_is_empty() {
        assert!(extract_notification_batch(json!({"detail": "throttled"})).is_empty());
        assert!(extract_notification_batch(json!("nope")).is_empty());
        assert!(extract_notification_batch(json!(null)).is_empty());
    }

    #[test]
    fn test_malformed_entries_are_skipped_not_fatal() {
        let batch = extract_notification_batch(json!([sample(1), {"bogus": true}, sample(2)]));
        let ids: Vec<_> = batch.iter().map(|n| n.notification_id).collect();
        assert_eq!(ids, vec![1, 2]);
    }
}
