//! Session data models.

use super::errors::{SessionError, SessionResult};
use crate::roles::Role;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// User ID type
pub type UserId = i64;

/// Raw user payload as the backend sends it from `auth/login/`.
///
/// Field names vary across backend versions (`id` vs `pk`, split name
/// fields vs a single display name), so everything is optional here
/// and resolved during normalization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiUser {
    pub id: Option<UserId>,
    pub pk: Option<UserId>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default)]
    pub roles: Vec<Value>,
    pub permissions: Option<Vec<String>>,
    pub department_id: Option<i64>,
    pub college_id: Option<i64>,
}

/// Normalized user, produced once at login and used everywhere after.
///
/// The first element of `roles` is the primary role and drives
/// dashboard routing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub name: String,
    pub roles: Vec<Role>,
    pub permissions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub college_id: Option<i64>,
}

impl User {
    /// Normalize a login payload.
    ///
    /// Accepts either an already-normalized user (detected by a
    /// non-empty `name` plus an array-valued `roles` field) or a raw
    /// backend payload. Raw payloads join split name fields with a
    /// space, take roles from the explicit `roles` argument, and
    /// default permissions to empty. A payload with neither `id` nor
    /// `pk` is rejected rather than silently defaulting to zero.
    pub fn normalize(payload: &Value, roles: &[Value]) -> SessionResult<User> {
        if looks_normalized(payload)
            && let Ok(user) = serde_json::from_value::<User>(payload.clone())
        {
            return Ok(user);
        }

        let api: ApiUser = serde_json::from_value(payload.clone())
            .map_err(|e| SessionError::MalformedPayload(e.to_string()))?;
        let id = api.id.or(api.pk).ok_or(SessionError::MissingUserId)?;

        let name = match api.name {
            Some(ref name) if !name.trim().is_empty() => name.trim().to_string(),
            _ => format!(
                "{} {}",
                api.first_name.as_deref().unwrap_or_default(),
                api.last_name.as_deref().unwrap_or_default()
            )
            .trim()
            .to_string(),
        };

        Ok(User {
            id,
            username: api.username.unwrap_or_default(),
            email: api.email.unwrap_or_default(),
            name,
            roles: Role::from_values(roles),
            permissions: api.permissions.unwrap_or_default(),
            department_id: api.department_id,
            college_id: api.college_id,
        })
    }

    /// Primary role, used for dashboard routing.
    pub fn primary_role(&self) -> Option<&Role> {
        self.roles.first()
    }

    /// True iff the user holds the role, compared on the label.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.label() == role)
    }

    /// True iff the user holds any of the roles.
    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        roles.iter().any(|role| self.has_role(role))
    }

    /// True iff the permission string is present.
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }
}

/// Heuristic for payloads that already went through normalization: a
/// non-empty display name together with an array-valued roles field.
fn looks_normalized(payload: &Value) -> bool {
    payload
        .get("name")
        .and_then(Value::as_str)
        .is_some_and(|name| !name.is_empty())
        && payload.get("roles").is_some_and(Value::is_array)
}
