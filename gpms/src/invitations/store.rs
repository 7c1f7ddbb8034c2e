//! Group invitation read-model store.

use super::models::{GroupInvitation, InvitationId, InvitationStatus};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Default)]
struct InvitationState {
    items: Vec<GroupInvitation>,
    pending: Vec<GroupInvitation>,
}

/// Shared invitation store with a derived pending subset.
///
/// The pending subset is recomputed when the whole list is replaced
/// and maintained incrementally on single-item changes.
#[derive(Clone, Default)]
pub struct InvitationStore {
    state: Arc<Mutex<InvitationState>>,
}

impl InvitationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole list and recompute the pending subset.
    pub fn replace_all(&self, invitations: Vec<GroupInvitation>) {
        let pending = invitations
            .iter()
            .filter(|i| i.status == InvitationStatus::Pending)
            .cloned()
            .collect();
        let mut state = self.state.lock();
        state.items = invitations;
        state.pending = pending;
    }

    /// Prepend an invitation; pending ones also join the pending
    /// subset.
    pub fn insert(&self, invitation: GroupInvitation) {
        let mut state = self.state.lock();
        if invitation.status == InvitationStatus::Pending {
            state.pending.insert(0, invitation.clone());
        }
        state.items.insert(0, invitation);
    }

    /// Delete by id from both sequences.
    pub fn remove(&self, id: InvitationId) {
        let mut state = self.state.lock();
        state.items.retain(|i| i.invitation_id != id);
        state.pending.retain(|i| i.invitation_id != id);
    }

    /// Rewrite the status of one invitation. Whatever the new status,
    /// the item leaves the pending subset: it has been acted on.
    pub fn update_status(&self, id: InvitationId, status: InvitationStatus) {
        let mut state = self.state.lock();
        if let Some(i) = state.items.iter_mut().find(|i| i.invitation_id == id) {
            i.status = status;
        }
        state.pending.retain(|i| i.invitation_id != id);
    }

    /// Snapshot of the full list.
    pub fn snapshot(&self) -> Vec<GroupInvitation> {
        self.state.lock().items.clone()
    }

    /// Snapshot of the pending subset.
    pub fn pending(&self) -> Vec<GroupInvitation> {
        self.state.lock().pending.clone()
    }

    pub fn len(&self) -> usize {
        self.state.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::models::User;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn member(id: i64) -> User {
        User {
            id,
            username: format!("user{id}"),
            email: format!("user{id}@gpms.edu"),
            name: format!("User {id}"),
            roles: Vec::new(),
            permissions: Vec::new(),
            department_id: None,
            college_id: None,
        }
    }

    fn invitation(id: InvitationId, status: InvitationStatus) -> GroupInvitation {
        GroupInvitation {
            invitation_id: id,
            group: json!({"group_id": 1, "group_name": "Team A"}),
            invited_student: member(10),
            invited_by: member(20),
            status,
            created_at: Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap(),
            expires_at: Utc.with_ymd_and_hms(2025, 6, 8, 9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_replace_all_recomputes_pending() {
        let store = InvitationStore::new();
        store.replace_all(vec![
            invitation(1, InvitationStatus::Pending),
            invitation(2, InvitationStatus::Accepted),
            invitation(3, InvitationStatus::Pending),
        ]);
        assert_eq!(store.len(), 3);
        let pending: Vec<_> = store.pending().iter().map(|i| i.invitation_id).collect();
        assert_eq!(pending, vec![1, 3]);
    }

    #[test]
    fn test_insert_joins_pending_only_when_pending() {
        let store = InvitationStore::new();
        store.insert(invitation(1, InvitationStatus::Rejected));
        store.insert(invitation(2, InvitationStatus::Pending));
        assert_eq!(store.len(), 2);
        assert_eq!(store.pending().len(), 1);
        assert_eq!(store.pending()[0].invitation_id, 2);
    }

    #[test]
    fn test_update_status_leaves_pending() {
        let store = InvitationStore::new();
        store.replace_all(vec![invitation(1, InvitationStatus::Pending)]);

        store.update_status(1, InvitationStatus::Accepted);
        assert!(store.pending().is_empty());
        assert_eq!(store.snapshot()[0].status, InvitationStatus::Accepted);
    }

    #[test]
    fn test_remove_clears_both_sequences() {
        let store = InvitationStore::new();
        store.replace_all(vec![invitation(1, InvitationStatus::Pending)]);
        store.remove(1);
        assert!(store.is_empty());
        assert!(store.pending().is_empty());
    }
}
