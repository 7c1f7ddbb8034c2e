//! Approval request read-model store.

use super::models::{ApprovalId, ApprovalRequest, ApprovalStatus};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Default)]
struct ApprovalState {
    items: Vec<ApprovalRequest>,
    pending: Vec<ApprovalRequest>,
}

/// Shared approval store with a derived pending subset.
#[derive(Clone, Default)]
pub struct ApprovalStore {
    state: Arc<Mutex<ApprovalState>>,
}

impl ApprovalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole list and recompute the pending subset.
    pub fn replace_all(&self, approvals: Vec<ApprovalRequest>) {
        let pending = approvals
            .iter()
            .filter(|a| a.status == ApprovalStatus::Pending)
            .cloned()
            .collect();
        let mut state = self.state.lock();
        state.items = approvals;
        state.pending = pending;
    }

    /// Prepend an approval; pending ones also join the pending subset.
    pub fn insert(&self, approval: ApprovalRequest) {
        let mut state = self.state.lock();
        if approval.status == ApprovalStatus::Pending {
            state.pending.insert(0, approval.clone());
        }
        state.items.insert(0, approval);
    }

    /// Delete by id from both sequences.
    pub fn remove(&self, id: ApprovalId) {
        let mut state = self.state.lock();
        state.items.retain(|a| a.approval_id != id);
        state.pending.retain(|a| a.approval_id != id);
    }

    /// Rewrite the status of one approval. Whatever the new status,
    /// the item leaves the pending subset: it has been acted on.
    pub fn update_status(&self, id: ApprovalId, status: ApprovalStatus) {
        let mut state = self.state.lock();
        if let Some(a) = state.items.iter_mut().find(|a| a.approval_id == id) {
            a.status = status;
        }
        state.pending.retain(|a| a.approval_id != id);
    }

    /// Snapshot of the full list.
    pub fn snapshot(&self) -> Vec<ApprovalRequest> {
        self.state.lock().items.clone()
    }

    /// Snapshot of the pending subset.
    pub fn pending(&self) -> Vec<ApprovalRequest> {
        self.state.lock().pending.clone()
    }

    pub fn len(&self) -> usize {
        self.state.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().items.is_empty()
    }
}
