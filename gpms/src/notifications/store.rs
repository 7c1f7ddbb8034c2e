//! Notification read-model store.

use super::models::{Notification, NotificationId};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Default)]
struct NotificationState {
    items: Vec<Notification>,
    unread: usize,
}

/// Shared notification store.
///
/// Keeps the fetched list (order as received; the backend sends newest
/// first) and an unread counter maintained incrementally. The counter
/// equals the number of unread entries after every operation and never
/// goes negative.
///
/// The store is a read-model cache: telling the server about reads and
/// deletes is the API layer's concern. Local mutation is optimistic —
/// the next poll's `replace_all` reconciles any divergence.
#[derive(Clone, Default)]
pub struct NotificationStore {
    state: Arc<Mutex<NotificationState>>,
}

impl NotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole list, e.g. after a poll tick. Order is kept
    /// as received and the unread count is recomputed from scratch.
    pub fn replace_all(&self, notifications: Vec<Notification>) {
        let unread = notifications.iter().filter(|n| !n.is_read).count();
        let mut state = self.state.lock();
        state.items = notifications;
        state.unread = unread;
    }

    /// Prepend a notification, counting it when unread.
    pub fn insert(&self, notification: Notification) {
        let mut state = self.state.lock();
        if !notification.is_read {
            state.unread += 1;
        }
        state.items.insert(0, notification);
    }

    /// Delete by id. Removing an unread entry also drops it from the
    /// unread count.
    pub fn remove(&self, id: NotificationId) {
        let mut state = self.state.lock();
        if let Some(pos) = state.items.iter().position(|n| n.notification_id == id) {
            let removed = state.items.remove(pos);
            if !removed.is_read {
                state.unread = state.unread.saturating_sub(1);
            }
        }
    }

    /// Mark one notification read. No-op when missing or already read.
    pub fn mark_read(&self, id: NotificationId) {
        let mut state = self.state.lock();
        let Some(n) = state.items.iter_mut().find(|n| n.notification_id == id) else {
            return;
        };
        if n.is_read {
            return;
        }
        n.is_read = true;
        state.unread = state.unread.saturating_sub(1);
    }

    /// Mark everything read and zero the counter.
    pub fn mark_all_read(&self) {
        let mut state = self.state.lock();
        for n in &mut state.items {
            n.is_read = true;
        }
        state.unread = 0;
    }

    /// Trust-the-server override for the counter, used with the
    /// dedicated unread-count endpoint.
    pub fn set_unread_count(&self, count: usize) {
        self.state.lock().unread = count;
    }

    /// Drop everything.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.items.clear();
        state.unread = 0;
    }

    /// Snapshot of the current list.
    pub fn snapshot(&self) -> Vec<Notification> {
        self.state.lock().items.clone()
    }

    pub fn unread_count(&self) -> usize {
        self.state.lock().unread
    }

    pub fn len(&self) -> usize {
        self.state.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().items.is_empty()
    }
}
