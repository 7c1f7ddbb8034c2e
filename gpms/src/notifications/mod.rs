//! Notification read model: records fetched from the backend and the
//! store keeping them with a derived unread count.

pub mod models;
pub mod store;

pub use models::{Notification, NotificationId, NotificationKind};
pub use store::NotificationStore;
