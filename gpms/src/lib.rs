//! # GPMS Client Core
//!
//! State model for the graduation project management portal client.
//!
//! This library holds the pieces of the portal client with actual
//! state-transition semantics: the auth session lifecycle, the
//! persisted credential store, the notification/invitation/approval
//! read-model stores, and the pure role-to-dashboard mapping. The
//! networked layer (REST client, notification poller, CLI) lives in
//! the `gpms_client` crate and drives these stores.
//!
//! ## Architecture
//!
//! - A login response is normalized exactly once, at the session
//!   boundary, into a canonical [`session::User`]. Backends disagree
//!   about field names (`id` vs `pk`, split name fields, role strings
//!   vs role records); nothing downstream ever re-guesses shapes.
//! - The session itself is a sum type — `Anonymous` or
//!   `Authenticated { user }` — so "authenticated with no user" is
//!   unrepresentable.
//! - Stores are cheap clonable handles over shared state. Mutations
//!   are atomic per operation and immediately visible to every handle.
//! - The credential store persists the bearer token under two
//!   legacy-compatible keys and caches the normalized user, degrading
//!   to an empty session when storage is unavailable or corrupt.
//!
//! ## Core Modules
//!
//! - [`session`]: auth session state machine and user normalization
//! - [`roles`]: role labels and dashboard routing
//! - [`notifications`]: notification store with a derived unread count
//! - [`invitations`], [`approvals`]: read models with pending subsets
//! - [`storage`]: durable key-value backends and the credential store
//!
//! ## Example
//!
//! ```
//! use gpms::session::AuthSession;
//! use gpms::storage::{CredentialStore, MemoryStorage};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let credentials = CredentialStore::open(Arc::new(MemoryStorage::new()));
//! let session = AuthSession::restore(credentials);
//! assert!(!session.is_authenticated());
//!
//! let payload = json!({
//!     "id": 7,
//!     "username": "amal",
//!     "first_name": "Amal",
//!     "last_name": "Saleh",
//! });
//! let roles = vec![json!("student")];
//! session.login(&payload, &roles, "opaque-bearer-token").unwrap();
//! assert!(session.has_role("student"));
//! ```

/// Auth session state machine and user normalization.
pub mod session;
pub use session::{AuthSession, SessionError, SessionResult, User, UserId};

/// Role labels and role-based dashboard routing.
pub mod roles;
pub use roles::{Dashboard, Role};

/// Notification read model.
pub mod notifications;
pub use notifications::{Notification, NotificationKind, NotificationStore};

/// Group invitation read model.
pub mod invitations;
pub use invitations::{GroupInvitation, InvitationStatus, InvitationStore};

/// Approval request read model.
pub mod approvals;
pub use approvals::{ApprovalRequest, ApprovalStatus, ApprovalStore};

/// Durable storage and the persisted credential store.
pub mod storage;
pub use storage::{CredentialStore, FileStorage, MemoryStorage, StorageBackend};
