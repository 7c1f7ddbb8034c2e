//! Group invitation read model.

pub mod models;
pub mod store;

pub use models::{GroupInvitation, InvitationId, InvitationStatus};
pub use store::InvitationStore;
