//! Approval request read model.

pub mod models;
pub mod store;

pub use models::{ApprovalId, ApprovalRequest, ApprovalStatus};
pub use store::ApprovalStore;
