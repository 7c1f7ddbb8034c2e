//! Internal modules for the GPMS portal client.
//!
//! This library provides the REST API client, the notification
//! poller, configuration, and command parsing used by the gpms_client
//! binary.

pub mod api_client;
pub mod commands;
pub mod config;
pub mod poller;
