//! Shared identity types for the mercato marketplace.
//!
//! This crate provides:
//! - The redacted account projection (`AccountView`) and `Role`
//! - The JSON envelopes the identity API speaks (`UserResponse`,
//!   `MessageResponse`, `ErrorBody`)
//!
//! Both the API server and the client state container depend on it, so
//! the wire shapes live in exactly one place.

mod account;
mod responses;

pub use account::{AccountView, Role};
pub use responses::{ErrorBody, MessageResponse, UserResponse};
