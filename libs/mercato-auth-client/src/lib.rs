//! Client-side auth state for mercato front ends.
//!
//! This crate provides:
//!
//! - **`AuthStore`** - the single state container every UI surface reads
//!   from. It owns the last known identity snapshot and the per-operation
//!   loading/error flags, and performs the HTTP round trips; the session
//!   cookie lives in its internal cookie jar and never surfaces.
//! - **`decide`** - the pure route gate mapping a snapshot to
//!   allow/redirect, evaluated before rendering any protected view.
//!
//! # Example
//!
//! ```rust,ignore
//! use mercato_auth_client::{AuthStore, RouteDecision, decide};
//!
//! let mut auth = AuthStore::new("https://api.mercato.example".parse()?)?;
//!
//! // Bootstrap probe on startup; "not logged in" is a normal outcome
//! auth.check_auth().await;
//!
//! match decide(&auth.snapshot()) {
//!     RouteDecision::Allow => render_protected(),
//!     RouteDecision::RedirectTo(target) => redirect(target),
//! }
//! ```

mod error;
mod gate;
mod store;

pub use error::{AuthClientError, ErrorKind};
pub use gate::{RedirectTarget, RouteDecision, decide};
pub use store::{AuthSnapshot, AuthStore};

// Re-export shared types for convenience
pub use mercato_auth_types::{AccountView, MessageResponse, Role, UserResponse};
