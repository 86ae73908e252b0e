//! Session management for the API client.
//!
//! This module provides:
//! - `Session`: the access/refresh token pair
//! - `SessionStore`: injectable credential storage, with in-memory, file
//!   and OS keychain implementations
//! - `SessionEvent`: notifications the host subscribes to (e.g. to route
//!   back to the login page when a session cannot be recovered)

pub mod credentials;
pub mod session;
pub mod store;

pub use credentials::KeyringSessionStore;
pub use session::{Session, SessionEvent, SessionState};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore};
