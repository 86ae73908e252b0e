//! TalentAI Pro client library.
//!
//! Provides the authenticated API client, session storage, typed models
//! and client-side resume field extraction shared by the front ends.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod resume;
pub mod utils;

pub use api::{ApiClient, ApiError, ApiRequest};
pub use auth::{
    FileSessionStore, KeyringSessionStore, MemorySessionStore, Session, SessionEvent,
    SessionState, SessionStore,
};
pub use config::{ClientConfig, Config};
