//! REST API client module for the TalentAI Pro backend.
//!
//! This module provides the `ApiClient` for jobs, applications, profiles
//! and the AI feature endpoints.
//!
//! The API uses JWT bearer token authentication. Expired access tokens are
//! exchanged for a new pair via `POST /auth/refresh` and the failed request
//! is resubmitted once.

pub mod client;
pub mod endpoints;
pub mod error;
pub mod request;

pub use client::ApiClient;
pub use error::ApiError;
pub use request::ApiRequest;
