//! Outbound request description.
//!
//! An `ApiRequest` is plain data rather than a built `reqwest::Request` so
//! the same call can be dispatched a second time after a token refresh.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use super::ApiError;

#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the client's base URL, e.g. `/jobs/42`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub headers: HeaderMap,
    /// Sent without a bearer token; a 401 is returned as-is instead of
    /// triggering a session refresh (login, register, refresh).
    pub(crate) anonymous: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            headers: HeaderMap::new(),
            anonymous: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append a query pair; `None` values are skipped.
    pub fn query<V: ToString>(mut self, key: &str, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.query.push((key.to_string(), value.to_string()));
        }
        self
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::InvalidRequest(format!("Failed to serialize body: {}", e)))?;
        self.body = Some(value);
        Ok(self)
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub(crate) fn anonymous(mut self) -> Self {
        self.anonymous = true;
        self
    }

    /// Whether a 401 on this request may be recovered by refreshing the session.
    pub fn recovers_auth(&self) -> bool {
        !self.anonymous
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_skips_none() {
        let req = ApiRequest::get("/jobs")
            .query("skip", Some(0))
            .query::<u32>("limit", None)
            .query("status", Some("active"));
        assert_eq!(
            req.query,
            vec![
                ("skip".to_string(), "0".to_string()),
                ("status".to_string(), "active".to_string()),
            ]
        );
    }

    #[test]
    fn test_auth_recovery_flag() {
        let req = ApiRequest::post("/auth/login");
        assert!(req.recovers_auth());
        assert!(!req.anonymous().recovers_auth());
    }

    #[test]
    fn test_json_body() {
        let req = ApiRequest::post("/applications")
            .json(&serde_json::json!({ "job_id": "7" }))
            .expect("serialize");
        assert_eq!(req.body.as_ref().and_then(|b| b["job_id"].as_str()), Some("7"));
    }
}
