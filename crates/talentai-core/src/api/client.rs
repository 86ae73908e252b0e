//! API client for the TalentAI Pro backend.
//!
//! Every call goes through `ApiClient::send`, which attaches the stored
//! access token and recovers from a 401 by refreshing the session and
//! resubmitting the original request once. If the session cannot be
//! refreshed, stored tokens are cleared and a `SessionEvent::Expired` is
//! broadcast so the host can route back to its login page.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use reqwest::{header, Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::auth::{Session, SessionEvent, SessionState, SessionStore};
use crate::config::ClientConfig;
use crate::models::user::{Credentials, Registration};
use crate::models::{User, UserRole};

use super::{ApiError, ApiRequest};

/// Session events buffered per subscriber before the oldest are dropped.
const EVENT_CHANNEL_CAPACITY: usize = 16;

#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

/// Authenticated API client.
/// Clone is cheap: clones share the connection pool, session store and
/// event channel.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    config: Arc<ClientConfig>,
    store: Arc<dyn SessionStore>,
    events: broadcast::Sender<SessionEvent>,
    refreshing: Arc<AtomicUsize>,
}

/// Marks a refresh as in flight for as long as it lives, including when
/// the caller drops the future mid-request.
struct RefreshGuard(Arc<AtomicUsize>);

impl RefreshGuard {
    fn enter(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter.clone())
    }
}

impl Drop for RefreshGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl ApiClient {
    /// Create a new API client
    pub fn new(config: ClientConfig, store: Arc<dyn SessionStore>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::InvalidRequest(format!("Failed to build HTTP client: {}", e)))?;
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Ok(Self {
            client,
            config: Arc::new(config),
            store,
            events,
            refreshing: Arc::new(AtomicUsize::new(0)),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Subscribe to session lifecycle events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn session_state(&self) -> SessionState {
        if self.refreshing.load(Ordering::SeqCst) > 0 {
            SessionState::Refreshing
        } else if self.store.session().is_some() {
            SessionState::Authenticated
        } else {
            SessionState::Anonymous
        }
    }

    // ===== Session Lifecycle =====

    /// Log in and store the returned tokens. The response body is returned
    /// unchanged.
    pub async fn login(&self, email: &str, password: &str) -> Result<Value, ApiError> {
        let request = ApiRequest::post("/auth/login")
            .json(&Credentials { email, password })?
            .anonymous();

        let body = self
            .dispatch(&request)
            .await
            .map_err(Self::credential_error)?;

        let session = Session::from_response(&body).ok_or_else(|| {
            ApiError::InvalidResponse("Login response is missing access or refresh token".into())
        })?;
        if let Err(e) = self.store.set(&session) {
            // Never leave half of the new session next to half of the old one
            if let Err(clear_err) = self.store.clear() {
                warn!(error = %clear_err, "Failed to clear stored session");
            }
            return Err(ApiError::Storage(format!("{:#}", e)));
        }

        info!("Logged in");
        self.emit(SessionEvent::LoggedIn);
        Ok(body)
    }

    /// Create an account. Does not log in.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> Result<User, ApiError> {
        let request = ApiRequest::post("/auth/register")
            .json(&Registration {
                email,
                password,
                role,
            })?
            .anonymous();

        let body = self
            .dispatch(&request)
            .await
            .map_err(Self::credential_error)?;
        Self::decode(&request, body)
    }

    /// Clear the stored session and tell the host to show the login page.
    /// Makes no network call.
    pub fn logout(&self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to clear stored session");
        }
        info!("Logged out");
        self.emit(SessionEvent::LoggedOut {
            login_route: self.config.login_route.clone(),
        });
    }

    // ===== Request Dispatch =====

    /// Send a request, recovering once from an expired access token.
    ///
    /// Returns the parsed JSON body on 2xx (`Value::Null` for an empty body).
    pub async fn send(&self, request: &ApiRequest) -> Result<Value, ApiError> {
        match self.dispatch(request).await {
            Err(err) if err.is_unauthorized() && request.recovers_auth() => {
                self.refresh_then_retry_once(request).await
            }
            result => result,
        }
    }

    /// `send`, then deserialize the body.
    pub async fn send_json<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T, ApiError> {
        let body = self.send(request).await?;
        Self::decode(request, body)
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send_json(&ApiRequest::get(path)).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send_json(&ApiRequest::post(path).json(body)?).await
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send_json(&ApiRequest::put(path).json(body)?).await
    }

    async fn refresh_then_retry_once(&self, request: &ApiRequest) -> Result<Value, ApiError> {
        let Some(refresh_token) = self.store.refresh_token() else {
            warn!(path = %request.path, "Unauthorized and no refresh token stored, ending session");
            self.expire_session();
            return Err(ApiError::expired(None));
        };

        info!(path = %request.path, "Access token rejected, refreshing session");
        let stored = match self.refresh(&refresh_token).await {
            Ok(session) => self
                .store
                .set(&session)
                .map_err(|e| ApiError::Storage(format!("{:#}", e))),
            Err(e) => Err(e),
        };
        if let Err(e) = stored {
            warn!(error = %e, "Session refresh failed, ending session");
            self.expire_session();
            return Err(ApiError::expired(Some(e)));
        }

        self.emit(SessionEvent::Refreshed);
        debug!(path = %request.path, "Retrying request with refreshed token");
        // A second 401 here is terminal: no further refresh
        self.dispatch(request).await
    }

    /// Exchange a refresh token for a new token pair.
    async fn refresh(&self, refresh_token: &str) -> Result<Session, ApiError> {
        let _guard = RefreshGuard::enter(&self.refreshing);

        let request = ApiRequest::post("/auth/refresh")
            .json(&RefreshRequest { refresh_token })?
            .anonymous();
        let body = self.dispatch(&request).await?;

        Session::from_response(&body).ok_or_else(|| {
            ApiError::InvalidResponse("Refresh response is missing access or refresh token".into())
        })
    }

    /// One HTTP round trip. The bearer token is read from the store here, so
    /// it always reflects the most recently stored session.
    async fn dispatch(&self, request: &ApiRequest) -> Result<Value, ApiError> {
        let url = self.config.url(&request.path);
        debug!(method = %request.method, url = %url, "Sending request");

        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .header(header::ACCEPT, "application/json")
            .headers(request.headers.clone());
        if !request.anonymous {
            builder = builder.headers(self.auth_headers()?);
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        Self::read_response(response).await
    }

    fn auth_headers(&self) -> Result<header::HeaderMap, ApiError> {
        let mut headers = header::HeaderMap::new();
        if let Some(token) = self.store.access_token() {
            let value = header::HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| ApiError::InvalidRequest("Stored access token is not a valid header value".into()))?;
            headers.insert(header::AUTHORIZATION, value);
        }
        Ok(headers)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn read_response(response: Response) -> Result<Value, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &body));
        }

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse JSON response: {}", e)))
    }

    fn decode<T: DeserializeOwned>(request: &ApiRequest, body: Value) -> Result<T, ApiError> {
        serde_json::from_value(body).map_err(|e| {
            ApiError::InvalidResponse(format!(
                "Failed to parse response from {} {}: {}",
                request.method, request.path, e
            ))
        })
    }

    /// Login and register report rejected credentials as `Auth`.
    fn credential_error(err: ApiError) -> ApiError {
        match err {
            ApiError::Http { status, body }
                if matches!(
                    status,
                    StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
                ) =>
            {
                ApiError::Auth(error_detail(&body))
            }
            other => other,
        }
    }

    fn expire_session(&self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to clear stored session");
        }
        self.emit(SessionEvent::Expired {
            login_route: self.config.login_route.clone(),
        });
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}

/// Pull the human-readable message out of an error body (`{"detail": "..."}`),
/// falling back to the raw body.
fn error_detail(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("detail").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}
