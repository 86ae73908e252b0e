use serde::{Deserialize, Serialize};

/// The access/refresh token pair representing an authenticated client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
}

impl Session {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }

    /// Pull the token pair out of a login or refresh response body.
    /// Other fields (token_type, user, ...) are ignored.
    pub fn from_response(body: &serde_json::Value) -> Option<Self> {
        let access_token = body.get("access_token")?.as_str()?;
        let refresh_token = body.get("refresh_token")?.as_str()?;
        Some(Self::new(access_token, refresh_token))
    }
}

/// Lifecycle of a logical session as seen by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated,
    /// At least one refresh call is awaiting its response.
    Refreshing,
}

/// Notifications for the host application.
///
/// `Expired` and `LoggedOut` carry the route the host should navigate to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn,
    Refreshed,
    LoggedOut { login_route: String },
    Expired { login_route: String },
}

impl SessionEvent {
    /// Route the host should switch to, if any.
    pub fn redirect(&self) -> Option<&str> {
        match self {
            SessionEvent::LoggedOut { login_route } | SessionEvent::Expired { login_route } => {
                Some(login_route.as_str())
            }
            _ => None,
        }
    }
}
