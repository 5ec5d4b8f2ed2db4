//! `session_id` cookie handling.

use axum::http::{HeaderMap, HeaderValue, header};
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "session_id";

/// The caller's session id, minted when the request carried none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookie {
    pub id: String,
    pub minted: bool,
}

impl SessionCookie {
    /// Reuse the request's `session_id` cookie or mint a fresh UUID v4.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        match read_session(headers) {
            Some(id) => Self { id, minted: false },
            None => Self {
                id: Uuid::new_v4().to_string(),
                minted: true,
            },
        }
    }

    /// `Set-Cookie` value for a freshly minted session.
    pub fn set_cookie(&self) -> Option<HeaderValue> {
        if !self.minted {
            return None;
        }
        HeaderValue::from_str(&format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            SESSION_COOKIE, self.id
        ))
        .ok()
    }
}

/// Value of the `session_id` cookie, if present and non-empty.
pub fn read_session(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.trim().is_empty())
        .map(|(_, value)| value.trim().to_string())
}
