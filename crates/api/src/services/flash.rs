//! One-shot flash messages carried in a cookie.
//!
//! A mutation handler pushes a message and redirects; the next rendered page
//! shows it and clears the cookie.

use axum::{
    http::{
        header::{COOKIE, LOCATION, SET_COOKIE},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};

/// Cookie name holding pending messages.
pub const FLASH_COOKIE: &str = "flash";

/// Pending messages kept when several redirects happen before a render.
const MAX_PENDING_MESSAGES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Warning,
    Error,
}

impl FlashLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashLevel::Success => "success",
            FlashLevel::Warning => "warning",
            FlashLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub level: FlashLevel,
    pub message: String,
}

/// Pending flash messages for one browser.
#[derive(Debug, Clone, Default)]
pub struct Flash {
    messages: Vec<FlashMessage>,
}

impl Flash {
    /// Reads pending messages from the request cookie. A missing or
    /// tampered cookie yields no messages.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let messages = extract_cookie(headers, FLASH_COOKIE)
            .and_then(decode)
            .unwrap_or_default();
        Self { messages }
    }

    pub fn push(&mut self, level: FlashLevel, message: impl Into<String>) {
        self.messages.push(FlashMessage {
            level,
            message: message.into(),
        });
        if self.messages.len() > MAX_PENDING_MESSAGES {
            let excess = self.messages.len() - MAX_PENDING_MESSAGES;
            self.messages.drain(..excess);
        }
    }

    pub fn messages(&self) -> &[FlashMessage] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// 303 redirect that stores the pending messages.
    pub fn redirect(self, location: &'static str) -> Response {
        let mut headers = HeaderMap::new();
        headers.insert(LOCATION, HeaderValue::from_static(location));
        if let Ok(value) = HeaderValue::from_str(&self.set_cookie()) {
            headers.insert(SET_COOKIE, value);
        }
        (StatusCode::SEE_OTHER, headers).into_response()
    }

    /// Set-Cookie value storing the pending messages.
    pub fn set_cookie(&self) -> String {
        format!(
            "{}={}; Path=/; Max-Age=300; HttpOnly; SameSite=Lax",
            FLASH_COOKIE,
            encode(&self.messages)
        )
    }

    /// Set-Cookie value that removes the flash cookie.
    pub fn clear_cookie() -> &'static str {
        "flash=; Path=/; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT; HttpOnly; SameSite=Lax"
    }
}

fn encode(messages: &[FlashMessage]) -> String {
    let json = serde_json::to_vec(messages).unwrap_or_default();
    URL_SAFE_NO_PAD.encode(json)
}

fn decode(value: &str) -> Option<Vec<FlashMessage>> {
    let bytes = URL_SAFE_NO_PAD.decode(value).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Extract a cookie value from request headers by name.
fn extract_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|cookie_header| cookie_header.split(';'))
        .map(str::trim)
        .find_map(|cookie| {
            let (cookie_name, cookie_value) = cookie.split_once('=')?;
            (cookie_name == name).then_some(cookie_value)
        })
}
