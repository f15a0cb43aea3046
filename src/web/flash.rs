//! One-shot flash messages carried in a cookie
//!
//! A POST handler sets the `flash` cookie and redirects; the next page reads
//! it into its `messages` context and clears it.

use axum::http::{header, HeaderMap, HeaderValue};
use serde::Serialize;

const COOKIE_NAME: &str = "flash";
const CLEAR_COOKIE: &str = "flash=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0";

/// Severity, rendered as the `alert-<level>` CSS class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Error,
}

impl Level {
    fn as_str(self) -> &'static str {
        match self {
            Level::Success => "success",
            Level::Error => "error",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "success" => Some(Level::Success),
            "error" => Some(Level::Error),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flash {
    pub level: Level,
    pub text: String,
}

impl Flash {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            text: text.into(),
        }
    }

    /// `Set-Cookie` value storing this message
    pub fn to_cookie(&self) -> Option<HeaderValue> {
        let value = format!("{}:{}", self.level.as_str(), self.text);
        let cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            COOKIE_NAME,
            urlencoding::encode(&value)
        );
        HeaderValue::from_str(&cookie).ok()
    }

    /// Read the pending message from the request cookies, if any
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;
        let raw = cookie_header
            .split(';')
            .map(str::trim)
            .find_map(|cookie| cookie.strip_prefix("flash="))?;
        if raw.is_empty() {
            return None;
        }

        let decoded = urlencoding::decode(raw).ok()?;
        let (level, text) = decoded.split_once(':')?;
        Some(Self {
            level: Level::parse(level)?,
            text: text.to_string(),
        })
    }
}

/// `Set-Cookie` value that removes a consumed message
pub fn clear_cookie() -> HeaderValue {
    HeaderValue::from_static(CLEAR_COOKIE)
}
