// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Cookie parsing and rendering for the session identifier

use crate::config::SessionConfig;
use crate::session::Session;
use cookie::time::Duration;
use cookie::Cookie;
use std::fmt;

/// Find the cookie called `name` in a `Cookie:` request header value
///
/// Values are percent-decoded and surrounding double quotes are stripped.
/// The first non-empty match wins; malformed pairs are skipped.
pub fn extract_session_id(cookie_header: &str, name: &str) -> Option<String> {
    Cookie::split_parse_encoded(cookie_header)
        .filter_map(Result::ok)
        .filter(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value_trimmed().to_string())
        .find(|value| !value.is_empty())
}

/// Outgoing session cookie
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookie {
    pub name: String,
    pub value: String,
    pub path: String,
    pub domain: Option<String>,
    /// `None` renders a browser-session cookie
    pub max_age: Option<u64>,
    pub secure: bool,
}

impl SessionCookie {
    /// Cookie carrying `id` with the attributes from `config`
    pub fn for_session(config: &SessionConfig, id: &str) -> Self {
        Self {
            name: config.name.clone(),
            value: id.to_string(),
            path: config.path.clone(),
            domain: config.domain.clone(),
            max_age: (config.cookie_max_age > 0).then_some(config.cookie_max_age),
            secure: config.secure,
        }
    }

    /// Render as a `Set-Cookie` header value; `HttpOnly` is always set
    pub fn to_header_value(&self) -> String {
        self.to_cookie().encoded().to_string()
    }

    fn to_cookie(&self) -> Cookie<'static> {
        let mut builder = Cookie::build((self.name.clone(), self.value.clone()))
            .path(self.path.clone())
            .secure(self.secure)
            .http_only(true);
        if let Some(domain) = &self.domain {
            builder = builder.domain(domain.clone());
        }
        if let Some(max_age) = self.max_age {
            let seconds = i64::try_from(max_age).unwrap_or(i64::MAX);
            builder = builder.max_age(Duration::seconds(seconds));
        }
        builder.build()
    }
}

impl fmt::Display for SessionCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_header_value())
    }
}

/// Whether the response must carry a `Set-Cookie` for the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookieDecision {
    Write,
    Keep,
}

impl CookieDecision {
    pub fn decide(presented: bool, expired: bool, regenerated: bool) -> Self {
        if !presented || expired || regenerated {
            CookieDecision::Write
        } else {
            CookieDecision::Keep
        }
    }

    /// Decision for a session at the end of its request
    pub fn for_session(session: &Session) -> Self {
        Self::decide(
            session.cookie_presented(),
            session.is_expired(),
            session.was_regenerated(),
        )
    }

    pub fn must_write(self) -> bool {
        self == CookieDecision::Write
    }
}
