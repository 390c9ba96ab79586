// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Transport glue between HTTP cookies and the session engine
//!
//! The engine only sees an opaque identifier. This module reads it from a
//! `Cookie:` header and renders the `Set-Cookie` value for the response.

pub mod cookie;

pub use self::cookie::{extract_session_id, CookieDecision, SessionCookie};
