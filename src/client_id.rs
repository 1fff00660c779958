// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Client identifier extraction from proxy headers.

use axum::http::HeaderMap;

/// Identifier used when no proxy header names the client.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Headers consulted in order; the first non-empty value wins.
const CLIENT_HEADERS: &[&str] = &["x-forwarded-for", "x-real-ip", "cf-connecting-ip"];

/// Derive the rate limit key for a request.
///
/// `X-Forwarded-For` contributes its first (client-most) entry. Values are
/// not parsed as IP addresses; whatever string the proxy supplies is used.
pub fn client_id(headers: &HeaderMap) -> String {
    CLIENT_HEADERS
        .iter()
        .filter_map(|name| headers.get(*name))
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(',').next())
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}
