// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Fixed-window rate limiter for contact form submissions.
//!
//! Each client id gets a counter that resets one window after its first
//! submission. This is a fixed window, not a sliding one: a client that
//! spends its quota just before `reset_at` can spend it again immediately
//! after, so up to twice the limit may land in a short span around the
//! boundary.

use crate::config::RateLimitConfig;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Result of a rate limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitResult {
    /// Submission admitted and counted
    Allowed {
        /// Submissions left in the current window
        remaining: u32,
        /// When the current window ends
        reset_at: DateTime<Utc>,
    },
    /// Quota exhausted for the current window
    Limited {
        /// When the current window ends
        reset_at: DateTime<Utc>,
    },
}

impl RateLimitResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitResult::Allowed { .. })
    }

    /// Remaining quota; zero when limited.
    pub fn remaining(&self) -> u32 {
        match self {
            RateLimitResult::Allowed { remaining, .. } => *remaining,
            RateLimitResult::Limited { .. } => 0,
        }
    }

    pub fn reset_at(&self) -> DateTime<Utc> {
        match self {
            RateLimitResult::Allowed { reset_at, .. } | RateLimitResult::Limited { reset_at } => {
                *reset_at
            }
        }
    }
}

/// Per-client submission counter.
///
/// The whole check-then-increment runs under the store's write lock, so
/// concurrent submissions from one client cannot both slip under the limit.
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// Count one submission for `client_id` and report whether it fits in
    /// the current window.
    async fn check_and_consume(&self, client_id: &str, now: DateTime<Utc>) -> RateLimitResult;

    /// Drop entries whose window has ended. Returns how many were removed.
    async fn sweep(&self, now: DateTime<Utc>) -> usize;

    /// Number of client ids currently tracked.
    async fn len(&self) -> usize;
}

/// Counter state for one client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitEntry {
    /// Submissions admitted in the current window
    pub count: u32,
    /// End of the current window
    pub reset_at: DateTime<Utc>,
}

/// In-process fixed-window limiter keyed by client id.
pub struct FixedWindowLimiter {
    /// Max submissions per window
    limit: u32,
    /// Window length
    window: Duration,
    /// Per-client counters
    entries: Arc<RwLock<HashMap<String, RateLimitEntry>>>,
}

impl FixedWindowLimiter {
    /// Create a new limiter with the given configuration.
    ///
    /// Windows too long for a [`Duration`] saturate rather than shrink;
    /// `Config::validate` keeps real configurations well below that.
    pub fn new(config: &RateLimitConfig) -> Self {
        let window = Duration::from_std(config.window_duration()).unwrap_or(Duration::MAX);
        Self::with_window(config.max_submissions, window)
    }

    pub fn with_window(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Snapshot of the entry for a client, if one is tracked.
    pub async fn entry(&self, client_id: &str) -> Option<RateLimitEntry> {
        self.entries.read().await.get(client_id).cloned()
    }
}

#[async_trait]
impl RateLimitStore for FixedWindowLimiter {
    async fn check_and_consume(&self, client_id: &str, now: DateTime<Utc>) -> RateLimitResult {
        let mut entries = self.entries.write().await;

        match entries.get_mut(client_id) {
            Some(entry) if entry.reset_at > now => {
                if entry.count >= self.limit {
                    debug!(client_id, count = entry.count, reset_at = %entry.reset_at, "Client over submission limit");
                    return RateLimitResult::Limited {
                        reset_at: entry.reset_at,
                    };
                }
                entry.count += 1;
                RateLimitResult::Allowed {
                    remaining: self.limit - entry.count,
                    reset_at: entry.reset_at,
                }
            }
            _ => {
                // New client, or the previous window has ended
                let reset_at = now
                    .checked_add_signed(self.window)
                    .unwrap_or(DateTime::<Utc>::MAX_UTC);
                entries.insert(
                    client_id.to_string(),
                    RateLimitEntry { count: 1, reset_at },
                );
                debug!(client_id, %reset_at, "Opened rate limit window");
                RateLimitResult::Allowed {
                    remaining: self.limit.saturating_sub(1),
                    reset_at,
                }
            }
        }
    }

    async fn sweep(&self, now: DateTime<Utc>) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.reset_at > now);
        let removed = before - entries.len();
        if removed > 0 {
            debug!(removed, remaining = entries.len(), "Swept expired rate limit entries");
        }
        removed
    }

    async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}
