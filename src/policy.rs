// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Submission policy: rate limit, spam heuristics, then delivery.
//!
//! The rate limit is consulted first and consumes a slot even when a later
//! heuristic rejects the submission, so spam attempts count against the
//! sender's quota.

use crate::clock::{Clock, SystemClock};
use crate::config::{Config, DeliveryConfig};
use crate::delivery::{DeliveryError, DeliveryGateway};
use crate::email::OutboundEmail;
use crate::heuristics::SpamHeuristics;
use crate::limiter::{FixedWindowLimiter, RateLimitResult, RateLimitStore};
use crate::metrics::Metrics;
use crate::models::{DeliveryReceipt, ReasonCode, Submission, Verdict};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Failures that are the relay's fault rather than the submitter's.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Email delivery is not configured")]
    NotConfigured,

    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

/// Result of a submission that reached a decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Accepted and handed to the email provider
    Delivered {
        receipt: DeliveryReceipt,
        remaining: u32,
    },
    /// Rejected by the rate limiter or a heuristic
    Rejected(Verdict),
}

/// Orchestrates the rate limiter, heuristics and delivery gateway.
pub struct SubmissionPolicy {
    store: Arc<dyn RateLimitStore>,
    heuristics: SpamHeuristics,
    gateway: Option<Arc<dyn DeliveryGateway>>,
    delivery: DeliveryConfig,
    clock: Arc<dyn Clock>,
    metrics: Metrics,
}

impl SubmissionPolicy {
    /// Create a policy with an in-process limiter and the system clock.
    pub fn new(
        config: &Config,
        gateway: Option<Arc<dyn DeliveryGateway>>,
        metrics: Metrics,
    ) -> Self {
        Self {
            store: Arc::new(FixedWindowLimiter::new(&config.rate_limit)),
            heuristics: SpamHeuristics::new(config.spam.clone()),
            gateway,
            delivery: config.delivery.clone(),
            clock: Arc::new(SystemClock),
            metrics,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_store(mut self, store: Arc<dyn RateLimitStore>) -> Self {
        self.store = store;
        self
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Decide whether a submission may be delivered.
    ///
    /// Order is fixed: rate limit, honeypot, timing, required fields, email
    /// shape, keywords, length, links. The first failure wins.
    pub async fn evaluate(
        &self,
        submission: &Submission,
        client_id: &str,
        now: DateTime<Utc>,
    ) -> Verdict {
        let rate = self.store.check_and_consume(client_id, now).await;
        let (remaining, reset_at) = (rate.remaining(), rate.reset_at());

        if let RateLimitResult::Limited { .. } = rate {
            return Verdict::reject(ReasonCode::RateLimited, 0, reset_at);
        }

        match self.heuristics.check(submission) {
            Ok(()) => Verdict::accept(remaining, reset_at),
            Err(reason) => Verdict::reject(reason, remaining, reset_at),
        }
    }

    /// Evaluate a submission and, if accepted, send it.
    ///
    /// Missing delivery configuration fails before any quota is consumed.
    /// Delivery errors are returned as-is and never retried.
    pub async fn submit(
        &self,
        submission: &Submission,
        client_id: &str,
    ) -> Result<Outcome, SubmitError> {
        self.metrics.submissions.inc();

        let Some(gateway) = self.gateway.as_ref() else {
            error!("Submission received but email delivery is not configured");
            return Err(SubmitError::NotConfigured);
        };

        let verdict = self.evaluate(submission, client_id, self.clock.now()).await;
        if !verdict.allowed {
            info!(
                client_id,
                reason = %verdict.reason,
                remaining = verdict.remaining,
                "Submission rejected"
            );
            self.metrics.record_rejection(verdict.reason);
            return Ok(Outcome::Rejected(verdict));
        }

        let email = OutboundEmail::from_submission(submission, &self.delivery);
        match gateway.send(&email).await {
            Ok(receipt) => {
                self.metrics.record_delivery(true);
                info!(client_id, id = %receipt.id, "Submission delivered");
                Ok(Outcome::Delivered {
                    receipt,
                    remaining: verdict.remaining.unwrap_or(0),
                })
            }
            Err(e) => {
                self.metrics.record_delivery(false);
                error!(client_id, error = %e, "Email delivery failed");
                Err(SubmitError::Delivery(e))
            }
        }
    }

    /// Remove expired rate limit entries and refresh the gauge.
    pub async fn sweep(&self) -> usize {
        let removed = self.store.sweep(self.clock.now()).await;
        let tracked = self.store.len().await;
        self.metrics.rate_limit_entries.set(tracked as i64);
        debug!(removed, tracked, "Rate limit sweep finished");
        removed
    }
}

/// Run [`SubmissionPolicy::sweep`] on a fixed interval in the background.
pub fn spawn_sweeper(policy: Arc<SubmissionPolicy>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            policy.sweep().await;
        }
    })
}
