// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Prometheus metrics for the contact relay.

use crate::models::ReasonCode;
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

/// Counters owned by one relay instance.
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub submissions: IntCounter,
    pub rejections: IntCounterVec,
    pub deliveries: IntCounterVec,
    pub rate_limit_entries: IntGauge,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let submissions = IntCounter::new(
            "contact_submissions_total",
            "Contact form submissions received",
        )?;
        let rejections = IntCounterVec::new(
            Opts::new("contact_rejections_total", "Submissions rejected, by reason"),
            &["reason"],
        )?;
        let deliveries = IntCounterVec::new(
            Opts::new("contact_deliveries_total", "Email provider calls, by result"),
            &["result"],
        )?;
        let rate_limit_entries = IntGauge::new(
            "contact_rate_limit_entries",
            "Client ids tracked by the rate limiter",
        )?;

        registry.register(Box::new(submissions.clone()))?;
        registry.register(Box::new(rejections.clone()))?;
        registry.register(Box::new(deliveries.clone()))?;
        registry.register(Box::new(rate_limit_entries.clone()))?;

        Ok(Self {
            registry,
            submissions,
            rejections,
            deliveries,
            rate_limit_entries,
        })
    }

    pub fn record_rejection(&self, reason: ReasonCode) {
        self.rejections.with_label_values(&[reason.as_str()]).inc();
    }

    pub fn record_delivery(&self, ok: bool) {
        let result = if ok { "ok" } else { "error" };
        self.deliveries.with_label_values(&[result]).inc();
    }

    /// Render all metrics in the Prometheus text format.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
