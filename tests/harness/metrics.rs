// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Metrics collection for abuse simulation results.

use contact_relay::ReasonCode;
use std::collections::HashMap;
use std::time::Duration;

/// Collects metrics during an attack simulation.
#[derive(Debug, Default)]
pub struct AttackMetrics {
    /// Count of submissions by reason
    outcomes: HashMap<ReasonCode, usize>,
    /// Count of submissions by client id
    submissions_per_client: HashMap<String, usize>,
    /// Accepted submissions by client id
    accepted_per_client: HashMap<String, usize>,
    /// Evaluation latency samples (microseconds)
    latencies: Vec<u64>,
}

impl AttackMetrics {
    /// Create a new metrics collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a submission outcome.
    pub fn record(&mut self, reason: ReasonCode, client: &str, latency: Duration) {
        *self.outcomes.entry(reason).or_insert(0) += 1;
        *self.submissions_per_client.entry(client.to_string()).or_insert(0) += 1;
        if reason == ReasonCode::Accepted {
            *self.accepted_per_client.entry(client.to_string()).or_insert(0) += 1;
        }
        self.latencies.push(latency.as_micros() as u64);
    }

    /// Get total submission count.
    pub fn total(&self) -> usize {
        self.outcomes.values().sum()
    }

    /// Get count for a specific reason.
    pub fn count(&self, reason: ReasonCode) -> usize {
        self.outcomes.get(&reason).copied().unwrap_or(0)
    }

    /// Most submissions any single client got accepted.
    pub fn max_accepted_per_client(&self) -> usize {
        self.accepted_per_client.values().copied().max().unwrap_or(0)
    }

    /// Get block rate (ratio of rejected to total).
    pub fn block_rate(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        (total - self.count(ReasonCode::Accepted)) as f64 / total as f64
    }

    /// Get median latency in microseconds.
    pub fn median_latency_us(&self) -> u64 {
        if self.latencies.is_empty() {
            return 0;
        }
        let mut sorted = self.latencies.clone();
        sorted.sort_unstable();
        sorted[sorted.len() / 2]
    }

    /// Generate a summary report.
    pub fn report(&self) -> MetricsReport {
        MetricsReport {
            total: self.total(),
            accepted: self.count(ReasonCode::Accepted),
            rate_limited: self.count(ReasonCode::RateLimited),
            content_rejected: ReasonCode::REJECTIONS[1..]
                .iter()
                .map(|r| self.count(*r))
                .sum(),
            block_rate: self.block_rate(),
            median_latency_us: self.median_latency_us(),
            unique_clients: self.submissions_per_client.len(),
            max_accepted_per_client: self.max_accepted_per_client(),
        }
    }
}

/// Summary report of attack metrics.
#[derive(Debug, Clone)]
pub struct MetricsReport {
    pub total: usize,
    pub accepted: usize,
    pub rate_limited: usize,
    pub content_rejected: usize,
    pub block_rate: f64,
    pub median_latency_us: u64,
    pub unique_clients: usize,
    pub max_accepted_per_client: usize,
}

impl std::fmt::Display for MetricsReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Attack Metrics Report ===")?;
        writeln!(f, "Total Submissions: {}", self.total)?;
        writeln!(f, "Accepted:          {}", self.accepted)?;
        writeln!(f, "Rate Limited:      {}", self.rate_limited)?;
        writeln!(f, "Content Rejected:  {}", self.content_rejected)?;
        writeln!(f, "Block Rate:        {:.1}%", self.block_rate * 100.0)?;
        writeln!(f, "Median Latency:    {} us", self.median_latency_us)?;
        writeln!(f, "Unique Clients:    {}", self.unique_clients)?;
        writeln!(f, "Max Accepted/Client: {}", self.max_accepted_per_client)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_collection() {
        let mut metrics = AttackMetrics::new();
        metrics.record(ReasonCode::Accepted, "10.0.0.1", Duration::from_micros(100));
        metrics.record(ReasonCode::Accepted, "10.0.0.1", Duration::from_micros(150));
        metrics.record(ReasonCode::RateLimited, "10.0.0.1", Duration::from_micros(50));
        metrics.record(ReasonCode::BotDetected, "10.0.0.2", Duration::from_micros(50));

        let report = metrics.report();
        assert_eq!(report.total, 4);
        assert_eq!(report.accepted, 2);
        assert_eq!(report.rate_limited, 1);
        assert_eq!(report.content_rejected, 1);
        assert_eq!(report.unique_clients, 2);
        assert_eq!(report.max_accepted_per_client, 2);
        assert!((report.block_rate - 0.5).abs() < 0.01);
    }
}
