// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Abuse patterns for security testing.

use chrono::Duration;

/// Attack pattern configuration.
#[derive(Debug, Clone)]
pub struct AttackConfig {
    /// Total number of submissions to send
    pub total_submissions: usize,
    /// Simulated time between submissions
    pub interval: Duration,
    /// Number of distinct client ids
    pub unique_clients: usize,
    /// Fraction of submissions that fill the honeypot (0.0-1.0)
    pub honeypot_ratio: f64,
    /// Fraction submitted faster than a human could type
    pub fast_ratio: f64,
    /// Fraction carrying spam keywords
    pub keyword_ratio: f64,
    /// Fraction stuffed with links
    pub link_ratio: f64,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            total_submissions: 100,
            interval: Duration::seconds(1),
            unique_clients: 1,
            honeypot_ratio: 0.0,
            fast_ratio: 0.0,
            keyword_ratio: 0.0,
            link_ratio: 0.0,
        }
    }
}

/// Predefined attack patterns.
impl AttackConfig {
    /// One client hammering the form with otherwise legitimate messages.
    pub fn single_client_flood() -> Self {
        Self {
            total_submissions: 200,
            interval: Duration::milliseconds(100),
            ..Default::default()
        }
    }

    /// Form-filling bots across many addresses.
    pub fn honeypot_bots() -> Self {
        Self {
            total_submissions: 300,
            unique_clients: 100,
            honeypot_ratio: 1.0,
            ..Default::default()
        }
    }

    /// Scripted posts that skip rendering the form.
    pub fn speed_bot() -> Self {
        Self {
            total_submissions: 60,
            unique_clients: 20,
            fast_ratio: 1.0,
            ..Default::default()
        }
    }

    /// Human-paced keyword spam from a botnet.
    pub fn keyword_spam() -> Self {
        Self {
            total_submissions: 120,
            unique_clients: 40,
            keyword_ratio: 1.0,
            ..Default::default()
        }
    }

    /// Messages stuffed with links.
    pub fn link_farm() -> Self {
        Self {
            total_submissions: 50,
            unique_clients: 50,
            link_ratio: 1.0,
            ..Default::default()
        }
    }

    /// One message every 20 minutes, never more than the hourly quota.
    pub fn slow_drip() -> Self {
        Self {
            total_submissions: 12,
            interval: Duration::minutes(20),
            ..Default::default()
        }
    }

    /// Mixed traffic from many clients.
    pub fn mixed_botnet() -> Self {
        Self {
            total_submissions: 400,
            unique_clients: 200,
            honeypot_ratio: 0.25,
            fast_ratio: 0.25,
            keyword_ratio: 0.25,
            link_ratio: 0.1,
            ..Default::default()
        }
    }

    /// Simulated span covered by the attack.
    pub fn simulated_duration(&self) -> Duration {
        self.interval * self.total_submissions as i32
    }
}
