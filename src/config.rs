// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the contact relay.
//!
//! Every section has serde defaults so a partial config file (or none at
//! all) yields a working service. [`Config::from_env`] overlays environment
//! variables on top of those defaults.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration for the contact relay service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Per-client submission quota
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Spam heuristic thresholds and keyword list
    #[serde(default)]
    pub spam: SpamConfig,

    /// Outbound email provider settings
    #[serde(default)]
    pub delivery: DeliveryConfig,

    /// Metrics configuration
    #[serde(default)]
    pub metrics: MetricsConfig,

    /// Cross-origin settings for the browser form
    #[serde(default)]
    pub cors: CorsConfig,
}

/// Fixed-window rate limiting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum accepted submissions per client per window (default: 3)
    #[serde(default = "default_max_submissions")]
    pub max_submissions: u32,

    /// Window length in seconds (default: 3600)
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// How often expired entries are swept, in seconds (default: 300)
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

/// Spam heuristic configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpamConfig {
    /// Minimum time between form load and submit in milliseconds (default: 3000)
    #[serde(default = "default_min_form_time_ms")]
    pub min_form_time_ms: i64,

    /// Maximum message length in characters (default: 5000)
    #[serde(default = "default_max_message_length")]
    pub max_message_length: usize,

    /// Maximum number of http(s) links in a message (default: 5)
    #[serde(default = "default_max_links")]
    pub max_links: usize,

    /// Case-insensitive substrings that mark a submission as spam
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,
}

/// Outbound email configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryConfig {
    /// Provider API key. Without it the relay answers 500 to every submission.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Provider send endpoint
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Sender display address
    #[serde(default = "default_from")]
    pub from: String,

    /// Recipients
    #[serde(default)]
    pub to: Vec<String>,

    /// Carbon-copy recipients
    #[serde(default)]
    pub cc: Vec<String>,

    /// Subject line prefix; the submitter name is appended
    #[serde(default = "default_subject_prefix")]
    pub subject_prefix: String,

    /// Provider request timeout in seconds (default: 10)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus metrics endpoint (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Metrics endpoint path (default: /metrics)
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

/// CORS configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Allowed origins; empty allows any origin
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Configuration rejected at startup.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("rate_limit.max_submissions must be at least 1")]
    ZeroLimit,

    #[error("rate_limit.window_secs must be at least 1")]
    ZeroWindow,

    #[error("rate_limit.window_secs must be at most {max} (got {got})")]
    WindowTooLarge { got: u64, max: u64 },

    #[error("rate_limit.sweep_interval_secs must be at least 1")]
    ZeroSweepInterval,
}

/// Longest accepted rate limit window: one year.
pub const MAX_WINDOW_SECS: u64 = 365 * 24 * 60 * 60;

// Default value functions
fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_max_submissions() -> u32 {
    3
}

fn default_window_secs() -> u64 {
    3600
}

fn default_sweep_interval_secs() -> u64 {
    300
}

fn default_min_form_time_ms() -> i64 {
    3000
}

fn default_max_message_length() -> usize {
    5000
}

fn default_max_links() -> usize {
    5
}

fn default_keywords() -> Vec<String> {
    DEFAULT_SPAM_KEYWORDS.iter().map(|k| k.to_string()).collect()
}

fn default_api_url() -> String {
    "https://api.resend.com/emails".to_string()
}

fn default_from() -> String {
    "Contact Form <onboarding@resend.dev>".to_string()
}

fn default_subject_prefix() -> String {
    "New contact form submission".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

/// Built-in spam vocabulary: pharma, gambling, financial scams, SEO spam.
pub const DEFAULT_SPAM_KEYWORDS: &[&str] = &[
    // pharma
    "viagra",
    "cialis",
    "levitra",
    "pharmacy",
    "diet pills",
    "weight loss pills",
    // gambling
    "casino",
    "poker",
    "online betting",
    "slot machine",
    "sports betting",
    // financial scams
    "crypto investment",
    "bitcoin investment",
    "forex trading",
    "make money fast",
    "wire transfer",
    "lottery winner",
    "inheritance fund",
    // seo spam
    "seo services",
    "backlinks",
    "link building",
    "guest post",
    "first page of google",
    "increase your traffic",
];

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            rate_limit: RateLimitConfig::default(),
            spam: SpamConfig::default(),
            delivery: DeliveryConfig::default(),
            metrics: MetricsConfig::default(),
            cors: CorsConfig::default(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_submissions: default_max_submissions(),
            window_secs: default_window_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

impl Default for SpamConfig {
    fn default() -> Self {
        Self {
            min_form_time_ms: default_min_form_time_ms(),
            max_message_length: default_max_message_length(),
            max_links: default_max_links(),
            keywords: default_keywords(),
        }
    }
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_api_url(),
            from: default_from(),
            to: Vec::new(),
            cc: Vec::new(),
            subject_prefix: default_subject_prefix(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            path: default_metrics_path(),
        }
    }
}

impl RateLimitConfig {
    /// Get the rate window duration
    pub fn window_duration(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    /// Get the sweep interval
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

impl DeliveryConfig {
    /// Get the provider request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Build a configuration from environment variables over the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    ///
    /// Unparsable numeric values keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(addr) = lookup("BIND_ADDR") {
            config.bind_addr = addr;
        }

        let rl = &mut config.rate_limit;
        override_parsed(&lookup, "RATE_LIMIT_MAX", &mut rl.max_submissions);
        override_parsed(&lookup, "RATE_LIMIT_WINDOW_SECS", &mut rl.window_secs);
        override_parsed(&lookup, "RATE_LIMIT_SWEEP_SECS", &mut rl.sweep_interval_secs);

        let spam = &mut config.spam;
        override_parsed(&lookup, "MIN_FORM_TIME_MS", &mut spam.min_form_time_ms);
        override_parsed(&lookup, "MAX_MESSAGE_LENGTH", &mut spam.max_message_length);
        override_parsed(&lookup, "MAX_LINKS", &mut spam.max_links);
        if let Some(keywords) = lookup("SPAM_KEYWORDS") {
            spam.keywords = split_list(&keywords);
        }

        let delivery = &mut config.delivery;
        delivery.api_key = lookup("RESEND_API_KEY").filter(|k| !k.trim().is_empty());
        if let Some(url) = lookup("RESEND_API_URL") {
            delivery.api_url = url;
        }
        if let Some(from) = lookup("CONTACT_FROM") {
            delivery.from = from;
        }
        if let Some(to) = lookup("CONTACT_TO") {
            delivery.to = split_list(&to);
        }
        if let Some(cc) = lookup("CONTACT_CC") {
            delivery.cc = split_list(&cc);
        }
        override_parsed(&lookup, "DELIVERY_TIMEOUT_SECS", &mut delivery.timeout_secs);

        if let Some(origins) = lookup("CORS_ALLOWED_ORIGINS") {
            config.cors.allowed_origins = split_list(&origins);
        }

        config
    }

    /// Reject configurations that would make the limiter meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rate_limit.max_submissions == 0 {
            return Err(ConfigError::ZeroLimit);
        }
        if self.rate_limit.window_secs == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        if self.rate_limit.window_secs > MAX_WINDOW_SECS {
            return Err(ConfigError::WindowTooLarge {
                got: self.rate_limit.window_secs,
                max: MAX_WINDOW_SECS,
            });
        }
        if self.rate_limit.sweep_interval_secs == 0 {
            return Err(ConfigError::ZeroSweepInterval);
        }
        Ok(())
    }
}

fn override_parsed<F, T>(lookup: &F, key: &str, slot: &mut T)
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    if let Some(value) = lookup(key).and_then(|v| v.trim().parse().ok()) {
        *slot = value;
    }
}

/// Split a comma-separated list, dropping empty items.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}
