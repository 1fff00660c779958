// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact Relay
//!
//! This crate filters contact form submissions and forwards the accepted
//! ones to a transactional email provider:
//!
//! - Per-client fixed-window rate limiting (3 per hour default)
//! - Honeypot field detection
//! - Minimum fill-time check
//! - Required field and email shape validation
//! - Keyword, length and link-count spam heuristics
//! - Delivery through a Resend-compatible HTTP API

pub mod client_id;
pub mod clock;
pub mod config;
pub mod delivery;
pub mod email;
pub mod handlers;
pub mod heuristics;
pub mod limiter;
pub mod metrics;
pub mod models;
pub mod policy;

pub use config::Config;
pub use delivery::{DeliveryError, DeliveryGateway, ResendGateway};
pub use heuristics::SpamHeuristics;
pub use limiter::{FixedWindowLimiter, RateLimitResult, RateLimitStore};
pub use models::{ReasonCode, Submission, Verdict};
pub use policy::{Outcome, SubmissionPolicy, SubmitError};
