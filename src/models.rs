// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Submission and verdict types shared by the policy and the HTTP layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A contact form submission as posted by the browser.
///
/// Missing or `null` string fields deserialize as empty so that the
/// required-field check, not the JSON extractor, decides what to do with them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub message: String,
    /// Honeypot field, hidden from humans
    #[serde(default, deserialize_with = "null_as_empty")]
    pub website: String,
    /// Milliseconds between form render and submit, measured client-side
    #[serde(default)]
    pub time_since_load: Option<i64>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Why a submission was accepted or rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReasonCode {
    Accepted,
    RateLimited,
    BotDetected,
    TooFast,
    MissingFields,
    InvalidEmail,
    SpamContent,
    TooLong,
    TooManyLinks,
}

impl ReasonCode {
    /// All rejection reasons, in evaluation order.
    pub const REJECTIONS: [ReasonCode; 8] = [
        ReasonCode::RateLimited,
        ReasonCode::BotDetected,
        ReasonCode::TooFast,
        ReasonCode::MissingFields,
        ReasonCode::InvalidEmail,
        ReasonCode::SpamContent,
        ReasonCode::TooLong,
        ReasonCode::TooManyLinks,
    ];

    /// Stable machine-readable code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accepted => "ACCEPTED",
            Self::RateLimited => "RATE_LIMITED",
            Self::BotDetected => "BOT_DETECTED",
            Self::TooFast => "TOO_FAST",
            Self::MissingFields => "MISSING_FIELDS",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::SpamContent => "SPAM_CONTENT",
            Self::TooLong => "TOO_LONG",
            Self::TooManyLinks => "TOO_MANY_LINKS",
        }
    }

    /// Message shown to the person filling in the form.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Accepted => "Message sent",
            Self::RateLimited => "Too many submissions. Please try again later.",
            Self::BotDetected => "Submission rejected",
            Self::TooFast => "Form submitted too quickly. Please try again.",
            Self::MissingFields => "Name, email, and message are required",
            Self::InvalidEmail => "Please provide a valid email address",
            Self::SpamContent => "Your message was flagged as spam",
            Self::TooLong => "Message is too long",
            Self::TooManyLinks => "Message contains too many links",
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The accept/reject decision for one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub allowed: bool,
    pub reason: ReasonCode,
    /// Quota left after this submission, when the rate limiter was consulted
    pub remaining: Option<u32>,
    /// End of the client's current rate limit window
    pub reset_at: Option<DateTime<Utc>>,
}

impl Verdict {
    pub fn accept(remaining: u32, reset_at: DateTime<Utc>) -> Self {
        Self {
            allowed: true,
            reason: ReasonCode::Accepted,
            remaining: Some(remaining),
            reset_at: Some(reset_at),
        }
    }

    pub fn reject(reason: ReasonCode, remaining: u32, reset_at: DateTime<Utc>) -> Self {
        Self {
            allowed: false,
            reason,
            remaining: Some(remaining),
            reset_at: Some(reset_at),
        }
    }

    /// Whole seconds until the rate limit window resets, rounded up.
    pub fn retry_after_secs(&self, now: DateTime<Utc>) -> Option<u64> {
        self.reset_at.map(|reset_at| {
            let millis = (reset_at - now).num_milliseconds().max(0) as u64;
            millis.div_ceil(1000)
        })
    }
}

/// Identifier the email provider assigned to a sent message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    pub id: String,
}
