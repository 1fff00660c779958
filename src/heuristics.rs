// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Spam heuristics for contact form submissions.
//!
//! Every check is a pure function of the submission and the configured
//! thresholds. [`SpamHeuristics::check`] runs them in priority order:
//! - Honeypot field
//! - Minimum fill time
//! - Required fields
//! - Email shape
//! - Keyword filter
//! - Message length
//! - Link count

use crate::config::SpamConfig;
use crate::models::{ReasonCode, Submission};
use tracing::debug;

/// Outcome of a single heuristic.
pub type CheckResult = Result<(), ReasonCode>;

/// Stateless spam checks over one submission.
#[derive(Debug, Clone)]
pub struct SpamHeuristics {
    min_form_time_ms: i64,
    max_message_length: usize,
    max_links: usize,
    /// Lowercased, non-empty keywords
    keywords: Vec<String>,
}

impl SpamHeuristics {
    /// Create heuristics from configuration.
    pub fn new(config: SpamConfig) -> Self {
        let keywords = config
            .keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();

        Self {
            min_form_time_ms: config.min_form_time_ms,
            max_message_length: config.max_message_length,
            max_links: config.max_links,
            keywords,
        }
    }

    /// A filled-in honeypot means a bot populated every field it found.
    pub fn check_honeypot(&self, submission: &Submission) -> CheckResult {
        if submission.website.trim().is_empty() {
            Ok(())
        } else {
            debug!("Honeypot field populated");
            Err(ReasonCode::BotDetected)
        }
    }

    /// Humans need a few seconds to fill in a form. Missing timing passes.
    pub fn check_timing(&self, submission: &Submission) -> CheckResult {
        match submission.time_since_load {
            Some(elapsed) if elapsed < self.min_form_time_ms => {
                debug!(elapsed_ms = elapsed, min_ms = self.min_form_time_ms, "Form submitted too fast");
                Err(ReasonCode::TooFast)
            }
            _ => Ok(()),
        }
    }

    pub fn check_required_fields(&self, submission: &Submission) -> CheckResult {
        let missing = [&submission.name, &submission.email, &submission.message]
            .iter()
            .any(|field| field.trim().is_empty());
        if missing {
            Err(ReasonCode::MissingFields)
        } else {
            Ok(())
        }
    }

    pub fn check_email(&self, submission: &Submission) -> CheckResult {
        if is_plausible_email(&submission.email) {
            Ok(())
        } else {
            debug!(email = %submission.email, "Email failed shape check");
            Err(ReasonCode::InvalidEmail)
        }
    }

    /// Reject when name, email or message contains a configured keyword.
    pub fn check_keywords(&self, submission: &Submission) -> CheckResult {
        let haystack = format!(
            "{} {} {}",
            submission.name, submission.email, submission.message
        )
        .to_lowercase();

        match self.keywords.iter().find(|k| haystack.contains(k.as_str())) {
            Some(keyword) => {
                debug!(%keyword, "Spam keyword matched");
                Err(ReasonCode::SpamContent)
            }
            None => Ok(()),
        }
    }

    /// Length is measured in characters, not bytes.
    pub fn check_length(&self, submission: &Submission) -> CheckResult {
        if submission.message.chars().count() > self.max_message_length {
            Err(ReasonCode::TooLong)
        } else {
            Ok(())
        }
    }

    pub fn check_links(&self, submission: &Submission) -> CheckResult {
        let links = count_links(&submission.message);
        if links > self.max_links {
            debug!(links, max = self.max_links, "Too many links");
            Err(ReasonCode::TooManyLinks)
        } else {
            Ok(())
        }
    }

    /// Run every heuristic in priority order, stopping at the first failure.
    pub fn check(&self, submission: &Submission) -> CheckResult {
        self.check_honeypot(submission)?;
        self.check_timing(submission)?;
        self.check_required_fields(submission)?;
        self.check_email(submission)?;
        self.check_keywords(submission)?;
        self.check_length(submission)?;
        self.check_links(submission)
    }
}

/// Permissive `local@domain.tld` shape check, not RFC 5322.
///
/// Exactly one `@`, no whitespace, non-empty local part, and a `.` in the
/// domain with text on both sides.
pub fn is_plausible_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Count `http://` and `https://` occurrences, ignoring case.
pub fn count_links(message: &str) -> usize {
    let lower = message.to_lowercase();
    lower.matches("http://").count() + lower.matches("https://").count()
}
