// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Builds the notification email for an accepted submission.

use crate::config::DeliveryConfig;
use crate::models::Submission;
use serde::Serialize;

/// A fully addressed message ready for the delivery gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundEmail {
    pub from: String,
    pub to: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cc: Vec<String>,
    pub reply_to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

impl OutboundEmail {
    /// Address a submission using the configured sender and recipients.
    pub fn from_submission(submission: &Submission, config: &DeliveryConfig) -> Self {
        Self {
            from: config.from.clone(),
            to: config.to.clone(),
            cc: config.cc.clone(),
            reply_to: submission.email.clone(),
            subject: format!("{} from {}", config.subject_prefix, submission.name),
            html: html_body(submission),
            text: text_body(submission),
        }
    }
}

pub fn html_body(submission: &Submission) -> String {
    format!(
        "<h2>New contact form submission</h2>\
         <p><strong>Name:</strong> {}</p>\
         <p><strong>Email:</strong> {}</p>\
         <p><strong>Message:</strong></p>\
         <p>{}</p>",
        escape_html(&submission.name),
        escape_html(&submission.email),
        newlines_to_br(&escape_html(&submission.message)),
    )
}

pub fn text_body(submission: &Submission) -> String {
    format!(
        "Name: {}\nEmail: {}\n\nMessage:\n{}",
        submission.name, submission.email, submission.message
    )
}

/// Escape the five HTML-significant characters.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn newlines_to_br(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\n', "<br>")
}
