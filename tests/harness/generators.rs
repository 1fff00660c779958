// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Test data generators for abuse simulation.

use contact_relay::Submission;
use std::net::{IpAddr, Ipv4Addr};

/// Generate a pool of client ids (IPv4 strings in 10.0.0.0/8).
pub fn generate_clients(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let a = ((i >> 16) & 0xFF) as u8;
            let b = ((i >> 8) & 0xFF) as u8;
            let c = (i & 0xFF) as u8;
            IpAddr::V4(Ipv4Addr::new(10, a, b, c)).to_string()
        })
        .collect()
}

/// A submission a human would plausibly send.
pub fn legit_submission(i: usize) -> Submission {
    Submission {
        name: format!("Visitor {}", i),
        email: format!("visitor{}@example.com", i),
        message: format!("Hi, I'm interested in project #{}. Could you send details?", i),
        website: String::new(),
        time_since_load: Some(8_000 + (i as i64 % 50) * 1_000),
    }
}

pub fn honeypot_submission(i: usize) -> Submission {
    Submission {
        website: format!("https://bot-{}.example.net", i),
        ..legit_submission(i)
    }
}

pub fn fast_submission(i: usize) -> Submission {
    Submission {
        time_since_load: Some((i as i64 * 37) % 3_000),
        ..legit_submission(i)
    }
}

pub fn keyword_submission(i: usize) -> Submission {
    const PITCHES: &[&str] = &[
        "Cheap VIAGRA and Cialis shipped overnight",
        "Win big at our online CASINO today",
        "Guaranteed crypto investment returns of 300%",
        "We offer SEO services to get you on the first page of Google",
        "Quality backlinks for your site",
    ];
    Submission {
        message: PITCHES[i % PITCHES.len()].to_string(),
        ..legit_submission(i)
    }
}

pub fn link_submission(i: usize) -> Submission {
    let links: Vec<String> = (0..8)
        .map(|n| format!("https://farm-{}.example.org/p/{}", i, n))
        .collect();
    Submission {
        message: format!("Check these out: {}", links.join(" ")),
        ..legit_submission(i)
    }
}

/// Email addresses that pass the shape check.
pub fn valid_emails() -> Vec<&'static str> {
    vec![
        "jane@example.com",
        "a@b.c",
        "first.last+tag@sub.example.co.uk",
        "UPPER@EXAMPLE.ORG",
        "weird!#$%@example.io",
    ]
}

/// Email addresses that fail the shape check.
pub fn invalid_emails() -> Vec<&'static str> {
    vec![
        "plainaddress",
        "@example.com",
        "jane@",
        "jane@example",
        "jane@.com",
        "jane@example.",
        "jane doe@example.com",
        "jane@exam ple.com",
        "jane@@example.com",
        "jane@example@com.org",
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_clients() {
        let clients = generate_clients(300);
        assert_eq!(clients.len(), 300);
        let unique: std::collections::HashSet<_> = clients.iter().collect();
        assert_eq!(unique.len(), 300);
    }

    #[test]
    fn test_fast_submissions_under_threshold() {
        for i in 0..200 {
            let t = fast_submission(i).time_since_load.unwrap();
            assert!((0..3_000).contains(&t));
        }
    }
}
