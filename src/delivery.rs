// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Outbound email delivery.
//!
//! [`DeliveryGateway`] is the seam between the submission policy and the
//! transactional email provider. [`ResendGateway`] talks to a Resend-style
//! HTTP API: `POST` a JSON message with a bearer token, get back `{"id"}` on
//! success or `{"message"}` on failure.

use crate::config::DeliveryConfig;
use crate::email::OutboundEmail;
use crate::models::DeliveryReceipt;
use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Delivery failures. None of these are retried.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Email provider rejected the message ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Email provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Email provider returned an unexpected response: {0}")]
    InvalidResponse(String),
}

/// Sends one email.
#[async_trait]
pub trait DeliveryGateway: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> Result<DeliveryReceipt, DeliveryError>;
}

/// HTTP client for a Resend-compatible email API.
pub struct ResendGateway {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

impl ResendGateway {
    /// Build a gateway from configuration. Returns `None` without an API key.
    pub fn from_config(config: &DeliveryConfig) -> Result<Option<Self>, DeliveryError> {
        let Some(api_key) = config.api_key.clone() else {
            return Ok(None);
        };
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Some(Self {
            client,
            api_url: config.api_url.clone(),
            api_key,
        }))
    }
}

#[async_trait]
impl DeliveryGateway for ResendGateway {
    async fn send(&self, email: &OutboundEmail) -> Result<DeliveryReceipt, DeliveryError> {
        debug!(url = %self.api_url, to = ?email.to, "Sending email");

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(email)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ProviderError>(&body)
                .ok()
                .and_then(|e| e.message.or(e.name))
                .unwrap_or(body);
            warn!(status = status.as_u16(), %message, "Email provider rejected message");
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str::<DeliveryReceipt>(&body)
            .map_err(|e| DeliveryError::InvalidResponse(e.to_string()))
    }
}
