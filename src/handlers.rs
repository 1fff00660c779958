// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the contact relay.
//!
//! The browser form posts JSON to `/api/contact`. Rejections map to 400
//! (429 for the rate limit); relay-side failures map to 500.

use crate::client_id::client_id;
use crate::config::{Config, CorsConfig};
use crate::models::{ReasonCode, Submission, Verdict};
use crate::policy::{Outcome, SubmissionPolicy, SubmitError};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, warn};

/// Shared application state.
pub struct AppState {
    pub policy: Arc<SubmissionPolicy>,
    pub config: Config,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_secs: Option<u64>,
}

/// Successful submission response.
#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub success: bool,
    pub id: String,
    /// Submissions left in the client's current window
    pub remaining: u32,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Build the router with tracing, CORS and panic handling.
pub fn router(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/api/contact", post(contact));

    if state.config.metrics.enabled {
        app = app.route(&state.config.metrics.path, get(metrics));
    }

    let cors = cors_layer(&state.config.cors);

    app.layer(CatchPanicLayer::custom(|_: Box<dyn std::any::Any + Send + 'static>| {
        error!("Handler panicked");
        internal_error("Internal server error")
    }))
    .layer(cors)
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "contact-relay",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Prometheus scrape endpoint.
pub async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    match state.policy.metrics().render() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to render metrics");
            internal_error("Failed to render metrics")
        }
    }
}

/// Accept a contact form submission.
pub async fn contact(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<Submission>, JsonRejection>,
) -> Response {
    let Json(submission) = match payload {
        Ok(json) => json,
        Err(rejection) => {
            debug!(error = %rejection, "Unreadable submission body");
            return (
                rejection.status(),
                Json(ErrorResponse {
                    error: rejection.body_text(),
                    code: "INVALID_REQUEST",
                    retry_after_secs: None,
                }),
            )
                .into_response();
        }
    };

    let client = client_id(&headers);
    debug!(client_id = %client, "Processing contact submission");

    match state.policy.submit(&submission, &client).await {
        Ok(Outcome::Delivered { receipt, remaining }) => (
            StatusCode::OK,
            Json(ContactResponse {
                success: true,
                id: receipt.id,
                remaining,
            }),
        )
            .into_response(),
        Ok(Outcome::Rejected(verdict)) => rejection_response(&verdict, state.policy.now()),
        Err(SubmitError::NotConfigured) => internal_error("Email service not configured"),
        Err(SubmitError::Delivery(e)) => {
            warn!(client_id = %client, error = %e, "Returning delivery failure");
            internal_error(&e.to_string())
        }
    }
}

/// HTTP status for a rejection reason.
pub fn status_for(reason: ReasonCode) -> StatusCode {
    match reason {
        ReasonCode::Accepted => StatusCode::OK,
        ReasonCode::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        ReasonCode::BotDetected
        | ReasonCode::TooFast
        | ReasonCode::MissingFields
        | ReasonCode::InvalidEmail
        | ReasonCode::SpamContent
        | ReasonCode::TooLong
        | ReasonCode::TooManyLinks => StatusCode::BAD_REQUEST,
    }
}

fn rejection_response(verdict: &Verdict, now: DateTime<Utc>) -> Response {
    let status = status_for(verdict.reason);
    let retry_after_secs = match verdict.reason {
        ReasonCode::RateLimited => verdict.retry_after_secs(now),
        _ => None,
    };

    let body = Json(ErrorResponse {
        error: verdict.reason.message().to_string(),
        code: verdict.reason.as_str(),
        retry_after_secs,
    });

    match retry_after_secs {
        Some(secs) => (status, [("Retry-After", secs.to_string())], body).into_response(),
        None => (status, body).into_response(),
    }
}

fn internal_error(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: message.to_string(),
            code: "INTERNAL_ERROR",
            retry_after_secs: None,
        }),
    )
        .into_response()
}
