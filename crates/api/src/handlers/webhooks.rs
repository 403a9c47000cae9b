//! Inbound payment webhook.
//!
//! The only mutation path that can settle an invoice. The raw body is
//! verified against the `Gateway-Signature` header before any parsing;
//! settlement itself is idempotent, so redelivered events are no-ops.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde_json::{json, Value};

use atelier_core::error::CoreError;
use atelier_core::signature::{verify_signature, SIGNATURE_TOLERANCE_SECS};
use atelier_db::repositories::InvoiceRepo;

use crate::error::{AppError, AppResult};
use crate::payments::{WebhookEvent, EVENT_CHECKOUT_COMPLETED};
use crate::state::AppState;

/// Name of the signature header on inbound gateway webhooks.
pub const SIGNATURE_HEADER: &str = "gateway-signature";

/// POST /api/v1/webhooks/payments
pub async fn payments(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> AppResult<Json<Value>> {
    let header = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Core(CoreError::InvalidSignature))?;

    verify_signature(
        &state.config.gateway.webhook_secret,
        header,
        body.as_bytes(),
        chrono::Utc::now().timestamp(),
        SIGNATURE_TOLERANCE_SECS,
    )?;

    let event = WebhookEvent::parse(&body)?;

    // Once the signature checks out, every delivery is acknowledged:
    // a non-2xx would make the gateway redeliver an event this service
    // can never act on.
    if event.event_type != EVENT_CHECKOUT_COMPLETED {
        tracing::debug!(event_type = %event.event_type, "Ignoring webhook event");
        return Ok(received());
    }

    let session = match event.checkout_session() {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!(error = %e, "Unusable settlement payload, acknowledging");
            return Ok(received());
        }
    };

    let Some(invoice_id) = session.invoice_id() else {
        tracing::warn!(
            session_id = ?session.id,
            "Settlement event without invoice_id metadata, acknowledging",
        );
        return Ok(received());
    };

    let settled =
        InvoiceRepo::mark_paid(&state.pool, invoice_id, session.payment_intent.as_deref()).await?;

    if settled {
        tracing::info!(
            invoice_id,
            session_id = ?session.id,
            "Invoice settled via webhook",
        );
    } else {
        tracing::info!(invoice_id, "Webhook redelivery ignored (already paid)");
    }

    Ok(received())
}

fn received() -> Json<Value> {
    Json(json!({ "received": true }))
}
