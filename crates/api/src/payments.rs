//! Hosted-checkout payment gateway client.
//!
//! The gateway sits behind the [`PaymentGateway`] trait so handlers and
//! integration tests never talk to the real service directly. The HTTP
//! implementation covers the two interactions the app needs: creating a
//! hosted checkout session and parsing the settlement webhook payload.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use atelier_core::error::CoreError;
use atelier_core::types::DbId;

use crate::config::GatewayConfig;

/// Event type emitted by the gateway when a checkout session settles.
pub const EVENT_CHECKOUT_COMPLETED: &str = "checkout.session.completed";

/// Everything the gateway needs to open a hosted checkout session.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    /// Invoice id, carried through session metadata so the webhook can
    /// find its way back.
    pub invoice_id: DbId,
    pub amount_cents: i64,
    pub currency: String,
    /// Line-item description shown on the checkout page.
    pub description: String,
    pub customer_email: Option<String>,
}

/// A created hosted checkout session.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: String,
}

/// Outbound interface to the payment provider.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Open a hosted checkout session for an invoice.
    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, CoreError>;
}

/// HTTP client for the real gateway API.
pub struct HttpPaymentGateway {
    client: reqwest::Client,
    config: GatewayConfig,
}

impl HttpPaymentGateway {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, CoreError> {
        let body = json!({
            "mode": "payment",
            "success_url": self.config.success_url,
            "cancel_url": self.config.cancel_url,
            "customer_email": request.customer_email,
            "metadata": { "invoice_id": request.invoice_id.to_string() },
            "line_items": [{
                "quantity": 1,
                "price_data": {
                    "currency": request.currency,
                    "unit_amount": request.amount_cents,
                    "product_data": { "name": request.description },
                },
            }],
        });

        let response = self
            .client
            .post(format!("{}/v1/checkout/sessions", self.config.api_base))
            .bearer_auth(&self.config.secret_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| CoreError::Upstream(format!("Gateway request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(CoreError::Upstream(format!(
                "Gateway returned {status}: {detail}"
            )));
        }

        response
            .json::<CheckoutSession>()
            .await
            .map_err(|e| CoreError::Upstream(format!("Invalid gateway response: {e}")))
    }
}

// ---------------------------------------------------------------------------
// Webhook payload
// ---------------------------------------------------------------------------

/// A webhook event envelope, deserialized from the raw (already
/// signature-verified) request body.
///
/// `data` stays untyped here: the gateway delivers many event shapes and
/// only settlement events are acted on, so shape requirements apply after
/// the event-type check, never before.
#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// The checkout session object embedded in a settlement event.
#[derive(Debug, Deserialize)]
pub struct CheckoutSessionObject {
    pub id: Option<String>,
    pub payment_intent: Option<String>,
    #[serde(default)]
    pub metadata: std::collections::HashMap<String, String>,
}

impl WebhookEvent {
    /// Parse an event envelope from the raw webhook body.
    pub fn parse(body: &str) -> Result<Self, CoreError> {
        serde_json::from_str(body)
            .map_err(|e| CoreError::Validation(format!("Malformed webhook payload: {e}")))
    }

    /// Deserialize `data.object` as a checkout session.
    pub fn checkout_session(&self) -> Result<CheckoutSessionObject, CoreError> {
        let object = self
            .data
            .get("object")
            .cloned()
            .unwrap_or(serde_json::Value::Null);
        serde_json::from_value(object)
            .map_err(|e| CoreError::Validation(format!("Malformed checkout session object: {e}")))
    }
}

impl CheckoutSessionObject {
    /// The invoice id carried in the session metadata, if present and
    /// well-formed.
    pub fn invoice_id(&self) -> Option<DbId> {
        self.metadata.get("invoice_id")?.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_settlement_event() {
        let body = r#"{
            "type": "checkout.session.completed",
            "data": { "object": {
                "id": "cs_123",
                "payment_intent": "pi_456",
                "metadata": { "invoice_id": "42" }
            }}
        }"#;
        let event = WebhookEvent::parse(body).unwrap();
        assert_eq!(event.event_type, EVENT_CHECKOUT_COMPLETED);

        let session = event.checkout_session().unwrap();
        assert_eq!(session.id.as_deref(), Some("cs_123"));
        assert_eq!(session.payment_intent.as_deref(), Some("pi_456"));
        assert_eq!(session.invoice_id(), Some(42));
    }

    #[test]
    fn test_missing_metadata_yields_no_invoice_id() {
        let body = r#"{
            "type": "checkout.session.completed",
            "data": { "object": { "id": "cs_123", "payment_intent": null } }
        }"#;
        let session = WebhookEvent::parse(body).unwrap().checkout_session().unwrap();
        assert_eq!(session.invoice_id(), None);
    }

    #[test]
    fn test_foreign_event_shapes_parse_as_envelopes() {
        // Events this service ignores may carry any object shape; the
        // envelope must still parse so the type check can run.
        let body = r#"{
            "type": "payout.updated",
            "data": { "object": { "amount": 1 } }
        }"#;
        let event = WebhookEvent::parse(body).unwrap();
        assert_eq!(event.event_type, "payout.updated");

        let no_data = r#"{ "type": "ping" }"#;
        assert_eq!(WebhookEvent::parse(no_data).unwrap().event_type, "ping");
    }

    #[test]
    fn test_malformed_body_rejected() {
        assert!(WebhookEvent::parse("not json").is_err());
        assert!(WebhookEvent::parse(r#"{"type": 7}"#).is_err());
    }
}
