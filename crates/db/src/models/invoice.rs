//! Invoice entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use atelier_core::types::{DbId, Timestamp};

/// A row from the `invoices` table.
///
/// `status` is the canonical tri-state (`draft`/`sent`/`paid`), parsed
/// into `atelier_core::invoice::InvoiceStatus` wherever lifecycle rules
/// apply. The `bill_to_*` and `project_total_cents`/`deposit_percent_used`
/// columns are creation-time snapshots and are never updated.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Invoice {
    pub id: DbId,
    pub invoice_number: Option<String>,
    pub project_id: Option<DbId>,
    pub client_id: DbId,
    pub amount_cents: i64,
    pub status: String,
    pub is_deposit: bool,
    pub project_total_cents: Option<i64>,
    pub deposit_percent_used: Option<i32>,
    pub bill_to_name: Option<String>,
    pub bill_to_email: Option<String>,
    pub bill_to_position: Option<String>,
    pub bill_to_address: Option<String>,
    pub checkout_session_id: Option<String>,
    pub checkout_url: Option<String>,
    pub payment_intent_id: Option<String>,
    pub paid_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// Request body for invoice creation. The amount is derived from the
/// project's price (and deposit percentage when `is_deposit`); the
/// override only applies when the project has no price.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateInvoice {
    pub project_id: DbId,
    #[serde(default)]
    pub is_deposit: bool,
    pub amount_override_cents: Option<i64>,
}

/// All column values for an invoice insert, assembled by the handler after
/// validation and snapshotting.
#[derive(Debug, Clone)]
pub struct NewInvoice {
    pub project_id: DbId,
    pub client_id: DbId,
    pub amount_cents: i64,
    pub is_deposit: bool,
    pub project_total_cents: Option<i64>,
    pub deposit_percent_used: Option<i32>,
    pub bill_to_name: Option<String>,
    pub bill_to_email: Option<String>,
    pub bill_to_position: Option<String>,
    pub bill_to_address: Option<String>,
}

/// List-view projection joining the project name and client business name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InvoiceSummary {
    pub id: DbId,
    pub invoice_number: Option<String>,
    pub amount_cents: i64,
    pub status: String,
    pub is_deposit: bool,
    pub project_id: Option<DbId>,
    pub client_id: DbId,
    pub project_name: Option<String>,
    pub business_name: Option<String>,
    pub created_at: Timestamp,
}
