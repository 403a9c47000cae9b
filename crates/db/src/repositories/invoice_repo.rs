//! Repository for the `invoices` table.
//!
//! Lifecycle rules live in `atelier_core::invoice`; the guarded UPDATE
//! predicates here make the transitions race-safe at the database level.

use sqlx::PgPool;

use atelier_core::types::DbId;

use crate::models::invoice::{Invoice, InvoiceSummary, NewInvoice};

const COLUMNS: &str = "id, invoice_number, project_id, client_id, amount_cents, status, \
     is_deposit, project_total_cents, deposit_percent_used, bill_to_name, bill_to_email, \
     bill_to_position, bill_to_address, checkout_session_id, checkout_url, payment_intent_id, \
     paid_at, created_at";

/// Provides operations for invoices.
pub struct InvoiceRepo;

impl InvoiceRepo {
    /// Insert a draft invoice with its billing snapshot.
    pub async fn create(pool: &PgPool, new: &NewInvoice) -> Result<Invoice, sqlx::Error> {
        let query = format!(
            "INSERT INTO invoices
                (project_id, client_id, amount_cents, status, is_deposit,
                 project_total_cents, deposit_percent_used,
                 bill_to_name, bill_to_email, bill_to_position, bill_to_address)
             VALUES ($1, $2, $3, 'draft', $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Invoice>(&query)
            .bind(new.project_id)
            .bind(new.client_id)
            .bind(new.amount_cents)
            .bind(new.is_deposit)
            .bind(new.project_total_cents)
            .bind(new.deposit_percent_used)
            .bind(&new.bill_to_name)
            .bind(&new.bill_to_email)
            .bind(&new.bill_to_position)
            .bind(&new.bill_to_address)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Invoice>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM invoices WHERE id = $1");
        sqlx::query_as::<_, Invoice>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Admin list view with project and client names joined in.
    pub async fn list(pool: &PgPool) -> Result<Vec<InvoiceSummary>, sqlx::Error> {
        sqlx::query_as::<_, InvoiceSummary>(
            "SELECT i.id, i.invoice_number, i.amount_cents, i.status, i.is_deposit,
                    i.project_id, i.client_id,
                    p.name AS project_name, pr.business_name,
                    i.created_at
             FROM invoices i
             LEFT JOIN projects p ON p.id = i.project_id
             LEFT JOIN profiles pr ON pr.id = i.client_id
             ORDER BY i.created_at DESC",
        )
        .fetch_all(pool)
        .await
    }

    /// Client view: drafts stay invisible until they are sent.
    pub async fn list_for_client(
        pool: &PgPool,
        client_id: DbId,
    ) -> Result<Vec<Invoice>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM invoices
             WHERE client_id = $1 AND status IN ('sent', 'paid')
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Invoice>(&query)
            .bind(client_id)
            .fetch_all(pool)
            .await
    }

    /// Transition draft -> sent, assigning the invoice number on first
    /// send. Returns `None` when the invoice is not in draft.
    pub async fn mark_sent(
        pool: &PgPool,
        id: DbId,
        invoice_number: &str,
    ) -> Result<Option<Invoice>, sqlx::Error> {
        let query = format!(
            "UPDATE invoices SET
                status = 'sent',
                invoice_number = COALESCE(invoice_number, $2)
             WHERE id = $1 AND status = 'draft'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Invoice>(&query)
            .bind(id)
            .bind(invoice_number)
            .fetch_optional(pool)
            .await
    }

    /// Record a hosted checkout session. Creating a session for a draft
    /// also sends it; a paid invoice is never touched.
    pub async fn set_checkout_session(
        pool: &PgPool,
        id: DbId,
        session_id: &str,
        checkout_url: &str,
        invoice_number: &str,
    ) -> Result<Option<Invoice>, sqlx::Error> {
        let query = format!(
            "UPDATE invoices SET
                status = 'sent',
                invoice_number = COALESCE(invoice_number, $4),
                checkout_session_id = $2,
                checkout_url = $3
             WHERE id = $1 AND status <> 'paid'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Invoice>(&query)
            .bind(id)
            .bind(session_id)
            .bind(checkout_url)
            .bind(invoice_number)
            .fetch_optional(pool)
            .await
    }

    /// Settle an invoice from a payment webhook. The guarded predicate
    /// makes retried deliveries no-ops, preserving the original `paid_at`.
    pub async fn mark_paid(
        pool: &PgPool,
        id: DbId,
        payment_intent_id: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE invoices SET
                status = 'paid',
                paid_at = NOW(),
                payment_intent_id = COALESCE($2, payment_intent_id)
             WHERE id = $1 AND status <> 'paid'",
        )
        .bind(id)
        .bind(payment_intent_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn hard_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
