//! Handlers for the `/invoices` resource.
//!
//! Creation snapshots the billing context, sending assigns the invoice
//! number, and checkout opens a hosted session at the gateway. Settlement
//! happens exclusively through the payments webhook.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use atelier_core::error::CoreError;
use atelier_core::invoice::{
    deposit_amount_cents, invoice_number, validate_new_invoice, InvoiceStatus,
};
use atelier_core::types::DbId;
use atelier_db::models::invoice::{CreateInvoice, Invoice, InvoiceSummary, NewInvoice};
use atelier_db::repositories::{InvoiceRepo, ProfileRepo, ProjectRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAdmin, RequireClient};
use crate::payments::CheckoutRequest;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/invoices
///
/// The amount is derived from the project: the full price, or the deposit
/// percentage of it when `is_deposit`. A project without a price accepts
/// an explicit override instead. Billing fields are snapshotted from the
/// client's profile at this moment and never updated afterwards.
pub async fn create(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateInvoice>,
) -> AppResult<(StatusCode, Json<DataResponse<Invoice>>)> {
    let project = ProjectRepo::find_by_id(&state.pool, input.project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: input.project_id,
        }))?;

    let amount_cents = match project.price_cents {
        Some(price) if input.is_deposit => deposit_amount_cents(price, project.deposit_percent),
        Some(price) => price,
        None => input.amount_override_cents.ok_or_else(|| {
            AppError::Core(CoreError::Validation(
                "Project has no price; amount_override_cents is required".into(),
            ))
        })?,
    };

    validate_new_invoice(amount_cents, Some(project.id), project.client_id)?;
    let client_id = project.client_id.ok_or_else(|| {
        AppError::Core(CoreError::Validation(
            "The selected project has no client attached".into(),
        ))
    })?;

    let client = ProfileRepo::find_by_id(&state.pool, client_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Client",
            id: client_id,
        }))?;

    let invoice = InvoiceRepo::create(
        &state.pool,
        &NewInvoice {
            project_id: project.id,
            client_id,
            amount_cents,
            is_deposit: input.is_deposit,
            project_total_cents: project.price_cents,
            deposit_percent_used: input.is_deposit.then_some(project.deposit_percent),
            bill_to_name: client.name.clone(),
            bill_to_email: Some(client.email.clone()),
            bill_to_position: client.position.clone(),
            bill_to_address: client.address.clone(),
        },
    )
    .await?;

    tracing::info!(
        invoice_id = invoice.id,
        project_id = project.id,
        amount_cents,
        is_deposit = input.is_deposit,
        "Invoice created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: invoice })))
}

/// GET /api/v1/invoices
pub async fn list(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<InvoiceSummary>>>> {
    let invoices = InvoiceRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: invoices }))
}

/// GET /api/v1/invoices/mine
///
/// A client's own invoices; drafts are invisible by construction.
pub async fn list_mine(
    RequireClient(user): RequireClient,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Invoice>>>> {
    let invoices = InvoiceRepo::list_for_client(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: invoices }))
}

/// GET /api/v1/invoices/{id}
pub async fn get_by_id(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Invoice>>> {
    let invoice = load_visible(&state, &user, id).await?;
    Ok(Json(DataResponse { data: invoice }))
}

/// POST /api/v1/invoices/{id}/send
pub async fn send(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Invoice>>> {
    let invoice = InvoiceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(not_found(id))?;

    let status = InvoiceStatus::parse(&invoice.status)?;
    if status == InvoiceStatus::Paid {
        return Err(AppError::Core(CoreError::AlreadyPaid));
    }
    if !status.can_transition(InvoiceStatus::Sent) {
        return Err(AppError::Core(CoreError::InvalidState(format!(
            "Cannot send an invoice in status '{}'",
            invoice.status
        ))));
    }

    let sent = InvoiceRepo::mark_sent(&state.pool, id, &invoice_number(id))
        .await?
        .ok_or(AppError::Core(CoreError::InvalidState(
            "Invoice left draft concurrently".into(),
        )))?;

    tracing::info!(invoice_id = id, number = ?sent.invoice_number, "Invoice sent");
    Ok(Json(DataResponse { data: sent }))
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub checkout_url: String,
}

/// POST /api/v1/invoices/{id}/checkout
///
/// Opens a hosted checkout session at the gateway and records it. Doing
/// this on a draft also sends the invoice.
pub async fn checkout(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CheckoutResponse>>> {
    let invoice = load_visible(&state, &user, id).await?;

    if InvoiceStatus::parse(&invoice.status)?.is_terminal() {
        return Err(AppError::Core(CoreError::AlreadyPaid));
    }

    let number = invoice
        .invoice_number
        .clone()
        .unwrap_or_else(|| invoice_number(invoice.id));

    let session = state
        .gateway
        .create_checkout_session(&CheckoutRequest {
            invoice_id: invoice.id,
            amount_cents: invoice.amount_cents,
            currency: state.config.gateway.currency.clone(),
            description: if invoice.is_deposit {
                format!("{number} (deposit)")
            } else {
                number.clone()
            },
            customer_email: invoice.bill_to_email.clone(),
        })
        .await?;

    let updated = InvoiceRepo::set_checkout_session(
        &state.pool,
        invoice.id,
        &session.id,
        &session.url,
        &number,
    )
    .await?
    .ok_or(AppError::Core(CoreError::AlreadyPaid))?;

    tracing::info!(
        invoice_id = invoice.id,
        session_id = %session.id,
        "Checkout session created",
    );

    Ok(Json(DataResponse {
        data: CheckoutResponse {
            checkout_url: updated.checkout_url.unwrap_or(session.url),
        },
    }))
}

/// DELETE /api/v1/invoices/{id}
///
/// Paid invoices are immutable financial records and cannot be deleted.
pub async fn delete(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let invoice = InvoiceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(not_found(id))?;

    if InvoiceStatus::parse(&invoice.status)?.is_terminal() {
        return Err(AppError::Core(CoreError::InvalidState(
            "Paid invoices cannot be deleted".into(),
        )));
    }

    InvoiceRepo::hard_delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Load an invoice applying visibility rules: admins see everything,
/// clients only their own non-draft invoices (drafts and other clients'
/// invoices 404 rather than 403, to avoid confirming their existence).
async fn load_visible(state: &AppState, user: &AuthUser, id: DbId) -> AppResult<Invoice> {
    let invoice = InvoiceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(not_found(id))?;

    if user.is_admin() {
        return Ok(invoice);
    }
    if invoice.client_id != user.user_id || invoice.status == "draft" {
        return Err(not_found(id));
    }
    Ok(invoice)
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Invoice",
        id,
    })
}
