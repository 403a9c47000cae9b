use crate::types::DbId;

/// Domain-level error taxonomy shared by every crate in the workspace.
///
/// The HTTP mapping lives in `atelier-api`; core code only states what
/// went wrong, never how it is rendered.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// The operation is not legal in the entity's current lifecycle state,
    /// e.g. sending an invoice that is already paid.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Specific case of [`CoreError::InvalidState`], called out separately
    /// because it must never trigger a second charge.
    #[error("Invoice is already paid")]
    AlreadyPaid,

    /// Webhook authenticity check failed. No state may be mutated after
    /// this error is raised.
    #[error("Invalid webhook signature")]
    InvalidSignature,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// An upstream service (payment gateway, blob store) call failed.
    /// The original detail is passed through for diagnosis.
    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
