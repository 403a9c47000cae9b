//! Client contact entity model.

use serde::Serialize;
use sqlx::FromRow;

use atelier_core::types::{DbId, Timestamp};

/// A row from the `client_contacts` table. Each client has one primary
/// contact (created by the provisioning endpoint) plus any number of
/// secondary contacts.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ClientContact {
    pub id: DbId,
    pub client_id: DbId,
    pub name: Option<String>,
    pub position: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub is_primary: bool,
    pub created_at: Timestamp,
}
