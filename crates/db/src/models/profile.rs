//! Profile entity model. A profile is both the auth identity and the
//! client/admin record; its id is the principal id carried in tokens.

use serde::Serialize;
use sqlx::FromRow;

use atelier_core::types::{DbId, Timestamp};

/// A row from the `profiles` table.
///
/// Credential columns never leave the server: they are skipped during
/// serialization so a profile can be returned from handlers directly.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Profile {
    pub id: DbId,
    pub role: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    #[serde(skip_serializing)]
    pub invite_token: Option<String>,
    pub name: Option<String>,
    pub business_name: Option<String>,
    pub position: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub avatar_path: Option<String>,
    pub last_seen_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
