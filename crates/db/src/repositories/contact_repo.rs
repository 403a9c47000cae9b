//! Repository for the `client_contacts` table.

use sqlx::PgPool;

use atelier_core::types::DbId;

use crate::models::contact::ClientContact;

const COLUMNS: &str = "id, client_id, name, position, email, phone, is_primary, created_at";

/// Provides operations for client contact rows.
pub struct ContactRepo;

impl ContactRepo {
    /// Insert a contact for a client.
    pub async fn create(
        pool: &PgPool,
        client_id: DbId,
        name: Option<&str>,
        position: Option<&str>,
        email: Option<&str>,
        phone: Option<&str>,
        is_primary: bool,
    ) -> Result<ClientContact, sqlx::Error> {
        let query = format!(
            "INSERT INTO client_contacts (client_id, name, position, email, phone, is_primary)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ClientContact>(&query)
            .bind(client_id)
            .bind(name)
            .bind(position)
            .bind(email)
            .bind(phone)
            .bind(is_primary)
            .fetch_one(pool)
            .await
    }

    /// List a client's contacts, primary first.
    pub async fn list_for_client(
        pool: &PgPool,
        client_id: DbId,
    ) -> Result<Vec<ClientContact>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM client_contacts
             WHERE client_id = $1
             ORDER BY is_primary DESC, created_at"
        );
        sqlx::query_as::<_, ClientContact>(&query)
            .bind(client_id)
            .fetch_all(pool)
            .await
    }
}
