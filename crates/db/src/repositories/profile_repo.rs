//! Repository for the `profiles` table.

use sqlx::PgPool;

use atelier_core::types::DbId;

use crate::models::profile::Profile;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, role, email, password_hash, invite_token, name, business_name, \
     position, phone, address, avatar_path, last_seen_at, created_at, updated_at";

/// Provides CRUD operations for profiles (auth identities).
pub struct ProfileRepo;

impl ProfileRepo {
    /// Insert a new identity row. Exactly one of `password_hash` (active
    /// account) or `invite_token` (pending invitation) should be set.
    pub async fn create_identity(
        pool: &PgPool,
        email: &str,
        role: &str,
        password_hash: Option<&str>,
        invite_token: Option<&str>,
    ) -> Result<Profile, sqlx::Error> {
        let query = format!(
            "INSERT INTO profiles (email, role, password_hash, invite_token)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(email)
            .bind(role)
            .bind(password_hash)
            .bind(invite_token)
            .fetch_one(pool)
            .await
    }

    /// Write the client-facing profile fields onto an existing identity.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn apply_client_fields(
        pool: &PgPool,
        id: DbId,
        name: Option<&str>,
        business_name: Option<&str>,
        position: Option<&str>,
        phone: Option<&str>,
        address: Option<&str>,
    ) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!(
            "UPDATE profiles SET
                name = $2,
                business_name = $3,
                position = $4,
                phone = $5,
                address = $6,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .bind(name)
            .bind(business_name)
            .bind(position)
            .bind(phone)
            .bind(address)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE id = $1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE email = $1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// List all client profiles, most recently created first.
    pub async fn list_clients(pool: &PgPool) -> Result<Vec<Profile>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM profiles WHERE role = 'client' ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Profile>(&query).fetch_all(pool).await
    }

    /// Redeem an invitation: set the password and clear the single-use
    /// token. Returns `None` when the token does not match a pending
    /// invitation.
    pub async fn activate(
        pool: &PgPool,
        invite_token: &str,
        password_hash: &str,
    ) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!(
            "UPDATE profiles SET
                password_hash = $2,
                invite_token = NULL,
                updated_at = NOW()
             WHERE invite_token = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(invite_token)
            .bind(password_hash)
            .fetch_optional(pool)
            .await
    }

    /// Record the moment a client last opened their dashboard; the next
    /// "what's new" window starts here.
    pub async fn touch_last_seen(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE profiles SET last_seen_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
