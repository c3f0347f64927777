/// Credential database operations for identity-service
use async_trait::async_trait;
use resilience::{with_timeout, TimeoutConfig, TimeoutError};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{IdentityError, Result};
use crate::models::{Credential, NewCredential, Role};

#[cfg(test)]
use mockall::automock;

/// Durable record of (identity, email, password hash, role)
///
/// Email uniqueness is enforced here: `create` on an email that already
/// exists fails with `EmailAlreadyUsed` and never overwrites.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn create(&self, credential: NewCredential) -> Result<Credential>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Credential>>;

    /// Compare-and-set role change.
    ///
    /// Returns `false`, writing nothing, when the row already holds `role`;
    /// of two concurrent identical updates exactly one sees `true`.
    async fn update_role(&self, id: Uuid, role: Role) -> Result<bool>;
}

/// PostgreSQL-backed credential store
#[derive(Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
    timeout: TimeoutConfig,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool, timeout: TimeoutConfig) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn create(&self, credential: NewCredential) -> Result<Credential> {
        let result = with_timeout("credentials.create", self.timeout, async {
            sqlx::query_as::<_, Credential>(
                r#"
                INSERT INTO credentials (email, password_hash, role)
                VALUES ($1, $2, $3)
                RETURNING id, email, password_hash, role, created_at, updated_at
                "#,
            )
            .bind(&credential.email)
            .bind(&credential.password_hash)
            .bind(credential.role())
            .fetch_one(&self.pool)
            .await
        })
        .await;

        match result {
            Ok(created) => Ok(created),
            Err(TimeoutError::Inner(sqlx::Error::Database(db_err)))
                if db_err.is_unique_violation() =>
            {
                debug!(email = %credential.email, "Unique violation on credential insert");
                Err(IdentityError::EmailAlreadyUsed)
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Credential>> {
        let credential = with_timeout("credentials.find_by_email", self.timeout, async {
            sqlx::query_as::<_, Credential>(
                r#"
                SELECT id, email, password_hash, role, created_at, updated_at
                FROM credentials
                WHERE email = $1
                "#,
            )
            .bind(email)
            .fetch_optional(&self.pool)
            .await
        })
        .await?;

        Ok(credential)
    }

    async fn update_role(&self, id: Uuid, role: Role) -> Result<bool> {
        // Row lock + re-check of the WHERE clause serializes racing updates
        let result = with_timeout("credentials.update_role", self.timeout, async {
            sqlx::query(
                r#"
                UPDATE credentials
                SET role = $1, updated_at = CURRENT_TIMESTAMP
                WHERE id = $2 AND role <> $1
                "#,
            )
            .bind(role)
            .bind(id)
            .execute(&self.pool)
            .await
        })
        .await?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }

        let exists: bool = with_timeout("credentials.exists", self.timeout, async {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM credentials WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await
        })
        .await?;

        if !exists {
            return Err(IdentityError::Internal(format!(
                "credential {} vanished before role update",
                id
            )));
        }

        debug!(user_id = %id, role = %role, "Role already set, nothing updated");
        Ok(false)
    }
}
