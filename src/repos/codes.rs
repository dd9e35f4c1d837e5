use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    database::PostgresConnection,
    models::{NewVerificationCodeModel, VerificationCodeModel},
};

pub type DynCodeRepo = Arc<dyn CodeRepo + Send + Sync>;

/// Persistence seam for one-time codes.
///
/// Rows are never deleted. Expiry is expressed in the queries by comparing
/// `expires_at` against the caller's clock, so implementations must tolerate
/// any number of stale rows per address.
#[async_trait]
pub trait CodeRepo {
    /// Append a new code row, leaving older rows for the same address in
    /// place.
    async fn insert(&self, code: &NewVerificationCodeModel) -> anyhow::Result<()>;

    /// The most recently created row for `email` that is still valid at
    /// `now`, if any.
    async fn latest_unexpired(
        &self,
        email: &str,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Option<VerificationCodeModel>>;

    /// A row matching the exact address and code that is still valid at
    /// `now`, if any.
    async fn find_matching(
        &self,
        email: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Option<VerificationCodeModel>>;
}

#[async_trait]
impl CodeRepo for PostgresConnection {
    async fn insert(&self, code: &NewVerificationCodeModel) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO verification_codes (email, code, created_at, expires_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&code.email)
        .bind(&code.code)
        .bind(code.created_at)
        .bind(code.expires_at)
        .execute(&**self)
        .await?;

        Ok(())
    }

    async fn latest_unexpired(
        &self,
        email: &str,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Option<VerificationCodeModel>> {
        let row = sqlx::query_as::<_, VerificationCodeModel>(
            r#"
            SELECT id, email, code, created_at, expires_at
            FROM verification_codes
            WHERE email = $1 AND expires_at > $2
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(email)
        .bind(now)
        .fetch_optional(&**self)
        .await?;

        Ok(row)
    }

    async fn find_matching(
        &self,
        email: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Option<VerificationCodeModel>> {
        let row = sqlx::query_as::<_, VerificationCodeModel>(
            r#"
            SELECT id, email, code, created_at, expires_at
            FROM verification_codes
            WHERE email = $1 AND code = $2 AND expires_at > $3
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(email)
        .bind(code)
        .bind(now)
        .fetch_optional(&**self)
        .await?;

        Ok(row)
    }
}
