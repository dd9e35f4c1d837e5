use std::sync::Arc;

use async_trait::async_trait;

use crate::{database::PostgresConnection, models::Administrator};

pub type DynUserRepo = Arc<dyn UserRepo + Send + Sync>;

/// The narrow slice of user persistence the moderation gate needs: who gets
/// the rejection alerts.
#[async_trait]
pub trait UserRepo {
    async fn list_administrators(&self) -> anyhow::Result<Vec<Administrator>>;
}

#[async_trait]
impl UserRepo for PostgresConnection {
    async fn list_administrators(&self) -> anyhow::Result<Vec<Administrator>> {
        let administrators = sqlx::query_as::<_, Administrator>(
            r#"
            SELECT name, email
            FROM users
            WHERE role = 'admin'
            "#,
        )
        .fetch_all(&**self)
        .await?;

        Ok(administrators)
    }
}
