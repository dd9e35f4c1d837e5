use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{database::PostgresConnection, models::NewProjectModel};

pub type DynProjectRepo = Arc<dyn ProjectRepo + Send + Sync>;

/// Persistence seam for project rows created by the moderation gate.
///
/// Only the gate writes through this trait, and only at submission time.
/// Later edits go through other surfaces and may overwrite the activation
/// fields without re-moderation.
#[async_trait]
pub trait ProjectRepo {
    /// Insert a single project row and return its id.
    async fn insert(&self, project: &NewProjectModel) -> anyhow::Result<Uuid>;
}

#[async_trait]
impl ProjectRepo for PostgresConnection {
    async fn insert(&self, project: &NewProjectModel) -> anyhow::Result<Uuid> {
        sqlx::query(
            r#"
            INSERT INTO projects (
                id, creator_id, title, description, category,
                target_amount, end_date, is_active, esg_e, esg_s, esg_g
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(project.id)
        .bind(project.creator_id)
        .bind(&project.title)
        .bind(&project.description)
        .bind(&project.category)
        .bind(project.target_amount)
        .bind(project.end_date)
        .bind(project.is_active)
        .bind(project.esg_e)
        .bind(project.esg_s)
        .bind(project.esg_g)
        .execute(&**self)
        .await?;

        Ok(project.id)
    }
}
