use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    identities::domain::codes::NewVerificationCode,
    moderation::domain::ModerationResult,
    projects::ProjectDraft,
};

/// A persisted one-time code row.
///
/// Rows are append-only. Expiry is logical, so stale rows for the same email
/// accumulate and queries have to filter on `expires_at` instead of relying
/// on cleanup.
#[derive(Clone, Debug, FromRow)]
pub struct VerificationCodeModel {
    pub id: i32,
    pub email: String,
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct NewVerificationCodeModel {
    pub email: String,
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl From<&NewVerificationCode> for NewVerificationCodeModel {
    fn from(code: &NewVerificationCode) -> Self {
        Self {
            email: code.email().address().to_owned(),
            code: code.code().to_owned(),
            created_at: code.created_at(),
            expires_at: code.expires_at(),
        }
    }
}

/// A project row to be inserted once the moderation gate has decided its
/// activation state.
#[derive(Clone, Debug)]
pub struct NewProjectModel {
    pub id: Uuid,
    pub creator_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub target_amount: f64,
    pub end_date: DateTime<Utc>,
    pub is_active: bool,
    pub esg_e: i16,
    pub esg_s: i16,
    pub esg_g: i16,
}

impl NewProjectModel {
    /// A published project: listed immediately, carrying the scores the
    /// moderation service assigned.
    pub fn published(draft: &ProjectDraft, result: &ModerationResult) -> Self {
        Self {
            is_active: true,
            esg_e: result.environmental().into(),
            esg_s: result.social().into(),
            esg_g: result.governance().into(),
            ..Self::base(draft)
        }
    }

    /// A parked project: held back from listings pending human review, with
    /// zeroed scores.
    pub fn parked(draft: &ProjectDraft) -> Self {
        Self {
            is_active: false,
            ..Self::base(draft)
        }
    }

    fn base(draft: &ProjectDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            creator_id: draft.creator_id(),
            title: draft.title().to_owned(),
            description: draft.description().to_owned(),
            category: draft.category().to_owned(),
            target_amount: draft.target_amount(),
            end_date: draft.end_date(),
            is_active: false,
            esg_e: 0,
            esg_s: 0,
            esg_g: 0,
        }
    }
}

/// A user holding the administrator role, as far as alert fan-out cares.
#[derive(Clone, Debug, FromRow)]
pub struct Administrator {
    pub name: String,
    pub email: String,
}
