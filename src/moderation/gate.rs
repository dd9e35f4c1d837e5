use anyhow::anyhow;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    email::dispatcher::{DeliveryError, ModerationAlert, NotificationDispatcher},
    models::NewProjectModel,
    projects::ProjectDraft,
    repos::{DynProjectRepo, DynUserRepo},
};

use super::{
    client::{ModerationClient, ModerationError, ScoredSubmission},
    domain::ModerationResult,
};

#[derive(Debug, Error)]
pub enum GateError {
    /// Scoring failed; the submission is unmoderated and nothing was
    /// persisted. The caller must not substitute a verdict.
    #[error(transparent)]
    Moderation(#[from] ModerationError),

    /// A parked project was persisted, but no administrator could be
    /// alerted about it.
    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// What the gate did with one scored item.
#[derive(Debug, Eq, PartialEq)]
pub enum GateDecision {
    /// The project is live and listed.
    Published { project_id: Uuid },
    /// The project exists but is inactive, awaiting human review.
    Parked { project_id: Uuid },
}

/// One persisted decision per scored item. The scorer may segment a single
/// submission into several items, in which case several project rows exist
/// afterwards.
#[derive(Debug, Default)]
pub struct GateOutcome {
    pub decisions: Vec<GateDecision>,
}

/// Applies publish-or-park policy to scored submissions.
pub struct ModerationGate {
    client: ModerationClient,
    project_repo: DynProjectRepo,
    user_repo: DynUserRepo,
    dispatcher: NotificationDispatcher,
}

impl ModerationGate {
    pub fn new(
        client: ModerationClient,
        project_repo: DynProjectRepo,
        user_repo: DynUserRepo,
        dispatcher: NotificationDispatcher,
    ) -> Self {
        Self {
            client,
            project_repo,
            user_repo,
            dispatcher,
        }
    }

    /// Score a draft and persist the resulting decision(s).
    ///
    /// Scoring happens strictly before any write. If it fails, no project
    /// row exists and the submitter has to resubmit.
    pub async fn moderate(&self, draft: &ProjectDraft) -> Result<GateOutcome, GateError> {
        let scored = self.client.score(draft.title(), draft.description()).await?;

        self.decide(draft, &scored).await
    }

    /// Apply policy to an already-scored submission.
    ///
    /// Zero items persist nothing. An explicit approval publishes; anything
    /// else (including a doubtful verdict) parks the project and alerts the
    /// administrators.
    pub async fn decide(
        &self,
        draft: &ProjectDraft,
        scored: &ScoredSubmission,
    ) -> Result<GateOutcome, GateError> {
        let mut outcome = GateOutcome::default();

        for result in &scored.results {
            let decision = if result.verdict().is_approval() {
                let project = NewProjectModel::published(draft, result);
                let project_id = self.project_repo.insert(&project).await?;

                info!(%project_id, item = result.id(), "Published moderated project.");

                GateDecision::Published { project_id }
            } else {
                let project = NewProjectModel::parked(draft);
                let project_id = self.project_repo.insert(&project).await?;

                warn!(
                    %project_id,
                    item = result.id(),
                    verdict = ?result.verdict(),
                    "Parked project pending review.",
                );

                self.alert_administrators(project_id, draft, result, &scored.raw_response)
                    .await?;

                GateDecision::Parked { project_id }
            };

            outcome.decisions.push(decision);
        }

        Ok(outcome)
    }

    async fn alert_administrators(
        &self,
        project_id: Uuid,
        draft: &ProjectDraft,
        result: &ModerationResult,
        raw_response: &str,
    ) -> Result<(), GateError> {
        let administrators = self.user_repo.list_administrators().await?;

        let alert = ModerationAlert {
            project_id,
            title: draft.title(),
            result,
            raw_response,
        };

        let report = self
            .dispatcher
            .alert_administrators(&administrators, &alert)
            .await?;

        if !report.reached_anyone() {
            return Err(GateError::Delivery(DeliveryError::from(anyhow!(
                "no administrator could be alerted about project {}",
                project_id
            ))));
        }

        Ok(())
    }
}
