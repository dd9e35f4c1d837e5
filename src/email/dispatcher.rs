use std::sync::Arc;

use anyhow::Context;
use tera::Tera;
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    identities::domain::email::Email,
    models::Administrator,
    moderation::domain::ModerationResult,
};

use super::{
    clients::{EmailClient, Message},
    templates,
};

pub type DynEmailClient = Arc<dyn EmailClient>;

/// An outbound notification could not be composed or handed to the mail
/// transport. State persisted before the send is not rolled back.
#[derive(Debug, Error)]
#[error("failed to deliver notification email")]
pub struct DeliveryError(#[from] anyhow::Error);

/// Everything an administrator needs to audit a parked submission.
pub struct ModerationAlert<'a> {
    pub project_id: Uuid,
    pub title: &'a str,
    pub result: &'a ModerationResult,
    pub raw_response: &'a str,
}

/// Per-recipient outcome of an administrator alert fan-out.
///
/// Delivery continues past individual failures; a failing recipient never
/// blocks the remaining ones.
#[derive(Default)]
pub struct AlertReport {
    pub delivered: Vec<String>,
    pub failed: Vec<(String, anyhow::Error)>,
}

impl AlertReport {
    /// True when at least one administrator was reached, or there was nobody
    /// to reach.
    pub fn reached_anyone(&self) -> bool {
        !self.delivered.is_empty() || self.failed.is_empty()
    }
}

/// Composes and sends the three transactional message kinds: verification
/// codes, recovered passwords, and administrator alerts.
#[derive(Clone)]
pub struct NotificationDispatcher {
    client: DynEmailClient,
    templates: Tera,
}

impl NotificationDispatcher {
    pub fn new(client: DynEmailClient) -> anyhow::Result<Self> {
        Ok(Self {
            client,
            templates: templates::templates()?,
        })
    }

    /// Send a one-time code to the address it was issued for.
    pub async fn send_verification_code(
        &self,
        email: &Email,
        code: &str,
    ) -> Result<(), DeliveryError> {
        let mut context = tera::Context::new();
        context.insert("code", code);

        let text = self
            .templates
            .render(templates::VERIFICATION_CODE, &context)
            .context("Failed to render verification code template.")?;

        let message = Message {
            to: email.address().to_owned(),
            subject: "Confirmation code".to_owned(),
            text,
        };

        self.client
            .send(&message)
            .await
            .context("Failed to send verification code email.")?;

        info!("Sent verification code email.");

        Ok(())
    }

    /// Send a freshly generated password to a user who requested recovery.
    pub async fn send_recovered_password(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<(), DeliveryError> {
        let mut context = tera::Context::new();
        context.insert("password", password);

        let text = self
            .templates
            .render(templates::RECOVERED_PASSWORD, &context)
            .context("Failed to render recovered password template.")?;

        let message = Message {
            to: email.address().to_owned(),
            subject: "Your new password".to_owned(),
            text,
        };

        self.client
            .send(&message)
            .await
            .context("Failed to send recovered password email.")?;

        info!("Sent recovered password email.");

        Ok(())
    }

    /// Alert every administrator that a submission was parked.
    ///
    /// Each recipient gets an individual message. Failures are recorded in
    /// the returned report rather than aborting the loop.
    pub async fn alert_administrators(
        &self,
        administrators: &[Administrator],
        alert: &ModerationAlert<'_>,
    ) -> Result<AlertReport, DeliveryError> {
        let mut context = tera::Context::new();
        context.insert("project_id", &alert.project_id);
        context.insert("title", alert.title);
        context.insert("item_id", &alert.result.id());
        context.insert("verdict", &alert.result.verdict());
        context.insert("reason", alert.result.reason());
        context.insert("raw_response", alert.raw_response);

        let text = self
            .templates
            .render(templates::MODERATION_ALERT, &context)
            .context("Failed to render moderation alert template.")?;

        let mut report = AlertReport::default();

        for administrator in administrators {
            let message = Message {
                to: administrator.email.clone(),
                subject: "Project held for review".to_owned(),
                text: text.clone(),
            };

            match self.client.send(&message).await {
                Ok(()) => report.delivered.push(administrator.email.clone()),
                Err(send_error) => {
                    error!(
                        admin = %administrator.email,
                        error = ?send_error,
                        "Failed to deliver moderation alert.",
                    );

                    report.failed.push((administrator.email.clone(), send_error));
                }
            }
        }

        info!(
            delivered = report.delivered.len(),
            failed = report.failed.len(),
            project_id = %alert.project_id,
            "Dispatched moderation alerts.",
        );

        Ok(report)
    }
}
