use std::{sync::Arc, time::Duration};

use clap::Args;

use crate::{
    email::{
        clients::{ConsoleMailer, SendgridMailer},
        dispatcher::DynEmailClient,
    },
    moderation::client::ModerationOptions,
};

/// Configuration for the trust and moderation gate.
///
/// Parsed once at process start by the host binary (typically `#[clap(flatten)]`ed
/// into its own options) and passed into the constructors. Nothing in this
/// crate reads the environment at call time.
#[derive(Args, Clone, Debug)]
pub struct Config {
    /// URL of the text-scoring endpoint used for project moderation.
    #[clap(long = "moderation-url", env = "MODERATION_URL")]
    pub moderation_url: String,

    /// Model the scoring endpoint should run.
    #[clap(
        long = "moderation-model",
        default_value = "llama3.1",
        env = "MODERATION_MODEL"
    )]
    pub moderation_model: String,

    /// Seconds to wait for the scoring endpoint before giving up.
    #[clap(
        long = "moderation-timeout",
        default_value = "30",
        env = "MODERATION_TIMEOUT"
    )]
    pub moderation_timeout_seconds: u16,

    /// Address to send emails from.
    #[clap(
        long = "email-from-address",
        default_value = "admin@localhost",
        env = "EMAIL_FROM_ADDRESS"
    )]
    pub email_from_address: String,

    /// Display name to send emails from.
    #[clap(
        long = "email-from-name",
        default_value = "EcoFund",
        env = "EMAIL_FROM_NAME"
    )]
    pub email_from_name: String,

    /// API key for SendGrid.
    ///
    /// If provided, emails will be sent using SendGrid. If this is not set,
    /// emails will be printed to stdout.
    #[clap(long = "sendgrid-key", env = "SENDGRID_KEY")]
    pub sendgrid_key: Option<String>,
}

impl Config {
    /// Build the mail transport this configuration selects.
    pub fn email_client(&self) -> DynEmailClient {
        match &self.sendgrid_key {
            Some(api_key) => Arc::new(SendgridMailer::new(
                api_key.clone(),
                self.email_from_address.clone(),
                self.email_from_name.clone(),
            )),
            None => Arc::new(ConsoleMailer {
                from: format!("{} <{}>", self.email_from_name, self.email_from_address),
            }),
        }
    }

    pub fn moderation_options(&self) -> ModerationOptions {
        ModerationOptions {
            endpoint: self.moderation_url.clone(),
            model: self.moderation_model.clone(),
            timeout: Duration::from_secs(self.moderation_timeout_seconds.into()),
        }
    }
}
