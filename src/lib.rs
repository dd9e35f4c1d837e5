//! Trust and moderation gate for the EcoFund crowdfunding platform.
//!
//! Two decision gates live here, sharing the same shape: a short-lived,
//! externally-verified check sitting between a user action and a state
//! change.
//!
//! * One-time codes ([`identities::services::CodeService`]): issued with a
//!   resend throttle for registration, login two-factor checks, and password
//!   recovery, then verified against their validity window.
//! * Project moderation ([`moderation::gate::ModerationGate`]): a submitted
//!   draft is scored by an external text-scoring service and either published
//!   immediately or parked inactive while administrators are alerted.
//!
//! HTTP routing, JWT handling, and the platform's CRUD surfaces are the host
//! application's concern. The host wires the services up from a [`config::Config`]
//! and a [`database::PostgresConnection`]:
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use ecofund_core::{
//!     config::Config,
//!     database::PostgresConnection,
//!     email::dispatcher::NotificationDispatcher,
//!     identities::services::CodeService,
//!     moderation::{client::ModerationClient, gate::ModerationGate},
//! };
//!
//! # async fn wire(config: Config, pool: sqlx::PgPool) -> anyhow::Result<()> {
//! let db = PostgresConnection::new(pool);
//!
//! let dispatcher = NotificationDispatcher::new(config.email_client())?;
//! let codes = CodeService::new(Arc::new(db.clone()), dispatcher.clone());
//! let gate = ModerationGate::new(
//!     ModerationClient::new(config.moderation_options())?,
//!     Arc::new(db.clone()),
//!     Arc::new(db),
//!     dispatcher,
//! );
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod database;
pub mod email;
pub mod identities;
pub mod models;
pub mod moderation;
pub mod projects;
pub mod repos;
