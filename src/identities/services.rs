use chrono::{Duration, Utc};
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    email::dispatcher::{DeliveryError, NotificationDispatcher},
    models::NewVerificationCodeModel,
    repos::DynCodeRepo,
};

use super::domain::{
    codes::{NewVerificationCode, RESEND_WINDOW_SECONDS},
    email::Email,
};

#[derive(Debug, Error)]
pub enum IssueError {
    /// A code was sent moments ago and is still within its resend window.
    #[error("a code was already sent for this address")]
    Throttled,

    /// The code was persisted but could not be delivered. The row is not
    /// rolled back, so the user holds a valid code they never received.
    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum VerifyError {
    /// No row matches the supplied pair. Deliberately does not distinguish a
    /// wrong code from an expired one.
    #[error("the code is invalid or has expired")]
    InvalidOrExpired,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Issues and checks the one-time codes backing registration confirmation,
/// login two-factor checks, and password recovery.
#[derive(Clone)]
pub struct CodeService {
    code_repo: DynCodeRepo,
    dispatcher: NotificationDispatcher,
}

impl CodeService {
    pub fn new(code_repo: DynCodeRepo, dispatcher: NotificationDispatcher) -> Self {
        Self {
            code_repo,
            dispatcher,
        }
    }

    /// Issue a fresh code for `email` and mail it out.
    ///
    /// The throttle compares the outstanding code's REMAINING validity
    /// against the resend window, so a reissue is refused only during the
    /// first `CODE_TTL_SECONDS - RESEND_WINDOW_SECONDS` seconds after
    /// issuance.
    ///
    /// The returned code is for internal flows only and must never cross a
    /// trust boundary.
    pub async fn issue(&self, email: &Email) -> Result<String, IssueError> {
        let now = Utc::now();

        if let Some(outstanding) = self.code_repo.latest_unexpired(email.address(), now).await? {
            let remaining = outstanding.expires_at - now;

            if remaining > Duration::seconds(RESEND_WINDOW_SECONDS) {
                debug!(
                    remaining_seconds = remaining.num_seconds(),
                    "Refused code reissue inside resend window.",
                );

                return Err(IssueError::Throttled);
            }
        }

        let code = NewVerificationCode::generate(email.clone(), now);

        self.code_repo
            .insert(&NewVerificationCodeModel::from(&code))
            .await?;

        self.dispatcher
            .send_verification_code(email, code.code())
            .await?;

        info!("Issued verification code.");

        Ok(code.code().to_owned())
    }

    /// Check a supplied (email, code) pair.
    ///
    /// A successful check leaves the row in place; the code stays valid for
    /// replay until it expires naturally.
    pub async fn verify(&self, email: &Email, code: &str) -> Result<(), VerifyError> {
        let matched = self
            .code_repo
            .find_matching(email.address(), code, Utc::now())
            .await?;

        match matched {
            Some(_) => Ok(()),
            None => Err(VerifyError::InvalidOrExpired),
        }
    }
}

#[cfg(test)]
mod test {
    use std::sync::{Arc, Mutex};

    use anyhow::anyhow;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use semval::ValidatedFrom;

    use crate::{
        email::clients::{EmailClient, Message},
        identities::domain::codes::{CODE_LENGTH, CODE_TTL_SECONDS},
        models::VerificationCodeModel,
        repos::CodeRepo,
    };

    use super::*;

    #[derive(Default)]
    struct InMemoryCodeRepo {
        rows: Mutex<Vec<VerificationCodeModel>>,
    }

    impl InMemoryCodeRepo {
        fn with_row(email: &str, code: &str, expires_at: DateTime<Utc>) -> Self {
            let repo = Self::default();
            repo.rows.lock().unwrap().push(VerificationCodeModel {
                id: 1,
                email: email.to_owned(),
                code: code.to_owned(),
                created_at: Utc::now(),
                expires_at,
            });

            repo
        }

        fn row_count(&self) -> usize {
            self.rows.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CodeRepo for InMemoryCodeRepo {
        async fn insert(&self, code: &NewVerificationCodeModel) -> anyhow::Result<()> {
            let mut rows = self.rows.lock().unwrap();
            let id = rows.len() as i32 + 1;
            rows.push(VerificationCodeModel {
                id,
                email: code.email.clone(),
                code: code.code.clone(),
                created_at: code.created_at,
                expires_at: code.expires_at,
            });

            Ok(())
        }

        async fn latest_unexpired(
            &self,
            email: &str,
            now: DateTime<Utc>,
        ) -> anyhow::Result<Option<VerificationCodeModel>> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|row| row.email == email && row.expires_at > now)
                .max_by_key(|row| row.created_at)
                .cloned())
        }

        async fn find_matching(
            &self,
            email: &str,
            code: &str,
            now: DateTime<Utc>,
        ) -> anyhow::Result<Option<VerificationCodeModel>> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|row| row.email == email && row.code == code && row.expires_at > now)
                .cloned())
        }
    }

    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl EmailClient for RecordingMailer {
        async fn send(&self, message: &Message) -> anyhow::Result<()> {
            self.sent
                .lock()
                .unwrap()
                .push((message.to.clone(), message.text.clone()));

            Ok(())
        }
    }

    struct FailingMailer;

    #[async_trait]
    impl EmailClient for FailingMailer {
        async fn send(&self, _message: &Message) -> anyhow::Result<()> {
            Err(anyhow!("mail transport refused the connection"))
        }
    }

    fn email() -> Email {
        Email::validated_from("user@example.com").expect("valid email")
    }

    fn service(
        repo: Arc<InMemoryCodeRepo>,
        mailer: Arc<dyn EmailClient>,
    ) -> CodeService {
        let dispatcher = NotificationDispatcher::new(mailer).expect("dispatcher");

        CodeService::new(repo, dispatcher)
    }

    #[tokio::test]
    async fn issue_persists_and_mails_the_code() {
        let repo = Arc::new(InMemoryCodeRepo::default());
        let mailer = Arc::new(RecordingMailer::default());
        let service = service(repo.clone(), mailer.clone());

        let code = service.issue(&email()).await.expect("issue should succeed");

        assert_eq!(CODE_LENGTH, code.len());
        assert_eq!(1, repo.row_count());

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(1, sent.len());
        assert_eq!("user@example.com", sent[0].0);
        assert!(sent[0].1.contains(&code));
    }

    #[tokio::test]
    async fn issue_uses_one_clock_reading_for_the_row() {
        let repo = Arc::new(InMemoryCodeRepo::default());
        let mailer = Arc::new(RecordingMailer::default());
        let service = service(repo.clone(), mailer);

        service.issue(&email()).await.expect("issue should succeed");

        let rows = repo.rows.lock().unwrap();
        assert_eq!(
            rows[0].created_at + Duration::seconds(CODE_TTL_SECONDS),
            rows[0].expires_at,
        );
    }

    #[tokio::test]
    async fn issue_inside_resend_window_is_throttled() {
        // Remaining validity 55s > 50s window.
        let expires_at = Utc::now() + Duration::seconds(55);
        let repo = Arc::new(InMemoryCodeRepo::with_row(
            "user@example.com",
            "111111",
            expires_at,
        ));
        let mailer = Arc::new(RecordingMailer::default());
        let service = service(repo.clone(), mailer.clone());

        let error = service.issue(&email()).await.expect_err("should throttle");

        assert!(matches!(error, IssueError::Throttled));
        assert_eq!(1, repo.row_count());
        assert!(mailer.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn issue_after_resend_window_succeeds() {
        // Remaining validity 45s < 50s window, so the throttle lets a new
        // issue through even though the old code is still live.
        let expires_at = Utc::now() + Duration::seconds(45);
        let repo = Arc::new(InMemoryCodeRepo::with_row(
            "user@example.com",
            "111111",
            expires_at,
        ));
        let mailer = Arc::new(RecordingMailer::default());
        let service = service(repo.clone(), mailer.clone());

        service.issue(&email()).await.expect("issue should succeed");

        assert_eq!(2, repo.row_count());
    }

    #[tokio::test]
    async fn issue_with_only_expired_rows_succeeds() {
        let expires_at = Utc::now() - Duration::seconds(10);
        let repo = Arc::new(InMemoryCodeRepo::with_row(
            "user@example.com",
            "111111",
            expires_at,
        ));
        let mailer = Arc::new(RecordingMailer::default());
        let service = service(repo.clone(), mailer.clone());

        service.issue(&email()).await.expect("issue should succeed");

        assert_eq!(2, repo.row_count());
    }

    #[tokio::test]
    async fn issue_delivery_failure_leaves_row_in_place() {
        let repo = Arc::new(InMemoryCodeRepo::default());
        let service = service(repo.clone(), Arc::new(FailingMailer));

        let error = service
            .issue(&email())
            .await
            .expect_err("delivery should fail");

        assert!(matches!(error, IssueError::Delivery(_)));
        // The code row outlives the failed send.
        assert_eq!(1, repo.row_count());
    }

    #[tokio::test]
    async fn verify_fresh_code_succeeds_and_is_replayable() {
        let repo = Arc::new(InMemoryCodeRepo::default());
        let mailer = Arc::new(RecordingMailer::default());
        let service = service(repo.clone(), mailer);

        let code = service.issue(&email()).await.expect("issue should succeed");

        service
            .verify(&email(), &code)
            .await
            .expect("first verification should succeed");
        service
            .verify(&email(), &code)
            .await
            .expect("verified codes stay valid until they expire");
    }

    #[tokio::test]
    async fn verify_wrong_code_fails() {
        let repo = Arc::new(InMemoryCodeRepo::default());
        let mailer = Arc::new(RecordingMailer::default());
        let service = service(repo.clone(), mailer);

        service.issue(&email()).await.expect("issue should succeed");

        let error = service
            .verify(&email(), "000000")
            .await
            .expect_err("wrong code should fail");

        assert!(matches!(error, VerifyError::InvalidOrExpired));
    }

    #[tokio::test]
    async fn verify_expired_code_fails() {
        let expires_at = Utc::now() - Duration::seconds(CODE_TTL_SECONDS);
        let repo = Arc::new(InMemoryCodeRepo::with_row(
            "user@example.com",
            "222222",
            expires_at,
        ));
        let mailer = Arc::new(RecordingMailer::default());
        let service = service(repo, mailer);

        let error = service
            .verify(&email(), "222222")
            .await
            .expect_err("expired code should fail");

        assert!(matches!(error, VerifyError::InvalidOrExpired));
    }
}
