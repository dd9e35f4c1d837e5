use chrono::{DateTime, Duration, Utc};
use rand::{thread_rng, Rng};

use super::email::Email;

/// Number of digits in a one-time code.
pub const CODE_LENGTH: usize = 6;

/// How long an issued code stays valid.
pub const CODE_TTL_SECONDS: i64 = 60;

/// A reissue for the same address is refused while the remaining validity of
/// the outstanding code exceeds this many seconds. The comparison is against
/// remaining time rather than time since issuance, so in practice only the
/// first few seconds of the window are throttled.
pub const RESEND_WINDOW_SECONDS: i64 = 50;

/// A freshly generated one-time code, not yet persisted.
#[derive(Debug)]
pub struct NewVerificationCode {
    email: Email,
    code: String,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl NewVerificationCode {
    /// Generate a code for the given address, valid for
    /// [`CODE_TTL_SECONDS`] from `now`.
    ///
    /// `now` is the single clock reading for the whole issuance: it becomes
    /// the row's `created_at` and anchors `expires_at`.
    pub fn generate(email: Email, now: DateTime<Utc>) -> Self {
        let mut rng = thread_rng();
        let code: String = (0..CODE_LENGTH)
            .map(|_| char::from_digit(rng.gen_range(1..=9), 10).unwrap_or('1'))
            .collect();

        Self {
            email,
            code,
            created_at: now,
            expires_at: now + Duration::seconds(CODE_TTL_SECONDS),
        }
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}
