use anyhow::Context;
use tera::Tera;

pub const VERIFICATION_CODE: &str = "emails/verification_code.txt";
pub const RECOVERED_PASSWORD: &str = "emails/recovered_password.txt";
pub const MODERATION_ALERT: &str = "emails/moderation_alert.txt";

/// Build the template registry for outbound email bodies.
///
/// Templates are embedded at compile time so the crate does not depend on a
/// template directory being present at runtime.
pub fn templates() -> anyhow::Result<Tera> {
    let mut tera = Tera::default();

    tera.add_raw_templates(vec![
        (
            VERIFICATION_CODE,
            include_str!("../../templates/emails/verification_code.txt"),
        ),
        (
            RECOVERED_PASSWORD,
            include_str!("../../templates/emails/recovered_password.txt"),
        ),
        (
            MODERATION_ALERT,
            include_str!("../../templates/emails/moderation_alert.txt"),
        ),
    ])
    .context("Failed to register email templates.")?;

    Ok(tera)
}
