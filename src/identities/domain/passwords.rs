use rand::{seq::SliceRandom, thread_rng};

const RECOVERED_PASSWORD_LENGTH: usize = 12;

// The digit zero is deliberately absent from the alphabet.
const PASSWORD_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ123456789!@#$%^&*";

/// Generate a replacement password to email to a user who lost theirs.
pub fn generate_recovery_password() -> String {
    let mut rng = thread_rng();

    (0..RECOVERED_PASSWORD_LENGTH)
        .map(|_| char::from(*PASSWORD_CHARS.choose(&mut rng).unwrap_or(&b'a')))
        .collect()
}
