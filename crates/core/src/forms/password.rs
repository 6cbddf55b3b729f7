//! Password policy for profile password changes.
//!
//! Rules are checked in a fixed order and only the first failure is
//! reported, so the user fixes one thing at a time.

use thiserror::Error;

/// Minimum password length in characters.
pub const MIN_PASSWORD_LENGTH: usize = 16;

/// Characters accepted as "special".
pub const SPECIAL_CHARACTERS: &str = "!@#$%^&*";

/// Human-readable list of the rules, in display order.
pub const PASSWORD_REQUIREMENTS: [&str; 5] = [
    "At least 16 characters",
    "At least one special character",
    "At least one uppercase letter",
    "At least one lowercase letter",
    "At least one number",
];

/// The first password rule a candidate fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PasswordError {
    #[error("Password must be at least 16 characters.")]
    TooShort,
    #[error("Password must contain at least one lowercase letter.")]
    MissingLowercase,
    #[error("Password must contain at least one uppercase letter.")]
    MissingUppercase,
    #[error("Password must contain at least one number.")]
    MissingDigit,
    #[error("Password must contain at least one special character.")]
    MissingSpecial,
}

/// Check `password` against the policy.
///
/// # Errors
///
/// Returns the first rule that fails, checked in the order length,
/// lowercase, uppercase, digit, special character.
pub fn validate_password(password: &str) -> Result<(), PasswordError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(PasswordError::TooShort);
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(PasswordError::MissingLowercase);
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(PasswordError::MissingUppercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(PasswordError::MissingDigit);
    }
    if !password.chars().any(|c| SPECIAL_CHARACTERS.contains(c)) {
        return Err(PasswordError::MissingSpecial);
    }
    Ok(())
}
