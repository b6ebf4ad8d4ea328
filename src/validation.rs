//! Form checks run before any request is sent.

use thiserror::Error;

/// Minimum password length accepted at sign-up.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// A form input that cannot be submitted. The message is shown as is.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Login with a blank email or password.
    #[error("Please fill in both fields.")]
    MissingCredentials,
    /// Sign-up with a blank field.
    #[error("All fields are required.")]
    MissingFields,
    /// Email without an `x@y.z` shape.
    #[error("Please enter a valid email.")]
    InvalidEmail,
    /// Password shorter than [`MIN_PASSWORD_LENGTH`].
    #[error("Password must be at least 6 characters long.")]
    PasswordTooShort,
    /// Password and confirmation differ.
    #[error("Passwords do not match.")]
    PasswordMismatch,
    /// Password recovery without an email.
    #[error("Please enter your email.")]
    MissingEmail,
}

/// Checks the login form.
pub fn validate_sign_in(email: &str, password: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(ValidationError::MissingCredentials);
    }

    Ok(())
}

/// Checks the sign-up form; the first failing rule is reported.
pub fn validate_sign_up(
    username: &str,
    email: &str,
    password: &str,
    confirmation: &str,
) -> Result<(), ValidationError> {
    if [username.trim(), email.trim(), password, confirmation]
        .iter()
        .any(|field| field.is_empty())
    {
        return Err(ValidationError::MissingFields);
    }

    validate_new_credentials(email, password)?;

    if password != confirmation {
        return Err(ValidationError::PasswordMismatch);
    }

    Ok(())
}

/// Checks the email shape and password length of a new account.
pub fn validate_new_credentials(email: &str, password: &str) -> Result<(), ValidationError> {
    if !looks_like_email(email) {
        return Err(ValidationError::InvalidEmail);
    }

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort);
    }

    Ok(())
}

/// Checks the password recovery form.
pub fn validate_recovery(email: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() {
        return Err(ValidationError::MissingEmail);
    }

    Ok(())
}

/// Whether some word of `value` reads `local@domain.tld`.
#[must_use]
pub fn looks_like_email(value: &str) -> bool {
    value.split_whitespace().any(|word| {
        let Some((local, domain)) = word.split_once('@') else {
            return false;
        };

        !local.is_empty()
            && domain
                .char_indices()
                .any(|(index, c)| c == '.' && index > 0 && index + 1 < domain.len())
    })
}
