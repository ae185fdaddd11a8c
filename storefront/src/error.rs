//! Error types for storefront flows.
//!
//! Every error here is local and recoverable: it blocks one submission and is
//! surfaced inline next to the offending input. Nothing is fatal to the
//! process.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure modes of the sign-in and sign-up flows.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthError {
    /// Sign-up email does not match the mailbox@gmail.com rule.
    ///
    /// The gmail.com restriction is a fixed business rule of this
    /// marketplace, not a general email validator.
    #[error("A valid Gmail address (@gmail.com) is required.")]
    InvalidGmailAddress,

    /// Sign-up phone number has fewer than 10 digits once formatting is
    /// stripped.
    #[error("Please enter a valid phone number (at least 10 digits).")]
    PhoneTooShort,

    /// Sign-up password is shorter than 6 characters.
    #[error("Password must be at least 6 characters long.")]
    PasswordTooShort,

    /// Sign-up email is already present in the account registry.
    #[error("An account with this email already exists. Try signing in.")]
    EmailAlreadyRegistered,

    /// Sign-in credentials did not match any registry entry.
    ///
    /// Deliberately generic: never reveals whether the email or the
    /// password was wrong.
    #[error("Invalid email or password. Please try again.")]
    InvalidCredentials,
}

impl AuthError {
    /// Returns `true` for pre-submit validation failures (reported before
    /// any simulated latency).
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidGmailAddress | Self::PhoneTooShort | Self::PasswordTooShort
        )
    }

    /// Returns `true` for the duplicate-account conflict, recoverable by
    /// switching to sign-in.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::EmailAlreadyRegistered)
    }
}

/// Failure modes of the seller listing submission.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ListingError {
    /// No product photo attached. Checked first and blocks outright,
    /// before any simulated latency.
    #[error("Please upload at least one product photo.")]
    MissingPhoto,

    /// A required text field is blank.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_error_classification() {
        assert!(AuthError::InvalidGmailAddress.is_validation());
        assert!(AuthError::PhoneTooShort.is_validation());
        assert!(AuthError::PasswordTooShort.is_validation());
        assert!(!AuthError::EmailAlreadyRegistered.is_validation());
        assert!(AuthError::EmailAlreadyRegistered.is_conflict());
        assert!(!AuthError::InvalidCredentials.is_conflict());
    }

    #[test]
    fn credential_error_is_generic() {
        let message = AuthError::InvalidCredentials.to_string();
        assert!(!message.to_lowercase().contains("email not found"));
        assert!(!message.to_lowercase().contains("wrong password"));
    }

    #[test]
    fn listing_error_names_the_field() {
        assert_eq!(
            ListingError::MissingField("price").to_string(),
            "Missing required field: price"
        );
    }
}
