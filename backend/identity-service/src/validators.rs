//! Input validation for credential requests

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{IdentityError, Result};
use crate::models::{AuthRequest, ValidatedCredentials};

/// Minimum password length in bytes of UTF-8.
pub const MIN_PASSWORD_LENGTH: usize = 6;

// Hardcoded pattern, always valid
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("hardcoded email regex is invalid - fix source code")
});

/// Validate email format (RFC 5322 simplified)
pub fn validate_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Validate a register/login request.
///
/// Checks run in a fixed order and the first failure is returned:
/// email present, email shape, password present, password length.
pub fn validate_auth_request(req: AuthRequest) -> Result<ValidatedCredentials> {
    if req.email.is_empty() {
        return Err(IdentityError::EmailRequired);
    }

    if !validate_email(&req.email) {
        return Err(IdentityError::InvalidEmail);
    }

    if req.password.is_empty() {
        return Err(IdentityError::PasswordEmpty);
    }

    if req.password.len() < MIN_PASSWORD_LENGTH {
        return Err(IdentityError::PasswordTooShort);
    }

    Ok(ValidatedCredentials::new(req.email, req.password))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: &str, password: &str) -> AuthRequest {
        AuthRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_valid_email() {
        assert!(validate_email("user@example.com"));
        assert!(validate_email("test.user+tag@sub.example.co.uk"));
    }

    #[test]
    fn test_invalid_email() {
        assert!(!validate_email("invalid"));
        assert!(!validate_email("@example.com"));
        assert!(!validate_email("user@"));
        assert!(!validate_email("user@example.c"));
    }

    #[test]
    fn test_email_required() {
        let err = validate_auth_request(request("", "123456")).unwrap_err();
        assert!(matches!(err, IdentityError::EmailRequired));
    }

    #[test]
    fn test_email_invalid() {
        let err = validate_auth_request(request("test", "123456")).unwrap_err();
        assert!(matches!(err, IdentityError::InvalidEmail));
    }

    #[test]
    fn test_password_empty() {
        let err = validate_auth_request(request("test@gmail.com", "")).unwrap_err();
        assert!(matches!(err, IdentityError::PasswordEmpty));
    }

    #[test]
    fn test_password_too_short() {
        let err = validate_auth_request(request("test@gmail.com", "123")).unwrap_err();
        assert!(matches!(err, IdentityError::PasswordTooShort));
    }

    #[test]
    fn test_password_length_counts_bytes() {
        // Three two-byte characters reach the minimum
        assert!(validate_auth_request(request("test@gmail.com", "ééé")).is_ok());

        let err = validate_auth_request(request("test@gmail.com", "éé")).unwrap_err();
        assert!(matches!(err, IdentityError::PasswordTooShort));
    }

    #[test]
    fn test_first_failure_wins() {
        // Both fields bad: the email check runs first
        let err = validate_auth_request(request("", "")).unwrap_err();
        assert!(matches!(err, IdentityError::EmailRequired));
    }

    #[test]
    fn test_valid_request() {
        let creds = validate_auth_request(request("test@gmail.com", "123456")).unwrap();
        assert_eq!(creds.email(), "test@gmail.com");
        assert_eq!(creds.password(), "123456");
    }
}
