use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::credential::Role;

/// Register/login request body
#[derive(Clone, Default, Deserialize)]
pub struct AuthRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl fmt::Debug for AuthRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Email and password that passed `validators::validate_auth_request`.
///
/// Only the validator constructs this type, so the identity service never
/// sees unchecked input.
#[derive(Clone)]
pub struct ValidatedCredentials {
    email: String,
    password: String,
}

impl ValidatedCredentials {
    pub(crate) fn new(email: String, password: String) -> Self {
        Self { email, password }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for ValidatedCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatedCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Result of a successful login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub role: Role,
    pub access_token: String,
    /// `true` when the token came from the session cache
    pub reused: bool,
}

/// Login response payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub role: Role,
}

impl From<LoginOutcome> for LoginResponse {
    fn from(outcome: LoginOutcome) -> Self {
        Self {
            access_token: outcome.access_token,
            role: outcome.role,
        }
    }
}

/// Caller identity recovered from a verified bearer token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}
