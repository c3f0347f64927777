/// Data models for credentials and sessions
pub mod auth;
pub mod credential;

pub use auth::{AuthContext, AuthRequest, LoginOutcome, LoginResponse, ValidatedCredentials};
pub use credential::{Credential, NewCredential, Role};
