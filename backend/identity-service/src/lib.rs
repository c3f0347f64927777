/// Marketplace Identity Service Library
///
/// Credential registration, password login with cached access tokens, and
/// the one-way customer to merchant role transition.
///
/// ## Modules
///
/// - `cache`: Session token cache (Redis)
/// - `config`: Service configuration
/// - `db`: Credential store (PostgreSQL)
/// - `error`: Error types and HTTP mapping
/// - `http`: axum routes, response envelope, bearer middleware
/// - `models`: Data models
/// - `security`: Password hashing, access tokens
/// - `services`: Register / Login / PromoteToMerchant
/// - `validators`: Input validation
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod models;
pub mod security;
pub mod services;
pub mod validators;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use error::{IdentityError, Result};
pub use services::IdentityService;
