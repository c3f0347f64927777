/// Database operations for identity service
pub mod credentials;

pub use credentials::{CredentialStore, PgCredentialStore};

#[cfg(test)]
pub use credentials::MockCredentialStore;
