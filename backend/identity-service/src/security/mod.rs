/// Security primitives: password hashing and access tokens
pub mod password;
pub mod token;

pub use password::{Argon2PasswordHasher, PasswordHasher};
pub use token::{AccessClaims, TokenIssuer};

#[cfg(test)]
pub use password::MockPasswordHasher;
