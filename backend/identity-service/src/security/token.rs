/// Access token issuing and verification
///
/// Tokens are HS256 JWTs carrying exactly `{id, email, role}`. No `exp` is
/// embedded: a token's lifetime is the TTL of its session cache entry.
use crypto_core::jwt::{decode_token, encode_token, JwtKeys};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::{IdentityError, Result};
use crate::models::{AuthContext, Credential, Role};

/// Claims embedded in every access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

impl From<&Credential> for AccessClaims {
    fn from(credential: &Credential) -> Self {
        Self {
            id: credential.id,
            email: credential.email.clone(),
            role: credential.role,
        }
    }
}

impl From<AccessClaims> for AuthContext {
    fn from(claims: AccessClaims) -> Self {
        Self {
            id: claims.id,
            email: claims.email,
            role: claims.role,
        }
    }
}

/// Signs and verifies access tokens with one shared secret
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    keys: JwtKeys,
}

impl TokenIssuer {
    pub fn new(secret: &str) -> Result<Self> {
        let keys = JwtKeys::from_secret(secret.as_bytes())
            .map_err(|e| IdentityError::Token(e.to_string()))?;
        Ok(Self { keys })
    }

    pub fn issue(&self, claims: &AccessClaims) -> Result<String> {
        encode_token(claims, &self.keys).map_err(|e| IdentityError::Token(e.to_string()))
    }

    /// Verify signature and decode claims.
    ///
    /// Every failure is reported as `Unauthorized`; the cause is only logged.
    pub fn parse(&self, token: &str) -> Result<AccessClaims> {
        decode_token(token, &self.keys).map_err(|e| {
            debug!("Rejected access token: {}", e);
            IdentityError::Unauthorized
        })
    }
}
