/// Shared JWT module for marketplace services
///
/// Tokens are signed with HS256 over a shared secret. Keys are built from
/// configuration and passed explicitly to every call; there is no global key
/// storage, so two services (or two tests) in one process can hold different
/// secrets.
///
/// ## Expiry
///
/// Decoding neither requires nor validates `exp`. Services that issue tokens
/// through this module enforce lifetime elsewhere (for example a TTL on a
/// cached copy of the token). A token decoded here purely by signature does
/// not expire.
///
/// ## Usage
///
/// ```rust
/// use crypto_core::jwt::{decode_token, encode_token, JwtKeys};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Claims {
///     id: String,
/// }
///
/// let keys = JwtKeys::from_secret(b"shared-secret").unwrap();
/// let token = encode_token(&Claims { id: "42".into() }, &keys).unwrap();
/// let claims: Claims = decode_token(&token, &keys).unwrap();
/// assert_eq!(claims.id, "42");
/// ```
use anyhow::{anyhow, bail, Result};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;

/// JWT algorithm - symmetric, shared secret
pub const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

const BEARER_PREFIX: &str = "Bearer";

/// Signing and verification keys derived from one shared secret
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtKeys {
    /// Build keys from a shared secret.
    ///
    /// ## Errors
    ///
    /// Returns error if the secret is empty.
    pub fn from_secret(secret: &[u8]) -> Result<Self> {
        if secret.is_empty() {
            bail!("JWT secret must not be empty");
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        })
    }
}

impl fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtKeys")
            .field("algorithm", &JWT_ALGORITHM)
            .finish_non_exhaustive()
    }
}

/// Sign `claims` into a compact JWT.
///
/// The claims are serialized as-is; no registered claims (`exp`, `iat`) are
/// added.
pub fn encode_token<C: Serialize>(claims: &C, keys: &JwtKeys) -> Result<String> {
    encode(&Header::new(JWT_ALGORITHM), claims, &keys.encoding)
        .map_err(|e| anyhow!("Failed to generate token: {e}"))
}

/// Verify the signature of `token` and decode its claims.
///
/// ## Errors
///
/// Returns error if:
/// - Signature does not match the key
/// - Header names an algorithm other than HS256
/// - Token is malformed or claims do not deserialize into `C`
pub fn decode_token<C: DeserializeOwned>(token: &str, keys: &JwtKeys) -> Result<C> {
    decode::<C>(token, &keys.decoding, &validation())
        .map(|data| data.claims)
        .map_err(|e| anyhow!("Token validation failed: {e}"))
}

/// Extract the token from an `Authorization` header value.
///
/// Accepts `Bearer <token>` with any surrounding whitespace; returns `None`
/// for other schemes or an empty token.
pub fn extract_bearer_token(header_value: &str) -> Option<&str> {
    let rest = header_value.trim_start().strip_prefix(BEARER_PREFIX)?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let token = rest.trim();
    if token.is_empty() || token.contains(char::is_whitespace) {
        return None;
    }
    Some(token)
}

fn validation() -> Validation {
    let mut validation = Validation::new(JWT_ALGORITHM);
    validation.validate_exp = false;
    validation.required_spec_claims.clear();
    validation
}
