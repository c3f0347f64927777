/// Identity Service
///
/// Register, login and merchant promotion over a credential store, a session
/// token cache, a password hasher and a token issuer.
///
/// Login is cache-aside: a live cached token is returned as-is, otherwise a
/// new one is issued and cached for `token_ttl`. Two concurrent logins on an
/// empty cache may both issue and both write; the last write wins. Both
/// tokens are valid, so this race is accepted.
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::cache::{SessionCache, SessionKey};
use crate::db::CredentialStore;
use crate::error::{IdentityError, Result};
use crate::models::{AuthContext, Credential, LoginOutcome, NewCredential, Role, ValidatedCredentials};
use crate::security::{AccessClaims, PasswordHasher, TokenIssuer};

pub struct IdentityService {
    store: Arc<dyn CredentialStore>,
    cache: Arc<dyn SessionCache>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: TokenIssuer,
    token_ttl: Duration,
}

impl IdentityService {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        cache: Arc<dyn SessionCache>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: TokenIssuer,
        token_ttl: Duration,
    ) -> Self {
        Self {
            store,
            cache,
            hasher,
            tokens,
            token_ttl,
        }
    }

    /// Create a new `Customer` credential.
    ///
    /// Nothing is hashed or written when the email is already taken.
    pub async fn register(&self, credentials: ValidatedCredentials) -> Result<Credential> {
        if self
            .store
            .find_by_email(credentials.email())
            .await?
            .is_some()
        {
            info!(email = %credentials.email(), "Registration rejected: email already used");
            return Err(IdentityError::EmailAlreadyUsed);
        }

        let password_hash = self.hasher.hash(credentials.password())?;

        let credential = self
            .store
            .create(NewCredential {
                email: credentials.email().to_string(),
                password_hash,
            })
            .await?;

        info!(
            user_id = %credential.id,
            email = %credential.email,
            role = %credential.role,
            "Credential registered"
        );

        Ok(credential)
    }

    /// Authenticate and return the caller's role plus a bearer token.
    ///
    /// Unknown email and wrong password both fail with `InvalidCredentials`.
    pub async fn login(&self, credentials: ValidatedCredentials) -> Result<LoginOutcome> {
        let Some(credential) = self.store.find_by_email(credentials.email()).await? else {
            debug!(email = %credentials.email(), "Login failed: no such credential");
            return Err(IdentityError::InvalidCredentials);
        };

        if !self
            .hasher
            .verify(credentials.password(), &credential.password_hash)
        {
            debug!(user_id = %credential.id, "Login failed: password mismatch");
            return Err(IdentityError::InvalidCredentials);
        }

        let key = SessionKey::new(credential.id, credential.email.clone());

        if let Some(access_token) = self.cached_token(&key).await {
            info!(
                user_id = %credential.id,
                email = %credential.email,
                "Login reused cached session token"
            );
            return Ok(LoginOutcome {
                role: credential.role,
                access_token,
                reused: true,
            });
        }

        let access_token = self.tokens.issue(&AccessClaims::from(&credential))?;

        // Nothing to undo if this fails: login mutated no credential state
        self.cache.set(&key, &access_token, self.token_ttl).await?;

        info!(
            user_id = %credential.id,
            email = %credential.email,
            ttl_secs = self.token_ttl.as_secs(),
            "Login issued new session token"
        );

        Ok(LoginOutcome {
            role: credential.role,
            access_token,
            reused: false,
        })
    }

    /// One-way `Customer` to `Merchant` transition for the verified caller.
    ///
    /// A second attempt fails with `UserAlreadyMerchant`. Cached tokens are
    /// left alone and keep their old role claim until they expire.
    pub async fn promote_to_merchant(&self, caller: &AuthContext) -> Result<()> {
        let Some(credential) = self.store.find_by_email(&caller.email).await? else {
            warn!(
                user_id = %caller.id,
                email = %caller.email,
                "Promotion for a token whose credential does not exist"
            );
            return Err(IdentityError::Unauthorized);
        };

        if credential.role.is_merchant() {
            info!(user_id = %credential.id, "Promotion rejected: already a merchant");
            return Err(IdentityError::UserAlreadyMerchant);
        }

        // A concurrent promotion may have won since the read above
        if !self
            .store
            .update_role(credential.id, Role::Merchant)
            .await?
        {
            info!(user_id = %credential.id, "Promotion rejected: lost race to a concurrent promotion");
            return Err(IdentityError::UserAlreadyMerchant);
        }

        info!(
            user_id = %credential.id,
            email = %credential.email,
            "Credential promoted to merchant"
        );

        Ok(())
    }

    /// Cached token for `key`, if any.
    ///
    /// A failed cache read is treated as a miss: login proceeds and issues a
    /// fresh token instead of failing.
    async fn cached_token(&self, key: &SessionKey) -> Option<String> {
        match self.cache.get(key).await {
            Ok(Some(token)) if !token.is_empty() => Some(token),
            Ok(_) => None,
            Err(e) => {
                warn!(
                    user_id = %key.id,
                    error = %e,
                    "Session cache read failed, treating as miss"
                );
                None
            }
        }
    }
}
