//! In-memory collaborators for identity-service integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use marketplace_identity::cache::{SessionCache, SessionKey};
use marketplace_identity::db::CredentialStore;
use marketplace_identity::error::{IdentityError, Result};
use marketplace_identity::models::{AuthRequest, Credential, NewCredential, Role, ValidatedCredentials};
use marketplace_identity::security::{Argon2PasswordHasher, PasswordHasher, TokenIssuer};
use marketplace_identity::validators::validate_auth_request;
use marketplace_identity::IdentityService;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::Barrier;
use uuid::Uuid;

pub const TEST_SECRET: &str = "integration-test-secret";

/// Credential store keyed by email, unique like the real table
#[derive(Default)]
pub struct InMemoryCredentialStore {
    rows: Mutex<HashMap<String, Credential>>,
    pub creates: AtomicUsize,
    pub role_updates: AtomicUsize,
    find_gate: Mutex<Option<Arc<Barrier>>>,
}

impl InMemoryCredentialStore {
    /// From now on every `find_by_email` waits here after reading
    pub fn gate_lookups(&self, gate: Arc<Barrier>) {
        *self.find_gate.lock().unwrap() = Some(gate);
    }

    pub fn role_of(&self, email: &str) -> Option<Role> {
        self.rows.lock().unwrap().get(email).map(|c| c.role)
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn create(&self, credential: NewCredential) -> Result<Credential> {
        let mut rows = self.rows.lock().unwrap();
        if rows.contains_key(&credential.email) {
            return Err(IdentityError::EmailAlreadyUsed);
        }

        let now = Utc::now();
        let created = Credential {
            id: Uuid::new_v4(),
            email: credential.email.clone(),
            role: credential.role(),
            password_hash: credential.password_hash,
            created_at: now,
            updated_at: now,
        };
        rows.insert(created.email.clone(), created.clone());
        self.creates.fetch_add(1, Ordering::SeqCst);
        Ok(created)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Credential>> {
        let found = self.rows.lock().unwrap().get(email).cloned();

        let gate = self.find_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.wait().await;
        }

        Ok(found)
    }

    async fn update_role(&self, id: Uuid, role: Role) -> Result<bool> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .values_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| IdentityError::Internal(format!("no credential {}", id)))?;
        if row.role == role {
            return Ok(false);
        }
        row.role = role;
        row.updated_at = Utc::now();
        self.role_updates.fetch_add(1, Ordering::SeqCst);
        Ok(true)
    }
}

/// Store whose every call fails like an unreachable database
pub struct UnavailableCredentialStore;

#[async_trait]
impl CredentialStore for UnavailableCredentialStore {
    async fn create(&self, _credential: NewCredential) -> Result<Credential> {
        Err(IdentityError::Database("connection refused".into()))
    }

    async fn find_by_email(&self, _email: &str) -> Result<Option<Credential>> {
        Err(IdentityError::Database("connection refused".into()))
    }

    async fn update_role(&self, _id: Uuid, _role: Role) -> Result<bool> {
        Err(IdentityError::Database("connection refused".into()))
    }
}

/// Expiring token cache with call counters and fault injection
#[derive(Default)]
pub struct InMemorySessionCache {
    entries: Mutex<HashMap<String, (String, Instant)>>,
    pub gets: AtomicUsize,
    pub sets: AtomicUsize,
    pub fail_reads: AtomicBool,
    /// When set, every `get` waits here after reading
    pub read_gate: Option<Arc<Barrier>>,
}

impl InMemorySessionCache {
    pub fn with_read_gate(gate: Arc<Barrier>) -> Self {
        Self {
            read_gate: Some(gate),
            ..Self::default()
        }
    }

    pub fn peek(&self, key: &SessionKey) -> Option<String> {
        self.entries
            .lock()
            .unwrap()
            .get(&key.to_string())
            .filter(|(_, deadline)| Instant::now() < *deadline)
            .map(|(token, _)| token.clone())
    }
}

#[async_trait]
impl SessionCache for InMemorySessionCache {
    async fn get(&self, key: &SessionKey) -> Result<Option<String>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(IdentityError::Cache("connection reset by peer".into()));
        }

        let value = self.peek(key);

        if let Some(gate) = &self.read_gate {
            gate.wait().await;
        }

        Ok(value)
    }

    async fn set(&self, key: &SessionKey, token: &str, ttl: Duration) -> Result<()> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (token.to_string(), Instant::now() + ttl));
        Ok(())
    }
}

/// Argon2 hasher that counts `hash` calls
#[derive(Default)]
pub struct CountingHasher {
    inner: Argon2PasswordHasher,
    pub hashes: AtomicUsize,
}

impl PasswordHasher for CountingHasher {
    fn hash(&self, password: &str) -> Result<String> {
        self.hashes.fetch_add(1, Ordering::SeqCst);
        self.inner.hash(password)
    }

    fn verify(&self, password: &str, password_hash: &str) -> bool {
        self.inner.verify(password, password_hash)
    }
}

pub struct Harness {
    pub store: Arc<InMemoryCredentialStore>,
    pub cache: Arc<InMemorySessionCache>,
    pub hasher: Arc<CountingHasher>,
    pub tokens: TokenIssuer,
    pub service: Arc<IdentityService>,
}

pub fn harness(token_ttl: Duration) -> Harness {
    harness_with_cache(InMemorySessionCache::default(), token_ttl)
}

pub fn harness_with_cache(cache: InMemorySessionCache, token_ttl: Duration) -> Harness {
    let store = Arc::new(InMemoryCredentialStore::default());
    let cache = Arc::new(cache);
    let hasher = Arc::new(CountingHasher::default());
    let tokens = TokenIssuer::new(TEST_SECRET).unwrap();

    let service = Arc::new(IdentityService::new(
        store.clone(),
        cache.clone(),
        hasher.clone(),
        tokens.clone(),
        token_ttl,
    ));

    Harness {
        store,
        cache,
        hasher,
        tokens,
        service,
    }
}

pub fn creds(email: &str, password: &str) -> ValidatedCredentials {
    validate_auth_request(AuthRequest {
        email: email.to_string(),
        password: password.to_string(),
    })
    .unwrap()
}

pub fn count(counter: &AtomicUsize) -> usize {
    counter.load(Ordering::SeqCst)
}
