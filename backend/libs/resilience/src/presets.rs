/// Deadline presets per backend type
use crate::timeout::TimeoutConfig;

/// Relational store queries (PostgreSQL)
///
/// - Timeout: 10s
/// - No retry: writes are not idempotent
pub fn database_timeout() -> TimeoutConfig {
    TimeoutConfig::from_secs(10)
}

/// Cache reads and writes (Redis)
///
/// - Timeout: 5s
pub fn cache_timeout() -> TimeoutConfig {
    TimeoutConfig::from_secs(5)
}
