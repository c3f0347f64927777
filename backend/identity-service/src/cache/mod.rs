/// Session token caching
pub mod session;

pub use session::{RedisSessionCache, SessionCache, SessionKey};

#[cfg(test)]
pub use session::MockSessionCache;
