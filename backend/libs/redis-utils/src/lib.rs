use anyhow::{Context, Result};
use redis::aio::ConnectionManager;
use redis::{Client, ConnectionAddr, ConnectionInfo, IntoConnectionInfo};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::info;

/// Shared Redis connection manager guarded by a Tokio mutex.
///
/// Callers clone the manager out of the guard before issuing commands so the
/// lock is held only for the clone, never across network I/O.
pub type SharedConnectionManager = Arc<Mutex<ConnectionManager>>;

/// Redis connection pool backed by a single auto-reconnecting manager.
pub struct RedisPool {
    manager: SharedConnectionManager,
    addr_label: String,
}

impl RedisPool {
    /// Connect and verify the server answers `PING` within `connect_timeout`.
    pub async fn connect(redis_url: &str, connect_timeout: Duration) -> Result<Self> {
        let info: ConnectionInfo = redis_url
            .into_connection_info()
            .context("failed to parse REDIS_URL connection string")?;
        let addr_label = describe_addr(&info.addr);

        let client = Client::open(info).context("failed to construct Redis client")?;
        let mut connection_manager = tokio::time::timeout(
            connect_timeout,
            ConnectionManager::new(client),
        )
        .await
        .with_context(|| format!("timed out connecting to Redis at {}", addr_label))?
        .context("failed to initialize Redis connection manager")?;

        let _: String = tokio::time::timeout(
            connect_timeout,
            redis::cmd("PING").query_async(&mut connection_manager),
        )
        .await
        .with_context(|| format!("timed out pinging Redis at {}", addr_label))?
        .context("Redis PING failed")?;

        info!(addr = %addr_label, "Redis connection established");

        Ok(Self {
            manager: Arc::new(Mutex::new(connection_manager)),
            addr_label,
        })
    }

    pub fn manager(&self) -> SharedConnectionManager {
        self.manager.clone()
    }

    pub fn addr_label(&self) -> &str {
        &self.addr_label
    }
}

/// Render a connection address for logs without credentials.
pub fn describe_addr(addr: &ConnectionAddr) -> String {
    match addr {
        ConnectionAddr::Tcp(host, port) => format!("{}:{}", host, port),
        ConnectionAddr::TcpTls { host, port, .. } => format!("{}:{} (tls)", host, port),
        _ => "unix socket".to_string(),
    }
}
