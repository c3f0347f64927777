/// Resilience helpers for backend calls
///
/// - **Timeout**: every store and cache call runs under a deadline so a
///   stalled backend cannot pin a request task
/// - **Presets**: default deadlines per backend type
///
/// Retries are deliberately absent: retry policy belongs to the caller.
///
/// # Example
///
/// ```rust,no_run
/// use resilience::{presets, with_timeout};
///
/// #[tokio::main]
/// async fn main() {
///     let result = with_timeout("load_user", presets::database_timeout(), async {
///         Ok::<_, String>(())
///     })
///     .await;
///     assert!(result.is_ok());
/// }
/// ```
pub mod presets;
pub mod timeout;

pub use presets::{cache_timeout, database_timeout};
pub use timeout::{with_timeout, TimeoutConfig, TimeoutError};
