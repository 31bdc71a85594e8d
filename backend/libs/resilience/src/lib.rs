/// Resilience patterns shared across Ripple services.
///
/// Currently provides a bounded retry policy with exponential backoff and
/// jitter. Retryability is decided by the caller through a predicate, so
/// validation and authorization failures are never re-executed.
pub mod retry;

pub use retry::{retry_if, RetryPolicy};
