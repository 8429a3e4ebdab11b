/// Default number of concurrent workers for [`run_bulk`](crate::run_bulk).
pub const DEFAULT_MAX_WORKERS: usize = 10;

/// Configures timeout, retry, and bulk-concurrency behavior.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientOptions {
    /// Per-attempt request timeout in seconds. The retry sequence as a whole
    /// has no deadline.
    pub timeout_secs: u64,
    /// Maximum number of retries after the initial attempt. Zero means a
    /// single attempt regardless of what the server answers.
    pub max_retries: usize,
    /// Base backoff in seconds for rate-limited retries (exponential strategy).
    pub base_backoff_secs: u64,
    /// Upper bound on a single backoff sleep, in seconds.
    pub max_backoff_secs: u64,
    /// Concurrency cap carried for bulk calls.
    pub max_workers: usize,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_secs: 90,
            max_retries: 2,
            base_backoff_secs: 1,
            max_backoff_secs: 60,
            max_workers: DEFAULT_MAX_WORKERS,
        }
    }
}
