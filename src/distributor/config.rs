//! Work distributor configuration.
//!
//! Settings for the resolution stage: worker pool size, per-lookup deadline,
//! and the retry bound applied before a lookup failure becomes fatal.

use std::time::Duration;

/// Default number of concurrent workers.
///
/// Each worker resolves its chunk sequentially, so this value caps the
/// number of simultaneous outstanding lookups against the artifact service.
pub const DEFAULT_POOL_SIZE: usize = 3;

/// Default deadline for a single lookup attempt.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Default maximum lookup attempts per tile.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Configuration for distributing tile resolution across workers.
///
/// Constructor-injected into the pipeline so independent runs share no
/// mutable state.
#[derive(Debug, Clone)]
pub struct DistributorConfig {
    /// Number of concurrent workers.
    ///
    /// Default: 3
    pub pool_size: usize,

    /// Deadline for a single lookup attempt.
    ///
    /// Default: 10 seconds
    pub request_timeout: Duration,

    /// Maximum lookup attempts per tile before the failure is fatal.
    ///
    /// Default: 3
    pub max_retries: u32,
}

impl Default for DistributorConfig {
    fn default() -> Self {
        Self {
            pool_size: DEFAULT_POOL_SIZE,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl DistributorConfig {
    /// Sets the worker pool size, clamping zero to 1.
    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size.max(1);
        self
    }

    /// Sets the per-attempt lookup deadline.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets the maximum attempts per tile, clamping zero to 1.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }
}
