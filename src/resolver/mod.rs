//! Artifact lookup boundary.
//!
//! [`ArtifactResolver`] is the crate's only external network dependency:
//! given a color key, obtain the content representing that color's artifact,
//! or fail. Retry policy and timeouts belong to the work distributor, not to
//! this layer, and no caching happens here - identical keys may be requested
//! redundantly across tiles.

mod http;

pub use http::{HttpArtifactResolver, DEFAULT_CLIENT_TIMEOUT_SECS};

use crate::color::ColorKey;
use bytes::Bytes;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Why an artifact lookup failed.
#[derive(Debug, Clone, Error)]
pub enum LookupCause {
    /// Transport-level failure (connect, TLS, body read)
    #[error("request failed: {0}")]
    Transport(String),
    /// Non-success HTTP status
    #[error("HTTP status {0}")]
    Status(u16),
    /// Success response with no usable content
    #[error("empty artifact content")]
    EmptyContent,
    /// The lookup did not complete within the configured deadline
    #[error("timed out after {0:?}")]
    TimedOut(Duration),
}

/// Artifact lookup failure, carrying the color key that was requested.
#[derive(Debug, Clone, Error)]
#[error("artifact lookup for color key \"{key}\" failed: {cause}")]
pub struct ArtifactLookupError {
    key: ColorKey,
    #[source]
    cause: LookupCause,
}

impl ArtifactLookupError {
    /// Creates a lookup error for the given key.
    pub fn new(key: ColorKey, cause: LookupCause) -> Self {
        Self { key, cause }
    }

    /// The color key whose lookup failed.
    pub fn key(&self) -> &ColorKey {
        &self.key
    }

    /// The underlying failure.
    pub fn cause(&self) -> &LookupCause {
        &self.cause
    }
}

/// Asynchronous source of color-keyed artifacts.
///
/// Implementors map a color key to the content representing that color's
/// artifact. One call maps to one lookup; callers that need retries or
/// per-call deadlines wrap the future themselves.
pub trait ArtifactResolver: Send + Sync {
    /// Fetches the artifact content for a color key.
    fn resolve(
        &self,
        key: &ColorKey,
    ) -> impl Future<Output = Result<Bytes, ArtifactLookupError>> + Send;
}
