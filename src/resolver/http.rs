//! HTTP artifact resolver over reqwest.

use super::{ArtifactLookupError, ArtifactResolver, LookupCause};
use crate::color::ColorKey;
use bytes::Bytes;
use tracing::{debug, trace, warn};

/// Default timeout applied at the HTTP client level.
///
/// This is a transport safety net; the per-lookup deadline enforced by the
/// work distributor is expected to fire first.
pub const DEFAULT_CLIENT_TIMEOUT_SECS: u64 = 30;

/// Resolver that fetches artifacts from an HTTP service addressed by
/// `<base_url>/<color_key>`.
///
/// A 2xx response with a non-empty body is the artifact content; any other
/// status, transport failure, or empty body is an [`ArtifactLookupError`]
/// carrying the requested key.
#[derive(Clone)]
pub struct HttpArtifactResolver {
    client: reqwest::Client,
    base_url: String,
}

impl HttpArtifactResolver {
    /// Creates a resolver against the given base location.
    ///
    /// A trailing slash on `base_url` is tolerated.
    ///
    /// # Errors
    ///
    /// Returns the underlying `reqwest` error if the HTTP client cannot be
    /// constructed.
    pub fn new(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        Self::with_timeout(base_url, DEFAULT_CLIENT_TIMEOUT_SECS)
    }

    /// Creates a resolver with a custom client-level timeout.
    ///
    /// # Errors
    ///
    /// Returns the underlying `reqwest` error if the HTTP client cannot be
    /// constructed.
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// The request URL for a color key.
    fn artifact_url(&self, key: &ColorKey) -> String {
        format!("{}/{}", self.base_url, key)
    }
}

impl ArtifactResolver for HttpArtifactResolver {
    async fn resolve(&self, key: &ColorKey) -> Result<Bytes, ArtifactLookupError> {
        let url = self.artifact_url(key);
        trace!(key = %key, url = %url, "Artifact request starting");

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!(key = %key, error = %e, "Artifact request failed");
            ArtifactLookupError::new(key.clone(), LookupCause::Transport(e.to_string()))
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                key = %key,
                status = status.as_u16(),
                "Artifact lookup returned error status"
            );
            return Err(ArtifactLookupError::new(
                key.clone(),
                LookupCause::Status(status.as_u16()),
            ));
        }

        let body = response.bytes().await.map_err(|e| {
            warn!(key = %key, error = %e, "Failed to read artifact body");
            ArtifactLookupError::new(key.clone(), LookupCause::Transport(e.to_string()))
        })?;

        if body.is_empty() {
            warn!(key = %key, "Artifact lookup returned empty content");
            return Err(ArtifactLookupError::new(
                key.clone(),
                LookupCause::EmptyContent,
            ));
        }

        debug!(key = %key, bytes = body.len(), "Artifact content received");
        Ok(body)
    }
}
