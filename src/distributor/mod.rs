//! Parallel tile resolution across a fixed worker pool.
//!
//! Tiles are split into contiguous chunks, one per worker. Within a worker,
//! tiles resolve strictly sequentially - one lookup completes before the next
//! begins - while workers run fully in parallel with each other. The pool
//! size therefore caps simultaneous outstanding requests, protecting the
//! artifact service and local connection limits from an unconstrained
//! fan-out across every tile.
//!
//! Each worker reports its resolved chunk back as a single batch. Batches
//! arrive in completion order across workers; the reassembler restores total
//! order from the tile indices.

mod config;

pub use config::{
    DistributorConfig, DEFAULT_MAX_RETRIES, DEFAULT_POOL_SIZE, DEFAULT_REQUEST_TIMEOUT_SECS,
};

use crate::artifact::ResolvedTile;
use crate::error::MosaicError;
use crate::partition::Tile;
use crate::resolver::{ArtifactLookupError, ArtifactResolver, LookupCause};
use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{debug, trace, warn};

/// Splits tiles into contiguous chunks of `ceil(len / pool_size)`,
/// preserving relative order.
///
/// All chunks except the last have equal size; the last carries the
/// remainder. No tile is duplicated or omitted, and fewer than `pool_size`
/// chunks are produced when there are not enough tiles to fill them.
pub fn chunk_tiles(tiles: Vec<Tile>, pool_size: usize) -> Vec<Vec<Tile>> {
    if tiles.is_empty() {
        return Vec::new();
    }

    let chunk_size = tiles.len().div_ceil(pool_size.max(1));
    let mut chunks = Vec::with_capacity(pool_size.max(1));
    let mut remaining = tiles;
    while remaining.len() > chunk_size {
        let rest = remaining.split_off(chunk_size);
        chunks.push(remaining);
        remaining = rest;
    }
    chunks.push(remaining);
    chunks
}

/// Drives tile resolution through a fixed pool of sequential workers.
pub struct WorkDistributor<R>
where
    R: ArtifactResolver + 'static,
{
    resolver: Arc<R>,
    config: DistributorConfig,
}

impl<R> WorkDistributor<R>
where
    R: ArtifactResolver + 'static,
{
    /// Creates a distributor over the given resolver.
    pub fn new(resolver: Arc<R>, config: DistributorConfig) -> Self {
        Self { resolver, config }
    }

    /// Resolves every tile, or fails the whole operation.
    ///
    /// The returned tiles are ordered by worker completion, not by index;
    /// the caller restores total order through the reassembler. The first
    /// permanently failed lookup fails the operation and drops workers still
    /// in flight with the pool - a partial result is never returned.
    pub async fn distribute(&self, tiles: Vec<Tile>) -> Result<Vec<ResolvedTile>, MosaicError> {
        let total = tiles.len();
        let chunks = chunk_tiles(tiles, self.config.pool_size);
        debug!(
            tiles = total,
            workers = chunks.len(),
            pool_size = self.config.pool_size,
            "Distributing tiles across worker pool"
        );

        let mut pool = JoinSet::new();
        for (worker, chunk) in chunks.into_iter().enumerate() {
            let resolver = Arc::clone(&self.resolver);
            let config = self.config.clone();
            pool.spawn(async move { resolve_chunk(worker, chunk, resolver, config).await });
        }

        let mut resolved = Vec::with_capacity(total);
        while let Some(outcome) = pool.join_next().await {
            match outcome {
                Ok(Ok(batch)) => {
                    trace!(
                        batch = batch.len(),
                        collected = resolved.len() + batch.len(),
                        total,
                        "Worker batch collected"
                    );
                    resolved.extend(batch);
                }
                Ok(Err(err)) => {
                    warn!(key = %err.key(), "Tile resolution failed permanently");
                    return Err(err.into());
                }
                Err(join_err) => {
                    // The missing chunk surfaces as an integrity error at
                    // reassembly rather than a silent partial grid.
                    warn!(error = %join_err, "Resolution worker panicked");
                }
            }
        }

        Ok(resolved)
    }
}

/// Sequential worker loop: one lookup completes before the next begins.
async fn resolve_chunk<R>(
    worker: usize,
    chunk: Vec<Tile>,
    resolver: Arc<R>,
    config: DistributorConfig,
) -> Result<Vec<ResolvedTile>, ArtifactLookupError>
where
    R: ArtifactResolver,
{
    let mut batch = Vec::with_capacity(chunk.len());
    for tile in chunk {
        trace!(worker, index = tile.index, key = %tile.color_key, "Resolving tile");
        let content = resolve_with_retry(resolver.as_ref(), &tile, &config).await?;
        batch.push(ResolvedTile::new(tile, content));
    }
    debug!(worker, tiles = batch.len(), "Worker chunk complete");
    Ok(batch)
}

/// Bounded retries around a per-attempt deadline, with exponential backoff.
async fn resolve_with_retry<R>(
    resolver: &R,
    tile: &Tile,
    config: &DistributorConfig,
) -> Result<Bytes, ArtifactLookupError>
where
    R: ArtifactResolver,
{
    let max_attempts = config.max_retries.max(1);
    let mut last_error = None;

    for attempt in 1..=max_attempts {
        match tokio::time::timeout(config.request_timeout, resolver.resolve(&tile.color_key)).await
        {
            Ok(Ok(content)) => {
                if attempt > 1 {
                    debug!(key = %tile.color_key, attempt, "Artifact lookup recovered");
                }
                return Ok(content);
            }
            Ok(Err(err)) => {
                warn!(
                    key = %tile.color_key,
                    attempt,
                    error = %err,
                    "Artifact lookup attempt failed"
                );
                last_error = Some(err);
            }
            Err(_) => {
                warn!(
                    key = %tile.color_key,
                    attempt,
                    timeout_ms = config.request_timeout.as_millis() as u64,
                    "Artifact lookup timed out"
                );
                last_error = Some(ArtifactLookupError::new(
                    tile.color_key.clone(),
                    LookupCause::TimedOut(config.request_timeout),
                ));
            }
        }

        if attempt < max_attempts {
            let backoff = Duration::from_millis(100 * (1 << attempt.min(6)));
            trace!(backoff_ms = backoff.as_millis() as u64, "Backoff before retry");
            tokio::time::sleep(backoff).await;
        }
    }

    Err(last_error.unwrap_or_else(|| {
        ArtifactLookupError::new(
            tile.color_key.clone(),
            LookupCause::Transport("no lookup attempts were made".to_string()),
        )
    }))
}
