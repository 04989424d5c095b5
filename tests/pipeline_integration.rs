//! Integration tests for the mosaic pipeline.
//!
//! These tests verify the end-to-end flow over a mock artifact resolver:
//! - partition → resolve → reassemble round trip
//! - row-major index ordering in the final grid
//! - concurrency bounded at the pool size
//! - failure propagation carrying the offending color key
//! - abort on empty derived grids before any lookup starts
//! - artifact handle hand-over to the rendering caller

use bytes::Bytes;
use photomosaic::color::ColorKey;
use photomosaic::distributor::DistributorConfig;
use photomosaic::error::MosaicError;
use photomosaic::partition::TileGeometry;
use photomosaic::pipeline::MosaicPipeline;
use photomosaic::raster::PixelBuffer;
use photomosaic::resolver::{ArtifactLookupError, ArtifactResolver, LookupCause};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

// =============================================================================
// Test Helpers
// =============================================================================

/// Mock resolver that serves deterministic SVG-like content per key and
/// tracks call counts and peak concurrency.
struct MockResolver {
    calls: Arc<AtomicUsize>,
    current: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
    fail_key: Option<String>,
    delay: Duration,
}

impl MockResolver {
    fn new() -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            current: Arc::new(AtomicUsize::new(0)),
            peak: Arc::new(AtomicUsize::new(0)),
            fail_key: None,
            delay: Duration::ZERO,
        }
    }

    fn with_failing_key(key: &str) -> Self {
        Self {
            fail_key: Some(key.to_string()),
            ..Self::new()
        }
    }

    fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::new()
        }
    }

    fn counters(&self) -> (Arc<AtomicUsize>, Arc<AtomicUsize>) {
        (Arc::clone(&self.calls), Arc::clone(&self.peak))
    }
}

impl ArtifactResolver for MockResolver {
    async fn resolve(&self, key: &ColorKey) -> Result<Bytes, ArtifactLookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let current = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(current, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.current.fetch_sub(1, Ordering::SeqCst);

        if self.fail_key.as_deref() == Some(key.as_str()) {
            return Err(ArtifactLookupError::new(
                key.clone(),
                LookupCause::Status(500),
            ));
        }

        Ok(Bytes::from(format!("<svg fill=\"#{}\"/>", key)))
    }
}

/// Builds a buffer where every pixel carries the same RGBA value.
fn uniform_buffer(width: u32, height: u32, rgba: [u8; 4]) -> PixelBuffer {
    let data = rgba
        .iter()
        .copied()
        .cycle()
        .take(width as usize * height as usize * 4)
        .collect();
    PixelBuffer::new(width, height, data).unwrap()
}

/// Builds a buffer where each tile-sized block has a distinct red value, so
/// every tile gets a distinct color key.
fn blocky_buffer(width: u32, height: u32, block: u32) -> PixelBuffer {
    let columns = width / block;
    let mut data = vec![0u8; (width * height * 4) as usize];
    for y in 0..height {
        for x in 0..width {
            let block_index = (y / block) * columns + x / block;
            let offset = ((y * width + x) * 4) as usize;
            data[offset] = block_index as u8;
            data[offset + 3] = 255;
        }
    }
    PixelBuffer::new(width, height, data).unwrap()
}

// =============================================================================
// Integration Tests
// =============================================================================

#[tokio::test]
async fn test_build_mosaic_round_trip() {
    let pipeline = MosaicPipeline::new(MockResolver::new(), DistributorConfig::default());
    let buffer = blocky_buffer(8, 6, 2);

    let grid = pipeline
        .build_mosaic(&buffer, TileGeometry::new(2, 2))
        .await
        .unwrap();

    assert_eq!(grid.rows(), 3);
    assert_eq!(grid.columns(), 4);
    assert_eq!(grid.tile_count(), 12);

    for row in 0..grid.rows() {
        for column in 0..grid.columns() {
            let tile = grid.get(row, column).unwrap();
            assert_eq!(tile.index(), row * grid.columns() + column);
            assert_eq!(tile.tile().row as usize, row);
            assert_eq!(tile.tile().column as usize, column);

            let expected = format!("<svg fill=\"#{}\"/>", tile.color_key());
            assert_eq!(tile.content(), expected.as_bytes());
        }
    }
}

#[tokio::test]
async fn test_uniform_buffer_resolves_single_key_everywhere() {
    let resolver = MockResolver::new();
    let (calls, _) = resolver.counters();
    let pipeline = MosaicPipeline::new(resolver, DistributorConfig::default());
    let buffer = uniform_buffer(4, 4, [10, 20, 30, 255]);

    let grid = pipeline
        .build_mosaic(&buffer, TileGeometry::new(2, 2))
        .await
        .unwrap();

    assert_eq!(grid.tile_count(), 4);
    for row in grid.iter_rows() {
        for tile in row {
            assert_eq!(tile.color_key().as_str(), "0a141e");
        }
    }
    // No caching layer: one lookup per tile even for identical keys
    assert_eq!(calls.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn test_concurrency_never_exceeds_pool_size() {
    let resolver = MockResolver::with_delay(Duration::from_millis(15));
    let (_, peak) = resolver.counters();
    let config = DistributorConfig::default().with_pool_size(3);
    let pipeline = MosaicPipeline::new(resolver, config);
    let buffer = blocky_buffer(12, 12, 2);

    let grid = pipeline
        .build_mosaic(&buffer, TileGeometry::new(2, 2))
        .await
        .unwrap();

    assert_eq!(grid.tile_count(), 36);
    assert!(
        peak.load(Ordering::SeqCst) <= 3,
        "peak concurrency {} exceeded pool size",
        peak.load(Ordering::SeqCst)
    );
}

#[tokio::test]
async fn test_failing_tile_rejects_whole_mosaic() {
    // Block index 5 gets red value 5 -> key "050000"
    let resolver = MockResolver::with_failing_key("050000");
    let config = DistributorConfig::default().with_max_retries(2);
    let pipeline = MosaicPipeline::new(resolver, config);
    let buffer = blocky_buffer(8, 6, 2);

    let result = pipeline.build_mosaic(&buffer, TileGeometry::new(2, 2)).await;

    match result {
        Err(MosaicError::Lookup(err)) => {
            assert_eq!(err.key().as_str(), "050000");
            assert!(matches!(err.cause(), LookupCause::Status(500)));
        }
        Ok(_) => panic!("expected the mosaic build to fail"),
        Err(other) => panic!("expected a lookup error, got: {other}"),
    }
}

#[tokio::test]
async fn test_empty_grid_aborts_before_any_lookup() {
    let resolver = MockResolver::new();
    let (calls, _) = resolver.counters();
    let pipeline = MosaicPipeline::new(resolver, DistributorConfig::default());
    let buffer = uniform_buffer(3, 3, [1, 2, 3, 255]);

    let result = pipeline.build_mosaic(&buffer, TileGeometry::new(4, 4)).await;

    assert!(matches!(result, Err(MosaicError::InvalidGeometry { .. })));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_each_invocation_is_independent() {
    let pipeline = MosaicPipeline::new(MockResolver::new(), DistributorConfig::default());
    let buffer = blocky_buffer(4, 4, 2);

    let first = pipeline
        .build_mosaic(&buffer, TileGeometry::new(2, 2))
        .await
        .unwrap();
    let second = pipeline
        .build_mosaic(&buffer, TileGeometry::new(2, 2))
        .await
        .unwrap();

    assert_eq!(first.tile_count(), second.tile_count());
    for row in 0..first.rows() {
        for column in 0..first.columns() {
            assert_eq!(
                first.get(row, column).unwrap().color_key(),
                second.get(row, column).unwrap().color_key()
            );
        }
    }
}

#[tokio::test]
async fn test_artifact_handles_transfer_to_caller() {
    let pipeline = MosaicPipeline::new(MockResolver::new(), DistributorConfig::default());
    let buffer = blocky_buffer(4, 2, 2);

    let grid = pipeline
        .build_mosaic(&buffer, TileGeometry::new(2, 2))
        .await
        .unwrap();

    let mut handles = Vec::new();
    for row in grid.into_rows() {
        for tile in row {
            let expected = format!("<svg fill=\"#{}\"/>", tile.color_key());
            let handle = tile.into_handle();
            assert_eq!(handle.content(), expected.as_bytes());
            handles.push(handle);
        }
    }

    // The caller releases handles after drawing; content stayed readable
    // until that point.
    assert_eq!(handles.len(), 2);
    for handle in handles {
        handle.release();
    }
}
