//! End-to-end mosaic pipeline orchestration.
//!
//! [`MosaicPipeline`] owns the partition → distribute → resolve → reassemble
//! flow behind a single asynchronous operation. Every invocation runs a
//! fresh state machine over fresh tiles; nothing persists across runs, and
//! no process-wide mutable state is involved - the resolver and
//! configuration are injected at construction.

use crate::distributor::{DistributorConfig, WorkDistributor};
use crate::error::MosaicError;
use crate::partition::{partition, TileGeometry};
use crate::raster::PixelBuffer;
use crate::reassembly::{MosaicGrid, Reassembler};
use crate::resolver::ArtifactResolver;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Phases of one `build_mosaic` invocation.
///
/// `Complete` and `Failed` are terminal; a new invocation starts over at
/// `Idle` with its own state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// No work started yet
    Idle,
    /// Splitting the buffer into tiles
    Partitioning,
    /// Resolving tile artifacts through the worker pool
    Resolving,
    /// Collecting resolved tiles into the grid
    Reassembling,
    /// The grid was handed to the caller
    Complete,
    /// The run aborted with an error
    Failed,
}

/// Orchestrates the mosaic pipeline over an artifact resolver.
pub struct MosaicPipeline<R>
where
    R: ArtifactResolver + 'static,
{
    distributor: WorkDistributor<R>,
}

impl<R> MosaicPipeline<R>
where
    R: ArtifactResolver + 'static,
{
    /// Creates a pipeline with the given resolver and configuration.
    pub fn new(resolver: R, config: DistributorConfig) -> Self {
        Self {
            distributor: WorkDistributor::new(Arc::new(resolver), config),
        }
    }

    /// Builds the mosaic grid for a buffer.
    ///
    /// Partitions the buffer, resolves every tile's artifact through the
    /// worker pool, and reassembles the results in row-major order. Fails
    /// without partial output when the derived grid is empty or any tile's
    /// lookup fails permanently.
    ///
    /// # Errors
    ///
    /// - [`MosaicError::InvalidGeometry`] if the image is smaller than a
    ///   single tile in either axis, before any resolution work starts
    /// - [`MosaicError::Lookup`] if a tile's artifact lookup fails after
    ///   the configured retries
    /// - [`MosaicError::Reassembly`] if the resolved tile set violates the
    ///   index integrity invariants
    pub async fn build_mosaic(
        &self,
        buffer: &PixelBuffer,
        geometry: TileGeometry,
    ) -> Result<MosaicGrid, MosaicError> {
        let mut state = PipelineState::Idle;

        match self.run(buffer, geometry, &mut state).await {
            Ok(grid) => {
                advance(&mut state, PipelineState::Complete);
                info!(
                    rows = grid.rows(),
                    columns = grid.columns(),
                    tiles = grid.tile_count(),
                    "Mosaic build complete"
                );
                Ok(grid)
            }
            Err(err) => {
                advance(&mut state, PipelineState::Failed);
                warn!(error = %err, "Mosaic build failed");
                Err(err)
            }
        }
    }

    async fn run(
        &self,
        buffer: &PixelBuffer,
        geometry: TileGeometry,
        state: &mut PipelineState,
    ) -> Result<MosaicGrid, MosaicError> {
        advance(state, PipelineState::Partitioning);
        let shape = geometry.grid_shape(buffer.width(), buffer.height());
        if shape.is_empty() {
            return Err(MosaicError::InvalidGeometry {
                image_width: buffer.width(),
                image_height: buffer.height(),
                tile_width: geometry.tile_width(),
                tile_height: geometry.tile_height(),
            });
        }
        let tiles = partition(buffer, geometry);
        let expected = tiles.len();

        advance(state, PipelineState::Resolving);
        let resolved = self.distributor.distribute(tiles).await?;

        advance(state, PipelineState::Reassembling);
        let mut reassembler = Reassembler::new(expected, shape.columns as usize);
        for tile in resolved {
            reassembler.insert(tile)?;
        }
        Ok(reassembler.into_grid()?)
    }
}

/// Logs and applies a state transition.
fn advance(state: &mut PipelineState, next: PipelineState) {
    debug!(from = ?state, to = ?next, "Pipeline state transition");
    *state = next;
}
