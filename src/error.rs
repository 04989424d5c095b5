//! Crate-level error type.

use crate::reassembly::ReassemblyIntegrityError;
use crate::resolver::ArtifactLookupError;
use thiserror::Error;

/// Errors surfaced by the mosaic pipeline.
#[derive(Debug, Error)]
pub enum MosaicError {
    /// The derived grid has zero rows or columns: the image is smaller than
    /// a single tile in at least one axis.
    #[error(
        "invalid tile geometry: {tile_width}x{tile_height} tiles derive an empty grid \
         from a {image_width}x{image_height} image"
    )]
    InvalidGeometry {
        image_width: u32,
        image_height: u32,
        tile_width: u32,
        tile_height: u32,
    },

    /// A tile's artifact lookup failed permanently.
    #[error(transparent)]
    Lookup(#[from] ArtifactLookupError),

    /// The resolved tile set had a duplicate or missing index.
    #[error(transparent)]
    Reassembly(#[from] ReassemblyIntegrityError),
}
