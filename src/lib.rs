//! Photomosaic - photographic mosaic pipeline.
//!
//! Splits a source raster into a row-major grid of fixed-size tiles,
//! computes each tile's average color, fetches a color-keyed artifact for
//! every tile from an external lookup service through a fixed pool of
//! sequential workers, and reassembles the results into a dense ordered
//! grid ready for rendering.
//!
//! # High-Level API
//!
//! ```ignore
//! use photomosaic::distributor::DistributorConfig;
//! use photomosaic::partition::TileGeometry;
//! use photomosaic::pipeline::MosaicPipeline;
//! use photomosaic::raster::PixelBuffer;
//! use photomosaic::resolver::HttpArtifactResolver;
//!
//! let resolver = HttpArtifactResolver::new("http://localhost:8765/color")?;
//! let pipeline = MosaicPipeline::new(resolver, DistributorConfig::default());
//!
//! let buffer = PixelBuffer::from_image(&source_image);
//! let grid = pipeline
//!     .build_mosaic(&buffer, TileGeometry::new(16, 16))
//!     .await?;
//!
//! for row in grid.into_rows() {
//!     for tile in row {
//!         // Draw the tile at (tile.tile().x, tile.tile().y), then release
//!         // the artifact handle.
//!         tile.into_handle().release();
//!     }
//! }
//! ```

pub mod artifact;
pub mod color;
pub mod distributor;
pub mod error;
pub mod partition;
pub mod pipeline;
pub mod raster;
pub mod reassembly;
pub mod resolver;

/// Version of the photomosaic library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
