//! Index-keyed collection of resolved tiles and grid reshaping.
//!
//! Workers finish at different times and report whole chunks, so resolved
//! tiles may arrive batched, interleaved, or out of order across workers.
//! The [`Reassembler`] collects arrivals by stable tile index and, once
//! every expected tile is present, reshapes the flat sequence into the
//! row-major [`MosaicGrid`] - exactly inverting the partitioner's
//! flattening.

use crate::artifact::ResolvedTile;
use thiserror::Error;
use tracing::debug;

/// Integrity violations in the resolved tile set.
///
/// These indicate distributor bugs rather than recoverable conditions, but
/// are checked defensively so a broken run can never hand back a sparse or
/// double-filled grid.
#[derive(Debug, Error)]
pub enum ReassemblyIntegrityError {
    /// The same tile index arrived twice.
    #[error("duplicate tile index {index}")]
    DuplicateIndex { index: usize },

    /// A tile index beyond the expected range arrived.
    #[error("tile index {index} out of range for {expected} tiles")]
    IndexOutOfRange { index: usize, expected: usize },

    /// Completion was requested with a tile still missing.
    #[error("tile index {index} missing ({resolved} of {expected} tiles resolved)")]
    MissingIndex {
        index: usize,
        resolved: usize,
        expected: usize,
    },
}

/// Collects resolved tiles by stable index, tolerating any arrival order.
pub struct Reassembler {
    columns: usize,
    slots: Vec<Option<ResolvedTile>>,
    resolved: usize,
}

impl Reassembler {
    /// Creates a collector expecting `expected` tiles arranged in rows of
    /// `columns`.
    pub fn new(expected: usize, columns: usize) -> Self {
        let mut slots = Vec::with_capacity(expected);
        slots.resize_with(expected, || None);
        Self {
            columns,
            slots,
            resolved: 0,
        }
    }

    /// Files a resolved tile under its index.
    ///
    /// # Errors
    ///
    /// Fails fast on a duplicate or out-of-range index.
    pub fn insert(&mut self, tile: ResolvedTile) -> Result<(), ReassemblyIntegrityError> {
        let index = tile.index();
        if index >= self.slots.len() {
            return Err(ReassemblyIntegrityError::IndexOutOfRange {
                index,
                expected: self.slots.len(),
            });
        }
        let slot = &mut self.slots[index];
        if slot.is_some() {
            return Err(ReassemblyIntegrityError::DuplicateIndex { index });
        }
        *slot = Some(tile);
        self.resolved += 1;
        Ok(())
    }

    /// Number of tiles collected so far.
    pub fn resolved(&self) -> usize {
        self.resolved
    }

    /// True once every expected tile has arrived.
    pub fn is_complete(&self) -> bool {
        self.resolved == self.slots.len()
    }

    /// Reshapes the collected tiles into the dense row-major grid.
    ///
    /// # Errors
    ///
    /// Fails with [`ReassemblyIntegrityError::MissingIndex`] if any tile is
    /// still absent - a partial grid is never produced.
    pub fn into_grid(self) -> Result<MosaicGrid, ReassemblyIntegrityError> {
        let expected = self.slots.len();

        if let Some(index) = self.slots.iter().position(Option::is_none) {
            return Err(ReassemblyIntegrityError::MissingIndex {
                index,
                resolved: self.resolved,
                expected,
            });
        }

        let mut rows = Vec::new();
        if self.columns > 0 {
            let mut row = Vec::with_capacity(self.columns);
            for tile in self.slots.into_iter().flatten() {
                row.push(tile);
                if row.len() == self.columns {
                    rows.push(std::mem::replace(
                        &mut row,
                        Vec::with_capacity(self.columns),
                    ));
                }
            }
            if !row.is_empty() {
                rows.push(row);
            }
        }

        debug!(
            rows = rows.len(),
            columns = self.columns,
            "Reassembled tiles into mosaic grid"
        );

        Ok(MosaicGrid {
            columns: self.columns,
            rows,
        })
    }
}

/// Collects an unordered batch of resolved tiles into a grid in one call.
///
/// The expected tile count is taken from the input length; duplicate
/// indices fail fast as in [`Reassembler::insert`].
pub fn reassemble(
    tiles: Vec<ResolvedTile>,
    columns: usize,
) -> Result<MosaicGrid, ReassemblyIntegrityError> {
    let mut reassembler = Reassembler::new(tiles.len(), columns);
    for tile in tiles {
        reassembler.insert(tile)?;
    }
    reassembler.into_grid()
}

/// Dense row-major grid of resolved tiles, ready for rendering.
///
/// Invariant: `grid[r][c].index == r * columns + c` for every cell, with no
/// holes, before the grid is ever handed to a caller.
#[derive(Debug)]
pub struct MosaicGrid {
    columns: usize,
    rows: Vec<Vec<ResolvedTile>>,
}

impl MosaicGrid {
    /// Number of tile rows.
    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of tile columns.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Total number of tiles.
    pub fn tile_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    /// The tile at `(row, column)`, or `None` outside the grid.
    pub fn get(&self, row: usize, column: usize) -> Option<&ResolvedTile> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    /// Iterates rows top to bottom as slices.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[ResolvedTile]> {
        self.rows.iter().map(|row| row.as_slice())
    }

    /// Consumes the grid into its rows, transferring every tile's artifact
    /// handle to the caller.
    pub fn into_rows(self) -> Vec<Vec<ResolvedTile>> {
        self.rows
    }
}
