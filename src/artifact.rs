//! Resolved tiles and caller-released artifact handles.

use crate::color::ColorKey;
use crate::partition::Tile;
use bytes::Bytes;

/// Opaque handle to fetched artifact content, released by the renderer.
///
/// Ownership transfers to whichever caller ultimately draws the tile. The
/// pipeline never revokes a handle it has handed out, and the content stays
/// readable until every reference to the underlying buffer is gone. Call
/// [`release`](Self::release) once the tile has been drawn; dropping the
/// handle without releasing it is equivalent and equally safe.
#[derive(Debug)]
pub struct ArtifactHandle {
    id: u64,
    content: Bytes,
}

impl ArtifactHandle {
    fn new(id: u64, content: Bytes) -> Self {
        Self { id, content }
    }

    /// Stable identifier for this handle (the owning tile's index).
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The artifact content this handle keeps alive.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Releases the handle after the tile has been drawn.
    ///
    /// Exists to make the hand-over contract explicit at call sites.
    pub fn release(self) {}
}

/// A tile whose artifact has been fetched.
///
/// Created only after a successful artifact lookup. Carries the source tile,
/// the raw artifact content, and the [`ArtifactHandle`] whose ownership the
/// grid transfers to the rendering caller.
#[derive(Debug)]
pub struct ResolvedTile {
    tile: Tile,
    content: Bytes,
    handle: ArtifactHandle,
}

impl ResolvedTile {
    /// Pairs a tile with its fetched artifact content.
    pub fn new(tile: Tile, content: Bytes) -> Self {
        let handle = ArtifactHandle::new(tile.index as u64, content.clone());
        Self {
            tile,
            content,
            handle,
        }
    }

    /// The source tile.
    pub fn tile(&self) -> &Tile {
        &self.tile
    }

    /// The tile's stable row-major index.
    pub fn index(&self) -> usize {
        self.tile.index
    }

    /// The tile's lookup key.
    pub fn color_key(&self) -> &ColorKey {
        &self.tile.color_key
    }

    /// The fetched artifact content.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Borrows the artifact handle without transferring ownership.
    pub fn handle(&self) -> &ArtifactHandle {
        &self.handle
    }

    /// Transfers the artifact handle to the rendering caller.
    pub fn into_handle(self) -> ArtifactHandle {
        self.handle
    }
}
