//! The mutable tile grid.
//!
//! Tiles are stored row-major (`index = y * width + x`). Coordinates are
//! signed so that callers can pass raw touch-derived values; anything outside
//! the grid is rejected before indexing.

use blockquest_types::BlockKind;

use crate::error::WorldError;

/// Fixed-size grid of [`BlockKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileWorld {
    /// Columns.
    width: u32,
    /// Rows.
    height: u32,
    /// Row-major tiles, always exactly `width * height` long.
    tiles: Vec<BlockKind>,
}

impl TileWorld {
    /// Create an all-empty world.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidDimensions`] if either side is zero or
    /// the tile count does not fit in `usize`.
    pub fn new(width: u32, height: u32) -> Result<Self, WorldError> {
        let len = tile_count(width, height)?;
        Ok(Self {
            width,
            height,
            tiles: vec![BlockKind::Empty; len],
        })
    }

    /// Rebuild a world from an existing tile sequence (used on restore).
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::TileCountMismatch`] if `tiles` is not exactly
    /// `width * height` long.
    pub fn from_tiles(width: u32, height: u32, tiles: Vec<BlockKind>) -> Result<Self, WorldError> {
        let expected = tile_count(width, height)?;
        if tiles.len() != expected {
            return Err(WorldError::TileCountMismatch {
                expected,
                found: tiles.len(),
            });
        }
        Ok(Self {
            width,
            height,
            tiles,
        })
    }

    /// Grid width in tiles.
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in tiles.
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// All tiles in row-major order.
    pub fn tiles(&self) -> &[BlockKind] {
        &self.tiles
    }

    /// Whether `(x, y)` lies inside the grid.
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        self.index_of(x, y).is_some()
    }

    /// Block at `(x, y)`, or [`BlockKind::Empty`] outside the grid.
    pub fn get(&self, x: i32, y: i32) -> BlockKind {
        self.index_of(x, y)
            .and_then(|idx| self.tiles.get(idx))
            .copied()
            .unwrap_or(BlockKind::Empty)
    }

    /// Overwrite a tile unconditionally. Returns the previous block.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::OutOfBounds`] for coordinates outside the grid.
    pub fn set(&mut self, x: i32, y: i32, block: BlockKind) -> Result<BlockKind, WorldError> {
        let err = self.out_of_bounds(x, y);
        let slot = self
            .index_of(x, y)
            .and_then(|idx| self.tiles.get_mut(idx))
            .ok_or(err)?;
        Ok(core::mem::replace(slot, block))
    }

    /// Clear a solid tile and return what was there.
    ///
    /// # Errors
    ///
    /// [`WorldError::OutOfBounds`] outside the grid, [`WorldError::TileEmpty`]
    /// if there is nothing to mine. The grid is unchanged on error.
    pub fn mine(&mut self, x: i32, y: i32) -> Result<BlockKind, WorldError> {
        self.ensure_in_bounds(x, y)?;
        if self.get(x, y) == BlockKind::Empty {
            return Err(WorldError::TileEmpty { x, y });
        }
        self.set(x, y, BlockKind::Empty)
    }

    /// Put `block` on an empty tile.
    ///
    /// # Errors
    ///
    /// [`WorldError::CannotPlaceEmpty`] for air, otherwise the same checks as
    /// [`TileWorld::ensure_vacant`]. The grid is unchanged on error.
    pub fn place(&mut self, x: i32, y: i32, block: BlockKind) -> Result<(), WorldError> {
        if block == BlockKind::Empty {
            return Err(WorldError::CannotPlaceEmpty);
        }
        self.ensure_vacant(x, y)?;
        self.set(x, y, block)?;
        Ok(())
    }

    /// Check that `(x, y)` is inside the grid.
    ///
    /// # Errors
    ///
    /// [`WorldError::OutOfBounds`] otherwise.
    pub fn ensure_in_bounds(&self, x: i32, y: i32) -> Result<(), WorldError> {
        if self.in_bounds(x, y) {
            Ok(())
        } else {
            Err(self.out_of_bounds(x, y))
        }
    }

    /// Check that `(x, y)` is inside the grid and empty.
    ///
    /// # Errors
    ///
    /// [`WorldError::OutOfBounds`] or [`WorldError::TileOccupied`].
    pub fn ensure_vacant(&self, x: i32, y: i32) -> Result<(), WorldError> {
        self.ensure_in_bounds(x, y)?;
        match self.get(x, y) {
            BlockKind::Empty => Ok(()),
            block => Err(WorldError::TileOccupied { x, y, block }),
        }
    }

    /// Number of tiles holding `block`.
    pub fn count(&self, block: BlockKind) -> usize {
        self.tiles.iter().filter(|tile| **tile == block).count()
    }

    /// Row-major index for in-range coordinates.
    fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        let col = u32::try_from(x).ok().filter(|col| *col < self.width)?;
        let row = u32::try_from(y).ok().filter(|row| *row < self.height)?;
        let row_start = usize::try_from(row)
            .ok()?
            .checked_mul(usize::try_from(self.width).ok()?)?;
        row_start.checked_add(usize::try_from(col).ok()?)
    }

    const fn out_of_bounds(&self, x: i32, y: i32) -> WorldError {
        WorldError::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        }
    }
}

/// `width * height` as a `usize`, rejecting degenerate sizes.
fn tile_count(width: u32, height: u32) -> Result<usize, WorldError> {
    let invalid = WorldError::InvalidDimensions { width, height };
    if width == 0 || height == 0 {
        return Err(invalid);
    }
    let w = usize::try_from(width).map_err(|_err| invalid.clone())?;
    let h = usize::try_from(height).map_err(|_err| invalid.clone())?;
    w.checked_mul(h).ok_or(invalid)
}
