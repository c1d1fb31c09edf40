//! Error types for the `blockquest-world` crate.
//!
//! All fallible operations in this crate return [`WorldError`] through the
//! standard [`Result`] type alias.

use blockquest_types::BlockKind;

/// Errors that can occur during tile-grid operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorldError {
    /// The coordinates fall outside the grid.
    #[error("tile ({x}, {y}) is outside the {width}x{height} world")]
    OutOfBounds {
        /// Requested column.
        x: i32,
        /// Requested row.
        y: i32,
        /// Grid width.
        width: u32,
        /// Grid height.
        height: u32,
    },

    /// Mining was requested on an empty tile.
    #[error("tile ({x}, {y}) is already empty")]
    TileEmpty {
        /// Column.
        x: i32,
        /// Row.
        y: i32,
    },

    /// Placing was requested on an occupied tile.
    #[error("tile ({x}, {y}) is occupied by {block:?}")]
    TileOccupied {
        /// Column.
        x: i32,
        /// Row.
        y: i32,
        /// The block already there.
        block: BlockKind,
    },

    /// Placing air is not a placement.
    #[error("cannot place an empty block")]
    CannotPlaceEmpty,

    /// Width or height is zero, or the tile count overflows.
    #[error("invalid world dimensions {width}x{height}")]
    InvalidDimensions {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// A tile sequence does not match `width * height`.
    #[error("expected {expected} tiles, found {found}")]
    TileCountMismatch {
        /// `width * height`.
        expected: usize,
        /// Length of the provided sequence.
        found: usize,
    },
}
