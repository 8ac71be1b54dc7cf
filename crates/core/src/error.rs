//! Error types for the board simulation

use thiserror::Error;

use crate::types::Pos;

/// Result type for core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the core
///
/// Player-facing rejections are not errors; they travel as
/// [`SwapRejectReason`](crate::types::SwapRejectReason) on a `SwapRejected` event.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Coordinates outside the grid (programmer error)
    #[error("position {pos} is outside the {width}x{height} grid")]
    OutOfBounds { pos: Pos, width: u8, height: u8 },

    /// A tile kind has no catalog entry, or the catalog size disagrees with the configuration
    #[error("catalog mismatch: catalog has {expected} entries, {actual} tile kinds required")]
    CatalogMismatch { expected: usize, actual: usize },

    /// Rejected session configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A cascade exceeded its pass cap and was forced stable
    #[error("cascade did not settle after {passes} passes (cap {cap})")]
    CascadeOverrun { passes: u32, cap: u32 },
}
