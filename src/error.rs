use thiserror::Error;

use crate::{TileId, WangRequest};

/// Errors raised while constructing a [`crate::WangCatalog`].
///
/// Construction errors are fatal: a catalog that fails any of these checks
/// cannot safely serve requests, so the load aborts entirely.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// Two descriptors share the same tile id.
    #[error("duplicate tile id {0}")]
    DuplicateTileId(TileId),

    /// A Wang ID did not have exactly 8 values, or a value was out of range.
    #[error("invalid wang id for tile {tile}: {reason}")]
    InvalidWangId {
        /// Tile the malformed Wang ID belongs to.
        tile: TileId,
        /// What was wrong with it.
        reason: String,
    },

    /// A selection weight was zero, negative, or not finite.
    #[error("invalid weight {weight} for tile {tile}")]
    InvalidWeight {
        /// Tile the weight belongs to.
        tile: TileId,
        /// The offending weight.
        weight: f64,
    },
}

/// Error parsing a [`crate::WangId`] from its comma-separated text form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed wang id `{0}`")]
pub struct ParseWangIdError(pub(crate) String);

/// Errors raised while resolving a single request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// No catalog tile agrees with the request on its constrained positions.
    #[error("no tile matches request {0}")]
    NoMatchingTile(WangRequest),
}
