use indicatif::{ProgressBar, ProgressStyle};
use log::warn;
use ndarray::Array2;
use rayon::prelude::*;

use crate::error::ResolveError;
use crate::{Resolver, Slot, TerrainGrid, TileId, WangPosition, WangRequest};

/// Neighbour `(row, col)` deltas in clockwise Wang-position order, with row 0
/// at the top of the grid.
const NEIGHBOUR_DELTAS: [(isize, isize); 8] = [
    (-1, 0),  // Top
    (-1, 1),  // TopRight
    (0, 1),   // Right
    (1, 1),   // BottomRight
    (1, 0),   // Bottom
    (1, -1),  // BottomLeft
    (0, -1),  // Left
    (-1, -1), // TopLeft
];

/// Per-cell resolution failure recorded during a grid pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellDiagnostic {
    /// Row of the failed cell.
    pub row: usize,
    /// Column of the failed cell.
    pub col: usize,
    /// The failure itself.
    pub error: ResolveError,
}

/// Result of resolving a full terrain grid.
#[derive(Clone, Debug)]
pub struct GridOutcome {
    /// Chosen tile for every cell, same resolution as the input grid.
    pub tiles: Array2<TileId>,
    /// Cells that fell back, in row-major order.
    pub diagnostics: Vec<CellDiagnostic>,
}

/// Orchestrates a resolver across a 2D terrain grid.
///
/// Cells that no catalog tile can satisfy receive the fallback tile and a
/// diagnostic instead of aborting the pass.
pub struct GridAutotiler<'a> {
    resolver: &'a Resolver<'a>,
    fallback_tile: TileId,
}

impl<'a> GridAutotiler<'a> {
    /// Autotiler substituting `fallback_tile` wherever resolution fails.
    pub fn new(resolver: &'a Resolver<'a>, fallback_tile: TileId) -> Self {
        Self {
            resolver,
            fallback_tile,
        }
    }

    /// The fallback tile substituted on unmatched cells.
    pub fn fallback_tile(&self) -> TileId {
        self.fallback_tile
    }

    /// Resolves every cell of the terrain grid to a tile id.
    ///
    /// Rows are resolved in parallel; each cell's randomness derives only
    /// from `(seed, row, col)`, so the outcome is independent of scheduling
    /// and identical across runs for the same inputs.
    pub fn resolve_grid(&self, terrain: &TerrainGrid, seed: u64) -> GridOutcome {
        let (height, width) = terrain.size();

        let pb = ProgressBar::new((height * width) as u64);
        pb.set_style(
            ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} cells")
                .unwrap()
                .progress_chars("##-"),
        );

        let rows: Vec<(Vec<TileId>, Vec<CellDiagnostic>)> = (0..height)
            .into_par_iter()
            .map(|row| {
                let mut tiles = Vec::with_capacity(width);
                let mut diagnostics = Vec::new();
                for col in 0..width {
                    let request = request_for_cell(terrain, row, col);
                    match self.resolver.resolve(&request, cell_seed(seed, row, col)) {
                        Ok(tile_id) => tiles.push(tile_id),
                        Err(error) => {
                            warn!(
                                "cell ({row}, {col}) fell back to tile {}: {error}",
                                self.fallback_tile
                            );
                            diagnostics.push(CellDiagnostic { row, col, error });
                            tiles.push(self.fallback_tile);
                        }
                    }
                    pb.inc(1);
                }
                (tiles, diagnostics)
            })
            .collect();

        pb.finish_and_clear();

        // Reassemble in row-major order so output and diagnostics are stable.
        let mut flat = Vec::with_capacity(height * width);
        let mut diagnostics = Vec::new();
        for (row_tiles, row_diagnostics) in rows {
            flat.extend(row_tiles);
            diagnostics.extend(row_diagnostics);
        }
        let tiles = Array2::from_shape_vec((height, width), flat)
            .expect("Failed to create tile array");

        GridOutcome { tiles, diagnostics }
    }
}

/// Builds the Wang request for one cell from its eight neighbours.
///
/// Each neighbour's terrain color fills the matching clockwise position;
/// out-of-bounds neighbours leave their position free rather than forcing a
/// match against an artificial void terrain.
pub fn request_for_cell(terrain: &TerrainGrid, row: usize, col: usize) -> WangRequest {
    let (height, width) = terrain.size();
    let mut request = WangRequest::free();

    for (index, (delta_row, delta_col)) in NEIGHBOUR_DELTAS.iter().enumerate() {
        let neighbour_row = match row.checked_add_signed(*delta_row) {
            Some(value) if value < height => value,
            _ => continue,
        };
        let neighbour_col = match col.checked_add_signed(*delta_col) {
            Some(value) if value < width => value,
            _ => continue,
        };
        request.set(
            WangPosition::from_index(index),
            Slot::Color(terrain.get((neighbour_row, neighbour_col))),
        );
    }
    request
}

// splitmix64 finaliser over the mixed coordinates, so per-cell draws are
// independent of the order rows are scheduled in.
fn cell_seed(seed: u64, row: usize, col: usize) -> u64 {
    let mut z = seed
        ^ (row as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ (col as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
