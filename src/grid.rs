use anyhow::{Context, Result, bail};
use ndarray::Array2;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::TerrainColor;

/// 2D grid of per-cell terrain-color assignments.
///
/// Rows are stored top to bottom and indexed `(row, col)`. The text form is
/// one row per line of whitespace-separated colors, with blank lines and
/// `#` comments ignored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TerrainGrid {
    colors: Array2<TerrainColor>,
}

impl TerrainGrid {
    /// Grid from an existing color array.
    pub fn new(colors: Array2<TerrainColor>) -> Self {
        debug_assert!(
            !colors.is_empty(),
            "Terrain grid must contain at least one cell"
        );
        Self { colors }
    }

    /// Grid of the given `(rows, cols)` resolution filled with one color.
    pub fn from_elem(resolution: (usize, usize), color: TerrainColor) -> Self {
        debug_assert!(resolution.0 > 0, "Grid height must be greater than zero");
        debug_assert!(resolution.1 > 0, "Grid width must be greater than zero");
        Self {
            colors: Array2::from_elem(resolution, color),
        }
    }

    /// Parses the text form.
    pub fn from_str(data: &str) -> Result<Self> {
        let rows: Vec<Vec<TerrainColor>> = data
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|line| {
                line.split_whitespace()
                    .map(|token| {
                        token
                            .parse::<TerrainColor>()
                            .with_context(|| format!("Invalid terrain color `{token}`"))
                    })
                    .collect()
            })
            .collect::<Result<_>>()?;

        if rows.is_empty() {
            bail!("Terrain grid contains no rows");
        }
        let width = rows[0].len();
        for (index, row) in rows.iter().enumerate() {
            if row.len() != width {
                bail!(
                    "Row {index} has {} values, expected {width}",
                    row.len()
                );
            }
        }

        let height = rows.len();
        let colors =
            Array2::from_shape_vec((height, width), rows.into_iter().flatten().collect())
                .expect("Row lengths are checked above");
        Ok(Self::new(colors))
    }

    /// Reads a grid from a text file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read terrain grid {}", path.display()))?;
        Self::from_str(&data)
    }

    /// Writes the text form to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut file = File::create(path)
            .with_context(|| format!("Failed to create terrain grid {}", path.display()))?;
        write!(file, "{self}")?;
        Ok(())
    }

    /// Grid resolution as `(rows, cols)`.
    pub fn size(&self) -> (usize, usize) {
        self.colors.dim()
    }

    /// The underlying color array.
    pub fn colors(&self) -> &Array2<TerrainColor> {
        &self.colors
    }

    /// Color at `(row, col)`.
    pub fn get(&self, index: (usize, usize)) -> TerrainColor {
        debug_assert!(
            index.0 < self.colors.shape()[0],
            "Index out of bounds for grid height"
        );
        debug_assert!(
            index.1 < self.colors.shape()[1],
            "Index out of bounds for grid width"
        );
        self.colors[index]
    }

    /// Overwrites the color at `(row, col)`.
    pub fn set(&mut self, index: (usize, usize), color: TerrainColor) {
        debug_assert!(
            index.0 < self.colors.shape()[0],
            "Index out of bounds for grid height"
        );
        debug_assert!(
            index.1 < self.colors.shape()[1],
            "Index out of bounds for grid width"
        );
        self.colors[index] = color;
    }
}

impl Display for TerrainGrid {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let print_width = self
            .colors
            .iter()
            .copied()
            .max()
            .unwrap_or(0)
            .max(1)
            .ilog10() as usize
            + 1;
        for row in self.colors.rows() {
            for color in row.iter() {
                write!(f, "{color:print_width$} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_str_parses_rows_and_ignores_comments() {
        let grid = TerrainGrid::from_str(
            "# island\n\
             0 0 0\n\
             0 1 0\n\
             \n\
             0 0 0\n",
        )
        .unwrap();

        assert_eq!(grid.size(), (3, 3));
        assert_eq!(grid.get((1, 1)), 1);
        assert_eq!(grid.get((0, 0)), 0);
    }

    #[test]
    fn display_round_trips() {
        let mut grid = TerrainGrid::from_elem((2, 3), 0);
        grid.set((0, 2), 1);
        grid.set((1, 0), 2);

        let reparsed = TerrainGrid::from_str(&grid.to_string()).unwrap();
        assert_eq!(reparsed, grid);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        assert!(TerrainGrid::from_str("0 0 0\n0 0\n").is_err());
    }

    #[test]
    fn invalid_tokens_are_rejected() {
        assert!(TerrainGrid::from_str("0 x 0\n").is_err());
        assert!(TerrainGrid::from_str("0 -1 0\n").is_err());
        assert!(TerrainGrid::from_str("").is_err());
    }

    #[test]
    fn set_overwrites_a_cell() {
        let mut grid = TerrainGrid::from_elem((2, 2), 0);
        grid.set((1, 1), 5);
        assert_eq!(grid.get((1, 1)), 5);
        assert_eq!(grid.get((0, 1)), 0);
    }
}
