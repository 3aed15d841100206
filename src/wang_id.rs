use std::fmt::{Display, Formatter};
use std::ops::Index;
use std::str::FromStr;

use crate::error::ParseWangIdError;

/// Terrain class identifier. Color 0 is reserved for "no terrain".
pub type TerrainColor = u8;

/// The eight positions around a tile, clockwise from the top edge.
///
/// Even discriminants are edges, odd discriminants are corners:
///
/// ```text
///   7|0|1
///   6|X|2
///   5|4|3
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum WangPosition {
    /// Top edge.
    Top = 0,
    /// Top-right corner.
    TopRight = 1,
    /// Right edge.
    Right = 2,
    /// Bottom-right corner.
    BottomRight = 3,
    /// Bottom edge.
    Bottom = 4,
    /// Bottom-left corner.
    BottomLeft = 5,
    /// Left edge.
    Left = 6,
    /// Top-left corner.
    TopLeft = 7,
}

impl WangPosition {
    /// Position for an index, wrapping modulo 8.
    pub fn from_index(index: usize) -> Self {
        match index % 8 {
            0 => WangPosition::Top,
            1 => WangPosition::TopRight,
            2 => WangPosition::Right,
            3 => WangPosition::BottomRight,
            4 => WangPosition::Bottom,
            5 => WangPosition::BottomLeft,
            6 => WangPosition::Left,
            _ => WangPosition::TopLeft,
        }
    }

    /// The position on the far side of the tile, facing a neighbour.
    pub fn opposite(self) -> Self {
        Self::from_index(self as usize + 4)
    }

    /// Next position clockwise.
    pub fn next(self) -> Self {
        Self::from_index(self as usize + 1)
    }

    /// Previous position, counter-clockwise.
    pub fn prev(self) -> Self {
        Self::from_index(self as usize + 7)
    }

    /// True for the four corner positions.
    pub fn is_corner(self) -> bool {
        (self as u8) % 2 == 1
    }

    /// True for the four edge positions.
    pub fn is_edge(self) -> bool {
        !self.is_corner()
    }
}

/// Ordered terrain colors at a tile's eight corner/edge positions.
///
/// The order is the source format's: top, top-right, right, bottom-right,
/// bottom, bottom-left, left, top-left. Length is always exactly 8 by
/// construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct WangId([TerrainColor; 8]);

impl WangId {
    /// Number of positions in every Wang ID.
    pub const LEN: usize = 8;

    /// The all-zero Wang ID: no terrain anywhere.
    pub const EMPTY: Self = WangId([0; 8]);

    /// Wang ID from explicit colors in clockwise order from the top edge.
    pub fn new(colors: [TerrainColor; 8]) -> Self {
        Self(colors)
    }

    /// Wang ID with every position set to the same color.
    pub fn filled(color: TerrainColor) -> Self {
        Self([color; 8])
    }

    /// Color at a position.
    pub fn get(&self, position: WangPosition) -> TerrainColor {
        self.0[position as usize]
    }

    /// Overwrite the color at a position.
    pub fn set(&mut self, position: WangPosition, color: TerrainColor) {
        self.0[position as usize] = color;
    }

    /// All eight colors in clockwise order from the top edge.
    pub fn colors(&self) -> &[TerrainColor; 8] {
        &self.0
    }

    /// The four corner colors, clockwise from top-right.
    pub fn corners(&self) -> [TerrainColor; 4] {
        [self.0[1], self.0[3], self.0[5], self.0[7]]
    }

    /// The four edge colors, clockwise from the top.
    pub fn edges(&self) -> [TerrainColor; 4] {
        [self.0[0], self.0[2], self.0[4], self.0[6]]
    }

    /// True if no position carries any terrain.
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&color| color == 0)
    }
}

impl Index<WangPosition> for WangId {
    type Output = TerrainColor;

    fn index(&self, position: WangPosition) -> &Self::Output {
        &self.0[position as usize]
    }
}

impl Display for WangId {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        for (index, color) in self.0.iter().enumerate() {
            if index > 0 {
                write!(f, ",")?;
            }
            write!(f, "{color}")?;
        }
        Ok(())
    }
}

impl FromStr for WangId {
    type Err = ParseWangIdError;

    /// Parses the source format's comma-separated notation, e.g. `"0,0,1,0,1,0,0,0"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != Self::LEN {
            return Err(ParseWangIdError(s.to_string()));
        }

        let mut colors = [0; 8];
        for (slot, part) in colors.iter_mut().zip(&parts) {
            let value: i64 = part.parse().map_err(|_| ParseWangIdError(s.to_string()))?;
            if !(0..=i64::from(TerrainColor::MAX)).contains(&value) {
                return Err(ParseWangIdError(s.to_string()));
            }
            *slot = value as TerrainColor;
        }
        Ok(Self(colors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_oppose_across_the_tile() {
        assert_eq!(WangPosition::Top.opposite(), WangPosition::Bottom);
        assert_eq!(WangPosition::TopRight.opposite(), WangPosition::BottomLeft);
        assert_eq!(WangPosition::Left.opposite(), WangPosition::Right);
        assert_eq!(WangPosition::TopLeft.opposite(), WangPosition::BottomRight);
    }

    #[test]
    fn positions_cycle_clockwise() {
        assert_eq!(WangPosition::Top.next(), WangPosition::TopRight);
        assert_eq!(WangPosition::TopLeft.next(), WangPosition::Top);
        assert_eq!(WangPosition::Top.prev(), WangPosition::TopLeft);
        assert_eq!(WangPosition::Right.prev(), WangPosition::TopRight);
    }

    #[test]
    fn corners_are_odd_positions() {
        assert!(WangPosition::TopRight.is_corner());
        assert!(WangPosition::BottomLeft.is_corner());
        assert!(WangPosition::Top.is_edge());
        assert!(WangPosition::Left.is_edge());
    }

    #[test]
    fn filled_sets_every_position() {
        let id = WangId::filled(3);
        assert_eq!(id.colors(), &[3; 8]);
        assert!(!id.is_empty());
        assert!(WangId::EMPTY.is_empty());
        assert!(WangId::filled(0).is_empty());
    }

    #[test]
    fn corner_and_edge_projections() {
        let id: WangId = "1,2,3,4,5,6,7,8".parse().unwrap();
        assert_eq!(id.edges(), [1, 3, 5, 7]);
        assert_eq!(id.corners(), [2, 4, 6, 8]);
        assert_eq!(id[WangPosition::Right], 3);
        assert_eq!(id.get(WangPosition::TopLeft), 8);
    }

    #[test]
    fn parse_round_trips_through_display() {
        let text = "0,0,1,0,1,0,0,0";
        let id: WangId = text.parse().unwrap();
        assert_eq!(id.get(WangPosition::Right), 1);
        assert_eq!(id.get(WangPosition::Bottom), 1);
        assert_eq!(id.get(WangPosition::Top), 0);
        assert_eq!(id.to_string(), text);
    }

    #[test]
    fn parse_rejects_wrong_arity() {
        assert!("1,2,3".parse::<WangId>().is_err());
        assert!("1,1,1,1,1,1,1,1,1".parse::<WangId>().is_err());
    }

    #[test]
    fn parse_rejects_out_of_range_values() {
        assert!("-1,0,0,0,0,0,0,0".parse::<WangId>().is_err());
        assert!("300,0,0,0,0,0,0,0".parse::<WangId>().is_err());
        assert!("a,0,0,0,0,0,0,0".parse::<WangId>().is_err());
    }
}
