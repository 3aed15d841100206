use std::fmt::{Display, Formatter};

use crate::{TerrainColor, WangId, WangPosition};

const SLOT_FREE: &str = "*";

/// Requirement at a single request position.
///
/// `Free` is distinct from `Color(0)`: a free slot matches any tile color,
/// while `Color(0)` requires the tile to carry no terrain at that position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Slot {
    /// No requirement; any tile color matches.
    #[default]
    Free,
    /// The tile must carry exactly this color.
    Color(TerrainColor),
}

impl Slot {
    /// Whether a tile color satisfies this slot.
    pub fn matches(self, color: TerrainColor) -> bool {
        match self {
            Slot::Free => true,
            Slot::Color(required) => required == color,
        }
    }

    /// True when this slot constrains the tile.
    pub fn is_constrained(self) -> bool {
        self != Slot::Free
    }
}

impl Display for Slot {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Slot::Free => write!(f, "{SLOT_FREE}"),
            Slot::Color(color) => write!(f, "{color}"),
        }
    }
}

/// Requested terrain pattern for one cell, position by position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct WangRequest([Slot; 8]);

impl WangRequest {
    /// Request with no constraints at any position.
    pub fn free() -> Self {
        Self([Slot::Free; 8])
    }

    /// Request constraining every position to the given Wang ID.
    pub fn exact(wang_id: WangId) -> Self {
        let mut slots = [Slot::Free; 8];
        for (slot, &color) in slots.iter_mut().zip(wang_id.colors()) {
            *slot = Slot::Color(color);
        }
        Self(slots)
    }

    /// Request from explicit slots in clockwise order from the top edge.
    pub fn new(slots: [Slot; 8]) -> Self {
        Self(slots)
    }

    /// Slot at a position.
    pub fn get(&self, position: WangPosition) -> Slot {
        self.0[position as usize]
    }

    /// Overwrite the slot at a position.
    pub fn set(&mut self, position: WangPosition, slot: Slot) {
        self.0[position as usize] = slot;
    }

    /// All eight slots in clockwise order from the top edge.
    pub fn slots(&self) -> &[Slot; 8] {
        &self.0
    }

    /// Number of constrained positions.
    pub fn constrained_len(&self) -> usize {
        self.0.iter().filter(|slot| slot.is_constrained()).count()
    }

    /// True when no position is constrained.
    pub fn is_free(&self) -> bool {
        self.constrained_len() == 0
    }

    /// The full Wang ID when every position is constrained.
    pub fn as_exact(&self) -> Option<WangId> {
        let mut colors = [0; 8];
        for (value, slot) in colors.iter_mut().zip(&self.0) {
            match slot {
                Slot::Color(color) => *value = *color,
                Slot::Free => return None,
            }
        }
        Some(WangId::new(colors))
    }

    /// Whether a tile signature agrees with every constrained position.
    pub fn matches(&self, wang_id: &WangId) -> bool {
        self.0
            .iter()
            .zip(wang_id.colors())
            .all(|(slot, &color)| slot.matches(color))
    }
}

impl Display for WangRequest {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        for (index, slot) in self.0.iter().enumerate() {
            if index > 0 {
                write!(f, ",")?;
            }
            write!(f, "{slot}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_request_has_no_constraints() {
        let request = WangRequest::free();
        assert_eq!(request.constrained_len(), 0);
        assert!(request.is_free());
        assert_eq!(request.as_exact(), None);
        assert!(request.matches(&WangId::filled(7)));
    }

    #[test]
    fn exact_request_round_trips() {
        let id: WangId = "1,0,1,0,1,0,0,0".parse().unwrap();
        let request = WangRequest::exact(id);
        assert_eq!(request.constrained_len(), 8);
        assert_eq!(request.as_exact(), Some(id));
        assert!(request.matches(&id));
        assert!(!request.matches(&WangId::filled(1)));
    }

    #[test]
    fn matching_checks_constrained_positions_only() {
        let mut request = WangRequest::free();
        request.set(WangPosition::Right, Slot::Color(1));
        request.set(WangPosition::Bottom, Slot::Color(1));

        assert!(request.matches(&WangId::filled(1)));
        assert!(request.matches(&"0,0,1,0,1,0,0,0".parse().unwrap()));
        assert!(!request.matches(&"0,0,2,0,1,0,0,0".parse().unwrap()));
    }

    #[test]
    fn color_zero_is_a_real_constraint() {
        let mut request = WangRequest::free();
        request.set(WangPosition::Top, Slot::Color(0));

        assert!(request.matches(&WangId::EMPTY));
        assert!(!request.matches(&WangId::filled(1)));
    }

    #[test]
    fn request_displays_free_slots_as_wildcards() {
        let mut request = WangRequest::free();
        request.set(WangPosition::TopRight, Slot::Color(2));
        assert_eq!(request.to_string(), "*,2,*,*,*,*,*,*");
    }
}
