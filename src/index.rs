use fixedbitset::FixedBitSet;
use std::collections::HashMap;

use crate::{Slot, TerrainColor, WangCatalog, WangId, WangRequest};

/// Derived lookup structure over a catalog's Wang signatures.
///
/// Holds an exact map from full signatures to catalog slots, plus one
/// posting set per (position, color) pair so a partial request resolves by
/// intersecting the sets for its constrained positions instead of scanning
/// the whole catalog. Built once per catalog and read-only afterwards.
#[derive(Clone, Debug)]
pub struct WangIndex {
    exact: HashMap<WangId, Vec<usize>>,
    postings: [HashMap<TerrainColor, FixedBitSet>; 8],
    empty_slots: Vec<usize>,
    num_tiles: usize,
}

impl WangIndex {
    /// Indexes every descriptor in the catalog.
    pub fn build(catalog: &WangCatalog) -> Self {
        let num_tiles = catalog.len();
        let mut exact: HashMap<WangId, Vec<usize>> = HashMap::new();
        let mut postings: [HashMap<TerrainColor, FixedBitSet>; 8] =
            std::array::from_fn(|_| HashMap::new());
        let mut empty_slots = Vec::new();

        for (slot, descriptor) in catalog.descriptors().iter().enumerate() {
            exact.entry(descriptor.wang_id).or_default().push(slot);
            for (position, &color) in descriptor.wang_id.colors().iter().enumerate() {
                postings[position]
                    .entry(color)
                    .or_insert_with(|| FixedBitSet::with_capacity(num_tiles))
                    .insert(slot);
            }
            if descriptor.wang_id.is_empty() {
                empty_slots.push(slot);
            }
        }

        Self {
            exact,
            postings,
            empty_slots,
            num_tiles,
        }
    }

    /// Catalog slots whose full signature equals the key; empty if none.
    pub fn exact_match(&self, wang_id: &WangId) -> &[usize] {
        self.exact.get(wang_id).map_or(&[], Vec::as_slice)
    }

    /// Catalog slots agreeing with the request on every constrained position.
    ///
    /// A fully unconstrained request prefers the all-empty tiles when the
    /// catalog has any, and otherwise returns every slot.
    pub fn best_match(&self, request: &WangRequest) -> Vec<usize> {
        let mut masks: Vec<&FixedBitSet> = Vec::with_capacity(WangId::LEN);
        for (position, slot) in request.slots().iter().enumerate() {
            if let Slot::Color(color) = slot {
                match self.postings[position].get(color) {
                    Some(mask) => masks.push(mask),
                    // No tile carries this color here at all.
                    None => return Vec::new(),
                }
            }
        }

        if masks.is_empty() {
            if self.empty_slots.is_empty() {
                return (0..self.num_tiles).collect();
            }
            return self.empty_slots.clone();
        }

        // Intersect smallest-first so the candidate set shrinks early.
        masks.sort_by_key(|mask| mask.count_ones(..));
        let mut candidates = masks[0].clone();
        for &mask in &masks[1..] {
            candidates.intersect_with(mask);
            if candidates.is_clear() {
                break;
            }
        }
        candidates.ones().collect()
    }

    /// Number of tiles the index covers.
    pub fn len(&self) -> usize {
        self.num_tiles
    }

    /// True when the index covers no tiles.
    pub fn is_empty(&self) -> bool {
        self.num_tiles == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TileEntry, WangPosition};

    fn index_of(entries: Vec<TileEntry>) -> (WangCatalog, WangIndex) {
        let catalog = WangCatalog::load(entries).unwrap();
        let index = WangIndex::build(&catalog);
        (catalog, index)
    }

    #[test]
    fn exact_match_groups_identical_signatures() {
        let (_, index) = index_of(vec![
            TileEntry::new(0, [1, 0, 1, 0, 1, 0, 0, 0]),
            TileEntry::new(1, [1, 0, 1, 0, 1, 0, 0, 0]),
            TileEntry::new(2, [1; 8]),
        ]);

        let id: WangId = "1,0,1,0,1,0,0,0".parse().unwrap();
        assert_eq!(index.exact_match(&id), &[0, 1]);
        assert_eq!(index.exact_match(&WangId::filled(1)), &[2]);
        assert!(index.exact_match(&WangId::EMPTY).is_empty());
    }

    #[test]
    fn best_match_agrees_on_constrained_positions() {
        let (catalog, index) = index_of(vec![
            TileEntry::new(0, [1, 0, 1, 0, 1, 0, 0, 0]),
            TileEntry::new(1, [0, 0, 1, 1, 1, 0, 0, 0]),
            TileEntry::new(2, [1; 8]),
        ]);

        let mut request = WangRequest::free();
        request.set(WangPosition::Right, Slot::Color(1));
        request.set(WangPosition::Bottom, Slot::Color(1));

        let slots = index.best_match(&request);
        assert_eq!(slots, vec![0, 1, 2]);
        for slot in slots {
            assert!(request.matches(&catalog.descriptors()[slot].wang_id));
        }

        request.set(WangPosition::Top, Slot::Color(0));
        assert_eq!(index.best_match(&request), vec![0, 1]);
    }

    #[test]
    fn unknown_color_matches_nothing() {
        let (_, index) = index_of(vec![TileEntry::new(0, [1; 8])]);

        let mut request = WangRequest::free();
        request.set(WangPosition::Left, Slot::Color(9));
        assert!(index.best_match(&request).is_empty());
    }

    #[test]
    fn fully_free_request_prefers_empty_tiles() {
        let (_, index) = index_of(vec![
            TileEntry::new(0, [1; 8]),
            TileEntry::new(1, [0; 8]),
            TileEntry::new(2, [0; 8]),
        ]);
        assert_eq!(index.best_match(&WangRequest::free()), vec![1, 2]);
    }

    #[test]
    fn fully_free_request_falls_back_to_whole_catalog() {
        let (_, index) = index_of(vec![
            TileEntry::new(0, [1; 8]),
            TileEntry::new(1, [2; 8]),
        ]);
        assert_eq!(index.best_match(&WangRequest::free()), vec![0, 1]);
    }

    #[test]
    fn empty_catalog_yields_no_candidates() {
        let (_, index) = index_of(Vec::new());
        assert!(index.is_empty());
        assert!(index.best_match(&WangRequest::free()).is_empty());
        assert!(index.best_match(&WangRequest::exact(WangId::EMPTY)).is_empty());
    }
}
