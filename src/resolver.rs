use rand::distr::weighted::WeightedIndex;
use rand::prelude::*;
use rand::rngs::SmallRng;

use crate::error::ResolveError;
use crate::{TileId, WangCatalog, WangIndex, WangRequest};

/// Stateless matching engine over one catalog.
///
/// Resolution is a pure function of the catalog, the request, and the seed:
/// the same three inputs always produce the same tile id.
pub struct Resolver<'a> {
    catalog: &'a WangCatalog,
    index: WangIndex,
}

impl<'a> Resolver<'a> {
    /// Builds the resolver and its index for a catalog.
    pub fn new(catalog: &'a WangCatalog) -> Self {
        Self {
            catalog,
            index: WangIndex::build(catalog),
        }
    }

    /// The catalog this resolver serves.
    pub fn catalog(&self) -> &WangCatalog {
        self.catalog
    }

    /// The derived index backing this resolver.
    pub fn index(&self) -> &WangIndex {
        &self.index
    }

    /// Selects the tile best matching the request.
    ///
    /// Exact signature matches are preferred; otherwise any tile agreeing
    /// with the request on every constrained position is a candidate. Ties
    /// are broken by a weighted draw seeded with `seed`; a lone candidate is
    /// returned without touching the randomness source.
    pub fn resolve(&self, request: &WangRequest, seed: u64) -> Result<TileId, ResolveError> {
        let candidates = self.candidates(request);
        match candidates.as_slice() {
            [] => Err(ResolveError::NoMatchingTile(*request)),
            &[slot] => Ok(self.catalog.descriptors()[slot].tile_id),
            slots => {
                let weights: Vec<f64> = slots
                    .iter()
                    .map(|&slot| self.catalog.descriptors()[slot].weight)
                    .collect();
                // Weights are validated positive at catalog load.
                let dist = WeightedIndex::new(&weights).unwrap();
                let mut rng = SmallRng::seed_from_u64(seed);
                let slot = slots[dist.sample(&mut rng)];
                Ok(self.catalog.descriptors()[slot].tile_id)
            }
        }
    }

    fn candidates(&self, request: &WangRequest) -> Vec<usize> {
        if let Some(wang_id) = request.as_exact() {
            let slots = self.index.exact_match(&wang_id);
            if !slots.is_empty() {
                return slots.to_vec();
            }
        }
        self.index.best_match(request)
    }
}
