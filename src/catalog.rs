use anyhow::{Context, Result};
use log::debug;
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;

use crate::error::CatalogError;
use crate::{TerrainColor, WangId};

/// Atlas index of a tile image.
pub type TileId = u32;

fn default_weight() -> f64 {
    1.0
}

/// Raw catalog entry, as supplied by the tileset parser or a catalog file.
///
/// Wang values are kept wide here so malformed input (wrong arity, negative
/// or oversized colors) is caught by [`WangCatalog::load`] validation rather
/// than by deserialization.
#[derive(Clone, Debug, Deserialize)]
pub struct TileEntry {
    /// Atlas index of the tile.
    pub tile: TileId,
    /// Wang ID values in clockwise order from the top edge.
    pub wang: Vec<i64>,
    /// Relative selection weight among equally good matches.
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Marks the canonical preview tile for the colors it carries.
    #[serde(default)]
    pub representative: bool,
}

impl TileEntry {
    /// Entry with the default weight and no representative marker.
    pub fn new(tile: TileId, wang: [TerrainColor; 8]) -> Self {
        Self {
            tile,
            wang: wang.iter().map(|&color| i64::from(color)).collect(),
            weight: default_weight(),
            representative: false,
        }
    }

    /// Same entry with an explicit selection weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }
}

/// Validated tile descriptor held by a catalog.
#[derive(Clone, Debug, PartialEq)]
pub struct TileDescriptor {
    /// Atlas index of the tile.
    pub tile_id: TileId,
    /// The tile's corner/edge terrain signature.
    pub wang_id: WangId,
    /// Relative selection weight among equally good matches.
    pub weight: f64,
}

#[derive(Deserialize)]
struct CatalogFile {
    tiles: Vec<TileEntry>,
}

/// Immutable, load-once collection of tile descriptors.
///
/// Safe to share read-only across any number of concurrent resolvers.
#[derive(Clone, Debug, Default)]
pub struct WangCatalog {
    tiles: Vec<TileDescriptor>,
    representatives: HashMap<TerrainColor, TileId>,
}

impl WangCatalog {
    /// Validates raw entries and builds the catalog.
    ///
    /// Fails with [`CatalogError::DuplicateTileId`] if two entries share a
    /// tile id, [`CatalogError::InvalidWangId`] if a Wang ID does not have
    /// exactly 8 in-range values, and [`CatalogError::InvalidWeight`] if a
    /// weight is not finite and positive.
    pub fn load(entries: Vec<TileEntry>) -> Result<Self, CatalogError> {
        let mut tiles = Vec::with_capacity(entries.len());
        let mut seen = HashSet::with_capacity(entries.len());
        let mut representatives = HashMap::new();

        for entry in entries {
            if !seen.insert(entry.tile) {
                return Err(CatalogError::DuplicateTileId(entry.tile));
            }
            let wang_id = validate_wang(entry.tile, &entry.wang)?;
            if !entry.weight.is_finite() || entry.weight <= 0.0 {
                return Err(CatalogError::InvalidWeight {
                    tile: entry.tile,
                    weight: entry.weight,
                });
            }
            if entry.representative {
                for &color in wang_id.colors() {
                    if color != 0 {
                        representatives.entry(color).or_insert(entry.tile);
                    }
                }
            }
            tiles.push(TileDescriptor {
                tile_id: entry.tile,
                wang_id,
                weight: entry.weight,
            });
        }

        debug!(
            "catalog loaded: {} tiles, {} representative colors",
            tiles.len(),
            representatives.len()
        );
        Ok(Self {
            tiles,
            representatives,
        })
    }

    /// Loads a catalog from its YAML text form.
    pub fn from_yaml(data: &str) -> Result<Self> {
        let file: CatalogFile =
            serde_yaml::from_str(data).context("Failed to parse catalog data")?;
        Ok(Self::load(file.tiles)?)
    }

    /// Loads a catalog from a YAML file.
    pub fn load_path(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file {}", path.display()))?;
        Self::from_yaml(&data)
    }

    /// Number of tiles in the catalog.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// True when the catalog holds no tiles.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// All descriptors, in load order.
    pub fn descriptors(&self) -> &[TileDescriptor] {
        &self.tiles
    }

    /// Descriptor for a tile id, if present.
    pub fn get(&self, tile_id: TileId) -> Option<&TileDescriptor> {
        self.tiles.iter().find(|tile| tile.tile_id == tile_id)
    }

    /// Sorted distinct non-zero colors appearing anywhere in the catalog.
    pub fn colors(&self) -> BTreeSet<TerrainColor> {
        self.tiles
            .iter()
            .flat_map(|tile| tile.wang_id.colors().iter().copied())
            .filter(|&color| color != 0)
            .collect()
    }

    /// Canonical preview tile for a color, if one was marked.
    ///
    /// Editor metadata only; resolution never consults it.
    pub fn representative(&self, color: TerrainColor) -> Option<TileId> {
        self.representatives.get(&color).copied()
    }
}

fn validate_wang(tile: TileId, values: &[i64]) -> Result<WangId, CatalogError> {
    if values.len() != WangId::LEN {
        return Err(CatalogError::InvalidWangId {
            tile,
            reason: format!("expected {} values, got {}", WangId::LEN, values.len()),
        });
    }

    let mut colors = [0; 8];
    for (slot, &value) in colors.iter_mut().zip(values) {
        if value < 0 {
            return Err(CatalogError::InvalidWangId {
                tile,
                reason: format!("negative value {value}"),
            });
        }
        if value > i64::from(TerrainColor::MAX) {
            return Err(CatalogError::InvalidWangId {
                tile,
                reason: format!("value {value} exceeds {}", TerrainColor::MAX),
            });
        }
        *slot = value as TerrainColor;
    }
    Ok(WangId::new(colors))
}
