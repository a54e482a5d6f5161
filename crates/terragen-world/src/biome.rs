//! Voronoi biome classification.
//!
//! The world is partitioned into square zones of 40 chunks (640 blocks)
//! per side. Each zone deterministically owns up to ten biome sites whose
//! positions and kinds are derived from the permutation tables. A column's
//! biome is the biome of the nearest site across the containing zone and
//! its eight neighbors. Nothing is cached: every query rebuilds the
//! surrounding sites, so classification is stateless and safe to run from
//! any number of threads.

use crate::noise::{fold24, PermutationTable};

/// Zone edge length in chunks.
const CHUNKS_PER_ZONE: i32 = 40;

/// Zone edge length in world units.
const ZONE_SIZE_BLOCKS: i32 = CHUNKS_PER_ZONE * 16;

/// Upper bound on sites per zone.
const MAX_SITES: usize = 10;

/// Named biomes, carrying the client protocol id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Biome {
    Ocean = 0,
    Plains = 1,
    Desert = 2,
    Forest = 4,
    Taiga = 5,
    Swamp = 6,
    IcePlains = 12,
    Jungle = 21,
    BirchForest = 27,
}

impl Biome {
    /// Map a raw site id to a biome. Ids outside `0..=8` fall back to
    /// Plains.
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Biome::Ocean,
            1 => Biome::Plains,
            2 => Biome::Desert,
            3 => Biome::Forest,
            4 => Biome::Taiga,
            5 => Biome::Swamp,
            6 => Biome::IcePlains,
            7 => Biome::Jungle,
            8 => Biome::BirchForest,
            _ => Biome::Plains,
        }
    }

    /// Id sent to the client in biome data.
    pub fn protocol_id(self) -> u8 {
        self as u8
    }

    /// Human-readable name, for logs.
    pub fn name(self) -> &'static str {
        match self {
            Biome::Ocean => "ocean",
            Biome::Plains => "plains",
            Biome::Desert => "desert",
            Biome::Forest => "forest",
            Biome::Taiga => "taiga",
            Biome::Swamp => "swamp",
            Biome::IcePlains => "ice_plains",
            Biome::Jungle => "jungle",
            Biome::BirchForest => "birch_forest",
        }
    }
}

/// One zone's worth of sites, rebuilt on every query and discarded.
struct Zone {
    x: [i32; MAX_SITES],
    z: [i32; MAX_SITES],
    raw: [u8; MAX_SITES],
    count: usize,
}

/// Stateless Voronoi classifier over the two permutation tables.
pub struct BiomeSelector<'t> {
    primary: &'t PermutationTable,
    jitter: &'t PermutationTable,
}

impl<'t> BiomeSelector<'t> {
    pub fn new(primary: &'t PermutationTable, jitter: &'t PermutationTable) -> Self {
        Self { primary, jitter }
    }

    /// Classify the column at world coordinates (x, z).
    pub fn select(&self, x: f64, z: f64) -> Biome {
        let zone_x = (x / ZONE_SIZE_BLOCKS as f64).floor() as i32;
        let zone_z = (z / ZONE_SIZE_BLOCKS as f64).floor() as i32;

        // No site in any surrounding zone leaves the raw id at 0 (ocean).
        let mut raw = 0u8;
        let mut best = f64::INFINITY;
        for zx in (zone_x - 1)..=(zone_x + 1) {
            for zz in (zone_z - 1)..=(zone_z + 1) {
                let zone = self.zone(zx, zz);
                for k in 0..zone.count {
                    let site_x = zone.x[k] as f64 + zx as f64 * ZONE_SIZE_BLOCKS as f64;
                    let site_z = zone.z[k] as f64 + zz as f64 * ZONE_SIZE_BLOCKS as f64;
                    let d = distance(x, z, site_x, site_z);
                    // Strict comparison: the first site at the minimum
                    // distance wins.
                    if d < best {
                        best = d;
                        raw = zone.raw[k];
                    }
                }
            }
        }

        Biome::from_raw(raw)
    }

    /// Materialize the sites of the zone at (zone_x, zone_z).
    fn zone(&self, zone_x: i32, zone_z: i32) -> Zone {
        let mut zone = Zone {
            x: [0; MAX_SITES],
            z: [0; MAX_SITES],
            raw: [0; MAX_SITES],
            count: self.primary.get(fold24(zone_x ^ zone_z)) / 26,
        };
        // Each channel mixes the site index and zone coordinates with its
        // own multiplier/offset triple before the fold.
        for k in 0..zone.count {
            let i = k as i32;
            let mix_x = (i.wrapping_mul(53).wrapping_sub(11))
                ^ (zone_x.wrapping_mul(173).wrapping_sub(37))
                ^ (zone_z.wrapping_mul(59).wrapping_sub(43));
            let mix_z = (i.wrapping_mul(97).wrapping_sub(2))
                ^ (zone_x.wrapping_mul(131).wrapping_sub(17))
                ^ (zone_z.wrapping_mul(29).wrapping_sub(89));
            let mix_raw = (i.wrapping_mul(29).wrapping_sub(5))
                ^ (zone_x.wrapping_mul(239).wrapping_sub(177))
                ^ (zone_z.wrapping_mul(61).wrapping_sub(91));
            zone.x[k] = self.jitter.get(fold24(mix_x)) as i32 % ZONE_SIZE_BLOCKS;
            zone.z[k] = self.jitter.get(fold24(mix_z)) as i32 % ZONE_SIZE_BLOCKS;
            zone.raw[k] = (self.jitter.get(fold24(mix_raw)) % 9) as u8;
        }
        zone
    }
}

fn distance(x1: f64, z1: f64, x2: f64, z2: f64) -> f64 {
    ((x1 - x2) * (x1 - x2) + (z1 - z2) * (z1 - z2)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables() -> (PermutationTable, PermutationTable) {
        (PermutationTable::new(42), PermutationTable::new(1042))
    }

    #[test]
    fn selection_is_idempotent() {
        let (primary, jitter) = tables();
        let selector = BiomeSelector::new(&primary, &jitter);
        for i in 0..200 {
            let x = i as f64 * 37.5 - 2000.0;
            let z = i as f64 * 53.25 - 1500.0;
            assert_eq!(
                selector.select(x, z),
                selector.select(x, z),
                "biome mismatch at ({x}, {z})"
            );
        }
    }

    #[test]
    fn always_a_named_biome() {
        let (primary, jitter) = tables();
        let selector = BiomeSelector::new(&primary, &jitter);
        let named = [0u8, 1, 2, 4, 5, 6, 12, 21, 27];
        for i in 0..500 {
            let x = i as f64 * 91.0 - 10000.0;
            let z = i as f64 * 73.0 - 10000.0;
            let id = selector.select(x, z).protocol_id();
            assert!(named.contains(&id), "unexpected protocol id {id}");
        }
    }

    #[test]
    fn raw_id_fallback_is_plains() {
        for raw in 9u8..=255 {
            assert_eq!(Biome::from_raw(raw), Biome::Plains);
        }
        assert_eq!(Biome::from_raw(0), Biome::Ocean);
        assert_eq!(Biome::from_raw(8), Biome::BirchForest);
    }

    #[test]
    fn protocol_ids_match_client_registry() {
        assert_eq!(Biome::Ocean.protocol_id(), 0);
        assert_eq!(Biome::Plains.protocol_id(), 1);
        assert_eq!(Biome::Desert.protocol_id(), 2);
        assert_eq!(Biome::Forest.protocol_id(), 4);
        assert_eq!(Biome::Taiga.protocol_id(), 5);
        assert_eq!(Biome::Swamp.protocol_id(), 6);
        assert_eq!(Biome::IcePlains.protocol_id(), 12);
        assert_eq!(Biome::Jungle.protocol_id(), 21);
        assert_eq!(Biome::BirchForest.protocol_id(), 27);
    }

    #[test]
    fn regions_are_diverse() {
        let (primary, jitter) = tables();
        let selector = BiomeSelector::new(&primary, &jitter);
        let mut found = std::collections::HashSet::new();
        for x in (-6400..6400).step_by(160) {
            for z in (-6400..6400).step_by(160) {
                found.insert(selector.select(x as f64, z as f64));
            }
        }
        assert!(
            found.len() >= 3,
            "expected several biomes across a wide area, found {:?}",
            found
        );
    }

    #[test]
    fn nearby_columns_usually_share_a_region() {
        let (primary, jitter) = tables();
        let selector = BiomeSelector::new(&primary, &jitter);
        // Adjacent columns land in the same Voronoi cell far more often
        // than not; a handful of borders in a 256-column strip is fine.
        let mut changes = 0;
        let mut previous = selector.select(0.0, 0.0);
        for x in 1..256 {
            let current = selector.select(x as f64, 0.0);
            if current != previous {
                changes += 1;
            }
            previous = current;
        }
        assert!(changes < 32, "biome borders too dense: {changes} changes");
    }
}
