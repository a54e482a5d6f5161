//! Seeded terrain generation: heightmap and biome sampling plus block
//! stacking into sections.

#![allow(clippy::needless_range_loop)]

use crate::biome::{Biome, BiomeSelector};
use crate::block::{id, Block};
use crate::chunk::{
    block_index, Chunk, ChunkSection, BLOCKS_PER_SECTION, CHUNK_SIZE, COLUMNS_PER_CHUNK,
};
use crate::noise::PermutationTable;

/// Water surface level in world Y.
pub const WATER_LEVEL: i32 = 64;

/// A chunk never carries fewer sections than this, so even the flattest
/// terrain has renderable ground.
pub const MIN_SECTIONS: usize = 4;

/// Sub-seed offset for the biome jitter table.
const JITTER_SEED_OFFSET: u64 = 1000;

/// Offsets keeping heightmap samples off the noise lattice axes.
const NOISE_OFFSET_X: f64 = 0.483;
const NOISE_OFFSET_Z: f64 = 0.483;

/// Constant noise-plane Y for the 2D heightmap samples.
const HEIGHT_PLANE_Y: f64 = 28.237;

/// Vertical scale applied to the unit-interval octave sample.
const HEIGHT_SCALE: f64 = 125.0;

const HEIGHT_OCTAVES: u32 = 6;
const HEIGHT_PERSISTENCE: f64 = 0.4;

/// Seed-independent bedrock depth jitter, indexed by column position and
/// height.
const RAND1: [u8; 64] = [
    3, 2, 1, 2, 2, 2, 1, 1, 2, 3, 2, 2, 3, 2, 2, 1, //
    2, 1, 2, 2, 1, 2, 3, 2, 3, 2, 1, 2, 3, 2, 1, 2, //
    1, 2, 2, 3, 3, 3, 2, 1, 2, 1, 1, 1, 2, 3, 2, 1, //
    2, 1, 1, 1, 2, 1, 2, 3, 2, 2, 2, 3, 3, 3, 2, 2,
];

/// Seed-independent surface-decoration roll, indexed like [`RAND1`] plus
/// the block's world Y.
const RAND2: [u8; 64] = [
    2, 7, 7, 1, 7, 6, 9, 12, 4, 6, 12, 3, 4, 5, 6, 4, //
    2, 5, 7, 7, 15, 12, 1, 9, 12, 2, 4, 1, 7, 11, 4, 15, //
    5, 9, 9, 10, 12, 4, 11, 11, 12, 5, 1, 1, 4, 10, 12, 15, //
    13, 16, 15, 13, 7, 10, 5, 10, 3, 13, 5, 7, 13, 10, 1, 14,
];

/// Deterministic chunk generator for one world seed.
///
/// The generator owns both permutation tables. Generation borrows the
/// tables immutably, so a shared reference can drive any number of
/// concurrent chunk requests; [`reseed`](Self::reseed) takes `&mut self`,
/// which rules out reseeding while generation is in flight.
pub struct TerrainGenerator {
    seed: u64,
    terrain: PermutationTable,
    jitter: PermutationTable,
}

impl TerrainGenerator {
    /// Create a generator for `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            terrain: PermutationTable::new(seed),
            jitter: PermutationTable::new(seed.wrapping_add(JITTER_SEED_OFFSET)),
        }
    }

    /// Replace both permutation tables with tables for `seed`.
    pub fn reseed(&mut self, seed: u64) {
        *self = Self::new(seed);
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Biome of the column at world coordinates (x, z).
    pub fn biome_at(&self, x: f64, z: f64) -> Biome {
        BiomeSelector::new(&self.terrain, &self.jitter).select(x, z)
    }

    /// Generate the chunk at chunk coordinates (x, z).
    ///
    /// Pure function of the seed and coordinates: repeated calls yield
    /// identical chunks.
    pub fn generate_chunk(&self, chunk_x: i32, chunk_z: i32) -> Chunk {
        let (height_map, biome_map, max_height) = self.build_maps(chunk_x, chunk_z);

        let sections = (0..section_count_for(max_height))
            .map(|section_y| build_section(section_y as u8, &height_map))
            .collect();

        Chunk::new(chunk_x, chunk_z, height_map, biome_map, sections)
    }

    /// Sample the heightmap and biome map for all 256 columns, tracking
    /// the tallest column.
    fn build_maps(
        &self,
        chunk_x: i32,
        chunk_z: i32,
    ) -> ([u8; COLUMNS_PER_CHUNK], [Biome; COLUMNS_PER_CHUNK], u8) {
        let selector = BiomeSelector::new(&self.terrain, &self.jitter);
        let mut height_map = [0u8; COLUMNS_PER_CHUNK];
        let mut biome_map = [Biome::Ocean; COLUMNS_PER_CHUNK];
        let mut max_height = 0u8;

        let start_x = chunk_x as f64 * CHUNK_SIZE as f64;
        let start_z = chunk_z as f64 * CHUNK_SIZE as f64;
        for lz in 0..CHUNK_SIZE {
            let z = start_z + lz as f64;
            for lx in 0..CHUNK_SIZE {
                let x = start_x + lx as f64;
                let sample = self.terrain.octave3(
                    x + NOISE_OFFSET_X,
                    HEIGHT_PLANE_Y,
                    z + NOISE_OFFSET_Z,
                    HEIGHT_OCTAVES,
                    HEIGHT_PERSISTENCE,
                );
                let height = (HEIGHT_SCALE * sample).clamp(0.0, 255.0) as u8;
                height_map[lz * CHUNK_SIZE + lx] = height;
                biome_map[lz * CHUNK_SIZE + lx] = selector.select(x, z);
                max_height = max_height.max(height);
            }
        }

        (height_map, biome_map, max_height)
    }
}

/// Sections needed to cover the tallest column, floored at
/// [`MIN_SECTIONS`].
pub fn section_count_for(max_height: u8) -> usize {
    (max_height as usize + 1).div_ceil(CHUNK_SIZE).max(MIN_SECTIONS)
}

/// Build the section at vertical slot `section_y` from the heightmap.
/// Block decisions are seed-independent given the heightmap.
fn build_section(section_y: u8, height_map: &[u8; COLUMNS_PER_CHUNK]) -> ChunkSection {
    let mut blocks = [Block::new(id::AIR); BLOCKS_PER_SECTION];
    for ly in 0..CHUNK_SIZE {
        let y = section_y as i32 * CHUNK_SIZE as i32 + ly as i32;
        for lz in 0..CHUNK_SIZE {
            for lx in 0..CHUNK_SIZE {
                let state = column_block(lx, y, lz, height_map);
                blocks[block_index(lx, ly, lz)] = Block::new(state);
            }
        }
    }
    ChunkSection::new(section_y, blocks)
}

/// Decide one block's state from the column height, the world Y, and the
/// fixed jitter tables.
fn column_block(x: usize, y: i32, z: usize, height_map: &[u8; COLUMNS_PER_CHUNK]) -> u16 {
    let h = height_map[z * CHUNK_SIZE + x] as i32;
    let m = RAND1[(x * CHUNK_SIZE + z + h as usize) % 64] as i32;
    let n = RAND2[(x * CHUNK_SIZE + y as usize + z + height_map[x * CHUNK_SIZE + z] as usize) % 64];

    if y == h - m {
        id::BEDROCK
    } else if y < h - m {
        id::STONE
    } else if y < h {
        if y < WATER_LEVEL {
            id::SAND
        } else {
            id::DIRT
        }
    } else if y == h {
        if y < WATER_LEVEL {
            id::SAND
        } else {
            id::GRASS
        }
    } else if y < WATER_LEVEL {
        id::STILL_WATER
    } else if y == h + 1 && n > 13 {
        // Decoration never sits in the water surface plane itself.
        if y == WATER_LEVEL {
            id::AIR
        } else {
            id::TALL_GRASS
        }
    } else {
        id::AIR
    }
}
