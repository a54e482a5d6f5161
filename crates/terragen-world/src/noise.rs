//! Seeded permutation tables and 3D gradient noise.
//!
//! Every piece of terrain randomness flows through a 512-entry permutation
//! table. Lattice and zone coordinates are folded into table indices with
//! [`fold24`], the single hashing primitive shared by the noise engine and
//! the biome classifier.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Frequency of the first octave; doubles per octave.
const BASE_FREQUENCY: f64 = 0.02;

/// Fold a lattice or zone coordinate into a table index by XOR-ing its
/// three low bytes.
#[inline]
pub fn fold24(value: i32) -> usize {
    ((value & 0xFF) ^ ((value >> 8) & 0xFF) ^ ((value >> 16) & 0xFF)) as usize
}

/// Smootherstep fade curve `6t^5 - 15t^4 + 10t^3`.
#[inline]
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

/// Linear interpolation.
#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

/// Gradient contribution for one cube corner, selected by the low four bits
/// of the corner hash.
///
/// Cases 0xD and 0xF repeat the -y+z and -y-z directions instead of
/// following the surrounding pattern. Generated terrain depends on the
/// exact table, so the repeats stay.
fn grad(hash: usize, x: f64, y: f64, z: f64) -> f64 {
    match hash & 0xF {
        0x0 => x + y,
        0x1 => -x + y,
        0x2 => x - y,
        0x3 => -x - y,
        0x4 => x + z,
        0x5 => -x + z,
        0x6 => x - z,
        0x7 => -x - z,
        0x8 => y + z,
        0x9 => -y + z,
        0xA => y - z,
        0xB => -y - z,
        0xC => y + x,
        0xD => -y + z,
        0xE => y - x,
        0xF => -y - z,
        _ => unreachable!(),
    }
}

/// A seeded table of 512 independently drawn uniform bytes.
///
/// Identical seeds produce identical tables, and therefore identical
/// downstream terrain. Tables are immutable once built; reseeding is a
/// whole-table replacement.
#[derive(Clone)]
pub struct PermutationTable {
    entries: [u8; 512],
}

impl PermutationTable {
    /// Build a table from a seed. Every slot is an independent uniform
    /// value in `[0, 256)`.
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut entries = [0u8; 512];
        for slot in entries.iter_mut() {
            *slot = rng.gen_range(0..=255);
        }
        Self { entries }
    }

    /// Raw table lookup. `index` must be in `[0, 512)`.
    #[inline]
    pub fn get(&self, index: usize) -> usize {
        self.entries[index] as usize
    }

    /// Classic trilinear gradient noise at (x, y, z), remapped to `[0, 1]`.
    pub fn noise3(&self, x: f64, y: f64, z: f64) -> f64 {
        let floor_x = x.floor();
        let floor_y = y.floor();
        let floor_z = z.floor();

        let xi = fold24(floor_x as i32);
        let xi1 = fold24(floor_x as i32 + 1);
        let yi = fold24(floor_y as i32);
        let yi1 = fold24(floor_y as i32 + 1);
        let zi = fold24(floor_z as i32);
        let zi1 = fold24(floor_z as i32 + 1);

        let xf = x - floor_x;
        let yf = y - floor_y;
        let zf = z - floor_z;
        let u = fade(xf);
        let v = fade(yf);
        let w = fade(zf);

        // Chained lookups give one hash code per cube corner. Values are
        // < 256 and indices never exceed 510, inside the 512-entry table.
        let aaa = self.get(self.get(self.get(xi) + yi) + zi);
        let aba = self.get(self.get(self.get(xi) + yi1) + zi);
        let aab = self.get(self.get(self.get(xi) + yi) + zi1);
        let abb = self.get(self.get(self.get(xi) + yi1) + zi1);
        let baa = self.get(self.get(self.get(xi1) + yi) + zi);
        let bba = self.get(self.get(self.get(xi1) + yi1) + zi);
        let bab = self.get(self.get(self.get(xi1) + yi) + zi1);
        let bbb = self.get(self.get(self.get(xi1) + yi1) + zi1);

        let x1 = lerp(grad(aaa, xf, yf, zf), grad(baa, xf - 1.0, yf, zf), u);
        let x2 = lerp(grad(aba, xf, yf - 1.0, zf), grad(bba, xf - 1.0, yf - 1.0, zf), u);
        let y1 = lerp(x1, x2, v);

        let x1 = lerp(grad(aab, xf, yf, zf - 1.0), grad(bab, xf - 1.0, yf, zf - 1.0), u);
        let x2 = lerp(
            grad(abb, xf, yf - 1.0, zf - 1.0),
            grad(bbb, xf - 1.0, yf - 1.0, zf - 1.0),
            u,
        );
        let y2 = lerp(x1, x2, v);

        (lerp(y1, y2, w) + 1.0) / 2.0
    }

    /// Octave-composited noise (fBm), normalized to `[0, 1]`.
    ///
    /// Frequency starts at [`BASE_FREQUENCY`] and doubles per octave;
    /// amplitude starts at 1 and decays by `persistence`. `octaves` must
    /// be at least 1.
    pub fn octave3(&self, x: f64, y: f64, z: f64, octaves: u32, persistence: f64) -> f64 {
        debug_assert!(octaves >= 1);
        let mut total = 0.0;
        let mut frequency = BASE_FREQUENCY;
        let mut amplitude = 1.0;
        let mut max_value = 0.0;
        for _ in 0..octaves {
            total += self.noise3(x * frequency, y * frequency, z * frequency) * amplitude;
            max_value += amplitude;
            amplitude *= persistence;
            frequency *= 2.0;
        }
        total / max_value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold24_xors_three_bytes() {
        assert_eq!(fold24(0), 0);
        assert_eq!(fold24(0x123456), 0x12 ^ 0x34 ^ 0x56);
        assert_eq!(fold24(0xFF), 0xFF);
        // Negative coordinates fold like their two's-complement bytes.
        assert_eq!(fold24(-1), 0xFF);
    }

    #[test]
    fn same_seed_same_table() {
        let t1 = PermutationTable::new(42);
        let t2 = PermutationTable::new(42);
        for i in 0..512 {
            assert_eq!(t1.get(i), t2.get(i), "slot {i}");
        }
    }

    #[test]
    fn different_seeds_different_tables() {
        let t1 = PermutationTable::new(42);
        let t2 = PermutationTable::new(99999);
        let differing = (0..512).filter(|&i| t1.get(i) != t2.get(i)).count();
        assert!(
            differing > 256,
            "tables from different seeds should diverge, got {differing} differing slots"
        );
    }

    #[test]
    fn noise3_is_deterministic() {
        let t1 = PermutationTable::new(7);
        let t2 = PermutationTable::new(7);
        for i in 0..200 {
            let x = i as f64 * 0.37 - 30.0;
            let y = i as f64 * 0.53;
            let z = i as f64 * 0.71 - 11.0;
            assert_eq!(t1.noise3(x, y, z), t2.noise3(x, y, z));
        }
    }

    #[test]
    fn noise3_in_unit_interval() {
        let table = PermutationTable::new(12345);
        for i in 0..10000 {
            let x = (i as f64 * 0.137) - 500.0;
            let y = (i as f64 * 0.091) - 200.0;
            let z = (i as f64 * 0.251) - 300.0;
            let v = table.noise3(x, y, z);
            assert!(
                (0.0..=1.0).contains(&v),
                "noise3 out of range: {v} at ({x}, {y}, {z})"
            );
        }
    }

    #[test]
    fn octave3_in_unit_interval() {
        let table = PermutationTable::new(54321);
        for i in 0..5000 {
            let x = (i as f64 * 1.7) - 4000.0;
            let z = (i as f64 * 2.3) - 4000.0;
            let v = table.octave3(x, 28.237, z, 6, 0.4);
            assert!(
                (0.0..=1.0).contains(&v),
                "octave3 out of range: {v} at ({x}, {z})"
            );
        }
    }

    #[test]
    fn octave3_single_octave_matches_base_frequency() {
        let table = PermutationTable::new(5);
        let direct = table.noise3(10.0 * 0.02, 20.0 * 0.02, 30.0 * 0.02);
        let octave = table.octave3(10.0, 20.0, 30.0, 1, 0.4);
        assert_eq!(direct, octave);
    }

    #[test]
    fn noise_continuity() {
        let table = PermutationTable::new(99);
        let step = 0.001;
        for i in 0..1000 {
            let x = i as f64 * 0.1;
            let v1 = table.noise3(x, 5.0, 2.5);
            let v2 = table.noise3(x + step, 5.0, 2.5);
            let diff = (v1 - v2).abs();
            assert!(diff < 0.1, "noise not continuous: diff={diff} at x={x}");
        }
    }
}
