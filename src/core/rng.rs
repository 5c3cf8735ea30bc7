//! Seedable Random Number Generator
//!
//! xoroshiro128+ generator used for respawn placement. Seeding it
//! explicitly makes spawn positions reproducible in tests and replays.

use std::time::{SystemTime, UNIX_EPOCH};

/// Golden-ratio increment of the SplitMix64 seeder.
const SPLITMIX_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// Small, fast PRNG (xoroshiro128+ step, SplitMix64 seeding).
///
/// # Example
///
/// ```
/// use collect_arena::core::rng::DeterministicRng;
///
/// let mut a = DeterministicRng::new(12345);
/// let mut b = DeterministicRng::new(12345);
/// assert_eq!(a.next_coordinate(400), b.next_coordinate(400));
/// ```
#[derive(Clone, Debug)]
pub struct DeterministicRng {
    s0: u64,
    s1: u64,
}

impl Default for DeterministicRng {
    fn default() -> Self {
        Self::new(0)
    }
}

impl DeterministicRng {
    /// Expand a 64-bit seed into the two state words.
    pub fn new(seed: u64) -> Self {
        let mut cursor = seed;
        let s0 = splitmix64(&mut cursor);
        let s1 = splitmix64(&mut cursor);

        // xoroshiro never leaves the all-zero state
        if s0 | s1 == 0 {
            return Self { s0: 1, s1: 1 };
        }
        Self { s0, s1 }
    }

    /// Seed from the wall clock.
    pub fn from_clock() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        Self::new(nanos as u64)
    }

    /// Next raw 64-bit output.
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let (s0, s1) = (self.s0, self.s1);
        let out = s0.wrapping_add(s1);

        let mixed = s0 ^ s1;
        self.s0 = s0.rotate_left(24) ^ mixed ^ (mixed << 16);
        self.s1 = mixed.rotate_left(37);

        out
    }

    /// Integer in `[0, bound)`; zero for an empty range.
    #[inline]
    pub fn next_int(&mut self, bound: u32) -> u32 {
        match u64::from(bound) {
            0 => 0,
            // Modulo bias is negligible for world-sized bounds
            b => (self.next_u64() % b) as u32,
        }
    }

    /// Whole-pixel coordinate in [0, extent).
    #[inline]
    pub fn next_coordinate(&mut self, extent: u32) -> f64 {
        f64::from(self.next_int(extent))
    }
}

fn splitmix64(cursor: &mut u64) -> u64 {
    *cursor = cursor.wrapping_add(SPLITMIX_GAMMA);
    let mut z = *cursor;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
