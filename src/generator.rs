// Seedable random stream driving a whole decay cascade
//
// PCG-LCG generator in the style of OpenMC's random_lcg.cpp: a single u64 of
// state, an RXS-M-XS output permutation and O(log n) skip-ahead so that each
// event can be given its own reproducible sub-stream.

use rand::{RngCore, SeedableRng};

/// LCG multiplier
const PRN_MULT: u64 = 6364136223846793005;
/// LCG additive constant
const PRN_ADD: u64 = 1442695040888963407;
/// Number of draws reserved for each event sub-stream
const EVENT_STRIDE: u64 = 152_917;

/// Random number generator for cascade sampling.
///
/// Every draw made by a channel goes through this type, so a fixed seed
/// reproduces the full sequence of channel selections, sampled energies,
/// spin-parities and emission directions bit for bit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Generator {
    state: u64,
    seed: u64,
}

impl Generator {
    pub fn new(seed: u64) -> Self {
        Self { state: seed, seed }
    }

    /// Generator for event number `event` of a run seeded with `seed`.
    ///
    /// The streams of consecutive events start `EVENT_STRIDE` draws apart, so
    /// events can be generated in any order or in parallel with identical
    /// results.
    pub fn for_event(seed: u64, event: u64) -> Self {
        let mut generator = Self::new(seed);
        generator.advance(event.wrapping_mul(EVENT_STRIDE));
        generator.seed = seed;
        generator
    }

    /// Seed the generator was created with
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Reseed the generator, restarting its sequence.
    pub fn reseed(&mut self, seed: u64) {
        self.state = seed;
        self.seed = seed;
    }

    /// Skip the next `n` draws without computing them.
    pub fn advance(&mut self, mut n: u64) {
        // F. Brown, "Random Number Generation with Arbitrary Stride"
        let mut g = PRN_MULT;
        let mut c = PRN_ADD;
        let mut g_new: u64 = 1;
        let mut c_new: u64 = 0;
        while n > 0 {
            if n & 1 == 1 {
                g_new = g_new.wrapping_mul(g);
                c_new = c_new.wrapping_mul(g).wrapping_add(c);
            }
            c = g.wrapping_add(1).wrapping_mul(c);
            g = g.wrapping_mul(g);
            n >>= 1;
        }
        self.state = g_new.wrapping_mul(self.state).wrapping_add(c_new);
    }

    #[inline(always)]
    fn step(&mut self) -> u64 {
        self.state = PRN_MULT.wrapping_mul(self.state).wrapping_add(PRN_ADD);
        let word = ((self.state >> ((self.state >> 59) + 5)) ^ self.state)
            .wrapping_mul(12605985483714917081);
        (word >> 43) ^ word
    }

    /// Uniform draw on [0, 1)
    #[inline]
    pub fn uniform(&mut self) -> f64 {
        // top 53 bits scaled by 2^-53 so the result never rounds up to 1
        ((self.step() >> 11) as f64) * 1.1102230246251565e-16
    }

    /// Uniform draw on [a, b)
    #[inline]
    pub fn uniform_range(&mut self, a: f64, b: f64) -> f64 {
        a + (b - a) * self.uniform()
    }

    /// Width-weighted draw of an index. Consumes exactly one uniform draw
    /// when the weights have a positive sum, none otherwise.
    pub fn discrete<I>(&mut self, weights: I) -> Option<usize>
    where
        I: IntoIterator<Item = f64>,
        I::IntoIter: Clone,
    {
        crate::weighted::sample_index(weights, self)
    }
}

impl SeedableRng for Generator {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u64::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::new(state)
    }
}

impl RngCore for Generator {
    #[inline(always)]
    fn next_u32(&mut self) -> u32 {
        (self.step() >> 32) as u32
    }

    #[inline(always)]
    fn next_u64(&mut self) -> u64 {
        self.step()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let mut chunks = dest.chunks_exact_mut(8);
        for chunk in &mut chunks {
            chunk.copy_from_slice(&self.step().to_le_bytes());
        }
        let rest = chunks.into_remainder();
        if !rest.is_empty() {
            let bytes = self.step().to_le_bytes();
            let n = rest.len();
            rest.copy_from_slice(&bytes[..n]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
