//! The universe-wide random stream.
//!
//! A 32-bit multiply-xor-shift generator: cheap, non-cryptographic and fully
//! reproducible from its seed. Every simulation-affecting draw in a universe
//! comes from one `SeasonRng`.

use rand::RngCore;

const GOLDEN_GAMMA: u32 = 0x6D2B_79F5;
const UNIT_SCALE: f64 = 4_294_967_296.0;

/// Seeded stream of unit floats with draw instrumentation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeasonRng {
    state: u32,
    draws: u64,
}

impl SeasonRng {
    #[must_use]
    pub const fn new(seed: u32) -> Self {
        Self {
            state: seed,
            draws: 0,
        }
    }

    /// Number of draw calls performed against this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }

    fn step(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.state = self.state.wrapping_add(GOLDEN_GAMMA);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Next value in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.step()) / UNIT_SCALE
    }

    /// Fair coin flip consuming one draw.
    pub fn coin(&mut self) -> bool {
        self.next_f64() < 0.5
    }
}

impl RngCore for SeasonRng {
    fn next_u32(&mut self) -> u32 {
        self.step()
    }

    fn next_u64(&mut self) -> u64 {
        let hi = u64::from(self.step());
        let lo = u64::from(self.step());
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.step().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
