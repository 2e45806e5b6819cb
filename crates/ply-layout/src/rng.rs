//! Deterministic noise sources. Layouts must be reproducible for a given seed, so nothing here
//! touches global or time-based randomness.

#[derive(Debug, Clone)]
pub struct XorShift64Star {
    state: u64,
}

impl XorShift64Star {
    pub fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    /// One-way mix to decorrelate streams that share a seed.
    pub fn mix_u64(&mut self, v: u64) {
        self.state ^= v.wrapping_mul(0x9E3779B97F4A7C15_u64);
        if self.state == 0 {
            self.state = 1;
        }
        let _ = self.next_u64();
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D_u64)
    }

    /// Uniform in `[-1, 1)`.
    pub fn next_f64_signed(&mut self) -> f64 {
        let u = self.next_u64() >> 11;
        let v = (u as f64) / ((1u64 << 53) as f64);
        (v * 2.0) - 1.0
    }
}

/// Signed noise pair for one entity on one tick. Same inputs, same output.
pub fn entity_noise(seed: u64, tick: u64, index: usize) -> (f64, f64) {
    let mut rng = XorShift64Star::new(seed);
    rng.mix_u64(tick);
    rng.mix_u64(index as u64);
    (rng.next_f64_signed(), rng.next_f64_signed())
}

/// 32-bit FNV-1a. Stable across platforms and releases, unlike `std`'s hasher.
pub fn fnv1a(bytes: &[u8]) -> u32 {
    let mut hash = 0x811c9dc5_u32;
    for &b in bytes {
        hash ^= u32::from(b);
        hash = hash.wrapping_mul(0x01000193);
    }
    hash
}
