//! Seeded pseudo-random number generator
//!
//! Stochastic opponents never touch a shared generator. Each session carries
//! a 32-byte seed; every opponent slot gets its own stream and every round a
//! fresh generator forked from it, so a saved session replays identically.

/// Seeded xorshift64* generator
///
/// Deterministic: same seed + stream = same sequence
#[derive(Clone, Debug)]
pub struct SeededRng {
    state: u64,
}

impl SeededRng {
    /// Create a new RNG from a 32-byte session seed and a stream index
    /// (the opponent slot within the session).
    pub fn new(seed: &[u8; 32], stream: u32) -> Self {
        let mut state = 0u64;
        for (i, chunk) in seed.chunks(8).enumerate() {
            let mut bytes = [0u8; 8];
            bytes[..chunk.len()].copy_from_slice(chunk);
            state ^= u64::from_le_bytes(bytes).wrapping_add(i as u64);
        }

        state ^= (stream as u64).wrapping_mul(0x517cc1b727220a95);

        // xorshift never leaves the all-zero state
        if state == 0 {
            state = 0x9e3779b97f4a7c15;
        }

        let mut rng = Self { state };
        for _ in 0..8 {
            rng.next_u64();
        }

        rng
    }

    /// Fork a generator for one round of the current stream
    pub fn for_round(&self, round: u32) -> Self {
        let mut state = self.state ^ (round as u64).wrapping_mul(0x9e3779b97f4a7c15);
        if state == 0 {
            state = 0x2545f4914f6cdd1d;
        }

        let mut rng = Self { state };
        rng.next_u64();
        rng
    }

    /// Generate next u64
    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state >> 12;
        self.state ^= self.state << 25;
        self.state ^= self.state >> 27;
        self.state.wrapping_mul(0x2545f4914f6cdd1d)
    }

    /// Generate next u32
    pub fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    /// Generate a value 0-99 (for percentage checks)
    pub fn next_percent(&mut self) -> u8 {
        (self.next_u32() % 100) as u8
    }

    /// Generate a value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        self.next_u32() % max
    }

    /// True with probability `percent`/100
    pub fn chance(&mut self, percent: u8) -> bool {
        self.next_percent() < percent
    }

    /// True with probability 1/`n`
    pub fn one_in(&mut self, n: u32) -> bool {
        n > 0 && self.next_range(n) == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let seed = [42u8; 32];
        let mut r1 = SeededRng::new(&seed, 0);
        let mut r2 = SeededRng::new(&seed, 0);

        for _ in 0..100 {
            assert_eq!(r1.next_u64(), r2.next_u64());
        }
    }

    #[test]
    fn test_different_seeds() {
        let mut rng1 = SeededRng::new(&[1u8; 32], 0);
        let mut rng2 = SeededRng::new(&[2u8; 32], 0);

        let vals1: Vec<_> = (0..10).map(|_| rng1.next_u64()).collect();
        let vals2: Vec<_> = (0..10).map(|_| rng2.next_u64()).collect();

        assert_ne!(vals1, vals2);
    }

    #[test]
    fn test_different_streams() {
        let seed = [42u8; 32];
        let mut rng1 = SeededRng::new(&seed, 0);
        let mut rng2 = SeededRng::new(&seed, 1);

        assert_ne!(rng1.next_u64(), rng2.next_u64());
    }

    #[test]
    fn test_zero_seed_still_produces_values() {
        let mut rng = SeededRng::new(&[0u8; 32], 0);
        let vals: Vec<_> = (0..4).map(|_| rng.next_u64()).collect();
        assert!(vals.iter().any(|v| *v != 0));
    }

    #[test]
    fn test_rounds_fork_independently() {
        let base = SeededRng::new(&[7u8; 32], 3);
        let a: Vec<_> = (0..20).map(|r| base.for_round(r).next_u64()).collect();
        let b: Vec<_> = (0..20).map(|r| base.for_round(r).next_u64()).collect();
        assert_eq!(a, b);
        assert_ne!(a[0], a[1]);
    }

    #[test]
    fn test_percent_range() {
        let mut rng = SeededRng::new(&[42u8; 32], 0);
        for _ in 0..1000 {
            assert!(rng.next_percent() < 100);
        }
    }

    #[test]
    fn test_next_range() {
        let mut rng = SeededRng::new(&[42u8; 32], 0);

        for max in [1, 10, 100, 1000].iter() {
            for _ in 0..100 {
                let val = rng.next_range(*max);
                assert!(val < *max, "next_range({}) returned {}", max, val);
            }
        }

        assert_eq!(rng.next_range(0), 0);
    }

    #[test]
    fn test_chance_extremes() {
        let mut rng = SeededRng::new(&[9u8; 32], 0);
        for _ in 0..200 {
            assert!(!rng.chance(0));
            assert!(rng.chance(100));
            assert!(rng.one_in(1));
            assert!(!rng.one_in(0));
        }
    }
}
