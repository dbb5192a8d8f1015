//! Sampler
//!
//! Resampling strategies and the seeded sub-streams that keep them reproducible
//! when units of work run concurrently.
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// SplitMix64 finaliser.
#[inline]
fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Seed of sub-stream `index` under the global `seed`.
pub fn substream_seed(seed: u64, index: u64) -> u64 {
    mix64(mix64(seed).wrapping_add(index.wrapping_add(1).wrapping_mul(GOLDEN_GAMMA)))
}

/// Independent generator for one unit of work.
///
/// The same `(seed, index)` always yields the same sequence, and distinct
/// indices under one seed yield distinct sequences, so results do not depend
/// on which worker picks up the unit or when.
pub fn substream(seed: u64, index: u64) -> StdRng {
    StdRng::seed_from_u64(substream_seed(seed, index))
}

// A sampler draws the row positions making up one resample.
pub trait Sampler {
    /// Sample from `index`, returning the chosen entries in draw order.
    fn sample(&mut self, rng: &mut StdRng, index: &[usize]) -> Vec<usize>;
}

/// Uniform draws with replacement, as many as the input has entries.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReplacementSampler;

impl ReplacementSampler {
    pub fn new() -> Self {
        ReplacementSampler
    }
}

impl Sampler for ReplacementSampler {
    fn sample(&mut self, rng: &mut StdRng, index: &[usize]) -> Vec<usize> {
        if index.is_empty() {
            return Vec::new();
        }
        (0..index.len()).map(|_| index[rng.gen_range(0..index.len())]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draws(rng: &mut StdRng, n: usize) -> Vec<u64> {
        (0..n).map(|_| rng.gen::<u64>()).collect()
    }

    #[test]
    fn test_substream_reproducible() {
        let a = draws(&mut substream(42, 3), 50);
        let b = draws(&mut substream(42, 3), 50);
        assert_eq!(a, b);
    }

    #[test]
    fn test_substreams_distinct() {
        let seqs: Vec<Vec<u64>> = (0..16).map(|i| draws(&mut substream(42, i), 20)).collect();
        for i in 0..seqs.len() {
            for j in (i + 1)..seqs.len() {
                assert_ne!(seqs[i], seqs[j], "sub-streams {} and {} collide", i, j);
            }
        }
        assert_ne!(draws(&mut substream(1, 0), 20), draws(&mut substream(2, 0), 20));
    }

    #[test]
    fn test_replacement_sampler() {
        let mut rng = substream(7, 0);
        let index = vec![10, 11, 12, 13];
        let mut sampler = ReplacementSampler::new();
        let chosen = sampler.sample(&mut rng, &index);
        assert_eq!(chosen.len(), index.len());
        assert!(chosen.iter().all(|c| index.contains(c)));

        let index: Vec<usize> = (0..200).collect();
        let chosen = sampler.sample(&mut rng, &index);
        // 200 draws from 200 entries repeat with overwhelming probability.
        let mut uniq = chosen.clone();
        uniq.sort_unstable();
        uniq.dedup();
        assert!(uniq.len() < index.len());

        assert!(ReplacementSampler::new().sample(&mut rng, &[]).is_empty());
    }
}
