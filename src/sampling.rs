// File: src/sampling.rs
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

/// Draws a fixed subset of sample indices in a fresh random order on every
/// pass, without replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubsetRandomSampler {
    indices: Vec<usize>,
}

impl SubsetRandomSampler {
    pub fn new(indices: Vec<usize>) -> Self {
        Self { indices }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// The subset in the order it was handed over.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// One pass over the subset in a new random order.
    pub fn iter<R: Rng + ?Sized>(&self, rng: &mut R) -> std::vec::IntoIter<usize> {
        let mut order = self.indices.clone();
        order.shuffle(rng);
        order.into_iter()
    }

    pub fn iter_thread_rng(&self) -> std::vec::IntoIter<usize> {
        self.iter(&mut rand::thread_rng())
    }
}

/// Shuffles `indices` and splits them at `round(fraction * n)`, ties to even.
///
/// The first sampler gets the indices after the split point, the second the
/// ones before it, so `fraction` sizes the *second* group: `0.2` over 100
/// indices yields samplers of 80 and 20.
pub fn split<R: Rng + ?Sized>(
    mut indices: Vec<usize>,
    fraction: f64,
    rng: &mut R,
) -> (SubsetRandomSampler, SubsetRandomSampler) {
    indices.shuffle(rng);

    let total = indices.len();
    let split_at = (total as f64 * fraction).round_ties_even();
    // NaN and negative fractions collapse to 0, fractions above 1 to `total`.
    let split_at = if split_at > 0.0 { (split_at as usize).min(total) } else { 0 };

    let first = indices.split_off(split_at);
    debug!("Partitioned {} samples into {} / {}", total, first.len(), indices.len());

    (SubsetRandomSampler::new(first), SubsetRandomSampler::new(indices))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn fraction_sizes_the_second_group() {
        let mut rng = StdRng::seed_from_u64(7);
        let (first, second) = split((0..100).collect(), 0.2, &mut rng);
        assert_eq!(first.len(), 80);
        assert_eq!(second.len(), 20);
    }

    #[test]
    fn groups_cover_all_indices_once() {
        let mut rng = StdRng::seed_from_u64(11);
        let (first, second) = split((0..50).collect(), 0.3, &mut rng);
        let mut all: Vec<usize> = first.indices().iter().chain(second.indices()).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn split_point_rounds_ties_to_even() {
        let mut rng = StdRng::seed_from_u64(3);
        // 0.25 * 10 = 2.5 -> 2
        let (first, second) = split((0..10).collect(), 0.25, &mut rng);
        assert_eq!((first.len(), second.len()), (8, 2));
        // 0.5 * 1 = 0.5 -> 0
        let (first, second) = split(vec![0], 0.5, &mut rng);
        assert_eq!((first.len(), second.len()), (1, 0));
        // 0.5 * 7 = 3.5 -> 4
        let (first, second) = split((0..7).collect(), 0.5, &mut rng);
        assert_eq!((first.len(), second.len()), (3, 4));
    }

    #[test]
    fn out_of_range_fractions_are_clamped() {
        let mut rng = StdRng::seed_from_u64(5);
        let (first, second) = split((0..10).collect(), 1.5, &mut rng);
        assert_eq!((first.len(), second.len()), (0, 10));
        let (first, second) = split((0..10).collect(), -0.5, &mut rng);
        assert_eq!((first.len(), second.len()), (10, 0));
    }

    #[test]
    fn empty_input_gives_empty_samplers() {
        let mut rng = StdRng::seed_from_u64(1);
        let (first, second) = split(Vec::new(), 0.5, &mut rng);
        assert!(first.is_empty());
        assert!(second.is_empty());
    }

    #[test]
    fn each_pass_is_a_permutation_without_replacement() {
        let sampler = SubsetRandomSampler::new(vec![4, 8, 15, 16, 23, 42]);
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..5 {
            let mut pass: Vec<usize> = sampler.iter(&mut rng).collect();
            pass.sort_unstable();
            assert_eq!(pass, vec![4, 8, 15, 16, 23, 42]);
        }
    }

    #[test]
    fn passes_are_reshuffled() {
        let sampler = SubsetRandomSampler::new((0..64).collect());
        let mut rng = StdRng::seed_from_u64(21);
        let a: Vec<usize> = sampler.iter(&mut rng).collect();
        let b: Vec<usize> = sampler.iter(&mut rng).collect();
        assert_ne!(a, b);
    }
}
