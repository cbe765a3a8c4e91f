use rand::rngs::StdRng;
use rand::seq::{index, SliceRandom};
use rand::{Rng, SeedableRng};

/// Uniform random picks over a candidate set.
///
/// The RNG is injected so selection is reproducible: production seeds from
/// entropy, tests use a fixed-seed generator.
pub struct Selector<R: Rng = StdRng> {
    rng: R,
}

impl Selector<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Selector<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn pick_one<'a, T>(&mut self, candidates: &'a [T]) -> Option<&'a T> {
        candidates.choose(&mut self.rng)
    }

    /// Picks `min(count, len)` distinct elements, in selection order.
    pub fn pick_many<T: Clone>(&mut self, candidates: &[T], count: usize) -> Vec<T> {
        let amount = count.min(candidates.len());
        if amount == 0 {
            return Vec::new();
        }

        index::sample(&mut self.rng, candidates.len(), amount)
            .into_iter()
            .map(|i| candidates[i].clone())
            .collect()
    }

    /// Uniform integer in `low..=high`.
    pub fn pick_count(&mut self, low: usize, high: usize) -> usize {
        self.rng.gen_range(low..=high)
    }
}
