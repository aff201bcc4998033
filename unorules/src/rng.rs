//! Seedable shuffle source.
//!
//! The generator state is serialized with the rest of the game so a restored
//! snapshot reshuffles exactly like the live game would have.

use rand::{seq::SliceRandom, thread_rng, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameRng {
    inner: ChaCha8Rng,
}

impl GameRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self::new(thread_rng().gen())
    }

    /// Uniform in-place permutation.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_permutation() {
        let mut first = (0..52).collect::<Vec<u32>>();
        let mut second = first.clone();

        GameRng::new(7).shuffle(&mut first);
        GameRng::new(7).shuffle(&mut second);

        assert_eq!(first, second);
    }

    #[test]
    fn shuffle_keeps_every_item() {
        let mut items = (0..108).collect::<Vec<u32>>();
        GameRng::new(1).shuffle(&mut items);

        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..108).collect::<Vec<u32>>());
    }
}
