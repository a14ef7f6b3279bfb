use rand::{rngs::StdRng, Rng, SeedableRng};

use super::InstanceList;

/// Sample drawn with replacement from an instance list
///
/// The sample has the size of the source list and is fully determined by the seed.
#[derive(Debug, Clone)]
pub struct Bootstrap {
    seed: u64,
    sample: InstanceList,
}

impl Bootstrap {
    pub fn new(source: &InstanceList, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let n = source.len();
        let sample = (0..n)
            .map(|_| source[rng.gen_range(0..n)].clone())
            .collect();

        Bootstrap { seed, sample }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn sample(&self) -> &InstanceList {
        &self.sample
    }

    pub fn into_sample(self) -> InstanceList {
        self.sample
    }
}
