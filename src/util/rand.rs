use rand::SeedableRng;
use rand_distr::{
    num_traits::{Float, PrimInt},
    uniform::SampleUniform,
    Distribution, Uniform,
};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContinuousDistribution<F> {
    Always { value: F },
    /// A max-exclusive uniform distribution in the range [min, max).
    Uniform { min: F, max: F },
}

impl<F> Distribution<F> for ContinuousDistribution<F>
where
    F: Float + SampleUniform,
{
    fn sample<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> F {
        match self {
            ContinuousDistribution::Uniform { min, max } => rng.sample(Uniform::new(min, max)),
            ContinuousDistribution::Always { value } => *value,
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiscreteDistribution<I> {
    /// A max-exclusive uniform distribution in the range [min, max).
    Uniform {
        min: I,
        max: I,
    },
    Always {
        value: I,
    },
}

impl<I> Distribution<I> for DiscreteDistribution<I>
where
    I: PrimInt + SampleUniform,
{
    fn sample<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> I {
        match self {
            DiscreteDistribution::Uniform { min, max } => rng.sample(Uniform::new(min, max)),
            DiscreteDistribution::Always { value } => *value,
        }
    }
}

#[derive(Debug)]
pub struct Rng {
    rng: Xoshiro256PlusPlus,
}

impl Rng {
    #[must_use]
    pub fn from_seed(seed: u64) -> Rng {
        Rng {
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        }
    }

    /// Splits off an independent stream, so each process can sample
    /// without perturbing its siblings.
    #[must_use]
    // Xoshiro256PlusPlus::from_rng is infallible when called with Xoshiro256PlusPlus
    #[allow(clippy::missing_panics_doc)]
    pub fn create_child(&mut self) -> Rng {
        Rng {
            rng: Xoshiro256PlusPlus::from_rng(&mut self.rng).unwrap(),
        }
    }

    pub fn sample<R>(&mut self, dist: &impl Distribution<R>) -> R {
        dist.sample(&mut self.rng)
    }
}
