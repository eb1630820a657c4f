//! Standard normal variates for the random walk.
//!
//! The simulator never touches an RNG directly; it draws through
//! [`NormalSource`], so tests can script the noise and callers can pick the
//! generator.
//!
//! ## Generators
//! - [`BoxMullerNormal`]: cosine branch of the Box-Muller transform (default)
//! - `rand_distr::StandardNormal`: ziggurat sampler, via [`Sampler::ziggurat`]

use std::f64::consts::PI;

use clap::ValueEnum;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, StandardNormal};

/// Anything that can hand out standard normal samples, one per call.
pub trait NormalSource {
    fn sample(&mut self) -> f64;
}

impl<T: NormalSource + ?Sized> NormalSource for &mut T {
    fn sample(&mut self) -> f64 {
        (**self).sample()
    }
}

/// Box-Muller transform keeping only the cosine variate.
///
/// Each sample consumes two uniforms `u, v` from (0,1) and returns
/// `sqrt(-2 ln u) * cos(2 pi v)`. The sine companion is thrown away, so no
/// state is carried between calls.
#[derive(Clone, Copy, Debug, Default)]
pub struct BoxMullerNormal;

impl Distribution<f64> for BoxMullerNormal {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let u = open_unit(rng);
        let v = open_unit(rng);
        (-2.0 * u.ln()).sqrt() * (2.0 * PI * v).cos()
    }
}

/// Uniform in (0,1): `gen::<f64>()` covers [0,1), so redraw on an exact zero.
fn open_unit<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    loop {
        let x: f64 = rng.gen();
        if x != 0.0 {
            return x;
        }
    }
}

/// An RNG paired with a normal distribution.
#[derive(Clone, Debug)]
pub struct Sampler<R, D = BoxMullerNormal> {
    rng: R,
    distribution: D,
}

impl<R: Rng, D: Distribution<f64>> Sampler<R, D> {
    pub fn new(rng: R, distribution: D) -> Self {
        Self { rng, distribution }
    }
}

impl Sampler<ChaCha8Rng> {
    /// Deterministic Box-Muller sampler: same seed, same stream.
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed), BoxMullerNormal)
    }

    pub fn from_entropy() -> Self {
        Self::new(ChaCha8Rng::from_entropy(), BoxMullerNormal)
    }
}

impl<R: Rng> Sampler<R, StandardNormal> {
    pub fn ziggurat(rng: R) -> Self {
        Self::new(rng, StandardNormal)
    }
}

impl<R: Rng, D: Distribution<f64>> NormalSource for Sampler<R, D> {
    fn sample(&mut self) -> f64 {
        self.distribution.sample(&mut self.rng)
    }
}

/// Generator selectable from the command line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum SamplerKind {
    #[default]
    BoxMuller,
    Ziggurat,
}

impl SamplerKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::BoxMuller => "Box-Muller (cosine branch)",
            Self::Ziggurat => "Ziggurat (rand_distr)",
        }
    }

    /// Seeded when `seed` is given, otherwise from OS entropy.
    pub fn build(self, seed: Option<u64>) -> Box<dyn NormalSource> {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        match self {
            Self::BoxMuller => Box::new(Sampler::new(rng, BoxMullerNormal)),
            Self::Ziggurat => Box::new(Sampler::ziggurat(rng)),
        }
    }
}
