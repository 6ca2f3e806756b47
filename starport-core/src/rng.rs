//! Random sources for the station simulation.
//!
//! Every stochastic decision in the core draws from a [`RandomSource`]
//! passed in by the caller, so runs are reproducible from a seed and tests
//! can script exact rolls.

use hmac::{Hmac, Mac};
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use sha2::Sha256;
use std::collections::VecDeque;

/// Uniform float source over `[0, 1)`.
pub trait RandomSource {
    /// Draw the next roll in `[0, 1)`.
    fn next_unit(&mut self) -> f64;
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

/// Counting wrapper for RNG streams providing instrumentation.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

/// Production stream used by station sessions.
pub type StationRng = CountingRng<ChaCha20Rng>;

impl CountingRng<ChaCha20Rng> {
    /// Construct the station stream from a user-visible seed.
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        Self::wrap(ChaCha20Rng::seed_from_u64(derive_stream_seed(
            seed,
            b"station",
        )))
    }
}

impl<R: RngCore> CountingRng<R> {
    /// Wrap an arbitrary RNG.
    pub const fn wrap(rng: R) -> Self {
        Self { rng, draws: 0 }
    }

    /// Number of draw calls performed against this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl<R: RngCore> RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws = self.draws.saturating_add(1);
        self.rng.try_fill_bytes(dest)
    }
}

impl<R: RngCore> RandomSource for CountingRng<R> {
    fn next_unit(&mut self) -> f64 {
        self.r#gen::<f64>()
    }
}

fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()) else {
        return user_seed;
    };
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}

/// Pre-scripted rolls for deterministic tests and replays.
///
/// Rolls are consumed in order; once exhausted every draw returns `fallback`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRolls {
    rolls: VecDeque<f64>,
    fallback: f64,
    draws: u64,
}

impl ScriptedRolls {
    /// Largest value strictly below one, used to clamp scripted rolls.
    const CEILING: f64 = 1.0 - f64::EPSILON;

    #[must_use]
    pub fn new(rolls: impl IntoIterator<Item = f64>, fallback: f64) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
            fallback: fallback.clamp(0.0, Self::CEILING),
            draws: 0,
        }
    }

    /// A source whose every roll is high enough to never trigger a chance event.
    #[must_use]
    pub fn quiet() -> Self {
        Self::new([], Self::CEILING)
    }

    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.rolls.len()
    }
}

impl RandomSource for ScriptedRolls {
    fn next_unit(&mut self) -> f64 {
        self.draws = self.draws.saturating_add(1);
        self.rolls
            .pop_front()
            .map_or(self.fallback, |roll| roll.clamp(0.0, Self::CEILING))
    }
}
