//! Injectable randomness for patrol headings and ability gating
//!
//! Bots never touch a global RNG. The engine hands each bot its own
//! ChaCha stream derived from the engine seed, the bot id and the tick
//! counter, so sequential and rayon-parallel ticks produce identical output.

use std::f64::consts::TAU;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::core::types::EntityId;

/// Source of uniform samples consumed by the tactical policies
pub trait RandomSource {
    /// Uniform sample in `[0, 1)`
    fn next_f64(&mut self) -> f64;

    /// Uniform heading in `[0, 2π)`
    fn next_angle(&mut self) -> f64 {
        self.next_f64() * TAU
    }
}

/// Seedable ChaCha8-backed random source
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: ChaCha8Rng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Independent stream for one bot on one tick
    pub fn for_bot(seed: u64, bot_id: &EntityId, tick: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed ^ id_key(bot_id));
        rng.set_stream(tick);
        Self { rng }
    }
}

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// FNV-1a over the id bytes; fixed across platforms and toolchains
fn id_key(bot_id: &EntityId) -> u64 {
    bot_id
        .as_str()
        .bytes()
        .fold(FNV_OFFSET, |acc, byte| (acc ^ u64::from(byte)).wrapping_mul(FNV_PRIME))
}

impl RandomSource for SeededRandom {
    fn next_f64(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Replays a fixed list of samples, cycling when exhausted
///
/// Used to force probabilistic gates in deterministic scenarios.
#[derive(Debug, Clone)]
pub struct FixedRandom {
    values: Vec<f64>,
    cursor: usize,
}

impl FixedRandom {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, cursor: 0 }
    }

    /// Always returns `value`
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    /// Number of samples drawn so far
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for FixedRandom {
    fn next_f64(&mut self) -> f64 {
        if self.values.is_empty() {
            self.cursor += 1;
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}
