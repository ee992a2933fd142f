//! Seeded 2D noise used to shape the island.
//!
//! The default field is a hashed sine: cheap, stateless, and computed in
//! single precision so the same build always reproduces the same island.
//! The gradient field wraps `noise::Perlin` for smoother terrain.

use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const HASH_X: f32 = 12.9898;
const HASH_Y: f32 = 78.233;
const HASH_GAIN: f32 = 43758.5453;

/// Largest magnitude at which every integer is exactly representable as `f32`.
const MAX_EXACT_F32_INT: i64 = 1 << 24;

/// Noise channels derived from one world seed: altitude, temperature, humidity.
pub const CHANNEL_COUNT: i32 = 3;

/// Which noise function backs a [`NoiseField`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoiseKind {
    /// `fract(sin(x*12.9898 + y*78.233 + seed) * 43758.5453)`.
    #[default]
    HashedSine,
    /// Classic gradient Perlin noise from the `noise` crate.
    Gradient,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SeedError {
    #[error("noise seed {seed} is outside the supported range (magnitude at most {})", Seed::MAX)]
    NoiseSeedInvalid { seed: i64 },
}

/// World seed.
///
/// Channel seeds are `seed * 10 + channel` and are fed into the hashed sine
/// as `f32`, so seeds are limited to the range where those channel seeds
/// stay exact integers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Seed(i32);

impl Seed {
    pub const MAX: i64 = (MAX_EXACT_F32_INT - (CHANNEL_COUNT as i64 - 1)) / 10;

    pub fn new(raw: i64) -> Result<Self, SeedError> {
        if raw.unsigned_abs() > Self::MAX as u64 {
            return Err(SeedError::NoiseSeedInvalid { seed: raw });
        }
        Ok(Self(raw as i32))
    }

    pub fn get(self) -> i32 {
        self.0
    }

    /// Seed of one derived noise channel.
    pub fn channel(self, channel: i32) -> i32 {
        self.0 * 10 + channel
    }
}

impl From<u16> for Seed {
    fn from(raw: u16) -> Self {
        Self(i32::from(raw))
    }
}

impl TryFrom<i64> for Seed {
    type Error = SeedError;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        Seed::new(raw)
    }
}

impl From<Seed> for i64 {
    fn from(seed: Seed) -> Self {
        i64::from(seed.0)
    }
}

/// Hashed-sine noise. Pure; returns a value in `(-1, 1)`.
pub fn hashed_sine(x: f32, y: f32, seed: i32) -> f32 {
    let value = (x * HASH_X + y * HASH_Y + seed as f32).sin() * HASH_GAIN;
    value.fract()
}

/// A noise function bound to one channel seed.
#[derive(Clone, Debug)]
pub struct NoiseField {
    seed: i32,
    gradient: Option<Perlin>,
}

impl NoiseField {
    pub fn new(kind: NoiseKind, seed: i32) -> Self {
        let gradient = match kind {
            NoiseKind::HashedSine => None,
            // Perlin takes a u32 seed; reinterpret the bits so negative seeds stay distinct
            NoiseKind::Gradient => Some(Perlin::new(seed as u32)),
        };
        Self { seed, gradient }
    }

    pub fn sample(&self, x: f32, y: f32) -> f32 {
        match &self.gradient {
            None => hashed_sine(x, y, self.seed),
            Some(perlin) => perlin.get([f64::from(x), f64::from(y)]) as f32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashed_sine_is_pure_and_bounded() {
        for i in 0..200 {
            let x = i as f32 * 0.37;
            let y = i as f32 * 1.13;
            let first = hashed_sine(x, y, 420);
            assert_eq!(first.to_bits(), hashed_sine(x, y, 420).to_bits());
            assert!(first > -1.0 && first < 1.0, "{first} out of range");
        }
    }

    #[test]
    fn different_channels_produce_different_noise() {
        let seed = Seed::new(42).unwrap();
        let altitude = NoiseField::new(NoiseKind::HashedSine, seed.channel(0));
        let humidity = NoiseField::new(NoiseKind::HashedSine, seed.channel(2));
        let differs = (0..16).any(|i| {
            let p = i as f32 * 0.5;
            altitude.sample(p, p) != humidity.sample(p, p)
        });
        assert!(differs);
    }

    #[test]
    fn seed_range_is_enforced() {
        assert!(Seed::new(0).is_ok());
        assert!(Seed::new(-Seed::MAX).is_ok());
        assert!(Seed::new(Seed::MAX).is_ok());
        assert_eq!(
            Seed::new(Seed::MAX + 1),
            Err(SeedError::NoiseSeedInvalid { seed: Seed::MAX + 1 })
        );
        assert_eq!(
            Seed::new(i64::MIN),
            Err(SeedError::NoiseSeedInvalid { seed: i64::MIN })
        );
        // Every channel of the largest seed is still an exact f32 integer
        let top = Seed::new(Seed::MAX).unwrap().channel(CHANNEL_COUNT - 1);
        assert_eq!(top as f32 as i32, top);
    }

    #[test]
    fn gradient_field_is_deterministic() {
        let a = NoiseField::new(NoiseKind::Gradient, 7);
        let b = NoiseField::new(NoiseKind::Gradient, 7);
        for i in 0..32 {
            let p = i as f32 * 0.31;
            assert_eq!(a.sample(p, p * 2.0), b.sample(p, p * 2.0));
        }
    }
}
