//! Island generation from layered noise.

use std::f32::consts::PI;

use bevy::log::debug;
use rand::Rng;

use super::grid::{TerrainVariant, Tile, TileGrid};
use super::noise_field::{NoiseField, NoiseKind, Seed};

/// Octave scales summed for every noise channel.
const OCTAVES: [f32; 3] = [1.0, 2.0, 3.0];

/// Noise-space divisor of one octave.
fn scale_factor(scale: f32) -> f32 {
    16.0 / (scale * scale)
}

/// Layered noise at a tile, before the island envelope.
fn octave_sum(field: &NoiseField, x: f32, y: f32) -> f32 {
    let mut value = 0.0;
    for scale in OCTAVES {
        let factor = scale_factor(scale);
        value += field.sample(x / factor, y / factor) / scale;
    }
    value
}

/// Pick a seed for a brand-new world.
pub fn fresh_seed(rng: &mut impl Rng) -> Seed {
    Seed::from(rng.gen_range(0..10_000u16))
}

/// Builds islands: noise shaped by a sine envelope that reaches zero at the
/// grid edges.
#[derive(Clone, Copy, Debug, Default)]
pub struct IslandGenerator {
    kind: NoiseKind,
}

impl IslandGenerator {
    pub fn new(kind: NoiseKind) -> Self {
        Self { kind }
    }

    pub fn generate(&self, width: u32, height: u32, seed: Seed) -> TileGrid {
        let altitude = NoiseField::new(self.kind, seed.channel(0));
        let temperature = NoiseField::new(self.kind, seed.channel(1));
        let humidity = NoiseField::new(self.kind, seed.channel(2));

        let (w, h) = (width as f32, height as f32);
        let grid = TileGrid::from_fn(width, height, |cell| {
            let (x, y) = (cell.x as f32, cell.y as f32);
            let envelope = (PI * x / w).sin() * (PI * y / h).sin();
            let altitude = (octave_sum(&altitude, x, y) + 0.5) * envelope;

            Tile {
                altitude,
                temperature: 20.0 - (octave_sum(&temperature, x, y) + 0.5) * 5.0,
                humidity: 50.0 + (octave_sum(&humidity, x, y) + 0.5) * 10.0,
                terrain: TerrainVariant::for_altitude(altitude),
                occupant: None,
            }
        });

        debug!(
            "Generated {}x{} island from seed {} ({:?} noise)",
            width,
            height,
            seed.get(),
            self.kind
        );
        grid
    }
}
