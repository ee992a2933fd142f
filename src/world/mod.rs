//! World management: island terrain, the tile grid, and building definitions.

use bevy::prelude::*;

pub mod buildings;
pub mod grid;
pub mod noise_field;
pub mod terrain;

pub use buildings::{BuildingType, EnergyRole};
pub use grid::{GridError, Occupant, TerrainVariant, Tile, TileAppearance, TileGrid};
pub use noise_field::{NoiseKind, Seed, SeedError};
pub use terrain::IslandGenerator;

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WorldConfig>();
    }
}

/// Global world configuration.
#[derive(Resource, Clone, Debug)]
pub struct WorldConfig {
    /// Grid width in tiles.
    pub width: u32,
    /// Grid height in tiles.
    pub height: u32,
    /// Width of one tile texture in pixels.
    pub tile_width: f32,
    /// Height of one tile texture in pixels.
    pub tile_height: f32,
    /// Upscale applied to every tile sprite.
    pub tile_scale: f32,
    /// Vertical screen offset per unit of altitude.
    pub altitude_scale: f32,
    /// Which noise function shapes the island.
    pub noise: NoiseKind,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 64,
            height: 64,
            tile_width: 16.0,
            tile_height: 16.0,
            tile_scale: 6.0,
            altitude_scale: 16.0,
            noise: NoiseKind::HashedSine,
        }
    }
}

impl WorldConfig {
    /// Grid extent in tiles, as used by the camera clamp.
    pub fn bounds(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}
