//! Isometric tile <-> screen transform.
//!
//! Screen space is in pixels with y pointing up; the camera offset is the
//! screen position of tile (0, 0) at altitude 0. Sprites are anchored at
//! their bottom-left corner, so `tile_to_screen` returns the sprite origin.

use bevy::math::{IVec2, UVec2, Vec2};

use crate::world::WorldConfig;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IsoProjector {
    /// Horizontal screen step per tile (`tile_width / 2 * scale`).
    a: f32,
    /// Vertical screen step per tile (`tile_height / 4 * scale`).
    b: f32,
    /// On-screen size of one tile sprite.
    tile_size: Vec2,
    altitude_scale: f32,
}

impl IsoProjector {
    pub fn new(tile_width: f32, tile_height: f32, scale: f32, altitude_scale: f32) -> Self {
        Self {
            a: tile_width / 2.0 * scale,
            b: tile_height / 4.0 * scale,
            tile_size: Vec2::new(tile_width * scale, tile_height * scale),
            altitude_scale,
        }
    }

    pub fn from_config(config: &WorldConfig) -> Self {
        Self::new(
            config.tile_width,
            config.tile_height,
            config.tile_scale,
            config.altitude_scale,
        )
    }

    pub fn tile_size(&self) -> Vec2 {
        self.tile_size
    }

    /// Screen position of a tile's sprite origin, raised by its altitude.
    pub fn tile_to_screen(&self, tile: Vec2, altitude: f32, offset: Vec2) -> Vec2 {
        Vec2::new(
            (tile.x - tile.y) * self.a + offset.x,
            (tile.x + tile.y) * self.b + offset.y + altitude * self.altitude_scale,
        )
    }

    /// Exact inverse of [`Self::tile_to_screen`] at altitude 0.
    pub fn screen_to_tile(&self, screen: Vec2, offset: Vec2) -> Vec2 {
        let adj = screen - offset;
        let u = adj.x / self.a;
        let v = adj.y / self.b;
        Vec2::new((u + v) / 2.0, (v - u) / 2.0)
    }

    /// Screen displacement produced by moving `delta` tiles.
    pub fn offset_for_delta(&self, delta: Vec2) -> Vec2 {
        Vec2::new((delta.x - delta.y) * self.a, (delta.x + delta.y) * self.b)
    }

    /// Integer cell whose sprite is centred nearest to `screen`. May be off
    /// the grid.
    pub fn cell_under(&self, screen: Vec2, offset: Vec2) -> IVec2 {
        // Sprite centre relative to the sprite origin
        let bias = self.tile_size / 2.0;
        let tile = (self.screen_to_tile(screen - bias, offset) + 0.5).floor();
        IVec2::new(tile.x as i32, tile.y as i32)
    }

    /// [`Self::cell_under`], restricted to a `size` grid.
    pub fn cell_at(&self, screen: Vec2, offset: Vec2, size: UVec2) -> Option<IVec2> {
        let cell = self.cell_under(screen, offset);
        let inside = cell.x >= 0
            && cell.y >= 0
            && (cell.x as u32) < size.x
            && (cell.y as u32) < size.y;
        inside.then_some(cell)
    }
}
