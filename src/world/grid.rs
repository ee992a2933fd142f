//! The authoritative tile grid.

use bevy::math::IVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::buildings::BuildingType;

/// Static ground sprite of an unoccupied tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainVariant {
    Grass0,
    Grass1,
    Grass2,
    Grass3,
    Grass4,
    Grass5,
}

impl TerrainVariant {
    pub const ALL: [TerrainVariant; 6] = [
        TerrainVariant::Grass0,
        TerrainVariant::Grass1,
        TerrainVariant::Grass2,
        TerrainVariant::Grass3,
        TerrainVariant::Grass4,
        TerrainVariant::Grass5,
    ];

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    /// Grass shade picked from the tile's altitude.
    pub fn for_altitude(altitude: f32) -> Self {
        let bucket = (altitude * 100.0).round().abs() as usize;
        Self::from_index(bucket)
    }

    pub fn key(self) -> &'static str {
        match self {
            TerrainVariant::Grass0 => "grass_0",
            TerrainVariant::Grass1 => "grass_1",
            TerrainVariant::Grass2 => "grass_2",
            TerrainVariant::Grass3 => "grass_3",
            TerrainVariant::Grass4 => "grass_4",
            TerrainVariant::Grass5 => "grass_5",
        }
    }
}

/// A building standing on a tile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Occupant {
    pub building: BuildingType,
    /// Seconds of animation playback; only selects frames.
    pub phase: f32,
}

/// One cell of the island.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tile {
    pub altitude: f32,
    /// Degrees Celsius.
    pub temperature: f32,
    /// Percent.
    pub humidity: f32,
    pub terrain: TerrainVariant,
    pub occupant: Option<Occupant>,
}

/// What the renderer should show for a tile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TileAppearance {
    Static(TerrainVariant),
    Animated { building: BuildingType, phase: f32 },
}

impl Tile {
    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    pub fn appearance(&self) -> TileAppearance {
        match self.occupant {
            Some(Occupant { building, phase }) => TileAppearance::Animated { building, phase },
            None => TileAppearance::Static(self.terrain),
        }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    #[error("tile ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },
    #[error("tile ({x}, {y}) is already occupied or the building is unaffordable")]
    OccupiedOrUnaffordable { x: i32, y: i32 },
}

/// Fixed-size `width x height` grid of tiles, stored row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct TileGrid {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Build a grid by evaluating `make` at every cell.
    pub fn from_fn(width: u32, height: u32, mut make: impl FnMut(IVec2) -> Tile) -> Self {
        let mut tiles = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                tiles.push(make(IVec2::new(x, y)));
            }
        }
        Self {
            width,
            height,
            tiles,
        }
    }

    /// Wrap already-built tiles; `None` when the tile count does not match.
    pub fn from_tiles(width: u32, height: u32, tiles: Vec<Tile>) -> Option<Self> {
        if width == 0 || height == 0 || tiles.len() != width as usize * height as usize {
            return None;
        }
        Some(Self {
            width,
            height,
            tiles,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn contains(&self, cell: IVec2) -> bool {
        cell.x >= 0 && cell.y >= 0 && (cell.x as u32) < self.width && (cell.y as u32) < self.height
    }

    fn index(&self, cell: IVec2) -> Option<usize> {
        self.contains(cell)
            .then(|| cell.y as usize * self.width as usize + cell.x as usize)
    }

    fn out_of_bounds(&self, cell: IVec2) -> GridError {
        GridError::OutOfBounds {
            x: cell.x,
            y: cell.y,
            width: self.width,
            height: self.height,
        }
    }

    pub fn get(&self, cell: IVec2) -> Option<&Tile> {
        self.index(cell).map(|index| &self.tiles[index])
    }

    /// Place a building. The caller is responsible for the affordability check.
    pub fn set_occupant(&mut self, cell: IVec2, building: BuildingType) -> Result<(), GridError> {
        let index = self.index(cell).ok_or_else(|| self.out_of_bounds(cell))?;
        let tile = &mut self.tiles[index];
        if tile.occupant.is_some() {
            return Err(GridError::OccupiedOrUnaffordable {
                x: cell.x,
                y: cell.y,
            });
        }
        tile.occupant = Some(Occupant {
            building,
            phase: 0.0,
        });
        Ok(())
    }

    /// Remove whatever stands on a tile, returning it.
    pub fn clear_occupant(&mut self, cell: IVec2) -> Result<Option<BuildingType>, GridError> {
        let index = self.index(cell).ok_or_else(|| self.out_of_bounds(cell))?;
        Ok(self.tiles[index].occupant.take().map(|o| o.building))
    }

    /// Advance every occupant's animation phase.
    pub fn tick(&mut self, dt: f32) {
        for occupant in self.tiles.iter_mut().filter_map(|t| t.occupant.as_mut()) {
            occupant.phase += dt;
        }
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Every tile with its cell, in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (IVec2, &Tile)> + '_ {
        let width = self.width as usize;
        self.tiles.iter().enumerate().map(move |(index, tile)| {
            let cell = IVec2::new((index % width) as i32, (index / width) as i32);
            (cell, tile)
        })
    }

    pub fn occupied(&self) -> impl Iterator<Item = (IVec2, &Occupant)> + '_ {
        self.iter()
            .filter_map(|(cell, tile)| tile.occupant.as_ref().map(|o| (cell, o)))
    }

    pub fn count_of(&self, building: BuildingType) -> usize {
        self.occupied()
            .filter(|(_, occupant)| occupant.building == building)
            .count()
    }
}
