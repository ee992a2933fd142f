//! Converts the tile grid into an ordered list of sprite draws.
//!
//! The list is engine-free: each command names a sprite, a screen-space
//! origin (bottom-left, y up), a size and a tint. Commands later in the list
//! are drawn on top.

use bevy::color::Srgba;
use bevy::math::{IVec2, Vec2};
use smallvec::SmallVec;

use super::day_night::{flame_alpha, tile_tint};
use crate::camera::IsoProjector;
use crate::world::buildings::ANIMATIONS;
use crate::world::{BuildingType, TerrainVariant, TileAppearance, TileGrid};

const GHOST_VALID: Srgba = Srgba::new(0.0, 1.0, 0.0, 0.5);
const GHOST_INVALID: Srgba = Srgba::new(1.0, 0.0, 0.0, 0.5);

/// A drawable image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpriteId {
    Terrain(TerrainVariant),
    Building { building: BuildingType, frame: u8 },
    /// Coal plant flame light layer.
    Flame { frame: u8 },
}

impl SpriteId {
    /// Asset path of the image, relative to the asset root.
    pub fn asset_path(self) -> String {
        match self {
            SpriteId::Terrain(variant) => format!("tiles/{}.png", variant.key()),
            SpriteId::Building { building, frame } => {
                format!("buildings/{}_{}.png", building.sprite_key(), frame)
            }
            // Flame frames are numbered from 1 on disk
            SpriteId::Flame { frame } => format!("lights/coal_plant_flames_{}.png", frame + 1),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawCommand {
    pub sprite: SpriteId,
    pub screen: Vec2,
    pub size: Vec2,
    pub tint: Srgba,
}

/// The placement preview drawn over its target tile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ghost {
    pub cell: IVec2,
    pub building: BuildingType,
    pub valid: bool,
}

/// Everything needed to render one frame.
pub struct DrawView<'a> {
    pub grid: &'a TileGrid,
    pub projector: &'a IsoProjector,
    pub offset: Vec2,
    pub night_intensity: f32,
    pub sky: Srgba,
    pub ghost: Option<Ghost>,
}

/// Fill `out` with this frame's draw commands, back to front.
pub fn build_draw_list(view: &DrawView, out: &mut Vec<DrawCommand>) {
    out.clear();
    let grid = view.grid;
    let size = view.projector.tile_size();

    // Tiles further up the screen are drawn first
    for x in (0..grid.width() as i32).rev() {
        for y in (0..grid.height() as i32).rev() {
            let cell = IVec2::new(x, y);
            let Some(tile) = grid.get(cell) else {
                continue;
            };
            let screen = view
                .projector
                .tile_to_screen(cell.as_vec2(), tile.altitude, view.offset);
            let tint = tile_tint(tile.temperature, tile.humidity, view.sky);

            let mut layers: SmallVec<[DrawCommand; 2]> = SmallVec::new();
            let sprite = match tile.appearance() {
                TileAppearance::Static(variant) => SpriteId::Terrain(variant),
                TileAppearance::Animated { building, phase } => SpriteId::Building {
                    building,
                    frame: ANIMATIONS.body(building).frame_at(phase),
                },
            };
            layers.push(DrawCommand {
                sprite,
                screen,
                size,
                tint,
            });

            if let Some(ghost) = view.ghost.filter(|g| g.cell == cell) {
                layers.push(DrawCommand {
                    sprite: SpriteId::Building {
                        building: ghost.building,
                        frame: 0,
                    },
                    screen,
                    size,
                    tint: if ghost.valid {
                        GHOST_VALID
                    } else {
                        GHOST_INVALID
                    },
                });
            }
            out.extend(layers);
        }
    }

    // Light layer goes over every tile
    let alpha = flame_alpha(view.night_intensity);
    for (cell, occupant) in grid.occupied() {
        let Some(light) = ANIMATIONS.light(occupant.building) else {
            continue;
        };
        let altitude = grid.get(cell).map_or(0.0, |t| t.altitude);
        out.push(DrawCommand {
            sprite: SpriteId::Flame {
                frame: light.frame_at(occupant.phase),
            },
            screen: view
                .projector
                .tile_to_screen(cell.as_vec2(), altitude, view.offset),
            size,
            tint: Srgba::new(1.0, 1.0, 1.0, alpha),
        });
    }
}
