//! Syncs the frame's draw list onto a pool of sprite entities.

use std::collections::HashMap;

use bevy::prelude::*;
use bevy::sprite::Anchor;
use bevy::window::PrimaryWindow;

use super::draw::{DrawCommand, SpriteId};

/// Depth step between consecutive draw commands.
const Z_STEP: f32 = 0.001;

/// Draw commands produced by the simulation this frame.
#[derive(Resource, Default, Debug)]
pub struct DrawQueue {
    pub commands: Vec<DrawCommand>,
}

/// Reusable sprite entities and the image handle of every sprite id seen so far.
#[derive(Resource, Default)]
pub struct SpritePool {
    entities: Vec<Entity>,
    images: HashMap<SpriteId, Handle<Image>>,
}

#[derive(Component)]
pub struct PooledSprite;

fn make_sprite(image: Handle<Image>, command: &DrawCommand) -> Sprite {
    Sprite {
        image,
        color: Color::Srgba(command.tint),
        custom_size: Some(command.size),
        anchor: Anchor::BottomLeft,
        ..default()
    }
}

pub(super) fn sync_sprites(
    mut commands: Commands,
    queue: Res<DrawQueue>,
    mut pool: ResMut<SpritePool>,
    asset_server: Res<AssetServer>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut sprites: Query<(&mut Sprite, &mut Transform, &mut Visibility), With<PooledSprite>>,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };
    // Draw commands use a bottom-left origin; the 2D camera is centred
    let half_window = Vec2::new(window.width(), window.height()) / 2.0;
    let pool = &mut *pool;

    for (index, command) in queue.commands.iter().enumerate() {
        let image = pool
            .images
            .entry(command.sprite)
            .or_insert_with(|| asset_server.load(command.sprite.asset_path()))
            .clone();
        let translation = (command.screen - half_window).extend(index as f32 * Z_STEP);

        match pool.entities.get(index) {
            Some(&entity) => {
                let Ok((mut sprite, mut transform, mut visibility)) = sprites.get_mut(entity)
                else {
                    continue;
                };
                *sprite = make_sprite(image, command);
                transform.translation = translation;
                *visibility = Visibility::Inherited;
            }
            None => {
                let entity = commands
                    .spawn((
                        make_sprite(image, command),
                        Transform::from_translation(translation),
                        Visibility::Inherited,
                        PooledSprite,
                    ))
                    .id();
                pool.entities.push(entity);
            }
        }
    }

    for &entity in pool.entities.iter().skip(queue.commands.len()) {
        if let Ok((_, _, mut visibility)) = sprites.get_mut(entity) {
            *visibility = Visibility::Hidden;
        }
    }
}

pub(super) fn hide_all_sprites(mut sprites: Query<&mut Visibility, With<PooledSprite>>) {
    for mut visibility in &mut sprites {
        *visibility = Visibility::Hidden;
    }
}
