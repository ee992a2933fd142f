//! 2D camera, isometric projection, and pointer-driven panning.
//!
//! The camera entity itself never moves: panning changes the offset that
//! the projection adds to every tile, which keeps the pan and clamp logic
//! independent of the engine.

use bevy::input::InputSystem;
use bevy::prelude::*;
use bevy::ui::UiSystem;

pub mod controller;
pub mod pointer;
pub mod projection;

pub use controller::{CameraConfig, CameraController, CameraMode};
pub use pointer::{PointerEvent, PointerTracker};
pub use projection::IsoProjector;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraConfig>()
            .init_resource::<PointerTracker>()
            .add_event::<PointerEvent>()
            .add_systems(Startup, setup_camera)
            .add_systems(
                PreUpdate,
                pointer::emit_pointer_events
                    .after(InputSystem)
                    .after(UiSystem::Focus),
            );
    }
}

/// Marker for the game camera.
#[derive(Component)]
pub struct IslandCamera;

fn setup_camera(mut commands: Commands) {
    commands.spawn((Camera2d, IslandCamera));
}
