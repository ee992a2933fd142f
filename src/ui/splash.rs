//! Splash screen: a black pause, then the logo fades in while it animates,
//! then play begins.

use bevy::prelude::*;

use crate::game_state::GameState;

/// Black screen before the logo appears.
const INITIAL_DELAY: f32 = 0.5;
const FADE_IN: f32 = 1.0;
const DISPLAY_DURATION: f32 = 3.0;
const FRAME_SECONDS: f32 = 0.3;
const FRAME_COUNT: usize = 4;

pub struct SplashPlugin;

impl Plugin for SplashPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Splash), setup_splash)
            .add_systems(Update, animate_splash.run_if(in_state(GameState::Splash)))
            .add_systems(OnExit(GameState::Splash), cleanup_splash);
    }
}

#[derive(Component)]
struct SplashLogo;

#[derive(Resource)]
struct SplashFrames {
    frames: Vec<Handle<Image>>,
    elapsed: f32,
}

/// Logo opacity `t` seconds into the splash.
pub fn splash_alpha(t: f32) -> f32 {
    if t < INITIAL_DELAY {
        0.0
    } else if t < INITIAL_DELAY + FADE_IN {
        (t - INITIAL_DELAY) / FADE_IN
    } else {
        1.0
    }
}

/// Logo frame shown `t` seconds into the splash.
pub fn splash_frame(t: f32) -> usize {
    if t < INITIAL_DELAY {
        return 0;
    }
    let cycle = FRAME_SECONDS * FRAME_COUNT as f32;
    ((t % cycle) / FRAME_SECONDS) as usize % FRAME_COUNT
}

fn setup_splash(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut clear: ResMut<ClearColor>,
) {
    let frames: Vec<Handle<Image>> = (0..FRAME_COUNT)
        .map(|i| asset_server.load(format!("splash/greengrid_{i}.png")))
        .collect();

    clear.0 = Color::BLACK;
    commands.spawn((
        Sprite {
            image: frames[0].clone(),
            color: Color::WHITE.with_alpha(0.0),
            ..default()
        },
        SplashLogo,
    ));
    commands.insert_resource(SplashFrames {
        frames,
        elapsed: 0.0,
    });
}

fn animate_splash(
    time: Res<Time>,
    mut splash: ResMut<SplashFrames>,
    mut logos: Query<&mut Sprite, With<SplashLogo>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    splash.elapsed += time.delta_secs();
    let t = splash.elapsed;

    for mut sprite in &mut logos {
        if let Some(frame) = splash.frames.get(splash_frame(t)) {
            sprite.image = frame.clone();
        }
        sprite.color = Color::WHITE.with_alpha(splash_alpha(t));
    }

    if t > DISPLAY_DURATION {
        next_state.set(GameState::Playing);
    }
}

fn cleanup_splash(mut commands: Commands, logos: Query<Entity, With<SplashLogo>>) {
    for entity in &logos {
        commands.entity(entity).despawn_recursive();
    }
    commands.remove_resource::<SplashFrames>();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fades_in_after_the_delay() {
        assert_eq!(splash_alpha(0.2), 0.0);
        assert!((splash_alpha(1.0) - 0.5).abs() < 1e-6);
        assert_eq!(splash_alpha(2.0), 1.0);
    }

    #[test]
    fn frames_cycle_every_three_tenths() {
        assert_eq!(splash_frame(0.1), 0);
        assert_eq!(splash_frame(0.65), 2);
        assert_eq!(splash_frame(1.0), 3);
        assert_eq!(splash_frame(1.25), 0);
    }
}
