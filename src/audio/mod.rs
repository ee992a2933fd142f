//! Background music: a fixed playlist played one track after another.

use bevy::audio::{PlaybackMode, Volume};
use bevy::prelude::*;

pub struct AudioPlugin;

impl Plugin for AudioPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MusicConfig>()
            .init_resource::<Playlist>()
            .add_systems(Update, advance_playlist);
    }
}

/// Configuration for background music.
#[derive(Resource)]
pub struct MusicConfig {
    /// Volume (0.0 to 1.0).
    pub volume: f32,
    /// Whether music is enabled.
    pub enabled: bool,
}

impl Default for MusicConfig {
    fn default() -> Self {
        Self {
            volume: 0.5,
            enabled: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Track {
    Garden,
    Windmill,
    Coal,
}

impl Track {
    pub const ALL: [Track; 3] = [Track::Garden, Track::Windmill, Track::Coal];

    pub fn asset_path(self) -> &'static str {
        match self {
            Track::Garden => "music/garden.ogg",
            Track::Windmill => "music/windmill.ogg",
            Track::Coal => "music/coal.ogg",
        }
    }
}

/// Position in the track rotation.
#[derive(Resource, Default, Debug)]
pub struct Playlist {
    next: usize,
}

impl Playlist {
    /// Track to play now; the following call returns the one after it.
    pub fn advance(&mut self) -> Track {
        let track = Track::ALL[self.next % Track::ALL.len()];
        self.next = (self.next + 1) % Track::ALL.len();
        track
    }
}

/// Marker for the entity playing the current track.
#[derive(Component)]
pub struct MusicTrack(pub Track);

/// Start the next track once the previous one has finished and despawned.
fn advance_playlist(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    config: Res<MusicConfig>,
    mut playlist: ResMut<Playlist>,
    playing: Query<(), With<MusicTrack>>,
) {
    if !config.enabled || !playing.is_empty() {
        return;
    }

    let track = playlist.advance();
    commands.spawn((
        AudioPlayer::new(asset_server.load(track.asset_path())),
        PlaybackSettings {
            mode: PlaybackMode::Despawn,
            volume: Volume::new(config.volume),
            ..default()
        },
        MusicTrack(track),
    ));
    debug!("Playing {:?}", track);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playlist_wraps_around() {
        let mut playlist = Playlist::default();
        let order: Vec<Track> = (0..4).map(|_| playlist.advance()).collect();
        assert_eq!(
            order,
            vec![Track::Garden, Track::Windmill, Track::Coal, Track::Garden]
        );
    }
}
