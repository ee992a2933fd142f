//! Day/night cycle: night intensity, sky tint and per-tile climate tint.

use bevy::color::Srgba;
use bevy::prelude::*;

use crate::game_state::GameState;
use crate::simulation::{SimulationSet, SimulationState};

pub struct DayNightPlugin;

impl Plugin for DayNightPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DayNightConfig>()
            .add_systems(
                Update,
                update_clear_color
                    .after(SimulationSet)
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

#[derive(Resource, Clone, Debug)]
pub struct DayNightConfig {
    /// Length of one full day in seconds.
    pub cycle_duration: f64,
    pub day_tint: Srgba,
    pub night_tint: Srgba,
    /// Background behind the island, before the sky tint.
    pub background: Srgba,
}

impl Default for DayNightConfig {
    fn default() -> Self {
        Self {
            cycle_duration: 240.0,
            day_tint: Srgba::rgb(1.0, 1.0, 1.0),
            night_tint: Srgba::rgb(0.4, 0.4, 0.7),
            background: Srgba::rgb(0.15, 0.15, 0.2),
        }
    }
}

impl DayNightConfig {
    pub fn night_intensity(&self, elapsed: f64) -> f32 {
        night_intensity(elapsed, self.cycle_duration)
    }

    /// Global light colour at the given night intensity.
    pub fn sky_tint(&self, intensity: f32) -> Srgba {
        lerp(self.day_tint, self.night_tint, intensity)
    }
}

/// Night intensity in `[0, 1]` for a point in the cycle.
///
/// The first half of the cycle is full day; dusk ramps over the next tenth,
/// full night holds until 85%, and dawn ramps back down to the end.
pub fn night_intensity(elapsed: f64, cycle_duration: f64) -> f32 {
    if cycle_duration <= 0.0 || !elapsed.is_finite() {
        return 0.0;
    }
    let t = (elapsed.rem_euclid(cycle_duration) / cycle_duration) as f32;
    let intensity = if t < 0.5 {
        0.0
    } else if t < 0.6 {
        (t - 0.5) / 0.1
    } else if t < 0.85 {
        1.0
    } else {
        1.0 - (t - 0.85) / 0.15
    };
    intensity.clamp(0.0, 1.0)
}

/// Climate colour of a tile: warmer is redder, cooler is bluer, humid is
/// greener, relative to a 20 degree / 50% baseline.
pub fn climate_tint(temperature: f32, humidity: f32) -> Srgba {
    let warmth = ((temperature - 20.0) / 20.0 * 0.3).clamp(-0.3, 0.3);
    let damp = ((humidity - 50.0) / 50.0 * 0.3).clamp(-0.3, 0.3);
    Srgba::rgb(
        (1.0 + warmth).clamp(0.0, 1.0),
        (1.0 + damp).clamp(0.0, 1.0),
        (1.0 - warmth).clamp(0.0, 1.0),
    )
}

/// Final tile colour: climate tint modulated by the sky.
pub fn tile_tint(temperature: f32, humidity: f32, sky: Srgba) -> Srgba {
    multiply(climate_tint(temperature, humidity), sky)
}

/// Opacity of the additive coal-plant flame layer; flames show more at night.
pub fn flame_alpha(intensity: f32) -> f32 {
    0.8 + 0.2 * intensity
}

fn lerp(from: Srgba, to: Srgba, t: f32) -> Srgba {
    let t = t.clamp(0.0, 1.0);
    Srgba::new(
        from.red + (to.red - from.red) * t,
        from.green + (to.green - from.green) * t,
        from.blue + (to.blue - from.blue) * t,
        from.alpha + (to.alpha - from.alpha) * t,
    )
}

fn multiply(a: Srgba, b: Srgba) -> Srgba {
    Srgba::new(
        a.red * b.red,
        a.green * b.green,
        a.blue * b.blue,
        a.alpha * b.alpha,
    )
}

fn update_clear_color(
    config: Res<DayNightConfig>,
    state: Res<SimulationState>,
    mut clear: ResMut<ClearColor>,
) {
    let sky = config.sky_tint(state.night_intensity);
    clear.0 = Color::Srgba(multiply(config.background, sky));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intensity_follows_the_phases() {
        assert_eq!(night_intensity(0.0, 240.0), 0.0);
        assert_eq!(night_intensity(119.0, 240.0), 0.0);
        assert!((night_intensity(132.0, 240.0) - 0.5).abs() < 1e-4);
        assert_eq!(night_intensity(150.0, 240.0), 1.0);
        assert!((night_intensity(222.0, 240.0) - 0.5).abs() < 1e-4);
    }

    #[test]
    fn intensity_is_periodic_and_bounded() {
        let cycle = 240.0;
        for i in 0..2400 {
            let t = i as f64 * 0.37;
            let value = night_intensity(t, cycle);
            assert!((0.0..=1.0).contains(&value));
            assert!((value - night_intensity(t + cycle, cycle)).abs() < 1e-4);
        }
        assert_eq!(night_intensity(-60.0, cycle), night_intensity(180.0, cycle));
    }

    #[test]
    fn intensity_is_continuous() {
        let cycle = 240.0;
        let step = 0.01;
        let mut previous = night_intensity(0.0, cycle);
        let mut t = step;
        while t <= cycle * 2.0 {
            let value = night_intensity(t, cycle);
            // Steepest ramp is 1 / (0.1 * cycle) per second
            assert!((value - previous).abs() < 0.01, "jump at {t}");
            previous = value;
            t += step;
        }
    }

    #[test]
    fn a_zero_length_cycle_is_always_day() {
        assert_eq!(night_intensity(10.0, 0.0), 0.0);
    }

    #[test]
    fn climate_adjustments_are_capped() {
        let hot = climate_tint(80.0, 50.0);
        assert_eq!(hot.red, 1.0);
        assert!((hot.blue - 0.7).abs() < 1e-6);

        let cold_dry = climate_tint(-40.0, 0.0);
        assert!((cold_dry.red - 0.7).abs() < 1e-6);
        assert!((cold_dry.green - 0.7).abs() < 1e-6);
        assert_eq!(cold_dry.blue, 1.0);
    }

    #[test]
    fn sky_tint_darkens_tiles_at_night() {
        let config = DayNightConfig::default();
        let noon = tile_tint(20.0, 50.0, config.sky_tint(0.0));
        let midnight = tile_tint(20.0, 50.0, config.sky_tint(1.0));
        assert_eq!(noon, Srgba::rgb(1.0, 1.0, 1.0));
        assert!((midnight.red - 0.4).abs() < 1e-6);
        assert!((midnight.blue - 0.7).abs() < 1e-6);
        assert!(flame_alpha(1.0) > flame_alpha(0.0));
    }
}
