//! Building catalogue and sprite animation table.

use serde::{Deserialize, Serialize};

/// Buildings the player can place on a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildingType {
    WindTurbine,
    CoalPlant,
    SolarPanel,
    House,
}

/// Whether a building feeds energy into the grid or draws from it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnergyRole {
    Producer,
    Consumer,
}

/// Constant per-type economy parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BuildingStats {
    /// Money spent when the placement is confirmed.
    pub cost: u32,
    /// Energy produced (or consumed, for consumers) per second.
    pub energy_rate: f32,
    /// CO2 emitted per second.
    pub co2_rate: f32,
    pub role: EnergyRole,
}

impl BuildingType {
    pub const ALL: [BuildingType; 4] = [
        BuildingType::WindTurbine,
        BuildingType::CoalPlant,
        BuildingType::SolarPanel,
        BuildingType::House,
    ];

    pub const fn stats(self) -> BuildingStats {
        match self {
            BuildingType::WindTurbine => BuildingStats {
                cost: 300,
                energy_rate: 1.0,
                co2_rate: 0.1,
                role: EnergyRole::Producer,
            },
            BuildingType::CoalPlant => BuildingStats {
                cost: 100,
                energy_rate: 2.0,
                co2_rate: 2.0,
                role: EnergyRole::Producer,
            },
            BuildingType::SolarPanel => BuildingStats {
                cost: 200,
                energy_rate: 0.5,
                co2_rate: 0.1,
                role: EnergyRole::Producer,
            },
            BuildingType::House => BuildingStats {
                cost: 0,
                energy_rate: 1.0,
                co2_rate: 0.0,
                role: EnergyRole::Consumer,
            },
        }
    }

    pub fn cost(self) -> u32 {
        self.stats().cost
    }

    /// Position in [`BuildingType::ALL`]; indexes per-type tables.
    pub const fn index(self) -> usize {
        match self {
            BuildingType::WindTurbine => 0,
            BuildingType::CoalPlant => 1,
            BuildingType::SolarPanel => 2,
            BuildingType::House => 3,
        }
    }

    /// Get the display name for this building.
    pub fn name(self) -> &'static str {
        match self {
            BuildingType::WindTurbine => "Wind Turbine",
            BuildingType::CoalPlant => "Coal Plant",
            BuildingType::SolarPanel => "Solar Panel",
            BuildingType::House => "House",
        }
    }

    /// Base name of this building's sprite frames.
    pub fn sprite_key(self) -> &'static str {
        match self {
            BuildingType::WindTurbine => "wind_turbine",
            BuildingType::CoalPlant => "coal_plant",
            BuildingType::SolarPanel => "solar_panel",
            BuildingType::House => "house",
        }
    }
}

/// A looping flipbook animation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Animation {
    pub frame_duration: f32,
    pub frame_count: u8,
}

impl Animation {
    pub const fn new(frame_duration: f32, frame_count: u8) -> Self {
        Self {
            frame_duration,
            frame_count,
        }
    }

    /// Frame shown after `phase` seconds of looping playback.
    pub fn frame_at(&self, phase: f32) -> u8 {
        if self.frame_count <= 1 || self.frame_duration <= 0.0 || !phase.is_finite() {
            return 0;
        }
        let step = (phase / self.frame_duration).floor() as i64;
        step.rem_euclid(i64::from(self.frame_count)) as u8
    }
}

/// Animations indexed by building type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationTable {
    body: [Animation; BuildingType::ALL.len()],
    light: [Option<Animation>; BuildingType::ALL.len()],
}

impl AnimationTable {
    /// The building sprite itself.
    pub fn body(&self, building: BuildingType) -> Animation {
        self.body[building.index()]
    }

    /// Additive light layer drawn over the building, if it has one.
    pub fn light(&self, building: BuildingType) -> Option<Animation> {
        self.light[building.index()]
    }
}

pub const ANIMATIONS: AnimationTable = AnimationTable {
    body: [
        Animation::new(0.3, 4), // wind turbine blades
        Animation::new(0.3, 1),
        Animation::new(0.3, 1),
        Animation::new(0.3, 1),
    ],
    light: [
        None,
        Some(Animation::new(0.15, 17)), // coal plant flames
        None,
        None,
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_matches_all_order() {
        for (position, building) in BuildingType::ALL.iter().enumerate() {
            assert_eq!(building.index(), position);
        }
    }

    #[test]
    fn only_houses_consume() {
        for building in BuildingType::ALL {
            let expected = if building == BuildingType::House {
                EnergyRole::Consumer
            } else {
                EnergyRole::Producer
            };
            assert_eq!(building.stats().role, expected);
        }
    }

    #[test]
    fn turbine_animation_loops_through_four_frames() {
        let blades = ANIMATIONS.body(BuildingType::WindTurbine);
        assert_eq!(blades.frame_at(0.0), 0);
        assert_eq!(blades.frame_at(0.31), 1);
        assert_eq!(blades.frame_at(0.95), 3);
        assert_eq!(blades.frame_at(1.21), 0);
        assert_eq!(ANIMATIONS.body(BuildingType::House).frame_at(42.0), 0);
    }

    #[test]
    fn only_coal_plants_have_flames() {
        assert!(ANIMATIONS.light(BuildingType::CoalPlant).is_some());
        assert!(ANIMATIONS.light(BuildingType::WindTurbine).is_none());
        let flames = ANIMATIONS.light(BuildingType::CoalPlant).unwrap();
        assert_eq!(flames.frame_at(0.15 * 17.0 + 0.01), 0);
    }
}
