//! HUD: resource meters, building toolbox, and the splash screen.
//!
//! The HUD never reads simulation state directly. It renders the
//! [`UiSnapshot`] the simulation publishes each frame and talks back through
//! [`PlacementIntent`](crate::tools::PlacementIntent) events.

use bevy::prelude::*;

use crate::simulation::{EconomyConfig, EconomyState};
use crate::tools::PendingPlacement;
use crate::world::BuildingType;

pub mod splash;
pub mod stats_bar;
pub mod toolbox;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(splash::SplashPlugin)
            .add_plugins(toolbox::ToolboxPlugin)
            .add_plugins(stats_bar::StatsBarPlugin);
    }
}

pub(crate) const HUD_FONT: &str = "fonts/ShareTechMono-Regular.ttf";

// Colors
pub(crate) const PANEL_BG: Color = Color::srgba(0.03, 0.05, 0.04, 0.9);
pub(crate) const TEXT_COLOR: Color = Color::srgb(0.8, 0.95, 0.85);
pub(crate) const MUTED_TEXT: Color = Color::srgb(0.6, 0.7, 0.65);

/// Per-frame view of the economy and placement tool for the HUD.
#[derive(Resource, Clone, Debug, Default, PartialEq)]
pub struct UiSnapshot {
    /// CO2 level in `[0, 1]`.
    pub co2_display: f32,
    pub money: f32,
    /// Supply/demand ratio in `[0, 1]`.
    pub energy_display: f32,
    pub has_batteries: bool,
    pub battery_display: f32,
    pub pending_building: Option<BuildingType>,
    pub pending_valid: bool,
    /// Wind turbine efficiency at the pending cell, in percent.
    pub pending_efficiency: Option<f32>,
}

impl UiSnapshot {
    pub fn capture(
        economy: &EconomyState,
        config: &EconomyConfig,
        pending: Option<&PendingPlacement>,
    ) -> Self {
        Self {
            co2_display: economy.co2_display(),
            money: economy.money,
            energy_display: economy.energy_display(),
            has_batteries: config.has_batteries(),
            battery_display: economy.battery_display(config.battery_capacity),
            pending_building: pending.map(|p| p.building),
            pending_valid: pending.is_some_and(|p| p.is_valid),
            pending_efficiency: pending.and_then(|p| p.efficiency),
        }
    }
}
