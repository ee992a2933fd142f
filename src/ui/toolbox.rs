//! Toolbox panel for choosing, building and cancelling placements.

use bevy::prelude::*;

use super::{UiSnapshot, HUD_FONT, PANEL_BG, TEXT_COLOR};
use crate::game_state::GameState;
use crate::simulation::SimulationSet;
use crate::tools::PlacementIntent;
use crate::world::BuildingType;

pub struct ToolboxPlugin;

impl Plugin for ToolboxPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Playing), setup_toolbox)
            .add_systems(
                Update,
                (
                    handle_intent_buttons.before(SimulationSet),
                    update_button_styles.after(SimulationSet),
                )
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

/// Root entity for the toolbox panel.
#[derive(Component)]
struct ToolboxRoot;

/// A button that sends a placement intent when pressed.
#[derive(Component)]
struct IntentButton(PlacementIntent);

// UI Colors
const BUTTON_IDLE: Color = Color::srgba(0.1, 0.12, 0.11, 0.95);
const BUTTON_HOVER: Color = Color::srgba(0.15, 0.18, 0.16, 0.95);
const BUTTON_SELECTED: Color = Color::srgba(0.2, 0.4, 0.3, 0.95);
const BUTTON_BLOCKED: Color = Color::srgba(0.35, 0.1, 0.1, 0.95);

fn building_color(building: BuildingType) -> Color {
    match building {
        BuildingType::WindTurbine => Color::srgb(0.7, 0.85, 0.95),
        BuildingType::CoalPlant => Color::srgb(0.55, 0.5, 0.45),
        BuildingType::SolarPanel => Color::srgb(0.3, 0.5, 0.9),
        BuildingType::House => Color::srgb(0.9, 0.7, 0.2),
    }
}

fn building_label(building: BuildingType) -> &'static str {
    match building {
        BuildingType::WindTurbine => "Wi",
        BuildingType::CoalPlant => "Co",
        BuildingType::SolarPanel => "So",
        BuildingType::House => "Ho",
    }
}

fn setup_toolbox(mut commands: Commands, asset_server: Res<AssetServer>) {
    let font: Handle<Font> = asset_server.load(HUD_FONT);

    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(10.0),
                top: Val::Px(10.0),
                padding: UiRect::all(Val::Px(8.0)),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(6.0),
                ..default()
            },
            BackgroundColor(PANEL_BG),
            ToolboxRoot,
        ))
        .with_children(|panel| {
            panel.spawn((
                Text::new("BUILD"),
                TextFont {
                    font: font.clone(),
                    font_size: 14.0,
                    ..default()
                },
                TextColor(TEXT_COLOR),
            ));

            for building in BuildingType::ALL {
                spawn_intent_button(
                    panel,
                    &font,
                    building_label(building),
                    &format!("${}", building.cost()),
                    PlacementIntent::Open(building),
                    building_color(building),
                );
            }

            panel.spawn((
                Node {
                    height: Val::Px(8.0),
                    ..default()
                },
            ));

            spawn_intent_button(
                panel,
                &font,
                "OK",
                "",
                PlacementIntent::Confirm,
                Color::srgb(0.2, 0.8, 0.3),
            );
            spawn_intent_button(
                panel,
                &font,
                "X",
                "",
                PlacementIntent::Cancel,
                Color::srgb(0.9, 0.3, 0.3),
            );
        });
}

fn spawn_intent_button(
    parent: &mut ChildBuilder,
    font: &Handle<Font>,
    label: &str,
    caption: &str,
    intent: PlacementIntent,
    color: Color,
) {
    parent
        .spawn((
            Button,
            Node {
                width: Val::Px(48.0),
                height: Val::Px(48.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                border: UiRect::all(Val::Px(2.0)),
                ..default()
            },
            BackgroundColor(BUTTON_IDLE),
            BorderColor(color),
            IntentButton(intent),
        ))
        .with_children(|button| {
            button.spawn((
                Text::new(label),
                TextFont {
                    font: font.clone(),
                    font_size: 18.0,
                    ..default()
                },
                TextColor(color),
            ));
            if !caption.is_empty() {
                button.spawn((
                    Text::new(caption),
                    TextFont {
                        font: font.clone(),
                        font_size: 10.0,
                        ..default()
                    },
                    TextColor(TEXT_COLOR),
                ));
            }
        });
}

fn handle_intent_buttons(
    interactions: Query<(&Interaction, &IntentButton), (Changed<Interaction>, With<Button>)>,
    mut intents: EventWriter<PlacementIntent>,
) {
    for (interaction, IntentButton(intent)) in &interactions {
        if *interaction == Interaction::Pressed {
            intents.send(*intent);
            debug!("Toolbox intent: {:?}", intent);
        }
    }
}

fn update_button_styles(
    snapshot: Res<UiSnapshot>,
    mut buttons: Query<(&IntentButton, &Interaction, &mut BackgroundColor), With<Button>>,
) {
    for (IntentButton(intent), interaction, mut bg) in &mut buttons {
        let is_selected = match intent {
            PlacementIntent::Open(building) => snapshot.pending_building == Some(*building),
            _ => false,
        };
        let is_blocked = *intent == PlacementIntent::Confirm
            && snapshot.pending_building.is_some()
            && !snapshot.pending_valid;

        bg.0 = match *interaction {
            Interaction::Pressed => BUTTON_SELECTED,
            _ if is_blocked => BUTTON_BLOCKED,
            _ if is_selected => BUTTON_SELECTED,
            Interaction::Hovered => BUTTON_HOVER,
            Interaction::None => BUTTON_IDLE,
        };
    }
}
