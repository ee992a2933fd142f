//! Top stats bar showing CO2, energy, battery, money and placement efficiency.

use bevy::color::Mix;
use bevy::prelude::*;

use super::{UiSnapshot, HUD_FONT, MUTED_TEXT, PANEL_BG, TEXT_COLOR};
use crate::game_state::GameState;
use crate::simulation::SimulationSet;

pub struct StatsBarPlugin;

impl Plugin for StatsBarPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Playing), setup_stats_bar)
            .add_systems(
                Update,
                update_stats_bar
                    .after(SimulationSet)
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

#[derive(Component)]
struct StatsBarRoot;

#[derive(Component)]
struct MoneyText;

#[derive(Component)]
struct EfficiencyText;

/// Fill of a resource meter.
#[derive(Component, Clone, Copy)]
struct Meter(MeterKind);

/// Container of the battery meter, hidden on islands without batteries.
#[derive(Component)]
struct BatterySection;

#[derive(Clone, Copy)]
enum MeterKind {
    Co2,
    Energy,
    Battery,
}

const CO2_LOW: Color = Color::srgb(0.2, 0.8, 0.3);
const CO2_HIGH: Color = Color::srgb(0.9, 0.25, 0.2);
const ENERGY_COLOR: Color = Color::srgb(0.95, 0.8, 0.2);
const BATTERY_COLOR: Color = Color::srgb(0.3, 0.6, 0.95);

fn setup_stats_bar(mut commands: Commands, asset_server: Res<AssetServer>) {
    let font: Handle<Font> = asset_server.load(HUD_FONT);

    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(10.0),
                left: Val::Percent(25.0),
                right: Val::Percent(25.0),
                padding: UiRect::axes(Val::Px(16.0), Val::Px(8.0)),
                flex_direction: FlexDirection::Row,
                justify_content: JustifyContent::SpaceBetween,
                align_items: AlignItems::Center,
                column_gap: Val::Px(20.0),
                ..default()
            },
            BackgroundColor(PANEL_BG),
            StatsBarRoot,
        ))
        .with_children(|bar| {
            spawn_meter(bar, &font, "CO2", MeterKind::Co2, CO2_LOW);
            spawn_meter(bar, &font, "NRG", MeterKind::Energy, ENERGY_COLOR);

            bar.spawn((
                Node {
                    display: Display::None,
                    ..default()
                },
                BatterySection,
            ))
            .with_children(|section| {
                spawn_meter(section, &font, "BAT", MeterKind::Battery, BATTERY_COLOR);
            });

            // Money section
            bar.spawn((Node {
                flex_direction: FlexDirection::Row,
                align_items: AlignItems::Center,
                column_gap: Val::Px(8.0),
                ..default()
            },))
            .with_children(|section| {
                section.spawn((
                    Text::new("$"),
                    TextFont {
                        font: font.clone(),
                        font_size: 14.0,
                        ..default()
                    },
                    TextColor(Color::srgb(0.3, 0.9, 0.4)),
                ));
                section.spawn((
                    Text::new("0"),
                    TextFont {
                        font: font.clone(),
                        font_size: 16.0,
                        ..default()
                    },
                    TextColor(TEXT_COLOR),
                    MoneyText,
                ));
            });

            bar.spawn((
                Text::new(""),
                TextFont {
                    font: font.clone(),
                    font_size: 14.0,
                    ..default()
                },
                TextColor(MUTED_TEXT),
                EfficiencyText,
            ));
        });
}

fn spawn_meter(
    parent: &mut ChildBuilder,
    font: &Handle<Font>,
    label: &str,
    kind: MeterKind,
    color: Color,
) {
    parent
        .spawn((Node {
            flex_direction: FlexDirection::Row,
            align_items: AlignItems::Center,
            column_gap: Val::Px(4.0),
            ..default()
        },))
        .with_children(|meter| {
            meter.spawn((
                Text::new(label),
                TextFont {
                    font: font.clone(),
                    font_size: 14.0,
                    ..default()
                },
                TextColor(MUTED_TEXT),
            ));

            // Meter background
            meter
                .spawn((
                    Node {
                        width: Val::Px(80.0),
                        height: Val::Px(12.0),
                        ..default()
                    },
                    BackgroundColor(Color::srgba(0.1, 0.1, 0.1, 0.8)),
                ))
                .with_children(|bg| {
                    bg.spawn((
                        Node {
                            width: Val::Percent(0.0),
                            height: Val::Percent(100.0),
                            ..default()
                        },
                        BackgroundColor(color),
                        Meter(kind),
                    ));
                });
        });
}

fn update_stats_bar(
    snapshot: Res<UiSnapshot>,
    mut money_text: Query<&mut Text, (With<MoneyText>, Without<EfficiencyText>)>,
    mut efficiency_text: Query<&mut Text, (With<EfficiencyText>, Without<MoneyText>)>,
    mut meters: Query<(&Meter, &mut Node, &mut BackgroundColor), Without<BatterySection>>,
    mut battery: Query<&mut Node, (With<BatterySection>, Without<Meter>)>,
) {
    for mut text in &mut money_text {
        **text = format_money(snapshot.money);
    }

    for mut text in &mut efficiency_text {
        **text = match snapshot.pending_efficiency {
            Some(efficiency) => format!("EFF {efficiency:.0}%"),
            None => String::new(),
        };
    }

    for (Meter(kind), mut node, mut bg) in &mut meters {
        let value = match kind {
            MeterKind::Co2 => snapshot.co2_display,
            MeterKind::Energy => snapshot.energy_display,
            MeterKind::Battery => snapshot.battery_display,
        };
        node.width = Val::Percent((value * 100.0).clamp(0.0, 100.0));

        // More CO2 shifts the fill from green to red
        if let MeterKind::Co2 = kind {
            bg.0 = CO2_LOW.mix(&CO2_HIGH, value);
        }
    }

    for mut node in &mut battery {
        node.display = if snapshot.has_batteries {
            Display::Flex
        } else {
            Display::None
        };
    }
}

fn format_money(money: f32) -> String {
    let n = money.floor() as i64;
    if n.abs() >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n.abs() >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}
