#![warn(missing_docs)]
//! Hex map tile tiering viewer.
//!
//! Opens a window with the scored map. With `--report` or `--export` the
//! map is scored without a window and the program exits.

use bevy::prelude::*;
use bevy_inspector_egui::quick::WorldInspectorPlugin;

use hex_tiers::GameState;
use hex_tiers::camera::{CameraPlugin, ViewConfig};
use hex_tiers::inspect::{InspectConfig, InspectPlugin};
use hex_tiers::panel::{PanelConfig, PanelPlugin};
use hex_tiers::tiles::{PendingMap, TilesConfig, TilesPlugin};

#[cfg(feature = "native")]
mod cli {
    use std::path::{Path, PathBuf};

    use bevy::log::LogPlugin;
    use bevy::prelude::*;
    use clap::Parser;

    use hex_tiers::map_data::{
        DemoSettings, MapData, MapLoadError, export_document, generate_demo, write_export,
    };
    use hex_tiers::recalc::{ScoringContext, recalculate_all};
    use hex_tiers::report::TierReport;
    use hex_tiers::scoring::WeightConfig;

    /// Scores and tiers the tiles of a hex strategy map.
    #[derive(Parser)]
    #[command(name = "hex-tiers")]
    #[command(author, version, about, long_about = None)]
    pub struct Cli {
        /// Map file (`.json` or `.csv`); a demo map is generated when absent.
        #[arg(short, long)]
        pub map: Option<PathBuf>,

        /// JSON weight configuration; missing keys keep their defaults.
        #[arg(short, long)]
        pub weights: Option<PathBuf>,

        /// Rings highlighted around the hovered tile.
        #[arg(long)]
        pub hover_radius: Option<u32>,

        /// Print the tier distribution and exit.
        #[arg(long)]
        pub report: bool,

        /// Number of best tiles listed by `--report`.
        #[arg(long, default_value = "10")]
        pub top: usize,

        /// Write the scored map as JSON and exit.
        #[arg(long)]
        pub export: Option<PathBuf>,
    }

    impl Cli {
        /// True when no window should be opened.
        pub fn is_headless(&self) -> bool {
            self.report || self.export.is_some()
        }
    }

    /// Reads the weight file, or the defaults when none is given.
    pub fn load_weights(path: Option<&Path>) -> Result<WeightConfig, MapLoadError> {
        let Some(path) = path else {
            return Ok(WeightConfig::default());
        };
        let text = std::fs::read_to_string(path).map_err(|source| MapLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let weights = WeightConfig::from_json(&text)?;
        info!("weights loaded from {}", path.display());
        Ok(weights)
    }

    /// Reads the map file, if any.
    pub fn load_map(path: Option<&Path>) -> Result<Option<MapData>, MapLoadError> {
        path.map(MapData::load).transpose()
    }

    /// Scores the map without a window, then prints and/or exports it.
    pub fn run_headless(cli: &Cli) -> Result<(), MapLoadError> {
        // Installs the log subscriber without opening a window.
        App::new().add_plugins(LogPlugin::default());

        let context = ScoringContext {
            weights: load_weights(cli.weights.as_deref())?,
            ..default()
        };
        let map = match load_map(cli.map.as_deref())? {
            Some(map) => map,
            None => generate_demo(&DemoSettings::default(), &context.resources),
        };
        let MapData {
            bounds, mut tiles, ..
        } = map;
        let summary = recalculate_all(&mut tiles, &context);

        if cli.report {
            println!("{}", TierReport::new(&tiles, &summary, cli.top));
        }
        if let Some(path) = &cli.export {
            write_export(path, &export_document(&tiles, &bounds, &summary))?;
        }
        Ok(())
    }
}

#[cfg(feature = "native")]
fn main() -> Result<(), hex_tiers::map_data::MapLoadError> {
    use clap::Parser;

    let cli = cli::Cli::parse();
    if cli.is_headless() {
        return cli::run_headless(&cli);
    }

    let pending = PendingMap {
        map: cli::load_map(cli.map.as_deref())?,
        weights: cli::load_weights(cli.weights.as_deref())?,
    };
    let defaults = InspectConfig::default();
    let inspect = InspectConfig {
        hover_radius: cli.hover_radius.unwrap_or(defaults.hover_radius),
        ..defaults
    };
    run_viewer(pending, inspect);
    Ok(())
}

#[cfg(not(feature = "native"))]
fn main() {
    run_viewer(PendingMap::default(), InspectConfig::default());
}

fn run_viewer(pending: PendingMap, inspect: InspectConfig) {
    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Hex Tiers".into(),
            ..default()
        }),
        ..default()
    }))
    .register_type::<GameState>()
    .init_state::<GameState>()
    .insert_resource(pending)
    .add_plugins(bevy_egui::EguiPlugin::default())
    .add_plugins(TilesPlugin(TilesConfig::default()))
    .add_plugins(InspectPlugin(inspect))
    .add_plugins(CameraPlugin(ViewConfig::default()))
    .add_plugins(PanelPlugin(PanelConfig::default()))
    .add_systems(Update, toggle_inspector)
    .add_plugins(WorldInspectorPlugin::new().run_if(in_state(GameState::Inspecting)));

    #[cfg(feature = "native")]
    app.add_plugins(bevy::remote::RemotePlugin::default())
        .add_plugins(bevy::remote::http::RemoteHttpPlugin::default());

    app.run();
}

fn toggle_inspector(
    keys: Res<ButtonInput<KeyCode>>,
    state: Res<State<GameState>>,
    mut next: ResMut<NextState<GameState>>,
) {
    if keys.just_pressed(KeyCode::Tab) {
        let new_state = match state.get() {
            GameState::Browsing => GameState::Inspecting,
            GameState::Inspecting => GameState::Browsing,
            GameState::Loading => return,
        };
        next.set(new_state);
    }
}
