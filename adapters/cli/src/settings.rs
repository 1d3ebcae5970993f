use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result};
use serde::Deserialize;
use tile_defence_core::{GridConfig, NavigatorConfig, TileCoord, TowerConfig};

/// Overrides read from a TOML settings file.
///
/// Every field is optional; missing fields keep the built-in defaults.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Settings {
    grid: GridSection,
    navigator: NavigatorSection,
    tower: TowerSection,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct GridSection {
    rows: Option<u32>,
    columns: Option<u32>,
    tile_size: Option<f32>,
    offset_y: Option<f32>,
    start: Option<TileCoord>,
    base: Option<TileCoord>,
    spawn_interval_ms: Option<u64>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct NavigatorSection {
    speed: Option<f32>,
    arrival_tolerance: Option<f32>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct TowerSection {
    attack_interval_ms: Option<u64>,
    attack_range: Option<f32>,
}

impl Settings {
    /// Reads and parses the settings file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid settings file at {}", path.display()))
    }

    pub(crate) fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse settings toml contents")
    }

    pub(crate) fn grid(&self) -> GridConfig {
        let defaults = GridConfig::default();
        let section = &self.grid;
        GridConfig {
            rows: section.rows.unwrap_or(defaults.rows),
            columns: section.columns.unwrap_or(defaults.columns),
            tile_size: section.tile_size.unwrap_or(defaults.tile_size),
            offset_y: section.offset_y.unwrap_or(defaults.offset_y),
            start: section.start.unwrap_or(defaults.start),
            base: section.base.unwrap_or(defaults.base),
            spawn_interval: section
                .spawn_interval_ms
                .map_or(defaults.spawn_interval, Duration::from_millis),
        }
    }

    pub(crate) fn navigator(&self) -> NavigatorConfig {
        let defaults = NavigatorConfig::default();
        NavigatorConfig {
            speed: self.navigator.speed.unwrap_or(defaults.speed),
            arrival_tolerance: self
                .navigator
                .arrival_tolerance
                .unwrap_or(defaults.arrival_tolerance),
        }
    }

    pub(crate) fn tower(&self) -> TowerConfig {
        let defaults = TowerConfig::default();
        TowerConfig {
            attack_interval: self
                .tower
                .attack_interval_ms
                .map_or(defaults.attack_interval, Duration::from_millis),
            attack_range: self.tower.attack_range.unwrap_or(defaults.attack_range),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_keeps_defaults() {
        let settings = Settings::parse("").expect("empty settings");
        assert_eq!(settings.grid(), GridConfig::default());
        assert_eq!(settings.navigator(), NavigatorConfig::default());
        assert_eq!(settings.tower(), TowerConfig::default());
    }

    #[test]
    fn sections_override_individual_fields() {
        let settings = Settings::parse(
            r#"
            [grid]
            rows = 5
            start = { row = 2, column = 0 }
            base = { row = 2, column = 15 }
            spawn_interval_ms = 500

            [navigator]
            speed = 120.0

            [tower]
            attack_range = 150.0
            "#,
        )
        .expect("valid settings");

        let grid = settings.grid();
        assert_eq!(grid.rows, 5);
        assert_eq!(grid.columns, 16);
        assert_eq!(grid.start, TileCoord::new(2, 0));
        assert_eq!(grid.base, TileCoord::new(2, 15));
        assert_eq!(grid.spawn_interval, Duration::from_millis(500));
        assert_eq!(settings.navigator().speed, 120.0);
        assert_eq!(settings.navigator().arrival_tolerance, 2.0);
        assert_eq!(settings.tower().attack_range, 150.0);
        assert_eq!(
            settings.tower().attack_interval,
            Duration::from_millis(2500)
        );
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let error = Settings::parse("[grid]\nwidth = 3\n").expect_err("unknown field");
        assert!(format!("{error:#}").contains("width"));
    }

    #[test]
    fn missing_file_reports_path() {
        let error = Settings::load(Path::new("/nonexistent/tile-defence.toml"))
            .expect_err("missing file");
        assert!(error.to_string().contains("/nonexistent/tile-defence.toml"));
    }
}
