//! Configuration loader/writer plus strongly typed settings structures.
//!
//! Two documents are persisted: the layout (every UI element and menu, in
//! z-order) and the settings (non-geometric UI configuration). Both are TOML.
//! Defaults are embedded at compile time and used whenever a file is missing.

use crate::data::{ElementSet, Menu, MenuSet, UiElement};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub mod store;

pub use store::{ConfigStore, FileStore};

// Embed default configuration files at compile time
const DEFAULT_LAYOUT: &str = include_str!("../defaults/layout.toml");
const DEFAULT_SETTINGS: &str = include_str!("../defaults/settings.toml");

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "CATAN_DEVMODE_DIR";

/// Resolved on-disk locations
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
}

impl Config {
    /// Resolve the data directory: explicit path, then CATAN_DEVMODE_DIR, then ~/.catan-devmode
    pub fn resolve(data_dir: Option<PathBuf>) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => Self::base_dir()?,
        };
        Ok(Self { data_dir })
    }

    pub fn base_dir() -> Result<PathBuf> {
        if let Ok(custom_dir) = std::env::var(DATA_DIR_ENV) {
            return Ok(PathBuf::from(custom_dir));
        }

        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".catan-devmode"))
    }

    pub fn layout_path(&self) -> PathBuf {
        self.data_dir.join("layout.toml")
    }

    pub fn settings_path(&self) -> PathBuf {
        self.data_dir.join("settings.toml")
    }

    pub fn hierarchy_path(&self) -> PathBuf {
        self.data_dir.join("ui_hierarchy.json")
    }
}

/// Persisted layout: every element (with all properties) and every menu
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// RFC 3339 timestamp of the last save
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<String>,
    #[serde(default)]
    pub elements: Vec<UiElement>,
    #[serde(default)]
    pub menus: Vec<Menu>,
}

impl Layout {
    /// Snapshot the live element and menu sets
    pub fn from_state(elements: &ElementSet, menus: &MenuSet) -> Self {
        Self {
            saved_at: Some(chrono::Local::now().to_rfc3339()),
            elements: elements.iter().cloned().collect(),
            menus: menus.iter().cloned().collect(),
        }
    }

    pub fn into_state(self) -> Result<(ElementSet, MenuSet)> {
        let elements = ElementSet::from_elements(self.elements)?;
        let menus = MenuSet::from_menus(self.menus)?;
        Ok((elements, menus))
    }

    /// Load layout from `path`, falling back to the embedded default when missing
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::info!("No layout at {:?}, using embedded default", path);
            Self::embedded_default()
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).context(format!("Failed to read layout file: {:?}", path))?;
        let layout = Self::parse(&contents)
            .context(format!("Failed to parse layout file: {:?}", path))?;
        tracing::debug!(
            "Loaded layout from {:?}: {} elements, {} menus",
            path,
            layout.elements.len(),
            layout.menus.len()
        );
        Ok(layout)
    }

    pub fn embedded_default() -> Result<Self> {
        Self::parse(DEFAULT_LAYOUT).context("Embedded default layout is invalid")
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize layout")
    }
}

/// Non-geometric UI configuration, persisted by `overrides`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub audio: AudioSettings,
    #[serde(default)]
    pub graphics: GraphicsSettings,
    #[serde(default)]
    pub gameplay: GameplaySettings,
    #[serde(default)]
    pub accessibility: AccessibilitySettings,
    #[serde(default)]
    pub input: InputSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioSettings {
    #[serde(default = "default_volume")]
    pub master_volume: u8, // 0-100
    #[serde(default = "default_volume")]
    pub music_volume: u8,
    #[serde(default = "default_volume")]
    pub effects_volume: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphicsSettings {
    #[serde(default)]
    pub fullscreen: bool,
    #[serde(default = "default_true")]
    pub vsync: bool,
    #[serde(default = "default_fps_cap")]
    pub fps_cap: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameplaySettings {
    /// Seconds per turn, 0 = no limit
    #[serde(default)]
    pub turn_timer: u32,
    #[serde(default = "default_true")]
    pub confirm_end_turn: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessibilitySettings {
    #[serde(default)]
    pub color_blind_mode: bool,
    #[serde(default = "default_ui_scale")]
    pub ui_scale: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSettings {
    #[serde(default = "default_devmode_key")]
    pub devmode_key: String,
    #[serde(default = "default_history_length")]
    pub command_history_length: usize,
}

fn default_volume() -> u8 {
    80
}

fn default_true() -> bool {
    true
}

fn default_fps_cap() -> u32 {
    60
}

fn default_ui_scale() -> f32 {
    1.0
}

fn default_devmode_key() -> String {
    "f12".to_string()
}

fn default_history_length() -> usize {
    50
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            master_volume: default_volume(),
            music_volume: default_volume(),
            effects_volume: default_volume(),
        }
    }
}

impl Default for GraphicsSettings {
    fn default() -> Self {
        Self {
            fullscreen: false,
            vsync: true,
            fps_cap: default_fps_cap(),
        }
    }
}

impl Default for GameplaySettings {
    fn default() -> Self {
        Self {
            turn_timer: 0,
            confirm_end_turn: true,
        }
    }
}

impl Default for AccessibilitySettings {
    fn default() -> Self {
        Self {
            color_blind_mode: false,
            ui_scale: default_ui_scale(),
        }
    }
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            devmode_key: default_devmode_key(),
            command_history_length: default_history_length(),
        }
    }
}

impl Settings {
    /// Load settings from `path`, falling back to the embedded default when missing
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No settings at {:?}, using embedded default", path);
            return toml::from_str(DEFAULT_SETTINGS)
                .context("Embedded default settings are invalid");
        }
        let contents = fs::read_to_string(path)
            .context(format!("Failed to read settings file: {:?}", path))?;
        toml::from_str(&contents).context(format!("Failed to parse settings file: {:?}", path))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize settings")
    }
}
