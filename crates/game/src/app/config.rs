use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use engine::{Item, ItemType, StatType};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

pub(crate) const DEFAULT_PLAYER_SPEED: f32 = 5.0;
pub(crate) const DEFAULT_WORLD_SIDE: u32 = 32;
pub(crate) const DEFAULT_WORLD_SEED: i32 = 1337;
const DEFAULT_ITEMS_CONFIG_VERSION: &str = "0.1";

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path} at {field}: {source}")]
    Parse {
        path: PathBuf,
        field: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid value in {path}: {message}")]
    Invalid { path: PathBuf, message: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct EngineSettings {
    pub(crate) config_version: Option<String>,
    pub(crate) player_speed: f32,
    pub(crate) world_width: u32,
    pub(crate) world_height: u32,
    pub(crate) world_seed: i32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            config_version: None,
            player_speed: DEFAULT_PLAYER_SPEED,
            world_width: DEFAULT_WORLD_SIDE,
            world_height: DEFAULT_WORLD_SIDE,
            world_seed: DEFAULT_WORLD_SEED,
        }
    }
}

impl EngineSettings {
    fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        if self.world_width == 0 || self.world_height == 0 {
            return Err(invalid(
                path,
                format!(
                    "world size must be non-zero, got {}x{}",
                    self.world_width, self.world_height
                ),
            ));
        }
        if !self.player_speed.is_finite() || self.player_speed < 0.0 {
            return Err(invalid(
                path,
                format!("player_speed must be finite and >= 0, got {}", self.player_speed),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct ItemsConfig {
    #[serde(default = "default_items_config_version")]
    pub(crate) config_version: String,
    #[serde(default)]
    pub(crate) items: Vec<ItemDef>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct ItemDef {
    pub(crate) id: String,
    pub(crate) name: String,
    #[serde(rename = "type")]
    pub(crate) kind: ItemType,
    #[serde(default)]
    pub(crate) bonuses: BTreeMap<String, f32>,
    #[serde(default)]
    pub(crate) value: i32,
}

impl ItemsConfig {
    /// Rejects duplicate ids and unknown stat names; bonus keys match stats case-insensitively.
    pub(crate) fn into_items(self, path: &Path) -> Result<Vec<Item>, ConfigError> {
        let mut seen = HashSet::new();
        let mut items = Vec::with_capacity(self.items.len());
        for (index, def) in self.items.into_iter().enumerate() {
            if def.id.trim().is_empty() {
                return Err(invalid(path, format!("items[{index}].id must not be empty")));
            }
            if !seen.insert(def.id.clone()) {
                return Err(invalid(path, format!("duplicate item id '{}'", def.id)));
            }

            let mut bonuses = BTreeMap::new();
            for (stat_name, amount) in &def.bonuses {
                let stat = stat_name.parse::<StatType>().map_err(|error| {
                    invalid(path, format!("items[{index}].bonuses: {error}"))
                })?;
                *bonuses.entry(stat).or_insert(0.0) += *amount;
            }
            items.push(Item::new(def.id, def.name, def.kind, bonuses, def.value));
        }
        Ok(items)
    }
}

fn default_items_config_version() -> String {
    DEFAULT_ITEMS_CONFIG_VERSION.to_string()
}

/// A missing or unreadable settings file is fatal.
pub(crate) fn load_settings(path: &Path) -> Result<EngineSettings, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let settings = parse_settings(&raw, path)?;
    info!(
        path = %path.display(),
        config_version = settings.config_version.as_deref().unwrap_or("unversioned"),
        seed = settings.world_seed,
        width = settings.world_width,
        height = settings.world_height,
        player_speed = settings.player_speed,
        "settings_loaded"
    );
    Ok(settings)
}

pub(crate) fn parse_settings(raw: &str, path: &Path) -> Result<EngineSettings, ConfigError> {
    let settings = parse_json::<EngineSettings>(raw, path)?;
    settings.validate(path)?;
    Ok(settings)
}

/// A missing items file means no starting items.
pub(crate) fn load_items(path: &Path) -> Result<Vec<Item>, ConfigError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "items_file_missing");
            return Ok(Vec::new());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    let items = parse_items(&raw, path)?;
    info!(path = %path.display(), count = items.len(), "items_loaded");
    Ok(items)
}

pub(crate) fn parse_items(raw: &str, path: &Path) -> Result<Vec<Item>, ConfigError> {
    let config = parse_json::<ItemsConfig>(raw, path)?;
    debug!(
        path = %path.display(),
        config_version = %config.config_version,
        "items_config_parsed"
    );
    config.into_items(path)
}

fn parse_json<T: DeserializeOwned>(raw: &str, path: &Path) -> Result<T, ConfigError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize::<_, T>(&mut deserializer).map_err(|error| {
        let field = error.path().to_string();
        ConfigError::Parse {
            path: path.to_path_buf(),
            field,
            source: error.into_inner(),
        }
    })
}

fn invalid(path: &Path, message: String) -> ConfigError {
    ConfigError::Invalid {
        path: path.to_path_buf(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path() -> PathBuf {
        PathBuf::from("data/test.json")
    }

    #[test]
    fn missing_settings_fields_take_defaults() {
        let settings = parse_settings(r#"{"world_seed": 42}"#, &path()).expect("settings");
        assert_eq!(settings.world_seed, 42);
        assert_eq!(settings.world_width, DEFAULT_WORLD_SIDE);
        assert_eq!(settings.world_height, DEFAULT_WORLD_SIDE);
        assert_eq!(settings.player_speed, DEFAULT_PLAYER_SPEED);
    }

    #[test]
    fn config_version_is_accepted() {
        let settings = parse_settings(r#"{"config_version": "0.1", "player_speed": 3.5}"#, &path())
            .expect("settings");
        assert_eq!(settings.config_version.as_deref(), Some("0.1"));
        assert_eq!(settings.player_speed, 3.5);
    }

    #[test]
    fn parse_error_names_the_offending_field() {
        let error = parse_settings(r#"{"world_width": "wide"}"#, &path()).expect_err("bad type");
        match error {
            ConfigError::Parse { field, .. } => assert_eq!(field, "world_width"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn zero_world_size_is_rejected() {
        let error = parse_settings(r#"{"world_width": 0}"#, &path()).expect_err("zero width");
        assert!(matches!(error, ConfigError::Invalid { .. }));
    }

    #[test]
    fn items_parse_with_case_insensitive_stats() {
        let items = parse_items(
            r#"{
                "config_version": "0.1",
                "items": [
                    {"id": "sword", "name": "Iron Sword", "type": "Weapon",
                     "bonuses": {"attack": 5, "MoveSpeed": 0.5}, "value": 12},
                    {"id": "potion", "name": "Potion", "type": "Consumable",
                     "bonuses": {"MAXHEALTH": 25}}
                ]
            }"#,
            &path(),
        )
        .expect("items");

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].kind(), ItemType::Weapon);
        assert_eq!(items[0].stat_bonus(StatType::Attack), 5.0);
        assert_eq!(items[0].stat_bonus(StatType::MoveSpeed), 0.5);
        assert_eq!(items[0].value(), 12);
        assert_eq!(items[1].stat_bonus(StatType::MaxHealth), 25.0);
        assert_eq!(items[1].value(), 0);
    }

    #[test]
    fn unknown_stat_name_is_rejected() {
        let error = parse_items(
            r#"{"items": [{"id": "ring", "name": "Ring", "type": "Armor", "bonuses": {"Luck": 1}}]}"#,
            &path(),
        )
        .expect_err("unknown stat");
        assert!(error.to_string().contains("Luck"));
    }

    #[test]
    fn duplicate_item_ids_are_rejected() {
        let error = parse_items(
            r#"{"items": [
                {"id": "a", "name": "A", "type": "Armor"},
                {"id": "a", "name": "B", "type": "Weapon"}
            ]}"#,
            &path(),
        )
        .expect_err("duplicate");
        assert!(matches!(error, ConfigError::Invalid { .. }));
    }

    #[test]
    fn unknown_item_type_reports_field_path() {
        let error = parse_items(
            r#"{"items": [{"id": "a", "name": "A", "type": "Trinket"}]}"#,
            &path(),
        )
        .expect_err("bad type");
        match error {
            ConfigError::Parse { field, .. } => assert_eq!(field, "items[0].type"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_items_file_yields_no_items() {
        let dir = tempfile::tempdir().expect("tempdir");
        let items = load_items(&dir.path().join("items.json")).expect("items");
        assert!(items.is_empty());
    }

    #[test]
    fn missing_settings_file_is_fatal() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(matches!(
            load_settings(&dir.path().join("config.json")),
            Err(ConfigError::Read { .. })
        ));
    }
}
