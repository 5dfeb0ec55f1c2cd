use crate::entity::{Coordinate, PresenceRecord};
use anyhow::{Context, Result};
use serde::Deserialize;
use uuid::Uuid;

/// Complete snapmap configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SnapConfig {
    #[serde(default)]
    pub map: MapConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub presence: PresenceConfig,
}

impl SnapConfig {
    /// Self record seeded from configuration, positioned at the initial
    /// map center
    pub fn initial_self_record(&self) -> PresenceRecord {
        PresenceRecord {
            id: self.presence.self_id.clone(),
            lat: self.map.center_lat,
            lon: self.map.center_lon,
            name: self.presence.name.clone(),
            avatar_ref: self.presence.avatar_ref.clone(),
            inventory: Vec::new(),
        }
    }
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            map: MapConfig::default(),
            feed: FeedConfig::default(),
            presence: PresenceConfig::default(),
        }
    }
}

/// Initial map view
#[derive(Debug, Clone, Deserialize)]
pub struct MapConfig {
    /// View center latitude
    #[serde(default)]
    pub center_lat: f64,
    /// View center longitude
    #[serde(default)]
    pub center_lon: f64,
    /// Initial zoom level (2 = global view)
    #[serde(default = "default_zoom")]
    pub zoom: u8,
}

fn default_zoom() -> u8 {
    2
}

impl MapConfig {
    pub fn center(&self) -> Coordinate {
        Coordinate::new(self.center_lat, self.center_lon)
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center_lat: 0.0,
            center_lon: 0.0,
            zoom: default_zoom(),
        }
    }
}

/// Feed configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Snapshot broadcast channel capacity
    #[serde(default = "default_snapshot_capacity")]
    pub snapshot_capacity: usize,
}

fn default_snapshot_capacity() -> usize {
    64
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            snapshot_capacity: default_snapshot_capacity(),
        }
    }
}

/// Local presence configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PresenceConfig {
    /// Stable id for the self entity; generated when not configured
    #[serde(default = "default_self_id")]
    pub self_id: String,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Avatar image reference
    #[serde(default)]
    pub avatar_ref: Option<String>,
}

fn default_self_id() -> String {
    Uuid::new_v4().to_string()
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            self_id: default_self_id(),
            name: None,
            avatar_ref: None,
        }
    }
}

/// Load configuration from TOML file
pub fn load_config(path: &str) -> Result<SnapConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file '{}'", path))?;
    let config: SnapConfig = toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file '{}'", path))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = SnapConfig::default();
        assert_eq!(config.map.zoom, 2);
        assert_eq!(config.map.center(), Coordinate::new(0.0, 0.0));
        assert_eq!(config.feed.snapshot_capacity, 64);
        assert!(!config.presence.self_id.is_empty());
    }

    #[test]
    fn test_config_deserialization() {
        let toml = r#"
            [map]
            center_lat = 0.3152
            center_lon = 32.5816
            zoom = 13

            [feed]
            snapshot_capacity = 128

            [presence]
            self_id = "user_me"
            name = "Me"
            avatar_ref = "avatars/me.png"
        "#;

        let config: SnapConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.map.zoom, 13);
        assert_eq!(config.feed.snapshot_capacity, 128);
        assert_eq!(config.presence.self_id, "user_me");
        assert_eq!(config.presence.name.as_deref(), Some("Me"));
    }

    #[test]
    fn test_partial_config() {
        // Missing sections use defaults
        let toml = r#"
            [presence]
            name = "Just A Name"
        "#;

        let config: SnapConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.presence.name.as_deref(), Some("Just A Name"));
        assert_eq!(config.map.zoom, 2); // Default
        assert_eq!(config.feed.snapshot_capacity, 64); // Default
    }

    #[test]
    fn test_initial_self_record_starts_at_map_center() {
        let toml = r#"
            [map]
            center_lat = 1.5
            center_lon = 2.5

            [presence]
            self_id = "user_me"
        "#;

        let config: SnapConfig = toml::from_str(toml).unwrap();
        let record = config.initial_self_record();
        assert_eq!(record.id, "user_me");
        assert_eq!(record.coordinate(), Coordinate::new(1.5, 2.5));
        assert!(record.inventory.is_empty());
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[map]\nzoom = 7").unwrap();

        let config = load_config(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.map.zoom, 7);
    }

    #[test]
    fn test_load_config_missing_file_errors() {
        assert!(load_config("/does/not/exist.toml").is_err());
    }
}
